//! ZoomableImage - a self-contained egui widget showing a pinch-zoomable image
//!
//! This widget owns the image texture, the transform controller and the tap
//! guard. It translates egui input into controller events each frame and
//! paints the image with the resulting transform. Multiple instances can be
//! used side-by-side without sharing state.

use egui::{Color32, ColorImage, PointerButton, Pos2, Response, TextureHandle, TextureOptions, Ui, Vec2};

use crate::config::ZoomConfig;
use crate::controller::{GestureState, TransformController};
use crate::tap::TapSuppressor;
use crate::transform::ImageTransform;

/// Duration to show the zoom level overlay after the scale changed
const ZOOM_OVERLAY_DURATION: f64 = 0.5;

/// Pause in wheel or trackpad zoom input (seconds) that ends the scale gesture
const SCALE_END_DELAY: f64 = 0.15;

/// What happened in the widget during one frame
pub struct ZoomResponse {
    pub response: Response,
    /// A tap that was not part of a pan or pinch
    pub clicked: bool,
    /// A long press that was not part of a pan or pinch
    pub long_pressed: bool,
    /// Image pixel under the click or long press, if it hit the image
    pub pixel: Option<(u32, u32)>,
    /// Whether the transform differs from the previous frame
    pub transform_changed: bool,
}

/// A widget displaying one image that can be pinch-zoomed and dragged.
pub struct ZoomableImage {
    // === Image data ===
    /// Image waiting to be uploaded as a texture
    pending_image: Option<ColorImage>,
    /// Image width in pixels
    width: u32,
    /// Image height in pixels
    height: u32,
    texture: Option<TextureHandle>,

    // === Gestures ===
    controller: TransformController,
    tap: TapSuppressor,
    /// Transform painted in the previous frame
    last_transform: ImageTransform,
    /// Time of the last wheel or trackpad zoom input; `None` after a touch pinch
    last_zoom_time: Option<f64>,

    // === Overlay state ===
    /// Track when the scale was last changed (for overlay display)
    zoom_changed_time: Option<f64>,
    /// Previous relative scale to detect changes
    prev_relative_scale: f32,
}

impl Default for ZoomableImage {
    fn default() -> Self {
        Self::new(ZoomConfig::default())
    }
}

impl ZoomableImage {
    /// Create an empty widget with the given limits
    pub fn new(config: ZoomConfig) -> Self {
        Self {
            pending_image: None,
            width: 0,
            height: 0,
            texture: None,
            controller: TransformController::new(config),
            tap: TapSuppressor::new(),
            last_transform: ImageTransform::IDENTITY,
            last_zoom_time: None,
            zoom_changed_time: None,
            prev_relative_scale: 1.0,
        }
    }

    // =========================================================================
    // Public API (called from outside, e.g., from JS via ZoomViewHandle)
    // =========================================================================

    /// Set a new image. The view resets to fit-to-view, centered.
    pub fn set_image(&mut self, image: ColorImage) {
        let [width, height] = image.size;
        self.width = width as u32;
        self.height = height as u32;
        self.pending_image = Some(image);
        self.controller.on_image_changed(width as f32, height as f32);
    }

    /// Remove the image
    pub fn clear_image(&mut self) {
        self.pending_image = None;
        self.texture = None;
        self.width = 0;
        self.height = 0;
        self.controller.clear_image();
    }

    /// Check if we have image data
    pub fn has_image(&self) -> bool {
        self.texture.is_some() || self.pending_image.is_some()
    }

    /// Get image dimensions
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Return to fit-to-view
    pub fn reset_view(&mut self) {
        self.controller.reset();
    }

    pub fn transform(&self) -> ImageTransform {
        self.controller.current_transform()
    }

    pub fn controller(&self) -> &TransformController {
        &self.controller
    }

    /// Get mutable reference to the controller (config setters live there)
    pub fn controller_mut(&mut self) -> &mut TransformController {
        &mut self.controller
    }

    // =========================================================================
    // Main rendering
    // =========================================================================

    /// Show the widget, rendering into the given UI with a specified container size.
    pub fn show(&mut self, ui: &mut Ui, container_size: Vec2) -> ZoomResponse {
        let ctx = ui.ctx().clone();

        if let Some(image) = self.pending_image.take() {
            self.texture = Some(ctx.load_texture("zoomable_image", image, TextureOptions::LINEAR));
        }

        let (rect, response) = ui.allocate_exact_size(container_size, egui::Sense::click_and_drag());

        // Layout is known from here on; this also runs a deferred initialization
        self.controller.on_layout(rect.width(), rect.height());

        if !self.has_image() {
            let painter = ui.painter_at(rect);
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "No image loaded",
                egui::FontId::default(),
                ui.style().visuals.text_color(),
            );
            return ZoomResponse {
                response,
                clicked: false,
                long_pressed: false,
                pixel: None,
                transform_changed: false,
            };
        }

        self.track_tap(ui);
        self.handle_gestures(ui, &response, rect.min);

        let transform = self.controller.current_transform();
        let image_size = egui::vec2(self.width as f32, self.height as f32);

        if let Some(texture) = &self.texture {
            let painter = ui.painter_at(rect);
            painter.image(
                texture.id(),
                transform.image_rect(rect.min, image_size),
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                Color32::WHITE,
            );
        }

        let allows_tap = self.tap.allows_tap();
        let clicked = response.clicked() && allows_tap;
        let long_pressed = response.long_touched() && allows_tap;

        if response.double_clicked() && allows_tap {
            self.controller.reset();
        }

        let pixel = if clicked || long_pressed {
            response
                .interact_pointer_pos()
                .and_then(|pos| transform.screen_to_image(pos - rect.min.to_vec2(), self.dimensions()))
        } else {
            None
        };

        // Track scale changes for overlay display
        let current_time = ctx.input(|i| i.time);
        let relative_scale = self.controller.relative_scale().unwrap_or(1.0);
        if (relative_scale - self.prev_relative_scale).abs() > 0.001 {
            self.zoom_changed_time = Some(current_time);
            self.prev_relative_scale = relative_scale;
        }
        self.render_zoom_info_overlay(&ctx, &response, current_time);

        let current = self.controller.current_transform();
        let transform_changed = current != self.last_transform;
        self.last_transform = current;

        ZoomResponse {
            response,
            clicked,
            long_pressed,
            pixel,
            transform_changed,
        }
    }

    /// Feed pointer presses, moves and extra touches to the tap guard
    fn track_tap(&mut self, ui: &Ui) {
        let tap = &mut self.tap;
        ui.input(|i| {
            if i.pointer.any_pressed() {
                if let Some(origin) = i.pointer.press_origin() {
                    tap.press(origin);
                }
            }
            if i.pointer.any_down() {
                if let Some(pos) = i.pointer.latest_pos() {
                    tap.moved(pos);
                }
            }
            if i.multi_touch().is_some_and(|touch| touch.num_touches > 1) {
                tap.extra_pointer();
            }
        });
    }

    /// Translate this frame's pinch, wheel-zoom and drag input into
    /// controller events. `origin` is the top-left of the viewport.
    fn handle_gestures(&mut self, ui: &Ui, response: &Response, origin: Pos2) {
        let (zoom_delta, multi_touch, pointer_pos, time) =
            ui.input(|i| (i.zoom_delta(), i.multi_touch(), i.pointer.latest_pos(), i.time));

        // Pinch, or ctrl+scroll on desktop
        if zoom_delta != 1.0 {
            self.last_zoom_time = if multi_touch.is_some() { None } else { Some(time) };
            let focus = multi_touch.map(|touch| touch.center_pos).or(pointer_pos);
            if let Some(focus) = focus {
                if response.rect.contains(focus) || self.controller.is_scaling() {
                    self.controller.apply_scale(zoom_delta, focus - origin.to_vec2());
                }
            }
        } else if self.controller.is_scaling() && multi_touch.is_none() {
            // A pinch ends when the fingers lift. Wheel and trackpad zoom come
            // as separate ticks and end after a pause.
            let idle = self.last_zoom_time.map_or(f64::INFINITY, |last| time - last);
            if idle >= SCALE_END_DELAY {
                self.last_zoom_time = None;
                self.controller.on_gesture_end();
            } else {
                ui.ctx()
                    .request_repaint_after(std::time::Duration::from_secs_f64(SCALE_END_DELAY - idle));
            }
        }

        // Single-finger drag; a pinch in progress takes priority
        if multi_touch.is_none()
            && !self.controller.is_scaling()
            && response.dragged_by(PointerButton::Primary)
        {
            let drag_delta = response.drag_delta();
            if drag_delta != Vec2::ZERO {
                // Controller takes scroll distance, the opposite of content motion
                self.controller.apply_pan(-drag_delta);
            }
        }

        if response.drag_stopped() && self.controller.gesture_state() == GestureState::Dragging {
            self.controller.on_gesture_end();
        }
    }

    /// Render the zoom level overlay while zooming
    fn render_zoom_info_overlay(&self, ctx: &egui::Context, response: &Response, current_time: f64) {
        // Check if we should show the overlay (during and shortly after scale changes)
        let should_show = if let Some(changed_time) = self.zoom_changed_time {
            (current_time - changed_time) < ZOOM_OVERLAY_DURATION
        } else {
            false
        };

        if !should_show {
            return;
        }

        // Keep repainting until the overlay times out
        ctx.request_repaint();

        let zoom_text = format_zoom_multiple(self.prev_relative_scale);
        let widget_rect = response.rect;

        egui::Area::new(response.id.with("zoom_info_overlay"))
            .fixed_pos(egui::pos2(widget_rect.center().x - 50.0, widget_rect.center().y - 20.0))
            .show(ctx, |ui| {
                let text_color = get_overlay_text_color(ui);
                let bg = get_overlay_bg(ui);
                egui::Frame::popup(ui.style())
                    .fill(bg)
                    .corner_radius(8)
                    .inner_margin(egui::Margin::symmetric(16, 8))
                    .show(ui, |ui| {
                        ui.style_mut().wrap_mode = Some(egui::TextWrapMode::Extend);
                        ui.label(egui::RichText::new(zoom_text).color(text_color).size(24.0));
                    });
            });
    }
}

/// Get a translucent background color appropriate for light/dark mode
fn get_overlay_bg(ui: &Ui) -> Color32 {
    if ui.visuals().dark_mode {
        Color32::from_black_alpha(180)
    } else {
        Color32::from_white_alpha(220)
    }
}

/// Get text color appropriate for light/dark mode overlays
fn get_overlay_text_color(ui: &Ui) -> Color32 {
    if ui.visuals().dark_mode {
        Color32::WHITE
    } else {
        Color32::from_gray(30)
    }
}

/// Format a scale multiple with consistent decimal places
fn format_zoom_multiple(zoom: f32) -> String {
    format!("{:.2}x", zoom)
}
