//! Gesture reconciliation for the zoomable image
//!
//! [`TransformController`] owns the image transform and updates it from
//! pinch, drag and gesture-end events. After every mutation the transform is
//! reconciled against the configured scale and translation bounds, either
//! hard-clamped or left "bouncing" until the gesture is released.
//!
//! The controller is driven from the single thread that delivers input
//! events. All mutation goes through `&mut self`; nothing is shared.

use egui::{Pos2, Vec2};

use crate::config::ZoomConfig;
use crate::error::ControllerError;
use crate::transform::ImageTransform;

/// Which gesture currently owns the transform
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging,
    Scaling,
}

impl GestureState {
    /// Lowercase name for display and the JS interface
    pub fn name(&self) -> &'static str {
        match self {
            GestureState::Idle => "idle",
            GestureState::Dragging => "dragging",
            GestureState::Scaling => "scaling",
        }
    }
}

/// Sizes needed by every transform update, captured once per event
#[derive(Clone, Copy, Debug)]
struct Bounds {
    viewport: Vec2,
    image: Vec2,
    init_scale: f32,
}

/// Maintains the scale + translation of an image inside a viewport.
///
/// The host reports layout with [`on_layout`](Self::on_layout) and new images
/// with [`on_image_changed`](Self::on_image_changed), forwards gestures to
/// [`apply_scale`](Self::apply_scale), [`apply_pan`](Self::apply_pan) and
/// [`on_gesture_end`](Self::on_gesture_end), and renders
/// [`current_transform`](Self::current_transform) after each call.
///
/// Until both an image and a nonzero viewport are known every operation is a
/// no-op.
#[derive(Clone, Debug)]
pub struct TransformController {
    config: ZoomConfig,
    /// Viewport size in pixels, `None` until laid out with nonzero size
    viewport: Option<Vec2>,
    /// Intrinsic image size in pixels, `None` until an image is assigned
    image: Option<Vec2>,
    /// Fit-to-view scale, `None` until initialized for the current pair
    init_scale: Option<f32>,
    transform: ImageTransform,
    state: GestureState,
    /// Focal point of the latest scale event, used for the release snap
    last_focus: Pos2,
    /// One-shot initialization waiting for both sizes
    pending_init: bool,
}

impl Default for TransformController {
    fn default() -> Self {
        Self::new(ZoomConfig::default())
    }
}

impl TransformController {
    pub fn new(config: ZoomConfig) -> Self {
        log::debug!("zoom config: {config:?}");
        warn_if_inverted(&config);
        Self {
            config,
            viewport: None,
            image: None,
            init_scale: None,
            transform: ImageTransform::IDENTITY,
            state: GestureState::Idle,
            last_focus: Pos2::ZERO,
            pending_init: false,
        }
    }

    // =========================================================================
    // Host events
    // =========================================================================

    /// Report the viewport size after a layout pass.
    ///
    /// A size change re-arms initialization, which then runs as soon as an
    /// image is known. Zero sizes are treated as "not laid out yet".
    pub fn on_layout(&mut self, width: f32, height: f32) {
        let viewport = non_empty(width, height);
        if viewport != self.viewport {
            self.viewport = viewport;
            self.pending_init = true;
        }
        self.run_pending_init();
    }

    /// Report a newly assigned image. The transform is reset to fit-to-view,
    /// centered, once the viewport is known.
    pub fn on_image_changed(&mut self, width: f32, height: f32) {
        self.image = non_empty(width, height);
        self.init_scale = None;
        self.state = GestureState::Idle;
        self.pending_init = true;
        self.run_pending_init();
    }

    /// Forget the current image. All operations become no-ops until the next
    /// [`on_image_changed`](Self::on_image_changed).
    pub fn clear_image(&mut self) {
        self.image = None;
        self.init_scale = None;
        self.state = GestureState::Idle;
        self.pending_init = false;
    }

    /// Set both sizes and fit the image to the viewport, centered.
    pub fn initialize_for_image(&mut self, viewport: Vec2, image: Vec2) {
        self.viewport = non_empty(viewport.x, viewport.y);
        self.image = non_empty(image.x, image.y);
        self.pending_init = true;
        self.run_pending_init();
    }

    /// Return to fit-to-view, centered
    pub fn reset(&mut self) {
        self.pending_init = true;
        self.run_pending_init();
    }

    /// Multiply the scale by `factor` about `focus` (viewport coordinates).
    pub fn apply_scale(&mut self, factor: f32, focus: Pos2) {
        if let Err(err) = self.try_scale(factor, focus) {
            log::trace!("scale skipped: {err}");
        }
    }

    /// Apply a pan given as scroll distance: positive `distance.x` means the
    /// finger moved left, so the content moves left by that amount.
    pub fn apply_pan(&mut self, distance: Vec2) {
        if let Err(err) = self.try_pan(distance) {
            log::trace!("pan skipped: {err}");
        }
    }

    /// Release of the current gesture: snap scale or translation back into
    /// bounds and return to idle.
    pub fn on_gesture_end(&mut self) {
        if let Err(err) = self.try_end_gesture() {
            log::trace!("gesture end skipped: {err}");
            self.state = GestureState::Idle;
        }
    }

    /// Re-apply the bounds for the current gesture state. Running it twice in
    /// a row leaves the transform unchanged.
    pub fn reconcile(&mut self) {
        if let Ok(bounds) = self.bounds() {
            self.reconcile_with(&bounds);
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn current_transform(&self) -> ImageTransform {
        self.transform
    }

    pub fn gesture_state(&self) -> GestureState {
        self.state
    }

    pub fn is_scaling(&self) -> bool {
        self.state == GestureState::Scaling
    }

    /// Fit-to-view scale, `None` until image and viewport are both known
    pub fn init_scale(&self) -> Option<f32> {
        self.init_scale
    }

    /// Current scale as a multiple of fit-to-view (1.0 = fit)
    pub fn relative_scale(&self) -> Option<f32> {
        self.init_scale.map(|init| self.transform.scale() / init)
    }

    pub fn image_size(&self) -> Option<Vec2> {
        self.image
    }

    pub fn config(&self) -> &ZoomConfig {
        &self.config
    }

    /// Mutable access to the config; changes apply at the next reconcile
    pub fn config_mut(&mut self) -> &mut ZoomConfig {
        &mut self.config
    }

    pub fn set_config(&mut self, config: ZoomConfig) {
        warn_if_inverted(&config);
        self.config = config;
    }

    pub fn set_min_scale(&mut self, min_scale: f32) {
        self.config.min_scale = min_scale;
    }

    pub fn set_max_scale(&mut self, max_scale: f32) {
        self.config.max_scale = max_scale;
    }

    pub fn set_translation_sticky_factor(&mut self, factor: f32) {
        self.config.translation_sticky_factor = factor;
    }

    pub fn set_bounce_from_min_scale(&mut self, bounce: bool) {
        self.config.bounce_from_min_scale = bounce;
    }

    pub fn set_bounce_to_max_scale(&mut self, bounce: bool) {
        self.config.bounce_to_max_scale = bounce;
    }

    pub fn set_bounce_from_translation(&mut self, bounce: bool) {
        self.config.bounce_from_translation = bounce;
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn dimensions(&self) -> Result<(Vec2, Vec2), ControllerError> {
        let image = self.image.ok_or(ControllerError::UninitializedImage)?;
        let viewport = self.viewport.ok_or(ControllerError::UninitializedViewport)?;
        Ok((viewport, image))
    }

    fn bounds(&self) -> Result<Bounds, ControllerError> {
        let (viewport, image) = self.dimensions()?;
        let init_scale = self.init_scale.ok_or(ControllerError::UninitializedViewport)?;
        Ok(Bounds {
            viewport,
            image,
            init_scale,
        })
    }

    fn run_pending_init(&mut self) {
        if !self.pending_init {
            return;
        }
        match self.try_initialize() {
            Ok(()) => self.pending_init = false,
            Err(err) => log::trace!("initialization deferred: {err}"),
        }
    }

    fn try_initialize(&mut self) -> Result<(), ControllerError> {
        let (viewport, image) = self.dimensions()?;

        let init_scale = (viewport.x / image.x).min(viewport.y / image.y);
        let centered = (viewport - image * init_scale) / 2.0;

        self.init_scale = Some(init_scale);
        self.transform = ImageTransform::new(init_scale, centered);
        self.state = GestureState::Idle;

        log::debug!(
            "fit {}x{} image into {}x{} viewport at scale {init_scale}",
            image.x,
            image.y,
            viewport.x,
            viewport.y
        );
        Ok(())
    }

    fn try_scale(&mut self, factor: f32, focus: Pos2) -> Result<(), ControllerError> {
        let bounds = self.bounds()?;

        // Scale wins over an unfinished drag, which is released first
        if self.state == GestureState::Dragging {
            self.clamp_translation_to_bounds(&bounds);
            self.state = GestureState::Idle;
        }

        self.state = GestureState::Scaling;
        self.last_focus = focus;
        self.transform.post_scale(factor, focus);
        self.reconcile_with(&bounds);
        Ok(())
    }

    fn try_pan(&mut self, distance: Vec2) -> Result<(), ControllerError> {
        let bounds = self.bounds()?;

        if self.state == GestureState::Scaling {
            log::trace!("pan ignored while scaling");
            return Ok(());
        }

        self.state = GestureState::Dragging;

        let scaled = self.transform.scaled_size(bounds.image);
        let dx = self.gesture_distance(distance.x, self.transform.trans_x, scaled.x, bounds.viewport.x);
        let dy = self.gesture_distance(distance.y, self.transform.trans_y, scaled.y, bounds.viewport.y);

        self.transform.post_translate(Vec2::new(-dx, -dy));
        self.reconcile_with(&bounds);
        Ok(())
    }

    fn try_end_gesture(&mut self) -> Result<(), ControllerError> {
        let bounds = self.bounds()?;

        match self.state {
            GestureState::Idle => {}
            GestureState::Scaling => {
                let scale = self.transform.scale();
                let max_scale = bounds.init_scale * self.config.max_scale;

                if scale < bounds.init_scale {
                    self.transform.post_scale(bounds.init_scale / scale, self.last_focus);
                    self.reconcile_with(&bounds);
                } else if scale > max_scale {
                    self.transform.post_scale(max_scale / scale, self.last_focus);
                    self.reconcile_with(&bounds);
                }
            }
            GestureState::Dragging => self.clamp_translation_to_bounds(&bounds),
        }

        self.state = GestureState::Idle;
        Ok(())
    }

    /// Effective scroll distance on one axis.
    ///
    /// Zero when the image fits the axis. When the translation is at or past
    /// an edge and the move pushes further out, the distance is scaled by the
    /// sticky factor (or zeroed if translation bounce is off).
    fn gesture_distance(&self, distance: f32, trans: f32, image_size: f32, screen_size: f32) -> f32 {
        if image_size <= screen_size {
            return 0.0;
        }

        let diff = screen_size - image_size;
        let target = trans - distance;
        let pushing_out = (trans >= 0.0 && target > trans) || (trans <= diff && target < trans);

        if pushing_out {
            if self.config.bounce_from_translation {
                distance * self.config.translation_sticky_factor
            } else {
                0.0
            }
        } else {
            distance
        }
    }

    fn reconcile_with(&mut self, bounds: &Bounds) {
        match self.state {
            GestureState::Scaling => {
                self.clamp_scale(bounds);
                let scaled = self.transform.scaled_size(bounds.image);
                self.transform.trans_x = clamp_scaled_axis(self.transform.trans_x, scaled.x, bounds.viewport.x);
                self.transform.trans_y = clamp_scaled_axis(self.transform.trans_y, scaled.y, bounds.viewport.y);
            }
            GestureState::Idle | GestureState::Dragging => {
                if !self.config.bounce_from_translation {
                    self.clamp_translation_to_bounds(bounds);
                }
            }
        }
    }

    fn clamp_scale(&mut self, bounds: &Bounds) {
        let chosen_min = if self.config.bounce_from_min_scale {
            self.config.min_scale * bounds.init_scale
        } else {
            bounds.init_scale
        };

        // max/min rather than clamp(): inverted limits must not panic
        let mut scale = self.transform.scale().max(chosen_min);
        if !self.config.bounce_to_max_scale {
            scale = scale.min(self.config.max_scale * bounds.init_scale);
        }
        self.transform.set_scale(scale);
    }

    /// Snap each axis back to its nearest in-bounds edge
    fn clamp_translation_to_bounds(&mut self, bounds: &Bounds) {
        let scaled = self.transform.scaled_size(bounds.image);
        self.transform.trans_x = snap_axis(self.transform.trans_x, bounds.viewport.x - scaled.x);
        self.transform.trans_y = snap_axis(self.transform.trans_y, bounds.viewport.y - scaled.y);
    }
}

fn warn_if_inverted(config: &ZoomConfig) {
    if config.has_inverted_limits() {
        log::warn!(
            "zoom config has inverted or negative scale limits (min {}, max {}); using as-is",
            config.min_scale,
            config.max_scale
        );
    }
}

fn non_empty(width: f32, height: f32) -> Option<Vec2> {
    (width > 0.0 && height > 0.0).then(|| Vec2::new(width, height))
}

/// Translation for one axis while scaling: inside `[diff, 0]` when the image
/// overflows the viewport, centered otherwise.
fn clamp_scaled_axis(trans: f32, image_size: f32, screen_size: f32) -> f32 {
    let diff = screen_size - image_size;
    if image_size > screen_size {
        trans.min(0.0).max(diff)
    } else {
        diff / 2.0
    }
}

fn snap_axis(trans: f32, diff: f32) -> f32 {
    if diff < 0.0 && trans > 0.0 {
        0.0
    } else if diff < 0.0 && trans < diff {
        diff
    } else {
        trans
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(viewport: (f32, f32), image: (f32, f32)) -> TransformController {
        let mut c = TransformController::default();
        c.on_layout(viewport.0, viewport.1);
        c.on_image_changed(image.0, image.1);
        c
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.001
    }

    #[test]
    fn test_init_scale_and_centering() {
        let cases = [
            ((1000.0, 1000.0), (500.0, 500.0)),
            ((800.0, 600.0), (400.0, 100.0)),
            ((320.0, 480.0), (1024.0, 768.0)),
            ((300.0, 300.0), (30.0, 600.0)),
        ];

        for (viewport, image) in cases {
            let c = controller(viewport, image);
            let expected = (viewport.0 / image.0).min(viewport.1 / image.1);
            let init = c.init_scale().unwrap();
            assert!(approx(init, expected), "{viewport:?} {image:?}: {init} != {expected}");

            let t = c.current_transform();
            assert_eq!(t.scale_x, t.scale_y);
            assert!(approx(t.trans_x, (viewport.0 - image.0 * init) / 2.0));
            assert!(approx(t.trans_y, (viewport.1 - image.1 * init) / 2.0));
        }
    }

    #[test]
    fn test_init_waits_for_layout() {
        let mut c = TransformController::default();
        c.on_image_changed(500.0, 500.0);
        assert!(c.init_scale().is_none());
        assert_eq!(c.current_transform(), ImageTransform::IDENTITY);

        // Zero-sized layout is not a layout
        c.on_layout(0.0, 1000.0);
        assert!(c.init_scale().is_none());

        c.on_layout(1000.0, 1000.0);
        assert!(approx(c.init_scale().unwrap(), 2.0));
    }

    #[test]
    fn test_initialize_for_image() {
        let mut c = TransformController::default();
        c.initialize_for_image(Vec2::new(800.0, 600.0), Vec2::new(400.0, 100.0));
        let t = c.current_transform();
        assert!(approx(t.scale(), 2.0));
        assert!(approx(t.trans_x, 0.0));
        assert!(approx(t.trans_y, 200.0));
    }

    #[test]
    fn test_uninitialized_operations_are_noops() {
        let mut c = TransformController::default();
        c.apply_scale(2.0, Pos2::new(10.0, 10.0));
        c.apply_pan(Vec2::new(10.0, 10.0));
        c.on_gesture_end();
        c.reconcile();
        assert_eq!(c.current_transform(), ImageTransform::IDENTITY);
        assert_eq!(c.gesture_state(), GestureState::Idle);

        // Viewport but no image
        c.on_layout(100.0, 100.0);
        c.apply_scale(2.0, Pos2::new(10.0, 10.0));
        assert_eq!(c.current_transform(), ImageTransform::IDENTITY);
        assert_eq!(c.bounds().unwrap_err(), ControllerError::UninitializedImage);

        c.clear_image();
        let mut c = TransformController::default();
        c.on_image_changed(50.0, 50.0);
        assert_eq!(c.bounds().unwrap_err(), ControllerError::UninitializedViewport);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let mut c = controller((1000.0, 800.0), (500.0, 500.0));
        c.apply_scale(2.7, Pos2::new(120.0, 650.0));
        c.reconcile();
        let once = c.current_transform();
        c.reconcile();
        assert_eq!(once, c.current_transform());

        c.on_gesture_end();
        c.apply_pan(Vec2::new(-300.0, 75.0));
        c.reconcile();
        let once = c.current_transform();
        c.reconcile();
        assert_eq!(once, c.current_transform());
    }

    #[test]
    fn test_min_scale_clamped_during_pinch() {
        let mut c = controller((1000.0, 1000.0), (500.0, 500.0));
        for _ in 0..20 {
            c.apply_scale(0.5, Pos2::new(500.0, 500.0));
            assert!(c.current_transform().scale() >= 0.8 - 0.001);
        }
        assert!(approx(c.current_transform().scale(), 0.8));
        assert!(c.is_scaling());
    }

    #[test]
    fn test_no_bounce_from_min_stops_at_fit() {
        let mut c = controller((1000.0, 1000.0), (500.0, 500.0));
        c.set_bounce_from_min_scale(false);
        c.apply_scale(0.5, Pos2::new(500.0, 500.0));
        assert!(approx(c.current_transform().scale(), 2.0));
    }

    #[test]
    fn test_overscale_allowed_then_snapped_to_max() {
        let mut c = controller((1000.0, 1000.0), (500.0, 500.0));
        c.apply_scale(5.0, Pos2::new(500.0, 500.0));
        assert!(approx(c.current_transform().scale(), 10.0));

        c.on_gesture_end();
        let t = c.current_transform();
        assert!(approx(t.scale(), 6.0), "scale {}", t.scale());
        assert_eq!(t.scale_x, t.scale_y);
        assert_eq!(c.gesture_state(), GestureState::Idle);

        // Snap keeps the focal point fixed: centered focus, centered image
        assert!(approx(t.trans_x, (1000.0 - 3000.0) / 2.0));
        assert!(approx(t.trans_y, (1000.0 - 3000.0) / 2.0));
    }

    #[test]
    fn test_no_bounce_to_max_clamps_during_pinch() {
        let mut c = controller((1000.0, 1000.0), (500.0, 500.0));
        c.set_bounce_to_max_scale(false);
        c.apply_scale(5.0, Pos2::new(500.0, 500.0));
        assert!(approx(c.current_transform().scale(), 6.0));
    }

    #[test]
    fn test_scale_within_limits_not_snapped() {
        let mut c = controller((1000.0, 1000.0), (500.0, 500.0));
        c.apply_scale(1.5, Pos2::new(200.0, 300.0));
        let before = c.current_transform();
        c.on_gesture_end();
        assert_eq!(before, c.current_transform());
        assert_eq!(c.gesture_state(), GestureState::Idle);
    }

    #[test]
    fn test_pinch_scenario_snaps_back_to_fit() {
        let mut c = controller((1000.0, 1000.0), (500.0, 500.0));
        let t = c.current_transform();
        assert!(approx(t.scale(), 2.0));
        assert!(approx(t.trans_x, 0.0));
        assert!(approx(t.trans_y, 0.0));

        c.apply_scale(0.1, Pos2::new(500.0, 500.0));
        assert!(approx(c.current_transform().scale(), 0.8));

        c.on_gesture_end();
        let t = c.current_transform();
        assert!(approx(t.scale(), 2.0));
        assert!(approx(t.trans_x, 0.0));
        assert!(approx(t.trans_y, 0.0));
        assert_eq!(c.gesture_state(), GestureState::Idle);
    }

    #[test]
    fn test_smaller_axis_forced_to_center_while_scaling() {
        // Wide image: after 1.5x, width overflows but height still fits
        let mut c = controller((1000.0, 1000.0), (1000.0, 250.0));
        c.apply_scale(1.5, Pos2::new(0.0, 0.0));
        let t = c.current_transform();
        let scaled_h = 250.0 * t.scale();
        assert!(approx(t.trans_y, (1000.0 - scaled_h) / 2.0));
        assert!(t.trans_x <= 0.0 && t.trans_x >= 1000.0 - 1000.0 * t.scale());
    }

    /// Viewport 100x100, image 200x200: fit scale 0.5, then zoom to 1.0 so the
    /// image is 200 wide and the translation range is [-100, 0].
    fn zoomed_in() -> TransformController {
        let mut c = controller((100.0, 100.0), (200.0, 200.0));
        c.apply_scale(2.0, Pos2::ZERO);
        c.on_gesture_end();
        assert!(approx(c.current_transform().scale(), 1.0));
        assert!(approx(c.current_transform().trans_x, 0.0));
        c
    }

    #[test]
    fn test_pan_resistance_past_edge() {
        let mut c = zoomed_in();

        // At the left bound, scrolling by -40 pushes the image further right
        c.apply_pan(Vec2::new(-40.0, 0.0));
        assert!(approx(c.current_transform().trans_x, 10.0));
        assert_eq!(c.gesture_state(), GestureState::Dragging);

        // Moving back toward the in-bounds range is applied unreduced
        c.apply_pan(Vec2::new(30.0, 0.0));
        assert!(approx(c.current_transform().trans_x, -20.0));
    }

    #[test]
    fn test_pan_inside_bounds_unreduced() {
        let mut c = zoomed_in();
        c.apply_pan(Vec2::new(30.0, 45.0));
        let t = c.current_transform();
        assert!(approx(t.trans_x, -30.0));
        assert!(approx(t.trans_y, -45.0));
    }

    #[test]
    fn test_pan_without_translation_bounce_stops_at_edge() {
        let mut c = zoomed_in();
        c.set_bounce_from_translation(false);
        c.apply_pan(Vec2::new(-40.0, 0.0));
        assert!(approx(c.current_transform().trans_x, 0.0));

        // A move that would cross the far edge is clamped immediately
        c.apply_pan(Vec2::new(150.0, 0.0));
        assert!(approx(c.current_transform().trans_x, -100.0));
    }

    #[test]
    fn test_pan_on_fitting_axis_ignored() {
        let mut c = controller((1000.0, 1000.0), (500.0, 500.0));
        let before = c.current_transform();
        c.apply_pan(Vec2::new(25.0, -60.0));
        assert_eq!(before, c.current_transform());
    }

    #[test]
    fn test_drag_end_snaps_to_nearest_edge() {
        // 100 viewport, 105 scaled image: diff = -5
        let mut c = controller((100.0, 100.0), (100.0, 100.0));
        c.apply_scale(1.05, Pos2::ZERO);
        c.on_gesture_end();

        c.transform.trans_x = 15.0;
        c.state = GestureState::Dragging;
        c.on_gesture_end();
        assert!(approx(c.current_transform().trans_x, 0.0));
        assert_eq!(c.gesture_state(), GestureState::Idle);

        c.transform.trans_x = -12.0;
        c.state = GestureState::Dragging;
        c.on_gesture_end();
        assert!(approx(c.current_transform().trans_x, -5.0));

        c.transform.trans_x = -2.0;
        c.state = GestureState::Dragging;
        c.on_gesture_end();
        assert!(approx(c.current_transform().trans_x, -2.0));
    }

    #[test]
    fn test_drag_release_after_resistance() {
        let mut c = zoomed_in();
        c.apply_pan(Vec2::new(-40.0, -80.0));
        assert!(c.current_transform().trans_x > 0.0);
        c.on_gesture_end();
        let t = c.current_transform();
        assert!(approx(t.trans_x, 0.0));
        assert!(approx(t.trans_y, 0.0));
    }

    #[test]
    fn test_pan_ignored_while_scaling() {
        let mut c = zoomed_in();
        c.apply_scale(1.2, Pos2::new(50.0, 50.0));
        let before = c.current_transform();
        c.apply_pan(Vec2::new(10.0, 10.0));
        assert_eq!(before, c.current_transform());
        assert!(c.is_scaling());
    }

    #[test]
    fn test_scale_releases_unfinished_drag() {
        let mut c = zoomed_in();
        c.apply_pan(Vec2::new(-40.0, 0.0));
        assert!(approx(c.current_transform().trans_x, 10.0));

        c.apply_scale(1.0, Pos2::new(50.0, 50.0));
        assert!(c.is_scaling());
        assert!(approx(c.current_transform().trans_x, 0.0));
    }

    #[test]
    fn test_new_image_resets_transform() {
        let mut c = zoomed_in();
        c.apply_pan(Vec2::new(30.0, 30.0));
        c.on_image_changed(400.0, 100.0);
        let t = c.current_transform();
        assert!(approx(t.scale(), 0.25));
        assert!(approx(t.trans_x, 0.0));
        assert!(approx(t.trans_y, (100.0 - 25.0) / 2.0));
        assert_eq!(c.gesture_state(), GestureState::Idle);
    }

    #[test]
    fn test_reset_returns_to_fit() {
        let mut c = zoomed_in();
        c.apply_pan(Vec2::new(30.0, 30.0));
        c.reset();
        let t = c.current_transform();
        assert!(approx(t.scale(), 0.5));
        assert!(approx(t.trans_x, 0.0));
        assert!(approx(c.relative_scale().unwrap(), 1.0));
    }

    #[test]
    fn test_inverted_limits_do_not_panic() {
        let mut c = controller((1000.0, 1000.0), (500.0, 500.0));
        c.set_config(ZoomConfig {
            min_scale: 5.0,
            max_scale: 0.5,
            bounce_to_max_scale: false,
            ..ZoomConfig::default()
        });
        c.apply_scale(1.1, Pos2::new(500.0, 500.0));
        // max applied after min: the upper limit wins
        assert!(approx(c.current_transform().scale(), 1.0));
        c.on_gesture_end();
        assert!(c.current_transform().scale().is_finite());
    }
}
