//! Demo eframe application hosting a single zoomable image

use std::cell::RefCell;
use std::rc::Rc;

use egui::ColorImage;
use wasm_bindgen::JsValue;

use crate::transform::ImageTransform;
use crate::widget::ZoomableImage;
use crate::JsCallbacks;

/// Side length of the demo checkerboard in pixels
const DEMO_IMAGE_SIZE: usize = 512;
/// Side length of one checkerboard square
const DEMO_SQUARE: usize = 32;

/// Checkerboard with a gradient tint, shown until JS provides an image
pub fn demo_image() -> ColorImage {
    let size = DEMO_IMAGE_SIZE;
    let mut rgba = Vec::with_capacity(size * size * 4);
    for y in 0..size {
        for x in 0..size {
            let dark = (x / DEMO_SQUARE + y / DEMO_SQUARE) % 2 == 0;
            let base: u8 = if dark { 60 } else { 200 };
            let tint = (x * 255 / size) as u8;
            rgba.extend_from_slice(&[base, base / 2 + tint / 2, 255 - tint, 255]);
        }
    }
    ColorImage::from_rgba_unmultiplied([size, size], &rgba)
}

/// The egui application for the demo
pub struct ZoomApp {
    widget: Rc<RefCell<ZoomableImage>>,
    callbacks: Rc<RefCell<JsCallbacks>>,
}

impl ZoomApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        widget: Rc<RefCell<ZoomableImage>>,
        callbacks: Rc<RefCell<JsCallbacks>>,
    ) -> Self {
        {
            let mut widget = widget.borrow_mut();
            if !widget.has_image() {
                widget.set_image(demo_image());
            }
        }
        Self { widget, callbacks }
    }
}

impl eframe::App for ZoomApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let size = ui.available_size();
                let output = self.widget.borrow_mut().show(ui, size);

                // No RefCell is borrowed while JS runs, so handlers may call
                // back into the handle
                if output.clicked || output.long_pressed {
                    if let Some(callback) = JsCallbacks::click_handler(&self.callbacks) {
                        if output.clicked {
                            notify_click(&callback, output.pixel, false);
                        }
                        if output.long_pressed {
                            notify_click(&callback, output.pixel, true);
                        }
                    }
                }
                if output.transform_changed {
                    if let Some(callback) = JsCallbacks::transform_handler(&self.callbacks) {
                        let transform = self.widget.borrow().transform();
                        notify_transform(&callback, &transform);
                    }
                }
            });
    }
}

/// Send `{ x, y, longPress }` to the click handler
fn notify_click(callback: &js_sys::Function, pixel: Option<(u32, u32)>, long_press: bool) {
    let event = js_sys::Object::new();
    let (x, y) = match pixel {
        Some((x, y)) => (JsValue::from(x), JsValue::from(y)),
        None => (JsValue::NULL, JsValue::NULL),
    };
    let fields = [
        ("x", x),
        ("y", y),
        ("longPress", JsValue::from_bool(long_press)),
    ];
    for (key, value) in fields {
        if js_sys::Reflect::set(&event, &JsValue::from_str(key), &value).is_err() {
            log::warn!("failed to build click event");
            return;
        }
    }
    if let Err(err) = callback.call1(&JsValue::NULL, &event) {
        log::warn!("onClick callback failed: {err:?}");
    }
}

fn notify_transform(callback: &js_sys::Function, transform: &ImageTransform) {
    let payload = serde_json::to_string(transform)
        .map_err(|err| JsValue::from_str(&err.to_string()))
        .and_then(|json| js_sys::JSON::parse(&json));
    match payload {
        Ok(value) => {
            if let Err(err) = callback.call1(&JsValue::NULL, &value) {
                log::warn!("onTransformChange callback failed: {err:?}");
            }
        }
        Err(err) => log::warn!("failed to serialize transform: {err:?}"),
    }
}
