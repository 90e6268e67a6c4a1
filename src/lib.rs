//! zoomview - a pinch-zoomable image widget for egui, with a browser demo host
//!
//! The widget keeps an image fitted to its viewport and lets the user pinch
//! and drag it within configurable bounds. Gestures may overshoot the bounds
//! with resistance and bounce back when released.
//!
//! ## Architecture
//!
//! - `TransformController`: gesture state machine owning the scale/translation
//! - `ZoomableImage`: self-contained egui widget driving a controller
//! - `ZoomApp`: thin eframe App shell that hosts the widget (wasm32)
//! - `ZoomViewHandle`: WASM interface for JavaScript to control the viewer

#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
#[cfg(target_arch = "wasm32")]
use web_sys::HtmlCanvasElement;

#[cfg(target_arch = "wasm32")]
mod app;
pub mod callbacks;
pub mod config;
pub mod controller;
pub mod error;
pub mod tap;
pub mod transform;
pub mod widget;

pub use callbacks::ZoomCallbacks;
pub use config::ZoomConfig;
pub use controller::{GestureState, TransformController};
pub use error::{ConfigError, ControllerError};
pub use tap::TapSuppressor;
pub use transform::ImageTransform;
pub use widget::{ZoomResponse, ZoomableImage};

#[cfg(target_arch = "wasm32")]
use app::ZoomApp;

/// Callback registry holding JavaScript functions
#[cfg(target_arch = "wasm32")]
pub type JsCallbacks = ZoomCallbacks<js_sys::Function>;

/// A handle to a viewer instance. Each handle manages its own canvas and state.
///
/// This struct is exposed to JavaScript. It holds an Rc to the widget so it
/// can call methods on it, and also stores the eframe runner for the
/// application lifecycle.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub struct ZoomViewHandle {
    /// The widget instance (shared with ZoomApp)
    widget: Rc<RefCell<ZoomableImage>>,
    /// Callbacks registered from JavaScript
    callbacks: Rc<RefCell<JsCallbacks>>,
    /// The eframe runner (kept alive to maintain the render loop)
    runner: eframe::WebRunner,
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl ZoomViewHandle {
    /// Create a new viewer attached to the given canvas element, with an
    /// optional JSON config (camelCase keys, missing keys take defaults).
    /// Returns a promise that resolves to a ZoomViewHandle.
    #[wasm_bindgen]
    pub async fn create(canvas: HtmlCanvasElement, config_json: Option<String>) -> Result<ZoomViewHandle, JsValue> {
        #[cfg(debug_assertions)]
        {
            eframe::WebLogger::init(log::LevelFilter::Debug).ok();
        }
        #[cfg(not(debug_assertions))]
        {
            eframe::WebLogger::init(log::LevelFilter::Warn).ok();
        }

        let config = match config_json {
            Some(json) => ZoomConfig::from_json(&json).map_err(|err| JsValue::from_str(&err.to_string()))?,
            None => ZoomConfig::default(),
        };

        // Create the widget that will be shared between the handle and the app
        let widget = Rc::new(RefCell::new(ZoomableImage::new(config)));
        let widget_for_app = widget.clone();

        let callbacks = Rc::new(RefCell::new(JsCallbacks::default()));
        let callbacks_for_app = callbacks.clone();

        let web_options = eframe::WebOptions::default();
        let runner = eframe::WebRunner::new();

        runner
            .start(
                canvas,
                web_options,
                Box::new(move |cc| Ok(Box::new(ZoomApp::new(cc, widget_for_app.clone(), callbacks_for_app.clone())))),
            )
            .await?;

        Ok(ZoomViewHandle { widget, callbacks, runner })
    }

    /// Set the image to display from straight RGBA bytes (4 bytes per pixel,
    /// row-major). The view resets to fit-to-view.
    #[wasm_bindgen(js_name = setImageRgba)]
    pub fn set_image_rgba(&self, buffer: &js_sys::ArrayBuffer, width: u32, height: u32) -> Result<(), JsValue> {
        let bytes = js_sys::Uint8Array::new(buffer).to_vec();

        let expected_len = (width as usize) * (height as usize) * 4;
        if bytes.len() != expected_len {
            return Err(JsValue::from_str(&format!(
                "Buffer size mismatch: expected {} bytes ({}x{} RGBA), got {}",
                expected_len,
                width,
                height,
                bytes.len()
            )));
        }

        let image = egui::ColorImage::from_rgba_unmultiplied([width as usize, height as usize], &bytes);
        self.widget.borrow_mut().set_image(image);
        Ok(())
    }

    /// Remove the current image
    #[wasm_bindgen(js_name = clearImage)]
    pub fn clear_image(&self) {
        self.widget.borrow_mut().clear_image();
    }

    /// End event loop and release resources
    #[wasm_bindgen(js_name = destroy)]
    pub fn destroy(&self) {
        self.runner.destroy();
    }

    /// Return to fit-to-view, centered
    #[wasm_bindgen(js_name = resetView)]
    pub fn reset_view(&self) {
        self.widget.borrow_mut().reset_view();
    }

    /// Get the current transform as [scaleX, scaleY, transX, transY]
    #[wasm_bindgen(js_name = getTransform)]
    pub fn get_transform(&self) -> js_sys::Float32Array {
        let t = self.widget.borrow().transform();
        let result = js_sys::Float32Array::new_with_length(4);
        result.copy_from(&[t.scale_x, t.scale_y, t.trans_x, t.trans_y]);
        result
    }

    /// Fit-to-view scale, undefined until the image has been laid out
    #[wasm_bindgen(js_name = getInitScale)]
    pub fn get_init_scale(&self) -> Option<f32> {
        self.widget.borrow().controller().init_scale()
    }

    /// Current gesture: "idle", "dragging" or "scaling"
    #[wasm_bindgen(js_name = getGestureState)]
    pub fn get_gesture_state(&self) -> String {
        self.widget.borrow().controller().gesture_state().name().to_string()
    }

    #[wasm_bindgen(js_name = isScaling)]
    pub fn is_scaling(&self) -> bool {
        self.widget.borrow().controller().is_scaling()
    }

    // =========================================================================
    // Config getters and setters
    // =========================================================================

    /// Replace the whole config from JSON
    #[wasm_bindgen(js_name = setConfig)]
    pub fn set_config(&self, json: &str) -> Result<(), JsValue> {
        let config = ZoomConfig::from_json(json).map_err(|err| JsValue::from_str(&err.to_string()))?;
        self.widget.borrow_mut().controller_mut().set_config(config);
        Ok(())
    }

    /// Current config as JSON
    #[wasm_bindgen(js_name = getConfig)]
    pub fn get_config(&self) -> Result<String, JsValue> {
        self.widget
            .borrow()
            .controller()
            .config()
            .to_json()
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }

    #[wasm_bindgen(js_name = getMinScale)]
    pub fn get_min_scale(&self) -> f32 {
        self.widget.borrow().controller().config().min_scale
    }

    /// Lowest pinch scale, as a multiple of fit-to-view
    #[wasm_bindgen(js_name = setMinScale)]
    pub fn set_min_scale(&self, min_scale: f32) {
        self.widget.borrow_mut().controller_mut().set_min_scale(min_scale);
    }

    #[wasm_bindgen(js_name = getMaxScale)]
    pub fn get_max_scale(&self) -> f32 {
        self.widget.borrow().controller().config().max_scale
    }

    /// Highest scale kept after release, as a multiple of fit-to-view
    #[wasm_bindgen(js_name = setMaxScale)]
    pub fn set_max_scale(&self, max_scale: f32) {
        self.widget.borrow_mut().controller_mut().set_max_scale(max_scale);
    }

    #[wasm_bindgen(js_name = getTranslationStickyFactor)]
    pub fn get_translation_sticky_factor(&self) -> f32 {
        self.widget.borrow().controller().config().translation_sticky_factor
    }

    #[wasm_bindgen(js_name = setTranslationStickyFactor)]
    pub fn set_translation_sticky_factor(&self, factor: f32) {
        self.widget.borrow_mut().controller_mut().set_translation_sticky_factor(factor);
    }

    #[wasm_bindgen(js_name = getBounceFromMinScale)]
    pub fn get_bounce_from_min_scale(&self) -> bool {
        self.widget.borrow().controller().config().bounce_from_min_scale
    }

    #[wasm_bindgen(js_name = setBounceFromMinScale)]
    pub fn set_bounce_from_min_scale(&self, bounce: bool) {
        self.widget.borrow_mut().controller_mut().set_bounce_from_min_scale(bounce);
    }

    #[wasm_bindgen(js_name = getBounceToMaxScale)]
    pub fn get_bounce_to_max_scale(&self) -> bool {
        self.widget.borrow().controller().config().bounce_to_max_scale
    }

    #[wasm_bindgen(js_name = setBounceToMaxScale)]
    pub fn set_bounce_to_max_scale(&self, bounce: bool) {
        self.widget.borrow_mut().controller_mut().set_bounce_to_max_scale(bounce);
    }

    #[wasm_bindgen(js_name = getBounceFromTranslation)]
    pub fn get_bounce_from_translation(&self) -> bool {
        self.widget.borrow().controller().config().bounce_from_translation
    }

    #[wasm_bindgen(js_name = setBounceFromTranslation)]
    pub fn set_bounce_from_translation(&self, bounce: bool) {
        self.widget.borrow_mut().controller_mut().set_bounce_from_translation(bounce);
    }

    // =========================================================================
    // Callback registration
    // =========================================================================

    /// Register a callback for taps and long presses that were not part of a
    /// pan or pinch. Receives { x, y, longPress } in image pixel coordinates
    /// (x and y are null when the tap missed the image).
    #[wasm_bindgen(js_name = onClick)]
    pub fn on_click(&self, callback: js_sys::Function) {
        self.callbacks.borrow_mut().on_click = Some(callback);
    }

    /// Register a callback receiving { scaleX, scaleY, transX, transY }
    /// whenever the transform changes.
    #[wasm_bindgen(js_name = onTransformChange)]
    pub fn on_transform_change(&self, callback: js_sys::Function) {
        self.callbacks.borrow_mut().on_transform_change = Some(callback);
    }

    /// Clear all registered callbacks.
    #[wasm_bindgen(js_name = clearCallbacks)]
    pub fn clear_callbacks(&self) {
        self.callbacks.borrow_mut().clear();
    }
}
