//! Host callbacks registered on a viewer
//!
//! The registry lives in a `RefCell` shared between the app and the handle the
//! host holds. A handler is cloned out before it runs, so it may re-register
//! or clear handlers without hitting an outstanding borrow.

use std::cell::RefCell;

/// Handlers registered by the host. `F` is the host's function type
/// (`js_sys::Function` in the browser).
pub struct ZoomCallbacks<F> {
    /// Called when the user taps the image: { x, y, longPress }
    pub on_click: Option<F>,
    /// Called when the transform changes: { scaleX, scaleY, transX, transY }
    pub on_transform_change: Option<F>,
}

impl<F> Default for ZoomCallbacks<F> {
    fn default() -> Self {
        Self {
            on_click: None,
            on_transform_change: None,
        }
    }
}

impl<F: Clone> ZoomCallbacks<F> {
    /// The click handler, with the registry borrow already released
    pub fn click_handler(registry: &RefCell<Self>) -> Option<F> {
        registry.borrow().on_click.clone()
    }

    /// The transform-change handler, with the registry borrow already released
    pub fn transform_handler(registry: &RefCell<Self>) -> Option<F> {
        registry.borrow().on_transform_change.clone()
    }
}

impl<F> ZoomCallbacks<F> {
    /// Drop all handlers
    pub fn clear(&mut self) {
        self.on_click = None;
        self.on_transform_change = None;
    }
}
