//! Scale/translate transform mapping an image into its viewport
//!
//! This module contains pure coordinate transformation logic that can be
//! easily unit tested without a running egui context.

use egui::{Pos2, Rect, Vec2};

/// Uniform scale plus translation, the subset of a 3x3 affine matrix the
/// zoomable image uses (no rotation, no skew).
///
/// Screen position of an image point `p` is `p * scale + trans`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageTransform {
    pub scale_x: f32,
    pub scale_y: f32,
    /// Translation in viewport pixels
    pub trans_x: f32,
    pub trans_y: f32,
}

impl Default for ImageTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ImageTransform {
    pub const IDENTITY: Self = Self {
        scale_x: 1.0,
        scale_y: 1.0,
        trans_x: 0.0,
        trans_y: 0.0,
    };

    /// Create a transform with a uniform scale and the given translation
    pub fn new(scale: f32, translation: Vec2) -> Self {
        Self {
            scale_x: scale,
            scale_y: scale,
            trans_x: translation.x,
            trans_y: translation.y,
        }
    }

    /// Current uniform scale
    pub fn scale(&self) -> f32 {
        self.scale_x
    }

    /// Overwrite both scale components
    pub fn set_scale(&mut self, scale: f32) {
        self.scale_x = scale;
        self.scale_y = scale;
    }

    pub fn translation(&self) -> Vec2 {
        Vec2::new(self.trans_x, self.trans_y)
    }

    /// Scale by `factor` about a focus point given in viewport coordinates.
    /// The point under `focus` stays under `focus`.
    ///
    /// The math: translate so focus is the origin, scale, translate back:
    ///   trans_new = trans_old * factor + focus * (1 - factor)
    pub fn post_scale(&mut self, factor: f32, focus: Pos2) {
        self.scale_x *= factor;
        self.scale_y *= factor;
        self.trans_x = self.trans_x * factor + focus.x * (1.0 - factor);
        self.trans_y = self.trans_y * factor + focus.y * (1.0 - factor);
    }

    /// Apply a translation delta (in viewport pixels)
    pub fn post_translate(&mut self, delta: Vec2) {
        self.trans_x += delta.x;
        self.trans_y += delta.y;
    }

    /// Size of the image once scaled into the viewport
    pub fn scaled_size(&self, image_size: Vec2) -> Vec2 {
        Vec2::new(image_size.x * self.scale_x, image_size.y * self.scale_y)
    }

    /// Calculate the display rect for the image, where `origin` is the
    /// top-left corner of the viewport in screen coordinates.
    pub fn image_rect(&self, origin: Pos2, image_size: Vec2) -> Rect {
        Rect::from_min_size(origin + self.translation(), self.scaled_size(image_size))
    }

    /// Convert a viewport position to image pixel coordinates.
    /// Returns `None` outside the image, or when the transform is degenerate
    /// (zero, negative or non-finite components).
    pub fn screen_to_image(&self, viewport_pos: Pos2, image_size: (u32, u32)) -> Option<(u32, u32)> {
        let usable_scale = |scale: f32| scale.is_finite() && scale > 0.0;
        if !usable_scale(self.scale_x) || !usable_scale(self.scale_y) {
            return None;
        }

        let x = (viewport_pos.x - self.trans_x) / self.scale_x;
        let y = (viewport_pos.y - self.trans_y) / self.scale_y;

        // NaN fails every comparison, so it must be rejected explicitly
        if !x.is_finite() || !y.is_finite() || x < 0.0 || y < 0.0 {
            return None;
        }

        let img_x = x.floor() as u32;
        let img_y = y.floor() as u32;

        if img_x < image_size.0 && img_y < image_size.1 {
            Some((img_x, img_y))
        } else {
            None
        }
    }
}
