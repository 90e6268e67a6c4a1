//! Scale and translation limits for the zoomable image
//!
//! All scale values are multipliers of the fit-to-view scale, so the same
//! config works for any image/viewport pair.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default lower scale bound during a pinch (40% of fit-to-view)
pub const DEFAULT_MIN_SCALE: f32 = 0.4;
/// Default upper scale bound (300% of fit-to-view)
pub const DEFAULT_MAX_SCALE: f32 = 3.0;
/// Default share of a drag applied once the image is past an edge
pub const DEFAULT_TRANSLATION_STICKY_FACTOR: f32 = 0.25;

/// Configuration surface of the transform controller.
///
/// Values are not validated. Inverted or negative limits produce whatever the
/// clamping arithmetic yields; see [`ZoomConfig::has_inverted_limits`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ZoomConfig {
    /// Lowest scale reachable during a pinch when bouncing from min scale
    pub min_scale: f32,
    /// Highest scale kept after a pinch ends
    pub max_scale: f32,
    /// Multiplier on drag distance while the image is past an edge
    pub translation_sticky_factor: f32,
    /// Allow pinching below fit-to-view, snapping back on release
    pub bounce_from_min_scale: bool,
    /// Allow pinching above `max_scale`, snapping back on release
    pub bounce_to_max_scale: bool,
    /// Allow dragging past the edges with resistance, snapping back on release
    pub bounce_from_translation: bool,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min_scale: DEFAULT_MIN_SCALE,
            max_scale: DEFAULT_MAX_SCALE,
            translation_sticky_factor: DEFAULT_TRANSLATION_STICKY_FACTOR,
            bounce_from_min_scale: true,
            bounce_to_max_scale: true,
            bounce_from_translation: true,
        }
    }
}

impl ZoomConfig {
    /// Parse a config from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Whether the limits are inverted or negative. Such configs are used
    /// as-is; this only lets callers flag them.
    pub fn has_inverted_limits(&self) -> bool {
        self.min_scale > self.max_scale || self.min_scale < 0.0 || self.max_scale < 0.0
    }
}
