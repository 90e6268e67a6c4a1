//! Tap and long-press pass-through while zooming
//!
//! Ordinary click handling must not fire for a touch that turned into a pan
//! or a pinch. [`TapSuppressor`] watches one touch sequence and cancels tap
//! recognition once the pointer strays too far or a second finger lands.

use egui::Pos2;

/// Movement (in logical points) beyond which a touch is no longer a tap
pub const TAP_SLOP: f32 = 20.0;

/// Tracks whether the current touch sequence may still count as a tap
#[derive(Clone, Copy, Debug, Default)]
pub struct TapSuppressor {
    /// Where the current touch started
    origin: Option<Pos2>,
    /// Set once the touch moved past the slop or went multi-touch
    cancelled: bool,
}

impl TapSuppressor {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new touch sequence starts; tap recognition is re-armed.
    pub fn press(&mut self, pos: Pos2) {
        self.origin = Some(pos);
        self.cancelled = false;
    }

    /// Pointer moved during the touch
    pub fn moved(&mut self, pos: Pos2) {
        if let Some(origin) = self.origin {
            if origin.distance(pos) > TAP_SLOP {
                self.cancelled = true;
            }
        }
    }

    /// A second touch point landed
    pub fn extra_pointer(&mut self) {
        self.cancelled = true;
    }

    /// Whether a click or long-press for this touch should be delivered
    pub fn allows_tap(&self) -> bool {
        !self.cancelled
    }
}
