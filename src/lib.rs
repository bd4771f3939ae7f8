//! Portfolio FX - interaction and animation core for a single-page portfolio
//!
//! Core modules:
//! - `typing`: Cyclic phrase typing/deleting state machine
//! - `timer`: Cancellable timer host abstraction (virtual + browser)
//! - `reveal`: One-shot scroll-reveal tracking
//! - `tilt`: Pointer-driven 3D card tilt
//! - `device`: Viewport classification into immutable device profiles
//! - `scene`: Time-driven orbital scene animation (pure pose math)
//! - `settings`: Tuning defaults and settings JSON validation
//! - `platform`: Browser bindings (wasm32 only)

pub mod device;
pub mod error;
pub mod reveal;
pub mod scene;
pub mod settings;
pub mod tilt;
pub mod timer;
pub mod typing;

#[cfg(target_arch = "wasm32")]
pub mod platform;

pub use device::{DeviceClass, DeviceProfile, DeviceProfileSelector};
pub use error::{ConfigError, Result};
pub use reveal::{RegionId, ViewportRevealTracker};
pub use scene::{Camera, Frame, Pose, Renderer, SceneAnimator, SceneEntity};
pub use settings::MotionSettings;
pub use tilt::{BoundingBox, CardId, PointerTiltTracker, Tilt};
pub use timer::{TimerHost, TimerId, VirtualTimers};
pub use typing::{TypingEffect, TypingPhase};

use glam::Vec3;

/// Tuning constants
pub mod consts {
    /// Delay between typed characters
    pub const TYPE_INTERVAL_MS: u32 = 150;
    /// Delay between deleted characters
    pub const DELETE_INTERVAL_MS: u32 = 100;
    /// Hold time once a phrase is fully typed
    pub const PAUSE_MS: u32 = 1500;

    /// Visible fraction at which a region counts as revealed
    pub const REVEAL_THRESHOLD: f32 = 0.1;

    /// Tilt divisor (pixels of pointer offset per degree of rotation)
    pub const TILT_SENSITIVITY: f32 = 10.0;
    /// CSS perspective distance for tilted cards
    pub const TILT_PERSPECTIVE_PX: f32 = 1000.0;

    /// Viewports narrower than this are mobile
    pub const MOBILE_BREAKPOINT_PX: u32 = 768;

    /// Humanoid idle sway
    pub const SWAY_RATE: f32 = 0.2;
    pub const SWAY_AMPLITUDE: f32 = 0.1;
}

/// Offset on a horizontal (XZ-plane) circle of `radius` at `angle`
#[inline]
pub fn orbit_offset(radius: f32, angle: f32) -> Vec3 {
    Vec3::new(radius * angle.cos(), 0.0, radius * angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orbit_offset_stays_in_plane() {
        let p = orbit_offset(2.0, 1.3);
        assert_eq!(p.y, 0.0);
        assert!((p.length() - 2.0).abs() < 1e-5);
    }
}
