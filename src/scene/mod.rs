//! Time-driven decorative scene
//!
//! Pose math is pure: every entity's pose is a function of the animator's
//! phase time and its own parameters. Drawing is delegated to a `Renderer`,
//! which receives one snapshot per frame and owns no animation state.
//! - No per-tick accumulation (poses never drift)
//! - One time sample per frame for every entity
//! - No rendering or platform dependencies

pub mod animator;
pub mod entity;
pub mod layout;
pub mod pose;

pub use animator::{Camera, EntityPose, Frame, PhaseClock, Renderer, SceneAnimator};
pub use entity::{EntityId, EntityKind, FloatOscillation, PoseFn, SceneEntity};
pub use layout::{SKILLS, portfolio_scene};
pub use pose::Pose;
