//! Scene entities and their pose functions

use std::sync::Arc;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::pose::Pose;
use crate::orbit_offset;

/// Handle assigned at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Vertical bobbing applied on top of a base position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloatOscillation {
    /// Radians per second
    pub speed: f32,
    /// Peak offset in scene units
    pub amplitude: f32,
}

impl FloatOscillation {
    pub const NONE: Self = Self {
        speed: 0.0,
        amplitude: 0.0,
    };

    #[inline]
    pub fn offset(&self, t: f32) -> f32 {
        (t * self.speed).sin() * self.amplitude
    }
}

/// Entity variants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Idle sway around the Y axis
    Humanoid { sway_rate: f32, sway_amplitude: f32 },
    /// Steady Y spin plus X wobble
    HologramCore {
        spin_rate: f32,
        wobble_rate: f32,
        wobble_amplitude: f32,
    },
    /// Revolves around its base position in the XZ plane
    OrbitMarker {
        orbit_radius: f32,
        /// Radians per second
        orbit_speed: f32,
        /// Starting angle, lets several markers share one orbit
        phase: f32,
        /// Optional spin about its own Y axis (radians per second)
        self_spin: Option<f32>,
    },
    /// Slow yaw with a vertical float
    FloatingModel {
        yaw_rate: f32,
        float: FloatOscillation,
    },
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Humanoid { .. } => "humanoid",
            EntityKind::HologramCore { .. } => "hologram",
            EntityKind::OrbitMarker { .. } => "orbit-marker",
            EntityKind::FloatingModel { .. } => "floating-model",
        }
    }

    /// Pose at phase time `t` for an entity based at `base`
    pub fn pose(&self, t: f32, base: Vec3, scale: f32) -> Pose {
        match *self {
            EntityKind::Humanoid {
                sway_rate,
                sway_amplitude,
            } => humanoid_pose(t, base, scale, sway_rate, sway_amplitude),
            EntityKind::HologramCore {
                spin_rate,
                wobble_rate,
                wobble_amplitude,
            } => hologram_pose(t, base, scale, spin_rate, wobble_rate, wobble_amplitude),
            EntityKind::OrbitMarker {
                orbit_radius,
                orbit_speed,
                phase,
                self_spin,
            } => orbit_pose(t, base, scale, orbit_radius, orbit_speed, phase, self_spin),
            EntityKind::FloatingModel { yaw_rate, float } => {
                floating_pose(t, base, scale, yaw_rate, float)
            }
        }
    }
}

fn humanoid_pose(t: f32, base: Vec3, scale: f32, sway_rate: f32, sway_amplitude: f32) -> Pose {
    Pose::at(base, scale).with_rotation(Vec3::new(0.0, (t * sway_rate).sin() * sway_amplitude, 0.0))
}

fn hologram_pose(
    t: f32,
    base: Vec3,
    scale: f32,
    spin_rate: f32,
    wobble_rate: f32,
    wobble_amplitude: f32,
) -> Pose {
    let wobble = (t * wobble_rate).sin() * wobble_amplitude;
    Pose::at(base, scale).with_rotation(Vec3::new(wobble, t * spin_rate, 0.0))
}

fn orbit_pose(
    t: f32,
    base: Vec3,
    scale: f32,
    orbit_radius: f32,
    orbit_speed: f32,
    phase: f32,
    self_spin: Option<f32>,
) -> Pose {
    let angle = phase + t * orbit_speed;
    let spin = self_spin.map_or(0.0, |rate| t * rate);
    Pose::at(base + orbit_offset(orbit_radius, angle), scale)
        .with_rotation(Vec3::new(0.0, spin, 0.0))
}

fn floating_pose(t: f32, base: Vec3, scale: f32, yaw_rate: f32, float: FloatOscillation) -> Pose {
    let position = base + Vec3::Y * float.offset(t);
    Pose::at(position, scale).with_rotation(Vec3::new(0.0, t * yaw_rate, 0.0))
}

/// Pose at phase time `t`, with the variant and its parameters already bound
pub type PoseFn = Arc<dyn Fn(f32) -> Pose + Send + Sync>;

/// A registered decorative entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneEntity {
    /// Display label (e.g. skill name)
    pub name: String,
    pub kind: EntityKind,
    pub base_position: Vec3,
    pub scale: f32,
    /// 0xRRGGBB
    pub color: u32,
}

impl SceneEntity {
    pub fn new(name: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            name: name.into(),
            kind,
            base_position: Vec3::ZERO,
            scale: 1.0,
            color: 0xFFFFFF,
        }
    }

    pub fn at(mut self, base_position: Vec3) -> Self {
        self.base_position = base_position;
        self
    }

    pub fn scaled(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn colored(mut self, color: u32) -> Self {
        self.color = color;
        self
    }

    #[inline]
    pub fn pose(&self, t: f32) -> Pose {
        self.kind.pose(t, self.base_position, self.scale)
    }

    /// Select the variant's pose function once; calling it never re-matches
    pub fn pose_fn(&self) -> PoseFn {
        let base = self.base_position;
        let scale = self.scale;
        match self.kind {
            EntityKind::Humanoid {
                sway_rate,
                sway_amplitude,
            } => Arc::new(move |t| humanoid_pose(t, base, scale, sway_rate, sway_amplitude)),
            EntityKind::HologramCore {
                spin_rate,
                wobble_rate,
                wobble_amplitude,
            } => Arc::new(move |t| {
                hologram_pose(t, base, scale, spin_rate, wobble_rate, wobble_amplitude)
            }),
            EntityKind::OrbitMarker {
                orbit_radius,
                orbit_speed,
                phase,
                self_spin,
            } => Arc::new(move |t| {
                orbit_pose(t, base, scale, orbit_radius, orbit_speed, phase, self_spin)
            }),
            EntityKind::FloatingModel { yaw_rate, float } => {
                Arc::new(move |t| floating_pose(t, base, scale, yaw_rate, float))
            }
        }
    }

    /// CSS hex color, e.g. `#61DAFB`
    pub fn css_color(&self) -> String {
        format!("#{:06X}", self.color & 0xFFFFFF)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{SWAY_AMPLITUDE, SWAY_RATE};

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_orbit_position_at_ten_seconds() {
        let marker = SceneEntity::new(
            "React",
            EntityKind::OrbitMarker {
                orbit_radius: 2.5,
                orbit_speed: 0.5,
                phase: 0.0,
                self_spin: None,
            },
        );
        let pose = marker.pose(10.0);
        assert!(approx(pose.position.x, 0.709));
        assert_eq!(pose.position.y, 0.0);
        assert!(approx(pose.position.z, -2.397));
        assert_eq!(pose.rotation, Vec3::ZERO);
    }

    #[test]
    fn test_orbit_is_relative_to_base() {
        let kind = EntityKind::OrbitMarker {
            orbit_radius: 1.0,
            orbit_speed: 1.0,
            phase: 0.0,
            self_spin: Some(2.0),
        };
        let pose = SceneEntity::new("m", kind).at(Vec3::new(0.0, 3.0, 0.0)).pose(0.0);
        assert_eq!(pose.position, Vec3::new(1.0, 3.0, 0.0));

        let spun = SceneEntity::new("m", kind).pose(1.5);
        assert!(approx(spun.rotation.y, 3.0));
    }

    #[test]
    fn test_humanoid_sway() {
        let figure = SceneEntity::new(
            "figure",
            EntityKind::Humanoid {
                sway_rate: SWAY_RATE,
                sway_amplitude: SWAY_AMPLITUDE,
            },
        )
        .at(Vec3::new(0.0, -1.0, 0.0));
        let pose = figure.pose(4.0);
        assert!(approx(pose.rotation.y, (4.0f32 * 0.2).sin() * 0.1));
        assert_eq!(pose.position, Vec3::new(0.0, -1.0, 0.0));
        // Sway is bounded by the amplitude
        assert!((0..200).all(|i| figure.pose(i as f32 * 0.37).rotation.y.abs() <= 0.1 + 1e-6));
    }

    #[test]
    fn test_hologram_spin_and_wobble() {
        let core = SceneEntity::new(
            "core",
            EntityKind::HologramCore {
                spin_rate: 0.5,
                wobble_rate: 1.0,
                wobble_amplitude: 0.2,
            },
        );
        let pose = core.pose(2.0);
        assert!(approx(pose.rotation.y, 1.0));
        assert!(approx(pose.rotation.x, 2.0f32.sin() * 0.2));
    }

    #[test]
    fn test_floating_model() {
        let laptop = SceneEntity::new(
            "laptop",
            EntityKind::FloatingModel {
                yaw_rate: 0.3,
                float: FloatOscillation {
                    speed: 2.0,
                    amplitude: 0.25,
                },
            },
        )
        .at(Vec3::new(1.0, 0.5, 0.0))
        .scaled(0.8);
        let pose = laptop.pose(1.0);
        assert!(approx(pose.position.y, 0.5 + 2.0f32.sin() * 0.25));
        assert!(approx(pose.rotation.y, 0.3));
        assert_eq!(pose.scale, Vec3::splat(0.8));
    }

    #[test]
    fn test_resolved_pose_fn_matches_pose() {
        let entities = crate::scene::layout::portfolio_scene();
        for entity in &entities {
            let pose_fn = entity.pose_fn();
            for t in [0.0, 1.25, 10.0, 97.5] {
                assert_eq!(pose_fn(t), entity.pose(t), "{} at {}", entity.name, t);
            }
        }
    }

    #[test]
    fn test_css_color() {
        let still = EntityKind::Humanoid {
            sway_rate: 0.0,
            sway_amplitude: 0.0,
        };
        let e = SceneEntity::new("Django", still).colored(0x092E20);
        assert_eq!(e.css_color(), "#092E20");
    }
}
