//! Default hero scene

use std::f32::consts::TAU;

use glam::Vec3;

use super::entity::{EntityKind, FloatOscillation, SceneEntity};
use crate::consts::{SWAY_AMPLITUDE, SWAY_RATE};

/// Skill markers: (label, 0xRRGGBB)
pub const SKILLS: [(&str, u32); 6] = [
    ("React", 0x61DAFB),
    ("Django", 0x092E20),
    ("Python", 0x3776AB),
    ("JS", 0xF7DF1E),
    ("HTML", 0xE34F26),
    ("CSS", 0x1572B6),
];

pub const SKILL_ORBIT_RADIUS: f32 = 2.5;
pub const SKILL_ORBIT_SPEED: f32 = 0.5;
const SKILL_SPIN: f32 = 1.2;
const SKILL_ORBIT_HEIGHT: f32 = 0.5;

/// Humanoid, hologram and laptop first, then the skill ring. A profile's
/// entity cap trims from the end, so small screens lose markers first.
pub fn portfolio_scene() -> Vec<SceneEntity> {
    let mut scene = vec![
        SceneEntity::new(
            "figure",
            EntityKind::Humanoid {
                sway_rate: SWAY_RATE,
                sway_amplitude: SWAY_AMPLITUDE,
            },
        )
        .at(Vec3::new(0.0, -1.0, 0.0))
        .colored(0x4F46E5),
        SceneEntity::new(
            "hologram",
            EntityKind::HologramCore {
                spin_rate: 0.8,
                wobble_rate: 1.5,
                wobble_amplitude: 0.15,
            },
        )
        .at(Vec3::new(0.0, 1.6, 0.0))
        .scaled(0.6)
        .colored(0x60A5FA),
        SceneEntity::new(
            "laptop",
            EntityKind::FloatingModel {
                yaw_rate: 0.25,
                float: FloatOscillation {
                    speed: 1.5,
                    amplitude: 0.2,
                },
            },
        )
        .at(Vec3::new(1.8, -0.4, 0.6))
        .scaled(0.7)
        .colored(0x9333EA),
    ];

    let step = TAU / SKILLS.len() as f32;
    scene.extend(SKILLS.iter().enumerate().map(|(i, (name, color))| {
        SceneEntity::new(
            *name,
            EntityKind::OrbitMarker {
                orbit_radius: SKILL_ORBIT_RADIUS,
                orbit_speed: SKILL_ORBIT_SPEED,
                phase: i as f32 * step,
                self_spin: Some(SKILL_SPIN),
            },
        )
        .at(Vec3::new(0.0, SKILL_ORBIT_HEIGHT, 0.0))
        .scaled(0.35)
        .colored(*color)
    }));

    scene
}
