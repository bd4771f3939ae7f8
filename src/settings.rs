//! Motion settings and tuning
//!
//! Every field has a default, so partial JSON (or none at all) yields a usable
//! configuration.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::device::ProfileParams;
use crate::error::{ConfigError, Result};

/// Typing effect phrases and pacing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypingConfig {
    pub phrases: Vec<String>,
    pub type_interval_ms: u32,
    pub delete_interval_ms: u32,
    pub pause_ms: u32,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            phrases: [
                "Full Stack Developer",
                "Python Expert",
                "React Developer",
                "Django Specialist",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            type_interval_ms: TYPE_INTERVAL_MS,
            delete_interval_ms: DELETE_INTERVAL_MS,
            pause_ms: PAUSE_MS,
        }
    }
}

impl TypingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.phrases.is_empty() {
            return Err(ConfigError::EmptyPhrases);
        }
        for (name, value) in [
            ("type_interval_ms", self.type_interval_ms),
            ("delete_interval_ms", self.delete_interval_ms),
            ("pause_ms", self.pause_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidInterval { name, value });
            }
        }
        Ok(())
    }
}

/// Card tilt tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TiltConfig {
    /// Pointer pixels per degree of rotation
    pub sensitivity: f32,
    /// CSS perspective applied with the rotation
    pub perspective_px: f32,
}

impl TiltConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.sensitivity.is_finite() || self.sensitivity <= 0.0 {
            return Err(ConfigError::InvalidSensitivity(self.sensitivity));
        }
        if !self.perspective_px.is_finite() || self.perspective_px <= 0.0 {
            return Err(ConfigError::InvalidPerspective(self.perspective_px));
        }
        Ok(())
    }
}

impl Default for TiltConfig {
    fn default() -> Self {
        Self {
            sensitivity: TILT_SENSITIVITY,
            perspective_px: TILT_PERSPECTIVE_PX,
        }
    }
}

/// Viewport classification and per-class scene parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub mobile_breakpoint_px: u32,
    pub desktop: ProfileParams,
    pub mobile: ProfileParams,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            mobile_breakpoint_px: MOBILE_BREAKPOINT_PX,
            desktop: ProfileParams::DESKTOP,
            mobile: ProfileParams::MOBILE,
        }
    }
}

/// All motion settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionSettings {
    pub typing: TypingConfig,
    /// Visible fraction that reveals a region
    pub reveal_threshold: f32,
    pub tilt: TiltConfig,
    pub device: DeviceConfig,
}

impl Default for MotionSettings {
    fn default() -> Self {
        Self {
            typing: TypingConfig::default(),
            reveal_threshold: REVEAL_THRESHOLD,
            tilt: TiltConfig::default(),
            device: DeviceConfig::default(),
        }
    }
}

impl MotionSettings {
    /// Parse and validate settings JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Check every section; the first problem found is returned
    pub fn validate(&self) -> Result<()> {
        self.typing.validate()?;
        if !(0.0..=1.0).contains(&self.reveal_threshold) {
            return Err(ConfigError::InvalidThreshold(self.reveal_threshold));
        }
        self.tilt.validate()?;
        self.device.desktop.validate()?;
        self.device.mobile.validate()?;
        Ok(())
    }
}
