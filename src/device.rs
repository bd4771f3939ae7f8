//! Device classification
//!
//! One place decides mobile vs desktop. Dependents receive a whole
//! `DeviceProfile` and never test the viewport themselves.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::settings::DeviceConfig;

/// Viewport class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceClass {
    Mobile,
    Desktop,
}

impl DeviceClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceClass::Mobile => "Mobile",
            DeviceClass::Desktop => "Desktop",
        }
    }
}

/// Scene parameters for one device class
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileParams {
    /// Camera distance from the scene origin along +Z
    pub camera_distance: f32,
    /// Vertical field of view in degrees
    pub field_of_view: f32,
    /// Multiplier on every entity's animation rate
    pub speed_scalar: f32,
    /// Maximum entities drawn
    pub entity_count_cap: usize,
}

impl ProfileParams {
    pub const DESKTOP: Self = Self {
        camera_distance: 6.0,
        field_of_view: 45.0,
        speed_scalar: 1.0,
        entity_count_cap: 16,
    };

    pub const MOBILE: Self = Self {
        camera_distance: 8.0,
        field_of_view: 60.0,
        speed_scalar: 0.6,
        entity_count_cap: 5,
    };

    pub fn validate(&self) -> Result<()> {
        if !self.camera_distance.is_finite() || self.camera_distance <= 0.0 {
            return Err(ConfigError::InvalidProfile(format!(
                "camera_distance {}",
                self.camera_distance
            )));
        }
        if !(self.field_of_view > 0.0 && self.field_of_view < 180.0) {
            return Err(ConfigError::InvalidProfile(format!(
                "field_of_view {}",
                self.field_of_view
            )));
        }
        if !self.speed_scalar.is_finite() || self.speed_scalar < 0.0 {
            return Err(ConfigError::InvalidProfile(format!(
                "speed_scalar {}",
                self.speed_scalar
            )));
        }
        Ok(())
    }
}

/// Immutable parameter bundle for the current viewport class
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviceProfile {
    pub class: DeviceClass,
    pub camera_distance: f32,
    pub field_of_view: f32,
    pub speed_scalar: f32,
    pub entity_count_cap: usize,
}

impl DeviceProfile {
    pub fn new(class: DeviceClass, params: ProfileParams) -> Self {
        Self {
            class,
            camera_distance: params.camera_distance,
            field_of_view: params.field_of_view,
            speed_scalar: params.speed_scalar,
            entity_count_cap: params.entity_count_cap,
        }
    }

    pub fn is_mobile(&self) -> bool {
        self.class == DeviceClass::Mobile
    }
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self::new(DeviceClass::Desktop, ProfileParams::DESKTOP)
    }
}

/// Threshold classifier that only reports actual class changes
#[derive(Debug, Clone)]
pub struct DeviceProfileSelector {
    config: DeviceConfig,
    current: Option<DeviceProfile>,
}

impl DeviceProfileSelector {
    pub fn new(config: DeviceConfig) -> Result<Self> {
        config.desktop.validate()?;
        config.mobile.validate()?;
        Ok(Self {
            config,
            current: None,
        })
    }

    /// Class for a viewport width (narrower than the breakpoint is mobile)
    pub fn class_for(&self, viewport_width: f64) -> DeviceClass {
        if viewport_width < f64::from(self.config.mobile_breakpoint_px) {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        }
    }

    /// Pure classification, no change tracking
    pub fn classify(&self, viewport_width: f64) -> DeviceProfile {
        let class = self.class_for(viewport_width);
        let params = match class {
            DeviceClass::Mobile => self.config.mobile,
            DeviceClass::Desktop => self.config.desktop,
        };
        DeviceProfile::new(class, params)
    }

    /// Re-classify after a resize; `Some` only when the class changed
    /// (the first call always emits)
    pub fn update(&mut self, viewport_width: f64) -> Option<DeviceProfile> {
        let class = self.class_for(viewport_width);
        if self.current.is_some_and(|p| p.class == class) {
            return None;
        }
        let profile = self.classify(viewport_width);
        log::info!(
            "Device profile: {} (viewport {}px)",
            class.as_str(),
            viewport_width
        );
        self.current = Some(profile);
        Some(profile)
    }

    /// Last emitted profile
    pub fn current(&self) -> Option<DeviceProfile> {
        self.current
    }
}
