//! Pointer-driven 3D card tilt
//!
//! Rotation is recomputed from scratch on every pointer sample relative to the
//! card's bounding box, tilting the card toward the pointer. Leaving the card
//! resets it to exactly zero.

use std::collections::BTreeMap;

use crate::error::{ConfigError, Result};
use crate::settings::TiltConfig;

/// Stable handle for a registered card
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CardId(u32);

impl CardId {
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Card box in viewport pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// Card rotation in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Tilt {
    pub rotate_x: f32,
    pub rotate_y: f32,
}

impl Tilt {
    pub const FLAT: Self = Self {
        rotate_x: 0.0,
        rotate_y: 0.0,
    };

    /// Tilt for a pointer at (x, y) over `bbox`
    pub fn from_pointer(
        pointer_x: f32,
        pointer_y: f32,
        bbox: BoundingBox,
        sensitivity: f32,
    ) -> Self {
        let center_x = bbox.width / 2.0;
        let center_y = bbox.height / 2.0;
        let local_x = pointer_x - bbox.left;
        let local_y = pointer_y - bbox.top;
        Self {
            rotate_x: (local_y - center_y) / sensitivity,
            rotate_y: (center_x - local_x) / sensitivity,
        }
    }

    pub fn is_flat(&self) -> bool {
        *self == Self::FLAT
    }

    /// CSS transform value
    pub fn to_css(&self, perspective_px: f32) -> String {
        format!(
            "perspective({}px) rotateX({}deg) rotateY({}deg)",
            perspective_px, self.rotate_x, self.rotate_y
        )
    }
}

/// Tracks the current tilt of each registered card
#[derive(Debug, Clone)]
pub struct PointerTiltTracker {
    sensitivity: f32,
    cards: BTreeMap<CardId, Tilt>,
    next_id: u32,
}

impl Default for PointerTiltTracker {
    fn default() -> Self {
        Self {
            sensitivity: crate::consts::TILT_SENSITIVITY,
            cards: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl PointerTiltTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sensitivity(sensitivity: f32) -> Result<Self> {
        if !sensitivity.is_finite() || sensitivity <= 0.0 {
            return Err(ConfigError::InvalidSensitivity(sensitivity));
        }
        Ok(Self {
            sensitivity,
            ..Self::default()
        })
    }

    pub fn from_config(config: &TiltConfig) -> Result<Self> {
        config.validate()?;
        Self::with_sensitivity(config.sensitivity)
    }

    pub fn sensitivity(&self) -> f32 {
        self.sensitivity
    }

    pub fn register(&mut self) -> CardId {
        let id = CardId(self.next_id);
        self.next_id += 1;
        self.cards.insert(id, Tilt::FLAT);
        id
    }

    pub fn unregister(&mut self, id: CardId) {
        self.cards.remove(&id);
    }

    /// New tilt for a pointer move; `None` for unknown cards
    pub fn on_pointer_move(
        &mut self,
        id: CardId,
        pointer_x: f32,
        pointer_y: f32,
        bbox: BoundingBox,
    ) -> Option<Tilt> {
        let tilt = self.cards.get_mut(&id)?;
        *tilt = Tilt::from_pointer(pointer_x, pointer_y, bbox, self.sensitivity);
        Some(*tilt)
    }

    /// Reset to flat; `None` for unknown cards
    pub fn on_pointer_leave(&mut self, id: CardId) -> Option<Tilt> {
        let tilt = self.cards.get_mut(&id)?;
        *tilt = Tilt::FLAT;
        Some(*tilt)
    }

    pub fn tilt(&self, id: CardId) -> Option<Tilt> {
        self.cards.get(&id).copied()
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const CARD: BoundingBox = BoundingBox {
        left: 0.0,
        top: 0.0,
        width: 200.0,
        height: 100.0,
    };

    #[test]
    fn test_center_is_flat() {
        let mut tracker = PointerTiltTracker::new();
        let card = tracker.register();
        let tilt = tracker.on_pointer_move(card, 100.0, 50.0, CARD).unwrap();
        assert_eq!(tilt, Tilt::FLAT);
    }

    #[test]
    fn test_top_left_corner() {
        let mut tracker = PointerTiltTracker::new();
        let card = tracker.register();
        let tilt = tracker.on_pointer_move(card, 0.0, 0.0, CARD).unwrap();
        assert_eq!(tilt.rotate_x, -5.0);
        assert_eq!(tilt.rotate_y, 10.0);
    }

    #[test]
    fn test_offset_box_uses_local_coordinates() {
        let bbox = BoundingBox::new(300.0, 400.0, 200.0, 100.0);
        let tilt = Tilt::from_pointer(500.0, 500.0, bbox, 10.0);
        // Bottom-right corner tilts the other way
        assert_eq!(tilt.rotate_x, 5.0);
        assert_eq!(tilt.rotate_y, -10.0);
    }

    #[test]
    fn test_sensitivity_scales() {
        let tilt = Tilt::from_pointer(0.0, 0.0, CARD, 20.0);
        assert_eq!(tilt.rotate_x, -2.5);
        assert_eq!(tilt.rotate_y, 5.0);
        assert!(PointerTiltTracker::with_sensitivity(0.0).is_err());
        assert!(PointerTiltTracker::with_sensitivity(f32::INFINITY).is_err());
    }

    #[test]
    fn test_cards_are_independent() {
        let mut tracker = PointerTiltTracker::new();
        let a = tracker.register();
        let b = tracker.register();
        tracker.on_pointer_move(a, 0.0, 0.0, CARD);
        assert_eq!(tracker.tilt(b), Some(Tilt::FLAT));
        tracker.on_pointer_leave(b);
        assert!(!tracker.tilt(a).unwrap().is_flat());
    }

    #[test]
    fn test_unknown_card_is_noop() {
        let mut tracker = PointerTiltTracker::new();
        let card = tracker.register();
        tracker.unregister(card);
        assert_eq!(tracker.on_pointer_move(card, 1.0, 1.0, CARD), None);
        assert_eq!(tracker.on_pointer_leave(card), None);
        assert_eq!(tracker.card_count(), 0);
    }

    #[test]
    fn test_config_rejects_bad_perspective() {
        let config = TiltConfig {
            perspective_px: 0.0,
            ..TiltConfig::default()
        };
        assert!(matches!(
            PointerTiltTracker::from_config(&config),
            Err(ConfigError::InvalidPerspective(_))
        ));
        assert!(PointerTiltTracker::from_config(&TiltConfig::default()).is_ok());
    }

    #[test]
    fn test_css_transform() {
        let tilt = Tilt {
            rotate_x: -5.0,
            rotate_y: 10.0,
        };
        assert_eq!(
            tilt.to_css(1000.0),
            "perspective(1000px) rotateX(-5deg) rotateY(10deg)"
        );
    }

    proptest! {
        #[test]
        fn prop_leave_always_flat(
            moves in prop::collection::vec((-500.0f32..500.0, -500.0f32..500.0), 0..20),
        ) {
            let mut tracker = PointerTiltTracker::new();
            let card = tracker.register();
            for (x, y) in moves {
                tracker.on_pointer_move(card, x, y, CARD);
            }
            prop_assert_eq!(tracker.on_pointer_leave(card), Some(Tilt::FLAT));
        }

        #[test]
        fn prop_move_depends_only_on_latest_sample(
            first in (-500.0f32..500.0, -500.0f32..500.0),
            last in (-500.0f32..500.0, -500.0f32..500.0),
        ) {
            let mut tracker = PointerTiltTracker::new();
            let card = tracker.register();
            tracker.on_pointer_move(card, first.0, first.1, CARD);
            let tilt = tracker.on_pointer_move(card, last.0, last.1, CARD);
            prop_assert_eq!(tilt, Some(Tilt::from_pointer(last.0, last.1, CARD, 10.0)));
        }
    }
}
