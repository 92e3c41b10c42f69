//! Data-driven game balance
//!
//! Everything a designer would want to retune without touching simulation
//! code. Loaded from JSON by the host; defaults match the reference feel.

use serde::{Deserialize, Serialize};

use crate::consts::CORNER_CHANCE;

/// Simulation balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    /// Forward speed floor; also the speed after a failed corner (m/s)
    pub min_speed: f32,
    /// Forward speed ceiling (m/s)
    pub max_speed: f32,
    /// Forward acceleration while below max speed (m/s^2)
    pub acceleration: f32,
    /// Vertical speed applied on jump (m/s)
    pub jump_speed: f32,
    /// Gravity scale during jump integration
    pub gravity_multiplier: f32,
    /// Percentage chance (0-100) of a corner tile when one is allowed
    pub corner_chance: f64,
    /// Recovery window after a failed corner (s)
    pub damage_recovery: f32,
    /// Cosmetic rotation duration on a successful corner (s)
    pub turn_rotation: f32,
    /// Cosmetic rotation duration on a failed corner (s)
    pub failed_turn_rotation: f32,
    /// Interval between staged reset-population segments (s)
    pub populate_interval: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            min_speed: 4.0,
            max_speed: 12.0,
            acceleration: 0.5,
            jump_speed: 7.0,
            gravity_multiplier: 2.5,
            corner_chance: CORNER_CHANCE,
            damage_recovery: 0.5,
            turn_rotation: 0.5,
            failed_turn_rotation: 1.5,
            populate_interval: 0.05,
        }
    }
}

impl Tuning {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_roundtrip() {
        let tuning = Tuning {
            max_speed: 20.0,
            corner_chance: 50.0,
            ..Default::default()
        };
        let restored = Tuning::from_json(&tuning.to_json()).unwrap();
        assert_eq!(tuning, restored);
    }

    #[test]
    fn test_defaults_sane() {
        let t = Tuning::default();
        assert!(t.min_speed < t.max_speed);
        assert!(t.corner_chance > 0.0 && t.corner_chance <= 100.0);
        assert!(t.failed_turn_rotation > t.turn_rotation);
    }
}
