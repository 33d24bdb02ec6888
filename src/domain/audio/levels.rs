//! Input level frame value object

/// Number of slots in a level frame (one per meter bar)
pub const LEVEL_SLOTS: usize = 20;

/// Minimum normalized amplitude, keeps meter bars visibly non-zero
pub const LEVEL_FLOOR: f32 = 0.1;

/// Quietest input power considered, in dBFS
const MIN_POWER_DB: f32 = -60.0;

/// Fixed-length frame of normalized input amplitudes in [0.1, 1.0].
///
/// The frame is regenerated whole on every sampler tick from the single
/// current power reading; there is no per-slot history. While idle the
/// frame is the all-floor baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelFrame {
    slots: [f32; LEVEL_SLOTS],
}

impl LevelFrame {
    /// The all-minimum frame published while not recording
    pub fn baseline() -> Self {
        Self {
            slots: [LEVEL_FLOOR; LEVEL_SLOTS],
        }
    }

    /// Build a frame from an instantaneous power reading in dBFS.
    ///
    /// The reading is clamped to [-60, 0] dB, mapped linearly to [0, 1],
    /// then floored at 0.1. Every slot carries the same value.
    pub fn from_power_db(power_db: f32) -> Self {
        let normalized = ((power_db - MIN_POWER_DB) / -MIN_POWER_DB).clamp(0.0, 1.0);
        let level = normalized.max(LEVEL_FLOOR);
        Self {
            slots: [level; LEVEL_SLOTS],
        }
    }

    /// Get the slot values
    pub fn slots(&self) -> &[f32; LEVEL_SLOTS] {
        &self.slots
    }

    /// Check whether this is the baseline frame
    pub fn is_baseline(&self) -> bool {
        self.slots.iter().all(|&s| s == LEVEL_FLOOR)
    }
}

impl Default for LevelFrame {
    fn default() -> Self {
        Self::baseline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_is_all_floor() {
        let frame = LevelFrame::baseline();
        assert!(frame.is_baseline());
        assert!(frame.slots().iter().all(|&s| s == 0.1));
    }

    #[test]
    fn default_is_baseline() {
        assert!(LevelFrame::default().is_baseline());
    }

    #[test]
    fn silence_maps_to_floor() {
        let frame = LevelFrame::from_power_db(-60.0);
        assert!(frame.is_baseline());
    }

    #[test]
    fn full_power_maps_to_one() {
        let frame = LevelFrame::from_power_db(0.0);
        assert!(frame.slots().iter().all(|&s| s == 1.0));
    }

    #[test]
    fn midrange_maps_linearly() {
        let frame = LevelFrame::from_power_db(-30.0);
        for &slot in frame.slots() {
            assert!((slot - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn quiet_input_floors_at_minimum() {
        // -58 dB maps to ~0.033, below the floor
        let frame = LevelFrame::from_power_db(-58.0);
        assert!(frame.is_baseline());
    }

    #[test]
    fn out_of_range_readings_clamp() {
        assert!(LevelFrame::from_power_db(-120.0).is_baseline());
        let loud = LevelFrame::from_power_db(6.0);
        assert!(loud.slots().iter().all(|&s| s == 1.0));
    }

    #[test]
    fn frame_has_fixed_slot_count() {
        assert_eq!(LevelFrame::baseline().slots().len(), 20);
    }
}
