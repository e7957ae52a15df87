//! Solver parameters and the edits the controls apply to them.

use crate::numeric::ensure_non_negative;
use crate::{CoreError, CoreResult, Real};

pub const DEFAULT_RESOLUTION: u32 = 64;
pub const DEFAULT_WIND_SPEED: Real = 10.0;

/// Grid dimension along each axis plus inflow speed.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimulationParameters {
    pub resolution: u32,
    /// Inflow speed in m/s.
    pub wind_speed: Real,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            wind_speed: DEFAULT_WIND_SPEED,
        }
    }
}

impl SimulationParameters {
    pub fn validate(&self) -> CoreResult<()> {
        if self.resolution == 0 {
            return Err(CoreError::InvalidArg {
                what: "resolution must be positive",
            });
        }
        ensure_non_negative(self.wind_speed, "wind_speed")?;
        Ok(())
    }

    /// Applies `delta` and validates the outcome; `self` is untouched on error.
    pub fn apply(&self, delta: ParameterDelta) -> CoreResult<Self> {
        let next = Self {
            resolution: delta.resolution.unwrap_or(self.resolution),
            wind_speed: delta.wind_speed.unwrap_or(self.wind_speed),
        };
        next.validate()?;
        Ok(next)
    }
}

/// Partial parameter edit; `None` fields keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ParameterDelta {
    pub resolution: Option<u32>,
    pub wind_speed: Option<Real>,
}

impl ParameterDelta {
    pub fn resolution(resolution: u32) -> Self {
        Self {
            resolution: Some(resolution),
            ..Self::default()
        }
    }

    pub fn wind_speed(wind_speed: Real) -> Self {
        Self {
            wind_speed: Some(wind_speed),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.resolution.is_none() && self.wind_speed.is_none()
    }
}

/// Ranges the parameter controls expose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterBounds {
    pub resolution_min: u32,
    pub resolution_max: u32,
    pub resolution_step: u32,
    pub wind_speed_min: Real,
    pub wind_speed_max: Real,
}

pub const CONTROL_BOUNDS: ParameterBounds = ParameterBounds {
    resolution_min: 32,
    resolution_max: 128,
    resolution_step: 32,
    wind_speed_min: 0.0,
    wind_speed_max: 100.0,
};

impl ParameterBounds {
    /// Snap to the nearest step inside the range.
    pub fn clamp_resolution(&self, resolution: u32) -> u32 {
        let clamped = resolution.clamp(self.resolution_min, self.resolution_max);
        let offset = clamped - self.resolution_min;
        let steps = (offset + self.resolution_step / 2) / self.resolution_step;
        (self.resolution_min + steps * self.resolution_step).min(self.resolution_max)
    }

    pub fn clamp_wind_speed(&self, wind_speed: Real) -> Real {
        if wind_speed.is_nan() {
            return self.wind_speed_min;
        }
        wind_speed.clamp(self.wind_speed_min, self.wind_speed_max)
    }

    pub fn contains(&self, params: &SimulationParameters) -> bool {
        let r = params.resolution;
        r >= self.resolution_min
            && r <= self.resolution_max
            && (r - self.resolution_min) % self.resolution_step == 0
            && params.wind_speed >= self.wind_speed_min
            && params.wind_speed <= self.wind_speed_max
    }

    pub fn resolution_choices(&self) -> impl Iterator<Item = u32> + '_ {
        (self.resolution_min..=self.resolution_max).step_by(self.resolution_step as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn clamped_values_are_always_offered(resolution in any::<u32>(), wind_speed in -1e3f64..1e3) {
            let params = SimulationParameters {
                resolution: CONTROL_BOUNDS.clamp_resolution(resolution),
                wind_speed: CONTROL_BOUNDS.clamp_wind_speed(wind_speed),
            };
            prop_assert!(CONTROL_BOUNDS.contains(&params));
            prop_assert!(params.validate().is_ok());
        }

        #[test]
        fn clamping_is_idempotent_and_nearest(resolution in any::<u32>()) {
            let snapped = CONTROL_BOUNDS.clamp_resolution(resolution);
            prop_assert_eq!(CONTROL_BOUNDS.clamp_resolution(snapped), snapped);
            let target = resolution.clamp(CONTROL_BOUNDS.resolution_min, CONTROL_BOUNDS.resolution_max);
            for choice in CONTROL_BOUNDS.resolution_choices() {
                prop_assert!(snapped.abs_diff(target) <= choice.abs_diff(target));
            }
        }
    }

    #[test]
    fn defaults_match_controls() {
        let params = SimulationParameters::default();
        assert_eq!(params.resolution, 64);
        assert_eq!(params.wind_speed, 10.0);
        assert!(CONTROL_BOUNDS.contains(&params));
    }

    #[test]
    fn apply_keeps_untouched_fields() {
        let params = SimulationParameters::default();
        let next = params.apply(ParameterDelta::wind_speed(20.0)).unwrap();
        assert_eq!(next.resolution, 64);
        assert_eq!(next.wind_speed, 20.0);
    }

    #[test]
    fn apply_rejects_invalid_values() {
        let params = SimulationParameters::default();
        assert!(params.apply(ParameterDelta::resolution(0)).is_err());
        assert!(params.apply(ParameterDelta::wind_speed(-1.0)).is_err());
        assert!(params.apply(ParameterDelta::wind_speed(f64::NAN)).is_err());
    }

    #[test]
    fn resolution_snaps_to_steps() {
        assert_eq!(CONTROL_BOUNDS.clamp_resolution(0), 32);
        assert_eq!(CONTROL_BOUNDS.clamp_resolution(47), 32);
        assert_eq!(CONTROL_BOUNDS.clamp_resolution(48), 64);
        assert_eq!(CONTROL_BOUNDS.clamp_resolution(500), 128);
        let choices: Vec<u32> = CONTROL_BOUNDS.resolution_choices().collect();
        assert_eq!(choices, vec![32, 64, 96, 128]);
    }

    #[test]
    fn wind_speed_clamps_to_range() {
        assert_eq!(CONTROL_BOUNDS.clamp_wind_speed(-5.0), 0.0);
        assert_eq!(CONTROL_BOUNDS.clamp_wind_speed(250.0), 100.0);
        assert_eq!(CONTROL_BOUNDS.clamp_wind_speed(f64::NAN), 0.0);
    }
}
