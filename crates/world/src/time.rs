//! Day-to-night cycle.
//!
//! The world starts in daylight, holds it for a configurable delay, then fades
//! sky exposure and ambient light toward night over a transition window. Night
//! is latched once reached. Phase changes drive which spawner is active.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use voxelwild_core::SimTick;

/// Timing and lighting endpoints of the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayNightConfig {
    /// Seconds of full daylight before dusk begins.
    pub night_start_delay: f32,
    /// Seconds the dusk fade lasts.
    pub transition_duration: f32,
    /// Sky exposure at day.
    pub day_exposure: f32,
    /// Sky exposure at night.
    pub night_exposure: f32,
    /// Ambient light colour at day (linear RGB).
    pub day_ambient: [f32; 3],
    /// Ambient light colour at night (linear RGB).
    pub night_ambient: [f32; 3],
}

impl Default for DayNightConfig {
    fn default() -> Self {
        Self {
            night_start_delay: 10.0,
            transition_duration: 20.0,
            day_exposure: 3.0,
            night_exposure: 0.3,
            day_ambient: [1.0, 1.0, 1.0],
            night_ambient: [0.15, 0.18, 0.3],
        }
    }
}

/// Coarse time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Full daylight.
    Day,
    /// Fading toward night.
    Dusk,
    /// Night (latched).
    Night,
}

impl Phase {
    /// Canonical lowercase string key for configs/logging.
    pub const fn as_str(self) -> &'static str {
        match self {
            Phase::Day => "day",
            Phase::Dusk => "dusk",
            Phase::Night => "night",
        }
    }

    /// Whether passive animals spawn in this phase.
    pub fn animals_spawn(self) -> bool {
        !matches!(self, Phase::Night)
    }

    /// Whether monsters spawn in this phase.
    pub fn monsters_spawn(self) -> bool {
        matches!(self, Phase::Night)
    }
}

/// Lighting values a renderer would apply.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightingState {
    /// Sky exposure.
    pub exposure: f32,
    /// Ambient light colour.
    pub ambient: Vec3,
}

/// Day/night state machine.
#[derive(Debug, Clone, PartialEq)]
pub struct DayNightCycle {
    config: DayNightConfig,
    tick: SimTick,
    timer: f32,
    phase: Phase,
    lighting: LightingState,
}

impl DayNightCycle {
    /// Start a cycle in full daylight.
    pub fn new(config: DayNightConfig) -> Self {
        Self {
            config,
            tick: SimTick::ZERO,
            timer: 0.0,
            phase: Phase::Day,
            lighting: LightingState {
                exposure: config.day_exposure,
                ambient: Vec3::from_array(config.day_ambient),
            },
        }
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether night has been reached.
    pub fn is_night(&self) -> bool {
        self.phase == Phase::Night
    }

    /// Current lighting values.
    pub fn lighting(&self) -> LightingState {
        self.lighting
    }

    /// Steps advanced since the cycle started.
    pub fn tick_count(&self) -> SimTick {
        self.tick
    }

    /// Advance by `dt` seconds. Returns the new phase when it changed.
    pub fn advance(&mut self, dt: f32) -> Option<Phase> {
        self.tick = self.tick.advance(1);
        self.timer += dt;
        let before = self.phase;

        if self.phase == Phase::Day && self.timer >= self.config.night_start_delay {
            self.phase = Phase::Dusk;
            self.timer = 0.0;
        }

        if self.phase == Phase::Dusk {
            let t = if self.config.transition_duration > 0.0 {
                (self.timer / self.config.transition_duration).clamp(0.0, 1.0)
            } else {
                1.0
            };
            let day = Vec3::from_array(self.config.day_ambient);
            let night = Vec3::from_array(self.config.night_ambient);
            self.lighting = LightingState {
                exposure: self.config.day_exposure
                    + (self.config.night_exposure - self.config.day_exposure) * t,
                ambient: day.lerp(night, t),
            };
            if t >= 1.0 {
                self.phase = Phase::Night;
            }
        }

        if self.phase != before {
            tracing::info!(
                from = before.as_str(),
                to = self.phase.as_str(),
                tick = self.tick.0,
                "Day/night phase changed"
            );
            Some(self.phase)
        } else {
            None
        }
    }
}

impl Default for DayNightCycle {
    fn default() -> Self {
        Self::new(DayNightConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(cycle: &mut DayNightCycle, seconds: f32, dt: f32) -> Vec<Phase> {
        let steps = (seconds / dt).round() as usize;
        (0..steps).filter_map(|_| cycle.advance(dt)).collect()
    }

    #[test]
    fn holds_day_until_delay() {
        let mut cycle = DayNightCycle::default();
        assert!(run(&mut cycle, 9.5, 0.5).is_empty());
        assert_eq!(cycle.phase(), Phase::Day);
        assert_eq!(cycle.lighting().exposure, 3.0);
    }

    #[test]
    fn fades_then_latches_night() {
        let mut cycle = DayNightCycle::default();
        let changes = run(&mut cycle, 20.0, 0.5);
        assert_eq!(changes, vec![Phase::Dusk]);
        let mid = cycle.lighting().exposure;
        assert!(mid < 3.0 && mid > 0.3);

        let changes = run(&mut cycle, 20.0, 0.5);
        assert_eq!(changes, vec![Phase::Night]);
        assert!((cycle.lighting().exposure - 0.3).abs() < 1e-5);
        assert!((cycle.lighting().ambient - Vec3::new(0.15, 0.18, 0.3)).length() < 1e-5);

        assert!(run(&mut cycle, 60.0, 0.5).is_empty());
        assert!(cycle.is_night());
    }

    #[test]
    fn phases_gate_spawners() {
        assert!(Phase::Day.animals_spawn() && !Phase::Day.monsters_spawn());
        assert!(Phase::Dusk.animals_spawn());
        assert!(Phase::Night.monsters_spawn() && !Phase::Night.animals_spawn());
    }
}
