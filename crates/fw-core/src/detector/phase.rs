//! Hysteresis phase machine for anomaly episodes.
//!
//! Three phases: `Normal → Transient → Sustained`, driven one decision at
//! a time. Transient entry is edge-triggered (one emission per episode);
//! sustained alarms re-fire on every anomalous call so pollers always see
//! the current alarm state; recovery is edge-triggered and carries the
//! episode duration.

use serde::{Deserialize, Serialize};

/// Episode phase. The start timestamp lives inside the non-normal
/// variants, so "start time present iff not normal" holds by construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    Normal,
    Transient { started_at: f64 },
    Sustained { started_at: f64 },
}

impl Phase {
    pub fn is_normal(&self) -> bool {
        matches!(self, Phase::Normal)
    }

    /// Start of the active episode, if one is running.
    pub fn started_at(&self) -> Option<f64> {
        match self {
            Phase::Normal => None,
            Phase::Transient { started_at } | Phase::Sustained { started_at } => Some(*started_at),
        }
    }
}

/// What a single transition asks the caller to emit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Emission {
    None,
    /// Episode opened; emit once.
    Transient,
    /// Episode held past the sustained threshold; emit on every call.
    Sustained { elapsed: f64 },
    /// Episode closed; emit once with its total duration.
    Recovered { elapsed: f64 },
}

/// Phase machine state for one detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseState {
    pub phase: Phase,
    /// Last timestamp at which the stream was not anomalous.
    pub last_normal_at: f64,
}

impl Default for PhaseState {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseState {
    pub fn new() -> Self {
        PhaseState {
            phase: Phase::Normal,
            last_normal_at: 0.0,
        }
    }

    /// Advance the machine with one classified reading.
    ///
    /// `timestamp` must be non-decreasing across calls; the elapsed math
    /// assumes it (a documented precondition of the stream contract).
    pub fn advance(&mut self, is_anomaly: bool, timestamp: f64, sustained_secs: f64) -> Emission {
        if is_anomaly {
            match self.phase {
                Phase::Normal => {
                    self.phase = Phase::Transient {
                        started_at: timestamp,
                    };
                    Emission::Transient
                }
                Phase::Transient { started_at } => {
                    let elapsed = timestamp - started_at;
                    if elapsed >= sustained_secs {
                        self.phase = Phase::Sustained { started_at };
                        Emission::Sustained { elapsed }
                    } else {
                        Emission::None
                    }
                }
                Phase::Sustained { started_at } => Emission::Sustained {
                    elapsed: timestamp - started_at,
                },
            }
        } else {
            match self.phase {
                Phase::Normal => {
                    self.last_normal_at = timestamp;
                    Emission::None
                }
                Phase::Transient { started_at } | Phase::Sustained { started_at } => {
                    let elapsed = timestamp - started_at;
                    self.phase = Phase::Normal;
                    self.last_normal_at = timestamp;
                    Emission::Recovered { elapsed }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_stays_silent_and_tracks_time() {
        let mut state = PhaseState::new();
        assert_eq!(state.advance(false, 10.0, 5.0), Emission::None);
        assert_eq!(state.advance(false, 25.0, 5.0), Emission::None);
        assert_eq!(state.last_normal_at, 25.0);
        assert!(state.phase.is_normal());
    }

    #[test]
    fn test_episode_lifecycle_timing() {
        // duration threshold 5s: anomaly at t=3 opens, t=7 holds (4s < 5s),
        // t=9 promotes (6s), t=10 recovers with 7s total.
        let mut state = PhaseState::new();
        assert_eq!(state.advance(false, 2.0, 5.0), Emission::None);
        assert_eq!(state.advance(true, 3.0, 5.0), Emission::Transient);
        assert_eq!(state.advance(true, 7.0, 5.0), Emission::None);
        assert_eq!(
            state.advance(true, 9.0, 5.0),
            Emission::Sustained { elapsed: 6.0 }
        );
        assert_eq!(
            state.advance(false, 10.0, 5.0),
            Emission::Recovered { elapsed: 7.0 }
        );
        assert!(state.phase.is_normal());
        assert_eq!(state.last_normal_at, 10.0);
    }

    #[test]
    fn test_transient_emits_once_per_episode() {
        let mut state = PhaseState::new();
        assert_eq!(state.advance(true, 0.0, 100.0), Emission::Transient);
        for t in 1..10 {
            assert_eq!(state.advance(true, t as f64, 100.0), Emission::None);
        }
    }

    #[test]
    fn test_sustained_refires_every_call() {
        let mut state = PhaseState::new();
        state.advance(true, 0.0, 5.0);
        assert_eq!(
            state.advance(true, 5.0, 5.0),
            Emission::Sustained { elapsed: 5.0 }
        );
        assert_eq!(
            state.advance(true, 6.0, 5.0),
            Emission::Sustained { elapsed: 6.0 }
        );
        assert_eq!(
            state.advance(true, 7.5, 5.0),
            Emission::Sustained { elapsed: 7.5 }
        );
    }

    #[test]
    fn test_recovery_from_transient_carries_duration() {
        let mut state = PhaseState::new();
        state.advance(true, 100.0, 60.0);
        assert_eq!(
            state.advance(false, 130.0, 60.0),
            Emission::Recovered { elapsed: 30.0 }
        );
    }

    #[test]
    fn test_start_time_present_iff_not_normal() {
        let mut state = PhaseState::new();
        assert_eq!(state.phase.started_at(), None);
        state.advance(true, 3.0, 5.0);
        assert_eq!(state.phase.started_at(), Some(3.0));
        state.advance(true, 9.0, 5.0);
        assert_eq!(state.phase.started_at(), Some(3.0));
        state.advance(false, 10.0, 5.0);
        assert_eq!(state.phase.started_at(), None);
    }

    #[test]
    fn test_new_episode_restarts_clock() {
        let mut state = PhaseState::new();
        state.advance(true, 0.0, 5.0);
        state.advance(false, 2.0, 5.0);
        assert_eq!(state.advance(true, 50.0, 5.0), Emission::Transient);
        assert_eq!(state.phase.started_at(), Some(50.0));
    }
}
