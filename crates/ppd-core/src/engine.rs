use crate::config::Config;
use crate::mode::Mode;
use crate::sample::PowerSample;

/// Outcome of one tick's evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Steady state; nothing to apply. The common case on every poll.
    NoOp,
    /// Cross into the given mode and run its effect set.
    Transition(Mode),
}

/// Describes one transition; handed to the effect applier and then dropped.
#[derive(Debug, Clone)]
pub struct TransitionEvent {
    pub from: Mode,
    pub to: Mode,
    pub sample: PowerSample,
}

impl TransitionEvent {
    pub fn new(persisted: Option<Mode>, to: Mode, sample: PowerSample) -> Self {
        // Absent persisted state means the implicit balanced baseline.
        Self { from: persisted.unwrap_or(Mode::Balanced), to, sample }
    }
}

/// Decide whether this tick crosses a transition edge.
///
/// Edge-triggered, not level-triggered: a transition is emitted only on the
/// tick where the observed zone first differs from the last applied mode, so
/// repeated evaluation in a steady state is a no-op and effects are never
/// re-applied on every poll.
///
/// Zones, in priority order:
/// - on AC: leave powersave / resume AC handling once, on the first AC tick;
/// - on battery at or below threshold (inclusive): enter powersave once;
/// - on battery above threshold, or battery unreadable (fail open): return
///   to balanced once.
pub fn evaluate(
    sample: &PowerSample,
    last_ac: Option<bool>,
    persisted: Option<Mode>,
    cfg: &Config,
) -> Decision {
    if sample.on_ac {
        if persisted == Some(Mode::Powersave) || last_ac == Some(false) {
            let to = if cfg.auto_brightness { Mode::Performance } else { Mode::Balanced };
            return Decision::Transition(to);
        }
        return Decision::NoOp;
    }

    if let Some(pct) = sample.battery_percent {
        if pct <= cfg.threshold_percent {
            if persisted != Some(Mode::Powersave) {
                return Decision::Transition(Mode::Powersave);
            }
            return Decision::NoOp;
        }
    }

    // On battery above threshold, or no battery reading at all. Missing data
    // must never force powersave.
    if persisted == Some(Mode::Powersave) || last_ac == Some(true) {
        return Decision::Transition(Mode::Balanced);
    }
    Decision::NoOp
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> Config {
        Config::default()
    }

    fn on_battery(pct: u8) -> PowerSample {
        PowerSample { battery_percent: Some(pct), on_ac: false }
    }

    fn on_ac(pct: u8) -> PowerSample {
        PowerSample { battery_percent: Some(pct), on_ac: true }
    }

    #[test]
    fn enters_powersave_once_then_noop() {
        let sample = on_battery(25);
        assert_eq!(
            evaluate(&sample, Some(false), None, &cfg()),
            Decision::Transition(Mode::Powersave)
        );
        // Same sample again, with the decision now persisted.
        assert_eq!(
            evaluate(&sample, Some(false), Some(Mode::Powersave), &cfg()),
            Decision::NoOp
        );
    }

    #[test]
    fn threshold_is_inclusive() {
        assert_eq!(
            evaluate(&on_battery(30), Some(false), None, &cfg()),
            Decision::Transition(Mode::Powersave)
        );
        assert_eq!(evaluate(&on_battery(31), Some(false), None, &cfg()), Decision::NoOp);
    }

    #[test]
    fn ac_leaves_powersave_then_noop_while_on_ac() {
        let sample = on_ac(20);
        assert_eq!(
            evaluate(&sample, Some(false), Some(Mode::Powersave), &cfg()),
            Decision::Transition(Mode::Balanced)
        );
        // Subsequent AC ticks with state cleared: nothing to do.
        assert_eq!(evaluate(&sample, Some(true), None, &cfg()), Decision::NoOp);
    }

    #[test]
    fn ac_target_is_performance_with_auto_brightness() {
        let mut c = cfg();
        c.auto_brightness = true;
        assert_eq!(
            evaluate(&on_ac(50), Some(false), None, &c),
            Decision::Transition(Mode::Performance)
        );
    }

    #[test]
    fn plugging_in_from_balanced_battery_triggers_ac_edge() {
        assert_eq!(
            evaluate(&on_ac(80), Some(false), None, &cfg()),
            Decision::Transition(Mode::Balanced)
        );
    }

    #[test]
    fn unplugging_from_ac_triggers_balanced_edge() {
        assert_eq!(
            evaluate(&on_battery(80), Some(true), None, &cfg()),
            Decision::Transition(Mode::Balanced)
        );
    }

    #[test]
    fn missing_battery_on_battery_never_enters_powersave() {
        let sample = PowerSample { battery_percent: None, on_ac: false };
        assert_eq!(evaluate(&sample, Some(false), None, &cfg()), Decision::NoOp);
        // Even when leaving powersave it goes to balanced, not deeper.
        assert_eq!(
            evaluate(&sample, Some(false), Some(Mode::Powersave), &cfg()),
            Decision::Transition(Mode::Balanced)
        );
    }

    #[test]
    fn first_tick_after_start_is_noop_outside_powersave_zone() {
        // last_ac unknown, no persisted state: nothing to undo.
        assert_eq!(evaluate(&on_battery(80), None, None, &cfg()), Decision::NoOp);
        assert_eq!(evaluate(&on_ac(80), None, None, &cfg()), Decision::NoOp);
    }

    #[test]
    fn powersave_survives_daemon_restart() {
        // Persisted marker recovered from disk, last_ac unknown: the AC tick
        // still clears powersave.
        assert_eq!(
            evaluate(&on_ac(40), None, Some(Mode::Powersave), &cfg()),
            Decision::Transition(Mode::Balanced)
        );
    }

    #[test]
    fn four_tick_scenario_transitions_at_ticks_two_and_four() {
        let samples =
            [on_battery(50), on_battery(25), on_battery(20), on_ac(20)];
        let c = cfg();

        let mut last_ac: Option<bool> = None;
        let mut persisted: Option<Mode> = None;
        let mut decisions = Vec::new();

        for sample in &samples {
            let d = evaluate(sample, last_ac, persisted, &c);
            if let Decision::Transition(to) = d {
                persisted = if to == Mode::Powersave { Some(Mode::Powersave) } else { None };
            }
            last_ac = Some(sample.on_ac);
            decisions.push(d);
        }

        assert_eq!(
            decisions,
            vec![
                Decision::NoOp,
                Decision::Transition(Mode::Powersave),
                Decision::NoOp,
                Decision::Transition(Mode::Balanced),
            ]
        );
    }

    #[test]
    fn transition_event_from_defaults_to_balanced() {
        let ev = TransitionEvent::new(None, Mode::Powersave, on_battery(10));
        assert_eq!(ev.from, Mode::Balanced);
        let ev = TransitionEvent::new(Some(Mode::Powersave), Mode::Balanced, on_battery(50));
        assert_eq!(ev.from, Mode::Powersave);
    }
}
