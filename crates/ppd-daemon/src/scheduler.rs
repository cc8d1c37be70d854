//! The polling loop: sample, decide, apply on edges, sleep.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use ppd_core::{
    evaluate, Config, Decision, EffectApplier, Mode, PowerControlSurface, SensorReader,
    StateStore, TransitionEvent, TunerClient,
};

/// Per-loop mutable state, owned by the scheduler and threaded through each
/// tick. Nothing here is global.
#[derive(Debug, Default)]
pub struct DaemonState {
    /// AC observation from the previous tick; `None` until the first sample.
    pub last_ac: Option<bool>,
}

/// One fully synchronous tick: sample, read the marker, decide, and on a
/// transition edge run the effect set and update the marker.
///
/// The marker is written after the effect attempt, never before it, so a
/// crash mid-tick leaves the marker describing what was actually tried.
pub fn tick<R, S, T>(
    sensor: &mut R,
    applier: &mut EffectApplier<S, T>,
    store: &StateStore,
    cfg: &Config,
    state: &mut DaemonState,
) where
    R: SensorReader,
    S: PowerControlSurface,
    T: TunerClient,
{
    let sample = sensor.sample();
    let persisted = store.read();

    debug!(
        "tick: battery={:?} ac={} persisted={:?} threshold={}%",
        sample.battery_percent, sample.on_ac, persisted, cfg.threshold_percent
    );

    match evaluate(&sample, state.last_ac, persisted, cfg) {
        Decision::NoOp => {}
        Decision::Transition(to) => {
            let event = TransitionEvent::new(persisted, to, sample.clone());
            info!("transition: {} -> {}", event.from, event.to);
            applier.apply(&event, cfg);

            let result = if to == Mode::Powersave {
                store.write(Mode::Powersave)
            } else {
                store.clear()
            };
            if let Err(e) = result {
                warn!("failed to update state marker: {e:#}");
            }
        }
    }

    state.last_ac = Some(sample.on_ac);
}

/// Run ticks at the configured cadence until the token is cancelled.
///
/// The token is consulted at the top of each iteration and the inter-tick
/// sleep races against it, so shutdown waits for at most one in-flight tick,
/// not a whole poll interval.
pub async fn run_loop<R, S, T>(
    mut sensor: R,
    mut applier: EffectApplier<S, T>,
    store: StateStore,
    cfg: Config,
    shutdown: CancellationToken,
) where
    R: SensorReader,
    S: PowerControlSurface,
    T: TunerClient,
{
    let mut state = DaemonState::default();
    info!("polling every {}s", cfg.poll_interval.as_secs());

    loop {
        if shutdown.is_cancelled() {
            break;
        }

        tick(&mut sensor, &mut applier, &store, &cfg, &mut state);

        tokio::select! {
            _ = tokio::time::sleep(cfg.poll_interval) => {}
            _ = shutdown.cancelled() => break,
        }
    }

    info!("scheduler stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use ppd_core::testing::{MemorySurface, MemoryTuner, ScriptedSensor};
    use ppd_core::{PowerSample, TunerDirection};
    use tempfile::TempDir;

    fn batt(pct: u8) -> PowerSample {
        PowerSample { battery_percent: Some(pct), on_ac: false }
    }

    fn ac(pct: u8) -> PowerSample {
        PowerSample { battery_percent: Some(pct), on_ac: true }
    }

    fn run_ticks(samples: Vec<PowerSample>, store: &StateStore) -> EffectApplier<MemorySurface, MemoryTuner> {
        let mut sensor = ScriptedSensor::new(samples.clone());
        let mut applier = EffectApplier::new(MemorySurface::new(), MemoryTuner::default());
        let cfg = Config::default();
        let mut state = DaemonState::default();
        for _ in 0..samples.len() {
            tick(&mut sensor, &mut applier, store, &cfg, &mut state);
        }
        applier
    }

    #[test]
    fn four_tick_scenario_persists_and_clears_marker() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path().join("state"));

        // Tick 1: no-op. Tick 2: enter powersave. Tick 3: steady. Tick 4: AC.
        let applier = run_ticks(vec![batt(50), batt(25), batt(20), ac(20)], &store);

        let (surface, tuner) = applier.into_parts();
        assert_eq!(surface.epp.as_deref(), Some("power"));
        assert_eq!(tuner.calls, vec![TunerDirection::Ac]);
        // Marker cleared by the AC edge.
        assert_eq!(store.read(), None);
    }

    #[test]
    fn powersave_marker_survives_between_ticks() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path().join("state"));

        run_ticks(vec![batt(25)], &store);
        assert_eq!(store.read(), Some(Mode::Powersave));

        // Steady-state poll leaves the marker alone and re-applies nothing.
        let applier = run_ticks(vec![batt(20)], &store);
        let (surface, _) = applier.into_parts();
        assert_eq!(surface.epp, None, "no effects on a steady-state tick");
        assert_eq!(store.read(), Some(Mode::Powersave));
    }

    #[test]
    fn marker_recovered_after_restart_allows_ac_exit() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path().join("state"));
        store.write(Mode::Powersave).unwrap();

        // Fresh DaemonState, as after a daemon restart.
        let applier = run_ticks(vec![ac(40)], &store);
        let (_, tuner) = applier.into_parts();
        assert_eq!(tuner.calls, vec![TunerDirection::Ac]);
        assert_eq!(store.read(), None);
    }

    #[test]
    fn marker_written_even_when_an_effect_fails() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path().join("state"));

        let mut sensor = ScriptedSensor::new(vec![batt(10)]);
        let mut surface = MemorySurface::new();
        surface.fail_epp = true;
        let mut applier = EffectApplier::new(surface, MemoryTuner::default());
        let mut state = DaemonState::default();
        tick(&mut sensor, &mut applier, &store, &Config::default(), &mut state);

        // At-least-once attempt semantics: the marker reflects the attempted
        // mode even though the EPP write failed.
        assert_eq!(store.read(), Some(Mode::Powersave));
    }

    #[tokio::test]
    async fn run_loop_stops_on_cancellation() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path().join("state"));
        let sensor = ScriptedSensor::new(vec![ac(80)]);
        let applier = EffectApplier::new(MemorySurface::new(), MemoryTuner::default());

        let token = CancellationToken::new();
        let handle = tokio::spawn(run_loop(sensor, applier, store, Config::default(), token.clone()));

        token.cancel();
        tokio::time::timeout(std::time::Duration::from_secs(5), handle)
            .await
            .expect("loop must stop promptly after cancellation")
            .unwrap();
    }
}
