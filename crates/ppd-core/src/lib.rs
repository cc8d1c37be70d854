pub mod applier;
pub mod config;
pub mod engine;
pub mod mode;
pub mod sample;
pub mod state;
pub mod status;
pub mod testing;

pub use applier::{BrightnessRead, EffectApplier, PowerControlSurface, TunerClient, TunerDirection, TunerError};
pub use config::Config;
pub use engine::{evaluate, Decision, TransitionEvent};
pub use mode::Mode;
pub use sample::{PowerSample, SensorReader};
pub use state::StateStore;
pub use status::StatusSnapshot;
