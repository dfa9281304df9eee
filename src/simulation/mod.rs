pub mod events;
pub mod growth;
pub mod interaction;
pub mod motion;
pub mod spawner;
pub mod tick;

pub use events::{PondEvent, PondObserver};
pub use growth::{GrowthState, GrowthTransition};
pub use spawner::{SpawnActions, SpawnGate};
pub use tick::run_simulation_tick;
