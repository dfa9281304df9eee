pub mod config;
pub mod error;
pub mod timebase;
pub mod types;

pub use config::OverlayConfig;
pub use timebase::{SimClock, SimTime, TimerQueue};
