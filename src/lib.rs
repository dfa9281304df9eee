//! Pondlife - decorative pond ecosystem with procedural sound and narration
//!
//! Pills fall and bob, fish swim and eat them, full-grown fish hunt, and
//! eaten fish leave two offspring behind. Pond events drive procedural
//! audio cues and a rate-limited, pitch-matched narrator.

pub mod audio;
pub mod core;
pub mod ecs;
pub mod entity;
pub mod overlay;
pub mod render;
pub mod simulation;
pub mod speech;

pub use crate::core::config::OverlayConfig;
pub use crate::core::error::{PondError, Result};
pub use crate::overlay::{Overlay, OverlayHooks};
