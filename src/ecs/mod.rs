pub mod arena;
pub mod world;

pub use arena::{Arena, Handle};
pub use world::{PendingBirth, PondWorld};
