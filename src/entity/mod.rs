pub mod fish;
pub mod pill;

pub use fish::Fish;
pub use pill::Pill;
