//! Winner selection: spin preview sampling and the capped, de-duplicated draw

pub mod draw;
pub mod session;

pub use draw::{select_winners, spin, DEFAULT_MAX_WINNERS};
pub use session::{Phase, RunHandle, Selector, SelectorConfig};
