pub mod display;
pub mod error;
pub mod export;
pub mod model;
pub mod roster;
pub mod selector;
pub mod xlsx;

pub use error::{Result, SelectorError};
pub use model::*;
