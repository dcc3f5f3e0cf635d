//! Roster loading and grouping by location

pub mod grouper;
pub mod reader;

pub use grouper::group;
pub use reader::{read_roster, read_roster_file};
