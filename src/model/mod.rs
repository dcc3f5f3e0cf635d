pub mod entry;
pub mod location_map;

pub use entry::{ColumnLayout, Entry};
pub use location_map::{LocationGroups, LocationMap, SpinSnapshot, WinnerSet};
