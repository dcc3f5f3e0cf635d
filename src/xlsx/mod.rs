pub mod writer;

pub use writer::write_winners_to_xlsx;
