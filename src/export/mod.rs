pub mod csv_writer;

pub use csv_writer::{export_all, export_location, winners_file_name, write_winners_csv};
