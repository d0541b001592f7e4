pub mod ics_file;

pub use ics_file::IcsFileSink;
