//! Data models for the file-record engine

mod category;
mod file;
mod profile;

pub use category::*;
pub use file::*;
pub use profile::*;
