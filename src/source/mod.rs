pub mod file;
pub mod raw;

pub use file::*;
pub use raw::{RawNode, RawValue};
