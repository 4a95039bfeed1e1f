pub mod bindings;
pub mod constants;
pub mod loops;

pub use bindings::*;
pub use loops::*;
