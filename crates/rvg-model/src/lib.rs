pub mod catalog;
pub mod chapter;

pub use catalog::*;
pub use chapter::*;
