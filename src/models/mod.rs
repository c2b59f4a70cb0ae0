pub mod container;
pub mod photo;

pub use container::*;
pub use photo::*;
