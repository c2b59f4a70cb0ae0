pub mod events;
pub mod scroll;
pub mod window;

pub use events::{Edge, WindowEvent};
pub use scroll::ScrollMemory;
pub use window::{LoadOutcome, PhotoWindow};
