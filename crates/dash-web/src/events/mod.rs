pub mod pointer;

pub use pointer::{use_drag, DragBinding, DragHandlers, Listener};
