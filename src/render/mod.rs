//! Terminal presentation: the display sink the game writes to, the view
//! model it feeds, and the ratatui renderer that draws it.

pub mod renderer;
pub mod screen;
pub mod sink;
pub mod views;

pub use renderer::Renderer;
pub use screen::{Screen, ViewBuffer, ViewId};
pub use sink::{DisplayCommand, DisplaySink, QueuedDisplay, SharedDisplay};
