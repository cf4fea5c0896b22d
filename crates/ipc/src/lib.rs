//! Wire protocol for Scribe
//!
//! Defines the documents exchanged between the handwriting engine and its
//! external collaborators:
//! - [`StyledResponse`] - AI-produced text with an optional style directive
//! - [`RendererMessage`] - strokes handed to a renderer during playback

mod error;
mod renderer;
mod style;

pub use error::IpcError;
pub use renderer::{RendererMessage, WirePoint, WireStrokeRole};
pub use style::{StyleDirective, StyledResponse};
