//! Tincan core library
//!
//! Renders chat markdown (mentions, custom emoji, spoilers, embeds) into
//! [`RichText`]: a display string plus byte-range segments for a
//! presentation layer to draw.

pub mod cdn;
pub mod config;
pub mod markdown;
pub mod model;
pub mod render;
pub mod rich;

pub use config::{ConfigError, RenderConfig};
pub use model::{ChatStore, FetchRequest, MemoryStore};
pub use render::{RenderContext, Renderer};
pub use rich::{Attribute, RichText, Segment, SegmentKind};
