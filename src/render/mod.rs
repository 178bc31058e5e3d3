//! Renderer-facing data

pub mod object;

pub use object::{MaterialId, NodeId, RenderObject};
