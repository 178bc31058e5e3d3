//! Endless terrain - streams procedurally generated terrain chunks around a moving observer

pub mod core;
pub mod math;
pub mod render;
pub mod streaming;
pub mod terrain;
