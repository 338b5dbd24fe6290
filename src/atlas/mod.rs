//! Atlas image buffers and compositing.
//!
//! This module resamples every unique entry to the planned cell size and
//! blits it into a single atlas buffer per role.

mod compositor;
mod buffer;

pub use compositor::{compose, compose_diffuse, compose_normal};
pub use buffer::{AtlasImage, AtlasRole};
