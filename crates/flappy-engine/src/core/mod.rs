//! Core engine-facing contracts.
//!
//! This module defines the stable interface between the game loop and the
//! platform (window, events, GPU). The loop only talks to a [`Backend`], so it
//! never touches winit or wgpu directly and can run against a recording
//! backend in tests.

mod backend;
mod error;

pub use backend::Backend;
pub use error::InitError;
