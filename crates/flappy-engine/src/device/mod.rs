//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - configuring the Surface (swapchain) and its depth buffer
//! - acquiring, clearing and presenting frames
//! - surfacing per-frame GPU errors

mod depth;
mod error;
mod frame;
mod gpu;
mod surface;

pub use depth::DEPTH_FORMAT;
pub use error::{GpuError, SurfaceErrorAction};
pub use frame::GpuFrame;
pub use gpu::{Gpu, GpuInit};
