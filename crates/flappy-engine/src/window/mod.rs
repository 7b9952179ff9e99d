//! Window + event pump.
//!
//! Owns the `winit` EventLoop and creates the single game window. The game
//! loop drives the event loop itself by pumping it once per frame, so the
//! loop keeps its strict per-frame ordering instead of living in callbacks.

mod config;
mod windowing;

pub use config::{MonitorInfo, WindowConfig};
pub use windowing::Windowing;
pub use winit::window::Window;
