//! Flappy engine crate.
//!
//! Owns the window, input, GPU and overlay pieces the game loop drives.
//! Everything the loop calls per frame goes through [`core::Backend`], so the
//! loop itself can run against a recording backend in tests.

pub mod core;
pub mod coords;
pub mod device;
pub mod display;
pub mod input;
pub mod logging;
pub mod overlay;
pub mod paint;
pub mod render;
pub mod scene;
pub mod shader;
pub mod text;
pub mod texture;
pub mod window;
