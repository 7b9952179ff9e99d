//! A Flappy Bird clone on `flappy-engine`.
//!
//! [`app::start`] brings the display up on the game thread and hands it to a
//! [`driver::Driver`], which runs one [`session::Session`] (the shipped
//! [`level::Level`]) per round until the window closes.

pub mod app;
pub mod config;
pub mod driver;
pub mod level;
pub mod session;
