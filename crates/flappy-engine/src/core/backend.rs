use crate::coords::Viewport;
use crate::device::GpuError;
use crate::input::InputState;
use crate::overlay::Overlay;
use crate::scene::SpriteBatch;

/// Everything the game loop asks of the platform, in the order it asks.
///
/// Frame calls (`clear` .. `swap_buffers`) are bracketed: `clear` opens the
/// frame and `swap_buffers` presents it. Implementations skip drawing calls
/// when no frame is open (minimized window, lost surface).
///
/// Teardown is `dispose_overlay`, `destroy_window`, then `terminate`, which
/// consumes the backend.
pub trait Backend {
    /// Current inner size of the window in physical pixels.
    fn window_size(&self) -> (u32, u32);

    /// Physical pixels per logical pixel.
    fn scale_factor(&self) -> f32 {
        1.0
    }

    /// Sets the render viewport for the coming frame.
    fn set_viewport(&mut self, viewport: Viewport);

    /// Dispatches pending OS events without blocking, feeding `input`.
    fn poll_events(&mut self, input: &mut InputState);

    /// Opens a frame and clears color and depth.
    fn clear(&mut self);

    fn draw_sprites(&mut self, batch: &SpriteBatch);

    /// Submits the scene drawn so far and returns the GPU error raised since
    /// `clear`, if any.
    fn take_gpu_error(&mut self) -> Option<GpuError>;

    /// Draws the overlay's last rendered draw data over the scene.
    fn submit_overlay(&mut self, overlay: &Overlay);

    /// Presents the frame.
    fn swap_buffers(&mut self);

    fn should_close(&self) -> bool;

    /// Releases the overlay's GPU resources and disposes `overlay`.
    fn dispose_overlay(&mut self, overlay: &mut Overlay);

    fn destroy_window(&mut self);

    /// Shuts down the windowing subsystem.
    fn terminate(self)
    where
        Self: Sized;
}
