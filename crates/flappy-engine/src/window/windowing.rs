use std::time::Duration;

use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowAttributes, WindowId};

use super::{MonitorInfo, WindowConfig};
use crate::core::InitError;
use crate::input::platform::translate_window_event;
use crate::input::{InputEvent, InputState};

/// Pumps spent waiting for the platform to hand out an active event loop.
const CREATE_ATTEMPTS: u32 = 200;
const CREATE_PUMP_TIMEOUT: Duration = Duration::from_millis(5);

/// The windowing subsystem: one event loop, pumped by the game loop.
///
/// The event loop is `!Send`; a `Windowing` stays on the thread that
/// initialized it.
pub struct Windowing {
    event_loop: EventLoop<()>,
    handler: EventCollector,
}

impl Windowing {
    /// Creates the event loop.
    ///
    /// Outside macOS the loop may live on any thread; the game runs it on its
    /// own thread.
    pub fn init() -> Result<Self, InitError> {
        let mut builder = EventLoop::builder();

        #[cfg(any(
            target_os = "linux",
            target_os = "dragonfly",
            target_os = "freebsd",
            target_os = "netbsd",
            target_os = "openbsd"
        ))]
        winit::platform::x11::EventLoopBuilderExtX11::with_any_thread(&mut builder, true);

        #[cfg(target_os = "windows")]
        winit::platform::windows::EventLoopBuilderExtWindows::with_any_thread(&mut builder, true);

        let event_loop = builder.build().map_err(InitError::WindowingInit)?;
        log::info!("windowing initialized");

        Ok(Self {
            event_loop,
            handler: EventCollector::default(),
        })
    }

    /// Creates the window centered on the primary display.
    ///
    /// winit only creates windows from inside the event loop, so the request
    /// is queued and the loop pumped until it is served.
    pub fn create_window(&mut self, config: &WindowConfig) -> Result<(Window, MonitorInfo), InitError> {
        let attrs = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(PhysicalSize::new(config.size.0, config.size.1))
            .with_resizable(config.resizable)
            .with_visible(true);

        self.handler.request = Some(WindowRequest {
            attrs,
            size: config.size,
        });

        for _ in 0..CREATE_ATTEMPTS {
            let status = self
                .event_loop
                .pump_app_events(Some(CREATE_PUMP_TIMEOUT), &mut self.handler);

            if let Some(created) = self.handler.created.take() {
                let (window, monitor) = created?;
                log::info!(
                    "window '{}' {}x{} on a {}x{} display",
                    config.title,
                    config.size.0,
                    config.size.1,
                    monitor.size.0,
                    monitor.size.1
                );
                return Ok((window, monitor));
            }
            if let PumpStatus::Exit(code) = status {
                log::error!("event loop exited with code {code} before the window was created");
                break;
            }
        }

        self.handler.request = None;
        Err(InitError::WindowNotCreated)
    }

    /// Dispatches queued OS events without blocking and applies the input
    /// ones to `input`.
    pub fn poll_events(&mut self, input: &mut InputState) {
        input.begin_frame();

        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.handler);
        if let PumpStatus::Exit(code) = status {
            log::debug!("event loop exit status {code}");
            self.handler.close_requested = true;
        }

        for ev in self.handler.pending.drain(..) {
            input.apply_event(&ev);
        }
    }

    /// True once the user asked to close the window.
    pub fn close_requested(&self) -> bool {
        self.handler.close_requested
    }

    /// Shuts the windowing subsystem down.
    pub fn terminate(self) {
        drop(self.event_loop);
        log::info!("windowing terminated");
    }
}

struct WindowRequest {
    attrs: WindowAttributes,
    size: (u32, u32),
}

/// Collects what the event loop reports between pumps.
#[derive(Default)]
struct EventCollector {
    request: Option<WindowRequest>,
    created: Option<Result<(Window, MonitorInfo), InitError>>,

    pending: Vec<InputEvent>,
    close_requested: bool,
}

impl EventCollector {
    /// Records a close request or queues the input the event carries.
    fn handle(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                log::info!("close requested");
                self.close_requested = true;
            }
            _ => {
                if let Some(ev) = translate_window_event(event) {
                    log::trace!("input {ev:?}");
                    self.pending.push(ev);
                }
            }
        }
    }

    fn serve_request(&mut self, event_loop: &ActiveEventLoop) {
        let Some(WindowRequest { attrs, size }) = self.request.take() else {
            return;
        };
        self.created = Some(create_centered(event_loop, attrs, size));
    }
}

fn create_centered(
    event_loop: &ActiveEventLoop,
    attrs: WindowAttributes,
    size: (u32, u32),
) -> Result<(Window, MonitorInfo), InitError> {
    let monitor = event_loop
        .primary_monitor()
        .or_else(|| event_loop.available_monitors().next())
        .ok_or(InitError::NoDisplay)?;

    let mode = monitor.size();
    let info = MonitorInfo::from_size((mode.width, mode.height));
    let (x, y) = info.centered_position(size);
    let origin = monitor.position();

    let attrs = attrs.with_position(PhysicalPosition::new(origin.x + x, origin.y + y));
    let window = event_loop
        .create_window(attrs)
        .map_err(InitError::WindowCreate)?;

    Ok((window, info))
}

impl ApplicationHandler for EventCollector {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        self.serve_request(event_loop);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // Some platforms never send `resumed` to a pumped loop.
        self.serve_request(event_loop);
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.handle(&event);
    }
}

#[cfg(test)]
mod tests {
    use winit::event::Modifiers as WinitModifiers;
    use winit::keyboard::ModifiersState;

    use super::*;
    use crate::input::Modifiers;

    #[test]
    fn close_stays_false_until_requested() {
        let mut collector = EventCollector::default();
        collector.handle(&WindowEvent::Resized(PhysicalSize::new(800, 600)));
        collector.handle(&WindowEvent::Occluded(true));
        assert!(!collector.close_requested);
        assert!(collector.pending.is_empty());

        collector.handle(&WindowEvent::CloseRequested);
        assert!(collector.close_requested);
    }

    #[test]
    fn destroyed_window_requests_close() {
        let mut collector = EventCollector::default();
        collector.handle(&WindowEvent::Destroyed);
        assert!(collector.close_requested);
        assert!(collector.pending.is_empty());
    }

    #[test]
    fn input_events_are_queued_in_order() {
        let mut collector = EventCollector::default();
        collector.handle(&WindowEvent::Focused(true));
        collector.handle(&WindowEvent::ModifiersChanged(WinitModifiers::from(
            ModifiersState::SHIFT,
        )));

        assert!(!collector.close_requested);
        assert_eq!(
            collector.pending,
            vec![
                InputEvent::Focused(true),
                InputEvent::ModifiersChanged(Modifiers {
                    shift: true,
                    ..Modifiers::default()
                }),
            ]
        );
    }
}
