//! The winit + wgpu [`Backend`].
//!
//! Initialization order: windowing, window, GPU context, sprite programs,
//! textures, overlay renderers. Teardown runs the reverse through the
//! `Backend` calls.

use std::path::PathBuf;

use ouroboros::self_referencing;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::coords::{ViewVolume, Viewport};
use crate::core::{Backend, InitError};
use crate::device::{Gpu, GpuError, GpuFrame, GpuInit, SurfaceErrorAction};
use crate::input::InputState;
use crate::overlay::Overlay;
use crate::paint::Color;
use crate::render::{PanelRenderer, RenderCtx, RenderTarget, SpriteRenderer, TextRenderer};
use crate::scene::SpriteBatch;
use crate::shader::{ShaderRegistry, ShaderSources, SpriteLayouts};
use crate::texture::TextureSet;
use crate::window::{MonitorInfo, WindowConfig, Windowing};

/// Display configuration.
#[derive(Debug, Clone)]
pub struct DisplayConfig {
    pub window: WindowConfig,
    pub gpu: GpuInit,
    /// Logical volume mapped by the shared projection matrix.
    pub view: ViewVolume,
    pub shader_dir: PathBuf,
    pub texture_dir: PathBuf,
    pub clear_color: Color,
    /// Texture slot written to every program's `tex` uniform.
    pub texture_slot: i32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            gpu: GpuInit::default(),
            view: ViewVolume::default(),
            shader_dir: PathBuf::from("res/shaders"),
            texture_dir: PathBuf::from("res/textures"),
            clear_color: Color::BLACK,
            texture_slot: 1,
        }
    }
}

#[self_referencing]
struct WindowSurface {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct SceneRenderers {
    registry: ShaderRegistry,
    textures: TextureSet,
    sprites: SpriteRenderer,
}

struct OverlayRenderers {
    panels: PanelRenderer,
    text: TextRenderer,
}

/// The game window and its GPU context.
///
/// Field order is drop order: an in-flight frame and GPU resources go before
/// the surface, the surface before the window, the window before the
/// event loop.
pub struct Display {
    frame: Option<GpuFrame>,
    overlay: Option<OverlayRenderers>,
    scene: Option<SceneRenderers>,
    surface: Option<WindowSurface>,
    windowing: Option<Windowing>,

    viewport: Viewport,
    clear_color: Color,
    monitor: MonitorInfo,
    fatal_surface: bool,
}

impl Display {
    /// Brings up the window and every GPU resource the game draws with.
    pub fn create(config: &DisplayConfig) -> Result<Self, InitError> {
        let mut windowing = Windowing::init()?;
        let (window, monitor) = windowing.create_window(&config.window)?;

        let gpu_init = config.gpu.clone();
        let surface = WindowSurfaceTryBuilder {
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .map_err(InitError::Gpu)?;

        let gpu = surface.borrow_gpu();
        let device = gpu.device();
        let format = gpu.surface_format();

        let layouts = SpriteLayouts::new(device);
        let mut registry = ShaderRegistry::load_all(
            device,
            format,
            &layouts,
            &ShaderSources::new(&config.shader_dir),
        )?;
        registry.set_projection(config.view.orthographic(), config.texture_slot);
        let textures = TextureSet::load(device, gpu.queue(), &layouts, &config.texture_dir)?;

        let scene = SceneRenderers {
            registry,
            textures,
            sprites: SpriteRenderer::new(device),
        };
        let overlay = OverlayRenderers {
            panels: PanelRenderer::new(device, format),
            text: TextRenderer::new(device, format),
        };

        let info = gpu.adapter_info();
        log::info!(
            "display ready: {} ({:?}), display aspect {:.3}",
            info.name,
            info.backend,
            monitor.aspect
        );

        Ok(Self {
            frame: None,
            overlay: Some(overlay),
            scene: Some(scene),
            surface: Some(surface),
            windowing: Some(windowing),
            viewport: Viewport::default(),
            clear_color: config.clear_color,
            monitor,
            fatal_surface: false,
        })
    }

    /// The display the window was centered on at startup.
    pub fn monitor(&self) -> MonitorInfo {
        self.monitor
    }
}

fn render_ctx<'a>(surface: &'a WindowSurface, viewport: Viewport) -> RenderCtx<'a> {
    let gpu = surface.borrow_gpu();
    RenderCtx::new(
        gpu.device(),
        gpu.queue(),
        gpu.surface_format(),
        viewport,
    )
}

impl Backend for Display {
    fn window_size(&self) -> (u32, u32) {
        self.surface.as_ref().map_or((0, 0), |s| {
            let size = s.borrow_window().inner_size();
            (size.width, size.height)
        })
    }

    fn scale_factor(&self) -> f32 {
        self.surface
            .as_ref()
            .map_or(1.0, |s| s.borrow_window().scale_factor() as f32)
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        let Some(surface) = self.surface.as_mut() else { return };
        let size = PhysicalSize::new(viewport.x + viewport.width, viewport.y + viewport.height);
        surface.with_gpu_mut(|gpu| gpu.resize(size));
    }

    fn poll_events(&mut self, input: &mut InputState) {
        if let Some(windowing) = self.windowing.as_mut() {
            windowing.poll_events(input);
        }
    }

    fn clear(&mut self) {
        self.frame = None;
        if self.viewport.is_empty() {
            log::trace!("zero-sized viewport; frame skipped");
            return;
        }
        let Some(surface) = self.surface.as_mut() else { return };
        let clear = self.clear_color;

        let (frame, fatal) = surface.with_gpu_mut(|gpu| match gpu.begin_frame() {
            Ok(mut frame) => {
                gpu.push_error_scope();
                gpu.clear(&mut frame, clear);
                (Some(frame), false)
            }
            Err(err) => match gpu.handle_surface_error(err) {
                SurfaceErrorAction::Fatal => (None, true),
                action => {
                    log::debug!("frame skipped: {action:?}");
                    (None, false)
                }
            },
        });

        if fatal {
            log::error!("surface lost beyond recovery; closing");
            self.fatal_surface = true;
        }
        self.frame = frame;
    }

    fn draw_sprites(&mut self, batch: &SpriteBatch) {
        let (Some(surface), Some(scene)) = (self.surface.as_ref(), self.scene.as_mut()) else {
            return;
        };
        let Some(frame) = self.frame.as_mut() else { return };

        let gpu = surface.borrow_gpu();
        let ctx = render_ctx(surface, self.viewport);
        let mut target = RenderTarget::new(&mut frame.encoder, &frame.view, gpu.depth_view());

        let SceneRenderers {
            registry,
            textures,
            sprites,
        } = scene;
        sprites.render(&ctx, &mut target, registry, textures, batch);
    }

    fn take_gpu_error(&mut self) -> Option<GpuError> {
        let surface = self.surface.as_mut()?;
        let frame = self.frame.as_mut();
        surface.with_gpu_mut(|gpu| gpu.pop_error_scope(frame))
    }

    fn submit_overlay(&mut self, overlay: &Overlay) {
        let Some(surface) = self.surface.as_ref() else { return };
        let gpu = surface.borrow_gpu();
        let ctx = render_ctx(surface, self.viewport);

        let (Some(frame), Some(renderers)) = (self.frame.as_mut(), self.overlay.as_mut()) else {
            return;
        };
        let mut target = RenderTarget::new(&mut frame.encoder, &frame.view, gpu.depth_view());

        let data = overlay.draw_data();
        renderers.panels.render(&ctx, &mut target, data);
        renderers.text.render(&ctx, &mut target, data, overlay.fonts());
    }

    fn swap_buffers(&mut self) {
        let Some(frame) = self.frame.take() else { return };
        if let Some(surface) = self.surface.as_ref() {
            surface.borrow_gpu().present(frame);
        }
    }

    fn should_close(&self) -> bool {
        self.fatal_surface || self.windowing.as_ref().is_none_or(|w| w.close_requested())
    }

    fn dispose_overlay(&mut self, overlay: &mut Overlay) {
        self.overlay = None;
        overlay.dispose();
    }

    fn destroy_window(&mut self) {
        self.frame = None;
        self.scene = None;
        if self.surface.take().is_some() {
            log::info!("window destroyed");
        }
    }

    fn terminate(mut self) {
        if let Some(windowing) = self.windowing.take() {
            windowing.terminate();
        }
    }
}
