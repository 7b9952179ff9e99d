use std::sync::Arc;

use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::depth::DepthBuffer;
use super::surface::Swapchain;
use super::error::{submit_recorded, FrameErrorScope};
use super::{GpuError, GpuFrame, SurfaceErrorAction};
use crate::paint::Color;

/// GPU setup options.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Pick an sRGB swapchain format when the surface offers one.
    pub prefer_srgb: bool,

    /// The game advances one tick per presented frame, so `Fifo` (vsync)
    /// doubles as the tick rate.
    pub present_mode: wgpu::PresentMode,

    /// Falls back to the surface's first mode when unsupported.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub required_features: wgpu::Features,
    pub required_limits: wgpu::Limits,
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_defaults(),
            desired_maximum_frame_latency: 2,
        }
    }
}

/// The game window's graphics context.
///
/// Owns the device, the swapchain and a depth buffer kept at the swapchain
/// size. Every frame is cleared in color and depth and may be bracketed by a
/// validation error scope.
pub struct Gpu<'w> {
    _instance: wgpu::Instance,
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,

    swapchain: Swapchain<'w>,
    depth: DepthBuffer,

    frame_scope: FrameErrorScope,
}

impl<'w> Gpu<'w> {
    /// Brings up wgpu for `window`.
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();
        anyhow::ensure!(
            size.width > 0 && size.height > 0,
            "window reports a {}x{} drawable",
            size.width,
            size.height
        );

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .context("failed to create the window surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no GPU adapter can present to the window")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("flappy device"),
                required_features: init.required_features,
                required_limits: init.required_limits.clone(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to open the GPU device")?;

        // Errors outside the frame scope (overlay passes, present) are
        // reported, never fatal.
        device.on_uncaptured_error(Arc::new(|err| {
            log::error!("uncaptured gpu error: {err}");
        }));

        let swapchain = Swapchain::configure(surface, &adapter, &device, size, &init)?;
        let depth = DepthBuffer::new(&device, size);

        log::debug!(
            "swapchain {:?} {}x{} ({:?})",
            swapchain.format(),
            size.width,
            size.height,
            init.present_mode
        );

        Ok(Self {
            _instance: instance,
            adapter,
            device,
            queue,
            swapchain,
            depth,
            frame_scope: FrameErrorScope::default(),
        })
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.swapchain.format()
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    pub fn depth_view(&self) -> &wgpu::TextureView {
        self.depth.view()
    }

    /// Follows the window's drawable size. Cheap when nothing changed.
    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        if size == self.swapchain.size() {
            return;
        }
        if self.swapchain.resize(&self.device, size) {
            self.depth = DepthBuffer::new(&self.device, size);
            log::debug!("swapchain resized to {}x{}", size.width, size.height);
        }
    }

    pub fn begin_frame(&self) -> Result<GpuFrame, wgpu::SurfaceError> {
        let surface_texture = self.swapchain.acquire()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("flappy frame"),
            });

        Ok(GpuFrame {
            surface_texture,
            view,
            encoder,
        })
    }

    /// Clears color to `color` and depth to the far plane (1.0).
    pub fn clear(&self, frame: &mut GpuFrame, color: Color) {
        let color_attachment = wgpu::RenderPassColorAttachment {
            view: &frame.view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(color.to_wgpu()),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        };
        let depth_attachment = wgpu::RenderPassDepthStencilAttachment {
            view: self.depth.view(),
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(1.0),
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        };

        frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("flappy clear"),
            color_attachments: &[Some(color_attachment)],
            depth_stencil_attachment: Some(depth_attachment),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
    }

    pub fn present(&self, frame: GpuFrame) {
        let GpuFrame {
            surface_texture,
            view,
            encoder,
        } = frame;
        self.queue.submit([encoder.finish()]);
        // The view borrows the texture being presented.
        drop(view);
        surface_texture.present();
    }

    /// Starts collecting validation errors. At most one scope is open.
    pub fn push_error_scope(&mut self) {
        self.frame_scope.open(&self.device);
    }

    /// Submits what `frame` recorded so far, then closes the open scope and
    /// returns the first error it caught. Later passes go to a new encoder.
    pub fn pop_error_scope(&mut self, frame: Option<&mut GpuFrame>) -> Option<GpuError> {
        if !self.frame_scope.is_open() {
            return None;
        }
        if let Some(frame) = frame {
            submit_recorded(&self.device, &self.queue, &mut frame.encoder);
        }
        self.frame_scope.close()
    }

    pub fn handle_surface_error(&mut self, err: wgpu::SurfaceError) -> SurfaceErrorAction {
        self.swapchain.recover(&self.device, err)
    }
}
