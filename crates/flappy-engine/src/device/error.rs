/// High-level response after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Fatal error (commonly OOM); terminate gracefully.
    Fatal,
}

/// A GPU error observed after rendering a frame.
///
/// Frame-time GPU errors are reported, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("gpu error: {message}")]
pub struct GpuError {
    pub message: String,
}

impl GpuError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<wgpu::Error> for GpuError {
    fn from(err: wgpu::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Validation scope around one frame's GPU work.
///
/// Encoder errors surface when the command buffer is finished, so the frame's
/// commands must be submitted before [`close`](Self::close).
#[derive(Default)]
pub(crate) struct FrameErrorScope {
    guard: Option<wgpu::ErrorScopeGuard>,
}

impl FrameErrorScope {
    /// Opens the scope unless one is already open.
    pub(crate) fn open(&mut self, device: &wgpu::Device) {
        if self.guard.is_none() {
            self.guard = Some(device.push_error_scope(wgpu::ErrorFilter::Validation));
        }
    }

    pub(crate) fn is_open(&self) -> bool {
        self.guard.is_some()
    }

    /// Closes the scope, returning the first error it caught.
    pub(crate) fn close(&mut self) -> Option<GpuError> {
        let guard = self.guard.take()?;
        pollster::block_on(guard.pop()).map(GpuError::from)
    }
}

/// Finishes and submits everything recorded so far, leaving a fresh encoder
/// in its place.
pub(crate) fn submit_recorded(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    encoder: &mut wgpu::CommandEncoder,
) {
    let fresh = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("flappy frame"),
    });
    let recorded = std::mem::replace(encoder, fresh);
    queue.submit([recorded.finish()]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::testing::noop_device;

    fn target(device: &wgpu::Device) -> wgpu::TextureView {
        device
            .create_texture(&wgpu::TextureDescriptor {
                label: None,
                size: wgpu::Extent3d {
                    width: 4,
                    height: 4,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8Unorm,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            })
            .create_view(&wgpu::TextureViewDescriptor::default())
    }

    /// Records a draw with no pipeline bound.
    fn record_invalid_draw(encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: None,
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations::default(),
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
        pass.draw(0..3, 0..1);
    }

    #[test]
    fn encoder_errors_are_caught_once_submitted() {
        let (device, queue) = noop_device();
        let view = target(&device);
        let mut scope = FrameErrorScope::default();
        let mut encoder = device.create_command_encoder(&Default::default());

        scope.open(&device);
        record_invalid_draw(&mut encoder, &view);
        submit_recorded(&device, &queue, &mut encoder);

        assert!(scope.close().is_some());
        assert!(!scope.is_open());

        // The replacement encoder is clean and the frame can still present.
        queue.submit([encoder.finish()]);
    }

    #[test]
    fn clean_frame_reports_nothing() {
        let (device, queue) = noop_device();
        let mut scope = FrameErrorScope::default();
        let mut encoder = device.create_command_encoder(&Default::default());

        scope.open(&device);
        scope.open(&device);
        submit_recorded(&device, &queue, &mut encoder);

        assert_eq!(scope.close(), None);
        assert_eq!(scope.close(), None);
    }
}
