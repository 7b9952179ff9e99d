use bytemuck::{Pod, Zeroable};

use crate::overlay::DrawData;
use crate::render::{RenderCtx, RenderTarget};

use super::common::{OverlayPass, OverlayPassDesc};

/// Solid overlay rectangles: window backgrounds and title strips.
pub struct PanelRenderer {
    pass: OverlayPass,
    instances: Vec<PanelInstance>,
}

impl PanelRenderer {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let pass = OverlayPass::new(
            device,
            OverlayPassDesc {
                name: "panel",
                wgsl: include_str!("shaders/panel.wgsl"),
                format: surface_format,
                instance_layout: PanelInstance::layout(),
                layout_entries: &[],
                resources: &[],
            },
        );
        Self {
            pass,
            instances: Vec::new(),
        }
    }

    /// Draws the panels of `data`, scaled from logical to physical pixels.
    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, data: &DrawData) {
        collect_panels(data, data.framebuffer_scale(ctx.viewport), &mut self.instances);
        self.pass.draw(ctx, target, &self.instances);
    }
}

fn collect_panels(data: &DrawData, scale: f32, out: &mut Vec<PanelInstance>) {
    out.clear();
    out.extend(data.panels().iter().filter_map(|panel| {
        let rect = panel.rect.normalized();
        if rect.is_empty() {
            return None;
        }
        Some(PanelInstance {
            origin: (rect.origin * scale).to_array(),
            size: (rect.size * scale).to_array(),
            color: panel.color.to_array(),
        })
    }));
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct PanelInstance {
    origin: [f32; 2],
    size: [f32; 2],
    color: [f32; 4],
}

impl PanelInstance {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        1 => Float32x2,
        2 => Float32x2,
        3 => Float32x4
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PanelInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}
