//! Pieces shared by the overlay renderers: premultiplied blending, the
//! viewport uniform, the unit quad and an instanced pass built on them.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::coords::Viewport;
use crate::render::{RenderCtx, RenderTarget};

/// Overlay colors are premultiplied (`paint::Color`).
pub(super) fn premul_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct ViewportUniform {
    pub viewport: [f32; 2],
    pub _pad: [f32; 2],
}

impl ViewportUniform {
    /// Viewport size in physical pixels, clamped so shaders never divide by
    /// zero.
    pub(super) fn physical(viewport: Viewport) -> Self {
        Self {
            viewport: [viewport.width.max(1) as f32, viewport.height.max(1) as f32],
            _pad: [0.0; 2],
        }
    }

    const SIZE: u64 = std::mem::size_of::<Self>() as u64;
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct OverlayVertex {
    pub pos: [f32; 2],
}

impl OverlayVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<OverlayVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Unit quad, top-left origin.
const QUAD: [OverlayVertex; 4] = [
    OverlayVertex { pos: [0.0, 0.0] },
    OverlayVertex { pos: [1.0, 0.0] },
    OverlayVertex { pos: [1.0, 1.0] },
    OverlayVertex { pos: [0.0, 1.0] },
];
const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

pub(super) fn set_pass_viewport(rpass: &mut wgpu::RenderPass<'_>, viewport: Viewport) {
    rpass.set_viewport(
        viewport.x as f32,
        viewport.y as f32,
        viewport.width as f32,
        viewport.height as f32,
        0.0,
        1.0,
    );
}

/// Grows `buffer` to at least `required` elements of `stride` bytes.
///
/// Capacity goes up in powers of two, starting at 64.
pub(super) fn ensure_capacity(
    device: &wgpu::Device,
    buffer: &mut Option<wgpu::Buffer>,
    capacity: &mut usize,
    required: usize,
    stride: usize,
    label: &str,
) {
    if buffer.is_some() && required <= *capacity {
        return;
    }
    let grown = required.next_power_of_two().max(64);
    *buffer = Some(device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: (grown * stride) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    }));
    *capacity = grown;
}

/// What an overlay renderer adds on top of [`OverlayPass`].
pub(super) struct OverlayPassDesc<'a> {
    pub name: &'static str,
    pub wgsl: &'static str,
    pub format: wgpu::TextureFormat,
    pub instance_layout: wgpu::VertexBufferLayout<'a>,
    /// Group 0 entries after the viewport uniform (binding 0).
    pub layout_entries: &'a [wgpu::BindGroupLayoutEntry],
    pub resources: &'a [wgpu::BindGroupEntry<'a>],
}

/// An instanced unit-quad pass over the scene, without depth.
pub(super) struct OverlayPass {
    name: &'static str,
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    viewport_ubo: wgpu::Buffer,

    quad_vbo: wgpu::Buffer,
    quad_ibo: wgpu::Buffer,
    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,
}

impl OverlayPass {
    pub(super) fn new(device: &wgpu::Device, desc: OverlayPassDesc<'_>) -> Self {
        let name = desc.name;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("flappy {name} shader")),
            source: wgpu::ShaderSource::Wgsl(desc.wgsl.into()),
        });

        let mut layout_entries = vec![wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: wgpu::BufferSize::new(ViewportUniform::SIZE),
            },
            count: None,
        }];
        layout_entries.extend_from_slice(desc.layout_entries);

        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(&format!("flappy {name} bgl")),
            entries: &layout_entries,
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("flappy {name} layout")),
            bind_group_layouts: &[&bgl],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&format!("flappy {name} pipeline")),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[OverlayVertex::layout(), desc.instance_layout],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: desc.format,
                    blend: Some(premul_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let viewport_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("flappy {name} viewport")),
            size: ViewportUniform::SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut resources = vec![wgpu::BindGroupEntry {
            binding: 0,
            resource: viewport_ubo.as_entire_binding(),
        }];
        resources.extend(desc.resources.iter().cloned());

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("flappy {name} bind group")),
            layout: &bgl,
            entries: &resources,
        });

        let quad_vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("flappy {name} quad")),
            contents: bytemuck::cast_slice(&QUAD),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let quad_ibo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("flappy {name} quad indices")),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            name,
            pipeline,
            bind_group,
            viewport_ubo,
            quad_vbo,
            quad_ibo,
            instance_vbo: None,
            instance_capacity: 0,
        }
    }

    /// Uploads `instances` and draws them in one pass on top of the target.
    pub(super) fn draw<T: Pod>(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        instances: &[T],
    ) {
        if instances.is_empty() || ctx.viewport.is_empty() {
            return;
        }

        let uniform = ViewportUniform::physical(ctx.viewport);
        ctx.queue
            .write_buffer(&self.viewport_ubo, 0, bytemuck::bytes_of(&uniform));

        ensure_capacity(
            ctx.device,
            &mut self.instance_vbo,
            &mut self.instance_capacity,
            instances.len(),
            std::mem::size_of::<T>(),
            self.name,
        );
        let Some(instance_vbo) = self.instance_vbo.as_ref() else { return };
        ctx.queue
            .write_buffer(instance_vbo, 0, bytemuck::cast_slice(instances));

        let mut rpass = target.load_pass(self.name, false);
        set_pass_viewport(&mut rpass, ctx.viewport);
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.quad_vbo.slice(..));
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        rpass.set_index_buffer(self.quad_ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..instances.len() as u32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_uniform_never_zero() {
        let u = ViewportUniform::physical(Viewport::full((0, 0)));
        assert_eq!(u.viewport, [1.0, 1.0]);
        assert_eq!(ViewportUniform::SIZE, 16);
    }

    #[test]
    fn quad_covers_the_unit_square() {
        let xs: Vec<f32> = QUAD.iter().map(|v| v.pos[0]).collect();
        let ys: Vec<f32> = QUAD.iter().map(|v| v.pos[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 0.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 1.0);
        assert!(QUAD_INDICES.iter().all(|&i| (i as usize) < QUAD.len()));
    }
}
