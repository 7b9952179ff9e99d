use glam::Mat4;

use super::vertex::{QuadVertex, SpriteInstance};
use super::{ShaderError, ShaderKind, SpriteLayouts, UniformBlock};
use crate::device::DEPTH_FORMAT;

/// A compiled sprite program and its uniform slots.
///
/// The pipeline is immutable after load. Uniform setters only touch the CPU
/// mirror; [`flush`](Self::flush) uploads it before the program draws.
pub struct ShaderProgram {
    kind: ShaderKind,
    pipeline: wgpu::RenderPipeline,
    uniforms: UniformBlock,
    ubo: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    dirty: bool,
}

impl ShaderProgram {
    /// Compiles `source` for `kind`.
    ///
    /// wgpu reports WGSL and pipeline errors asynchronously; creation is
    /// wrapped in a validation scope so a bad shader fails here, not on the
    /// first frame.
    pub fn compile(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        layouts: &SpriteLayouts,
        kind: ShaderKind,
        source: &str,
    ) -> Result<Self, ShaderError> {
        let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

        let label = format!("flappy {kind} shader");
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&label),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&label),
            bind_group_layouts: &[&layouts.globals, &layouts.texture],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&label),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &module,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout(), SpriteInstance::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &module,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        if let Some(err) = pollster::block_on(scope.pop()) {
            return Err(ShaderError::Compile {
                kind,
                message: err.to_string(),
            });
        }

        let ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("flappy {kind} globals")),
            size: UniformBlock::SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("flappy {kind} globals bind group")),
            layout: &layouts.globals,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.as_entire_binding(),
            }],
        });

        log::debug!("compiled shader program '{kind}'");

        Ok(Self {
            kind,
            pipeline,
            uniforms: UniformBlock::default(),
            ubo,
            bind_group,
            dirty: true,
        })
    }

    /// Sets a 4x4 matrix uniform. Unknown names are ignored.
    pub fn set_uniform_mat4(&mut self, name: &str, value: Mat4) {
        if self.uniforms.set_mat4(name, value) {
            self.dirty = true;
        } else {
            log::trace!("program '{}' has no mat4 uniform '{name}'", self.kind);
        }
    }

    /// Sets an integer uniform. Unknown names are ignored.
    pub fn set_uniform_int(&mut self, name: &str, value: i32) {
        if self.uniforms.set_int(name, value) {
            self.dirty = true;
        } else {
            log::trace!("program '{}' has no int uniform '{name}'", self.kind);
        }
    }

    /// Uploads pending uniform writes.
    pub(crate) fn flush(&mut self, queue: &wgpu::Queue) {
        if !self.dirty {
            return;
        }
        queue.write_buffer(&self.ubo, 0, bytemuck::bytes_of(&self.uniforms));
        self.dirty = false;
    }

    pub(crate) fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    pub(crate) fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::testing::noop_device;

    #[test]
    fn invalid_wgsl_is_a_compile_error() {
        let (device, _queue) = noop_device();
        let layouts = SpriteLayouts::new(&device);

        let result = ShaderProgram::compile(
            &device,
            wgpu::TextureFormat::Bgra8UnormSrgb,
            &layouts,
            ShaderKind::Pipe,
            "fn vs_main( -> {",
        );

        match result {
            Err(ShaderError::Compile { kind, message }) => {
                assert_eq!(kind, ShaderKind::Pipe);
                assert!(!message.is_empty());
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("invalid source compiled"),
        }
    }
}
