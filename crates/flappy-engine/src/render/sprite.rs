use std::ops::Range;

use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::render::{RenderCtx, RenderTarget};
use crate::scene::SpriteBatch;
use crate::shader::vertex::{QUAD_INDICES, QUAD_VERTICES};
use crate::shader::{ShaderKind, ShaderRegistry, SpriteInstance};
use crate::texture::TextureSet;

use super::common::{ensure_capacity, set_pass_viewport};

/// Draws a [`SpriteBatch`] with the sprite programs.
///
/// All instances of a frame share one buffer; each program draws its
/// contiguous range in [`ShaderKind`] order. Depth testing against the
/// cleared depth buffer resolves layering between programs.
pub struct SpriteRenderer {
    quad_vbo: wgpu::Buffer,
    quad_ibo: wgpu::Buffer,

    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,

    // scratch, reused across frames
    instances: Vec<SpriteInstance>,
}

impl SpriteRenderer {
    pub fn new(device: &wgpu::Device) -> Self {
        let quad_vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("flappy sprite quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let quad_ibo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("flappy sprite quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            quad_vbo,
            quad_ibo,
            instance_vbo: None,
            instance_capacity: 0,
            instances: Vec::new(),
        }
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        registry: &mut ShaderRegistry,
        textures: &TextureSet,
        batch: &SpriteBatch,
    ) {
        if batch.is_empty() || ctx.viewport.is_empty() {
            return;
        }

        let ranges = collect_instances(batch, &mut self.instances);

        // Uniform uploads must land before the pass that reads them.
        for kind in ShaderKind::ALL {
            let program = registry.get_mut(kind);
            program.set_uniform_mat4("vw_matrix", batch.view(kind).unwrap_or(Mat4::IDENTITY));
            program.flush(ctx.queue);
        }

        ensure_capacity(
            ctx.device,
            &mut self.instance_vbo,
            &mut self.instance_capacity,
            self.instances.len(),
            std::mem::size_of::<SpriteInstance>(),
            "flappy sprite instance vbo",
        );
        let Some(instance_vbo) = self.instance_vbo.as_ref() else { return };
        ctx.queue
            .write_buffer(instance_vbo, 0, bytemuck::cast_slice(&self.instances));

        let mut rpass = target.load_pass("flappy sprite pass", true);
        set_pass_viewport(&mut rpass, ctx.viewport);
        rpass.set_vertex_buffer(0, self.quad_vbo.slice(..));
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        rpass.set_index_buffer(self.quad_ibo.slice(..), wgpu::IndexFormat::Uint16);

        for (kind, range) in ShaderKind::ALL.into_iter().zip(ranges) {
            if range.is_empty() {
                continue;
            }
            let program = registry.get(kind);
            rpass.set_pipeline(program.pipeline());
            rpass.set_bind_group(0, program.bind_group(), &[]);
            rpass.set_bind_group(1, textures.get(kind).bind_group(), &[]);
            rpass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, range);
        }
    }
}

/// Fills `out` with the batch's instances grouped by program and returns
/// each program's instance range.
fn collect_instances(
    batch: &SpriteBatch,
    out: &mut Vec<SpriteInstance>,
) -> [Range<u32>; ShaderKind::ALL.len()] {
    out.clear();
    ShaderKind::ALL.map(|kind| {
        let start = out.len() as u32;
        out.extend(batch.iter_kind(kind).map(|s| s.to_instance()));
        start..out.len() as u32
    })
}

#[cfg(test)]
mod tests {
    use glam::{Vec2, Vec3};

    use super::*;
    use crate::scene::Sprite;

    #[test]
    fn instances_are_grouped_per_program() {
        let mut batch = SpriteBatch::new();
        batch.push(Sprite::quad(ShaderKind::Bird, Vec3::ZERO, Vec2::ONE));
        batch.push(Sprite::quad(ShaderKind::Background, Vec3::ZERO, Vec2::ONE));
        batch.push(Sprite::quad(ShaderKind::Background, Vec3::X, Vec2::ONE));

        let mut out = Vec::new();
        let ranges = collect_instances(&batch, &mut out);
        assert_eq!(out.len(), 3);
        assert_eq!(ranges, [0..2, 2..2, 2..3]);
    }
}
