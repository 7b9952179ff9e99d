use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use fontdue::layout::{CoordinateSystem, GlyphRasterConfig, Layout, LayoutSettings, TextStyle};

use crate::overlay::DrawData;
use crate::render::{RenderCtx, RenderTarget};
use crate::text::FontSystem;

use super::common::{OverlayPass, OverlayPassDesc};

const ATLAS_SIZE: u32 = 1024;
const GLYPH_PADDING: u32 = 1;

/// Where a glyph lives in the atlas, in normalized texture coordinates.
#[derive(Debug, Copy, Clone, PartialEq)]
struct AtlasCell {
    uv_min: [f32; 2],
    uv_max: [f32; 2],
}

impl AtlasCell {
    fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        let size = ATLAS_SIZE as f32;
        Self {
            uv_min: [x as f32 / size, y as f32 / size],
            uv_max: [(x + w) as f32 / size, (y + h) as f32 / size],
        }
    }
}

/// Packs glyphs left to right in rows ("shelves") as tall as their tallest
/// glyph. Nothing is ever freed.
#[derive(Debug)]
struct ShelfPacker {
    x: u32,
    shelf_top: u32,
    shelf_height: u32,
    full: bool,
}

impl Default for ShelfPacker {
    fn default() -> Self {
        Self {
            x: GLYPH_PADDING,
            shelf_top: GLYPH_PADDING,
            shelf_height: 0,
            full: false,
        }
    }
}

impl ShelfPacker {
    /// Top-left corner of a free `w` x `h` cell.
    fn place(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        if self.full {
            return None;
        }

        if self.x + w + GLYPH_PADDING > ATLAS_SIZE {
            self.shelf_top += self.shelf_height + GLYPH_PADDING;
            self.shelf_height = 0;
            self.x = GLYPH_PADDING;
        }
        if self.shelf_top + h + GLYPH_PADDING > ATLAS_SIZE {
            self.full = true;
            return None;
        }

        let corner = (self.x, self.shelf_top);
        self.x += w + GLYPH_PADDING;
        self.shelf_height = self.shelf_height.max(h);
        Some(corner)
    }
}

/// Overlay text runs, drawn from a glyph atlas.
///
/// Glyphs are rasterized by fontdue on first use and kept for the renderer's
/// lifetime in a 1024x1024 R8 atlas keyed by `GlyphRasterConfig`. A score
/// readout needs a dozen glyphs, so the atlas never grows.
pub struct TextRenderer {
    pass: OverlayPass,
    atlas: wgpu::Texture,
    packer: ShelfPacker,
    glyphs: HashMap<GlyphRasterConfig, AtlasCell>,

    layout: Layout<()>,
    instances: Vec<GlyphInstance>,
}

impl TextRenderer {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let atlas = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("flappy glyph atlas"),
            size: wgpu::Extent3d {
                width: ATLAS_SIZE,
                height: ATLAS_SIZE,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let atlas_view = atlas.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("flappy glyph sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let pass = OverlayPass::new(
            device,
            OverlayPassDesc {
                name: "text",
                wgsl: include_str!("shaders/text.wgsl"),
                format: surface_format,
                instance_layout: GlyphInstance::layout(),
                layout_entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
                resources: &[
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(&atlas_view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::Sampler(&sampler),
                    },
                ],
            },
        );

        Self {
            pass,
            atlas,
            packer: ShelfPacker::default(),
            glyphs: HashMap::new(),
            layout: Layout::new(CoordinateSystem::PositiveYDown),
            instances: Vec::new(),
        }
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        data: &DrawData,
        fonts: &FontSystem,
    ) {
        if ctx.viewport.is_empty() {
            return;
        }
        let scale = data.framebuffer_scale(ctx.viewport);
        self.instances.clear();

        for run in data.texts() {
            let Some(font) = fonts.get(run.font) else {
                log::warn!("text run '{}' uses an unknown font {:?}", run.text, run.font);
                continue;
            };

            self.layout.reset(&LayoutSettings {
                x: run.origin.x * scale,
                y: run.origin.y * scale,
                ..LayoutSettings::default()
            });
            self.layout
                .append(&[font], &TextStyle::new(&run.text, run.size * scale, 0));

            let color = run.color.to_array();
            for g in self.layout.glyphs() {
                if !g.char_data.rasterize() || g.width == 0 || g.height == 0 {
                    continue;
                }

                let cell = match self.glyphs.get(&g.key) {
                    Some(cell) => *cell,
                    None => {
                        let (metrics, bitmap) = font.rasterize_config(g.key);
                        let Some(cell) = upload_glyph(
                            ctx.queue,
                            &self.atlas,
                            &mut self.packer,
                            &bitmap,
                            metrics.width as u32,
                            metrics.height as u32,
                        ) else {
                            continue;
                        };
                        self.glyphs.insert(g.key, cell);
                        cell
                    }
                };

                self.instances.push(GlyphInstance {
                    dst_min: [g.x, g.y],
                    dst_max: [g.x + g.width as f32, g.y + g.height as f32],
                    uv_min: cell.uv_min,
                    uv_max: cell.uv_max,
                    color,
                });
            }
        }

        self.pass.draw(ctx, target, &self.instances);
    }
}

/// Copies a rasterized glyph into the atlas. `None` once the atlas is full
/// or for empty bitmaps.
fn upload_glyph(
    queue: &wgpu::Queue,
    atlas: &wgpu::Texture,
    packer: &mut ShelfPacker,
    bitmap: &[u8],
    w: u32,
    h: u32,
) -> Option<AtlasCell> {
    if w == 0 || h == 0 {
        return None;
    }
    let was_full = packer.full;
    let Some((x, y)) = packer.place(w, h) else {
        if !was_full {
            log::warn!("glyph atlas full ({ATLAS_SIZE}x{ATLAS_SIZE}); new glyphs are dropped");
        }
        return None;
    };

    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: atlas,
            mip_level: 0,
            origin: wgpu::Origin3d { x, y, z: 0 },
            aspect: wgpu::TextureAspect::All,
        },
        bitmap,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(w),
            rows_per_image: Some(h),
        },
        wgpu::Extent3d {
            width: w,
            height: h,
            depth_or_array_layers: 1,
        },
    );

    Some(AtlasCell::new(x, y, w, h))
}

/// One glyph quad in physical pixels (48 bytes, locations 1..=5).
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct GlyphInstance {
    dst_min: [f32; 2],
    dst_max: [f32; 2],
    uv_min: [f32; 2],
    uv_max: [f32; 2],
    color: [f32; 4],
}

impl GlyphInstance {
    const ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        1 => Float32x2,
        2 => Float32x2,
        3 => Float32x2,
        4 => Float32x2,
        5 => Float32x4
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GlyphInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packer_fills_rows_then_wraps() {
        let mut p = ShelfPacker::default();
        assert_eq!(p.place(10, 20), Some((1, 1)));
        assert_eq!(p.place(10, 5), Some((12, 1)));

        let wide = ATLAS_SIZE - 10;
        assert_eq!(p.place(wide, 4), Some((1, 22)));
    }

    #[test]
    fn atlas_cells_are_normalized() {
        let cell = AtlasCell::new(0, 512, 512, 512);
        assert_eq!(cell.uv_min, [0.0, 0.5]);
        assert_eq!(cell.uv_max, [0.5, 1.0]);
    }

    #[test]
    fn packer_reports_full_once() {
        let mut p = ShelfPacker::default();
        assert!(p.place(ATLAS_SIZE - 2, ATLAS_SIZE - 2).is_some());
        assert_eq!(p.place(4, 4), None);
        assert!(p.full);
        assert_eq!(p.place(1, 1), None);
    }
}
