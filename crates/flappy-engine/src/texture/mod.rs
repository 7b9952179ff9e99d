//! Sprite textures.
//!
//! One RGBA texture per [`ShaderKind`], decoded from PNG with the `image`
//! crate and bound as group 1 of the sprite programs.

use std::path::{Path, PathBuf};

use crate::shader::{ShaderKind, SpriteLayouts};

#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to load texture {path}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
}

/// A GPU texture with its sampler bind group.
pub struct Texture {
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

impl Texture {
    /// Uploads straight-alpha RGBA8 pixels.
    pub fn from_rgba(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layouts: &SpriteLayouts,
        sampler: &wgpu::Sampler,
        label: &str,
        pixels: &[u8],
        width: u32,
        height: u32,
    ) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &layouts.texture,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        Self {
            _texture: texture,
            bind_group,
        }
    }

    pub(crate) fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

/// The sprite textures, one per shader kind.
pub struct TextureSet {
    textures: Vec<Texture>,
}

impl TextureSet {
    /// Decodes `<dir>/<kind>.png` for every kind. A missing or undecodable file
    /// aborts the load.
    pub fn load(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layouts: &SpriteLayouts,
        dir: &Path,
    ) -> Result<Self, TextureError> {
        // Pixel art: nearest filtering keeps edges crisp.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("flappy sprite sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let mut textures = Vec::with_capacity(ShaderKind::ALL.len());
        for kind in ShaderKind::ALL {
            let path = texture_path(dir, kind);
            let img = image::open(&path)
                .map_err(|source| TextureError::Decode {
                    path: path.display().to_string(),
                    source,
                })?
                .to_rgba8();
            let (w, h) = img.dimensions();
            log::debug!("texture '{kind}' {w}x{h} from {}", path.display());
            textures.push(Texture::from_rgba(
                device,
                queue,
                layouts,
                &sampler,
                &format!("flappy {kind} texture"),
                img.as_raw(),
                w,
                h,
            ));
        }

        Ok(Self { textures })
    }

    pub fn get(&self, kind: ShaderKind) -> &Texture {
        &self.textures[kind.index()]
    }
}

pub fn texture_path(dir: &Path, kind: ShaderKind) -> PathBuf {
    dir.join(kind.texture_file_name())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texture_path_uses_kind_name() {
        assert_eq!(
            texture_path(Path::new("res/textures"), ShaderKind::Background),
            PathBuf::from("res/textures/bg.png")
        );
    }
}
