use std::path::PathBuf;

use glam::Mat4;

use super::{ShaderError, ShaderKind, ShaderProgram, SpriteLayouts};

/// Where the sprite program sources live on disk.
#[derive(Debug, Clone)]
pub struct ShaderSources {
    pub dir: PathBuf,
}

impl ShaderSources {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self, kind: ShaderKind) -> PathBuf {
        self.dir.join(kind.file_name())
    }

    fn read(&self, kind: ShaderKind) -> Result<String, ShaderError> {
        let path = self.path(kind);
        std::fs::read_to_string(&path).map_err(|source| ShaderError::Read {
            kind,
            path: path.display().to_string(),
            source,
        })
    }
}

/// The loaded sprite programs, one per [`ShaderKind`].
pub struct ShaderRegistry {
    programs: Vec<ShaderProgram>,
}

impl ShaderRegistry {
    /// Reads and compiles every program. The first failure aborts the load.
    pub fn load_all(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        layouts: &SpriteLayouts,
        sources: &ShaderSources,
    ) -> Result<Self, ShaderError> {
        let mut programs = Vec::with_capacity(ShaderKind::ALL.len());
        for kind in ShaderKind::ALL {
            let src = sources.read(kind)?;
            programs.push(ShaderProgram::compile(device, surface_format, layouts, kind, &src)?);
        }
        log::info!("loaded {} shader programs from {}", programs.len(), sources.dir.display());
        Ok(Self { programs })
    }

    pub fn get(&self, kind: ShaderKind) -> &ShaderProgram {
        &self.programs[kind.index()]
    }

    pub fn get_mut(&mut self, kind: ShaderKind) -> &mut ShaderProgram {
        &mut self.programs[kind.index()]
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ShaderProgram> {
        self.programs.iter_mut()
    }

    /// Binds the shared projection and texture slot on every program.
    pub fn set_projection(&mut self, projection: Mat4, texture_slot: i32) {
        for program in self.iter_mut() {
            program.set_uniform_mat4("pr_matrix", projection);
            program.set_uniform_int("tex", texture_slot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_path_joins_kind_file() {
        let sources = ShaderSources::new("res/shaders");
        assert_eq!(sources.path(ShaderKind::Pipe), PathBuf::from("res/shaders/pipe.wgsl"));
    }

    #[test]
    fn missing_source_is_a_read_error() {
        let sources = ShaderSources::new("definitely/not/here");
        let err = sources.read(ShaderKind::Bird).unwrap_err();
        assert!(matches!(err, ShaderError::Read { kind: ShaderKind::Bird, .. }));
    }
}
