use std::fmt;

/// The fixed set of sprite programs the game renders with.
///
/// Declaration order is draw order for sprites at equal depth.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum ShaderKind {
    Background,
    Pipe,
    Bird,
}

impl ShaderKind {
    pub const ALL: [ShaderKind; 3] = [ShaderKind::Background, ShaderKind::Pipe, ShaderKind::Bird];

    pub const fn name(self) -> &'static str {
        match self {
            ShaderKind::Background => "bg",
            ShaderKind::Pipe => "pipe",
            ShaderKind::Bird => "bird",
        }
    }

    /// Dense index into per-kind arrays.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// WGSL source file name inside the shader directory.
    pub fn file_name(self) -> String {
        format!("{}.wgsl", self.name())
    }

    /// Texture file name inside the texture directory.
    pub fn texture_file_name(self) -> String {
        format!("{}.png", self.name())
    }
}

impl fmt::Display for ShaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
