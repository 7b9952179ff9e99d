use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// CPU mirror of the `Globals` uniform block every sprite program declares:
///
/// ```wgsl
/// struct Globals {
///     pr_matrix: mat4x4<f32>,
///     vw_matrix: mat4x4<f32>,
///     tex: i32,
/// }
/// ```
///
/// Layout is 144 bytes (the trailing padding keeps 16-byte alignment).
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable, PartialEq)]
pub struct UniformBlock {
    pub pr_matrix: [[f32; 4]; 4],
    pub vw_matrix: [[f32; 4]; 4],
    pub tex: i32,
    pub _pad: [i32; 3],
}

impl Default for UniformBlock {
    fn default() -> Self {
        Self {
            pr_matrix: Mat4::IDENTITY.to_cols_array_2d(),
            vw_matrix: Mat4::IDENTITY.to_cols_array_2d(),
            tex: 0,
            _pad: [0; 3],
        }
    }
}

impl UniformBlock {
    pub const SIZE: u64 = std::mem::size_of::<UniformBlock>() as u64;

    /// Writes a matrix slot by name. Returns `false` for names the block does
    /// not declare; the block is left unchanged.
    pub fn set_mat4(&mut self, name: &str, value: Mat4) -> bool {
        let slot = match name {
            "pr_matrix" => &mut self.pr_matrix,
            "vw_matrix" => &mut self.vw_matrix,
            _ => return false,
        };
        *slot = value.to_cols_array_2d();
        true
    }

    /// Writes an integer slot by name. Returns `false` for unknown names.
    pub fn set_int(&mut self, name: &str, value: i32) -> bool {
        match name {
            "tex" => {
                self.tex = value;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_matches_wgsl_size() {
        assert_eq!(UniformBlock::SIZE, 144);
    }

    #[test]
    fn known_matrix_slot_is_written() {
        let mut block = UniformBlock::default();
        let m = Mat4::from_scale(glam::Vec3::splat(2.0));
        assert!(block.set_mat4("pr_matrix", m));
        assert_eq!(block.pr_matrix, m.to_cols_array_2d());
        assert_eq!(block.vw_matrix, Mat4::IDENTITY.to_cols_array_2d());
    }

    #[test]
    fn unknown_names_leave_block_untouched() {
        let mut block = UniformBlock::default();
        let before = block;
        assert!(!block.set_mat4("ml_matrix", Mat4::ZERO));
        assert!(!block.set_int("top", 1));
        assert_eq!(block, before);
    }

    #[test]
    fn int_slot_is_written() {
        let mut block = UniformBlock::default();
        assert!(block.set_int("tex", 1));
        assert_eq!(block.tex, 1);
    }
}
