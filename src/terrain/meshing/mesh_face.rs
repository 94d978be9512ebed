//! # Mesh Face Module
//!
//! The bookkeeping record for one merged rectangle of same-type, same-facing
//! voxel faces.

use cgmath::{Point3, Vector3};

use crate::terrain::voxel::{VoxelFace, VoxelType};

/// One axis-aligned rectangle of merged voxel faces in the quad buffer.
///
/// The rectangle lives in the slice space of its axis: `slice_space_position`
/// is the lower-left cell and the depth along the face axis, `scale` is
/// (width, height, 1). `mesh_index` points at the rectangle's four vertex
/// records and stays stable for the rectangle's whole life; freed slots are
/// recycled rather than compacted so voxel face tables never need fixing up
/// when an unrelated quad dies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshFace {
    /// Index of this quad's slot in the vertex/normal/uv buffers.
    pub mesh_index: usize,

    /// The axis family (0..3) whose slice space this rectangle lives in.
    pub slice_dimension: usize,

    /// Which voxel face this rectangle covers.
    pub face: VoxelFace,

    /// Lower-left corner of the rectangle in slice space; the third
    /// component is the depth along the face axis.
    pub slice_space_position: Point3<i32>,

    /// (width, height, 1) of the rectangle in slice space.
    pub scale: Vector3<i32>,

    /// The material shared by every voxel face merged into this rectangle.
    pub voxel_type: VoxelType,
}

impl MeshFace {
    /// Whether the slice-space cell `position` lies inside this rectangle,
    /// at the same depth.
    pub fn contains(&self, position: Point3<i32>) -> bool {
        position.z == self.slice_space_position.z
            && position.x >= self.slice_space_position.x
            && position.x < self.slice_space_position.x + self.scale.x
            && position.y >= self.slice_space_position.y
            && position.y < self.slice_space_position.y + self.scale.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_respects_bounds_and_depth() {
        let quad = MeshFace {
            mesh_index: 0,
            slice_dimension: 1,
            face: VoxelFace::PosY,
            slice_space_position: Point3::new(2, 3, 5),
            scale: Vector3::new(3, 2, 1),
            voxel_type: VoxelType::GRASS,
        };
        assert!(quad.contains(Point3::new(2, 3, 5)));
        assert!(quad.contains(Point3::new(4, 4, 5)));
        assert!(!quad.contains(Point3::new(5, 3, 5)));
        assert!(!quad.contains(Point3::new(2, 5, 5)));
        assert!(!quad.contains(Point3::new(2, 3, 6)));
    }
}
