//! # Voxel Face Module
//!
//! This module defines the six faces of a voxel cube. The discriminants are
//! chosen so that `face as usize % 3` is the axis the face belongs to and the
//! first three variants are the positive-facing ones; both the mesher and the
//! editor rely on that encoding when they translate between face ids and
//! slice-space axes.

use cgmath::Vector3;
use num_derive::FromPrimitive;

/// Represents one of the six faces of a voxel.
///
/// The order is: [PosX, PosY, PosZ, NegX, NegY, NegZ], i.e. the three
/// positive-facing faces first, then their opposites in the same axis order.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug, FromPrimitive)]
pub enum VoxelFace {
    /// The face looking towards positive X.
    PosX = 0,

    /// The face looking towards positive Y (the top face).
    PosY = 1,

    /// The face looking towards positive Z.
    PosZ = 2,

    /// The face looking towards negative X.
    NegX = 3,

    /// The face looking towards negative Y (the bottom face).
    NegY = 4,

    /// The face looking towards negative Z.
    NegZ = 5,
}

impl VoxelFace {
    /// Returns all six faces in discriminant order.
    pub fn all() -> [VoxelFace; 6] {
        [
            VoxelFace::PosX,
            VoxelFace::PosY,
            VoxelFace::PosZ,
            VoxelFace::NegX,
            VoxelFace::NegY,
            VoxelFace::NegZ,
        ]
    }

    /// Converts a face id in `0..6` back into a `VoxelFace`.
    ///
    /// # Panics
    /// Panics if `index` is not a valid face id.
    pub fn from_index(index: usize) -> Self {
        num::FromPrimitive::from_usize(index).unwrap()
    }

    /// The axis family (0 = X, 1 = Y, 2 = Z) this face spans.
    #[inline]
    pub fn axis(self) -> usize {
        self as usize % 3
    }

    /// Whether this face looks towards the positive direction of its axis.
    #[inline]
    pub fn is_positive(self) -> bool {
        (self as usize) < 3
    }

    /// The face on the opposite side of the voxel.
    #[inline]
    pub fn opposite(self) -> VoxelFace {
        let index = self as usize;
        if index < 3 {
            VoxelFace::from_index(index + 3)
        } else {
            VoxelFace::from_index(index - 3)
        }
    }

    /// The outward unit normal of this face as an integer vector.
    pub fn normal(self) -> Vector3<i32> {
        let sign = if self.is_positive() { 1 } else { -1 };
        match self.axis() {
            0 => Vector3::new(sign, 0, 0),
            1 => Vector3::new(0, sign, 0),
            _ => Vector3::new(0, 0, sign),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_and_sign_follow_discriminants() {
        assert_eq!(VoxelFace::PosX.axis(), 0);
        assert_eq!(VoxelFace::NegY.axis(), 1);
        assert_eq!(VoxelFace::PosZ.axis(), 2);
        assert!(VoxelFace::PosZ.is_positive());
        assert!(!VoxelFace::NegX.is_positive());
    }

    #[test]
    fn opposite_faces_pair_up() {
        for face in VoxelFace::all() {
            assert_eq!(face.opposite().opposite(), face);
            assert_eq!(face.axis(), face.opposite().axis());
            assert_eq!(face.normal(), -face.opposite().normal());
        }
    }
}
