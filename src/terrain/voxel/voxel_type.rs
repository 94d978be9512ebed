//! # Voxel Type Module
//!
//! This module defines the different kinds of terrain material a voxel can be
//! made of, plus conversions between the enum and its compact integer form.

use num_derive::FromPrimitive;

/// The underlying integer type used to represent voxel types in memory.
pub type VoxelTypeSize = u8;

/// Enumerates all terrain materials a voxel can hold.
///
/// `AIR` is special: air voxels are never rendered and their bookkeeping
/// differs from solid voxels (see [`crate::terrain::voxel::Voxel`]).
/// The `FromPrimitive` derive allows conversion from integers, which is
/// useful when voxel types travel through compact buffers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum VoxelType {
    /// An air voxel, non-solid and invisible.
    AIR,

    /// Plain dirt, found directly beneath the surface.
    DIRT,

    /// A grass voxel, the usual surface material of a column.
    GRASS,

    /// Stone, everything deeper than the dirt layer.
    STONE,
}

impl VoxelType {
    /// Converts a `VoxelTypeSize` back into a `VoxelType`.
    ///
    /// # Panics
    /// Panics if the input value doesn't correspond to a valid `VoxelType`.
    pub fn from_int(vtype: VoxelTypeSize) -> Self {
        let vtype_option = num::FromPrimitive::from_u8(vtype);
        vtype_option.unwrap()
    }

    /// Generates a random solid voxel type (never `AIR`).
    ///
    /// Primarily used to fill test terrain.
    pub fn random_solid() -> Self {
        num::FromPrimitive::from_u8(fastrand::u8(1..4)).unwrap()
    }

    /// Returns `true` for every type except `AIR`.
    #[inline]
    pub fn is_solid(self) -> bool {
        self != VoxelType::AIR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_round_trip() {
        for vtype in [
            VoxelType::AIR,
            VoxelType::DIRT,
            VoxelType::GRASS,
            VoxelType::STONE,
        ] {
            assert_eq!(VoxelType::from_int(vtype as VoxelTypeSize), vtype);
        }
    }

    #[test]
    fn random_solid_is_never_air() {
        for _ in 0..64 {
            assert!(VoxelType::random_solid().is_solid());
        }
    }
}
