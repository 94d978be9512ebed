//! # Face Data Module
//!
//! Static per-face geometry: the unit-cube corner positions, normals and
//! texture coordinates a fresh 1x1 quad is stamped out with. The mesher
//! later stretches these unit records in place when a quad grows or is
//! repositioned.
//!
//! Texture coordinates are 3D: `u`/`v` tile across the rectangle and `w`
//! selects the texture-array layer for the voxel's material. Each material
//! owns three consecutive layers (side, top, bottom); which of the three a
//! face samples is given by `FACE_TEXTURE_OFFSETS`.

use cgmath::Vector3;

use crate::terrain::voxel::{VoxelFace, VoxelType};

/// Which of a material's three texture layers each face uses:
/// side for the four lateral faces, top for `PosY`, bottom for `NegY`.
const FACE_TEXTURE_OFFSETS: [i32; 6] = [0, 1, 0, 0, 2, 0];

/// The four unit-cube corner positions of `face`, in the winding the quad
/// index list expects (counter-clockwise seen from outside).
pub fn face_vertices(face: VoxelFace) -> [Vector3<f32>; 4] {
    match face {
        VoxelFace::PosX => [
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(1.0, 1.0, 0.0),
            Vector3::new(1.0, 1.0, 1.0),
            Vector3::new(1.0, 0.0, 1.0),
        ],
        VoxelFace::PosY => [
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, 1.0, 1.0),
            Vector3::new(1.0, 1.0, 1.0),
            Vector3::new(1.0, 1.0, 0.0),
        ],
        VoxelFace::PosZ => [
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(1.0, 0.0, 1.0),
            Vector3::new(1.0, 1.0, 1.0),
            Vector3::new(0.0, 1.0, 1.0),
        ],
        VoxelFace::NegX => [
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(0.0, 1.0, 1.0),
            Vector3::new(0.0, 1.0, 0.0),
        ],
        VoxelFace::NegY => [
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 1.0),
            Vector3::new(0.0, 0.0, 1.0),
        ],
        VoxelFace::NegZ => [
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(1.0, 1.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
        ],
    }
}

/// The four (identical) outward normals of `face`.
pub fn face_normals(face: VoxelFace) -> [Vector3<f32>; 4] {
    let n = face.normal();
    let normal = Vector3::new(n.x as f32, n.y as f32, n.z as f32);
    [normal; 4]
}

/// The four texture coordinates of a unit quad on `face`, with the layer
/// index for `voxel_type` already written into the `w` component.
///
/// # Panics
/// Panics if `voxel_type` is `AIR`; air never produces geometry.
pub fn face_uvs(face: VoxelFace, voxel_type: VoxelType) -> [Vector3<f32>; 4] {
    assert!(
        voxel_type.is_solid(),
        "face_uvs: AIR voxels have no texture"
    );
    let texture_no = voxel_type as i32 - 1;
    let layer = (texture_no * 3 + FACE_TEXTURE_OFFSETS[face as usize]) as f32;

    let corners = match face {
        VoxelFace::PosX => [(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)],
        VoxelFace::PosY => [(0.0, 1.0), (0.0, 0.0), (1.0, 0.0), (1.0, 1.0)],
        VoxelFace::PosZ => [(1.0, 0.0), (0.0, 0.0), (0.0, 1.0), (1.0, 1.0)],
        VoxelFace::NegX => [(1.0, 0.0), (0.0, 0.0), (0.0, 1.0), (1.0, 1.0)],
        VoxelFace::NegY => [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)],
        VoxelFace::NegZ => [(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)],
    };
    corners.map(|(u, v)| Vector3::new(u, v, layer))
}
