//! # Voxel Module
//!
//! This module provides the per-voxel record kept by a chunk and the sparse
//! store that owns those records.
//!
//! ## Storage strategy
//!
//! A chunk does not store a dense 3D grid. Only the voxels that matter for
//! meshing are materialized: the solid blocks near the surface of each column
//! and the air voxels directly above them. Everything below is implied by the
//! height field and can be regenerated on demand, so a fully buried voxel is
//! simply not stored at all.
//!
//! ## Face accounting
//!
//! Each voxel carries a table of six quad-buffer indices, one per face, and a
//! running `exposed_faces` counter. For a solid voxel the counter always
//! equals the number of populated entries in the face table. For an `AIR`
//! voxel the same counter is reused as a reference count: the number of
//! neighboring solid faces whose visibility depends on this air voxel
//! existing. When either count drops to zero the record is deleted.

use std::collections::HashMap;

use cgmath::Point3;

pub mod voxel_face;
pub mod voxel_type;

pub use voxel_face::VoxelFace;
pub use voxel_type::VoxelType;

/// A single voxel record inside a chunk.
#[derive(Debug, Clone)]
pub struct Voxel {
    /// The chunk-local position of this voxel. Never changes once created.
    position: Point3<i32>,

    /// The material of this voxel. Mutated in place by gameplay edits just
    /// before the edit protocol runs.
    pub voxel_type: VoxelType,

    /// The biome this voxel was generated in. Never changes once created;
    /// stubs created during edits use `-1`.
    biome_id: i32,

    /// Quad-buffer index of the rectangle covering each face, `None` when the
    /// face is not visible. Indexed by `VoxelFace as usize`.
    pub face_indices: [Option<usize>; 6],

    /// For solid voxels: how many entries of `face_indices` are populated.
    /// For air voxels: how many neighboring solid faces depend on this record.
    pub exposed_faces: i32,
}

impl Voxel {
    /// Creates a new voxel with no visible faces.
    pub fn new(position: Point3<i32>, voxel_type: VoxelType, biome_id: i32) -> Self {
        Voxel {
            position,
            voxel_type,
            biome_id,
            face_indices: [None; 6],
            exposed_faces: 0,
        }
    }

    /// The chunk-local position of this voxel.
    #[inline]
    pub fn position(&self) -> Point3<i32> {
        self.position
    }

    /// The biome this voxel belongs to (`-1` for edit-time stubs).
    #[inline]
    pub fn biome_id(&self) -> i32 {
        self.biome_id
    }

    /// The quad-buffer index of the rectangle covering `face`, if any.
    #[inline]
    pub fn face_index(&self, face: VoxelFace) -> Option<usize> {
        self.face_indices[face as usize]
    }

    /// Registers a quad for `face` and bumps the exposed-face count.
    pub fn add_face(&mut self, face: VoxelFace, mesh_index: usize) {
        self.face_indices[face as usize] = Some(mesh_index);
        self.exposed_faces += 1;
    }

    /// Clears the quad for `face` and drops the exposed-face count.
    pub fn remove_face(&mut self, face: VoxelFace) {
        self.face_indices[face as usize] = None;
        self.exposed_faces -= 1;
    }

    /// Forgets all face bookkeeping. Used when a full mesh rebuild re-derives
    /// the face set of every solid voxel from scratch.
    pub fn clear_faces(&mut self) {
        self.face_indices = [None; 6];
        self.exposed_faces = 0;
    }
}

/// The sparse voxel map owned by a chunk.
#[derive(Debug, Default)]
pub struct VoxelStore {
    voxels: HashMap<Point3<i32>, Voxel>,
}

impl VoxelStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        VoxelStore {
            voxels: HashMap::new(),
        }
    }

    /// Looks up the voxel at `position`. Absence is a normal outcome, not an
    /// error: unstored positions are implied terrain.
    #[inline]
    pub fn get(&self, position: Point3<i32>) -> Option<&Voxel> {
        self.voxels.get(&position)
    }

    /// Mutable lookup of the voxel at `position`.
    #[inline]
    pub fn get_mut(&mut self, position: Point3<i32>) -> Option<&mut Voxel> {
        self.voxels.get_mut(&position)
    }

    /// Inserts a fully formed voxel record.
    pub fn insert(&mut self, voxel: Voxel) {
        self.voxels.insert(voxel.position(), voxel);
    }

    /// Creates a bare voxel record at `position` and returns it. Used by the
    /// edit protocol when a neighbor position has no stored voxel yet.
    pub fn add_stub(
        &mut self,
        position: Point3<i32>,
        voxel_type: VoxelType,
        biome_id: i32,
    ) -> &mut Voxel {
        self.voxels
            .entry(position)
            .or_insert_with(|| Voxel::new(position, voxel_type, biome_id))
    }

    /// Removes the voxel record at `position`.
    ///
    /// Should only be called once the voxel has no visible faces (solid) or
    /// no remaining dependents (air); it can then be regenerated later from
    /// the height field.
    pub fn remove(&mut self, position: Point3<i32>) {
        self.voxels.remove(&position);
    }

    /// The number of stored voxel records.
    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    /// Whether the store holds no voxels at all.
    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    /// Iterates over all stored voxels.
    pub fn iter(&self) -> impl Iterator<Item = &Voxel> {
        self.voxels.values()
    }

    /// Iterates mutably over all stored voxels.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Voxel> {
        self.voxels.values_mut()
    }
}
