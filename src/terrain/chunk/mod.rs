//! # Chunk Module
//!
//! A chunk is a column of terrain covering a fixed rectangle of world
//! columns (configurable, e.g. 32x32) and an unbounded vertical range. It
//! owns the sparse voxel store, a one-cell-padded heightmap used for
//! neighbor lookups during generation and edits, the height-density
//! histogram that tracks how many solid voxels exist at each absolute
//! height, and the greedy mesher holding the chunk's geometry.
//!
//! ## Height bookkeeping
//!
//! `min_height`/`max_height` always equal the lowest/highest histogram key
//! with a positive count (or the sentinel extremes when the histogram is
//! empty). Widening the bounds materializes zero-count entries for every
//! skipped height so later decrements never miss a key; shrinking scans
//! inward from the vacated bound, discarding zero entries, until it finds a
//! positive one. The mesher re-reads the bounds on every full build to size
//! its sweep.

use std::collections::HashMap;
use std::time::Instant;

use cgmath::{Point2, Point3, Vector2};
use log::{debug, info, warn};

use crate::core::{CancellationToken, MtResource};
use crate::terrain::biome::BiomeField;
use crate::terrain::coords;
use crate::terrain::meshing::GreedyMesher;
use crate::terrain::voxel::{Voxel, VoxelFace, VoxelStore, VoxelType};

pub mod chunk_generation;

/// The load state of a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// The chunk shell exists but its content is still being generated.
    Loading,

    /// The chunk is fully populated and has a renderable mesh.
    FinishedLoading,
}

/// One column of terrain: voxels, height bookkeeping and mesh.
#[derive(Debug)]
pub struct Chunk {
    id: Point2<i32>,
    origin: Point3<i32>,
    chunk_size: Vector2<i32>,
    status: LoadStatus,

    /// Column heights including a one-cell border of the neighboring chunks'
    /// columns, indexed through `heightmap_value`.
    heightmap: Vec<i32>,

    voxels: VoxelStore,

    /// Count of solid voxels at each absolute height.
    height_densities: HashMap<i32, i32>,
    min_height: i32,
    max_height: i32,

    /// The mesh builder owning this chunk's quad buffers.
    pub mesher: GreedyMesher,

    /// Set when the chunk's mesh should be re-uploaded to the renderer.
    pub should_redraw: bool,

    /// Set when the chunk's collision shape should be rebuilt from the mesh.
    pub should_rebuild_collision: bool,
}

impl Chunk {
    /// Creates an empty chunk shell in the `LOADING` state.
    pub fn new(id: Point2<i32>, chunk_size: Vector2<i32>, max_dirty_count: u32) -> Self {
        let padded = ((chunk_size.x + 2) * (chunk_size.y + 2)) as usize;
        Chunk {
            id,
            origin: Point3::new(id.x * chunk_size.x, 0, id.y * chunk_size.y),
            chunk_size,
            status: LoadStatus::Loading,
            heightmap: vec![0; padded],
            voxels: VoxelStore::new(),
            height_densities: HashMap::new(),
            min_height: i32::MAX,
            max_height: i32::MIN,
            mesher: GreedyMesher::new(max_dirty_count),
            should_redraw: false,
            should_rebuild_collision: false,
        }
    }

    /// The 2D id of this chunk in chunk coordinates.
    #[inline]
    pub fn id(&self) -> Point2<i32> {
        self.id
    }

    /// The world position of this chunk's (0, 0, 0) corner.
    #[inline]
    pub fn origin(&self) -> Point3<i32> {
        self.origin
    }

    /// The number of columns this chunk covers in x and z.
    #[inline]
    pub fn chunk_size(&self) -> Vector2<i32> {
        self.chunk_size
    }

    /// The load state of this chunk.
    #[inline]
    pub fn status(&self) -> LoadStatus {
        self.status
    }

    /// Lowest height with solid content, or `i32::MAX` when empty.
    #[inline]
    pub fn min_height(&self) -> i32 {
        self.min_height
    }

    /// Highest height with solid content, or `i32::MIN` when empty.
    #[inline]
    pub fn max_height(&self) -> i32 {
        self.max_height
    }

    /// Looks up the voxel at a chunk-local position. `None` means the
    /// position holds implied terrain (or air) that was never materialized;
    /// that is a normal outcome, not an error.
    pub fn get_voxel(&self, position: Point3<i32>) -> Option<&Voxel> {
        self.voxels.get(position)
    }

    /// Mutable voxel lookup; see [`Chunk::get_voxel`].
    pub fn get_voxel_mut(&mut self, position: Point3<i32>) -> Option<&mut Voxel> {
        self.voxels.get_mut(position)
    }

    /// Materializes a bare voxel record, used by the edit protocol when a
    /// neighbor position has no stored voxel yet.
    pub fn add_voxel_stub(
        &mut self,
        position: Point3<i32>,
        voxel_type: VoxelType,
        biome_id: i32,
    ) -> &mut Voxel {
        self.voxels.add_stub(position, voxel_type, biome_id)
    }

    /// Drops the voxel record at `position`. Should only be called when the
    /// voxel has no visible faces (solid) or no remaining dependents (air).
    pub fn remove_voxel(&mut self, position: Point3<i32>) {
        self.voxels.remove(position);
    }

    /// The number of stored voxel records.
    pub fn voxel_count(&self) -> usize {
        self.voxels.len()
    }

    /// The generated column height at unpadded column coordinates; accepts
    /// `-1..=size` in each dimension thanks to the heightmap border.
    pub fn heightmap_value(&self, x: i32, z: i32) -> i32 {
        let width = self.chunk_size.x + 2;
        self.heightmap[((x + 1) + width * (z + 1)) as usize]
    }

    /// The column heights of the four side neighbors of column `(x, z)`.
    pub fn neighboring_heights(&self, x: i32, z: i32) -> [i32; 4] {
        [
            self.heightmap_value(x + 1, z),
            self.heightmap_value(x, z + 1),
            self.heightmap_value(x - 1, z),
            self.heightmap_value(x, z - 1),
        ]
    }

    /// Registers one more solid voxel at `height` in the histogram, widening
    /// the bounds (and materializing any skipped zero-count entries) first.
    pub fn add_height(&mut self, height: i32) {
        if self.height_densities.is_empty() {
            self.height_densities.insert(height, 1);
            self.min_height = height;
            self.max_height = height;
            return;
        }

        // A new bound may skip heights, e.g. when a block is placed two
        // above the previous maximum. Every skipped height gets a zero entry
        // so later decrements always find their key.
        if height < self.min_height {
            for skipped in height..self.min_height {
                self.height_densities.entry(skipped).or_insert(0);
            }
            self.min_height = height;
        }
        if height > self.max_height {
            for skipped in (self.max_height + 1)..=height {
                self.height_densities.entry(skipped).or_insert(0);
            }
            self.max_height = height;
        }

        *self
            .height_densities
            .get_mut(&height)
            .expect("add_height: widened histogram is missing a key") += 1;
    }

    /// Removes one solid voxel at `height` from the histogram, shrinking the
    /// bounds past any zero-count entries when a bound was vacated.
    ///
    /// # Panics
    /// Panics if `height` has no entry or a zero count; that means the
    /// caller's bookkeeping is broken, not that the terrain is empty.
    pub fn remove_height(&mut self, height: i32) {
        let count = self
            .height_densities
            .get_mut(&height)
            .unwrap_or_else(|| panic!("remove_height: no histogram entry at height {height}"));
        assert!(
            *count > 0,
            "remove_height: height density underflow at height {height}"
        );
        *count -= 1;

        if height == self.min_height {
            let mut new_min = None;
            for h in self.min_height..=self.max_height {
                if self.height_densities[&h] > 0 {
                    new_min = Some(h);
                    break;
                }
                self.height_densities.remove(&h);
            }
            match new_min {
                Some(h) => self.min_height = h,
                None => {
                    // The histogram ran dry; reset to "no content".
                    self.min_height = i32::MAX;
                    self.max_height = i32::MIN;
                    return;
                }
            }
        }

        if height == self.max_height {
            let mut new_max = None;
            for h in (self.min_height..=self.max_height).rev() {
                if self.height_densities[&h] > 0 {
                    new_max = Some(h);
                    break;
                }
                self.height_densities.remove(&h);
            }
            match new_max {
                Some(h) => self.max_height = h,
                None => {
                    self.min_height = i32::MAX;
                    self.max_height = i32::MIN;
                }
            }
        }
    }

    /// The histogram count at `height` (zero when no entry exists).
    pub fn height_density(&self, height: i32) -> i32 {
        self.height_densities.get(&height).copied().unwrap_or(0)
    }

    /// Runs a full greedy rebuild of this chunk's mesh from its current
    /// voxels and height bounds.
    pub fn generate_mesh(&mut self) {
        let Chunk {
            voxels,
            mesher,
            chunk_size,
            min_height,
            max_height,
            ..
        } = self;
        mesher.generate_mesh(voxels, *chunk_size, *min_height, *max_height);
    }

    /// Creates a fresh quad on `face` of the voxel at `position`, records it
    /// in the voxel's face table and writes its final vertex data.
    ///
    /// # Panics
    /// Panics if no voxel is stored at `position`.
    pub fn create_face_for_voxel(&mut self, position: Point3<i32>, face: VoxelFace) {
        let Chunk { voxels, mesher, .. } = self;
        let voxel_type = voxels
            .get(position)
            .expect("create_face_for_voxel: no voxel at position")
            .voxel_type;
        let slice_pos = coords::local_to_slice(position, face.axis());
        let index = mesher.create_mesh_face(slice_pos, face, voxel_type);
        voxels
            .get_mut(position)
            .expect("create_face_for_voxel: no voxel at position")
            .add_face(face, index);
        mesher.position_quad(index);
    }

    /// Splits the quad covering `face` of the voxel at `position`; see
    /// [`GreedyMesher::break_up_rect`].
    pub fn break_up_face(&mut self, position: Point3<i32>, face: VoxelFace) {
        let Chunk { voxels, mesher, .. } = self;
        mesher.break_up_rect(voxels, position, face);
    }

    /// Records one batched edit against this chunk's mesh.
    pub fn mark_dirty(&mut self) {
        self.mesher.mark_dirty();
    }

    /// Generates this chunk's content and mesh, then commits the result into
    /// `handle`, unless `cancel` was triggered in the meantime, in which
    /// case the generated data is discarded and the shared chunk state is
    /// left untouched.
    ///
    /// Runs on a worker thread; only the final commit takes the write lock.
    pub fn load(
        handle: &MtResource<Chunk>,
        biome: &dyn BiomeField,
        from_file: bool,
        cancel: &CancellationToken,
    ) {
        let started = Instant::now();
        let (id, chunk_size, max_dirty_count) = {
            let chunk = handle.get();
            (chunk.id, chunk.chunk_size, chunk.mesher.max_dirty_count())
        };

        if from_file {
            warn!("chunk {id:?}: loading from file is not implemented, regenerating instead");
        }

        let mut staged = Chunk::new(id, chunk_size, max_dirty_count);
        chunk_generation::generate_heightmap(&mut staged, biome);
        chunk_generation::generate_voxels(&mut staged, biome);
        staged.generate_mesh();
        staged.status = LoadStatus::FinishedLoading;

        if cancel.is_cancelled() {
            debug!("chunk {id:?}: load cancelled, discarding generated content");
            return;
        }

        *handle.get_mut() = staged;
        info!("chunk {id:?}: loaded in {:?}", started.elapsed());
    }

    /// Iterates over all stored voxels, for diagnostics and invariant
    /// checking.
    pub fn voxels(&self) -> impl Iterator<Item = &Voxel> {
        self.voxels.iter()
    }
}
