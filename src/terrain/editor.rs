//! # Chunk Editor Module
//!
//! The single entry point for gameplay block edits. One call walks the six
//! neighbors of the edited voxel, possibly crossing into other chunks, and
//! patches quads, face counts and height bookkeeping so that no full remesh
//! is needed for a single block change.
//!
//! ## Protocol
//!
//! The caller mutates the voxel's type to its *new* value first, then calls
//! [`ChunkEditor::create_or_destroy_block`]. Whether the edit is a placement
//! or a removal is recovered from that new type.
//!
//! For a placement (air became solid), per neighbor:
//! * missing neighbor: materialize an AIR stub so it can count dependents;
//! * air neighbor: the new solid face is visible, so create a quad on the
//!   edited voxel and count the neighbor's new dependent;
//! * solid neighbor: the two solids now abut, so split the neighbor's facing
//!   quad away and drop one dependent from the edited voxel's old air
//!   count; a neighbor left with zero visible faces is deleted (and taken
//!   out of its chunk's height histogram).
//!
//! For a removal (solid became air), per neighbor:
//! * missing neighbor: the removal just unearthed implied terrain, so
//!   materialize a solid stub from the height field and register it in the
//!   histogram;
//! * solid neighbor: its face towards the edited voxel is now visible, so
//!   create a quad on the neighbor and count the edited voxel as depending
//!   on it;
//! * air neighbor: the edited voxel's own quad towards it is gone, so split
//!   it away.
//!
//! After the six neighbors, the edited chunk's histogram absorbs the edit,
//! the edited voxel is deleted if nothing references it anymore, and every
//! touched chunk gets its redraw/collision flags and a dirty mark. All six
//! neighbor updates complete before any flag is applied, so a rebuild never
//! observes a half-updated voxel.
//!
//! ## Preconditions (fatal when violated)
//!
//! The edited voxel must exist, and all six neighbor positions must resolve
//! to loaded chunks. Editing is not safe against concurrent edits or against
//! generation of the same chunks; a single edit-producing thread is assumed.

use std::collections::HashSet;

use cgmath::{Point2, Point3};

use crate::core::MtResource;

use super::chunk::Chunk;
use super::chunk_manager::ChunkManager;
use super::coords;
use super::voxel::{VoxelFace, VoxelType};

/// Applies single-block edits to the terrain.
pub struct ChunkEditor;

impl ChunkEditor {
    /// Applies one block placement or removal at `world_pos`.
    ///
    /// `chunk` must be the chunk containing `world_pos`, and the voxel there
    /// must already carry its new type (`AIR` for a removal, a solid type
    /// for a placement). `request_redraw`/`request_collision` decide which
    /// follow-up work the touched chunks are flagged for.
    ///
    /// # Panics
    /// Panics if the edited voxel does not exist or if any of the six
    /// neighbor positions falls into an unloaded chunk; callers must
    /// guarantee the neighborhood is loaded before editing.
    pub fn create_or_destroy_block(
        manager: &ChunkManager,
        chunk: &MtResource<Chunk>,
        world_pos: Point3<i32>,
        request_redraw: bool,
        request_collision: bool,
    ) {
        let (this_id, this_local) = {
            let this_chunk = chunk.get();
            (
                this_chunk.id(),
                coords::world_to_local(world_pos, this_chunk.origin()),
            )
        };

        // The caller stored the voxel's new type before the call, so a solid
        // type here means "a block was just placed".
        let is_air_to_solid = {
            chunk
                .get()
                .get_voxel(this_local)
                .unwrap_or_else(|| panic!("edit at {world_pos:?}: no voxel at edit position"))
                .voxel_type
                .is_solid()
        };

        let mut affected_chunks: HashSet<Point2<i32>> = HashSet::new();
        affected_chunks.insert(this_id);

        for face in VoxelFace::all() {
            let neighbor_world = world_pos + face.normal();
            let neighbor_chunk = manager.get_chunk(neighbor_world).unwrap_or_else(|| {
                panic!("edit at {world_pos:?}: neighbor chunk at {neighbor_world:?} not loaded")
            });
            let neighbor_id = manager.chunk_id_of(neighbor_world);
            let neighbor_local = {
                let origin = neighbor_chunk.get().origin();
                coords::world_to_local(neighbor_world, origin)
            };
            let neighbor_face = face.opposite();

            if is_air_to_solid {
                {
                    let mut neighbor = neighbor_chunk.get_mut();
                    if neighbor.get_voxel(neighbor_local).is_none() {
                        neighbor.add_voxel_stub(neighbor_local, VoxelType::AIR, -1);
                    }
                }

                let neighbor_is_air =
                    neighbor_chunk.get().get_voxel(neighbor_local).unwrap().voxel_type
                        == VoxelType::AIR;

                if neighbor_is_air {
                    // The new block's face towards this air neighbor is
                    // visible; the neighbor gains a dependent.
                    neighbor_chunk
                        .get_mut()
                        .get_voxel_mut(neighbor_local)
                        .unwrap()
                        .exposed_faces += 1;
                    chunk.get_mut().create_face_for_voxel(this_local, face);
                } else {
                    // Two solids now abut: the neighbor's facing quad dies,
                    // and the edited voxel loses one entry of its old air
                    // dependent count.
                    chunk
                        .get_mut()
                        .get_voxel_mut(this_local)
                        .unwrap()
                        .exposed_faces -= 1;

                    let mut neighbor = neighbor_chunk.get_mut();
                    neighbor.break_up_face(neighbor_local, neighbor_face);
                    let remaining = neighbor.get_voxel(neighbor_local).unwrap().exposed_faces;
                    if remaining <= 0 {
                        // Fully enclosed again; the height field can
                        // regenerate it later.
                        neighbor.remove_height(neighbor_local.y);
                        neighbor.remove_voxel(neighbor_local);
                    }
                    drop(neighbor);

                    affected_chunks.insert(neighbor_id);
                }
            } else {
                {
                    let mut neighbor = neighbor_chunk.get_mut();
                    if neighbor.get_voxel(neighbor_local).is_none() {
                        // The removal unearthed implied terrain; materialize
                        // it from the height field.
                        let column_height =
                            neighbor.heightmap_value(neighbor_local.x, neighbor_local.z);
                        let voxel_type =
                            manager.biome().surface_type(neighbor_world, column_height);
                        neighbor.add_voxel_stub(neighbor_local, voxel_type, -1);
                        neighbor.add_height(neighbor_local.y);
                    }
                }

                let neighbor_is_solid = neighbor_chunk
                    .get()
                    .get_voxel(neighbor_local)
                    .unwrap()
                    .voxel_type
                    .is_solid();

                if neighbor_is_solid {
                    // The neighbor's face towards the new hole is visible;
                    // the edited voxel now depends on it.
                    chunk
                        .get_mut()
                        .get_voxel_mut(this_local)
                        .unwrap()
                        .exposed_faces += 1;
                    neighbor_chunk
                        .get_mut()
                        .create_face_for_voxel(neighbor_local, neighbor_face);

                    affected_chunks.insert(neighbor_id);
                } else {
                    chunk.get_mut().break_up_face(this_local, face);
                }
            }
        }

        {
            let mut this_chunk = chunk.get_mut();
            let exposed = this_chunk.get_voxel(this_local).unwrap().exposed_faces;

            if is_air_to_solid && exposed > 0 {
                // The new block is actually visible (placing into a sealed
                // cavity leaves no exposure and no height entry).
                this_chunk.add_height(this_local.y);
            } else if !is_air_to_solid {
                this_chunk.remove_height(this_local.y);
            }

            // Deletion had to wait until all six neighbors finished
            // adjusting this voxel's count.
            if exposed <= 0 {
                this_chunk.remove_voxel(this_local);
            }
        }

        for id in affected_chunks {
            let handle = if id == this_id {
                chunk.clone()
            } else {
                manager
                    .get_chunk_by_id(id)
                    .expect("edited neighbor chunk disappeared mid-edit")
            };
            let mut touched = handle.get_mut();
            touched.should_redraw = request_redraw;
            touched.should_rebuild_collision = request_collision;
            touched.mark_dirty();
        }
    }
}
