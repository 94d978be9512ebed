//! # Greedy Mesher Module
//!
//! This module implements the incremental greedy meshing algorithm that turns
//! a chunk's sparse voxel store into a small set of merged rectangles.
//!
//! ## Full builds
//!
//! `generate_mesh` walks every chunk-local position between the chunk's
//! height bounds in x-then-y-then-z order. That order guarantees that, in the
//! slice space of each of the three face-axis families, the cell "below"
//! (slice y - 1) and the cell "left" (slice x - 1) of the current cell have
//! already been visited, which is the only thing the merge step relies on:
//! each drawn face either grows the quad below it, grows the quad to its
//! left, or starts a new 1x1 quad.
//!
//! The merge priority is fixed: grow the below quad upward when it is exactly
//! one cell wide, otherwise grow the left quad rightward when it is exactly
//! one cell tall, and if that rightward growth makes the left quad line up
//! exactly with the quad below, absorb it into the below quad. Changing this
//! order still yields a correct mesh but a different rectangle partition, so
//! it is preserved exactly.
//!
//! ## Incremental edits
//!
//! Single-block edits never re-run the sweep. New faces become fresh 1x1
//! quads; removed faces split their covering rectangle into at most four
//! surviving bands (`break_up_rect`). Split regions only re-consolidate on
//! the next full build, which is forced after enough edits have been batched
//! (`mark_dirty` / `needs_rebuild`).
//!
//! ## Buffer layout
//!
//! Every quad owns four consecutive records in the flat vertex/normal/uv
//! buffers, addressed by its stable `mesh_index`. Dead quads are put on a
//! free list with zeroed vertices (degenerate, invisible) and their slots are
//! reused before the buffers grow; nothing is ever compacted, so the indices
//! stored in voxel face tables stay valid.

use std::collections::VecDeque;
use std::time::Instant;

use cgmath::{Point3, Vector2, Vector3};
use log::debug;

use crate::terrain::coords;
use crate::terrain::voxel::{VoxelFace, VoxelStore, VoxelType};

use super::face_data;
use super::mesh_face::MeshFace;
use super::MeshSnapshot;

/// The per-chunk greedy mesh builder and quad arena.
#[derive(Debug)]
pub struct GreedyMesher {
    /// Extent covered by the last full build: chunk columns in x/z, the
    /// height-bound span in y.
    size: Vector3<i32>,
    min_height: i32,

    quads: Vec<MeshFace>,
    unused: VecDeque<usize>,

    vertices: Vec<Vector3<f32>>,
    normals: Vec<Vector3<f32>>,
    uvs: Vec<Vector3<f32>>,
    indices: Vec<u32>,

    dirty_count: u32,
    max_dirty_count: u32,
}

impl GreedyMesher {
    /// Creates an empty mesher that forces a full rebuild once more than
    /// `max_dirty_count` edits have been batched.
    pub fn new(max_dirty_count: u32) -> Self {
        GreedyMesher {
            size: Vector3::new(0, 0, 0),
            min_height: 0,
            quads: Vec::new(),
            unused: VecDeque::new(),
            vertices: Vec::new(),
            normals: Vec::new(),
            uvs: Vec::new(),
            indices: Vec::new(),
            dirty_count: 0,
            max_dirty_count,
        }
    }

    fn clear_mesh_buffers(&mut self) {
        self.quads.clear();
        self.unused.clear();
        self.vertices.clear();
        self.normals.clear();
        self.uvs.clear();
        self.indices.clear();
        self.dirty_count = 0;
    }

    /// Rebuilds the whole mesh from the current voxel store.
    ///
    /// Clears all buffers and the free list, resets the face bookkeeping of
    /// every solid voxel, then sweeps the chunk extent given by the height
    /// bounds. Air reference counts are left untouched; they are maintained
    /// by the edit protocol, not by meshing.
    pub fn generate_mesh(
        &mut self,
        store: &mut VoxelStore,
        chunk_size: Vector2<i32>,
        min_height: i32,
        max_height: i32,
    ) {
        let started = Instant::now();
        self.clear_mesh_buffers();

        if max_height < min_height {
            // Height bounds at their sentinels: the chunk holds no solid
            // voxels and the mesh stays empty.
            return;
        }

        // The height bounds are not fixed, so the swept extent must be
        // re-derived on every build.
        self.size = Vector3::new(chunk_size.x, max_height - min_height + 1, chunk_size.y);
        self.min_height = min_height;

        for voxel in store.iter_mut() {
            if voxel.voxel_type.is_solid() {
                voxel.clear_faces();
            }
        }

        // The iteration order and the slice-space transform together ensure
        // the merge step only ever consults already-visited neighbors.
        for z in 0..self.size.z {
            for y in 0..self.size.y {
                for x in 0..self.size.x {
                    let position = Point3::new(x, y + self.min_height, z);
                    self.create_faces_at_position(store, position);
                }
            }
        }

        for index in 0..self.quads.len() {
            self.position_quad(index);
        }

        debug!(
            "generate_mesh: {} live quads ({} slots) in {:?}",
            self.live_quad_count(),
            self.quads.len(),
            started.elapsed()
        );
    }

    fn create_faces_at_position(&mut self, store: &mut VoxelStore, position: Point3<i32>) {
        match store.get(position) {
            Some(voxel) if voxel.voxel_type.is_solid() => {}
            _ => return,
        }

        for face in VoxelFace::all() {
            self.create_face_at_position(store, position, face);
        }
    }

    /// Evaluates one candidate face of a solid voxel during a full build:
    /// skips it when occluded, otherwise merges it into an existing quad or
    /// starts a new one, and records the quad in the voxel's face table.
    fn create_face_at_position(
        &mut self,
        store: &mut VoxelStore,
        position: Point3<i32>,
        face: VoxelFace,
    ) {
        let axis = face.axis();
        let slice_pos = coords::local_to_slice(position, axis);

        // A face is drawn only when the voxel directly across it is a stored
        // AIR voxel. An absent record means implied, still-buried terrain and
        // occludes the face just like a solid neighbor does.
        let depth_step = if face.is_positive() { 1 } else { -1 };
        let across_local =
            coords::slice_to_local(slice_pos + Vector3::new(0, 0, depth_step), axis);
        let across_is_air = matches!(
            store.get(across_local),
            Some(voxel) if voxel.voxel_type == VoxelType::AIR
        );
        if !across_is_air {
            return;
        }

        let voxel_type = store
            .get(position)
            .expect("create_face_at_position: voxel vanished mid-build")
            .voxel_type;

        let below_local = coords::slice_to_local(slice_pos - Vector3::unit_y(), axis);
        let left_local = coords::slice_to_local(slice_pos - Vector3::unit_x(), axis);

        let below = store
            .get(below_local)
            .and_then(|voxel| voxel.face_index(face).map(|i| (i, voxel.voxel_type)));
        let left = store
            .get(left_local)
            .and_then(|voxel| voxel.face_index(face).map(|i| (i, voxel.voxel_type)));

        let mut used_quad: Option<usize> = None;

        if let Some((below_index, below_type)) = below {
            if self.quads[below_index].scale.x == 1 && voxel_type == below_type {
                // The quad below is exactly one cell wide: extend it upwards.
                // Wider quads below are handled by growing a separate
                // one-cell-tall quad rightward until it lines up.
                self.quads[below_index].scale.y += 1;
                used_quad = Some(below_index);
            }
        }

        if used_quad.is_none() {
            if let Some((left_index, left_type)) = left {
                if self.quads[left_index].scale.y == 1 && voxel_type == left_type {
                    // The sweep grows a rect rightward as far as it can
                    // before it ever grows upward, so a rect that has grown
                    // upward can never grow rightward again.
                    self.quads[left_index].scale.x += 1;

                    let mut merged_into_below = false;
                    if let Some((below_index, below_type)) = below {
                        let lines_up = self.quads[left_index].slice_space_position.x
                            == self.quads[below_index].slice_space_position.x
                            && self.quads[left_index].scale.x == self.quads[below_index].scale.x;
                        if lines_up && voxel_type == below_type {
                            // The rightward growth made the left quad span
                            // exactly the quad below it: absorb it.
                            self.quads[below_index].scale.y += 1;

                            let left_width = self.quads[left_index].scale.x;
                            self.recycle_mesh_face(left_index);
                            for offset in 1..left_width {
                                let fix_local = coords::slice_to_local(
                                    slice_pos - Vector3::new(offset, 0, 0),
                                    axis,
                                );
                                let fix_voxel = store.get_mut(fix_local).expect(
                                    "create_face_at_position: absorbed quad covers missing voxel",
                                );
                                fix_voxel.face_indices[face as usize] = Some(below_index);
                            }

                            used_quad = Some(below_index);
                            merged_into_below = true;
                        }
                    }
                    if !merged_into_below {
                        used_quad = Some(left_index);
                    }
                }
            }
        }

        let used_quad = used_quad
            .unwrap_or_else(|| self.create_mesh_face(slice_pos, face, voxel_type));

        store
            .get_mut(position)
            .expect("create_face_at_position: voxel vanished mid-build")
            .add_face(face, used_quad);
    }

    /// Allocates a fresh 1x1 quad at `slice_pos` and returns its stable
    /// buffer index, reusing a free-list slot when one is available.
    pub fn create_mesh_face(
        &mut self,
        slice_pos: Point3<i32>,
        face: VoxelFace,
        voxel_type: VoxelType,
    ) -> usize {
        let vertices = face_data::face_vertices(face);
        let normals = face_data::face_normals(face);
        let uvs = face_data::face_uvs(face, voxel_type);

        let mesh_index = match self.unused.pop_front() {
            Some(index) => {
                // A recycled slot keeps its old records except for the zeroed
                // vertices; rewrite all four in place.
                for corner in 0..4 {
                    let record = index * 4 + corner;
                    self.vertices[record] = vertices[corner];
                    self.normals[record] = normals[corner];
                    self.uvs[record] = uvs[corner];
                }
                index
            }
            None => {
                let index = self.quads.len();
                self.vertices.extend(vertices);
                self.normals.extend(normals);
                self.uvs.extend(uvs);
                self.indices
                    .extend((0..4).map(|corner| (index * 4 + corner) as u32));
                // Reserve the arena slot; the record is overwritten below.
                self.quads.push(MeshFace {
                    mesh_index: index,
                    slice_dimension: 0,
                    face,
                    slice_space_position: slice_pos,
                    scale: Vector3::new(1, 1, 1),
                    voxel_type,
                });
                index
            }
        };

        self.quads[mesh_index] = MeshFace {
            mesh_index,
            slice_dimension: face.axis(),
            face,
            slice_space_position: slice_pos,
            scale: Vector3::new(1, 1, 1),
            voxel_type,
        };

        mesh_index
    }

    /// Retires a quad: zeroes its vertices so the slot renders as degenerate
    /// geometry and queues the slot for reuse.
    fn recycle_mesh_face(&mut self, mesh_index: usize) {
        let start = mesh_index * 4;
        for record in start..start + 4 {
            self.vertices[record] = Vector3::new(0.0, 0.0, 0.0);
        }
        self.unused.push_back(mesh_index);
    }

    /// Writes the final vertex positions and tiled texture coordinates of a
    /// quad, mapping its slice-space rectangle back into local space.
    ///
    /// Must be called exactly once after a quad's rectangle is final: the
    /// unit-template records written by `create_mesh_face` are stretched in
    /// place by the quad's scale.
    pub fn position_quad(&mut self, mesh_index: usize) {
        let quad = self.quads[mesh_index];
        let local_pos = coords::slice_to_local(quad.slice_space_position, quad.slice_dimension);
        let local_scale = coords::slice_extent_to_local(quad.scale, quad.slice_dimension);

        // For the two X-axis faces the slice height runs along local x, so
        // the uv tiling factors swap.
        let (tile_u, tile_v) = match quad.face {
            VoxelFace::PosX | VoxelFace::NegX => (quad.scale.y, quad.scale.x),
            _ => (quad.scale.x, quad.scale.y),
        };

        for corner in 0..4 {
            let record = mesh_index * 4 + corner;

            let vertex = self.vertices[record];
            self.vertices[record] = Vector3::new(
                vertex.x.floor() * local_scale.x as f32 + local_pos.x as f32,
                vertex.y.floor() * local_scale.y as f32 + local_pos.y as f32,
                vertex.z.floor() * local_scale.z as f32 + local_pos.z as f32,
            );

            let uv = self.uvs[record];
            self.uvs[record] = Vector3::new(tile_u as f32 * uv.x, tile_v as f32 * uv.y, uv.z);
        }
    }

    /// Splits the quad covering `face` of the voxel at `position` into the
    /// surviving sub-rectangles and clears that voxel's face entry.
    ///
    /// Up to four bands are created: the full-width rows above the removed
    /// cell, the rows at or below it to its right and to its left, and the
    /// single column directly below it. Surviving voxels are re-pointed with
    /// the priority top band first, then the side bands, then the bottom
    /// strip. This is the only way a merged rectangle ever shrinks; split
    /// regions re-consolidate only on the next full build.
    ///
    /// # Panics
    /// Panics if the voxel does not exist or has no quad on `face`; callers
    /// must only request removal of faces known to exist.
    pub fn break_up_rect(&mut self, store: &mut VoxelStore, position: Point3<i32>, face: VoxelFace) {
        let old_index = store
            .get(position)
            .expect("break_up_rect: no voxel at the removal position")
            .face_index(face)
            .expect("break_up_rect: face has no quad to split");
        let old = self.quads[old_index];

        let removed = coords::local_to_slice(position, old.slice_dimension);

        let (top, bottom, right, left) = self.create_corner_rects(removed, &old);
        self.assign_corner_rects(store, removed, &old, top, bottom, right, left);

        // Retire the old rectangle last so its slot is not handed out while
        // the sub-rectangles are still being created.
        self.recycle_mesh_face(old_index);
        store
            .get_mut(position)
            .expect("break_up_rect: no voxel at the removal position")
            .remove_face(face);
    }

    /// Creates the up-to-four sub-rectangles that survive removing the cell
    /// at `removed` from `old`, returning their buffer indices.
    fn create_corner_rects(
        &mut self,
        removed: Point3<i32>,
        old: &MeshFace,
    ) -> (Option<usize>, Option<usize>, Option<usize>, Option<usize>) {
        let origin = old.slice_space_position;

        let mut top = None;
        let mut bottom = None;
        let mut right = None;
        let mut left = None;

        if removed.y < origin.y + old.scale.y - 1 {
            let corner = Point3::new(origin.x, removed.y + 1, origin.z);
            let index = self.create_mesh_face(corner, old.face, old.voxel_type);
            self.quads[index].scale =
                Vector3::new(old.scale.x, old.scale.y - (removed.y - origin.y + 1), 1);
            self.position_quad(index);
            top = Some(index);
        }
        if removed.y > origin.y {
            let corner = Point3::new(removed.x, origin.y, origin.z);
            let index = self.create_mesh_face(corner, old.face, old.voxel_type);
            self.quads[index].scale = Vector3::new(1, removed.y - origin.y, 1);
            self.position_quad(index);
            bottom = Some(index);
        }
        if removed.x < origin.x + old.scale.x - 1 {
            let corner = Point3::new(removed.x + 1, origin.y, origin.z);
            let index = self.create_mesh_face(corner, old.face, old.voxel_type);
            self.quads[index].scale = Vector3::new(
                old.scale.x - (removed.x - origin.x + 1),
                removed.y - origin.y + 1,
                1,
            );
            self.position_quad(index);
            right = Some(index);
        }
        if removed.x > origin.x {
            let index = self.create_mesh_face(origin, old.face, old.voxel_type);
            self.quads[index].scale =
                Vector3::new(removed.x - origin.x, removed.y - origin.y + 1, 1);
            self.position_quad(index);
            left = Some(index);
        }

        (top, bottom, right, left)
    }

    /// Re-points every surviving voxel of the old rectangle at the sub-
    /// rectangle containing it. The top band wins over the side bands, the
    /// side bands win over the bottom strip; the removed cell itself matches
    /// no band and keeps its stale entry until the caller clears it.
    #[allow(clippy::too_many_arguments)]
    fn assign_corner_rects(
        &mut self,
        store: &mut VoxelStore,
        removed: Point3<i32>,
        old: &MeshFace,
        top: Option<usize>,
        bottom: Option<usize>,
        right: Option<usize>,
        left: Option<usize>,
    ) {
        for y in 0..old.scale.y {
            for x in 0..old.scale.x {
                let cell = old.slice_space_position + Vector3::new(x, y, 0);

                let target = if cell.y > removed.y {
                    top
                } else if cell.x > removed.x {
                    right
                } else if cell.x < removed.x {
                    left
                } else if cell.y < removed.y {
                    bottom
                } else {
                    continue;
                };

                let local = coords::slice_to_local(cell, old.slice_dimension);
                let voxel = store
                    .get_mut(local)
                    .expect("assign_corner_rects: rectangle covers a missing voxel");
                voxel.face_indices[old.face as usize] =
                    Some(target.expect("assign_corner_rects: band for surviving cell missing"));
            }
        }
    }

    /// Records one more batched edit against this mesh.
    pub fn mark_dirty(&mut self) {
        self.dirty_count += 1;
    }

    /// The number of edits batched since the last full build.
    pub fn dirty_count(&self) -> u32 {
        self.dirty_count
    }

    /// The batching threshold this mesher was configured with.
    pub fn max_dirty_count(&self) -> u32 {
        self.max_dirty_count
    }

    /// Whether enough edits have accumulated that the owning chunk should
    /// run a full `generate_mesh` instead of continuing incrementally.
    pub fn needs_rebuild(&self) -> bool {
        self.dirty_count > self.max_dirty_count
    }

    /// The quad record at `mesh_index`. Recycled slots keep stale records;
    /// use `live_quads` to skip them.
    pub fn quad(&self, mesh_index: usize) -> &MeshFace {
        &self.quads[mesh_index]
    }

    /// The number of quads currently part of the mesh.
    pub fn live_quad_count(&self) -> usize {
        self.quads.len() - self.unused.len()
    }

    /// All quads currently part of the mesh (free-list slots excluded).
    pub fn live_quads(&self) -> Vec<&MeshFace> {
        let unused: std::collections::HashSet<usize> = self.unused.iter().copied().collect();
        self.quads
            .iter()
            .enumerate()
            .filter(|(index, _)| !unused.contains(index))
            .map(|(_, quad)| quad)
            .collect()
    }

    /// Whether `mesh_index` currently sits on the free list.
    pub fn is_recycled(&self, mesh_index: usize) -> bool {
        self.unused.contains(&mesh_index)
    }

    /// Copies the current buffers into a renderer-consumable snapshot.
    pub fn snapshot(&self) -> MeshSnapshot {
        MeshSnapshot {
            vertices: self.vertices.iter().map(|v| [v.x, v.y, v.z]).collect(),
            normals: self.normals.iter().map(|v| [v.x, v.y, v.z]).collect(),
            uvs: self.uvs.iter().map(|v| [v.x, v.y, v.z]).collect(),
            indices: self.indices.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::voxel::Voxel;

    /// Builds a store holding a solid slab of `material` spanning
    /// `0..width` x `0..depth` at height `y`, with stored air above it so
    /// the top faces are visible.
    fn slab(width: i32, depth: i32, y: i32, material: VoxelType) -> VoxelStore {
        let mut store = VoxelStore::new();
        for z in 0..depth {
            for x in 0..width {
                store.insert(Voxel::new(Point3::new(x, y, z), material, 0));
                let mut air = Voxel::new(Point3::new(x, y + 1, z), VoxelType::AIR, 0);
                air.exposed_faces = 1;
                store.insert(air);
            }
        }
        store
    }

    fn partition(mesher: &GreedyMesher) -> Vec<(usize, [i32; 3], [i32; 3])> {
        let mut quads: Vec<_> = mesher
            .live_quads()
            .into_iter()
            .map(|q| {
                (
                    q.face as usize,
                    [
                        q.slice_space_position.x,
                        q.slice_space_position.y,
                        q.slice_space_position.z,
                    ],
                    [q.scale.x, q.scale.y, q.scale.z],
                )
            })
            .collect();
        quads.sort();
        quads
    }

    #[test]
    fn two_wide_row_merges_into_one_quad() {
        let mut store = slab(2, 1, 5, VoxelType::DIRT);
        let mut mesher = GreedyMesher::new(15);
        mesher.generate_mesh(&mut store, Vector2::new(2, 1), 5, 6);

        assert_eq!(mesher.live_quad_count(), 1);
        let quad = mesher.live_quads()[0];
        assert_eq!(quad.face, VoxelFace::PosY);
        assert_eq!(quad.scale, Vector3::new(2, 1, 1));
        assert_eq!(quad.slice_space_position, Point3::new(0, 0, 5));

        // Both voxels point at the same rectangle.
        let left = store.get(Point3::new(0, 5, 0)).unwrap();
        let right = store.get(Point3::new(1, 5, 0)).unwrap();
        assert_eq!(left.face_index(VoxelFace::PosY), right.face_index(VoxelFace::PosY));
        assert_eq!(left.exposed_faces, 1);
        assert_eq!(right.exposed_faces, 1);
    }

    #[test]
    fn flat_slab_merges_into_single_rectangle() {
        let mut store = slab(8, 8, 3, VoxelType::GRASS);
        let mut mesher = GreedyMesher::new(15);
        mesher.generate_mesh(&mut store, Vector2::new(8, 8), 3, 4);

        assert_eq!(mesher.live_quad_count(), 1);
        let quad = mesher.live_quads()[0];
        assert_eq!(quad.scale, Vector3::new(8, 8, 1));
        assert_eq!(quad.voxel_type, VoxelType::GRASS);
    }

    #[test]
    fn differing_materials_do_not_merge() {
        let mut store = slab(2, 1, 0, VoxelType::DIRT);
        store.get_mut(Point3::new(1, 0, 0)).unwrap().voxel_type = VoxelType::STONE;
        let mut mesher = GreedyMesher::new(15);
        mesher.generate_mesh(&mut store, Vector2::new(2, 1), 0, 1);

        assert_eq!(mesher.live_quad_count(), 2);
        for quad in mesher.live_quads() {
            assert_eq!(quad.scale, Vector3::new(1, 1, 1));
        }
    }

    #[test]
    fn absent_neighbors_occlude_faces() {
        // Solid voxels with no stored air anywhere produce no geometry.
        let mut store = VoxelStore::new();
        for x in 0..3 {
            store.insert(Voxel::new(Point3::new(x, 0, 0), VoxelType::STONE, 0));
        }
        let mut mesher = GreedyMesher::new(15);
        mesher.generate_mesh(&mut store, Vector2::new(3, 1), 0, 0);
        assert_eq!(mesher.live_quad_count(), 0);
    }

    #[test]
    fn rebuild_is_idempotent() {
        let mut store = slab(6, 4, 2, VoxelType::DIRT);
        // Punch a hole so the partition is not a single rectangle.
        store.get_mut(Point3::new(2, 2, 1)).unwrap().voxel_type = VoxelType::AIR;

        let mut mesher = GreedyMesher::new(15);
        mesher.generate_mesh(&mut store, Vector2::new(6, 4), 2, 3);
        let first = partition(&mesher);
        mesher.generate_mesh(&mut store, Vector2::new(6, 4), 2, 3);
        let second = partition(&mesher);
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn break_up_rect_splits_into_corner_bands() {
        let mut store = slab(3, 3, 0, VoxelType::DIRT);
        let mut mesher = GreedyMesher::new(15);
        mesher.generate_mesh(&mut store, Vector2::new(3, 3), 0, 1);
        assert_eq!(mesher.live_quad_count(), 1);

        let center = Point3::new(1, 0, 1);
        mesher.break_up_rect(&mut store, center, VoxelFace::PosY);

        // One 3x1 top band, two 1x2 side bands and a 1x1 bottom strip.
        let mut scales: Vec<[i32; 3]> = mesher
            .live_quads()
            .iter()
            .map(|q| [q.scale.x, q.scale.y, q.scale.z])
            .collect();
        scales.sort();
        assert_eq!(scales, vec![[1, 1, 1], [1, 2, 1], [1, 2, 1], [3, 1, 1]]);

        // The removed cell's entry is cleared and its count dropped.
        let removed = store.get(center).unwrap();
        assert_eq!(removed.face_index(VoxelFace::PosY), None);
        assert_eq!(removed.exposed_faces, 0);

        // Every surviving voxel lies inside the rectangle it points at.
        for z in 0..3 {
            for x in 0..3 {
                let pos = Point3::new(x, 0, z);
                if pos == center {
                    continue;
                }
                let voxel = store.get(pos).unwrap();
                let index = voxel.face_index(VoxelFace::PosY).unwrap();
                assert!(!mesher.is_recycled(index));
                let quad = mesher.quad(index);
                assert!(quad.contains(coords::local_to_slice(pos, quad.slice_dimension)));
            }
        }
    }

    #[test]
    fn recycled_slots_are_reused_before_growth() {
        let mut store = slab(2, 1, 0, VoxelType::DIRT);
        let mut mesher = GreedyMesher::new(15);
        mesher.generate_mesh(&mut store, Vector2::new(2, 1), 0, 1);

        let old_index = store
            .get(Point3::new(0, 0, 0))
            .unwrap()
            .face_index(VoxelFace::PosY)
            .unwrap();
        mesher.break_up_rect(&mut store, Point3::new(1, 0, 0), VoxelFace::PosY);

        // The split allocated a 1x1 band for the left voxel; the old merged
        // rectangle's slot is now free and must be handed out next.
        assert_eq!(mesher.live_quad_count(), 1);
        assert!(mesher.is_recycled(old_index));
        let slots_before = mesher.quads.len();
        let reused = mesher.create_mesh_face(Point3::new(1, 0, 0), VoxelFace::PosY, VoxelType::DIRT);
        assert_eq!(reused, old_index);
        assert_eq!(mesher.quads.len(), slots_before);
    }

    #[test]
    fn recycled_quads_render_degenerate() {
        let mut store = slab(2, 1, 0, VoxelType::DIRT);
        let mut mesher = GreedyMesher::new(15);
        mesher.generate_mesh(&mut store, Vector2::new(2, 1), 0, 1);
        mesher.break_up_rect(&mut store, Point3::new(1, 0, 0), VoxelFace::PosY);

        let snapshot = mesher.snapshot();
        for quad_index in 0..snapshot.quad_count() {
            if !mesher.is_recycled(quad_index) {
                continue;
            }
            for corner in 0..4 {
                assert_eq!(snapshot.vertices[quad_index * 4 + corner], [0.0, 0.0, 0.0]);
            }
        }
    }

    #[test]
    fn dirty_count_batches_until_threshold() {
        let mut mesher = GreedyMesher::new(2);
        assert!(!mesher.needs_rebuild());
        mesher.mark_dirty();
        mesher.mark_dirty();
        assert!(!mesher.needs_rebuild());
        mesher.mark_dirty();
        assert!(mesher.needs_rebuild());

        let mut store = VoxelStore::new();
        mesher.generate_mesh(&mut store, Vector2::new(1, 1), i32::MAX, i32::MIN);
        assert_eq!(mesher.dirty_count(), 0);
    }
}
