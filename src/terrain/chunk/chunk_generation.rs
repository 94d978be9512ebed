//! # Chunk Generation Module
//!
//! Populates a freshly created chunk from the biome height field: the padded
//! heightmap first, then the sparse voxel store and the height-density
//! histogram.
//!
//! ## Which voxels are materialized
//!
//! The terrain is a heightmap, so only the voxels that can ever matter for
//! meshing are stored. For each column with surface height `h` and
//! neighboring surface heights `n0..n3`:
//!
//! * solid voxels from `h` down to `min(h - 1, n0..n3) + 1`; everything
//!   deeper is hidden on all six sides and stays implied;
//! * AIR voxels from `h + 1` up to `max(h + 1, n0..n3)`, exactly the air a
//!   neighboring column's side faces (or this column's own top face) border
//!   on.
//!
//! Each AIR voxel starts with its dependent count precomputed from the
//! heightmap: one for every side neighbor whose surface sits exactly at that
//! height, plus one for the cell directly above this column's surface.

use cgmath::Point3;

use crate::terrain::biome::BiomeField;
use crate::terrain::coords;
use crate::terrain::voxel::{Voxel, VoxelType};

use super::Chunk;

/// Fills the chunk's padded heightmap from the biome height field. The
/// border cells sample the neighboring chunks' columns so later neighbor
/// lookups never leave the map.
pub fn generate_heightmap(chunk: &mut Chunk, biome: &dyn BiomeField) {
    let width = chunk.chunk_size.x + 2;
    let depth = chunk.chunk_size.y + 2;
    for z in 0..depth {
        for x in 0..width {
            let world = coords::local_to_world(Point3::new(x - 1, 0, z - 1), chunk.origin);
            chunk.heightmap[(x + width * z) as usize] = biome.height(world);
        }
    }
}

/// Materializes the voxel records of every column and registers the solid
/// ones in the height histogram. Expects `generate_heightmap` to have run.
pub fn generate_voxels(chunk: &mut Chunk, biome: &dyn BiomeField) {
    let biome_id = 0;

    for z in 0..chunk.chunk_size.y {
        for x in 0..chunk.chunk_size.x {
            let height = chunk.heightmap_value(x, z);
            let neighboring = chunk.neighboring_heights(x, z);

            let mut lowest = height - 1;
            let mut highest = height + 1;
            for h in neighboring {
                lowest = lowest.min(h);
                highest = highest.max(h);
            }

            // The air voxels above the surface, with their dependent counts
            // derived from the heightmap: every neighboring column whose
            // surface sits exactly at this height will draw a side face
            // against this cell, and the cell directly above the surface
            // carries this column's own top face.
            for y in ((height + 1)..=highest).rev() {
                let position = Point3::new(x, y, z);
                let mut voxel = Voxel::new(position, VoxelType::AIR, biome_id);
                for h in neighboring {
                    if y == h {
                        voxel.exposed_faces += 1;
                    }
                }
                if y == height + 1 {
                    voxel.exposed_faces += 1;
                }
                chunk.voxels.insert(voxel);
            }

            // The solid voxels, down to the deepest cell any neighboring
            // column can expose.
            for y in ((lowest + 1)..=height).rev() {
                chunk.add_height(y);

                let position = Point3::new(x, y, z);
                let world = coords::local_to_world(position, chunk.origin);
                let voxel_type = biome.surface_type(world, height);
                chunk.voxels.insert(Voxel::new(position, voxel_type, biome_id));
            }
        }
    }
}
