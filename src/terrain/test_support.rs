//! Deterministic biome doubles and invariant sweeps shared by the terrain
//! tests.

use cgmath::Point3;

use super::biome::BiomeField;
use super::chunk::Chunk;
use super::coords;
use super::voxel::{VoxelFace, VoxelType};

/// A biome whose every column has the same surface height: grass on top, two
/// cells of dirt, stone below. Makes generated chunks fully predictable.
pub struct FlatBiome {
    ground: i32,
}

impl FlatBiome {
    /// A flat field with its surface at `ground`.
    pub fn new(ground: i32) -> Self {
        FlatBiome { ground }
    }
}

impl BiomeField for FlatBiome {
    fn height(&self, _world: Point3<i32>) -> i32 {
        self.ground
    }

    fn surface_type(&self, world: Point3<i32>, column_height: i32) -> VoxelType {
        if world.y == column_height {
            VoxelType::GRASS
        } else if column_height - world.y < 3 {
            VoxelType::DIRT
        } else {
            VoxelType::STONE
        }
    }
}

/// Checks every structural invariant of a chunk's voxel, quad and height
/// bookkeeping. Call after every mutation step in a scenario test.
pub fn assert_chunk_invariants(chunk: &Chunk) {
    let mut solid_count = 0;

    for voxel in chunk.voxels() {
        if voxel.voxel_type.is_solid() {
            solid_count += 1;
            let populated = VoxelFace::all()
                .iter()
                .filter(|face| voxel.face_index(**face).is_some())
                .count() as i32;
            assert_eq!(
                voxel.exposed_faces,
                populated,
                "solid voxel {:?}: exposed count disagrees with face table",
                voxel.position()
            );
        } else {
            assert!(
                voxel.exposed_faces >= 0,
                "air voxel {:?}: negative dependent count",
                voxel.position()
            );
            assert!(
                VoxelFace::all()
                    .iter()
                    .all(|face| voxel.face_index(*face).is_none()),
                "air voxel {:?}: air never owns quads",
                voxel.position()
            );
        }

        for face in VoxelFace::all() {
            let Some(index) = voxel.face_index(face) else {
                continue;
            };
            assert!(
                !chunk.mesher.is_recycled(index),
                "voxel {:?} face {:?}: points at a recycled quad",
                voxel.position(),
                face
            );
            let quad = chunk.mesher.quad(index);
            assert_eq!(quad.face, face);
            assert_eq!(quad.voxel_type, voxel.voxel_type);
            let slice = coords::local_to_slice(voxel.position(), quad.slice_dimension);
            assert!(
                quad.contains(slice),
                "voxel {:?} face {:?}: outside its quad's rectangle",
                voxel.position(),
                face
            );
        }
    }

    // The histogram counts exactly the stored solid voxels, and the bounds
    // sit on its extremal positive entries.
    if chunk.min_height() > chunk.max_height() {
        assert_eq!(solid_count, 0, "sentinel bounds but solid voxels stored");
    } else {
        let total: i32 = (chunk.min_height()..=chunk.max_height())
            .map(|h| chunk.height_density(h))
            .sum();
        assert_eq!(total, solid_count, "histogram total != stored solid voxels");
        assert!(chunk.height_density(chunk.min_height()) > 0);
        assert!(chunk.height_density(chunk.max_height()) > 0);
    }
}

/// The set of (position, face) pairs with a live quad, for comparing the
/// exposed-face topology of a chunk across edit sequences.
pub fn exposed_face_set(chunk: &Chunk) -> std::collections::BTreeSet<(i32, i32, i32, usize)> {
    let mut set = std::collections::BTreeSet::new();
    for voxel in chunk.voxels() {
        for face in VoxelFace::all() {
            if voxel.face_index(face).is_some() {
                let p = voxel.position();
                set.insert((p.x, p.y, p.z, face as usize));
            }
        }
    }
    set
}
