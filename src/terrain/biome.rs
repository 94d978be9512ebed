//! # Biome Module
//!
//! The procedural height and material field the terrain is generated from.
//!
//! The engine core only ever talks to the [`BiomeField`] trait: a pure
//! function from world position to column height, plus one from world
//! position to surface material. Chunks query it during generation, and the
//! edit protocol queries it when it has to materialize a buried voxel whose
//! type was never stored. Handing the field in explicitly (rather than
//! through a global) keeps generation testable with deterministic doubles.
//!
//! [`NoiseBiome`] is the production implementation: two low-frequency Perlin
//! fields pick a biome band (flatland, hills, plateau, mountains), a cliff
//! mask swaps the mountain band for plateaus, and the bands are blended near
//! their borders so the terrain never steps discontinuously.

use cgmath::{Point3, Vector2};
use noise::{NoiseFn, Perlin};

use crate::terrain::voxel::VoxelType;

/// A height/material field the terrain is built from.
pub trait BiomeField: Send + Sync {
    /// The surface height of the column containing `world` (only the x and z
    /// components matter).
    fn height(&self, world: Point3<i32>) -> i32;

    /// The material of the voxel at `world` in a column whose surface is at
    /// `column_height`. Never returns `AIR`.
    fn surface_type(&self, world: Point3<i32>, column_height: i32) -> VoxelType;
}

const MIN_HILL_HEIGHT: f64 = 15.0;
const MAX_HILL_HEIGHT: f64 = 55.0;
const MIN_MOUNTAIN_HEIGHT: f64 = 110.0;
const MAX_MOUNTAIN_HEIGHT: f64 = 140.0;
const MIN_PLATEAU_HEIGHT: f64 = 60.0;
const MAX_PLATEAU_HEIGHT: f64 = 70.0;

/// Perlin-noise terrain with flatland, hill, plateau and mountain bands.
pub struct NoiseBiome {
    perlin: Perlin,
    biome_offset: Vector2<f64>,
    biome_offset2: Vector2<f64>,
    flatland_offset: Vector2<f64>,
    relief_offset: Vector2<f64>,
    cliff_offset: Vector2<f64>,
    soil_offset: Vector2<f64>,
}

impl NoiseBiome {
    /// Creates the field for `seed`. The same seed always produces the same
    /// terrain.
    pub fn new(seed: u64) -> Self {
        let mut rng = fastrand::Rng::with_seed(seed);
        let mut offset = move || {
            Vector2::new(
                rng.f64() * 40_000.0 - 20_000.0,
                rng.f64() * 40_000.0 - 20_000.0,
            )
        };
        NoiseBiome {
            perlin: Perlin::new(seed as u32),
            biome_offset: offset(),
            biome_offset2: offset(),
            flatland_offset: offset(),
            relief_offset: offset(),
            cliff_offset: offset(),
            soil_offset: offset(),
        }
    }

    /// Samples the underlying noise remapped into `0..=1`.
    fn perlin01(&self, x: f64, z: f64) -> f64 {
        (self.perlin.get([x, z]) + 1.0) * 0.5
    }

    fn flatland_height(&self, x: f64, z: f64) -> i32 {
        let sample = self.perlin01(
            (x + self.flatland_offset.x) * 0.01,
            (z + self.flatland_offset.y) * 0.01,
        );
        (sample * 10.0).floor() as i32
    }

    fn hills_height(&self, biome_val: f64, x: f64, z: f64) -> i32 {
        let sample = self.perlin01(
            (x + self.relief_offset.x) * 0.02,
            (z + self.relief_offset.y) * -0.02,
        );
        let mut height =
            (sample * (MAX_HILL_HEIGHT - MIN_HILL_HEIGHT) + MIN_HILL_HEIGHT).floor() as i32;
        if biome_val < 0.65 {
            // Near the flatland border, fade the hills down into it.
            let ratio = (biome_val - 0.4) / 0.25;
            let flatland = self.flatland_height(x, z);
            height = (height as f64 * ratio + flatland as f64 * (1.0 - ratio)).floor() as i32;
        }
        height
    }

    fn mountains_height(&self, biome_val: f64, x: f64, z: f64) -> i32 {
        let sample = self.perlin01(
            (x + self.relief_offset.x) * 0.005,
            (z + self.relief_offset.y) * 0.005,
        );
        let mut height = (sample * (MAX_MOUNTAIN_HEIGHT - MIN_MOUNTAIN_HEIGHT)
            + MIN_MOUNTAIN_HEIGHT)
            .floor() as i32;
        if biome_val < 0.90 {
            let ratio = ((biome_val - 0.7) / 0.2).powi(2);
            let hills = self.hills_height(biome_val, x, z);
            height = (height as f64 * ratio + hills as f64 * (1.0 - ratio)).floor() as i32;
        }
        height
    }

    fn plateau_height(&self, biome_val: f64, x: f64, z: f64) -> i32 {
        let sample = self.perlin01(
            (x + self.relief_offset.x) * 0.005,
            (z + self.relief_offset.y) * 0.005,
        );
        let mut height = (sample * (MAX_PLATEAU_HEIGHT - MIN_PLATEAU_HEIGHT)
            + MIN_PLATEAU_HEIGHT)
            .floor() as i32;
        if biome_val < 0.7 {
            let ratio = ((biome_val - 0.6) / 0.1).powi(2);
            let hills = self.hills_height(biome_val, x, z);
            height = (height as f64 * ratio + hills as f64 * (1.0 - ratio)).floor() as i32;
        }
        height
    }
}

impl BiomeField for NoiseBiome {
    fn height(&self, world: Point3<i32>) -> i32 {
        let x = world.x as f64;
        let z = world.z as f64;

        let biome_val = (self.perlin01(
            (x + self.biome_offset.x) * 0.005,
            (z + self.biome_offset.y) * -0.001,
        ) + self.perlin01(
            (z + self.biome_offset2.x) * -0.004,
            (x + self.biome_offset2.y) * -0.003,
        )) * 0.5;

        let is_cliff_zone = self.perlin01(
            (x + self.cliff_offset.x) * -0.001,
            (z + self.cliff_offset.y) * 0.002,
        ) > 0.5;

        if biome_val < 0.40 {
            self.flatland_height(x, z)
        } else if is_cliff_zone {
            if biome_val < 0.6 {
                self.hills_height(biome_val, x, z)
            } else {
                self.plateau_height(biome_val, x, z)
            }
        } else if biome_val < 0.7 {
            self.hills_height(biome_val, x, z)
        } else {
            self.mountains_height(biome_val, x, z)
        }
    }

    fn surface_type(&self, world: Point3<i32>, column_height: i32) -> VoxelType {
        let sample = self.perlin01(
            (world.x as f64 + self.soil_offset.x) * 0.0316,
            (world.z as f64 + self.soil_offset.y) * -0.0356,
        );
        let dirt_depth = (sample * 5.0).floor() as i32 + 1;

        if column_height == world.y {
            VoxelType::GRASS
        } else if column_height - world.y < dirt_depth {
            VoxelType::DIRT
        } else {
            VoxelType::STONE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_is_deterministic() {
        let a = NoiseBiome::new(42);
        let b = NoiseBiome::new(42);
        for x in -50..50 {
            let pos = Point3::new(x * 13, 0, x * 7);
            assert_eq!(a.height(pos), b.height(pos));
            assert_eq!(a.surface_type(pos, 10), b.surface_type(pos, 10));
        }
    }

    #[test]
    fn different_seeds_produce_different_terrain() {
        let a = NoiseBiome::new(1);
        let b = NoiseBiome::new(2);
        let differing = (-100..100)
            .filter(|&x| {
                let pos = Point3::new(x * 11, 0, -x * 3);
                a.height(pos) != b.height(pos)
            })
            .count();
        assert!(differing > 0);
    }

    #[test]
    fn surface_layers_grass_dirt_stone() {
        let biome = NoiseBiome::new(7);
        let column_height = 40;
        let x = 12;
        let z = -9;

        assert_eq!(
            biome.surface_type(Point3::new(x, column_height, z), column_height),
            VoxelType::GRASS
        );
        // Below the surface the material is soil or rock, never grass.
        let below = biome.surface_type(Point3::new(x, column_height - 1, z), column_height);
        assert!(matches!(below, VoxelType::DIRT | VoxelType::STONE));
        // Far below the surface is always stone (dirt depth caps at 5).
        assert_eq!(
            biome.surface_type(Point3::new(x, column_height - 10, z), column_height),
            VoxelType::STONE
        );
    }

    #[test]
    fn heights_stay_in_band_range() {
        let biome = NoiseBiome::new(3);
        for x in -40..40 {
            for z in -40..40 {
                let h = biome.height(Point3::new(x * 5, 0, z * 5));
                assert!((-5..=MAX_MOUNTAIN_HEIGHT as i32 + 5).contains(&h), "height {h}");
            }
        }
    }
}
