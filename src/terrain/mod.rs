//! # Terrain Module
//!
//! The voxel terrain domain: chunks and their sparse voxel stores, the
//! greedy mesher, the cross-chunk block edit protocol, the biome height
//! field, and the manager that addresses chunks and pumps their maintenance.

pub mod biome;
pub mod chunk;
pub mod chunk_manager;
pub mod coords;
pub mod editor;
pub mod meshing;
pub mod render_queue;
pub mod voxel;

#[cfg(test)]
pub mod test_support;

pub use biome::{BiomeField, NoiseBiome};
pub use chunk::{Chunk, LoadStatus};
pub use chunk_manager::ChunkManager;
pub use editor::ChunkEditor;
pub use meshing::{GreedyMesher, MeshSnapshot};
pub use render_queue::{RenderCommand, RenderQueue};
pub use voxel::{Voxel, VoxelFace, VoxelStore, VoxelType};
