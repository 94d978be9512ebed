#![warn(missing_docs)]

//! # Voxel Terrain
//!
//! An incremental, chunk-local greedy voxel meshing engine.
//!
//! The terrain is a heightmap-shaped voxel field split into chunks. Each
//! chunk keeps a sparse voxel store, a height-density histogram, and a
//! greedy mesher that merges coplanar same-material faces into large
//! rectangles. Single-block edits are applied incrementally, splitting and
//! creating individual rectangles in O(affected faces), and batched until a
//! threshold forces a full rebuild.
//!
//! ## Key Modules
//!
//! * `terrain`: chunks, voxels, the greedy mesher, the block edit protocol,
//!   the biome height field and the chunk manager
//! * `tasks`: the worker-thread pool that generates chunks off the primary
//!   thread
//! * `core`: shared-resource and cancellation primitives
//! * `config`: runtime configuration
//!
//! ## Threading
//!
//! Chunk generation and full mesh builds run on worker threads; everything
//! that faces a renderer or physics engine (buffer uploads, collision
//! rebuilds) is funneled through a bounded queue drained on the primary
//! thread. Block edits are primary-thread-only and are not safe against
//! concurrent edits of the same neighborhood.
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use cgmath::Point2;
//! use voxel_terrain::config::EngineConfig;
//! use voxel_terrain::terrain::{render_queue, ChunkManager, NoiseBiome};
//! use voxel_terrain::tasks::TaskManager;
//!
//! let config = EngineConfig::default();
//! let biome = Arc::new(NoiseBiome::new(config.world_seed));
//! let mut chunks = ChunkManager::new(&config, biome);
//! let mut workers = TaskManager::new(config.worker_threads);
//! let (queue, receiver) = render_queue::bounded(config.render_queue_capacity);
//!
//! chunks.schedule_load(Point2::new(0, 0), &mut workers, false);
//! // Every frame:
//! workers.process_completed_tasks(&chunks, &queue);
//! workers.process_queued_tasks();
//! chunks.update(&queue);
//! for _command in receiver.try_iter() {
//!     // Upload meshes / rebuild collision on the primary thread.
//! }
//! ```

pub mod config;
pub mod core;
pub mod tasks;
pub mod terrain;
