//! # Chunk Load Task
//!
//! The background task that generates a chunk's content and initial mesh.
//! The heavy work (height field sampling, voxel materialization, the full
//! greedy build) happens on the worker; the result handler only snapshots
//! the finished mesh and hands it to the primary thread.

use std::sync::Arc;

use crate::core::{CancellationToken, MtResource};
use crate::terrain::biome::BiomeField;
use crate::terrain::chunk::Chunk;
use crate::terrain::chunk_manager::ChunkManager;
use crate::terrain::render_queue::{RenderCommand, RenderQueue};

use super::task::{Task, TaskResult};

/// Generates one chunk on a worker thread.
pub struct ChunkLoadTask {
    chunk: MtResource<Chunk>,
    biome: Arc<dyn BiomeField>,
    from_file: bool,
    cancel: CancellationToken,
}

impl ChunkLoadTask {
    /// Creates a load task for the chunk shell behind `chunk`.
    pub fn new(
        chunk: MtResource<Chunk>,
        biome: Arc<dyn BiomeField>,
        from_file: bool,
        cancel: CancellationToken,
    ) -> Self {
        ChunkLoadTask {
            chunk,
            biome,
            from_file,
            cancel,
        }
    }
}

impl Task for ChunkLoadTask {
    fn process(&self) -> Box<dyn TaskResult + Send> {
        Chunk::load(
            &self.chunk,
            self.biome.as_ref(),
            self.from_file,
            &self.cancel,
        );
        Box::new(ChunkLoadTaskResult {
            chunk: self.chunk.clone(),
            cancel: self.cancel.clone(),
        })
    }
}

/// Hands a freshly generated chunk's mesh to the primary thread.
pub struct ChunkLoadTaskResult {
    chunk: MtResource<Chunk>,
    cancel: CancellationToken,
}

impl TaskResult for ChunkLoadTaskResult {
    fn handle_result(
        self: Box<Self>,
        _manager: &ChunkManager,
        queue: &RenderQueue,
    ) -> Vec<Box<dyn Task + Send>> {
        if self.cancel.is_cancelled() {
            // The chunk was unloaded mid-generation; nothing was committed.
            return Vec::new();
        }

        let (chunk_id, mesh) = {
            let chunk = self.chunk.get();
            (chunk.id(), chunk.mesher.snapshot())
        };

        let uploaded = queue.push(RenderCommand::UploadMesh { chunk_id, mesh });
        let collision = queue.push(RenderCommand::RebuildCollision { chunk_id });
        if !uploaded || !collision {
            // Queue full: leave the flags set so the maintenance pump
            // retries on a later frame.
            let mut chunk = self.chunk.get_mut();
            chunk.should_redraw |= !uploaded;
            chunk.should_rebuild_collision |= !collision;
        }

        Vec::new()
    }
}
