//! # Chunk Manager Module
//!
//! The explicitly passed context that owns every loaded chunk, the biome
//! field, and the chunk-size configuration. Anything that needs to resolve a
//! world position to a chunk, the editor above all, receives a reference
//! to this manager instead of reaching for a global.
//!
//! The manager also runs the per-frame maintenance pump: once a chunk has
//! batched more edits than its dirty threshold, the pump forces a full
//! greedy rebuild, and it forwards redraw/collision work to the primary
//! thread through the bounded render queue.

use std::collections::HashMap;
use std::sync::Arc;

use cgmath::{Point2, Point3, Vector2};
use log::debug;

use crate::config::EngineConfig;
use crate::core::{CancellationToken, MtResource};
use crate::tasks::chunk_load_task::ChunkLoadTask;
use crate::tasks::TaskManager;

use super::biome::BiomeField;
use super::chunk::{Chunk, LoadStatus};
use super::render_queue::{RenderCommand, RenderQueue};

/// Owns all loaded chunks and the terrain-wide configuration.
pub struct ChunkManager {
    chunk_size: Vector2<i32>,
    max_dirty_count: u32,
    biome: Arc<dyn BiomeField>,
    chunks: HashMap<Point2<i32>, MtResource<Chunk>>,
    pending_loads: HashMap<Point2<i32>, CancellationToken>,
}

impl ChunkManager {
    /// Creates a manager with no chunks loaded.
    pub fn new(config: &EngineConfig, biome: Arc<dyn BiomeField>) -> Self {
        ChunkManager {
            chunk_size: config.chunk_size_vec(),
            max_dirty_count: config.max_dirty_count,
            biome,
            chunks: HashMap::new(),
            pending_loads: HashMap::new(),
        }
    }

    /// The number of columns every chunk covers in x and z.
    pub fn chunk_size(&self) -> Vector2<i32> {
        self.chunk_size
    }

    /// The height/material field chunks are generated from.
    pub fn biome(&self) -> &dyn BiomeField {
        self.biome.as_ref()
    }

    /// The id of the chunk containing `world` (the y component is ignored;
    /// chunks span the full vertical range).
    pub fn chunk_id_of(&self, world: Point3<i32>) -> Point2<i32> {
        Point2::new(
            world.x.div_euclid(self.chunk_size.x),
            world.z.div_euclid(self.chunk_size.y),
        )
    }

    /// The chunk containing `world`, if it is loaded.
    pub fn get_chunk(&self, world: Point3<i32>) -> Option<MtResource<Chunk>> {
        self.get_chunk_by_id(self.chunk_id_of(world))
    }

    /// The chunk with id `id`, if it is loaded.
    pub fn get_chunk_by_id(&self, id: Point2<i32>) -> Option<MtResource<Chunk>> {
        self.chunks.get(&id).cloned()
    }

    /// All loaded chunks, for diagnostics.
    pub fn chunks(&self) -> impl Iterator<Item = (&Point2<i32>, &MtResource<Chunk>)> {
        self.chunks.iter()
    }

    /// Inserts an empty `Loading` shell for `id` if none exists yet and
    /// returns its handle.
    fn create_chunk_shell(&mut self, id: Point2<i32>) -> MtResource<Chunk> {
        self.chunks
            .entry(id)
            .or_insert_with(|| {
                MtResource::new(Chunk::new(id, self.chunk_size, self.max_dirty_count))
            })
            .clone()
    }

    /// Schedules chunk `id` for background generation on the worker pool.
    /// Does nothing when the chunk already exists or is already pending.
    pub fn schedule_load(&mut self, id: Point2<i32>, tasks: &mut TaskManager, from_file: bool) {
        if self.chunks.contains_key(&id) {
            return;
        }
        let handle = self.create_chunk_shell(id);
        let cancel = CancellationToken::new();
        self.pending_loads.insert(id, cancel.clone());
        tasks.publish_task(Box::new(ChunkLoadTask::new(
            handle,
            self.biome.clone(),
            from_file,
            cancel,
        )));
    }

    /// Generates chunk `id` synchronously on the calling thread and returns
    /// its handle. Intended for tools and tests; interactive callers should
    /// use `schedule_load`.
    pub fn load_chunk_blocking(&mut self, id: Point2<i32>) -> MtResource<Chunk> {
        let handle = self.create_chunk_shell(id);
        if handle.get().status() == LoadStatus::Loading {
            Chunk::load(
                &handle,
                self.biome.as_ref(),
                false,
                &CancellationToken::new(),
            );
        }
        handle
    }

    /// Drops chunk `id`, cancelling its in-flight generation if one is still
    /// running so the stale result is never committed.
    pub fn unload_chunk(&mut self, id: Point2<i32>) {
        if let Some(cancel) = self.pending_loads.remove(&id) {
            cancel.cancel();
        }
        if self.chunks.remove(&id).is_some() {
            debug!("chunk {id:?}: unloaded");
        }
    }

    /// The per-frame maintenance pump. Forces a full rebuild on chunks that
    /// batched more edits than their dirty threshold, then hands redraw and
    /// collision work to the primary thread. Flags stay set when the queue
    /// is full so the work is retried next frame.
    pub fn update(&mut self, queue: &RenderQueue) {
        let chunks = &self.chunks;
        self.pending_loads.retain(|id, _| match chunks.get(id) {
            Some(chunk) => chunk.get().status() == LoadStatus::Loading,
            None => false,
        });

        for (id, handle) in &self.chunks {
            let needs_attention = {
                let chunk = handle.get();
                chunk.status() == LoadStatus::FinishedLoading
                    && (chunk.mesher.needs_rebuild()
                        || chunk.should_redraw
                        || chunk.should_rebuild_collision)
            };
            if !needs_attention {
                continue;
            }

            let mut chunk = handle.get_mut();
            if chunk.mesher.needs_rebuild() {
                debug!(
                    "chunk {id:?}: {} batched edits, forcing full rebuild",
                    chunk.mesher.dirty_count()
                );
                chunk.generate_mesh();
                chunk.should_redraw = true;
                chunk.should_rebuild_collision = true;
            }
            if chunk.should_redraw {
                let pushed = queue.push(RenderCommand::UploadMesh {
                    chunk_id: *id,
                    mesh: chunk.mesher.snapshot(),
                });
                if pushed {
                    chunk.should_redraw = false;
                }
            }
            if chunk.should_rebuild_collision {
                let pushed = queue.push(RenderCommand::RebuildCollision { chunk_id: *id });
                if pushed {
                    chunk.should_rebuild_collision = false;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::render_queue;
    use crate::terrain::test_support::FlatBiome;

    fn manager(max_dirty_count: u32) -> ChunkManager {
        let config = EngineConfig {
            chunk_size: [8, 8],
            max_dirty_count,
            ..EngineConfig::default()
        };
        ChunkManager::new(&config, Arc::new(FlatBiome::new(5)))
    }

    #[test]
    fn chunk_ids_floor_divide_world_positions() {
        let manager = manager(15);
        assert_eq!(manager.chunk_id_of(Point3::new(0, 0, 0)), Point2::new(0, 0));
        assert_eq!(manager.chunk_id_of(Point3::new(7, 99, 7)), Point2::new(0, 0));
        assert_eq!(manager.chunk_id_of(Point3::new(8, 0, 0)), Point2::new(1, 0));
        assert_eq!(
            manager.chunk_id_of(Point3::new(-1, 0, -9)),
            Point2::new(-1, -2)
        );
    }

    #[test]
    fn blocking_load_produces_a_finished_chunk() {
        let mut manager = manager(15);
        let handle = manager.load_chunk_blocking(Point2::new(0, 0));
        let chunk = handle.get();
        assert_eq!(chunk.status(), LoadStatus::FinishedLoading);
        assert_eq!(chunk.origin(), Point3::new(0, 0, 0));
        // A flat 8x8 field meshes into a single top rectangle.
        assert_eq!(chunk.mesher.live_quad_count(), 1);
        assert!(manager.get_chunk(Point3::new(3, 5, 3)).is_some());
        assert!(manager.get_chunk(Point3::new(30, 5, 3)).is_none());
    }

    #[test]
    fn dirty_threshold_forces_rebuild_and_upload() {
        let mut manager = manager(2);
        let handle = manager.load_chunk_blocking(Point2::new(0, 0));
        {
            let mut chunk = handle.get_mut();
            for _ in 0..3 {
                chunk.mark_dirty();
            }
            assert!(chunk.mesher.needs_rebuild());
        }

        let (queue, receiver) = render_queue::bounded(8);
        manager.update(&queue);

        assert_eq!(handle.get().mesher.dirty_count(), 0);
        let mut uploads = 0;
        let mut collisions = 0;
        while let Ok(command) = receiver.try_recv() {
            match command {
                RenderCommand::UploadMesh { .. } => uploads += 1,
                RenderCommand::RebuildCollision { .. } => collisions += 1,
            }
        }
        assert_eq!((uploads, collisions), (1, 1));
    }

    #[test]
    fn full_queue_keeps_flags_for_retry() {
        let mut manager = manager(15);
        let handle = manager.load_chunk_blocking(Point2::new(0, 0));
        handle.get_mut().should_redraw = true;
        handle.get_mut().should_rebuild_collision = true;

        let (queue, receiver) = render_queue::bounded(1);
        manager.update(&queue);
        // Only the mesh upload fit; the collision request must survive.
        assert!(!handle.get().should_redraw);
        assert!(handle.get().should_rebuild_collision);

        while receiver.try_recv().is_ok() {}
        manager.update(&queue);
        assert!(!handle.get().should_rebuild_collision);
    }

    #[test]
    fn scheduled_loads_complete_through_the_worker_pool() {
        let mut manager = manager(15);
        let (queue, receiver) = render_queue::bounded(8);
        let mut tasks = TaskManager::new(2);

        manager.schedule_load(Point2::new(0, 0), &mut tasks, false);
        manager.schedule_load(Point2::new(1, 0), &mut tasks, false);

        for _ in 0..500 {
            tasks.process_completed_tasks(&manager, &queue);
            tasks.process_queued_tasks();
            if !tasks.has_pending_work() {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(1));
        }
        assert!(!tasks.has_pending_work(), "workers never finished");

        for id in [Point2::new(0, 0), Point2::new(1, 0)] {
            let chunk = manager.get_chunk_by_id(id).unwrap();
            assert_eq!(chunk.get().status(), LoadStatus::FinishedLoading);
        }

        let mut uploads = 0;
        while let Ok(command) = receiver.try_recv() {
            if matches!(command, RenderCommand::UploadMesh { .. }) {
                uploads += 1;
            }
        }
        assert_eq!(uploads, 2);

        // The maintenance pump purges the completed load tokens.
        manager.update(&queue);
        assert!(manager.pending_loads.is_empty());
    }

    #[test]
    fn unload_cancels_pending_loads() {
        let mut manager = manager(15);
        let id = Point2::new(4, -2);
        let handle = manager.create_chunk_shell(id);
        let cancel = CancellationToken::new();
        manager.pending_loads.insert(id, cancel.clone());

        manager.unload_chunk(id);
        assert!(cancel.is_cancelled());
        assert!(manager.get_chunk_by_id(id).is_none());

        // A cancelled load must not commit into the (now detached) shell.
        Chunk::load(&handle, manager.biome(), false, &cancel);
        assert_eq!(handle.get().status(), LoadStatus::Loading);
        assert_eq!(handle.get().voxel_count(), 0);
    }
}
