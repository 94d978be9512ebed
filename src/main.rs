//! # Headless Terrain Demo
//!
//! Loads a small grid of chunks through the worker pool, applies a few
//! block edits through the editor, and logs mesh statistics. Stands in for
//! the renderer/physics collaborators by draining the render queue on the
//! primary thread.
//!
//! ```bash
//! RUST_LOG=info cargo run --release
//! ```

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use cgmath::{Point2, Point3};
use log::{info, warn};

use voxel_terrain::config::EngineConfig;
use voxel_terrain::terrain::coords;
use voxel_terrain::terrain::{
    render_queue, BiomeField, ChunkEditor, ChunkManager, NoiseBiome, RenderCommand, VoxelType,
};
use voxel_terrain::tasks::TaskManager;

const CONFIG_PATH: &str = "voxel-terrain.json";
const LOAD_RADIUS: i32 = 1;

fn main() {
    env_logger::Builder::new()
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    let config = match EngineConfig::from_file(Path::new(CONFIG_PATH)) {
        Ok(config) => config,
        Err(error) => {
            warn!("{error}; using default configuration");
            EngineConfig::default()
        }
    };

    let biome = Arc::new(NoiseBiome::new(config.world_seed));
    let mut chunks = ChunkManager::new(&config, biome.clone());
    let mut workers = TaskManager::new(config.worker_threads);
    let (queue, receiver) = render_queue::bounded(config.render_queue_capacity);

    for z in -LOAD_RADIUS..=LOAD_RADIUS {
        for x in -LOAD_RADIUS..=LOAD_RADIUS {
            chunks.schedule_load(Point2::new(x, z), &mut workers, false);
        }
    }

    // Pump the frame loop until every scheduled chunk has landed.
    let deadline = Instant::now() + Duration::from_secs(60);
    let mut uploads = 0;
    let mut collisions = 0;
    while workers.has_pending_work() {
        workers.process_completed_tasks(&chunks, &queue);
        workers.process_queued_tasks();
        chunks.update(&queue);
        for command in receiver.try_iter() {
            match command {
                RenderCommand::UploadMesh { chunk_id, mesh } => {
                    uploads += 1;
                    info!(
                        "upload chunk {chunk_id:?}: {} quads, {} vertex bytes",
                        mesh.quad_count(),
                        mesh.vertex_bytes().len()
                    );
                }
                RenderCommand::RebuildCollision { .. } => collisions += 1,
            }
        }
        if Instant::now() > deadline {
            warn!("chunk loads did not finish in time");
            break;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    info!("initial load done: {uploads} mesh uploads, {collisions} collision rebuilds");

    // Dig a few blocks out of the center chunk's surface, then cap the hole.
    let handle = chunks
        .get_chunk_by_id(Point2::new(0, 0))
        .expect("center chunk must be loaded");
    let chunk_size = chunks.chunk_size();
    let column = Point2::new(chunk_size.x / 2, chunk_size.y / 2);
    let surface = biome.height(Point3::new(column.x, 0, column.y));

    for depth in 0..3 {
        let target = Point3::new(column.x, surface - depth, column.y);
        {
            let mut chunk = handle.get_mut();
            let origin = chunk.origin();
            let local = coords::world_to_local(target, origin);
            chunk
                .get_voxel_mut(local)
                .expect("surface voxel must exist")
                .voxel_type = VoxelType::AIR;
        }
        ChunkEditor::create_or_destroy_block(&chunks, &handle, target, true, true);
    }

    let cap = Point3::new(column.x, surface + 1, column.y);
    {
        let mut chunk = handle.get_mut();
        let origin = chunk.origin();
        let local = coords::world_to_local(cap, origin);
        chunk
            .get_voxel_mut(local)
            .expect("air above the surface must be stored")
            .voxel_type = VoxelType::STONE;
    }
    ChunkEditor::create_or_destroy_block(&chunks, &handle, cap, true, true);

    chunks.update(&queue);
    for command in receiver.try_iter() {
        if let RenderCommand::UploadMesh { chunk_id, mesh } = command {
            info!(
                "re-upload chunk {chunk_id:?}: {} quads after edits",
                mesh.quad_count()
            );
        }
    }

    for (id, chunk) in chunks.chunks() {
        let chunk = chunk.get();
        info!(
            "chunk {id:?}: {} voxels, {} live quads, heights {}..={}",
            chunk.voxel_count(),
            chunk.mesher.live_quad_count(),
            chunk.min_height(),
            chunk.max_height()
        );
    }
}
