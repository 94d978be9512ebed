//! # Render Queue Module
//!
//! The bounded handoff between terrain bookkeeping and the primary-thread
//! collaborators that own render-API resources. Workers and the maintenance
//! pump never touch GPU buffers or physics shapes; they enqueue commands
//! here and the renderer drains them on the primary thread.

use std::sync::mpsc::{sync_channel, Receiver, SyncSender, TrySendError};

use cgmath::Point2;
use log::warn;

use super::meshing::MeshSnapshot;

/// Work handed to the primary thread.
#[derive(Debug)]
pub enum RenderCommand {
    /// Upload a chunk's mesh buffers to the GPU.
    UploadMesh {
        /// The chunk whose mesh changed.
        chunk_id: Point2<i32>,
        /// A flat copy of the chunk's current buffers.
        mesh: MeshSnapshot,
    },

    /// Rebuild a chunk's collision shape from its current mesh.
    RebuildCollision {
        /// The chunk whose collision shape is stale.
        chunk_id: Point2<i32>,
    },
}

/// The producing side of the primary-thread command queue.
#[derive(Debug, Clone)]
pub struct RenderQueue {
    sender: SyncSender<RenderCommand>,
}

impl RenderQueue {
    /// Tries to enqueue a command without blocking.
    ///
    /// Returns `false` when the queue is full (the caller should keep its
    /// redraw flag set and retry on the next frame) or when the consumer is
    /// gone.
    pub fn push(&self, command: RenderCommand) -> bool {
        match self.sender.try_send(command) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => false,
            Err(TrySendError::Disconnected(_)) => {
                warn!("render queue consumer disconnected, dropping command");
                false
            }
        }
    }
}

/// Creates a queue holding at most `capacity` undelivered commands, returning
/// the producer handle and the receiver the primary thread drains.
pub fn bounded(capacity: usize) -> (RenderQueue, Receiver<RenderCommand>) {
    let (sender, receiver) = sync_channel(capacity);
    (RenderQueue { sender }, receiver)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_queue_rejects_without_blocking() {
        let (queue, receiver) = bounded(1);
        assert!(queue.push(RenderCommand::RebuildCollision {
            chunk_id: Point2::new(0, 0),
        }));
        assert!(!queue.push(RenderCommand::RebuildCollision {
            chunk_id: Point2::new(1, 0),
        }));

        receiver.recv().unwrap();
        assert!(queue.push(RenderCommand::RebuildCollision {
            chunk_id: Point2::new(1, 0),
        }));
    }
}
