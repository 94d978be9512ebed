//! # Core Module
//!
//! Engine-agnostic concurrency primitives shared by the terrain code: the
//! locked resource handle chunks are shared through, and the cancellation
//! token that lets an unloaded chunk abandon its in-flight generation.

pub mod cancellation;
pub mod mt_resource;

pub use cancellation::CancellationToken;
pub use mt_resource::MtResource;
