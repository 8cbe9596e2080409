//! Dual-grid compositing: corner sampling, transition bitmasks, per-material quad batches.
#![forbid(unsafe_code)]

pub mod backend;
pub mod batch;
pub mod compositor;
pub mod corners;
pub mod dual_grid;
pub mod software;
pub mod viewport;

pub use backend::{AtlasUploader, BatchRenderer, submit, upload_all};
pub use batch::{BatchSink, MaterialBatch, Quad, QuadBatch};
pub use compositor::Compositor;
pub use corners::{Corners, bitmask_for, sample_corners};
pub use dual_grid::DualGrid;
pub use software::SoftwareRenderer;
pub use viewport::Viewport;
