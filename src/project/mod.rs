//! Project registry, commit cache and the facade tying them together.

pub mod cache;
pub mod explorer;
pub mod registry;

pub use cache::CommitCache;
pub use explorer::Explorer;
pub use registry::ProjectRegistry;
