pub mod system;

// Re-export all models for easier imports
pub use calcmesh_core::protocol::*;
pub use system::*;
