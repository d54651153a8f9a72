pub mod calculate;
pub mod execute;
pub mod parse;
pub mod system;
pub mod test_helpers;

// Re-export all handlers for easier imports
pub use calculate::*;
pub use execute::*;
pub use parse::*;
pub use system::*;
