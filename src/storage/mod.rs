pub mod base;
pub mod file_storage;
pub mod memory_storage;

// Re-export the primary storage items so code outside can do
// "use crate::storage::{TokenStorage, create_storage};"
pub use base::{create_storage, TokenStorage};
pub use file_storage::FileTokenStorage;
pub use memory_storage::MemoryTokenStorage;
