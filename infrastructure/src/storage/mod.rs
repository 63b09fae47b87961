//! Session persistence adapters.

mod cleanup;
mod file;
mod memory;

pub use cleanup::spawn_cleanup_task;
pub use file::FileSessionStore;
pub use memory::InMemorySessionStore;
