pub mod locks;
pub mod memory;

pub use locks::KeyedLocks;
pub use memory::InMemoryTable;
