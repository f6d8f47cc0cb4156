pub mod memfs;

pub use memfs::MemoryFs;
