pub mod alloc;
pub mod files;
pub mod lock;
pub mod repo;
