pub mod directory_manager;

pub use directory_manager::DirectoryManager;
