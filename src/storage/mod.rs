pub mod map_files;
pub mod repo;
