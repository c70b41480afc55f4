//! Dataset loading, object store access, and result table persistence.

pub mod dataset;
pub mod store;
pub mod tables;

pub use dataset::load_posts;
pub use tables::write_table;
