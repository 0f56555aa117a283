//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod annotation_history_repo;
pub mod media_item_repo;

pub use annotation_history_repo::AnnotationHistoryRepo;
pub use media_item_repo::MediaItemRepo;
