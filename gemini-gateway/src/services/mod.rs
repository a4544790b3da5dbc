pub mod encoder;
pub mod providers;
pub mod staging;

pub use encoder::{encode, MediaKind};
pub use staging::{StagedFile, UploadStore};
