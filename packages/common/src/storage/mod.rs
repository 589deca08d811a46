mod error;
mod path;
mod traits;

pub mod filesystem;

pub use error::StorageError;
pub use path::{contains_path_traversal, validate_relative_path};
pub use traits::{BoxReader, FileStore};
