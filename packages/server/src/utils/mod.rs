pub mod filename;
pub mod image;
pub mod jwt;
pub mod upload;
