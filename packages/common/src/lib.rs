pub mod spiciness;
pub mod storage;

pub use spiciness::Spiciness;
