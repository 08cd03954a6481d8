/// Song catalog HTTP client
pub mod catalog;
/// Data entities for songs and artists
pub mod entities;
/// Error types and result aliases
pub mod errors;

pub use catalog::CatalogClient;
pub use entities::Song;
