pub mod catalog;
pub mod error;
pub mod model;
pub mod registry;

pub use error::RegistryError;
pub use model::{FetchMethod, Source, SourceStats};
pub use registry::{SourceRegistry, SourceStore};
