mod catalog;
mod config;
mod io;
mod resolution;
mod scan;

pub use catalog::CatalogError;
pub use config::ConfigurationError;
pub use io::IoError;
pub use resolution::ResolutionError;
pub use scan::ReferenceScanError;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    ReferenceScan(#[from] ReferenceScanError),
}

pub type Result<T> = std::result::Result<T, Error>;
