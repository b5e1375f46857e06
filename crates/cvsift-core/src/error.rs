use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Catalog error: {0}")]
    Catalog(#[from] crate::catalog::CatalogError),

    #[error("Export error: {0}")]
    Export(#[from] crate::export::ExportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
