use thiserror::Error;

use crate::mapping::MappingError;

#[derive(Debug, Error)]
pub enum MusubiError {
    #[error("config error: {0}")]
    Config(String),

    #[error("mapping document error: {0}")]
    Document(#[from] quick_xml::DeError),

    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
