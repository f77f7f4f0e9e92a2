use thiserror::Error;

/// Why an `update` was rejected. The previous state is fully retained.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpdateError {
    /// The requested attribute is absent from every region's mapping.
    #[error("unknown attribute {0:?}")]
    UnknownAttribute(String),
    #[error("unknown palette {0:?}")]
    UnknownPalette(String),
}

#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("geometry source failed: {0}")]
    Source(String),
}

/// Why a session could not reach `Ready`.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error("geometry provider returned no regions")]
    EmptyGeometry,
    #[error("no tabular sources supplied")]
    NoSources,
    #[error(transparent)]
    Init(#[from] UpdateError),
}
