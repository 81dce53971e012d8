use thiserror::Error;

#[derive(Debug, Error)]
pub enum FontError {
    #[error("font load error: {0}")]
    Load(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("archive error: {0}")]
    Zip(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("alias U+{from:04X} points to U+{to:04X}, which has no glyph")]
    UnresolvedAlias { from: u32, to: u32 },
    #[error("glyph cell size {found} does not match table cell size {expected}")]
    CellSizeMismatch { expected: u32, found: u32 },
}

pub type Result<T> = std::result::Result<T, FontError>;
