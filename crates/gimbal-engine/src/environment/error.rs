use std::fmt;
use std::path::PathBuf;

/// Failure to load an environment map from disk.
#[derive(Debug)]
pub enum EnvironmentError {
    /// The file could not be opened or read.
    Io { path: PathBuf, source: std::io::Error },
    /// The file was read but is not a decodable image.
    Decode { path: PathBuf, source: image::ImageError },
    /// The image decoded to zero pixels.
    Empty { path: PathBuf },
}

impl fmt::Display for EnvironmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvironmentError::Io { path, source } => {
                write!(f, "cannot read environment map {}: {source}", path.display())
            }
            EnvironmentError::Decode { path, source } => {
                write!(f, "cannot decode environment map {}: {source}", path.display())
            }
            EnvironmentError::Empty { path } => {
                write!(f, "environment map {} has no pixels", path.display())
            }
        }
    }
}

impl std::error::Error for EnvironmentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EnvironmentError::Io { source, .. } => Some(source),
            EnvironmentError::Decode { source, .. } => Some(source),
            EnvironmentError::Empty { .. } => None,
        }
    }
}
