use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum StrataError {
    /// A voxel coordinate fell outside `[0, size)` on some axis.
    Bounds(String),
    /// An operation was invoked before its inputs were ready, e.g. culling
    /// a chunk that is missing a loaded neighbor.
    Precondition(String),
    /// Stored state disagrees with itself, e.g. an occupancy bit set for a
    /// voxel that resolves to air. Indicates a prior bug, not bad input.
    Consistency(String),
    /// A wire payload is structurally malformed.
    Decode(String),
    IoError(std::io::Error),
}

impl StrataError {
    pub fn bounds(x: usize, y: usize, z: usize, dims: crate::types::ChunkDims) -> Self {
        StrataError::Bounds(format!(
            "({}, {}, {}) outside {}x{}x{} chunk",
            x, y, z, dims.x, dims.y, dims.z
        ))
    }
}

impl fmt::Display for StrataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrataError::Bounds(msg) => write!(f, "Bounds error: {}", msg),
            StrataError::Precondition(msg) => write!(f, "Precondition failed: {}", msg),
            StrataError::Consistency(msg) => write!(f, "Consistency violation: {}", msg),
            StrataError::Decode(msg) => write!(f, "Decode error: {}", msg),
            StrataError::IoError(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl Error for StrataError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StrataError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StrataError {
    fn from(err: std::io::Error) -> Self {
        StrataError::IoError(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChunkDims;
    use assert_matches::assert_matches;

    #[test]
    fn test_display_formats() {
        let err = StrataError::Precondition("neighbor missing".to_owned());
        assert_eq!(format!("{}", err), "Precondition failed: neighbor missing");

        let err = StrataError::Decode("short frame".to_owned());
        assert_eq!(format!("{}", err), "Decode error: short frame");
    }

    #[test]
    fn test_bounds_helper_mentions_coordinates() {
        let err = StrataError::bounds(16, 0, 3, ChunkDims::DEFAULT);
        assert_matches!(&err, StrataError::Bounds(msg) if msg.contains("(16, 0, 3)"));
    }

    #[test]
    fn test_io_error_source() {
        use std::error::Error;

        let err: StrataError =
            std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof").into();
        assert_matches!(err, StrataError::IoError(_));
        assert!(err.source().is_some());
    }
}
