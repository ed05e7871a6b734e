use std::fmt::{Debug, Display, Formatter};

// Error
//------------------------------------------------------------------------------

#[derive(Debug)]
pub enum QRError {
    // Invalid arguments
    EmptyData,
    InvalidECLevel,
    InvalidMaskPattern,

    // Payload doesn't fit version 40 at the requested ec level
    CapacityExceeded { required_bits: usize, capacity_bits: usize },

    // Static tables or placement traversal disagree
    InternalInconsistency(&'static str),

    // Raster encoding failure
    Render(image::ImageError),
}

impl Display for QRError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Self::EmptyData => f.write_str("Empty data"),
            Self::InvalidECLevel => f.write_str("Invalid error correction level"),
            Self::InvalidMaskPattern => f.write_str("Invalid masking pattern"),
            Self::CapacityExceeded { required_bits, capacity_bits } => write!(
                f,
                "Capacity exceeded: {required_bits} bits required, {capacity_bits} bits available"
            ),
            Self::InternalInconsistency(msg) => write!(f, "Internal inconsistency: {msg}"),
            Self::Render(err) => write!(f, "Render failed: {err}"),
        }
    }
}

impl std::error::Error for QRError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(err) => Some(err),
            _ => None,
        }
    }
}

impl From<image::ImageError> for QRError {
    fn from(err: image::ImageError) -> Self {
        Self::Render(err)
    }
}

impl PartialEq for QRError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::CapacityExceeded { required_bits: r1, capacity_bits: c1 },
                Self::CapacityExceeded { required_bits: r2, capacity_bits: c2 },
            ) => r1 == r2 && c1 == c2,
            (Self::InternalInconsistency(a), Self::InternalInconsistency(b)) => a == b,
            (Self::Render(_), Self::Render(_)) => false,
            (a, b) => std::mem::discriminant(a) == std::mem::discriminant(b),
        }
    }
}

pub type QRResult<T> = Result<T, QRError>;
