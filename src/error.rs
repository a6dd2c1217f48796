use core::fmt;

/// Axis of a shape dimension, used to report which input was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Width,
    Height,
    Depth,
}

/// Error returned by the checked shape constructors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeError {
    /// A dimension was zero or negative.
    NonPositiveDimension { axis: Axis, value: f32 },
    /// The density was zero or negative.
    NonPositiveDensity(f32),
    /// An input, or the mass or inertia derived from valid inputs, was NaN or infinite.
    NonFinite,
    /// Valid inputs whose derived mass underflowed to zero.
    DegenerateMass(f32),
    /// A principal moment of inertia, or its inverse, underflowed to zero.
    DegenerateInertia,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::Width => "width",
            Axis::Height => "height",
            Axis::Depth => "depth",
        };
        f.write_str(name)
    }
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeError::NonPositiveDimension { axis, value } => {
                write!(f, "{} must be positive, got {}", axis, value)
            }
            ShapeError::NonPositiveDensity(value) => {
                write!(f, "density must be positive, got {}", value)
            }
            ShapeError::NonFinite => f.write_str("shape parameters must be finite"),
            ShapeError::DegenerateMass(mass) => {
                write!(f, "derived mass must be positive, got {}", mass)
            }
            ShapeError::DegenerateInertia => f.write_str("derived inertia tensor is singular"),
        }
    }
}
