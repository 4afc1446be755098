//! Decode state and the decoded point records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Coordinate unit declared by a `%MO` directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Unit {
    /// Inches (`%MOIN`). Gerber's historical default.
    #[default]
    Inch,
    /// Millimeters (`%MOMM`).
    Millimeter,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inch => f.write_str("INCH"),
            Self::Millimeter => f.write_str("MM"),
        }
    }
}

/// Fixed-point digit counts for X and Y coordinates, as declared by `%FS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinateFormat {
    /// Integer digits of X.
    pub x_integer: u8,
    /// Decimal digits of X.
    pub x_decimal: u8,
    /// Integer digits of Y.
    pub y_integer: u8,
    /// Decimal digits of Y.
    pub y_decimal: u8,
}

impl CoordinateFormat {
    /// Same `(integer, decimal)` digit counts on both axes.
    pub const fn uniform(integer: u8, decimal: u8) -> Self {
        Self {
            x_integer: integer,
            x_decimal: decimal,
            y_integer: integer,
            y_decimal: decimal,
        }
    }

    /// Starting format for board outline (keepout) layers: 2.2.
    pub const fn outline() -> Self {
        Self::uniform(2, 2)
    }

    /// Starting format for silkscreen layers: 2.5.
    pub const fn silkscreen() -> Self {
        Self::uniform(2, 5)
    }
}

/// Per-file interpreter state threaded through the scanner events.
///
/// One instance per parse. Directives overwrite fields in place and only
/// affect coordinates decoded afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeState {
    /// Active unit.
    pub unit: Unit,
    /// Active coordinate format.
    pub format: CoordinateFormat,
}

impl DecodeState {
    /// Creates a state in inch mode with the caller's starting format.
    pub const fn new(format: CoordinateFormat) -> Self {
        Self {
            unit: Unit::Inch,
            format,
        }
    }
}

/// Gerber D-code attached to a coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DrawCommand {
    /// `D01`: interpolate to the point with the aperture on.
    Draw,
    /// `D02`: move to the point with the aperture off.
    Move,
    /// `D03`: flash the aperture at the point.
    Flash,
    /// Any other two-digit code, kept verbatim.
    Other(String),
}

impl DrawCommand {
    /// Maps the two code digits following `D`.
    pub fn from_code(code: &str) -> Self {
        match code {
            "01" => Self::Draw,
            "02" => Self::Move,
            "03" => Self::Flash,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for DrawCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draw => f.write_str("DRAW"),
            Self::Move => f.write_str("MOVE"),
            Self::Flash => f.write_str("FLASH"),
            Self::Other(code) => write!(f, "D{code}"),
        }
    }
}

/// A coordinate normalized to millimeters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedPoint {
    /// X in millimeters.
    pub x_mm: f64,
    /// Y in millimeters.
    pub y_mm: f64,
    /// D-code of the source token.
    pub command: DrawCommand,
}

impl DecodedPoint {
    /// Euclidean distance to another point in millimeters.
    pub fn distance_to(&self, other: &Self) -> f64 {
        (self.x_mm - other.x_mm).hypot(self.y_mm - other.y_mm)
    }
}
