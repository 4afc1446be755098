//! Drives the scanner and decoder over a whole file.

use super::decoder::decode;
use super::scanner::{is_format_directive, scan_line, ScanEvent};
use super::types::{CoordinateFormat, DecodeState, DecodedPoint, DrawCommand, Unit};

/// Ordered decoded points of one file plus parse diagnostics.
#[derive(Debug, Clone)]
pub struct PointStream {
    /// Points in file order.
    pub points: Vec<DecodedPoint>,
    /// Unit in effect at end of file.
    pub final_unit: Unit,
    /// Format in effect at end of file.
    pub final_format: CoordinateFormat,
    /// Non-empty lines scanned.
    pub line_count: usize,
    /// Unit and format directives applied.
    pub directive_count: usize,
    /// Parser warnings encountered while processing the file.
    pub warnings: Vec<String>,
}

impl PointStream {
    /// Returns `true` if no coordinate was decoded.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Flattened `[x0, y0, x1, y1, ...]` positions.
    pub fn positions(&self) -> Vec<f64> {
        let mut flat = Vec::with_capacity(self.points.len() * 2);
        for point in &self.points {
            flat.push(point.x_mm);
            flat.push(point.y_mm);
        }
        flat
    }
}

/// Decodes every coordinate token of `text`, starting from `format`.
///
/// Each coordinate is decoded with the unit and format active on its own
/// line; later directives never rescale earlier points.
pub fn parse_points(text: &str, format: CoordinateFormat) -> PointStream {
    let mut state = DecodeState::new(format);
    let mut stream = PointStream {
        points: Vec::new(),
        final_unit: state.unit,
        final_format: state.format,
        line_count: 0,
        directive_count: 0,
        warnings: Vec::new(),
    };

    for (index, line) in text.lines().enumerate() {
        let events = scan_line(line);
        if !line.trim().is_empty() {
            stream.line_count += 1;
        }

        let mut saw_format = false;
        for event in events {
            match event {
                ScanEvent::Unit(unit) => {
                    tracing::debug!(line = index + 1, %unit, "unit directive");
                    state.unit = unit;
                    stream.directive_count += 1;
                }
                ScanEvent::Format(new_format) => {
                    tracing::debug!(
                        line = index + 1,
                        x_decimal = new_format.x_decimal,
                        y_decimal = new_format.y_decimal,
                        "format directive"
                    );
                    state.format = new_format;
                    saw_format = true;
                    stream.directive_count += 1;
                }
                ScanEvent::Coordinate(token) => {
                    stream.points.push(DecodedPoint {
                        x_mm: decode(
                            &token.x_digits,
                            u32::from(state.format.x_decimal),
                            state.unit,
                        ),
                        y_mm: decode(
                            &token.y_digits,
                            u32::from(state.format.y_decimal),
                            state.unit,
                        ),
                        command: DrawCommand::from_code(&token.code),
                    });
                }
            }
        }

        if is_format_directive(line) && !saw_format {
            stream.warnings.push(format!(
                "line {}: malformed format directive `{}` ignored",
                index + 1,
                line.trim()
            ));
        }
    }

    if stream.points.is_empty() {
        stream
            .warnings
            .push("no coordinates found in file".to_string());
    }

    tracing::debug!(
        points = stream.points.len(),
        lines = stream.line_count,
        "decoded point stream"
    );

    stream.final_unit = state.unit;
    stream.final_format = state.format;
    stream
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn scenario_points_decode_in_millimeters() {
        let text = "%MOMM*%\nX00100Y00100D02*\nX00150Y00120D01*\nX00200Y00110D01*\n";
        let stream = parse_points(text, CoordinateFormat::uniform(2, 2));
        assert_eq!(stream.points.len(), 3);
        let expected = [(1.0, 1.0), (1.5, 1.2), (2.0, 1.1)];
        for (point, (x, y)) in stream.points.iter().zip(expected) {
            assert!((point.x_mm - x).abs() < EPSILON);
            assert!((point.y_mm - y).abs() < EPSILON);
        }
        assert_eq!(stream.points[0].command, DrawCommand::Move);
        assert_eq!(stream.points[1].command, DrawCommand::Draw);
        assert!(stream.warnings.is_empty());
    }

    #[test]
    fn default_unit_is_inch() {
        let stream = parse_points("X100Y200D03*", CoordinateFormat::uniform(2, 2));
        assert!((stream.points[0].x_mm - 25.4).abs() < EPSILON);
        assert!((stream.points[0].y_mm - 50.8).abs() < EPSILON);
        assert_eq!(stream.points[0].command, DrawCommand::Flash);
    }

    #[test]
    fn directives_are_sticky_and_not_retroactive() {
        let text = "X100Y100D02*\n%MOMM*%\nX100Y100D01*\n%FSLAX23Y23*%\nX100Y100D01*\n";
        let stream = parse_points(text, CoordinateFormat::uniform(2, 2));
        assert_eq!(stream.points.len(), 3);
        assert!((stream.points[0].x_mm - 25.4).abs() < EPSILON);
        assert!((stream.points[1].x_mm - 1.0).abs() < EPSILON);
        assert!((stream.points[2].x_mm - 0.1).abs() < EPSILON);
        assert_eq!(stream.final_unit, Unit::Millimeter);
        assert_eq!(stream.final_format, CoordinateFormat::uniform(2, 3));
        assert_eq!(stream.directive_count, 2);
    }

    #[test]
    fn axes_use_their_own_decimal_counts() {
        let text = "%MOMM*%\n%FSLAX21Y23*%\nX100Y100D01*\n";
        let stream = parse_points(text, CoordinateFormat::outline());
        assert!((stream.points[0].x_mm - 10.0).abs() < EPSILON);
        assert!((stream.points[0].y_mm - 0.1).abs() < EPSILON);
    }

    #[test]
    fn malformed_format_keeps_previous_state_and_warns() {
        let text = "%MOMM*%\n%FSLAX2Y2*%\nX100Y100D01*\n";
        let stream = parse_points(text, CoordinateFormat::uniform(2, 1));
        assert!((stream.points[0].x_mm - 10.0).abs() < EPSILON);
        assert_eq!(stream.warnings.len(), 1);
        assert!(stream.warnings[0].contains("malformed format directive"));
    }

    #[test]
    fn empty_text_warns_without_failing() {
        let stream = parse_points("", CoordinateFormat::outline());
        assert!(stream.is_empty());
        assert_eq!(stream.line_count, 0);
        assert!(stream
            .warnings
            .iter()
            .any(|w| w.contains("no coordinates found")));
    }

    #[test]
    fn unknown_codes_pass_through() {
        let stream = parse_points("X1Y1D54*", CoordinateFormat::outline());
        assert_eq!(stream.points[0].command, DrawCommand::Other("54".to_string()));
    }

    #[test]
    fn positions_are_interleaved() {
        let stream = parse_points("%MOMM*%\nX100Y200D01*X300Y400D01*", CoordinateFormat::outline());
        let positions = stream.positions();
        assert_eq!(positions.len(), 4);
        assert!((positions[0] - 1.0).abs() < EPSILON);
        assert!((positions[3] - 4.0).abs() < EPSILON);
    }
}
