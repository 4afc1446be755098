//! Line tokenizer for the Gerber subset this crate understands.
//!
//! Recognizes `%MO` unit directives, `%FS` format directives and
//! `X<digits>Y<digits>D<nn>` coordinate tokens. Everything else on a line is
//! skipped without complaint.

use super::types::{CoordinateFormat, Unit};

const UNIT_INCH_MARKER: &str = "%MOIN";
const UNIT_MM_MARKER: &str = "%MOMM";
const FORMAT_MARKER: &str = "%FS";

/// One coordinate token as it appeared in the file, digits still encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinateToken {
    /// Digits following `X`.
    pub x_digits: String,
    /// Digits following `Y`.
    pub y_digits: String,
    /// The two digits following `D`.
    pub code: String,
}

/// Event produced while scanning a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// A `%MOIN` / `%MOMM` directive.
    Unit(Unit),
    /// A well-formed `%FS` directive.
    Format(CoordinateFormat),
    /// A coordinate token.
    Coordinate(CoordinateToken),
}

/// Scans one line and returns its events in order: unit, format, then every
/// coordinate token from left to right.
///
/// Blank lines yield nothing. A `%FS` line whose digit groups do not match
/// yields no format event.
pub fn scan_line(raw: &str) -> Vec<ScanEvent> {
    let line = raw.trim();
    if line.is_empty() {
        return Vec::new();
    }

    let mut events = Vec::new();

    if line.starts_with(UNIT_INCH_MARKER) {
        events.push(ScanEvent::Unit(Unit::Inch));
    } else if line.starts_with(UNIT_MM_MARKER) {
        events.push(ScanEvent::Unit(Unit::Millimeter));
    }

    if is_format_directive(line) {
        if let Some(format) = parse_format(line) {
            events.push(ScanEvent::Format(format));
        } else {
            tracing::debug!(line, "ignoring malformed format directive");
        }
    }

    events.extend(coordinate_tokens(line).into_iter().map(ScanEvent::Coordinate));
    events
}

/// Scans every line in order.
pub fn scan_lines<'a, I>(lines: I) -> impl Iterator<Item = ScanEvent> + 'a
where
    I: IntoIterator<Item = &'a str>,
    I::IntoIter: 'a,
{
    lines.into_iter().flat_map(scan_line)
}

/// Returns `true` if the trimmed line starts with the format marker,
/// regardless of whether its digit groups are valid.
pub fn is_format_directive(line: &str) -> bool {
    line.trim_start().starts_with(FORMAT_MARKER)
}

/// Parses `%FS<L|T><A|I>X<d><d>Y<d><d>`.
fn parse_format(line: &str) -> Option<CoordinateFormat> {
    let rest = line.strip_prefix(FORMAT_MARKER)?;
    let mut bytes = rest.bytes();

    if !matches!(bytes.next()?, b'L' | b'T') {
        return None;
    }
    if !matches!(bytes.next()?, b'A' | b'I') {
        return None;
    }
    if bytes.next()? != b'X' {
        return None;
    }
    let x_integer = single_digit(bytes.next()?)?;
    let x_decimal = single_digit(bytes.next()?)?;
    if bytes.next()? != b'Y' {
        return None;
    }
    let y_integer = single_digit(bytes.next()?)?;
    let y_decimal = single_digit(bytes.next()?)?;

    Some(CoordinateFormat {
        x_integer,
        x_decimal,
        y_integer,
        y_decimal,
    })
}

fn single_digit(byte: u8) -> Option<u8> {
    byte.is_ascii_digit().then(|| byte - b'0')
}

/// Finds all non-overlapping coordinate tokens, leftmost first.
fn coordinate_tokens(line: &str) -> Vec<CoordinateToken> {
    let bytes = line.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        if let Some((token, end)) = match_token(line, pos) {
            tokens.push(token);
            pos = end;
        } else {
            pos += 1;
        }
    }

    tokens
}

/// Tries to match a full token starting exactly at `start`. Returns the token
/// and the byte offset just past it.
fn match_token(line: &str, start: usize) -> Option<(CoordinateToken, usize)> {
    let bytes = line.as_bytes();
    let mut cursor = start;

    expect_byte(bytes, &mut cursor, b'X')?;
    let x_digits = digit_run(line, &mut cursor)?;
    expect_byte(bytes, &mut cursor, b'Y')?;
    let y_digits = digit_run(line, &mut cursor)?;
    expect_byte(bytes, &mut cursor, b'D')?;

    let code_end = cursor + 2;
    let code = line.get(cursor..code_end)?;
    if !code.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    Some((
        CoordinateToken {
            x_digits: x_digits.to_string(),
            y_digits: y_digits.to_string(),
            code: code.to_string(),
        },
        code_end,
    ))
}

fn expect_byte(bytes: &[u8], cursor: &mut usize, expected: u8) -> Option<()> {
    if bytes.get(*cursor) == Some(&expected) {
        *cursor += 1;
        Some(())
    } else {
        None
    }
}

/// Consumes one or more ASCII digits.
fn digit_run<'a>(line: &'a str, cursor: &mut usize) -> Option<&'a str> {
    let start = *cursor;
    let len = line
        .as_bytes()
        .get(start..)?
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if len == 0 {
        return None;
    }
    *cursor = start + len;
    line.get(start..*cursor)
}
