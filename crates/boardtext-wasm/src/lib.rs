#![deny(warnings)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::indexing_slicing)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! `BoardText` WASM module — Gerber coordinate decoding, board extents and
//! silkscreen label recovery.

pub mod config;
pub mod error;
pub mod gerber;
pub mod layout;
pub mod pipeline;

use std::cell::RefCell;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::config::ParseOptions;
use crate::gerber::Unit;
use crate::layout::{BoardExtent, LabelDocument, TextLabel};
use crate::pipeline::{OutlineReport, SilkscreenReport};

thread_local! {
    static LAST_POSITIONS: RefCell<Vec<f64>> = const { RefCell::new(Vec::new()) };
    static LAST_LABELS: RefCell<Option<LabelDocument>> = const { RefCell::new(None) };
}

fn store_positions(positions: Vec<f64>) {
    LAST_POSITIONS.with(|p| {
        *p.borrow_mut() = positions;
    });
}

fn store_labels(doc: Option<LabelDocument>) {
    LAST_LABELS.with(|l| {
        *l.borrow_mut() = doc;
    });
}

/// Metadata returned to JavaScript for a parsed outline layer.
#[derive(Debug, Clone, Serialize)]
pub struct OutlineMeta {
    /// Board extent, `null` if the file had no coordinates.
    pub extent: Option<BoardExtent>,
    /// Number of decoded points.
    pub point_count: usize,
    /// Unit in effect at end of file.
    pub unit: Unit,
    /// Warning messages.
    pub warnings: Vec<String>,
}

/// Metadata returned to JavaScript for a parsed silkscreen layer.
#[derive(Debug, Clone, Serialize)]
pub struct SilkscreenMeta {
    /// Recovered labels, sorted by position.
    pub labels: Vec<TextLabel>,
    /// Number of decoded points.
    pub point_count: usize,
    /// Number of retained clusters.
    pub cluster_count: usize,
    /// Points dropped as noise.
    pub discarded_points: usize,
    /// Unit in effect at end of file.
    pub unit: Unit,
    /// Warning messages.
    pub warnings: Vec<String>,
}

/// Initialize the WASM module. Sets up the panic hook for debugging.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Reads a JS options object, falling back to `preset` for `undefined` or
/// `null`. A supplied object must carry its own `format`.
fn options_from_js(value: JsValue, preset: ParseOptions) -> Result<ParseOptions, JsValue> {
    let options: Option<ParseOptions> = serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("invalid parse options: {e}")))?;
    Ok(options.unwrap_or(preset))
}

/// Parse a board outline layer from raw bytes and compute its extent.
///
/// `options` is an optional `ParseOptions` object; without one the 2.2
/// outline preset is used. Returns `OutlineMeta` as a `JsValue` via
/// `serde-wasm-bindgen`. Decoded points are stored internally; retrieve them
/// with [`get_points`]. Any stored label document is cleared.
///
/// # Errors
///
/// Returns a descriptive error string if the parse options are malformed or
/// invalid.
#[wasm_bindgen]
pub fn parse_outline(data: &[u8], options: JsValue) -> Result<JsValue, JsValue> {
    let options = options_from_js(options, ParseOptions::outline())?;
    let meta = parse_outline_internal(data, &options).map_err(|e| JsValue::from_str(&e))?;
    serde_wasm_bindgen::to_value(&meta).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Internal outline logic shared between the wasm export and native tests.
#[doc(hidden)]
pub fn parse_outline_internal(data: &[u8], options: &ParseOptions) -> Result<OutlineMeta, String> {
    let report = OutlineReport::from_bytes(data, options).map_err(|e| e.to_string())?;

    let meta = OutlineMeta {
        extent: report.extent,
        point_count: report.stream.points.len(),
        unit: report.stream.final_unit,
        warnings: report.stream.warnings.clone(),
    };

    store_labels(None);
    store_positions(report.stream.positions());

    Ok(meta)
}

/// Parse a silkscreen layer from raw bytes and recover label positions.
///
/// `file_name` is recorded in the label document. `names` is an optional
/// array of designator strings assigned to the sorted labels by position.
/// `options` is an optional `ParseOptions` object; without one the 2.5
/// silkscreen preset is used. Returns `SilkscreenMeta` as a `JsValue`. The
/// label document is stored internally; retrieve it with [`get_label_json`].
///
/// # Errors
///
/// Returns a descriptive error string if `names` is not an array of strings,
/// or the parse options are malformed or invalid.
#[wasm_bindgen]
pub fn parse_silkscreen(
    data: &[u8],
    file_name: &str,
    names: JsValue,
    options: JsValue,
) -> Result<JsValue, JsValue> {
    let names: Option<Vec<String>> = serde_wasm_bindgen::from_value(names)
        .map_err(|e| JsValue::from_str(&format!("invalid designator list: {e}")))?;
    let options = options_from_js(options, ParseOptions::silkscreen())?;
    let meta = parse_silkscreen_internal(data, file_name, &options, names.as_deref())
        .map_err(|e| JsValue::from_str(&e))?;
    serde_wasm_bindgen::to_value(&meta).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Internal silkscreen logic shared between the wasm export and native tests.
#[doc(hidden)]
pub fn parse_silkscreen_internal(
    data: &[u8],
    file_name: &str,
    options: &ParseOptions,
    names: Option<&[String]>,
) -> Result<SilkscreenMeta, String> {
    let mut report = SilkscreenReport::from_bytes(data, options).map_err(|e| e.to_string())?;
    if let Some(names) = names {
        report.apply_names(names);
    }

    let meta = SilkscreenMeta {
        labels: report.labels.clone(),
        point_count: report.stream.points.len(),
        cluster_count: report.outcome.clusters.len(),
        discarded_points: report.outcome.discarded_points,
        unit: report.stream.final_unit,
        warnings: report.stream.warnings.clone(),
    };

    store_labels(Some(report.document(file_name)));
    store_positions(report.stream.positions());

    Ok(meta)
}

/// Retrieve the decoded points of the last parsed layer.
///
/// Returns a copy of the interleaved `[x0, y0, x1, y1, ...]` millimeter
/// positions. Returns an empty array if no layer has been parsed yet.
#[wasm_bindgen]
pub fn get_points() -> Vec<f64> {
    LAST_POSITIONS.with(|p| p.borrow().clone())
}

/// Retrieve the label document of the last parsed layer as JSON.
///
/// Returns an empty string if nothing has been parsed yet or the last layer
/// was an outline.
///
/// # Errors
///
/// Returns a descriptive error string if serialization fails.
#[wasm_bindgen]
pub fn get_label_json() -> Result<String, JsValue> {
    LAST_LABELS.with(|l| {
        l.borrow().as_ref().map_or_else(
            || Ok(String::new()),
            |doc| doc.to_json_string().map_err(|e| JsValue::from_str(&e.to_string())),
        )
    })
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;

    const SILK: &[u8] = b"%MOMM*%\n%FSLAX22Y22*%\nX00100Y00100D02*\nX00150Y00120D01*\nX00200Y00110D01*\n";

    fn reset() {
        store_positions(Vec::new());
        store_labels(None);
    }

    #[test]
    fn outline_meta_reports_extent() {
        let data = b"%MOMM*%\nX0Y0D02*\nX1000Y0D01*\nX1000Y500D01*\nX0Y500D01*\n";
        let result = parse_outline_internal(data, &ParseOptions::outline());
        assert!(
            result.is_ok(),
            "expected Ok, got Err: {:?}",
            result.as_ref().err()
        );
        let Some(meta) = result.ok() else {
            return;
        };
        assert_eq!(meta.point_count, 4);
        assert_eq!(meta.unit, Unit::Millimeter);
        assert!(meta
            .extent
            .is_some_and(|e| (e.width - 10.0).abs() < 1e-9 && (e.height - 5.0).abs() < 1e-9));
        assert_eq!(get_points().len(), 8);
    }

    #[test]
    fn outline_without_coordinates_is_not_an_error() {
        let result = parse_outline_internal(b"G04 empty*\nM02*\n", &ParseOptions::outline());
        assert!(result.is_ok_and(|meta| meta.extent.is_none() && meta.point_count == 0));
    }

    #[test]
    fn silkscreen_meta_with_names() {
        let names = vec!["R1".to_string()];
        let result = parse_silkscreen_internal(
            SILK,
            "board.GTO",
            &ParseOptions::silkscreen(),
            Some(names.as_slice()),
        );
        assert!(
            result.is_ok(),
            "expected Ok, got Err: {:?}",
            result.as_ref().err()
        );
        let Some(meta) = result.ok() else {
            return;
        };
        assert_eq!(meta.cluster_count, 1);
        assert_eq!(meta.labels[0].text, "R1");
        assert_eq!(meta.discarded_points, 0);
        assert!(get_label_json().is_ok_and(|json| json.contains("\"R1\"")));
    }

    #[test]
    fn label_document_records_file_name() {
        let result = parse_silkscreen_internal(SILK, "top.GTO", &ParseOptions::silkscreen(), None);
        assert!(result.is_ok());
        let json = get_label_json().unwrap_or_default();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap_or_default();
        assert_eq!(value["file"], "top.GTO");
    }

    #[test]
    fn outline_parse_clears_previous_labels() {
        let silk = parse_silkscreen_internal(SILK, "top.GTO", &ParseOptions::silkscreen(), None);
        assert!(silk.is_ok());
        assert!(get_label_json().is_ok_and(|json| !json.is_empty()));

        let outline = parse_outline_internal(
            b"%MOMM*%\nX0Y0D02*\nX1000Y0D01*\n",
            &ParseOptions::outline(),
        );
        assert!(outline.is_ok());
        assert_eq!(get_points().len(), 4);
        assert!(
            get_label_json().is_ok_and(|json| json.is_empty()),
            "outline parse must not leave silkscreen labels behind"
        );
    }

    #[test]
    fn buffers_empty_without_parse() {
        reset();
        assert!(get_points().is_empty(), "no parse yet => empty points");
        assert!(
            get_label_json().is_ok_and(|json| json.is_empty()),
            "no parse yet => empty label json"
        );
    }

    #[test]
    fn invalid_options_surface_as_error_string() {
        let options = ParseOptions {
            min_cluster_size: 0,
            ..ParseOptions::silkscreen()
        };
        let result = parse_silkscreen_internal(SILK, "board.GTO", &options, None);
        assert!(result.is_err_and(|e| e.contains("invalid options")));
    }
}
