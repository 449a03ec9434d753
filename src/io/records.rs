//! CSV record table for classified tiles
//!
//! Columns are written in a fixed order with a header row. Reading locates
//! columns by header name and never fails on cell content: every cell that
//! cannot be used is replaced by a default and reported as a
//! [`MalformedRecordRow`], so map reconstruction can go ahead on partially
//! corrupt tables.

use crate::io::configuration::NEUTRAL_GRAY;
use crate::io::error::{MapError, Result, io_error};
use crate::spatial::tiles::{BlankReason, FailureKind, Rgb, TileOutcome, TileRecord};
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Column names in write order
pub const COLUMNS: [&str; 12] = [
    "filename", "blank", "cx", "cy", "r", "g", "b", "area", "mean_gray", "std_gray", "error",
    "reason",
];

#[derive(Serialize)]
struct RecordRow<'a> {
    filename: &'a str,
    blank: bool,
    cx: Option<u32>,
    cy: Option<u32>,
    r: u8,
    g: u8,
    b: u8,
    area: u64,
    mean_gray: f64,
    std_gray: f64,
    error: &'a str,
    reason: &'a str,
}

impl<'a> From<&'a TileRecord> for RecordRow<'a> {
    fn from(record: &'a TileRecord) -> Self {
        let centroid = record.centroid();
        Self {
            filename: &record.filename,
            blank: record.is_blank(),
            cx: centroid.map(|c| c[0]),
            cy: centroid.map(|c| c[1]),
            r: record.color[0],
            g: record.color[1],
            b: record.color[2],
            area: record.area(),
            mean_gray: record.mean_intensity,
            std_gray: record.std_intensity,
            error: record.error().map_or("", FailureKind::tag),
            reason: record.blank_reason().map_or("", BlankReason::tag),
        }
    }
}

/// A table cell that had to be replaced while reading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRecordRow {
    /// 1-based data row number (the header is row 0)
    pub row: usize,
    /// Column that was affected
    pub field: &'static str,
    /// Offending cell content
    pub value: String,
}

impl fmt::Display for MalformedRecordRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "row {}: unusable {} value '{}'",
            self.row, self.field, self.value
        )
    }
}

/// Records read from a table plus the substitutions made along the way
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    /// Records in table order
    pub records: Vec<TileRecord>,
    /// Cells that were replaced by defaults
    pub defects: Vec<MalformedRecordRow>,
}

/// Write records to any writer
///
/// # Errors
///
/// Returns an error if serialization or the underlying writer fails
pub fn write_records<W: std::io::Write>(writer: W, records: &[TileRecord]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    if records.is_empty() {
        csv_writer.write_record(COLUMNS)?;
    }
    for record in records {
        csv_writer.serialize(RecordRow::from(record))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write records to a CSV file, creating parent directories
///
/// # Errors
///
/// Returns an error if the directory or file cannot be created or written
pub fn save_records(path: &Path, records: &[TileRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| io_error(parent, "create directory", e))?;
    }
    let file = std::fs::File::create(path).map_err(|e| io_error(path, "create file", e))?;
    write_records(file, records).map_err(|e| match e {
        MapError::RecordStore { source, .. } => MapError::RecordStore {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;
    log::info!("Saved {} records to {}", records.len(), path.display());
    Ok(())
}

/// Read records from any reader
///
/// # Errors
///
/// Returns an error only if the header row cannot be read
pub fn read_records<R: std::io::Read>(reader: R) -> Result<RecordSet> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let columns = ColumnIndex::new(&headers);

    let mut set = RecordSet::default();
    for (index, result) in csv_reader.records().enumerate() {
        let row = index + 1;
        match result {
            Ok(fields) => {
                let mut parser = RowParser {
                    row,
                    fields: &fields,
                    columns: &columns,
                    defects: &mut set.defects,
                };
                set.records.push(parser.parse());
            }
            Err(err) => set.defects.push(MalformedRecordRow {
                row,
                field: "row",
                value: err.to_string(),
            }),
        }
    }

    for defect in &set.defects {
        log::warn!("Record table {defect}");
    }
    Ok(set)
}

/// Read records from a CSV file
///
/// # Errors
///
/// Returns an error if the file cannot be opened or its header is unreadable
pub fn load_records(path: &Path) -> Result<RecordSet> {
    let file = std::fs::File::open(path).map_err(|e| io_error(path, "open file", e))?;
    read_records(file).map_err(|e| match e {
        MapError::RecordStore { source, .. } => MapError::RecordStore {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })
}

/// Position of each known column in the header, matched case-insensitively
struct ColumnIndex {
    positions: [Option<usize>; COLUMNS.len()],
    filename_alias: Option<usize>,
}

impl ColumnIndex {
    fn new(headers: &csv::StringRecord) -> Self {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        Self {
            positions: COLUMNS.map(find),
            filename_alias: find("file"),
        }
    }

    fn get(&self, name: &str) -> Option<usize> {
        let slot = COLUMNS.iter().position(|&c| c == name)?;
        let position = self.positions.get(slot).copied().flatten();
        if name == "filename" {
            position.or(self.filename_alias)
        } else {
            position
        }
    }
}

struct RowParser<'a> {
    row: usize,
    fields: &'a csv::StringRecord,
    columns: &'a ColumnIndex,
    defects: &'a mut Vec<MalformedRecordRow>,
}

impl RowParser<'_> {
    /// Cell content as written
    fn raw_cell(&self, name: &str) -> &str {
        self.columns
            .get(name)
            .and_then(|i| self.fields.get(i))
            .unwrap_or("")
    }

    /// Cell content with surrounding whitespace removed, for parsed values
    fn cell(&self, name: &str) -> &str {
        self.raw_cell(name).trim()
    }

    fn defect(&mut self, field: &'static str, value: &str) {
        self.defects.push(MalformedRecordRow {
            row: self.row,
            field,
            value: value.to_string(),
        });
    }

    /// Parse an optional tile-local coordinate; empty and `None` cells are absent
    ///
    /// Values that cannot be offset on a 32-bit canvas are defects.
    fn optional_coordinate(&mut self, field: &'static str) -> Option<u32> {
        let text = self.cell(field).to_string();
        if is_absent(&text) {
            return None;
        }
        let parsed = parse_whole(&text)
            .filter(|&v| i32::try_from(v).is_ok())
            .and_then(|v| u32::try_from(v).ok());
        if parsed.is_none() {
            self.defect(field, &text);
        }
        parsed
    }

    fn channel(&mut self, field: &'static str) -> u8 {
        let text = self.cell(field).to_string();
        match parse_whole(&text).and_then(|v| u8::try_from(v).ok()) {
            Some(value) => value,
            None => {
                self.defect(field, &text);
                NEUTRAL_GRAY
            }
        }
    }

    fn number(&mut self, field: &'static str) -> f64 {
        let text = self.cell(field).to_string();
        if is_absent(&text) {
            return 0.0;
        }
        match text.parse::<f64>() {
            Ok(value) if value.is_finite() => value,
            _ => {
                self.defect(field, &text);
                0.0
            }
        }
    }

    fn parse(&mut self) -> TileRecord {
        let filename = self.raw_cell("filename").to_string();
        if filename.trim().is_empty() {
            self.defect("filename", "");
        }

        let blank = is_truthy(self.cell("blank"));
        let cx = self.optional_coordinate("cx");
        let cy = self.optional_coordinate("cy");
        let color: Rgb = [self.channel("r"), self.channel("g"), self.channel("b")];
        let area_text = self.cell("area").to_string();
        // Older tables store contour areas as fractional polygon areas
        let area = if is_absent(&area_text) {
            0
        } else {
            match area_text.parse::<f64>() {
                Ok(value) if value.is_finite() && value >= 0.0 => value.round() as u64,
                _ => {
                    self.defect("area", &area_text);
                    0
                }
            }
        };
        let mean_intensity = self.number("mean_gray");
        let std_intensity = self.number("std_gray");
        let error = self.raw_cell("error").to_string();
        let reason = BlankReason::from_tag(self.cell("reason"));

        let outcome = if !is_absent(error.trim()) {
            TileOutcome::Failed {
                kind: FailureKind::from_tag(&error),
            }
        } else if blank {
            TileOutcome::Blank { reason }
        } else if let (Some(x), Some(y)) = (cx, cy) {
            TileOutcome::Found {
                centroid: [x, y],
                area,
            }
        } else {
            self.defect("centroid", &format!("{cx:?},{cy:?}"));
            TileOutcome::Blank {
                reason: BlankReason::Unrecorded,
            }
        };

        TileRecord {
            filename,
            outcome,
            color,
            mean_intensity,
            std_intensity,
        }
    }
}

fn is_absent(text: &str) -> bool {
    text.is_empty() || text.eq_ignore_ascii_case("none")
}

/// Boolean cell: `true`, `1` and `yes` (any case) are true
pub fn is_truthy(text: &str) -> bool {
    matches!(
        text.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes"
    )
}

/// Whole number cell, also accepting integral decimals such as `12.0`
fn parse_whole(text: &str) -> Option<u64> {
    text.parse::<u64>().ok().or_else(|| {
        text.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0 && v.fract() == 0.0 && *v <= u64::MAX as f64)
            .map(|v| v as u64)
    })
}
