//! CSV table store.
//!
//! One file per table inside a directory:
//!
//! - `co2_intensity.csv`
//! - `generation_mix.csv`
//! - `netzero_alignment.csv`
//!
//! Reading is lenient in the same places the REST store is: header names are
//! matched case-insensitively, a BOM is ignored, and a row that cannot be
//! parsed is skipped and reported instead of failing the whole table. A file
//! that does not exist yet reads as an empty table.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::StringRecord;
use tracing::{info, warn};

use crate::config::StoreConfig;
use crate::data::{DatasetProvider, RecordSink};
use crate::domain::{
    AnnualTarget, CO2_COLUMNS, Co2IntensityRecord, GENERATION_COLUMNS, GenerationMixRecord, NETZERO_COLUMNS,
    NetZeroAlignmentRecord, RawGenerationRow, RawIntensityRow, RawTimestamp, SourceBreakdown,
};
use crate::error::AppError;
use crate::io::export::append_records;

pub const CO2_FILE: &str = "co2_intensity.csv";
pub const GENERATION_FILE: &str = "generation_mix.csv";
pub const NETZERO_FILE: &str = "netzero_alignment.csv";

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Parsed rows of one table plus the rows that were skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvTable<T> {
    pub rows: Vec<T>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

impl<T> Default for CsvTable<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            row_errors: Vec::new(),
            rows_read: 0,
        }
    }
}

impl<T> CsvTable<T> {
    /// Keep only the last `limit` rows, matching a "latest N" query.
    fn into_latest(self, limit: usize) -> Vec<T> {
        let mut rows = self.rows;
        let skip = rows.len().saturating_sub(limit);
        rows.drain(..skip);
        rows
    }
}

#[derive(Debug, Clone)]
pub struct CsvStore {
    dir: PathBuf,
}

impl CsvStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_config(store: &StoreConfig) -> Self {
        Self::new(&store.csv_dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    pub fn read_intensity(&self) -> Result<CsvTable<RawIntensityRow>, AppError> {
        self.read_table(CO2_FILE, read_intensity_rows)
    }

    pub fn read_generation(&self) -> Result<CsvTable<RawGenerationRow>, AppError> {
        self.read_table(GENERATION_FILE, read_generation_rows)
    }

    pub fn read_targets(&self) -> Result<CsvTable<AnnualTarget>, AppError> {
        self.read_table(NETZERO_FILE, read_target_rows)
    }

    fn read_table<T>(
        &self,
        file: &str,
        parse: fn(File) -> Result<CsvTable<T>, AppError>,
    ) -> Result<CsvTable<T>, AppError> {
        let path = self.path_for(file);
        let handle = match File::open(&path) {
            Ok(handle) => handle,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "table file not found; treating as empty");
                return Ok(CsvTable::default());
            }
            Err(e) => {
                return Err(AppError::runtime(format!("Failed to open CSV '{}': {e}", path.display())));
            }
        };

        let table = parse(handle).map_err(|e| AppError::new(e.exit_code(), format!("{}: {e}", path.display())))?;
        for err in &table.row_errors {
            warn!(path = %path.display(), line = err.line, "skipped row: {}", err.message);
        }
        info!(
            path = %path.display(),
            rows_read = table.rows_read,
            rows_used = table.rows.len(),
            "read table"
        );
        Ok(table)
    }

    fn existing_target_years(&self) -> Result<HashSet<i32>, AppError> {
        Ok(self.read_targets()?.rows.iter().map(|t| t.year).collect())
    }
}

impl DatasetProvider for CsvStore {
    fn fetch_intensity(&self, limit: usize) -> Result<Vec<RawIntensityRow>, AppError> {
        Ok(self.read_intensity()?.into_latest(limit))
    }

    fn fetch_generation(&self, limit: usize) -> Result<Vec<RawGenerationRow>, AppError> {
        Ok(self.read_generation()?.into_latest(limit))
    }

    fn fetch_targets(&self, limit: usize) -> Result<Vec<AnnualTarget>, AppError> {
        Ok(self.read_targets()?.into_latest(limit))
    }
}

impl RecordSink for CsvStore {
    fn write_co2(&self, records: &[Co2IntensityRecord]) -> Result<(), AppError> {
        append_records(&self.path_for(CO2_FILE), records, &CO2_COLUMNS).map(|_| ())
    }

    fn write_generation(&self, records: &[GenerationMixRecord]) -> Result<(), AppError> {
        append_records(&self.path_for(GENERATION_FILE), records, &GENERATION_COLUMNS).map(|_| ())
    }

    fn upsert_targets(&self, records: &[NetZeroAlignmentRecord]) -> Result<(), AppError> {
        let mut seen = self.existing_target_years()?;
        let fresh: Vec<&NetZeroAlignmentRecord> = records.iter().filter(|r| seen.insert(r.year)).collect();
        append_records(&self.path_for(NETZERO_FILE), &fresh, &NETZERO_COLUMNS).map(|_| ())
    }
}

pub fn read_intensity_rows<R: Read>(reader: R) -> Result<CsvTable<RawIntensityRow>, AppError> {
    read_rows(reader, &["timestamp"], |record, header_map| {
        Ok(RawIntensityRow {
            timestamp: parse_timestamp(get_required(record, header_map, "timestamp")?),
            intensity_g_per_kwh: parse_opt_f64(record, header_map, "co2_intensity_g_per_kwh")?,
        })
    })
}

pub fn read_generation_rows<R: Read>(reader: R) -> Result<CsvTable<RawGenerationRow>, AppError> {
    read_rows(reader, &["timestamp"], |record, header_map| {
        Ok(RawGenerationRow {
            timestamp: parse_timestamp(get_required(record, header_map, "timestamp")?),
            total_output_mw: parse_opt_f64(record, header_map, "total_mw")?,
            breakdown: SourceBreakdown {
                hydro_mw: parse_opt_f64(record, header_map, "hydro_mw")?,
                wind_mw: parse_opt_f64(record, header_map, "wind_mw")?,
                solar_mw: parse_opt_f64(record, header_map, "solar_mw")?,
                nuclear_mw: parse_opt_f64(record, header_map, "nuclear_mw")?,
                fossil_mw: parse_opt_f64(record, header_map, "fossil_mw")?,
            },
        })
    })
}

pub fn read_target_rows<R: Read>(reader: R) -> Result<CsvTable<AnnualTarget>, AppError> {
    read_rows(reader, &["year"], |record, header_map| {
        Ok(AnnualTarget {
            year: parse_year(get_required(record, header_map, "year")?)?,
            actual_emissions_mt: parse_opt_f64(record, header_map, "actual_emissions_mt")?,
            target_emissions_mt: parse_opt_f64(record, header_map, "target_emissions_mt")?,
            alignment_pct: parse_opt_f64(record, header_map, "alignment_pct")?,
        })
    })
}

fn read_rows<R, T, F>(reader: R, required: &[&str], parse_row: F) -> Result<CsvTable<T>, AppError>
where
    R: Read,
    F: Fn(&StringRecord, &HashMap<String, usize>) -> Result<T, String>,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| AppError::data(format!("Failed to read CSV headers: {e}")))?
        .clone();

    // An empty file has no header at all; treat it as an empty table.
    if headers.is_empty() {
        return Ok(CsvTable::default());
    }

    let header_map = build_header_map(&headers);
    for name in required {
        if !header_map.contains_key(*name) {
            return Err(AppError::data(format!("Missing required column: `{name}`")));
        }
    }

    let mut table = CsvTable::default();
    for (idx, result) in csv_reader.records().enumerate() {
        // +2: one for the header, one for 1-based lines.
        let line = idx + 2;
        table.rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                table.row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &header_map) {
            Ok(row) => table.rows.push(row),
            Err(message) => table.row_errors.push(RowError { line, message }),
        }
    }

    Ok(table)
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn get_optional<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

/// Absent or empty cells are `None`; text that is not a number is a row error.
///
/// Non-finite numbers are passed through so normalization can reject them.
fn parse_opt_f64(record: &StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Result<Option<f64>, String> {
    match get_optional(record, header_map, name) {
        None => Ok(None),
        Some(s) => s
            .parse::<f64>()
            .map(Some)
            .map_err(|_| format!("Invalid number '{s}' in `{name}`")),
    }
}

/// Numeric cells are epoch seconds; anything else is kept as text.
fn parse_timestamp(s: &str) -> RawTimestamp {
    match s.parse::<f64>() {
        Ok(secs) => RawTimestamp::Epoch(secs),
        Err(_) => RawTimestamp::Text(s.to_string()),
    }
}

fn parse_year(s: &str) -> Result<i32, String> {
    if let Ok(year) = s.parse::<i32>() {
        return Ok(year);
    }
    // Some exports write integer columns as floats ("2025.0").
    match s.parse::<f64>() {
        Ok(v) if v.fract() == 0.0 && v.abs() < f64::from(i32::MAX) => Ok(v as i32),
        _ => Err(format!("Invalid year '{s}'")),
    }
}
