use std::borrow::Cow;
use std::path::Path;

use chardetng::EncodingDetector;
use csv::ReaderBuilder;
use encoding_rs::{Encoding, UTF_8, WINDOWS_1251};

use super::error::LoadError;
use super::model::{CellValue, Dataset, Row, KEY_COLUMN};

/// Number of leading bytes inspected by the encoding detector.
pub const DETECTION_PREFIX: usize = 10_000;

/// Field separator of every dataset file.
pub const DELIMITER: u8 = b';';

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a semicolon-delimited dataset of unknown encoding.
///
/// Pipeline:
/// 1. detect an encoding from the first [`DETECTION_PREFIX`] bytes
/// 2. decode with the first candidate that succeeds, see [`candidates`]
/// 3. parse, trimming column names and `Name` values
/// 4. flag a missing `Name` column on the returned dataset (non-fatal)
pub fn load_dataset(path: &Path) -> Result<Dataset, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let detected = detect_encoding(&bytes);
    let (text, encoding) = decode_cascade(&bytes, detected).map_err(|tried| LoadError::Decode {
        path: path.to_path_buf(),
        tried,
    })?;

    let (columns, rows) = parse_table(&text).map_err(|source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    })?;

    let dataset = Dataset::new(path, encoding, columns, rows);
    match &dataset.schema_error {
        Some(err) => log::warn!("{err}"),
        None => log::info!(
            "Loaded {} ({}): {} rows, {} columns",
            path.display(),
            encoding.name(),
            dataset.len(),
            dataset.columns.len()
        ),
    }
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Encoding detection and decode cascade
// ---------------------------------------------------------------------------

/// Best-guess encoding from a bounded prefix of the raw content.
///
/// A byte-order mark wins outright; pure ASCII is reported as UTF-8.
pub fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    let prefix = &bytes[..bytes.len().min(DETECTION_PREFIX)];
    if let Some((encoding, _)) = Encoding::for_bom(prefix) {
        return encoding;
    }
    if prefix.is_ascii() {
        return UTF_8;
    }
    let mut detector = EncodingDetector::new();
    detector.feed(prefix, prefix.len() == bytes.len());
    detector.guess(None, true)
}

/// One entry of the ordered decode cascade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Candidate {
    Detected(&'static Encoding),
    Fallback(&'static Encoding),
}

impl Candidate {
    pub fn encoding(self) -> &'static Encoding {
        match self {
            Candidate::Detected(e) | Candidate::Fallback(e) => e,
        }
    }
}

/// Ordered candidates: the detected encoding, then UTF-8, then Windows-1251.
/// Encodings already present are not repeated.
pub fn candidates(detected: &'static Encoding) -> Vec<Candidate> {
    let mut out = vec![Candidate::Detected(detected)];
    for fallback in [UTF_8, WINDOWS_1251] {
        if out.iter().all(|c| c.encoding() != fallback) {
            out.push(Candidate::Fallback(fallback));
        }
    }
    out
}

/// Strict decode: malformed input yields `None` instead of U+FFFD.
/// A BOM belonging to `encoding` is stripped.
pub fn decode_strict(bytes: &[u8], encoding: &'static Encoding) -> Option<String> {
    let body = match Encoding::for_bom(bytes) {
        Some((bom_encoding, len)) if bom_encoding == encoding => &bytes[len..],
        _ => bytes,
    };
    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .map(Cow::into_owned)
}

/// Try every candidate in order; on total failure return the names tried.
fn decode_cascade(
    bytes: &[u8],
    detected: &'static Encoding,
) -> Result<(String, &'static Encoding), Vec<&'static str>> {
    let mut tried = Vec::new();
    for candidate in candidates(detected) {
        let encoding = candidate.encoding();
        match decode_strict(bytes, encoding) {
            Some(text) => {
                if let Candidate::Fallback(_) = candidate {
                    log::warn!(
                        "Detected encoding {} failed ({}), fell back to {}",
                        detected.name(),
                        tried.join(", "),
                        encoding.name()
                    );
                }
                return Ok((text, encoding));
            }
            None => {
                log::debug!("Decoding as {} failed", encoding.name());
                tried.push(encoding.name());
            }
        }
    }
    Err(tried)
}

// ---------------------------------------------------------------------------
// Delimited text → columns + rows
// ---------------------------------------------------------------------------

/// Parse decoded text. Column names are trimmed, `Name` values are trimmed,
/// short rows are padded with nulls and surplus fields are dropped.
fn parse_table(text: &str) -> Result<(Vec<String>, Vec<Row>), csv::Error> {
    let mut reader = ReaderBuilder::new()
        .delimiter(DELIMITER)
        .flexible(true)
        .from_reader(text.as_bytes());

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let key_idx = columns.iter().position(|c| c == KEY_COLUMN);

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        if record.len() > columns.len() {
            log::debug!(
                "Row {row_no}: {} fields for {} columns, extra fields ignored",
                record.len(),
                columns.len()
            );
        }

        let cells = (0..columns.len())
            .map(|idx| match record.get(idx) {
                Some(raw) if Some(idx) == key_idx => key_cell(raw),
                Some(raw) => CellValue::parse(raw),
                None => CellValue::Null,
            })
            .collect();
        rows.push(Row { cells });
    }

    Ok((columns, rows))
}

/// Key values are always text, trimmed.
fn key_cell(raw: &str) -> CellValue {
    let name = raw.trim();
    if name.is_empty() {
        CellValue::Null
    } else {
        CellValue::Text(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(bytes: &[u8]) -> NamedTempFile {
        let mut tmp = NamedTempFile::new().unwrap();
        tmp.write_all(bytes).unwrap();
        tmp.flush().unwrap();
        tmp
    }

    fn cp1251(text: &str) -> Vec<u8> {
        let (bytes, _, had_errors) = WINDOWS_1251.encode(text);
        assert!(!had_errors);
        bytes.into_owned()
    }

    #[test]
    fn loads_simple_table() {
        let tmp = write_temp(b"Name;2019;2020;2021\nMoscow;10;20;30\n");
        let ds = load_dataset(tmp.path()).unwrap();

        assert!(ds.schema_error.is_none());
        assert_eq!(ds.columns, vec!["Name", "2019", "2020", "2021"]);
        assert_eq!(ds.regions(), vec!["Moscow"]);

        let row = ds.find_region("Moscow").unwrap();
        assert_eq!(ds.value(row, 2019), Some(10.0));
        assert_eq!(ds.value(row, 2020), Some(20.0));
        assert_eq!(ds.value(row, 2021), Some(30.0));
    }

    #[test]
    fn trims_column_names_and_keys() {
        let tmp = write_temp(b" Name ; 2019 ;2020\n  Moscow  ;1;2\n");
        let ds = load_dataset(tmp.path()).unwrap();

        assert_eq!(ds.columns, vec!["Name", "2019", "2020"]);
        assert_eq!(ds.regions(), vec!["Moscow"]);
        let row = ds.find_region("Moscow").unwrap();
        assert_eq!(ds.value(row, 2019), Some(1.0));
    }

    #[test]
    fn pads_short_rows_and_reads_empty_cells_as_null() {
        let tmp = write_temp(b"Name;2019;2020\nA;1\nB;;5\n");
        let ds = load_dataset(tmp.path()).unwrap();

        let a = ds.find_region("A").unwrap();
        assert_eq!(a.cells.len(), 3);
        assert_eq!(ds.value(a, 2020), None);
        let b = ds.find_region("B").unwrap();
        assert_eq!(ds.value(b, 2019), None);
        assert_eq!(ds.value(b, 2020), Some(5.0));
    }

    #[test]
    fn windows_1251_cyrillic_decodes_through_cascade() {
        let regions = [
            "Москва",
            "Санкт-Петербург",
            "Новосибирская область",
            "Свердловская область",
            "Республика Татарстан",
            "Краснодарский край",
            "Нижегородская область",
            "Челябинская область",
        ];
        let mut text = String::from("Name;2019;2020;2021\n");
        for (i, region) in regions.iter().enumerate() {
            text.push_str(&format!("{region};{};{};{}\n", i * 10, i * 10 + 1, i * 10 + 2));
        }
        let bytes = cp1251(&text);
        assert!(std::str::from_utf8(&bytes).is_err());

        let tmp = write_temp(&bytes);
        let ds = load_dataset(tmp.path()).unwrap();

        assert_eq!(ds.encoding, WINDOWS_1251);
        assert_eq!(ds.regions(), regions.to_vec());
        let row = ds.find_region("Республика Татарстан").unwrap();
        assert_eq!(ds.value(row, 2021), Some(42.0));
    }

    #[test]
    fn utf8_with_bom_is_stripped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("Name;2020\nКазань;3\n".as_bytes());
        let tmp = write_temp(&bytes);
        let ds = load_dataset(tmp.path()).unwrap();

        assert_eq!(ds.encoding, UTF_8);
        assert_eq!(ds.columns[0], "Name");
        assert!(ds.schema_error.is_none());
        assert_eq!(ds.regions(), vec!["Казань"]);
    }

    #[test]
    fn missing_key_column_still_returns_table() {
        let tmp = write_temp(b"Region;2019\nMoscow;1\n");
        let ds = load_dataset(tmp.path()).unwrap();

        assert!(ds.schema_error.is_some());
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.columns, vec!["Region", "2019"]);
    }

    #[test]
    fn empty_file_has_no_columns() {
        let tmp = write_temp(b"");
        let ds = load_dataset(tmp.path()).unwrap();

        assert!(ds.columns.is_empty());
        assert_eq!(ds.len(), 0);
        assert!(ds.schema_error.is_some());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_dataset(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn detection_prefers_bom_then_ascii() {
        assert_eq!(detect_encoding(b"\xFF\xFEN\0"), encoding_rs::UTF_16LE);
        assert_eq!(detect_encoding(b"Name;2019\n"), UTF_8);
        assert_eq!(detect_encoding("Name;2019\nУфа;1\n".as_bytes()), UTF_8);
    }

    #[test]
    fn candidates_are_ordered_and_deduplicated() {
        assert_eq!(
            candidates(encoding_rs::KOI8_R),
            vec![
                Candidate::Detected(encoding_rs::KOI8_R),
                Candidate::Fallback(UTF_8),
                Candidate::Fallback(WINDOWS_1251),
            ]
        );
        assert_eq!(
            candidates(UTF_8),
            vec![
                Candidate::Detected(UTF_8),
                Candidate::Fallback(WINDOWS_1251),
            ]
        );
    }

    #[test]
    fn cascade_falls_back_when_detected_encoding_rejects_input() {
        let bytes = cp1251("Name;2019\nОмск;1\n");
        let (text, encoding) = decode_cascade(&bytes, UTF_8).unwrap();
        assert_eq!(encoding, WINDOWS_1251);
        assert!(text.contains("Омск"));
    }

    #[test]
    fn decode_error_names_every_encoding_tried() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("budget.csv");
        let tried: Vec<&'static str> = candidates(encoding_rs::UTF_16LE)
            .into_iter()
            .map(|c| c.encoding().name())
            .collect();
        let err = LoadError::Decode {
            path: path.clone(),
            tried,
        };
        assert_eq!(
            err.to_string(),
            format!(
                "could not decode {} (tried UTF-16LE, UTF-8, windows-1251)",
                path.display()
            )
        );
    }

    #[test]
    fn strict_decode_rejects_malformed_utf8() {
        assert_eq!(decode_strict(b"\xC3\x28", UTF_8), None);
        assert_eq!(decode_strict(b"ok", UTF_8).as_deref(), Some("ok"));
    }
}
