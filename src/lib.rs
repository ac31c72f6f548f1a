use chrono::prelude::*;
use std::path::Path;
use tracing::debug;
pub mod error;
pub mod series;
pub mod summary;
pub mod xy;

pub use error::{ReadError, Result, RowError};
pub use series::Series;

pub const VERSION: Option<&str> = option_env!("CARGO_PKG_VERSION");

/// Format used when writing timestamps back out.
pub const DT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Accepted timestamp layouts, tried in order.
/// `%.f` also matches when the fractional seconds are absent.
pub const DT_INPUT_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// Date-only layouts, read as midnight when no datetime layout matches.
pub const DATE_INPUT_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Lines shorter than this (in characters) are blank or truncated and get skipped.
pub const MIN_LINE_LEN: usize = 20;

/// Lines starting with this are headers.
pub const HEADER_PREFIX: char = 'T';

const BOM: char = '\u{feff}';

/// One temperature and humidity sample, as exported by the device.
/// The temperature is kept in the export unit, usually Fahrenheit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    timestamp: NaiveDateTime,
    temperature: f64,
    humidity: f64,
}

impl Reading {
    pub fn new(timestamp: NaiveDateTime, temperature: f64, humidity: f64) -> Reading {
        Reading {
            timestamp,
            temperature,
            humidity,
        }
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// relative humidity [%]
    pub fn humidity(&self) -> f64 {
        self.humidity
    }
}

/// true for header lines and for blank or truncated lines,
/// which are dropped silently instead of failing the read
pub fn is_skipped(line: &str) -> bool {
    line.starts_with(HEADER_PREFIX) || line.chars().count() < MIN_LINE_LEN
}

/// Parses a timestamp field, trying each of the accepted layouts,
/// then the date-only ones at midnight.
pub fn parse_timestamp(field: &str) -> std::result::Result<NaiveDateTime, chrono::ParseError> {
    // keep the error of the first layout, it is the canonical one
    DT_INPUT_FORMATS[1..]
        .iter()
        .fold(
            NaiveDateTime::parse_from_str(field, DT_INPUT_FORMATS[0]),
            |res, fmt| res.or_else(|e| NaiveDateTime::parse_from_str(field, fmt).map_err(|_| e)),
        )
        .or_else(|e| {
            DATE_INPUT_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(field, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .ok_or(e)
        })
}

/// Splits text into lines ending at `\n`, `\r\n`, or a lone `\r`.
/// A terminator at the very end does not add an empty line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        match rest.find(|c: char| c == '\n' || c == '\r') {
            Some(i) => {
                lines.push(&rest[..i]);
                let end = if rest[i..].starts_with("\r\n") { i + 2 } else { i + 1 };
                rest = &rest[end..];
            }
            None => {
                lines.push(rest);
                rest = "";
            }
        }
    }
    lines
}

/// Parses a single data line: timestamp, temperature, humidity, and
/// any further fields ignored. Skip rules are not applied here.
pub fn parse_line(line: &str) -> std::result::Result<Reading, RowError> {
    let mut fields = line.split(',');
    let (ts, t, h) = match (fields.next(), fields.next(), fields.next()) {
        (Some(ts), Some(t), Some(h)) => (ts.trim(), t.trim(), h.trim()),
        _ => {
            return Err(RowError::MissingFields {
                found: line.split(',').count(),
            })
        }
    };
    let timestamp = parse_timestamp(ts).map_err(|e| RowError::Timestamp {
        field: ts.to_string(),
        source: e,
    })?;
    let temperature = t.parse::<f64>().map_err(|e| RowError::Temperature {
        field: t.to_string(),
        source: e,
    })?;
    let humidity = h.parse::<f64>().map_err(|e| RowError::Humidity {
        field: h.to_string(),
        source: e,
    })?;
    Ok(Reading::new(timestamp, temperature, humidity))
}

/// Parses the full text of an export.
/// Skips headers and short lines, fails on the first malformed row,
/// and keeps the readings in line order.
pub fn parse_readings(text: &str) -> Result<Vec<Reading>> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let mut readings: Vec<Reading> = Vec::new();
    let mut skipped = 0usize;
    let mut nlines = 0usize;
    for (i, line) in split_lines(text).into_iter().enumerate() {
        nlines += 1;
        if is_skipped(line) {
            skipped += 1;
            continue;
        }
        let reading = parse_line(line).map_err(|e| ReadError::MalformedRow {
            line: i + 1,
            content: line.to_string(),
            source: e,
        })?;
        readings.push(reading);
    }
    debug!(
        lines = nlines,
        skipped,
        readings = readings.len(),
        "parsed csv text"
    );
    Ok(readings)
}

/// Installs the stderr subscriber used by the binaries,
/// at `debug` level when verbose and `warn` otherwise.
pub fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Reads the whole csv file into memory and parses it, see [`parse_readings`].
pub fn read_readings<P: AsRef<Path>>(fin: P) -> Result<Vec<Reading>> {
    let fin = fin.as_ref();
    debug!("reading {}", fin.display());
    let text = std::fs::read_to_string(fin).map_err(|e| ReadError::MissingFile {
        path: fin.to_path_buf(),
        source: e,
    })?;
    parse_readings(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    #[test]
    fn parse_line_maps_fields() {
        let r = parse_line("2023-01-01T00:00:00,72.5,45.0").unwrap();
        assert_eq!(r.timestamp(), dt("2023-01-01T00:00:00"));
        assert_eq!(r.temperature(), 72.5);
        assert_eq!(r.humidity(), 45.0);
    }

    #[test]
    fn parse_line_ignores_extra_fields_and_whitespace() {
        let r = parse_line("2022-10-01 13:05:00, 68.9 ,51.3,foo,bar").unwrap();
        assert_eq!(r.timestamp(), dt("2022-10-01T13:05:00"));
        assert_eq!(r.temperature(), 68.9);
        assert_eq!(r.humidity(), 51.3);
    }

    #[test]
    fn timestamp_layouts() {
        let expected = dt("2022-10-01T13:05:00");
        for s in &[
            "2022-10-01T13:05:00",
            "2022-10-01 13:05:00",
            "2022-10-01T13:05",
            "2022-10-01 13:05",
            "2022/10/01 13:05:00",
            "2022/10/01 13:05",
        ] {
            assert_eq!(parse_timestamp(s).unwrap(), expected, "layout {}", s);
        }
        let frac = parse_timestamp("2022-10-01T13:05:00.250").unwrap();
        assert_eq!(frac.nanosecond(), 250_000_000);
        assert!(parse_timestamp("01/10/2022 13:05").is_err());
        let midnight = dt("2023-01-01T00:00:00");
        assert_eq!(parse_timestamp("2023-01-01").unwrap(), midnight);
        assert_eq!(parse_timestamp("2023/01/01").unwrap(), midnight);
        assert!(parse_timestamp("2023-01-32").is_err());
    }

    #[test]
    fn date_only_row_is_read_at_midnight() {
        // exactly 20 characters, so not skipped
        let readings = parse_readings("2023-01-01,72.5,45.0\n").unwrap();
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].timestamp(), dt("2023-01-01T00:00:00"));
        assert_eq!(readings[0].temperature(), 72.5);
    }

    #[test]
    fn line_endings() {
        assert_eq!(split_lines("a\nb\r\nc\rd"), vec!["a", "b", "c", "d"]);
        assert_eq!(split_lines("a\r\n\r\nb\r"), vec!["a", "", "b"]);
        assert_eq!(split_lines("\n"), vec![""]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn cr_only_line_endings() {
        let text = "Timestamp,Temperature,Humidity\r2023-01-01T00:00:00,72.5,45.0\r2023-01-01T00:01:00,72.6,45.1\r";
        let readings = parse_readings(text).unwrap();
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[1].timestamp(), dt("2023-01-01T00:01:00"));
        assert_eq!(readings[1].humidity(), 45.1);

        let text = "2023-01-01T00:00:00,72.5,45.0\r2023-01-01T00:01:00,bad,45.1\r";
        match parse_readings(text) {
            Err(ReadError::MalformedRow { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn parse_line_errors() {
        match parse_line("2023-01-01T00:00:00;72.5;45.0") {
            Err(RowError::MissingFields { found }) => assert_eq!(found, 1),
            other => panic!("unexpected {:?}", other),
        }
        match parse_line("2023-01-01T00:00:00,abc,45.0") {
            Err(RowError::Temperature { field, .. }) => assert_eq!(field, "abc"),
            other => panic!("unexpected {:?}", other),
        }
        match parse_line("2023-01-01T00:00:00,72.5,") {
            Err(RowError::Humidity { field, .. }) => assert_eq!(field, ""),
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(
            parse_line("not a date at all,72.5,45.0"),
            Err(RowError::Timestamp { .. })
        ));
    }

    #[test]
    fn skip_rules() {
        assert!(is_skipped("Timestamp for sample frequency every 1 min,Temperature,Humidity"));
        assert!(is_skipped("T"));
        assert!(is_skipped(""));
        assert!(is_skipped("2023-01-01,72.5,45"));
        // 19 characters
        assert!(is_skipped("1234567890123456789"));
        assert!(!is_skipped("12345678901234567890"));
        // a lowercase t is not a header
        assert!(!is_skipped("timestamp,temperature,humidity"));
    }

    #[test]
    fn header_is_skipped_regardless_of_content() {
        let text = "T2023-01-01T00:00:00,72.5,45.0\n2023-01-01T00:01:00,72.6,45.1\n";
        let readings = parse_readings(text).unwrap();
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].timestamp(), dt("2023-01-01T00:01:00"));
    }

    #[test]
    fn short_lines_are_skipped_even_if_malformed() {
        let text = "abc,def\n\n   \n2023-01-01T00:00:00,72.5,45.0\n";
        let readings = parse_readings(text).unwrap();
        assert_eq!(readings.len(), 1);
    }

    #[test]
    fn order_and_duplicates_are_preserved() {
        let text = "\
2023-01-01T00:02:00,70.0,40.0
2023-01-01T00:01:00,71.0,41.0
2023-01-01T00:01:00,71.0,41.0
2023-01-01T00:00:00,72.0,42.0";
        let readings = parse_readings(text).unwrap();
        let temps: Vec<f64> = readings.iter().map(|r| r.temperature()).collect();
        assert_eq!(temps, vec![70.0, 71.0, 71.0, 72.0]);
        assert_eq!(readings[1], readings[2]);
    }

    #[test]
    fn malformed_row_aborts_with_line_context() {
        let text = "\
Timestamp,Temperature,Humidity
2023-01-01T00:00:00,72.5,45.0
2023-01-01T00:00:00,abc,45.0,extra-but-long-enough-to-not-be-skipped
2023-01-01T00:02:00,72.5,45.0";
        match parse_readings(text) {
            Err(ReadError::MalformedRow {
                line,
                content,
                source: RowError::Temperature { .. },
            }) => {
                assert_eq!(line, 3);
                assert!(content.contains("abc"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn crlf_and_bom_are_handled() {
        let text = "\u{feff}Timestamp,Temperature,Humidity\r\n2023-01-01T00:00:00,72.5,45.0\r\n";
        let readings = parse_readings(text).unwrap();
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].humidity(), 45.0);
    }

    #[test]
    fn empty_text_gives_no_readings() {
        assert!(parse_readings("").unwrap().is_empty());
    }

    #[test]
    fn missing_file() {
        let err = read_readings("this/file/does/not/exist.csv").unwrap_err();
        match err {
            ReadError::MissingFile { path, source } => {
                assert_eq!(path, Path::new("this/file/does/not/exist.csv"));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
