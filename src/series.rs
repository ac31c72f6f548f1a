//! A labeled sequence of readings, and its projection to plot coordinates.

use super::{read_readings, Reading, Result, DT_FORMAT};
use chrono::prelude::*;
use std::path::Path;

/// days from 0001-01-01 to 1899-12-30, the zero of the OLE date
const OLE_EPOCH_DAYS_FROM_CE: i64 = 693_594;
const MILLIS_PER_DAY: f64 = 86_400_000.;

/// The readings of one export, destined for a single plot line.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    label: String,
    readings: Vec<Reading>,
}

/// Smallest and largest value of a series column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range<T> {
    pub min: T,
    pub max: T,
}

impl Range<NaiveDateTime> {
    pub fn span(&self) -> chrono::Duration {
        self.max - self.min
    }
}

impl Series {
    pub fn new(label: &str, readings: Vec<Reading>) -> Series {
        Series {
            label: label.to_string(),
            readings,
        }
    }

    /// Reads the csv export and labels it after the file name.
    pub fn from_csv<P: AsRef<Path>>(fin: P) -> Result<Series> {
        let fin = fin.as_ref();
        let readings = read_readings(fin)?;
        Ok(Series::new(&series_label(fin), readings))
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// timestamps as OLE dates, the x coordinates of the plot
    pub fn xs(&self) -> Vec<f64> {
        self.readings
            .iter()
            .map(|r| to_ole_date(r.timestamp()))
            .collect()
    }

    pub fn temperatures(&self) -> Vec<f64> {
        self.readings.iter().map(|r| r.temperature()).collect()
    }

    pub fn humidities(&self) -> Vec<f64> {
        self.readings.iter().map(|r| r.humidity()).collect()
    }

    pub fn temperature_points(&self) -> Vec<(f64, f64)> {
        self.readings
            .iter()
            .map(|r| (to_ole_date(r.timestamp()), r.temperature()))
            .collect()
    }

    pub fn humidity_points(&self) -> Vec<(f64, f64)> {
        self.readings
            .iter()
            .map(|r| (to_ole_date(r.timestamp()), r.humidity()))
            .collect()
    }

    /// first and last timestamp by value, not by position;
    /// the readings are never sorted
    pub fn time_range(&self) -> Option<Range<NaiveDateTime>> {
        let times: Vec<NaiveDateTime> = self.readings.iter().map(|r| r.timestamp()).collect();
        min_and_max(&times[..])
    }

    /// NAN values are left out
    pub fn temperature_range(&self) -> Option<Range<f64>> {
        finite_range(self.temperatures())
    }

    /// NAN values are left out
    pub fn humidity_range(&self) -> Option<Range<f64>> {
        finite_range(self.humidities())
    }
}

impl std::fmt::Display for Series {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "timestamp,temperature,humidity")?;
        for r in self.readings.iter() {
            writeln!(
                f,
                "{},{},{}",
                r.timestamp().format(DT_FORMAT),
                r.temperature(),
                r.humidity()
            )?
        }
        Ok(())
    }
}

/// Label for the series of a file: the file name up to its first underscore,
/// e.g. `H5075_A1B2_export.csv` gives `H5075`.
pub fn series_label<P: AsRef<Path>>(fin: P) -> String {
    let name = match fin.as_ref().file_name() {
        Some(n) => n.to_string_lossy(),
        None => return String::new(),
    };
    name.split('_').next().unwrap_or_default().to_string()
}

/// Converts a timestamp to an OLE automation date:
/// days since 1899-12-30 00:00 with the time of day as fraction, at millisecond precision.
/// Before the epoch the fraction still counts forward in the day,
/// so 1899-12-29 12:00 is -1.5.
pub fn to_ole_date(dt: NaiveDateTime) -> f64 {
    let days = dt.num_days_from_ce() as i64 - OLE_EPOCH_DAYS_FROM_CE;
    // a leap second reports up to 1999 ms, keep it within the day
    let millis = dt.num_seconds_from_midnight() as u64 * 1000
        + (dt.nanosecond() as u64 / 1_000_000).min(999);
    let frac = millis as f64 / MILLIS_PER_DAY;
    if days < 0 {
        days as f64 - frac
    } else {
        days as f64 + frac
    }
}

/// Returns (min, max) of the slice, None when it is empty.
pub fn min_and_max<T: std::cmp::PartialOrd + Copy>(s: &[T]) -> Option<Range<T>> {
    let mut s_iter = s.iter();
    let (mut min, mut max) = match s_iter.next() {
        Some(v) => (*v, *v),
        None => return None,
    };
    for es in s_iter {
        if *es > max {
            max = *es
        }
        if *es < min {
            min = *es
        }
    }
    Some(Range { min, max })
}

fn finite_range(v: Vec<f64>) -> Option<Range<f64>> {
    let v: Vec<f64> = v.into_iter().filter(|x| !x.is_nan()).collect();
    min_and_max(&v[..])
}
