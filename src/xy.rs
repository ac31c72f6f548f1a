use super::series::Series;
use super::VERSION;
use clap::{App, Arg};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Column projected on the y axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Temperature,
    Humidity,
}

impl Column {
    pub fn from_name(name: &str) -> Option<Column> {
        match name {
            "temperature" => Some(Column::Temperature),
            "humidity" => Some(Column::Humidity),
            _ => None,
        }
    }
}

/// Takes the CLI arguments that control the xy export.
pub fn parse_cli() -> (PathBuf, PathBuf, Column, bool) {
    let arg_csvin = Arg::with_name("input_csvfile")
        .help("name of the csv file exported from the hygrometer")
        .short("f")
        .long("csvfile")
        .takes_value(true)
        .required(true);
    let arg_csvout = Arg::with_name("output_csvfile")
        .help("name of the output xy csv file")
        .short("o")
        .long("output")
        .takes_value(true);
    let arg_column = Arg::with_name("column")
        .help("column for the y axis")
        .short("y")
        .long("column")
        .takes_value(true)
        .possible_values(&["temperature", "humidity"])
        .default_value("temperature");
    let arg_verbose = Arg::with_name("verbose")
        .help("print debug information on stderr")
        .short("v")
        .long("verbose")
        .takes_value(false)
        .required(false);
    let cli_args = App::new("Govee_xy")
        .version(VERSION.unwrap_or("unknown"))
        .author("Luca Peruzzo")
        .about("cli app to export a temperature or humidity series as plot coordinates")
        .arg(arg_csvin)
        .arg(arg_csvout)
        .arg(arg_column)
        .arg(arg_verbose)
        .get_matches();
    let csvin = PathBuf::from(cli_args.value_of("input_csvfile").unwrap_or_default());
    let csvout = match cli_args.value_of("output_csvfile") {
        Some(p) => PathBuf::from(p),
        None => default_output(&csvin),
    };
    let column = cli_args
        .value_of("column")
        .and_then(Column::from_name)
        .unwrap_or(Column::Temperature);
    let verbose = cli_args.is_present("verbose");
    return (csvin, csvout, column, verbose);
}

/// `data/H5075_export.csv` becomes `data/H5075_export_xy.csv`
pub fn default_output(csvin: &Path) -> PathBuf {
    let stem = csvin
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    csvin.with_file_name(format!("{}_xy.csv", stem))
}

/// writes the OLE date (x) and the selected column (y) of the series as csv
pub fn write_xy<W: Write>(series: &Series, column: Column, w: &mut W) -> std::io::Result<()> {
    let points = match column {
        Column::Temperature => series.temperature_points(),
        Column::Humidity => series.humidity_points(),
    };
    writeln!(w, "x,y")?;
    for (x, y) in points.iter() {
        writeln!(w, "{},{}", x, y)?;
    }
    w.flush()
}

pub fn write_xy_file(series: &Series, column: Column, fout: &Path) -> std::io::Result<()> {
    let file = File::create(fout)?;
    let mut buf = BufWriter::new(file);
    write_xy(series, column, &mut buf)
}
