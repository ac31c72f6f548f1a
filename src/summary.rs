use super::series::Series;
use super::{DT_FORMAT, VERSION};
use clap::{App, Arg};
use std::path::PathBuf;

/// Takes the CLI arguments that select the exports to summarize.
pub fn parse_cli() -> (Vec<PathBuf>, bool) {
    let arg_csvin = Arg::with_name("input_csvfiles")
        .help("name of the csv file(s) exported from the hygrometer")
        .short("f")
        .long("csvfile")
        .takes_value(true)
        .multiple(true)
        .required(true);
    let arg_verbose = Arg::with_name("verbose")
        .help("print debug information on stderr")
        .short("v")
        .long("verbose")
        .takes_value(false)
        .required(false);
    let cli_args = App::new("Govee_summary")
        .version(VERSION.unwrap_or("unknown"))
        .author("Luca Peruzzo")
        .about("cli app to summarize temperature and humidity exports")
        .arg(arg_csvin)
        .arg(arg_verbose)
        .get_matches();
    let csvin: Vec<PathBuf> = cli_args
        .values_of("input_csvfiles")
        .map(|v| v.map(PathBuf::from).collect())
        .unwrap_or_default();
    let verbose = cli_args.is_present("verbose");
    return (csvin, verbose);
}

/// Short text summary of a series: count, time span, and value ranges.
pub fn summarize(series: &Series) -> String {
    let mut out = format!("{}: {} readings\n", series.label(), series.len());
    if let Some(t) = series.time_range() {
        out.push_str(&format!(
            "  from {} to {} ({} minutes)\n",
            t.min.format(DT_FORMAT),
            t.max.format(DT_FORMAT),
            t.span().num_minutes()
        ));
    }
    if let Some(t) = series.temperature_range() {
        out.push_str(&format!("  temperature {} .. {}\n", t.min, t.max));
    }
    if let Some(h) = series.humidity_range() {
        out.push_str(&format!("  humidity {} .. {} %\n", h.min, h.max));
    }
    out
}
