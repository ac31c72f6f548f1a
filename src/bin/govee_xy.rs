use govee_lpp::init_tracing;
use govee_lpp::xy::{parse_cli, write_xy_file};
use govee_lpp::Series;
use tracing::{error, info};

fn main() {
    let (csvin, csvout, column, verbose) = parse_cli();
    init_tracing(verbose);
    info!(
        "read data from {} and save {:?} to {}",
        csvin.display(),
        column,
        csvout.display()
    );
    let series = match Series::from_csv(&csvin) {
        Ok(s) => s,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = write_xy_file(&series, column, &csvout) {
        error!("could not write {}: {}", csvout.display(), e);
        std::process::exit(1);
    }
    println!("{}: wrote {} points to {}", series.label(), series.len(), csvout.display());
}
