use govee_lpp::init_tracing;
use govee_lpp::summary::{parse_cli, summarize};
use govee_lpp::Series;
use tracing::{error, info};

fn main() {
    let (csvin, verbose) = parse_cli();
    init_tracing(verbose);
    let mut failed = 0;
    for fin in csvin.iter() {
        info!("read data from {}", fin.display());
        match Series::from_csv(fin) {
            Ok(series) => print!("{}", summarize(&series)),
            Err(e) => {
                error!("{}", e);
                failed += 1;
            }
        }
    }
    if failed > 0 {
        std::process::exit(1);
    }
}
