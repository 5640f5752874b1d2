use clap::Parser;
use fdi_equilibria::cli::{run, Cli};
use fdi_equilibria::logging;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    run(cli)
}
