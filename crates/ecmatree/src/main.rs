use std::io;
use std::process::ExitCode;

use clap::Parser;
use ecmatree::{Args, logging};

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose);

    // Handled parse errors still exit 0; only a failed write to stdout does not.
    match ecmatree::run(&args, &mut io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
