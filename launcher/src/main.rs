use clap::Parser;
use gfx_launch::cli::{self, LaunchArgs};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = match LaunchArgs::try_parse() {
        Ok(args) => args,
        Err(err) => return cli::parse_failure(&err),
    };
    gfx_launch::logging::init(args.verbose);

    match gfx_launch::app::launch(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            gfx_launch::app::report(&err);
            ExitCode::from(1)
        }
    }
}
