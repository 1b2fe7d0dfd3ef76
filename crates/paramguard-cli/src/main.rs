use clap::Parser;
use paramguard_core::ParamsError;

mod cli;
pub mod exit_codes;
mod logging;

use cli::args::Cli;
use cli::commands::dispatch;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.log_json);
    let code = match dispatch(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("fatal: {e:?}");
            e.downcast_ref::<ParamsError>()
                .map_or(exit_codes::CONFIG_ERROR, ParamsError::exit_code)
        }
    };
    std::process::exit(code);
}
