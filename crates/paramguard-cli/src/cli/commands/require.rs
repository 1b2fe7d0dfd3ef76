use crate::cli::args::RequireArgs;
use crate::exit_codes;

use super::{load_config, read_params, reject};

pub fn run(args: RequireArgs) -> anyhow::Result<i32> {
    let config = load_config(&args.input)?;
    let params = read_params(&args.input)?;

    match params.require(&args.key) {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(exit_codes::OK)
        }
        Err(e) => reject(e, &config),
    }
}
