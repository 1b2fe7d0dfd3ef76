use serde_json::json;

use crate::cli::args::CheckArgs;
use crate::exit_codes;

use super::{load_config, read_filters, read_params, reject, select_root};

pub fn run(args: CheckArgs) -> anyhow::Result<i32> {
    let config = load_config(&args.input)?;
    let filters = read_filters(&args.filters)?;
    let params = read_params(&args.input)?;

    let result = select_root(params, args.require.as_deref()).and_then(|root| root.check(&filters));
    match result {
        Ok(()) => {
            println!("{}", json!({ "status": "ok" }));
            Ok(exit_codes::OK)
        }
        Err(e) => reject(e, &config),
    }
}
