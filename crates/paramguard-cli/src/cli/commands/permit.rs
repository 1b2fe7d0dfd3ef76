use crate::cli::args::PermitArgs;
use crate::exit_codes;

use super::{load_config, read_filters, read_params, reject, select_root};

pub fn run(args: PermitArgs) -> anyhow::Result<i32> {
    let config = load_config(&args.input)?;
    let filters = read_filters(&args.filters)?;
    let params = read_params(&args.input)?;

    let root = match select_root(params, args.require.as_deref()) {
        Ok(root) => root,
        Err(e) => return reject(e, &config),
    };
    if args.strict {
        root.strict();
    }

    match root.permit_with(&filters, &config) {
        Ok(Some(permitted)) => {
            println!("{}", serde_json::to_string_pretty(&permitted)?);
            Ok(exit_codes::OK)
        }
        Ok(None) => {
            tracing::info!("permit short-circuited on an empty nested value");
            println!("null");
            Ok(exit_codes::OK)
        }
        Err(e) => reject(e, &config),
    }
}
