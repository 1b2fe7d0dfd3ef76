pub mod check;
pub mod permit;
pub mod require;

use std::io::Read;
use std::path::Path;
use std::rc::Rc;

use anyhow::Context;
use paramguard_core::{Filter, Params, ParamsConfig, ParamsError, Rejection};

use crate::cli::args::{Cli, Command, InputArgs};

pub fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Permit(args) => permit::run(args),
        Command::Check(args) => check::run(args),
        Command::Require(args) => require::run(args),
    }
}

/// Defaults, then the config file, then the environment.
pub(crate) fn load_config(input: &InputArgs) -> anyhow::Result<ParamsConfig> {
    let base = match &input.config {
        Some(path) => ParamsConfig::from_yaml_file(path)?,
        None => ParamsConfig::default(),
    };
    Ok(base.with_env_overrides()?)
}

pub(crate) fn read_params(input: &InputArgs) -> anyhow::Result<Params> {
    let body = if input.params == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read params from stdin")?;
        buf
    } else {
        std::fs::read_to_string(&input.params)
            .with_context(|| format!("failed to read params {}", input.params))?
    };
    Ok(Params::from_json_str(&body)?)
}

/// YAML is a superset of JSON, so one parser covers both filter formats.
pub(crate) fn read_filters(path: &Path) -> anyhow::Result<Vec<Filter>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read filters {}", path.display()))?;
    Ok(Filter::parse_yaml(&content)?)
}

/// Selects the tree to work on: the whole body, or the mapping under a
/// required key.
pub(crate) fn select_root(params: Params, require: Option<&str>) -> Result<Rc<Params>, ParamsError> {
    match require {
        None => Ok(Rc::new(params)),
        Some(key) => params.require_tree(key),
    }
}

/// Prints the rejection for request errors; host errors propagate.
pub(crate) fn reject(err: ParamsError, config: &ParamsConfig) -> anyhow::Result<i32> {
    match Rejection::from_error(&err, config) {
        Some(rejection) => {
            tracing::info!(status = rejection.status, "request rejected: {}", err);
            println!("{}", serde_json::to_string_pretty(&rejection)?);
            Ok(err.exit_code())
        }
        None => Err(err.into()),
    }
}
