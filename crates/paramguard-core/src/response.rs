//! Client-error responses for rejected requests.
//!
//! Hosts translate `Missing`, `NotAMapping` and `Forbidden` into a 4xx
//! response without retry. Other error kinds are host faults and do not map
//! to a rejection.

use serde::Serialize;

use crate::config::ParamsConfig;
use crate::errors::ParamsError;

pub const BAD_REQUEST: u16 = 400;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub status: u16,
    pub body: String,
}

impl Rejection {
    /// Renders a rejection, or `None` when `err` is not caused by the request.
    pub fn from_error(err: &ParamsError, config: &ParamsConfig) -> Option<Self> {
        match err {
            ParamsError::Missing { key } => Some(Self {
                status: BAD_REQUEST,
                body: format!("Required parameter missing: {key}"),
            }),
            ParamsError::NotAMapping { key } => Some(Self {
                status: BAD_REQUEST,
                body: format!("Parameter is not a mapping: {key}"),
            }),
            ParamsError::Forbidden { keys } => Some(Self {
                status: config.forbidden_status,
                body: format!("Parameters forbidden: {}", keys.join(" ")),
            }),
            ParamsError::InvalidFilter { .. }
            | ParamsError::InvalidParams { .. }
            | ParamsError::Config { .. } => None,
        }
    }
}
