//! Whitelist filtering for untrusted, nested request parameters.
//!
//! ```
//! use paramguard_core::{Filter, Params};
//! use serde_json::json;
//!
//! let params = Params::from_json(json!({
//!     "person": {"name": "Ada", "admin": true}
//! }))
//! .unwrap();
//!
//! let filters = Filter::parse_list(&json!([{"person": ["name"]}])).unwrap();
//! let permitted = params.permit(&filters).unwrap().unwrap();
//!
//! assert!(permitted.is_permitted());
//! assert_eq!(permitted.to_json(), json!({"person": {"name": "Ada"}}));
//! ```

pub mod config;
pub mod errors;
pub mod filter;
pub mod params;
pub mod permit;
pub mod response;
pub mod strict;
pub mod value;

pub use config::ParamsConfig;
pub use errors::{ParamsError, ParamsResult};
pub use filter::Filter;
pub use params::Params;
pub use response::Rejection;
pub use value::{Object, Scalar, Value};
