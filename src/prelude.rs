//! Exposes the traits `Resolve`, `Recover`, `Node` and `Diagnose`.
//!
//! ```
//! use jsonptr_eval::{prelude::*, Pointer};
//! use serde_json::json;
//!
//! let data = json!({ "a": [1] });
//! let ptr = Pointer::parse("/a/0").unwrap();
//! assert_eq!(data.resolve(&ptr).unwrap(), 1);
//! assert!(data.resolve(&ptr).diagnose(ptr.to_string()).is_ok());
//! ```
pub use crate::{diagnostic::Diagnose, Node, Recover, Resolve};
