//! # jsonptr-eval
//!
//! Parsing and evaluation of JSON Pointers ([RFC 6901](https://datatracker.ietf.org/doc/html/rfc6901))
//! with pluggable recovery for paths which do not resolve.
//!
//! A [`Pointer`] is parsed from its string form, validating every `~` escape
//! up front and storing the decoded [`Token`]s. An [`Evaluator`] walks a
//! [`Node`] (`serde_json::Value`, or `toml::Value` with the `"toml"`
//! feature) token by token. Whether a token is an object key or an array
//! index is decided by the node it meets, so `"/1"` selects the key `"1"` of
//! an object and the second element of an array.
//!
//! When a token cannot be resolved the evaluator consults its
//! [`Recover`] policy. The default, [`Strict`], fails with a
//! [`ResolveError`]; other policies in [`recover`] may substitute a value and
//! let evaluation continue from it.
//!
//! ```
//! use jsonptr_eval::{recover::Substitute, Evaluator, Pointer, Resolve};
//! use serde_json::{json, Value};
//!
//! let data = json!({ "foo": ["bar", "baz"], "a/b": 1, "m~n": 8 });
//!
//! let ptr = Pointer::parse("/foo/0").unwrap();
//! assert_eq!(data.resolve(&ptr).unwrap(), "bar");
//! assert_eq!(data.resolve(&Pointer::parse("/a~1b").unwrap()).unwrap(), 1);
//! assert_eq!(data.resolve(&Pointer::parse("/m~0n").unwrap()).unwrap(), 8);
//!
//! let missing = Pointer::parse("/foo/2").unwrap();
//! assert!(Evaluator::strict().evaluate(&data, &missing).is_err());
//! let lenient = Evaluator::new(Substitute::null());
//! assert_eq!(*lenient.evaluate(&data, &missing).unwrap(), Value::Null);
//! ```
//!
//! ## Feature Flags
//!
//! | Flag     | Description                                                        | Default |
//! | :------: | ------------------------------------------------------------------ | :-----: |
//! | `"toml"` | Implements [`Node`] for `toml::Value`                              |         |
//! | `"miette"` | Implements `miette::Diagnostic` for [`diagnostic::Report`]       |         |
#![warn(missing_docs)]
extern crate alloc;

use core::fmt;

pub mod index;
pub use index::{Index, OutOfBoundsError, ParseIndexError};

mod token;
pub use token::{InvalidEncodingError, Token};

mod pointer;
pub use pointer::{ParseError, Pointer};

mod node;
pub use node::{Node, Shape};

pub mod recover;
pub use recover::{Recover, Strict};

mod resolve;
pub use resolve::{Evaluator, Resolve, ResolveError};

pub mod diagnostic;

pub mod prelude;

#[cfg(test)]
mod arbitrary;

/// Any failure of the string based entry points of [`Evaluator`].
#[derive(Debug)]
pub enum Error {
    /// The pointer was malformed.
    Parse(ParseError),
    /// The pointer could not be resolved and the recovery policy failed.
    Resolve(ResolveError),
    /// The document was not valid JSON.
    Json(serde_json::Error),
}

impl Error {
    /// Returns `true` if this error is `Parse`.
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }

    /// Returns `true` if this error is `Resolve`.
    pub fn is_resolve(&self) -> bool {
        matches!(self, Self::Resolve(_))
    }

    /// Returns `true` if this error is `Json`.
    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => fmt::Display::fmt(err, f),
            Self::Resolve(err) => fmt::Display::fmt(err, f),
            Self::Json(err) => write!(f, "json document is malformed: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Resolve(err) => Some(err),
            Self::Json(err) => Some(err),
        }
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Self::Parse(err)
    }
}

impl From<ResolveError> for Error {
    fn from(err: ResolveError) -> Self {
        Self::Resolve(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}
