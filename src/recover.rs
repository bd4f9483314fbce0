//! Recovery policies consulted when a token cannot be resolved.
//!
//! Whenever evaluation hits a missing key, an out-of-range index, the append
//! marker `"-"`, a token which is not a valid index for an array, or a scalar
//! before the path is exhausted, the [`Evaluator`](crate::Evaluator) hands an
//! [`Unresolved`] to its [`Recover`] policy. The policy either fails, ending
//! evaluation, or supplies a replacement node against which the remaining
//! tokens are evaluated.
//!
//! ```
//! use jsonptr_eval::{recover, Evaluator, Pointer};
//! use serde_json::{json, Value};
//!
//! let data = json!({ "a": [1, 2, 3] });
//! let ptr = Pointer::parse("/a/5").unwrap();
//!
//! assert!(Evaluator::strict().evaluate(&data, &ptr).unwrap_err().is_out_of_bounds());
//!
//! let lenient = Evaluator::new(recover::Substitute::null());
//! assert_eq!(*lenient.evaluate(&data, &ptr).unwrap(), Value::Null);
//!
//! let append_only = Evaluator::new(recover::from_fn(|miss: recover::Unresolved<'_, Value>| {
//!     if miss.is_append_marker() {
//!         Ok(json!("end"))
//!     } else {
//!         Err(miss.into_error())
//!     }
//! }));
//! let end = Pointer::parse("/a/-").unwrap();
//! assert_eq!(*append_only.evaluate(&data, &end).unwrap(), json!("end"));
//! ```

use crate::{Node, OutOfBoundsError, ParseIndexError, ResolveError, Token};
use alloc::string::String;
use core::fmt;

/// Strategy invoked once per unresolved token, in path order.
pub trait Recover<N: Node> {
    /// Produces a replacement for the node which could not be navigated, or
    /// an error which ends evaluation.
    ///
    /// ## Errors
    /// Returns a [`ResolveError`] if the policy does not recover from `miss`.
    fn recover(&self, miss: Unresolved<'_, N>) -> Result<N, ResolveError>;
}

/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔══════════════════════════════════════════════════════════════════════════════╗
║                                                                              ║
║                                  Unresolved                                  ║
║                                 ¯¯¯¯¯¯¯¯¯¯¯¯                                 ║
╚══════════════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/

/// Why a token could not be resolved against the current node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reason {
    /// The current node is an object without the key.
    NotFound,
    /// The current node is an array and the index (or `"-"`) is not an
    /// existing element.
    OutOfBounds(OutOfBoundsError),
    /// The current node is an array and the token is not a valid index.
    InvalidIndex(ParseIndexError),
    /// The current node is a scalar, so no token can be resolved against it.
    Unreachable,
}

impl Reason {
    /// Converts into the [`ResolveError`] for a token at `offset`.
    pub fn into_error(self, offset: usize) -> ResolveError {
        match self {
            Self::NotFound => ResolveError::NotFound { offset },
            Self::OutOfBounds(source) => ResolveError::OutOfBounds { offset, source },
            Self::InvalidIndex(source) => ResolveError::FailedToParseIndex { offset, source },
            Self::Unreachable => ResolveError::Unreachable { offset },
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => f.write_str("key not found"),
            Self::OutOfBounds(err) => fmt::Display::fmt(err, f),
            Self::InvalidIndex(err) => fmt::Display::fmt(err, f),
            Self::Unreachable => f.write_str("scalar value cannot be indexed"),
        }
    }
}

/// The point at which evaluation could not proceed.
#[derive(Debug)]
pub struct Unresolved<'a, N> {
    /// The node the token was matched against.
    pub node: &'a N,
    /// The token which could not be resolved.
    pub token: &'a Token<'static>,
    /// Position of the token within the pointer.
    pub position: usize,
    /// Byte offset of the `/` preceding the token in the encoded pointer.
    pub offset: usize,
    /// Why the token could not be resolved.
    pub reason: Reason,
}

impl<N> Unresolved<'_, N> {
    /// Returns `true` if the token is the append marker (`"-"`) used against
    /// an array.
    pub fn is_append_marker(&self) -> bool {
        matches!(self.reason, Reason::OutOfBounds(_)) && self.token.decoded() == "-"
    }

    /// The [`ResolveError`] describing this failure.
    pub fn into_error(self) -> ResolveError {
        self.reason.into_error(self.offset)
    }

    /// Escalates with a policy-specific message.
    pub fn fail(self, message: impl Into<String>) -> ResolveError {
        ResolveError::Custom {
            offset: self.offset,
            message: message.into(),
        }
    }
}

/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔══════════════════════════════════════════════════════════════════════════════╗
║                                                                              ║
║                                   Policies                                   ║
║                                  ¯¯¯¯¯¯¯¯¯¯                                  ║
╚══════════════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/

/// Fails on any unresolved token. This is the default policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Strict;

impl<N: Node> Recover<N> for Strict {
    fn recover(&self, miss: Unresolved<'_, N>) -> Result<N, ResolveError> {
        Err(miss.into_error())
    }
}

/// Replaces every unresolved node with a clone of a fixed value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Substitute<N>(pub N);

impl Substitute<serde_json::Value> {
    /// Treats anything missing as JSON `null`.
    pub fn null() -> Self {
        Self(serde_json::Value::Null)
    }
}

impl<N: Node> Recover<N> for Substitute<N> {
    fn recover(&self, _: Unresolved<'_, N>) -> Result<N, ResolveError> {
        Ok(self.0.clone())
    }
}

/// Emits a `tracing` warning for every unresolved token, then defers to the
/// wrapped policy.
#[derive(Debug, Clone, Default)]
pub struct Logged<P>(pub P);

impl<N: Node, P: Recover<N>> Recover<N> for Logged<P> {
    fn recover(&self, miss: Unresolved<'_, N>) -> Result<N, ResolveError> {
        tracing::warn!(
            token = %miss.token,
            position = miss.position,
            offset = miss.offset,
            reason = %miss.reason,
            "json pointer token could not be resolved"
        );
        self.0.recover(miss)
    }
}

/// A policy backed by a closure. Created with [`from_fn`].
#[derive(Clone, Copy)]
pub struct FromFn<F>(F);

impl<F> fmt::Debug for FromFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FromFn(..)")
    }
}

/// Creates a policy from a closure.
pub fn from_fn<N, F>(f: F) -> FromFn<F>
where
    N: Node,
    F: Fn(Unresolved<'_, N>) -> Result<N, ResolveError>,
{
    FromFn(f)
}

impl<N, F> Recover<N> for FromFn<F>
where
    N: Node,
    F: Fn(Unresolved<'_, N>) -> Result<N, ResolveError>,
{
    fn recover(&self, miss: Unresolved<'_, N>) -> Result<N, ResolveError> {
        (self.0)(miss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::Index;
    use serde_json::{json, Value};

    fn miss<'a>(
        node: &'a Value,
        token: &'a Token<'static>,
        reason: Reason,
    ) -> Unresolved<'a, Value> {
        Unresolved {
            node,
            token,
            position: 1,
            offset: 2,
            reason,
        }
    }

    #[test]
    fn strict_errors() {
        let node = json!({});
        let token = Token::new("x");
        let err = Strict
            .recover(miss(&node, &token, Reason::NotFound))
            .unwrap_err();
        assert_eq!(err, ResolveError::NotFound { offset: 2 });
    }

    #[test]
    fn substitute_returns_value() {
        let node = json!([1]);
        let token = Token::new("9");
        let reason = Reason::OutOfBounds(Index::Num(9).for_len(1).unwrap_err());
        assert_eq!(
            Substitute::null().recover(miss(&node, &token, reason)),
            Ok(Value::Null)
        );
        assert_eq!(
            Substitute(json!(0)).recover(miss(&node, &token, Reason::Unreachable)),
            Ok(json!(0))
        );
    }

    #[test]
    fn logged_delegates() {
        let node = json!("leaf");
        let token = Token::new("x");
        let err = Logged(Strict)
            .recover(miss(&node, &token, Reason::Unreachable))
            .unwrap_err();
        assert!(err.is_unreachable());
        assert_eq!(
            Logged(Substitute::null()).recover(miss(&node, &token, Reason::Unreachable)),
            Ok(Value::Null)
        );
    }

    #[test]
    fn from_fn_sees_the_miss() {
        let node = json!({ "k": 1 });
        let token = Token::new("missing");
        let policy = from_fn(|miss: Unresolved<'_, Value>| {
            assert_eq!(miss.node, &json!({ "k": 1 }));
            assert_eq!(miss.token, "missing");
            assert_eq!(miss.position, 1);
            Err(miss.fail("no such key"))
        });
        assert_eq!(
            policy.recover(miss(&node, &token, Reason::NotFound)),
            Err(ResolveError::Custom {
                offset: 2,
                message: "no such key".into()
            })
        );
    }

    #[test]
    fn append_marker() {
        let node = json!([1, 2]);
        let dash = Token::new("-");
        let reason = Reason::OutOfBounds(Index::Next.for_len(2).unwrap_err());
        assert!(miss(&node, &dash, reason.clone()).is_append_marker());

        let key = Token::new("-");
        assert!(!miss(&node, &key, Reason::NotFound).is_append_marker());
        let five = Token::new("5");
        assert!(!miss(&node, &five, reason).is_append_marker());
    }

    #[test]
    fn reason_display() {
        assert_eq!(Reason::NotFound.to_string(), "key not found");
        assert_eq!(
            Reason::Unreachable.to_string(),
            "scalar value cannot be indexed"
        );
        assert_eq!(
            Reason::InvalidIndex(ParseIndexError::LeadingZeros).to_string(),
            "token contained leading zeros, which are disallowed by RFC 6901"
        );
    }
}
