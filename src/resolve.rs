//! # Resolving values by JSON Pointer
//!
//! [`Evaluator`] walks a [`Node`] token by token, consulting its
//! [`Recover`] policy whenever a token cannot be resolved. The walk is an
//! explicit loop over the current node and the remaining tokens, so pointer
//! length never grows the call stack.
//!
//! [`Resolve`] is a shorthand for strict evaluation which always hands back a
//! reference into the original value.
//!
//! ```
//! use jsonptr_eval::{Evaluator, Pointer, Resolve};
//! use serde_json::json;
//!
//! let data = json!({ "a": [1, 2, 3] });
//! let ptr = Pointer::parse("/a/1").unwrap();
//! assert_eq!(data.resolve(&ptr).unwrap(), 2);
//!
//! let evaluator = Evaluator::strict();
//! assert_eq!(*evaluator.evaluate(&data, &ptr).unwrap(), 2);
//! assert!(evaluator.evaluate_str(&data, "/a/01").is_err());
//! ```

use crate::{
    recover::{Reason, Recover, Strict, Unresolved},
    Error, Node, OutOfBoundsError, ParseIndexError, Pointer, Shape, Token,
};
use alloc::{borrow::Cow, string::String};
use core::fmt;

/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔══════════════════════════════════════════════════════════════════════════════╗
║                                                                              ║
║                                  Evaluator                                   ║
║                                 ¯¯¯¯¯¯¯¯¯¯¯                                  ║
╚══════════════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/

/// Evaluates [`Pointer`]s with a recovery policy bound at construction.
///
/// Evaluators hold no state besides the policy; construct one where the
/// policy is decided and pass it to the code which resolves pointers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Evaluator<P = Strict> {
    policy: P,
}

impl Evaluator<Strict> {
    /// An evaluator which fails on any unresolved token.
    pub fn strict() -> Self {
        Self { policy: Strict }
    }
}

impl<P> Evaluator<P> {
    /// Creates an evaluator bound to `policy`.
    pub fn new(policy: P) -> Self {
        Self { policy }
    }

    /// The recovery policy of this evaluator.
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Evaluates `ptr` against `value`.
    ///
    /// The result borrows from `value` unless the policy substituted a node
    /// along the way, in which case it is owned. The root pointer always
    /// returns `value` itself.
    ///
    /// ## Errors
    /// Returns whatever [`ResolveError`] the policy raises for an unresolved
    /// token.
    pub fn evaluate<'v, N>(&self, value: &'v N, ptr: &Pointer) -> Result<Cow<'v, N>, ResolveError>
    where
        N: Node,
        P: Recover<N>,
    {
        tracing::trace!(pointer = %ptr, "evaluating json pointer");
        let mut current = Cow::Borrowed(value);
        let mut offset = 0;
        for (position, token) in ptr.tokens().enumerate() {
            current = match step(current, token) {
                Ok(next) => next,
                Err((node, reason)) => {
                    tracing::debug!(
                        pointer = %ptr,
                        offset,
                        %reason,
                        "token unresolved, consulting recovery policy"
                    );
                    let recovered = self.policy.recover(Unresolved {
                        node: &node,
                        token,
                        position,
                        offset,
                        reason,
                    })?;
                    Cow::Owned(recovered)
                }
            };
            offset += token.encoded_len() + 1;
        }
        Ok(current)
    }

    /// Parses `ptr` and evaluates it against `value`.
    ///
    /// ## Errors
    /// Returns [`Error::Parse`] if `ptr` is malformed, or [`Error::Resolve`]
    /// if the policy fails.
    pub fn evaluate_str<'v, N>(&self, value: &'v N, ptr: &str) -> Result<Cow<'v, N>, Error>
    where
        N: Node,
        P: Recover<N>,
    {
        let ptr = Pointer::parse(ptr)?;
        Ok(self.evaluate(value, &ptr)?)
    }

    /// Parses a raw JSON document and a pointer, then evaluates the pointer.
    ///
    /// ```
    /// # use jsonptr_eval::Evaluator;
    /// let evaluator = Evaluator::strict();
    /// let value = evaluator.evaluate_document(r#"{"a":{"b":[true]}}"#, "/a/b/0").unwrap();
    /// assert_eq!(value, true);
    /// ```
    ///
    /// ## Errors
    /// Returns [`Error::Parse`] if `ptr` is malformed, [`Error::Json`] if the
    /// document is not valid JSON, or [`Error::Resolve`] if the policy fails.
    pub fn evaluate_document(&self, document: &str, ptr: &str) -> Result<serde_json::Value, Error>
    where
        P: Recover<serde_json::Value>,
    {
        let ptr = Pointer::parse(ptr)?;
        let value: serde_json::Value = serde_json::from_str(document)?;
        Ok(self.evaluate(&value, &ptr)?.into_owned())
    }
}

/// Advances `current` by one token, handing the node back with the reason on
/// failure so that it can be offered to the policy.
#[allow(clippy::type_complexity)]
fn step<'v, N: Node>(
    current: Cow<'v, N>,
    token: &Token<'_>,
) -> Result<Cow<'v, N>, (Cow<'v, N>, Reason)> {
    match current {
        Cow::Borrowed(node) => locate(node, token)
            .map(Cow::Borrowed)
            .map_err(|reason| (Cow::Borrowed(node), reason)),
        Cow::Owned(node) => take(node, token)
            .map(Cow::Owned)
            .map_err(|(node, reason)| (Cow::Owned(node), reason)),
    }
}

/// Resolves a single token against `node`. The token's kind is decided by
/// the shape of `node`: a key for objects, an index for arrays.
fn locate<'v, N: Node>(node: &'v N, token: &Token<'_>) -> Result<&'v N, Reason> {
    match node.shape() {
        Shape::Object => node.get_key(token.decoded()).ok_or(Reason::NotFound),
        Shape::Array { len } => {
            let index = array_index(token, len)?;
            node.get_index(index)
                .ok_or(Reason::OutOfBounds(OutOfBoundsError { length: len, index }))
        }
        Shape::Scalar => Err(Reason::Unreachable),
    }
}

/// Like [`locate`], but moves the child out of an owned node.
fn take<N: Node>(node: N, token: &Token<'_>) -> Result<N, (N, Reason)> {
    match node.shape() {
        Shape::Object => node
            .into_key(token.decoded())
            .map_err(|node| (node, Reason::NotFound)),
        Shape::Array { len } => match array_index(token, len) {
            Ok(index) => node.into_index(index).map_err(|node| {
                (
                    node,
                    Reason::OutOfBounds(OutOfBoundsError { length: len, index }),
                )
            }),
            Err(reason) => Err((node, reason)),
        },
        Shape::Scalar => Err((node, Reason::Unreachable)),
    }
}

fn array_index(token: &Token<'_>, len: usize) -> Result<usize, Reason> {
    token
        .to_index()
        .map_err(Reason::InvalidIndex)?
        .for_len(len)
        .map_err(Reason::OutOfBounds)
}

/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔══════════════════════════════════════════════════════════════════════════════╗
║                                                                              ║
║                                   Resolve                                    ║
║                                  ¯¯¯¯¯¯¯¯¯                                   ║
╚══════════════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/

/// Strict resolution of a value by JSON Pointer.
pub trait Resolve: Node {
    /// Resolves the node at `ptr`, failing on the first unresolved token.
    ///
    /// ## Errors
    /// Returns a [`ResolveError`] describing the first token which could not
    /// be resolved.
    fn resolve(&self, ptr: &Pointer) -> Result<&Self, ResolveError>;
}

impl<N: Node> Resolve for N {
    fn resolve(&self, ptr: &Pointer) -> Result<&Self, ResolveError> {
        let mut node = self;
        let mut offset = 0;
        for token in ptr.tokens() {
            node = locate(node, token).map_err(|reason| reason.into_error(offset))?;
            offset += token.encoded_len() + 1;
        }
        Ok(node)
    }
}

/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔══════════════════════════════════════════════════════════════════════════════╗
║                                                                              ║
║                                 ResolveError                                 ║
║                                ¯¯¯¯¯¯¯¯¯¯¯¯¯¯¯                               ║
╚══════════════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/

/// Indicates that a syntactically valid [`Pointer`] could not be resolved
/// against a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// A token for an array index is not a valid integer or dash (`"-"`).
    ///
    /// ## Example
    /// ```rust
    /// # use serde_json::json;
    /// # use jsonptr_eval::{Pointer, Resolve};
    /// let data = json!({ "foo": ["bar"] });
    /// let ptr = Pointer::parse("/foo/invalid").unwrap();
    /// assert!(data.resolve(&ptr).unwrap_err().is_failed_to_parse_index());
    /// ```
    FailedToParseIndex {
        /// Offset of the partial pointer starting with the invalid index.
        offset: usize,
        /// The source [`ParseIndexError`]
        source: ParseIndexError,
    },

    /// An array index is out of bounds, including the append marker
    /// (`"-"`), which never refers to an existing element.
    ///
    /// ## Example
    /// ```rust
    /// # use serde_json::json;
    /// # use jsonptr_eval::{Pointer, Resolve};
    /// let data = json!({ "foo": ["bar"] });
    /// let ptr = Pointer::parse("/foo/1").unwrap();
    /// assert!(data.resolve(&ptr).unwrap_err().is_out_of_bounds());
    /// ```
    OutOfBounds {
        /// Offset of the partial pointer starting with the invalid index.
        offset: usize,
        /// The source [`OutOfBoundsError`]
        source: OutOfBoundsError,
    },

    /// An object does not contain the key.
    ///
    /// ## Example
    /// ```rust
    /// # use serde_json::json;
    /// # use jsonptr_eval::{Pointer, Resolve};
    /// let data = json!({ "foo": "bar" });
    /// let ptr = Pointer::parse("/bar").unwrap();
    /// assert!(data.resolve(&ptr).unwrap_err().is_not_found());
    /// ```
    NotFound {
        /// Offset of the pointer starting with the `Token` which was not found.
        offset: usize,
    },

    /// The path reached a scalar value before it was exhausted.
    ///
    /// ## Example
    /// ```rust
    /// # use serde_json::json;
    /// # use jsonptr_eval::{Pointer, Resolve};
    /// let data = json!({ "foo": "bar" });
    /// let ptr = Pointer::parse("/foo/unreachable").unwrap();
    /// assert!(data.resolve(&ptr).unwrap_err().is_unreachable());
    /// ```
    Unreachable {
        /// Offset of the pointer which was unreachable.
        offset: usize,
    },

    /// A recovery policy refused to recover and supplied its own message.
    Custom {
        /// Offset of the partial pointer starting with the unresolved token.
        offset: usize,
        /// The policy's explanation.
        message: String,
    },
}

impl ResolveError {
    /// Offset of the partial pointer starting with the token which caused the
    /// error.
    pub fn offset(&self) -> usize {
        match self {
            Self::FailedToParseIndex { offset, .. }
            | Self::OutOfBounds { offset, .. }
            | Self::NotFound { offset }
            | Self::Unreachable { offset }
            | Self::Custom { offset, .. } => *offset,
        }
    }

    /// Returns `true` if this error is `FailedToParseIndex`.
    pub fn is_failed_to_parse_index(&self) -> bool {
        matches!(self, Self::FailedToParseIndex { .. })
    }

    /// Returns `true` if this error is `OutOfBounds`.
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. })
    }

    /// Returns `true` if this error is `NotFound`.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if this error is `Unreachable`.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Unreachable { .. })
    }

    /// Returns `true` if this error was raised by a policy with its own
    /// message.
    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom { .. })
    }
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FailedToParseIndex { offset, .. } => {
                write!(f, "failed to parse index at offset {offset}")
            }
            Self::OutOfBounds { offset, .. } => {
                write!(f, "index at offset {offset} out of bounds")
            }
            Self::NotFound { offset } => {
                write!(f, "pointer starting at offset {offset} not found")
            }
            Self::Unreachable { offset } => {
                write!(f, "pointer starting at offset {offset} is unreachable")
            }
            Self::Custom { offset, message } => {
                write!(f, "pointer starting at offset {offset} not resolved: {message}")
            }
        }
    }
}

impl std::error::Error for ResolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::FailedToParseIndex { source, .. } => Some(source),
            Self::OutOfBounds { source, .. } => Some(source),
            _ => None,
        }
    }
}

/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔══════════════════════════════════════════════════════════════════════════════╗
║                                                                              ║
║                                    Tests                                     ║
║                                   ¯¯¯¯¯¯¯                                    ║
╚══════════════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/
