#[cfg(test)]
mod pointer_test;

use crate::{token::validate_encoded, InvalidEncodingError, Token};
use alloc::{string::String, vec::Vec};
use core::{fmt, slice, str::FromStr};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔══════════════════════════════════════════════════════════════════════════════╗
║                                                                              ║
║                                   Pointer                                    ║
║                                  ¯¯¯¯¯¯¯¯¯                                   ║
╚══════════════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/

/// A parsed JSON Pointer: an ordered sequence of zero or more decoded
/// [`Token`]s. The empty pointer denotes the whole document.
///
/// See [RFC 6901 for more
/// information](https://datatracker.ietf.org/doc/html/rfc6901).
///
/// ## Example
/// ```rust
/// use jsonptr_eval::{Pointer, Resolve};
/// use serde_json::json;
///
/// let data = json!({ "foo": { "bar": "baz" } });
/// let ptr = Pointer::parse("/foo/bar").unwrap();
/// assert_eq!(data.resolve(&ptr).unwrap(), "baz");
/// assert_eq!(ptr, Pointer::from_tokens(["foo", "bar"]));
/// ```
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pointer {
    tokens: Vec<Token<'static>>,
}

impl Pointer {
    /// Creates the root json pointer (`""`).
    pub fn root() -> Self {
        Self::default()
    }

    /// Creates a `Pointer` from decoded tokens.
    ///
    /// ## Example
    /// ```rust
    /// # use jsonptr_eval::Pointer;
    /// let ptr = Pointer::from_tokens(["foo", "a/b"]);
    /// assert_eq!(ptr.to_string(), "/foo/a~1b");
    /// ```
    pub fn from_tokens<'t>(tokens: impl IntoIterator<Item: Into<Token<'t>>>) -> Self {
        Self {
            tokens: tokens
                .into_iter()
                .map(|t| t.into().into_owned())
                .collect(),
        }
    }

    /// Parses an RFC 6901 encoded string into a `Pointer`.
    ///
    /// The empty string is the root pointer. Otherwise the input must begin
    /// with `/`, and every `~` must be followed by `0` or `1`. The whole input
    /// is validated before any token is decoded.
    ///
    /// ## Example
    /// ```rust
    /// # use jsonptr_eval::Pointer;
    /// let ptr = Pointer::parse("/a~1b/c~0d/~01").unwrap();
    /// let tokens: Vec<_> = ptr.tokens().map(|t| t.decoded()).collect();
    /// assert_eq!(tokens, ["a/b", "c~d", "~1"]);
    ///
    /// assert!(Pointer::parse("a/b").unwrap_err().is_no_leading_slash());
    /// assert!(Pointer::parse("/a~2b").unwrap_err().is_invalid_encoding());
    /// ```
    ///
    /// ## Errors
    /// Returns a [`ParseError`] if the string is not a valid JSON Pointer.
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        if s.is_empty() {
            return Ok(Self::root());
        }
        Validator::validate(s)?;
        Ok(Self {
            tokens: s
                .split('/')
                .skip(1)
                .map(|t| Token::from_encoded_unchecked(t).into_owned())
                .collect(),
        })
    }

    /// Like [`Self::parse`], except that an absent string is the root pointer.
    ///
    /// ## Errors
    /// Returns a [`ParseError`] if the string is present and malformed.
    pub fn parse_opt(s: Option<&str>) -> Result<Self, ParseError> {
        s.map_or_else(|| Ok(Self::root()), Self::parse)
    }

    /// Returns `true` if this is the root pointer.
    pub fn is_root(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Returns the number of tokens in the `Pointer`.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Alias for [`Self::is_root`].
    pub fn is_empty(&self) -> bool {
        self.is_root()
    }

    /// Returns an iterator of the `Token`s in the `Pointer`.
    pub fn tokens(&self) -> slice::Iter<'_, Token<'static>> {
        self.tokens.iter()
    }

    /// Returns the tokens as a slice.
    pub fn as_slice(&self) -> &[Token<'static>] {
        &self.tokens
    }

    /// Returns the first `Token`, if any.
    pub fn first(&self) -> Option<&Token<'static>> {
        self.tokens.first()
    }

    /// Returns the last `Token`, if any.
    pub fn last(&self) -> Option<&Token<'static>> {
        self.tokens.last()
    }

    /// Attempts to get a `Token` by its position.
    ///
    /// ## Example
    /// ```rust
    /// use jsonptr_eval::Pointer;
    ///
    /// let ptr = Pointer::from_tokens(["foo", "bar"]);
    /// assert_eq!(ptr.get(1).unwrap(), "bar");
    /// assert!(ptr.get(2).is_none());
    /// ```
    pub fn get(&self, index: usize) -> Option<&Token<'static>> {
        self.tokens.get(index)
    }

    /// Splits the `Pointer` into its first `Token` and the remaining tokens.
    pub fn split_front(&self) -> Option<(&Token<'static>, &[Token<'static>])> {
        self.tokens.split_first()
    }

    /// Splits the `Pointer` into its leading tokens and the last `Token`.
    pub fn split_back(&self) -> Option<(&[Token<'static>], &Token<'static>)> {
        self.tokens.split_last().map(|(last, front)| (front, last))
    }

    /// Returns the `Pointer` to the parent location, or `None` for root.
    pub fn parent(&self) -> Option<Pointer> {
        self.split_back().map(|(front, _)| Self {
            tokens: front.to_vec(),
        })
    }

    /// Pushes a `Token` onto the back of this `Pointer`.
    pub fn push_back<'t>(&mut self, token: impl Into<Token<'t>>) {
        self.tokens.push(token.into().into_owned());
    }

    /// Pushes a `Token` onto the front of this `Pointer`.
    pub fn push_front<'t>(&mut self, token: impl Into<Token<'t>>) {
        self.tokens.insert(0, token.into().into_owned());
    }

    /// Removes and returns the last `Token`, if any.
    pub fn pop_back(&mut self) -> Option<Token<'static>> {
        self.tokens.pop()
    }

    /// Removes and returns the first `Token`, if any.
    pub fn pop_front(&mut self) -> Option<Token<'static>> {
        if self.tokens.is_empty() {
            None
        } else {
            Some(self.tokens.remove(0))
        }
    }

    /// Returns a new `Pointer` with the tokens of `other` appended to `self`.
    pub fn concat(&self, other: &Pointer) -> Pointer {
        let mut tokens = Vec::with_capacity(self.len() + other.len());
        tokens.extend_from_slice(&self.tokens);
        tokens.extend_from_slice(&other.tokens);
        Self { tokens }
    }

    /// Returns `true` if `prefix` is a leading sequence of this pointer's
    /// tokens.
    pub fn starts_with(&self, prefix: &Pointer) -> bool {
        self.tokens.starts_with(&prefix.tokens)
    }

    /// Byte offset, within the encoded form, of the `/` preceding the token
    /// at `position`.
    ///
    /// ```text
    /// "/foo/bar/baz"
    ///      ↑
    ///      4 (position 1)
    /// ```
    pub fn offset_of(&self, position: usize) -> usize {
        self.tokens
            .iter()
            .take(position)
            .map(|t| t.encoded_len() + 1)
            .sum()
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            write!(f, "/{}", token.encoded())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pointer({:?})", self.to_string())
    }
}

impl FromStr for Pointer {
    type Err = ParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Pointer {
    type Error = ParseError;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<String> for Pointer {
    type Error = ParseError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl<'t> From<Token<'t>> for Pointer {
    fn from(t: Token<'t>) -> Self {
        Self {
            tokens: alloc::vec![t.into_owned()],
        }
    }
}

impl From<usize> for Pointer {
    fn from(value: usize) -> Self {
        Token::from(value).into()
    }
}

impl<'t> FromIterator<Token<'t>> for Pointer {
    fn from_iter<I: IntoIterator<Item = Token<'t>>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().map(Token::into_owned).collect(),
        }
    }
}

impl<'p> IntoIterator for &'p Pointer {
    type Item = &'p Token<'static>;
    type IntoIter = slice::Iter<'p, Token<'static>>;
    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

impl PartialEq<str> for Pointer {
    fn eq(&self, other: &str) -> bool {
        self.to_string() == other
    }
}

impl PartialEq<&str> for Pointer {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

impl Serialize for Pointer {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Pointer {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Pointer::parse(&s).map_err(de::Error::custom)
    }
}

/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔══════════════════════════════════════════════════════════════════════════════╗
║                                                                              ║
║                                  Validator                                   ║
║                                 ¯¯¯¯¯¯¯¯¯¯¯                                  ║
╚══════════════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/

/// Validates encoded pointer text before anything is decoded.
pub(crate) struct Validator;

impl Validator {
    /// Checks the leading slash and then the `~` escapes of every token,
    /// returning the first problem found.
    pub(crate) fn validate(s: &str) -> Result<(), ParseError> {
        let Some(body) = s.strip_prefix('/') else {
            return Err(ParseError::NoLeadingSlash);
        };
        let mut offset = 0;
        for token in body.split('/') {
            validate_encoded(token)
                .map_err(|source| ParseError::InvalidEncoding { offset, source })?;
            offset += token.len() + 1;
        }
        Ok(())
    }
}

/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔══════════════════════════════════════════════════════════════════════════════╗
║                                                                              ║
║                                  ParseError                                  ║
║                                 ¯¯¯¯¯¯¯¯¯¯¯¯                                 ║
╚══════════════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/

/// Indicates that a `Pointer` was malformed and unable to be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A non-empty `Pointer` did not start with a slash (`'/'`).
    NoLeadingSlash,

    /// `Pointer` contained invalid encoding (e.g. `~` not followed by `0` or
    /// `1`).
    InvalidEncoding {
        /// Offset of the `/` which begins the token containing the invalid
        /// encoding
        offset: usize,
        /// The source `InvalidEncodingError`
        source: InvalidEncodingError,
    },
}

impl ParseError {
    /// Returns `true` if this error is `NoLeadingSlash`.
    pub fn is_no_leading_slash(&self) -> bool {
        matches!(self, Self::NoLeadingSlash)
    }

    /// Returns `true` if this error is `InvalidEncoding`.
    pub fn is_invalid_encoding(&self) -> bool {
        matches!(self, Self::InvalidEncoding { .. })
    }

    /// Offset of the partial pointer starting with the token which caused the
    /// error.
    /// ```text
    /// "/foo/invalid~tilde/invalid"
    ///      ↑
    ///      4
    /// ```
    /// ```
    /// # use jsonptr_eval::Pointer;
    /// let err = Pointer::parse("/foo/invalid~tilde/invalid").unwrap_err();
    /// assert_eq!(err.pointer_offset(), 4)
    /// ```
    pub fn pointer_offset(&self) -> usize {
        match self {
            Self::NoLeadingSlash => 0,
            Self::InvalidEncoding { offset, .. } => *offset,
        }
    }

    /// Offset of the invalid encoding from within its (encoded) token.
    /// ```text
    /// "/foo/invalid~tilde/invalid"
    ///               ↑
    ///               7
    /// ```
    /// ```
    /// # use jsonptr_eval::Pointer;
    /// let err = Pointer::parse("/foo/invalid~tilde/invalid").unwrap_err();
    /// assert_eq!(err.source_offset(), 7)
    /// ```
    pub fn source_offset(&self) -> usize {
        match self {
            Self::NoLeadingSlash => 0,
            Self::InvalidEncoding { source, .. } => source.offset,
        }
    }

    /// Offset of the first invalid encoding from within the pointer.
    /// ```text
    /// "/foo/invalid~tilde/invalid"
    ///              ↑
    ///             12
    /// ```
    /// ```
    /// # use jsonptr_eval::Pointer;
    /// let err = Pointer::parse("/foo/invalid~tilde/invalid").unwrap_err();
    /// assert_eq!(err.complete_offset(), 12)
    /// ```
    pub fn complete_offset(&self) -> usize {
        match self {
            Self::NoLeadingSlash => 0,
            // the `+ 1` steps over the token's leading slash
            Self::InvalidEncoding { offset, source } => offset + 1 + source.offset,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoLeadingSlash => {
                write!(f, "json pointer is malformed as it does not start with a slash ('/')")
            }
            Self::InvalidEncoding { offset, .. } => {
                write!(
                    f,
                    "json pointer is malformed as the token starting at offset {offset} contains invalid encoding"
                )
            }
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidEncoding { source, .. } => Some(source),
            Self::NoLeadingSlash => None,
        }
    }
}
