use crate::index::{Index, ParseIndexError};
use alloc::{borrow::Cow, string::String, vec::Vec};
use core::fmt;

const ENCODED_TILDE: &[u8] = b"~0";
const ENCODED_SLASH: &[u8] = b"~1";

const ENC_PREFIX: u8 = b'~';
const TILDE_ENC: u8 = b'0';
const SLASH_ENC: u8 = b'1';

/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔══════════════════════════════════════════════════════════════════════════════╗
║                                                                              ║
║                                    Token                                     ║
║                                   ¯¯¯¯¯¯¯                                    ║
╚══════════════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/

/// A `Token` is a single segment of a JSON [`Pointer`](crate::Pointer).
///
/// Tokens are stored decoded and are opaque until evaluation: the same token
/// may be an object key or, when matched against an array, an index or the
/// append marker `"-"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token<'a> {
    inner: Cow<'a, str>,
}

impl<'a> Token<'a> {
    /// Constructs a `Token` from a decoded string. Any content is allowed.
    ///
    /// # Examples
    ///
    /// ```
    /// # use jsonptr_eval::Token;
    /// assert_eq!(Token::new("/foo/~bar").encoded(), "~1foo~1~0bar");
    /// ```
    pub fn new(s: impl Into<Cow<'a, str>>) -> Self {
        Self { inner: s.into() }
    }

    /// Constructs a `Token` from an RFC 6901 encoded string, decoding it.
    ///
    /// To be valid, the string must not contain any `/` characters, and any `~`
    /// characters must be followed by either `0` or `1`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use jsonptr_eval::Token;
    /// assert_eq!(Token::from_encoded("~1foo~1~0bar").unwrap().decoded(), "/foo/~bar");
    /// assert_eq!(Token::from_encoded("a~01").unwrap().decoded(), "a~1");
    /// let err = Token::from_encoded("foo/oops~bar").unwrap_err();
    /// assert_eq!(err.offset, 3);
    /// ```
    ///
    /// ## Errors
    /// Returns `InvalidEncodingError` if the input string is not valid RFC
    /// 6901 encoding.
    pub fn from_encoded(s: &'a str) -> Result<Self, InvalidEncodingError> {
        validate_encoded(s)?;
        Ok(Self::from_encoded_unchecked(s))
    }

    /// Decodes a token which has already been validated.
    pub(crate) fn from_encoded_unchecked(s: &'a str) -> Self {
        Self { inner: decode(s) }
    }

    /// Converts into an owned copy of this token.
    pub fn into_owned(self) -> Token<'static> {
        Token {
            inner: Cow::Owned(self.inner.into_owned()),
        }
    }

    /// Returns the decoded string representation of the `Token`.
    pub fn decoded(&self) -> &str {
        &self.inner
    }

    /// Returns the RFC 6901 encoded representation of the `Token`.
    ///
    /// `~` is escaped before `/` so the output decodes back to the original.
    ///
    /// # Examples
    ///
    /// ```
    /// # use jsonptr_eval::Token;
    /// assert_eq!(Token::new("~1").encoded(), "~01");
    /// ```
    pub fn encoded(&self) -> Cow<'_, str> {
        let Some(i) = self.inner.bytes().position(|b| b == b'/' || b == b'~') else {
            return Cow::Borrowed(&self.inner);
        };
        let input = self.inner.as_bytes();
        let mut bytes = Vec::with_capacity(input.len() + 1);
        bytes.extend_from_slice(&input[..i]);
        for &b in &input[i..] {
            match b {
                b'/' => bytes.extend_from_slice(ENCODED_SLASH),
                b'~' => bytes.extend_from_slice(ENCODED_TILDE),
                other => bytes.push(other),
            }
        }
        // SAFETY: only ASCII bytes were replaced with ASCII sequences, so the
        // output remains valid UTF-8.
        Cow::Owned(unsafe { String::from_utf8_unchecked(bytes) })
    }

    /// Length in bytes of the RFC 6901 encoded representation, computed
    /// without encoding.
    ///
    /// ```
    /// # use jsonptr_eval::Token;
    /// assert_eq!(Token::new("a/b~").encoded_len(), 6);
    /// ```
    pub fn encoded_len(&self) -> usize {
        self.inner.len() + self.inner.bytes().filter(|&b| b == b'/' || b == b'~').count()
    }

    /// Attempts to parse the given `Token` as an array index.
    ///
    /// Per [RFC 6901](https://datatracker.ietf.org/doc/html/rfc6901#section-4),
    /// the acceptable values are `0`, non-negative integers without leading
    /// zeros, and `-`.
    ///
    /// ## Examples
    ///
    /// ```
    /// # use jsonptr_eval::{Index, Token};
    /// assert_eq!(Token::new("-").to_index(), Ok(Index::Next));
    /// assert_eq!(Token::new("0").to_index(), Ok(Index::Num(0)));
    /// assert!(Token::new("a").to_index().is_err());
    /// assert!(Token::new("01").to_index().is_err());
    /// ```
    /// ## Errors
    /// Returns [`ParseIndexError`] if the token is not a valid array index.
    pub fn to_index(&self) -> Result<Index, ParseIndexError> {
        self.try_into()
    }
}

/// Checks the `~` escapes of an encoded token, reporting the offset of the
/// first offending byte.
pub(crate) fn validate_encoded(s: &str) -> Result<(), InvalidEncodingError> {
    let mut escape_at = None;
    for (offset, b) in s.bytes().enumerate() {
        match b {
            b'/' => return Err(InvalidEncodingError { offset }),
            ENC_PREFIX if escape_at.is_none() => escape_at = Some(offset),
            TILDE_ENC | SLASH_ENC if escape_at.is_some() => escape_at = None,
            _ => {
                if let Some(offset) = escape_at {
                    return Err(InvalidEncodingError { offset });
                }
            }
        }
    }
    match escape_at {
        Some(offset) => Err(InvalidEncodingError { offset }),
        None => Ok(()),
    }
}

/// Replaces `~1` with `/` and then `~0` with `~`.
fn decode(s: &str) -> Cow<'_, str> {
    if s.contains('~') {
        Cow::Owned(s.replace("~1", "/").replace("~0", "~"))
    } else {
        Cow::Borrowed(s)
    }
}

macro_rules! impl_from_num {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Token<'static> {
                fn from(v: $ty) -> Self {
                    Token::new(alloc::string::ToString::to_string(&v))
                }
            }
        )*
    };
}
impl_from_num!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

impl<'a> From<&'a str> for Token<'a> {
    fn from(value: &'a str) -> Self {
        Token::new(value)
    }
}

impl<'a> From<&'a String> for Token<'a> {
    fn from(value: &'a String) -> Self {
        Token::new(value.as_str())
    }
}

impl From<String> for Token<'static> {
    fn from(value: String) -> Self {
        Token::new(value)
    }
}

impl<'a> From<&Token<'a>> for Token<'a> {
    fn from(value: &Token<'a>) -> Self {
        value.clone()
    }
}

impl PartialEq<str> for Token<'_> {
    fn eq(&self, other: &str) -> bool {
        self.inner == other
    }
}

impl PartialEq<&str> for Token<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.inner == *other
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.decoded())
    }
}

/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔══════════════════════════════════════════════════════════════════════════════╗
║                                                                              ║
║                             InvalidEncodingError                             ║
║                            ¯¯¯¯¯¯¯¯¯¯¯¯¯¯¯¯¯¯¯¯¯¯                            ║
╚══════════════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/

/// A token within a json pointer contained invalid encoding (`~` not followed
/// by `0` or `1`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidEncodingError {
    /// offset of the erroneous byte from within the `Token`
    pub offset: usize,
}

impl InvalidEncodingError {
    /// The byte offset of the first invalid encoding.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl fmt::Display for InvalidEncodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "json pointer is malformed due to invalid encoding ('~' not followed by '0' or '1')"
        )
    }
}

impl std::error::Error for InvalidEncodingError {}

/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔══════════════════════════════════════════════════════════════════════════════╗
║                                                                              ║
║                                    Tests                                     ║
║                                   ¯¯¯¯¯¯¯                                    ║
╚══════════════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/
