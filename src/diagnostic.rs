//! Error reporting data structures and miette integration.
//!
//! Errors from parsing and resolution only carry offsets. A [`Report`] pairs
//! an error with the pointer string it was produced for, so that the failing
//! span can be labeled when rendered.
//!
//! ```
//! use jsonptr_eval::{diagnostic::Diagnose, Pointer, Resolve};
//! use serde_json::json;
//!
//! let input = "/foo/ba~r";
//! let report = Pointer::parse(input).diagnose(input).unwrap_err();
//! assert_eq!(report.subject(), "/foo/ba~r");
//! assert_eq!(report.labels().unwrap().next().unwrap().offset(), 7);
//!
//! let data = json!({ "foo": { "bar": 1 } });
//! let ptr = Pointer::parse("/foo/qux").unwrap();
//! let report = data.resolve(&ptr).diagnose_with(|| ptr.to_string()).unwrap_err();
//! assert!(report.original().is_not_found());
//! ```

use crate::{ParseError, ResolveError};
use alloc::{boxed::Box, string::String};
use core::{fmt, ops::Deref};

/// Implemented by errors which can be converted into a [`Report`].
pub trait Diagnostic: Sized {
    /// The value which caused the error.
    type Subject: Deref;

    /// Combine the error with its subject to generate a [`Report`].
    fn into_report(self, subject: impl Into<Self::Subject>) -> Report<Self> {
        Report {
            source: self,
            subject: subject.into(),
        }
    }

    /// The docs.rs URL for this error
    fn url() -> &'static str;

    /// Returns the labels for the given subject if applicable.
    fn labels(&self, subject: &Self::Subject) -> Option<Box<dyn Iterator<Item = Label>>>;
}

/// A label for a span within a json pointer or malformed string.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Label {
    text: String,
    offset: usize,
    len: usize,
}

impl Label {
    /// Creates a new instance of a [`Label`] from its parts
    pub fn new(text: impl Into<String>, offset: usize, len: usize) -> Self {
        Self {
            text: text.into(),
            offset,
            len,
        }
    }

    /// The text of the label.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Byte offset of the labeled span.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Length in bytes of the labeled span.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the labeled span is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(feature = "miette")]
impl From<Label> for miette::LabeledSpan {
    fn from(value: Label) -> Self {
        miette::LabeledSpan::new(Some(value.text), value.offset, value.len)
    }
}

/// An error wrapper which includes the subject of the failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report<D: Diagnostic> {
    source: D,
    subject: D::Subject,
}

impl<D: Diagnostic> Report<D> {
    /// The value which caused the error.
    pub fn subject(&self) -> &<D::Subject as Deref>::Target {
        &self.subject
    }

    /// The error which occurred.
    pub fn original(&self) -> &D {
        &self.source
    }

    /// The labels of the error, positioned within the subject.
    pub fn labels(&self) -> Option<Box<dyn Iterator<Item = Label>>> {
        self.source.labels(&self.subject)
    }

    /// The original parts of the [`Report`].
    pub fn decompose(self) -> (D, D::Subject) {
        (self.source, self.subject)
    }
}

impl<D: Diagnostic> Deref for Report<D> {
    type Target = D;

    fn deref(&self) -> &Self::Target {
        &self.source
    }
}

impl<D: Diagnostic + fmt::Display> fmt::Display for Report<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.source, f)
    }
}

impl<D> std::error::Error for Report<D>
where
    D: Diagnostic + fmt::Debug + std::error::Error + 'static,
    D::Subject: fmt::Debug,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

#[cfg(feature = "miette")]
impl<D> miette::Diagnostic for Report<D>
where
    D: Diagnostic + fmt::Debug + std::error::Error + 'static,
    D::Subject: fmt::Debug + miette::SourceCode,
{
    fn url<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(D::url()))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.subject)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = miette::LabeledSpan> + '_>> {
        Some(Box::new(D::labels(self, &self.subject)?.map(Into::into)))
    }
}

macro_rules! impl_diagnostic_url {
    (enum $type:ident) => {
        $crate::diagnostic::impl_diagnostic_url!("enum", "", $type)
    };
    (struct $type:ident) => {
        $crate::diagnostic::impl_diagnostic_url!("struct", "", $type)
    };
    ($kind:literal, $mod:expr, $type:ident) => {
        concat!(
            "https://docs.rs/jsonptr-eval/",
            env!("CARGO_PKG_VERSION"),
            "/jsonptr_eval",
            $mod,
            "/",
            $kind,
            ".",
            stringify!($type),
            ".html",
        )
    };
}
pub(crate) use impl_diagnostic_url;

impl Diagnostic for ParseError {
    type Subject = String;

    fn url() -> &'static str {
        impl_diagnostic_url!(enum ParseError)
    }

    fn labels(&self, subject: &Self::Subject) -> Option<Box<dyn Iterator<Item = Label>>> {
        let label = match self {
            Self::NoLeadingSlash => Label::new("must start with a slash ('/')", 0, 0),
            Self::InvalidEncoding { .. } => {
                let offset = self.complete_offset();
                // the tilde and the character which follows it, if any
                let len = subject
                    .get(offset..)?
                    .chars()
                    .take(2)
                    .map(char::len_utf8)
                    .sum();
                Label::new("'~' must be followed by '0' or '1'", offset, len)
            }
        };
        Some(Box::new(core::iter::once(label)))
    }
}

impl Diagnostic for ResolveError {
    type Subject = String;

    fn url() -> &'static str {
        impl_diagnostic_url!(enum ResolveError)
    }

    fn labels(&self, subject: &Self::Subject) -> Option<Box<dyn Iterator<Item = Label>>> {
        let offset = self.offset();
        let rest = subject.get(offset..)?.strip_prefix('/')?;
        let len = rest.find('/').unwrap_or(rest.len());
        let text = match self {
            Self::FailedToParseIndex { .. } => String::from("not an array index"),
            Self::OutOfBounds { source, .. } => {
                format!("out of bounds (array length: {})", source.length)
            }
            Self::NotFound { .. } => String::from("not found"),
            Self::Unreachable { .. } => String::from("cannot index into a scalar value"),
            Self::Custom { message, .. } => message.clone(),
        };
        Some(Box::new(core::iter::once(Label::new(text, offset + 1, len))))
    }
}

/// Converts the error of a `Result` into a [`Report`].
pub trait Diagnose<T> {
    /// The error type which is reported on.
    type Error: Diagnostic;

    /// Attaches `subject` to the error, if any.
    #[allow(clippy::missing_errors_doc)]
    fn diagnose(
        self,
        subject: impl Into<<Self::Error as Diagnostic>::Subject>,
    ) -> Result<T, Report<Self::Error>>;

    /// Attaches the subject produced by `f` to the error, if any. `f` is only
    /// called on failure.
    #[allow(clippy::missing_errors_doc)]
    fn diagnose_with<F, S>(self, f: F) -> Result<T, Report<Self::Error>>
    where
        F: FnOnce() -> S,
        S: Into<<Self::Error as Diagnostic>::Subject>;
}

impl<T, E> Diagnose<T> for Result<T, E>
where
    E: Diagnostic,
{
    type Error = E;

    fn diagnose(
        self,
        subject: impl Into<<Self::Error as Diagnostic>::Subject>,
    ) -> Result<T, Report<Self::Error>> {
        self.map_err(|error| error.into_report(subject))
    }

    fn diagnose_with<F, S>(self, f: F) -> Result<T, Report<Self::Error>>
    where
        F: FnOnce() -> S,
        S: Into<<Self::Error as Diagnostic>::Subject>,
    {
        self.map_err(|error| error.into_report(f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Evaluator, Pointer, Resolve};
    use alloc::vec::Vec;
    use serde_json::json;

    fn labels<D: Diagnostic>(report: &Report<D>) -> Vec<Label> {
        report
            .labels()
            .map(|labels| labels.collect())
            .unwrap_or_default()
    }

    #[test]
    fn parse_error_labels() {
        let invalid = "/foo/bar/invalid~3~encoding/cannot/reach";
        let report = Pointer::parse(invalid).diagnose(invalid).unwrap_err();
        assert_eq!(report.subject(), invalid);
        assert!(report.is_invalid_encoding());
        assert_eq!(
            labels(&report),
            [Label::new("'~' must be followed by '0' or '1'", 16, 2)]
        );

        let report = Pointer::parse("/trailing~").diagnose("/trailing~").unwrap_err();
        assert_eq!(labels(&report)[0].offset(), 9);
        assert_eq!(labels(&report)[0].len(), 1);

        let report = Pointer::parse("foo").diagnose("foo").unwrap_err();
        let label = &labels(&report)[0];
        assert_eq!(label.offset(), 0);
        assert!(label.is_empty());
        assert_eq!(label.text(), "must start with a slash ('/')");
    }

    #[test]
    fn resolve_error_labels() {
        let data = json!({ "foo": { "bar": [1, 2] }, "s": "leaf" });
        let cases = [
            ("/foo/qux", 5, 3, "not found"),
            ("/foo/bar/7", 9, 1, "out of bounds (array length: 2)"),
            ("/foo/bar/x", 9, 1, "not an array index"),
            ("/s/a~1b/c", 3, 4, "cannot index into a scalar value"),
        ];
        for (input, offset, len, text) in cases {
            let ptr = Pointer::parse(input).unwrap();
            let report = data.resolve(&ptr).diagnose(input).unwrap_err();
            assert_eq!(labels(&report), [Label::new(text, offset, len)], "{input}");
        }

        let ptr = Pointer::parse("/foo/bar/-").unwrap();
        let report = Evaluator::new(crate::recover::from_fn(
            |miss: crate::recover::Unresolved<'_, serde_json::Value>| Err(miss.fail("no appends")),
        ))
        .evaluate(&data, &ptr)
        .diagnose_with(|| ptr.to_string())
        .unwrap_err();
        assert!(report.is_custom());
        assert_eq!(labels(&report), [Label::new("no appends", 9, 1)]);
    }

    #[test]
    fn mismatched_subject_has_no_labels() {
        let report = ResolveError::NotFound { offset: 40 }.into_report("/short");
        assert!(report.labels().is_none());
    }

    #[test]
    fn report_parts() {
        use std::error::Error as _;
        let report = Pointer::parse("nope").diagnose("nope").unwrap_err();
        assert_eq!(
            report.to_string(),
            "json pointer is malformed as it does not start with a slash ('/')"
        );
        assert!(report.source().unwrap().is::<ParseError>());
        let (err, subject) = report.decompose();
        assert_eq!(err, ParseError::NoLeadingSlash);
        assert_eq!(subject, "nope");
    }

    #[test]
    fn urls() {
        assert!(ParseError::url().starts_with("https://docs.rs/jsonptr-eval/"));
        assert!(ParseError::url().ends_with("/jsonptr_eval/enum.ParseError.html"));
        assert!(ResolveError::url().ends_with("/jsonptr_eval/enum.ResolveError.html"));
    }

    #[test]
    #[cfg(feature = "miette")]
    fn miette_rendering() {
        let invalid = "/foo/bar/invalid~3~encoding/cannot/reach";
        let report = Pointer::parse(invalid).diagnose(invalid).unwrap_err();
        let spans: Vec<_> = miette::Diagnostic::labels(&report).unwrap().collect();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].offset(), 16);
        assert_eq!(spans[0].len(), 2);
        let rendered = format!("{:?}", miette::Report::from(report));
        assert!(rendered.contains("json pointer is malformed"));
    }
}
