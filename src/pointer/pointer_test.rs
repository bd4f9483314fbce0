use super::ParseError;
use crate::{InvalidEncodingError, Pointer, Token};
use quickcheck_macros::quickcheck;

#[test]
fn rfc_examples_parse() {
    let cases: &[(&str, &[&str])] = &[
        ("", &[]),
        ("/foo", &["foo"]),
        ("/foo/0", &["foo", "0"]),
        ("/", &[""]),
        ("/a~1b", &["a/b"]),
        ("/c%d", &["c%d"]),
        ("/e^f", &["e^f"]),
        ("/g|h", &["g|h"]),
        ("/i\\j", &["i\\j"]),
        ("/k\"l", &["k\"l"]),
        ("/ ", &[" "]),
        ("/m~0n", &["m~n"]),
    ];
    for (input, expected) in cases {
        let ptr = Pointer::parse(input).unwrap();
        let tokens: Vec<&str> = ptr.tokens().map(Token::decoded).collect();
        assert_eq!(&tokens, expected, "parsing {input:?}");
    }
}

#[test]
fn parse_two_segments() {
    let ptr = Pointer::parse("/a/b").unwrap();
    assert_eq!(ptr.len(), 2);
    assert_eq!(ptr, Pointer::from_tokens(["a", "b"]));
}

#[test]
fn parse_empty_and_absent() {
    assert!(Pointer::parse("").unwrap().is_root());
    assert!(Pointer::parse_opt(None).unwrap().is_root());
    assert_eq!(
        Pointer::parse_opt(Some("/x")).unwrap(),
        Pointer::from_tokens(["x"])
    );
    assert!(Pointer::parse_opt(Some("x")).is_err());
}

#[test]
fn parse_escape_order() {
    let tokens = |s| {
        Pointer::parse(s)
            .unwrap()
            .tokens()
            .map(|t| t.decoded().to_owned())
            .collect::<Vec<_>>()
    };
    assert_eq!(tokens("/a~1b"), ["a/b"]);
    assert_eq!(tokens("/a~0b"), ["a~b"]);
    assert_eq!(tokens("/a~01"), ["a~1"]);
    assert_eq!(tokens("/~0~1/~1~0"), ["~/", "/~"]);
    assert_eq!(tokens("//"), ["", ""]);
}

#[test]
fn parse_missing_leading_slash() {
    assert_eq!(Pointer::parse("a/b"), Err(ParseError::NoLeadingSlash));
    assert_eq!(Pointer::parse("#/a"), Err(ParseError::NoLeadingSlash));
    assert_eq!(Pointer::parse("a~2b"), Err(ParseError::NoLeadingSlash));
}

#[test]
fn parse_invalid_encoding() {
    assert_eq!(
        Pointer::parse("/a~2b"),
        Err(ParseError::InvalidEncoding {
            offset: 0,
            source: InvalidEncodingError { offset: 1 }
        })
    );
    assert_eq!(
        Pointer::parse("/foo/bar~"),
        Err(ParseError::InvalidEncoding {
            offset: 4,
            source: InvalidEncodingError { offset: 3 }
        })
    );
    // the whole input is validated, including tokens after a valid one
    assert!(Pointer::parse("/ok/~0/also~ok").unwrap_err().is_invalid_encoding());
}

#[test]
fn parse_error_offsets() {
    let err = Pointer::parse("/foo/invalid~tilde/invalid").unwrap_err();
    assert_eq!(err.pointer_offset(), 4);
    assert_eq!(err.source_offset(), 7);
    assert_eq!(err.complete_offset(), 12);

    let err = Pointer::parse("nope").unwrap_err();
    assert_eq!(err.pointer_offset(), 0);
    assert_eq!(err.complete_offset(), 0);
}

#[test]
fn parse_error_display_and_source() {
    use std::error::Error;
    let err = Pointer::parse("foo").unwrap_err();
    assert_eq!(
        err.to_string(),
        "json pointer is malformed as it does not start with a slash ('/')"
    );
    assert!(err.source().is_none());

    let err = Pointer::parse("/foo/b~r").unwrap_err();
    assert_eq!(
        err.to_string(),
        "json pointer is malformed as the token starting at offset 4 contains invalid encoding"
    );
    assert!(err.source().unwrap().is::<InvalidEncodingError>());
}

#[test]
fn formatting() {
    assert_eq!(Pointer::from_tokens(["foo", "bar"]), "/foo/bar");
    assert_eq!(
        Pointer::from_tokens(["~/foo", "~bar", "/baz"]),
        "/~0~1foo/~0bar/~1baz"
    );
    assert_eq!(Pointer::from_tokens(["field", "", "baz"]), "/field//baz");
    assert_eq!(Pointer::root(), "");
    assert_eq!(
        format!("{:?}", Pointer::from_tokens(["a"])),
        "Pointer(\"/a\")"
    );
}

#[test]
fn push_pop() {
    let mut ptr = Pointer::default();
    assert!(ptr.is_root());

    ptr.push_back("foo");
    ptr.push_back("bar");
    ptr.push_back("/baz");
    assert_eq!(ptr, "/foo/bar/~1baz");

    ptr.push_front("top");
    assert_eq!(ptr, "/top/foo/bar/~1baz");
    assert_eq!(ptr.len(), 4);

    assert_eq!(ptr.pop_front(), Some(Token::new("top")));
    assert_eq!(ptr.pop_back(), Some(Token::new("/baz")));
    assert_eq!(ptr, "/foo/bar");

    ptr.pop_back();
    ptr.pop_back();
    assert!(ptr.is_root());
    assert_eq!(ptr.pop_back(), None);
    assert_eq!(ptr.pop_front(), None);
}

#[test]
fn first_last_get() {
    let ptr = Pointer::parse("/foo/bar/-").unwrap();
    assert_eq!(ptr.first().unwrap(), "foo");
    assert_eq!(ptr.last().unwrap(), "-");
    assert_eq!(ptr.get(1).unwrap(), "bar");
    assert!(ptr.get(3).is_none());
    assert!(Pointer::root().first().is_none());
}

#[test]
fn split_and_parent() {
    let ptr = Pointer::parse("/a/b/c").unwrap();
    let (head, tail) = ptr.split_front().unwrap();
    assert_eq!(head, "a");
    assert_eq!(tail.len(), 2);

    let (front, last) = ptr.split_back().unwrap();
    assert_eq!(front.len(), 2);
    assert_eq!(last, "c");

    assert_eq!(ptr.parent().unwrap(), "/a/b");
    assert_eq!(Pointer::parse("/a").unwrap().parent().unwrap(), "");
    assert!(Pointer::root().parent().is_none());
}

#[test]
fn concat_and_starts_with() {
    let base = Pointer::parse("/a/b").unwrap();
    let child = base.concat(&Pointer::parse("/c/0").unwrap());
    assert_eq!(child, "/a/b/c/0");
    assert!(child.starts_with(&base));
    assert!(child.starts_with(&Pointer::root()));
    assert!(!base.starts_with(&child));
    assert_eq!(base.concat(&Pointer::root()), base);
}

#[test]
fn offset_of() {
    let ptr = Pointer::parse("/foo/a~1b/baz").unwrap();
    assert_eq!(ptr.offset_of(0), 0);
    assert_eq!(ptr.offset_of(1), 4);
    assert_eq!(ptr.offset_of(2), 9);
}

#[test]
fn conversions() {
    assert_eq!(Pointer::from(3usize), "/3");
    assert_eq!(Pointer::from(Token::new("a/b")), "/a~1b");
    assert_eq!("/x/y".parse::<Pointer>().unwrap(), "/x/y");
    assert_eq!(Pointer::try_from(String::from("/x")).unwrap(), "/x");
    let collected: Pointer = ["p", "q"].into_iter().map(Token::new).collect();
    assert_eq!(collected, "/p/q");
    let decoded: Vec<&str> = (&collected).into_iter().map(Token::decoded).collect();
    assert_eq!(decoded, ["p", "q"]);
}

#[test]
fn serde() {
    let ptr = Pointer::from_tokens(["a/b", "0"]);
    let json = serde_json::to_string(&ptr).unwrap();
    assert_eq!(json, "\"/a~1b/0\"");
    let back: Pointer = serde_json::from_str(&json).unwrap();
    assert_eq!(back, ptr);

    let err = serde_json::from_str::<Pointer>("\"no-slash\"").unwrap_err();
    assert!(err.to_string().contains("does not start with a slash"));
}

#[quickcheck]
fn display_parse_roundtrip(ptr: Pointer) -> bool {
    Pointer::parse(&ptr.to_string()).unwrap() == ptr
}

#[quickcheck]
fn plain_join_roundtrip(segments: Vec<String>) -> bool {
    let segments: Vec<String> = segments
        .into_iter()
        .map(|s| s.replace(['/', '~'], ""))
        .collect();
    let joined: String = segments.iter().map(|s| format!("/{s}")).collect();
    let ptr = Pointer::parse(&joined).unwrap();
    ptr.tokens().map(Token::decoded).eq(segments.iter().map(String::as_str))
}
