//! Line grammar.
//!
//! Every rule here matches exactly one trimmed line of a changelog. Callers
//! run them with [`Parser::parse`], which also requires the whole line to be
//! consumed, so each rule is implicitly anchored at both ends.

use winnow::ascii::digit1;
use winnow::combinator::{alt, delimited, opt, preceded};
use winnow::token::{one_of, rest, take_till, take_while};
use winnow::{ModalResult, Parser};

pub(crate) const UNRELEASED: &str = "Unreleased";

fn is_whitespace(c: char) -> bool {
    c.is_whitespace()
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

// <prerelease-char> ::= <alphanumeric> | "_" | "."
fn is_prerelease(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

// <text>            ::= <any UTF8-octets>+
fn text<'i>(i: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., |_: char| true).parse_next(i)
}

// <title>           ::= "# ", <text>
pub(crate) fn title<'i>(i: &mut &'i str) -> ModalResult<&'i str> {
    preceded("# ", text).parse_next(i)
}

// <version-number>  ::= <digits>, ".", <digits>, ".", <digits>, ["-", <prerelease-char>+]
pub(crate) fn version_number<'i>(i: &mut &'i str) -> ModalResult<&'i str> {
    (
        digit1,
        '.',
        digit1,
        '.',
        digit1,
        opt(('-', take_while(1.., is_prerelease))),
    )
        .take()
        .parse_next(i)
}

// <version-label>   ::= "Unreleased" | <version-number>
pub(crate) fn version_label<'i>(i: &mut &'i str) -> ModalResult<&'i str> {
    alt((UNRELEASED, version_number)).parse_next(i)
}

// <date>            ::= <digit>{4}, "-", <digit>{2}, "-", <digit>{2}
pub(crate) fn date<'i>(i: &mut &'i str) -> ModalResult<&'i str> {
    (
        take_while(4, is_digit),
        '-',
        take_while(2, is_digit),
        '-',
        take_while(2, is_digit),
    )
        .take()
        .parse_next(i)
}

// /* A dangling " -" without a date is tolerated for hand-edited files */
// <version-header>  ::= "## [", <version-label>, "]", [" -", [" ", <date>]]
pub(crate) fn version_header<'i>(i: &mut &'i str) -> ModalResult<(&'i str, Option<&'i str>)> {
    (
        delimited("## [", version_label, ']'),
        opt(preceded(" -", opt(preceded(' ', date)))).map(Option::flatten),
    )
        .parse_next(i)
}

// <link>            ::= "[", <any UTF8-octets except "]">+, "]:", [<whitespace>, <text>*]
pub(crate) fn link<'i>(i: &mut &'i str) -> ModalResult<(&'i str, &'i str)> {
    (
        delimited('[', take_till(1.., ']'), "]:"),
        opt(preceded(one_of(is_whitespace), rest)).map(Option::unwrap_or_default),
    )
        .parse_next(i)
}

// <category-header> ::= "###", <whitespace>, <text>
pub(crate) fn category_header<'i>(i: &mut &'i str) -> ModalResult<&'i str> {
    preceded(("###", one_of(is_whitespace)), text).parse_next(i)
}

// <bullet>          ::= "- ", <text>
pub(crate) fn bullet<'i>(i: &mut &'i str) -> ModalResult<&'i str> {
    preceded("- ", text).parse_next(i)
}

// <reference>       ::= "[#", <digits>, "]"
pub(crate) fn reference(i: &mut &str) -> ModalResult<u64> {
    delimited("[#", digit1.try_map(str::parse), ']').parse_next(i)
}

// <issue-id>        ::= "#", <digits>
pub(crate) fn issue_id(i: &mut &str) -> ModalResult<u64> {
    preceded('#', digit1.try_map(str::parse)).parse_next(i)
}

// <issue-path>      ::= "/issues/", <digits>
pub(crate) fn issue_path<'i>(i: &mut &'i str) -> ModalResult<&'i str> {
    preceded("/issues/", digit1).parse_next(i)
}

/// Split bullet text into its message and the ids of every `[#N]` marker in
/// it, in the order they appear.
pub(crate) fn extract_references(text: &str) -> (String, Vec<u64>) {
    let mut message = String::with_capacity(text.len());
    let mut references = Vec::new();

    let mut remaining = text;
    while let Some(start) = remaining.find("[#") {
        message.push_str(&remaining[..start]);
        let mut candidate = &remaining[start..];
        match reference.parse_next(&mut candidate) {
            Ok(id) => {
                references.push(id);
                remaining = candidate;
            }
            Err(_) => {
                message.push_str("[#");
                remaining = &remaining[start + 2..];
            }
        }
    }
    message.push_str(remaining);

    (message.trim().to_owned(), references)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title() {
        let mut p = title;

        // valid
        assert_eq!(p.parse("# Changelog").unwrap(), "Changelog");
        assert_eq!(p.parse("# Release notes").unwrap(), "Release notes");
        assert_eq!(p.parse("# #").unwrap(), "#");

        // invalid
        assert!(p.parse("").is_err());
        assert!(p.parse("#").is_err());
        assert!(p.parse("# ").is_err());
        assert!(p.parse("#Changelog").is_err());
        assert!(p.parse("## Changelog").is_err());
    }

    #[test]
    fn test_version_number() {
        let mut p = version_number;

        // valid
        assert_eq!(p.parse("1.2.3").unwrap(), "1.2.3");
        assert_eq!(p.parse("10.20.30").unwrap(), "10.20.30");
        assert_eq!(p.parse("1.0.0-beta.1").unwrap(), "1.0.0-beta.1");
        assert_eq!(p.parse("1.0.0-rc_2").unwrap(), "1.0.0-rc_2");

        // invalid
        assert!(p.parse("").is_err());
        assert!(p.parse("1.2").is_err());
        assert!(p.parse("v1.2.3").is_err());
        assert!(p.parse("1.2.3-").is_err());
        assert!(p.parse("1.2.3+build").is_err());
        assert!(p.parse("Unreleased").is_err());
    }

    #[test]
    fn test_version_header() {
        let mut p = version_header;

        // valid
        assert_eq!(p.parse("## [Unreleased]").unwrap(), ("Unreleased", None));
        assert_eq!(
            p.parse("## [1.2.0] - 2023-05-01").unwrap(),
            ("1.2.0", Some("2023-05-01"))
        );
        assert_eq!(p.parse("## [1.2.0] -").unwrap(), ("1.2.0", None));
        assert_eq!(
            p.parse("## [2.0.0-alpha.3] - 2024-12-31").unwrap(),
            ("2.0.0-alpha.3", Some("2024-12-31"))
        );

        // invalid
        assert!(p.parse("## [unreleased]").is_err());
        assert!(p.parse("## [1.2]").is_err());
        assert!(p.parse("## 1.2.0").is_err());
        assert!(p.parse("### [1.2.0]").is_err());
        assert!(p.parse("## [1.2.0] - 23-5-1").is_err());
        assert!(p.parse("## [1.2.0] - 2023-05-01 (yanked)").is_err());
        assert!(p.parse("## [1.2.0]-2023-05-01").is_err());
    }

    #[test]
    fn test_link() {
        let mut p = link;

        // valid
        assert_eq!(
            p.parse("[1.0.0]: https://example.com").unwrap(),
            ("1.0.0", "https://example.com")
        );
        assert_eq!(p.parse("[Unreleased]:").unwrap(), ("Unreleased", ""));
        assert_eq!(p.parse("[#12]: x").unwrap(), ("#12", "x"));

        // invalid
        assert!(p.parse("").is_err());
        assert!(p.parse("[]: x").is_err());
        assert!(p.parse("[1.0.0] x").is_err());
        assert!(p.parse("[1.0.0]:x").is_err());
        assert!(p.parse("1.0.0: x").is_err());
    }

    #[test]
    fn test_category_header() {
        let mut p = category_header;

        // valid
        assert_eq!(p.parse("### Added").unwrap(), "Added");
        assert_eq!(p.parse("###\tFixed").unwrap(), "Fixed");

        // invalid
        assert!(p.parse("###Added").is_err());
        assert!(p.parse("### ").is_err());
        assert!(p.parse("## Added").is_err());
    }

    #[test]
    fn test_bullet() {
        let mut p = bullet;

        // valid
        assert_eq!(p.parse("- foo").unwrap(), "foo");
        assert_eq!(p.parse("- foo [#1]").unwrap(), "foo [#1]");

        // invalid
        assert!(p.parse("-").is_err());
        assert!(p.parse("- ").is_err());
        assert!(p.parse("-foo").is_err());
        assert!(p.parse("* foo").is_err());
    }

    #[test]
    fn test_issue_reference() {
        assert_eq!(issue_id.parse("#42").unwrap(), 42);
        assert!(issue_id.parse("42").is_err());
        assert!(issue_id.parse("#").is_err());
        assert!(issue_id.parse("#99999999999999999999999").is_err());

        assert_eq!(issue_path.parse("/issues/42").unwrap(), "42");
        assert!(issue_path.parse("/pull/42").is_err());
        assert!(issue_path.parse("/issues/").is_err());
    }

    #[test]
    fn test_extract_references() {
        assert_eq!(
            extract_references("fix bug [#12]"),
            ("fix bug".to_owned(), vec![12])
        );
        assert_eq!(
            extract_references("[#3] fix [#1] bug [#2]"),
            ("fix  bug".to_owned(), vec![3, 1, 2])
        );
        assert_eq!(
            extract_references("keep [#abc] and [#"),
            ("keep [#abc] and [#".to_owned(), vec![])
        );
        assert_eq!(extract_references("[#7]"), (String::new(), vec![7]));
    }
}
