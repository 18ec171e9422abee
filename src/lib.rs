//! A parser and renderer for changelogs following [Keep a Changelog].
//!
//! [keep a changelog]: https://keepachangelog.com/en/1.0.0/
//!
//! The accepted grammar is strict: a title, the standard preamble, version
//! sections with a compare link each, and a trailing block of issue links.
//! Whatever [`Changelog::parse`] accepts, `Display` writes back out in the
//! same form, so a parsed changelog can be edited and saved without
//! disturbing the rest of the file.
//!
//! # Example
//!
//! ```rust
//! use keepachangelog::{Category, Changelog, Item, Remote, Service};
//!
//! let remote = Remote::from_git_remote("git@github.com:owner/repo.git", Service::GitHub);
//! assert_eq!(remote.url(), "https://github.com/owner/repo");
//!
//! // Start from the default document when the project has no changelog yet.
//! let text = Changelog::skeleton(remote.clone()).to_string();
//! assert!(text.ends_with("[Unreleased]: https://github.com/owner/repo\n"));
//!
//! let mut changelog = Changelog::parse(&text, remote.clone()).unwrap();
//!
//! // Log a fix under the upcoming release, citing issue 2.
//! let item = Item::with_references("handle empty files", [2]).unwrap();
//! changelog.find_or_create_unreleased().add_item(Category::Fixed, item);
//! changelog.add_reference(2, remote.issue_url(2));
//!
//! let rendered = changelog.to_string();
//! assert!(rendered.contains("### Fixed\n- Handle empty files. [#2]\n"));
//! assert!(rendered.ends_with("[#2]: https://github.com/owner/repo/issues/2\n"));
//! assert_eq!(Changelog::parse(&rendered, remote.clone()).unwrap(), changelog);
//!
//! // Errors point at the offending line.
//! let err = Changelog::parse("# Changelog\nnot the preamble", remote).unwrap_err();
//! assert_eq!(err.line(), Some(2));
//! ```

#![warn(missing_docs)]

mod changelog;
mod error;
mod item;
mod lines;
mod parser;
mod remote;
mod version;

pub use changelog::{Changelog, Parser};
pub use error::{ContextLine, Error, ErrorKind};
pub use item::Item;
pub use remote::{Remote, Service};
pub use version::{Category, Version};
