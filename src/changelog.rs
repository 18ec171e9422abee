//! The changelog document and the parser that reads it.

use std::collections::BTreeMap;
use std::fmt;

use winnow::Parser as _;

use crate::lines::Lines;
use crate::parser::{self, UNRELEASED};
use crate::remote::LinkKind;
use crate::{Category, Error, ErrorKind, Item, Remote, Version};

/// The fixed text between the title and the first version.
const PREAMBLE: [&str; 5] = [
    "",
    "All notable changes to this project will be documented in this file.",
    "",
    "The format is based on [Keep a Changelog](https://keepachangelog.com/en/1.0.0/),",
    "and this project adheres to [Semantic Versioning](https://semver.org/spec/v2.0.0.html).",
];

const DEFAULT_TITLE: &str = "Changelog";

/// A Keep a Changelog document.
///
/// `Display` writes the document back out in the exact form [`Changelog::parse`]
/// accepts.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Changelog {
    title: String,
    remote: Remote,
    versions: Vec<Version>,
    references: BTreeMap<u64, String>,
}

impl Changelog {
    /// An empty changelog titled "Changelog".
    pub fn new(remote: Remote) -> Self {
        Self {
            title: DEFAULT_TITLE.to_owned(),
            remote,
            versions: Vec::new(),
            references: BTreeMap::new(),
        }
    }

    /// The starting point for a project without a changelog: the title, the
    /// preamble and an empty `Unreleased` section.
    pub fn skeleton(remote: Remote) -> Self {
        let mut changelog = Self::new(remote);
        changelog.versions.push(Version::unreleased());
        changelog
    }

    /// Parse a changelog, recognizing every [`Category`].
    ///
    /// # Errors
    ///
    /// Any deviation from the grammar is fatal; see [`Parser::parse`].
    pub fn parse(text: &str, remote: Remote) -> Result<Self, Error> {
        Parser::new(remote).parse(text)
    }

    /// The document title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Replace the document title.
    pub fn set_title(&mut self, title: &str) -> Result<(), Error> {
        let title = title.trim();
        if title.is_empty() || title.contains(['\n', '\r']) {
            return Err(Error::new(
                ErrorKind::InvalidValue,
                format!("Invalid title {title:?}"),
            ));
        }
        self.title = title.to_owned();
        Ok(())
    }

    /// The repository links are built against.
    pub fn remote(&self) -> &Remote {
        &self.remote
    }

    /// The version sections, in document order.
    pub fn versions(&self) -> &[Version] {
        &self.versions
    }

    /// Mutable access to the version sections.
    pub fn versions_mut(&mut self) -> &mut [Version] {
        &mut self.versions
    }

    /// The section for `label`.
    pub fn version(&self, label: &str) -> Option<&Version> {
        self.versions.iter().find(|v| v.label() == label)
    }

    /// Append a section after all others.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidValue`] when adding a second `Unreleased`
    /// section.
    pub fn add_version(&mut self, version: Version) -> Result<(), Error> {
        self.check_unreleased(&version)?;
        self.versions.push(version);
        Ok(())
    }

    /// Insert a section before all others.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidValue`] when adding a second `Unreleased`
    /// section.
    pub fn prepend_version(&mut self, version: Version) -> Result<(), Error> {
        self.check_unreleased(&version)?;
        self.versions.insert(0, version);
        Ok(())
    }

    fn check_unreleased(&self, version: &Version) -> Result<(), Error> {
        if version.is_unreleased() && self.versions.iter().any(Version::is_unreleased) {
            return Err(Error::new(
                ErrorKind::InvalidValue,
                "Duplicate Unreleased version",
            ));
        }
        Ok(())
    }

    /// The first released section.
    pub fn find_latest(&self) -> Option<&Version> {
        self.versions.iter().find(|v| !v.is_unreleased())
    }

    /// The `Unreleased` section, created in front of all others if missing.
    ///
    /// A created section is compared against the latest release, if any.
    pub fn find_or_create_unreleased(&mut self) -> &mut Version {
        let existing = self.versions.iter().position(Version::is_unreleased);
        let index = match existing {
            Some(index) => index,
            None => {
                let mut version = Version::unreleased();
                version.set_previous_unchecked(self.find_latest().map(Version::label));
                tracing::debug!(previous = ?version.previous(), "created Unreleased version");
                self.versions.insert(0, version);
                0
            }
        };
        &mut self.versions[index]
    }

    /// Issue URLs by id.
    pub fn references(&self) -> &BTreeMap<u64, String> {
        &self.references
    }

    /// Add or replace the URL of issue `id`.
    pub fn add_reference(&mut self, id: u64, url: impl Into<String>) {
        self.references.insert(id, url.into());
    }

    /// Replace all issue URLs.
    pub fn set_references(&mut self, references: BTreeMap<u64, String>) {
        self.references = references;
    }
}

impl fmt::Display for Changelog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}", self.title)?;
        for line in PREAMBLE {
            writeln!(f, "{line}")?;
        }
        f.write_str("\n\n")?;

        for (i, version) in self.versions.iter().enumerate() {
            if 0 < i {
                writeln!(f)?;
            }
            version.write(f, &self.remote)?;
        }

        if !self.references.is_empty() {
            writeln!(f)?;
            for (id, url) in self.references.iter().rev() {
                writeln!(f, "[#{id}]: {url}")?;
            }
        }

        Ok(())
    }
}

/// Reads changelog text into a [`Changelog`].
///
/// ```text
/// # <title>
///
/// All notable changes to this project will be documented in this file.
///
/// The format is based on [Keep a Changelog](https://keepachangelog.com/en/1.0.0/),
/// and this project adheres to [Semantic Versioning](https://semver.org/spec/v2.0.0.html).
///
/// ## [<version>] - <YYYY-MM-DD>
/// [<version>]: <url>/compare/<previous>...<version>
///
/// ### <category>
/// - <message> [#<id>]
///
/// [#<id>]: <url>/issues/<id>
/// ```
#[derive(Clone, Debug)]
pub struct Parser {
    remote: Remote,
    categories: Vec<Category>,
}

impl Parser {
    /// A parser validating links against `remote` and recognizing every
    /// [`Category`].
    pub fn new(remote: Remote) -> Self {
        Self {
            remote,
            categories: Category::ALL.to_vec(),
        }
    }

    /// Only recognize these category headings. When several match, the one
    /// listed first wins.
    pub fn categories(mut self, categories: &[Category]) -> Self {
        self.categories = categories.to_vec();
        self
    }

    /// Parse a whole document.
    ///
    /// # Errors
    ///
    /// The first line that doesn't fit the grammar aborts the parse. The
    /// error carries the last few lines read, with the offending one marked.
    pub fn parse(&self, text: &str) -> Result<Changelog, Error> {
        let mut lines = Lines::new(text);

        let mut changelog = Changelog::new(self.remote.clone());
        changelog.title = self.title(&mut lines)?;
        self.preamble(&mut lines)?;

        while parser::version_header.parse(lines.current()).is_ok() {
            let has_unreleased = changelog.versions.iter().any(Version::is_unreleased);
            let version = self.version(&mut lines, has_unreleased)?;
            changelog.versions.push(version);
        }

        changelog.references = self.references(&mut lines)?;

        lines.skip_blank();
        if !lines.is_empty() {
            lines.consume()?;
            return Err(lines.error(
                ErrorKind::Structural,
                "Unexpected content after changelog",
            ));
        }

        tracing::debug!(
            versions = changelog.versions.len(),
            references = changelog.references.len(),
            "parsed changelog"
        );
        Ok(changelog)
    }

    fn title(&self, lines: &mut Lines<'_>) -> Result<String, Error> {
        let line = lines.consume()?;
        parser::title
            .parse(line)
            .map(str::to_owned)
            .map_err(|_| lines.error(ErrorKind::Structural, "Expected a title"))
    }

    fn preamble(&self, lines: &mut Lines<'_>) -> Result<(), Error> {
        for expected in PREAMBLE {
            if lines.consume()? != expected {
                return Err(lines.error(ErrorKind::Structural, "Expected changelog preamble"));
            }
        }
        lines.skip_blank();
        Ok(())
    }

    fn version(&self, lines: &mut Lines<'_>, has_unreleased: bool) -> Result<Version, Error> {
        let header = lines.consume()?;
        let (label, date) = parser::version_header
            .parse(header)
            .map_err(|_| lines.error(ErrorKind::Grammar, "Expected version"))?;
        if label == UNRELEASED && has_unreleased {
            return Err(lines.error(ErrorKind::Structural, "Duplicate Unreleased version"));
        }

        let mut version = Version::new_unchecked(label);
        version.set_date_unchecked(date);

        let link = lines.consume()?;
        if !link.starts_with('[') {
            return Err(lines.error(
                ErrorKind::Grammar,
                "Expected link to compare page with previous version",
            ));
        }
        let (link_label, target) = parser::link
            .parse(link)
            .map_err(|_| lines.error(ErrorKind::Grammar, "Error in compare link syntax"))?;
        let kind = if link_label == label {
            self.remote.classify(label, target)
        } else {
            None
        };
        match kind {
            Some(LinkKind::Compare(previous)) => version.set_previous_unchecked(Some(previous)),
            Some(LinkKind::Tag | LinkKind::Bare) => {}
            None => {
                return Err(lines.error(ErrorKind::Mismatch, "Error in compare link syntax"));
            }
        }

        lines.skip_blank();

        let mut seen = Vec::new();
        while let Some(category) = self.category(lines.current(), &seen) {
            lines.consume()?;
            seen.push(category);
            version.set_items(category, self.items(lines)?);
            lines.skip_blank();
        }

        tracing::debug!(
            label,
            date = ?version.date(),
            previous = ?version.previous(),
            "parsed version"
        );
        Ok(version)
    }

    // The scan restarts from the top of the configured list for every
    // heading, so headings may come in any order but never twice.
    fn category(&self, line: &str, seen: &[Category]) -> Option<Category> {
        let name = parser::category_header.parse(line).ok()?;
        self.categories
            .iter()
            .copied()
            .filter(|category| !seen.contains(category))
            .find(|category| category.as_str() == name)
    }

    fn items(&self, lines: &mut Lines<'_>) -> Result<Vec<Item>, Error> {
        let mut items = Vec::new();
        while let Ok(text) = parser::bullet.parse(lines.current()) {
            lines.consume()?;
            let (message, references) = parser::extract_references(text);
            let item = Item::with_references(&message, references)
                .map_err(|err| lines.error(ErrorKind::Grammar, err.message()))?;
            items.push(item);
        }
        Ok(items)
    }

    fn references(&self, lines: &mut Lines<'_>) -> Result<BTreeMap<u64, String>, Error> {
        let mut references = BTreeMap::new();
        while lines.current().starts_with('[') {
            let line = lines.consume()?;
            let Some((id, url)) = parser::link
                .parse(line)
                .ok()
                .and_then(|(label, url)| Some((parser::issue_id.parse(label).ok()?, url)))
            else {
                return Err(lines.error(ErrorKind::Grammar, "Error parsing reference"));
            };
            if !self.remote.is_issue_url(url) {
                return Err(lines.error(ErrorKind::Mismatch, "Error parsing reference"));
            }
            references.insert(id, url.to_owned());
        }
        Ok(references)
    }
}
