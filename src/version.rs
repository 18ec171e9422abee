//! Version sections and the categories of change they group.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use winnow::error::{ContextError, ErrMode};
use winnow::Parser;

use crate::parser::{self, UNRELEASED};
use crate::{Error, ErrorKind, Item, Remote};

/// The kinds of change a version section can list.
///
/// The declaration order is the order sections are written in.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// New features.
    Added,
    /// Changes in existing functionality.
    Changed,
    /// Soon-to-be removed features.
    Deprecated,
    /// Bug fixes.
    Fixed,
    /// Now removed features.
    Removed,
    /// Vulnerability fixes.
    Security,
}

impl Category {
    /// Every category, in render order.
    pub const ALL: [Category; 6] = [
        Category::Added,
        Category::Changed,
        Category::Deprecated,
        Category::Fixed,
        Category::Removed,
        Category::Security,
    ];

    /// Access `str` representation of Category, as used in section headings.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Added => "Added",
            Category::Changed => "Changed",
            Category::Deprecated => "Deprecated",
            Category::Fixed => "Fixed",
            Category::Removed => "Removed",
            Category::Security => "Security",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(category: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == category)
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::InvalidValue,
                    format!("Unknown category {category:?}"),
                )
            })
    }
}

/// One version section of a changelog.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Version {
    label: String,
    date: Option<String>,
    previous: Option<String>,
    items: BTreeMap<Category, Vec<Item>>,
}

impl Version {
    /// Create an empty section for `label`, which must be a semantic version
    /// (`MAJOR.MINOR.PATCH[-prerelease]`) or `Unreleased`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidValue`] for any other label.
    pub fn new(label: &str) -> Result<Self, Error> {
        check(parser::version_label, label, "version label")?;
        Ok(Self::new_unchecked(label))
    }

    /// An empty `Unreleased` section.
    pub fn unreleased() -> Self {
        Self::new_unchecked(UNRELEASED)
    }

    pub(crate) fn new_unchecked(label: &str) -> Self {
        Self {
            label: label.to_owned(),
            date: None,
            previous: None,
            items: BTreeMap::new(),
        }
    }

    /// The version label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether this is the `Unreleased` section.
    pub fn is_unreleased(&self) -> bool {
        self.label == UNRELEASED
    }

    /// The release date, `YYYY-MM-DD`.
    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    /// Set the release date, `YYYY-MM-DD`.
    pub fn set_date(&mut self, date: &str) -> Result<(), Error> {
        check(parser::date, date, "date")?;
        self.date = Some(date.to_owned());
        Ok(())
    }

    pub(crate) fn set_date_unchecked(&mut self, date: Option<&str>) {
        self.date = date.map(str::to_owned);
    }

    /// The label of the version this one is compared against.
    pub fn previous(&self) -> Option<&str> {
        self.previous.as_deref()
    }

    /// Set the version this one is compared against.
    pub fn set_previous(&mut self, previous: &str) -> Result<(), Error> {
        check(parser::version_number, previous, "previous version")?;
        self.previous = Some(previous.to_owned());
        Ok(())
    }

    pub(crate) fn set_previous_unchecked(&mut self, previous: Option<&str>) {
        self.previous = previous.map(str::to_owned);
    }

    /// The items listed under `category`; empty if there are none.
    pub fn items(&self, category: Category) -> &[Item] {
        self.items
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The non-empty categories with their items, in render order.
    pub fn categories(&self) -> impl Iterator<Item = (Category, &[Item])> + '_ {
        self.items
            .iter()
            .map(|(category, items)| (*category, items.as_slice()))
    }

    /// Replace the items listed under `category`. An empty list removes the
    /// category.
    pub fn set_items(&mut self, category: Category, items: Vec<Item>) {
        if items.is_empty() {
            self.items.remove(&category);
        } else {
            self.items.insert(category, items);
        }
    }

    /// Append an item to `category`.
    pub fn add_item(&mut self, category: Category, item: Item) {
        self.items.entry(category).or_default().push(item);
    }

    /// The link line that follows the heading, e.g.
    /// `[1.1.0]: https://github.com/o/r/compare/1.0.0...1.1.0`.
    pub fn link(&self, remote: &Remote) -> String {
        format!(
            "[{}]: {}",
            self.label,
            remote.version_url(&self.label, self.previous())
        )
    }

    /// Write the section, ending in a newline.
    pub(crate) fn write(&self, f: &mut fmt::Formatter<'_>, remote: &Remote) -> fmt::Result {
        write!(f, "## [{}]", self.label)?;
        if let Some(date) = &self.date {
            write!(f, " - {date}")?;
        }
        writeln!(f)?;
        writeln!(f, "{}", self.link(remote).trim_end())?;

        for (category, items) in self.categories() {
            write!(f, "\n### {category}\n")?;
            for item in items {
                writeln!(f, "- {item}")?;
            }
        }

        Ok(())
    }
}

fn check<'i, O>(
    mut rule: impl Parser<&'i str, O, ErrMode<ContextError>>,
    value: &'i str,
    what: &str,
) -> Result<(), Error> {
    rule.parse(value)
        .map(|_| ())
        .map_err(|_| Error::new(ErrorKind::InvalidValue, format!("Invalid {what} {value:?}")))
}
