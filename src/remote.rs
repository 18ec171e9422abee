//! The hosted repository a changelog links into.

use std::fmt;
use std::str::FromStr;

use unicase::UniCase;
use winnow::Parser;

use crate::parser::{self, UNRELEASED};
use crate::{Error, ErrorKind};

/// The hosting service, which decides the shape of tag links.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum Service {
    /// Tags live under `/releases/tag/<version>`.
    #[default]
    GitHub,

    /// Tags live under `/tags/<version>`.
    GitLab,
}

impl Service {
    /// Access `str` representation of Service
    pub fn as_str(self) -> &'static str {
        match self {
            Service::GitHub => "GitHub",
            Service::GitLab => "GitLab",
        }
    }

    fn tag_path(self) -> &'static str {
        match self {
            Service::GitHub => "/releases/tag/",
            Service::GitLab => "/tags/",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Service {
    type Err = Error;

    fn from_str(service: &str) -> Result<Self, Self::Err> {
        let service = UniCase::new(service.trim());
        if service == UniCase::new(Service::GitHub.as_str()) {
            Ok(Service::GitHub)
        } else if service == UniCase::new(Service::GitLab.as_str()) {
            Ok(Service::GitLab)
        } else {
            Err(Error::new(
                ErrorKind::InvalidValue,
                format!("Unknown service {:?}", service.into_inner()),
            ))
        }
    }
}

/// The base URL of a repository together with its [`Service`].
///
/// All links are built from the URL by plain string concatenation; nothing
/// is ever fetched.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash)]
pub struct Remote {
    url: String,
    service: Service,
}

impl Remote {
    /// A remote rooted at `url`. Surrounding whitespace and trailing `/` are
    /// dropped.
    pub fn new(url: impl Into<String>, service: Service) -> Self {
        let url = url.into();
        let trimmed = url.trim().trim_end_matches(|c: char| c == '/' || c.is_whitespace());
        Self {
            url: trimmed.to_owned(),
            service,
        }
    }

    /// A remote built from the output of `git remote get-url`.
    ///
    /// SSH style remotes such as `git@github.com:owner/repo.git` become
    /// `https://github.com/owner/repo`. A `.git` suffix is dropped from URL
    /// style remotes; anything else is used as is.
    pub fn from_git_remote(remote: &str, service: Service) -> Self {
        let remote = remote.trim();
        let url = match remote.strip_suffix(".git") {
            Some(url) if url.contains("://") => url.to_owned(),
            Some(url) => {
                let url = url.strip_prefix("git@").unwrap_or(url);
                format!("https://{}", url.replacen(':', "/", 1))
            }
            None => remote.to_owned(),
        };
        Self::new(url, service)
    }

    /// The repository base URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The hosting service.
    pub fn service(&self) -> Service {
        self.service
    }

    /// The page for issue `id`.
    pub fn issue_url(&self, id: u64) -> String {
        format!("{}/issues/{id}", self.url)
    }

    /// The page a version heading links to.
    ///
    /// With a previous version this is the compare view between the two. The
    /// first release links to its tag, and an `Unreleased` section with
    /// nothing before it links to the repository itself.
    pub fn version_url(&self, label: &str, previous: Option<&str>) -> String {
        match previous {
            Some(previous) => format!("{}/compare/{previous}...{label}", self.url),
            None if label != UNRELEASED => {
                format!("{}{}{label}", self.url, self.service.tag_path())
            }
            None => self.url.clone(),
        }
    }

    /// Work out which of the accepted link shapes `target` has for the version
    /// `label`, or `None` if it has none of them.
    pub(crate) fn classify<'t>(&self, label: &str, target: &'t str) -> Option<LinkKind<'t>> {
        let path = target.strip_prefix(self.url.as_str())?;
        if path.is_empty() {
            return Some(LinkKind::Bare);
        }

        if let Some(range) = path.strip_prefix("/compare/") {
            let previous = range.strip_suffix(label)?.strip_suffix("...")?;
            return parser::version_number
                .parse(previous)
                .is_ok()
                .then_some(LinkKind::Compare(previous));
        }

        (path.strip_prefix(self.service.tag_path())? == label).then_some(LinkKind::Tag)
    }

    /// Whether `target` is an issue page of this repository.
    pub(crate) fn is_issue_url(&self, target: &str) -> bool {
        target
            .strip_prefix(self.url.as_str())
            .is_some_and(|path| parser::issue_path.parse(path).is_ok())
    }
}

/// The accepted shapes of a version link.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) enum LinkKind<'t> {
    /// `<url>/compare/<previous>...<label>`
    Compare(&'t str),
    /// `<url>/releases/tag/<label>` or `<url>/tags/<label>`
    Tag,
    /// `<url>`
    Bare,
}
