use std::fmt;

use crate::parser;
use crate::{Error, ErrorKind};

/// A single change entry, rendered as one bullet point.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Item {
    message: String,
    references: Vec<u64>,
}

impl Item {
    /// Create an item with the given message and no references.
    ///
    /// The message is stored the way it is rendered: first letter capitalized
    /// and terminated by exactly one period.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidValue`] if the message is blank, spans
    /// several lines or contains an `[#N]` issue marker. Cite issues with
    /// [`Item::with_references`] instead.
    pub fn new(message: &str) -> Result<Self, Error> {
        Ok(Self {
            message: normalize(message)?,
            references: Vec::new(),
        })
    }

    /// Create an item citing the given issue ids.
    pub fn with_references(
        message: &str,
        references: impl IntoIterator<Item = u64>,
    ) -> Result<Self, Error> {
        let mut item = Self::new(message)?;
        for id in references {
            item.add_reference(id);
        }
        Ok(item)
    }

    /// The normalized message, without references.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Replace the message.
    pub fn set_message(&mut self, message: &str) -> Result<(), Error> {
        self.message = normalize(message)?;
        Ok(())
    }

    /// Cited issue ids, in ascending order.
    pub fn references(&self) -> &[u64] {
        &self.references
    }

    /// Cite another issue.
    pub fn add_reference(&mut self, id: u64) {
        let at = self.references.partition_point(|&r| r <= id);
        self.references.insert(at, id);
    }
}

fn normalize(message: &str) -> Result<String, Error> {
    if message.contains(['\n', '\r']) {
        return Err(Error::new(
            ErrorKind::InvalidValue,
            "Item text must be a single line",
        ));
    }
    if !parser::extract_references(message).1.is_empty() {
        return Err(Error::new(
            ErrorKind::InvalidValue,
            "Item text must not contain issue references",
        ));
    }

    let message = message.trim().trim_end_matches('.');

    let mut chars = message.chars();
    let Some(first) = chars.next() else {
        return Err(Error::new(ErrorKind::InvalidValue, "Expected item text"));
    };

    let mut normalized = String::with_capacity(message.len() + 1);
    normalized.extend(first.to_uppercase());
    normalized.push_str(chars.as_str());
    normalized.push('.');
    Ok(normalized)
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;

        for id in &self.references {
            write!(f, " [#{id}]")?;
        }

        Ok(())
    }
}
