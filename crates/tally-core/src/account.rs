//! Hierarchical account paths.
//!
//! Accounts form a colon-delimited namespace such as
//! `Assets:Receivable:ClientX`. Balance queries roll up by segment prefix:
//! a query on `Assets:Receivable` covers `Assets:Receivable:ClientX`, and a
//! query on `Assets` covers both, but `Assets` never covers `AssetsOther`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The segment delimiter in an account path's text form.
pub const DELIMITER: char = ':';

/// Error produced when parsing an account path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    /// The path has no segments at all.
    #[error("account path is empty")]
    Empty,
    /// A segment between delimiters is empty, e.g. `"Assets::Cash"`.
    #[error("account path {0:?} contains an empty segment")]
    EmptySegment(String),
}

/// A non-empty ordered sequence of account name segments.
///
/// # Examples
///
/// ```
/// use tally_core::AccountPath;
///
/// let path: AccountPath = "Assets:Receivable".parse().unwrap();
/// assert_eq!(path.depth(), 2);
/// assert_eq!(path.to_string(), "Assets:Receivable");
/// assert_eq!(path.parent().unwrap().to_string(), "Assets");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountPath {
    segments: Vec<String>,
}

impl AccountPath {
    /// Build a path from owned segments, validating each one.
    pub fn new(segments: Vec<String>) -> Result<Self, AccountError> {
        if segments.is_empty() {
            return Err(AccountError::Empty);
        }
        if segments.iter().any(String::is_empty) {
            return Err(AccountError::EmptySegment(segments.join(&DELIMITER.to_string())));
        }
        Ok(Self { segments })
    }

    /// The path's segments in order.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// The first segment (the account's root category).
    #[must_use]
    pub fn root(&self) -> &str {
        &self.segments[0]
    }

    /// The path with the last segment removed, or `None` at the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.segments.len() < 2 {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Segment-wise prefix containment.
    ///
    /// `Assets` is a prefix of `Assets` and of `Assets:Receivable`, but not
    /// of `AssetsOther` — containment is decided per segment, never by
    /// string prefix.
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        other.segments.len() >= self.segments.len()
            && self.segments.iter().zip(&other.segments).all(|(a, b)| a == b)
    }
}

impl FromStr for AccountPath {
    type Err = AccountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(AccountError::Empty);
        }
        let segments: Vec<String> = s.split(DELIMITER).map(str::to_owned).collect();
        if segments.iter().any(String::is_empty) {
            return Err(AccountError::EmptySegment(s.to_owned()));
        }
        Ok(Self { segments })
    }
}

impl TryFrom<String> for AccountPath {
    type Error = AccountError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<AccountPath> for String {
    fn from(path: AccountPath) -> Self {
        path.to_string()
    }
}

impl fmt::Display for AccountPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join(&DELIMITER.to_string()))
    }
}
