//! Article identifiers.
//!
//! Every title that enters the crawler (start, target, or a scraped link) goes
//! through [`ArticleTitle::parse`], so two titles name the same article iff
//! their normalized bytes are equal.

use crate::error::{CrawlError, Result};
use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Longest title the source wiki accepts, in bytes.
pub const MAX_TITLE_BYTES: usize = 255;

const FORBIDDEN_CHARS: &[char] = &['<', '>', '[', ']', '{', '}', '|'];

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArticleTitle(String);

impl ArticleTitle {
    /// Normalize a raw title or relative article href.
    ///
    /// Strips a leading `./`, cuts any fragment or query, percent-decodes,
    /// trims, and turns spaces into underscores.
    pub fn parse(raw: &str) -> Result<Self> {
        let stripped = raw.strip_prefix("./").unwrap_or(raw);
        let end = stripped.find(['#', '?']).unwrap_or(stripped.len());

        let decoded = percent_decode_str(&stripped[..end])
            .decode_utf8()
            .map_err(|e| CrawlError::InvalidTitle(format!("{raw:?} is not UTF-8: {e}")))?;

        let normalized = decoded.trim().replace(' ', "_");

        if normalized.is_empty() {
            return Err(CrawlError::InvalidTitle(format!("{raw:?} is empty")));
        }
        if normalized.len() > MAX_TITLE_BYTES {
            return Err(CrawlError::InvalidTitle(format!(
                "{raw:?} exceeds {MAX_TITLE_BYTES} bytes"
            )));
        }
        if let Some(c) = normalized
            .chars()
            .find(|c| c.is_control() || FORBIDDEN_CHARS.contains(c))
        {
            return Err(CrawlError::InvalidTitle(format!(
                "{raw:?} contains forbidden character {c:?}"
            )));
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Namespace prefix, if the title has the `Namespace:Rest` shape.
    pub fn namespace(&self) -> Option<&str> {
        self.0
            .split_once(':')
            .map(|(ns, _)| ns)
            .filter(|ns| !ns.is_empty())
    }
}

impl fmt::Display for ArticleTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ArticleTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ArticleTitle {
    type Err = CrawlError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ArticleTitle {
    type Error = CrawlError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<ArticleTitle> for String {
    fn from(title: ArticleTitle) -> Self {
        title.0
    }
}

impl PartialEq<str> for ArticleTitle {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ArticleTitle {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
