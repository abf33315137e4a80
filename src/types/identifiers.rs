use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Longest query prefix kept in a topic slug, in characters.
pub const SLUG_QUERY_LIMIT: usize = 50;

/// Provider-assigned short identifier of a paper, e.g. `2401.12345v2`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaperId(String);

impl PaperId {
    pub fn new(id: impl Into<String>) -> Self {
        PaperId(id.into())
    }

    /// Derive the short id from a canonical entry URL.
    ///
    /// `http://arxiv.org/abs/2401.12345v2` becomes `2401.12345v2`; old-style
    /// ids such as `hep-th/9901001v1` keep their archive prefix. Anything that
    /// is not an abs URL is kept verbatim.
    pub fn from_entry_url(entry_url: &str) -> Self {
        let trimmed = entry_url.trim();
        let short = match trimmed.rsplit_once("arxiv.org/abs/") {
            Some((_, tail)) => tail,
            None => trimmed,
        };
        PaperId(short.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaperId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Directory-safe key naming one topic registry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicSlug(String);

impl TopicSlug {
    /// Slug for a search. Pure function of the query text and author filter.
    pub fn derive(query: &str, author: Option<&str>) -> Self {
        let mut slug: String = sanitize(&query.to_lowercase())
            .chars()
            .take(SLUG_QUERY_LIMIT)
            .collect();

        if let Some(author) = author.filter(|a| !a.is_empty()) {
            slug.push_str("_by_");
            slug.push_str(&sanitize(author));
        }

        TopicSlug(guard_reserved(slug))
    }

    /// Slug for a topic name typed by a reader, e.g. `Machine Learning`.
    pub fn from_topic_name(topic: &str) -> Self {
        TopicSlug(guard_reserved(sanitize(&topic.to_lowercase())))
    }

    /// A slug exactly as the topic index lists it, e.g. `rag_by_Jane_Doe`.
    ///
    /// `None` when the name could not have come from [`TopicSlug::derive`]:
    /// empty, dot-only, or containing a space or path separator.
    pub fn from_listed(name: &str) -> Option<Self> {
        let plausible = !name.is_empty()
            && !name.chars().all(|c| c == '.')
            && !name.contains([' ', '/', '\\']);
        plausible.then(|| TopicSlug(name.to_string()))
    }

    /// Wrap a directory name found under the storage root.
    pub(crate) fn from_dir_name(name: String) -> Self {
        TopicSlug(name)
    }

    /// Title-cased label, `machine_learning` -> `Machine Learning`.
    pub fn readable(&self) -> String {
        self.0
            .split('_')
            .filter(|w| !w.is_empty())
            .map(|w| {
                let mut chars = w.chars();
                match chars.next() {
                    Some(first) => first
                        .to_uppercase()
                        .chain(chars.flat_map(char::to_lowercase))
                        .collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TopicSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn sanitize(s: &str) -> String {
    s.replace([' ', '/', '\\'], "_")
}

// Empty or dot-only slugs would resolve to the root or its parent.
fn guard_reserved(slug: String) -> String {
    if slug.is_empty() {
        "_".to_string()
    } else if slug.chars().all(|c| c == '.') {
        "_".repeat(slug.len())
    } else {
        slug
    }
}

/// Content digest of a persisted registry document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistryVersion(String);

impl RegistryVersion {
    pub fn from_content(content: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content);

        let hash = hasher.finalize();
        let hex = hex::encode(hash);

        RegistryVersion(format!("sha256:{hex}"))
    }

    /// First 12 hex characters, used for temp file names.
    pub fn short(&self) -> &str {
        let hex = self.0.strip_prefix("sha256:").unwrap_or(&self.0);
        &hex[..hex.len().min(12)]
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
