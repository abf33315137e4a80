use serde::{Deserialize, Serialize};

// Every parse here is total: unknown input falls back to the documented
// default instead of failing.

/// Which part of a paper the main query term is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldScope {
    #[default]
    All,
    Title,
    Author,
    Abstract,
    Comment,
    JournalRef,
    Category,
    ReportNumber,
}

impl FieldScope {
    /// Case-insensitive, underscores ignored. Unknown values map to `All`.
    pub fn parse_lenient(s: &str) -> Self {
        match squash(s).as_str() {
            "title" | "ti" => FieldScope::Title,
            "author" | "au" => FieldScope::Author,
            "abstract" | "abs" => FieldScope::Abstract,
            "comment" | "co" => FieldScope::Comment,
            "journal" | "journalref" | "jr" => FieldScope::JournalRef,
            "category" | "cat" => FieldScope::Category,
            "reportnumber" | "rn" => FieldScope::ReportNumber,
            _ => FieldScope::All,
        }
    }

    /// Provider field prefix. `All` has none.
    pub fn prefix(self) -> Option<&'static str> {
        match self {
            FieldScope::All => None,
            FieldScope::Title => Some("ti"),
            FieldScope::Author => Some("au"),
            FieldScope::Abstract => Some("abs"),
            FieldScope::Comment => Some("co"),
            FieldScope::JournalRef => Some("jr"),
            FieldScope::Category => Some("cat"),
            FieldScope::ReportNumber => Some("rn"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Relevance,
    SubmittedDate,
    LastUpdatedDate,
}

impl SortKey {
    /// Case-insensitive, underscores ignored. Unknown values map to `Relevance`.
    pub fn parse_lenient(s: &str) -> Self {
        match squash(s).as_str() {
            "submitted" | "submitteddate" => SortKey::SubmittedDate,
            "updated" | "lastupdated" | "lastupdateddate" => SortKey::LastUpdatedDate,
            _ => SortKey::Relevance,
        }
    }

    pub fn as_api_str(self) -> &'static str {
        match self {
            SortKey::Relevance => "relevance",
            SortKey::SubmittedDate => "submittedDate",
            SortKey::LastUpdatedDate => "lastUpdatedDate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    /// Case-insensitive. Unknown values map to `Descending`.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => SortDirection::Ascending,
            _ => SortDirection::Descending,
        }
    }

    pub fn as_api_str(self) -> &'static str {
        match self {
            SortDirection::Ascending => "ascending",
            SortDirection::Descending => "descending",
        }
    }
}

fn squash(s: &str) -> String {
    s.trim().to_lowercase().replace('_', "")
}
