use chrono::{DateTime, NaiveDate};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::warn;

use crate::paper::{FetchedPaper, PaperId};
use crate::provider::{ProviderError, ProviderResult};

#[derive(Debug, Clone, Copy)]
enum TextField {
    Id,
    Title,
    Summary,
    Published,
    Updated,
    AuthorName,
}

#[derive(Debug, Default)]
struct EntryDraft {
    id: String,
    title: String,
    summary: String,
    published: String,
    updated: String,
    authors: Vec<String>,
    pdf_url: Option<String>,
    primary_category: Option<String>,
    categories: Vec<String>,
}

impl EntryDraft {
    fn push_text(&mut self, field: TextField, text: &str) {
        let slot = match field {
            TextField::Id => &mut self.id,
            TextField::Title => &mut self.title,
            TextField::Summary => &mut self.summary,
            TextField::Published => &mut self.published,
            TextField::Updated => &mut self.updated,
            TextField::AuthorName => match self.authors.last_mut() {
                Some(name) => name,
                None => return,
            },
        };
        slot.push_str(text);
    }

    fn absorb_element(&mut self, e: &BytesStart<'_>) {
        match e.local_name().as_ref() {
            b"link" => {
                let is_pdf = attr(e, b"title").as_deref() == Some("pdf")
                    || attr(e, b"type").is_some_and(|t| t.contains("pdf"));
                if is_pdf && self.pdf_url.is_none() {
                    self.pdf_url = attr(e, b"href");
                }
            }
            b"primary_category" => {
                if let Some(term) = attr(e, b"term") {
                    self.primary_category = Some(term);
                }
            }
            b"category" => {
                if let Some(term) = attr(e, b"term") {
                    if !self.categories.contains(&term) {
                        self.categories.push(term);
                    }
                }
            }
            _ => {}
        }
    }

    // `Ok(None)` drops an entry that is too malformed to store.
    fn finish(self) -> ProviderResult<Option<FetchedPaper>> {
        let entry_id = self.id.trim().to_string();
        if entry_id.contains("arxiv.org/api/errors") {
            let message = normalize_whitespace(&self.summary);
            return Err(ProviderError::Api(if message.is_empty() { entry_id } else { message }));
        }
        if entry_id.is_empty() {
            warn!("skipping feed entry without an id");
            return Ok(None);
        }

        let Some(published) = parse_date(&self.published) else {
            warn!(entry = %entry_id, value = %self.published, "skipping entry with unparseable published date");
            return Ok(None);
        };
        let updated = parse_date(&self.updated);

        let pdf_url = self
            .pdf_url
            .unwrap_or_else(|| entry_id.replacen("/abs/", "/pdf/", 1));
        let primary_category = self
            .primary_category
            .or_else(|| self.categories.first().cloned())
            .unwrap_or_default();

        Ok(Some(FetchedPaper {
            id: PaperId::from_entry_url(&entry_id),
            title: normalize_whitespace(&self.title),
            authors: self.authors.iter().map(|a| normalize_whitespace(a)).collect(),
            summary: self.summary.trim().to_string(),
            pdf_url,
            published,
            updated,
            categories: self.categories,
            primary_category,
            entry_id,
        }))
    }
}

/// Parse an arXiv Atom feed into papers, in feed order.
///
/// An error entry (id under `arxiv.org/api/errors`) turns the whole feed
/// into [`ProviderError::Api`].
pub fn parse_feed(xml: &str) -> ProviderResult<Vec<FetchedPaper>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut out = Vec::new();
    let mut entry: Option<EntryDraft> = None;
    let mut target: Option<TextField> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                if let Some(draft) = entry.as_mut() {
                    target = match e.local_name().as_ref() {
                        b"id" => Some(TextField::Id),
                        b"title" => Some(TextField::Title),
                        b"summary" => Some(TextField::Summary),
                        b"published" => Some(TextField::Published),
                        b"updated" => Some(TextField::Updated),
                        b"name" => {
                            draft.authors.push(String::new());
                            Some(TextField::AuthorName)
                        }
                        _ => {
                            draft.absorb_element(&e);
                            None
                        }
                    };
                } else if e.local_name().as_ref() == b"entry" {
                    entry = Some(EntryDraft::default());
                }
            }
            Ok(Event::Empty(e)) => {
                if let Some(draft) = entry.as_mut() {
                    draft.absorb_element(&e);
                }
            }
            Ok(Event::Text(t)) => {
                if let (Some(draft), Some(field)) = (entry.as_mut(), target) {
                    let text = t
                        .unescape()
                        .map_err(|e| ProviderError::Parse(format!("bad text in feed: {e}")))?;
                    draft.push_text(field, &text);
                }
            }
            Ok(Event::CData(c)) => {
                if let (Some(draft), Some(field)) = (entry.as_mut(), target) {
                    draft.push_text(field, &String::from_utf8_lossy(&c));
                }
            }
            Ok(Event::End(e)) => {
                target = None;
                if e.local_name().as_ref() == b"entry" {
                    if let Some(draft) = entry.take() {
                        if let Some(paper) = draft.finish()? {
                            out.push(paper);
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ProviderError::Parse(format!(
                    "XML error at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(out)
}

fn attr(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == key)
        .map(|a| String::from_utf8_lossy(&a.value).into_owned())
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    s.get(..10)
        .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
