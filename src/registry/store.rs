use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::paper::{PaperId, PaperRecord};
use crate::registry::lock::{acquire, SlugLocks};
use crate::registry::topic::TopicRegistry;
use crate::types::identifiers::{RegistryVersion, TopicSlug};

/// File holding one topic's registry, inside `<root>/<slug>/`.
pub const REGISTRY_FILE: &str = "papers_info.json";

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result of merging one batch of provider records into a topic.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub slug: TopicSlug,
    /// Every incoming id in provider order, duplicates included.
    pub paper_ids: Vec<PaperId>,
    pub new_count: usize,
    pub total_stored: usize,
    pub path: PathBuf,
    pub version: RegistryVersion,
}

/// Result of a cross-topic id lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found { slug: TopicSlug, record: PaperRecord },
    NotFound,
    /// The storage root does not exist.
    NoData,
}

/// One known topic and its stored record count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicEntry {
    pub slug: TopicSlug,
    pub count: usize,
}

/// All topic registries under one storage root.
///
/// Every merge rewrites the whole registry file. Merges of the same slug
/// through one `RegistryStore` are serialized; two processes merging the
/// same slug race and the last writer wins.
#[derive(Debug)]
pub struct RegistryStore {
    root: PathBuf,
    locks: SlugLocks,
}

impl RegistryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            locks: SlugLocks::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn registry_path(&self, slug: &TopicSlug) -> PathBuf {
        self.root.join(slug.as_str()).join(REGISTRY_FILE)
    }

    /// Strict load. `Ok(None)` when the registry file does not exist.
    pub fn load(&self, slug: &TopicSlug) -> Result<Option<TopicRegistry>, RegistryError> {
        read_registry(&self.registry_path(slug))
    }

    /// Load, treating an unreadable or corrupt registry as absent.
    pub fn load_lenient(&self, slug: &TopicSlug) -> Option<TopicRegistry> {
        let path = self.registry_path(slug);
        match read_registry(&path) {
            Ok(registry) => registry,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "unreadable registry treated as empty");
                None
            }
        }
    }

    /// Merge `incoming` into the registry for `slug`, first write wins per id,
    /// then persist the whole registry.
    pub fn merge(
        &self,
        slug: &TopicSlug,
        incoming: Vec<(PaperId, PaperRecord)>,
    ) -> Result<MergeOutcome, RegistryError> {
        let handle = self.locks.handle(slug);
        let _guard = acquire(&handle);

        let mut registry = self.load_lenient(slug).unwrap_or_default();

        let mut paper_ids = Vec::with_capacity(incoming.len());
        let mut new_count = 0;
        for (id, record) in incoming {
            if registry.insert_if_absent(id.clone(), record) {
                new_count += 1;
            } else {
                debug!(slug = %slug, id = %id, "already stored, keeping first record");
            }
            paper_ids.push(id);
        }

        let path = self.registry_path(slug);
        let version = write_registry(&path, &registry)?;

        info!(
            slug = %slug,
            incoming = paper_ids.len(),
            new = new_count,
            stored = registry.len(),
            version = version.as_str(),
            "registry merged"
        );

        Ok(MergeOutcome {
            slug: slug.clone(),
            paper_ids,
            new_count,
            total_stored: registry.len(),
            path,
            version,
        })
    }

    /// Find `id` in any topic, scanning slugs in sorted order.
    pub fn lookup(&self, id: &PaperId) -> Result<Lookup, RegistryError> {
        let Some(slugs) = self.topic_slugs()? else {
            return Ok(Lookup::NoData);
        };

        for slug in slugs {
            let Some(registry) = self.load_lenient(&slug) else {
                continue;
            };
            if let Some(record) = registry.get(id) {
                return Ok(Lookup::Found {
                    slug,
                    record: record.clone(),
                });
            }
        }
        Ok(Lookup::NotFound)
    }

    /// Every topic with a registry file, sorted by slug. Unreadable
    /// registries are listed with a count of 0.
    pub fn topics(&self) -> Result<Vec<TopicEntry>, RegistryError> {
        let slugs = self.topic_slugs()?.unwrap_or_default();
        Ok(slugs
            .into_iter()
            .map(|slug| {
                let count = self.load_lenient(&slug).map(|r| r.len()).unwrap_or(0);
                TopicEntry { slug, count }
            })
            .collect())
    }

    // `None` when the root itself is missing.
    fn topic_slugs(&self) -> Result<Option<Vec<TopicSlug>>, RegistryError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut slugs = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.path().join(REGISTRY_FILE).is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => slugs.push(TopicSlug::from_dir_name(name)),
                Err(name) => debug!(?name, "skipping non UTF-8 topic directory"),
            }
        }
        slugs.sort();
        Ok(Some(slugs))
    }
}

fn read_registry(path: &Path) -> Result<Option<TopicRegistry>, RegistryError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let registry: TopicRegistry = serde_json::from_slice(&bytes)?;
    Ok(Some(registry))
}

// Write to a sibling temp file named from the content digest, then rename
// over the target so readers never see a partial document.
fn write_registry(path: &Path, registry: &TopicRegistry) -> Result<RegistryVersion, RegistryError> {
    let dir = path
        .parent()
        .ok_or_else(|| std::io::Error::new(ErrorKind::InvalidInput, "registry path has no parent"))?;
    fs::create_dir_all(dir)?;

    let mut bytes = serde_json::to_vec_pretty(registry)?;
    bytes.push(b'\n');
    let version = RegistryVersion::from_content(&bytes);

    let temp_path = dir.join(format!("{REGISTRY_FILE}.tmp.{}", version.short()));
    let written = fs::File::create(&temp_path).and_then(|mut f| {
        f.write_all(&bytes)?;
        f.sync_all()?;
        drop(f);
        fs::rename(&temp_path, path)
    });
    if let Err(e) = written {
        if let Err(cleanup) = fs::remove_file(&temp_path) {
            if cleanup.kind() != ErrorKind::NotFound {
                warn!(path = %temp_path.display(), error = %cleanup, "cannot remove temp registry file");
            }
        }
        return Err(e.into());
    }

    Ok(version)
}
