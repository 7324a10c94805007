//! Registry of named indexes on disk.
//!
//! Layout: `<root>/<kind>/<dir>/` holds the Tantivy files plus a
//! `descriptor.json` recording the index name, kind and analyzer. The
//! descriptor is written last, so a directory without one is treated as
//! absent.
//!
//! Index names are graph labels and may contain any character. Names made
//! only of ASCII letters, digits, `_` and `-` are used as the directory
//! name directly; any other name is stored as `~` followed by the hex of
//! its UTF-8 bytes. `~` never appears in a direct name, so the mapping is
//! one-to-one.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use fulltext_types::{AnalyzerConfig, IndexDescriptor, IndexKind};

use crate::analyzer::Analyzers;
use crate::error::{SearchError, TokenizationError};
use crate::index::{LabelIndex, DEFAULT_WRITER_MEMORY_MB};

const DESCRIPTOR_FILE: &str = "descriptor.json";
const ENCODED_PREFIX: char = '~';

/// Only the empty name is rejected.
pub fn validate_index_name(name: &str) -> Result<(), SearchError> {
    if name.is_empty() {
        Err(SearchError::InvalidIndexName(name.to_string()))
    } else {
        Ok(())
    }
}

/// Directory name holding the index called `name`.
pub fn index_dir_name(name: &str) -> Result<String, SearchError> {
    validate_index_name(name)?;
    let direct = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if direct {
        Ok(name.to_string())
    } else {
        Ok(format!("{}{}", ENCODED_PREFIX, hex::encode(name.as_bytes())))
    }
}

/// Creates, opens, lists and deletes named indexes under one root directory.
#[derive(Debug, Clone)]
pub struct IndexStore {
    root: PathBuf,
    analyzers: Analyzers,
    writer_memory_mb: usize,
}

impl IndexStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            analyzers: Analyzers::new(),
            writer_memory_mb: DEFAULT_WRITER_MEMORY_MB,
        }
    }

    pub fn with_memory_mb(mut self, mb: usize) -> Self {
        self.writer_memory_mb = mb;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn analyzers(&self) -> &Analyzers {
        &self.analyzers
    }

    fn kind_dir(&self, kind: IndexKind) -> PathBuf {
        self.root.join(kind.dir_name())
    }

    fn index_dir(&self, kind: IndexKind, name: &str) -> Result<PathBuf, SearchError> {
        Ok(self.kind_dir(kind).join(index_dir_name(name)?))
    }

    fn read_descriptor(dir: &Path) -> Result<Option<IndexDescriptor>, SearchError> {
        let path = dir.join(DESCRIPTOR_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&path)?;
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    /// Descriptor of an existing index.
    pub fn descriptor(
        &self,
        kind: IndexKind,
        name: &str,
    ) -> Result<Option<IndexDescriptor>, SearchError> {
        Self::read_descriptor(&self.index_dir(kind, name)?)
    }

    /// Whether an index of this kind and name exists. Invalid names never exist.
    pub fn exists(&self, kind: IndexKind, name: &str) -> bool {
        match self.descriptor(kind, name) {
            Ok(found) => found.is_some(),
            Err(e) => {
                debug!(name, error = %e, "Treating unreadable index as absent");
                false
            }
        }
    }

    /// Return the index, creating it with `analyzer` if absent.
    ///
    /// An existing index must carry the same analyzer configuration.
    pub fn ensure(
        &self,
        kind: IndexKind,
        name: &str,
        analyzer: &AnalyzerConfig,
    ) -> Result<LabelIndex, SearchError> {
        let dir = self.index_dir(kind, name)?;
        if let Some(existing) = Self::read_descriptor(&dir)? {
            if &existing.analyzer != analyzer {
                return Err(SearchError::ConfigConflict {
                    name: name.to_string(),
                    existing: existing.analyzer,
                    requested: analyzer.clone(),
                });
            }
            return LabelIndex::open_or_create(
                &dir,
                existing,
                &self.analyzers,
                self.writer_memory_mb,
            );
        }

        let analyzer_id = analyzer.analyzer_id();
        if !self.analyzers.contains(analyzer_id) {
            return Err(TokenizationError::UnknownAnalyzer(analyzer_id.to_string()).into());
        }

        let descriptor = IndexDescriptor::new(name, kind, analyzer.clone());
        let index =
            LabelIndex::open_or_create(&dir, descriptor.clone(), &self.analyzers, self.writer_memory_mb)?;
        fs::write(
            dir.join(DESCRIPTOR_FILE),
            serde_json::to_vec_pretty(&descriptor)?,
        )?;
        info!(kind = %kind, name, analyzer = analyzer_id, "Created index");
        Ok(index)
    }

    /// Open an existing index, or `None` if it does not exist.
    pub fn open(&self, kind: IndexKind, name: &str) -> Result<Option<LabelIndex>, SearchError> {
        let dir = self.index_dir(kind, name)?;
        match Self::read_descriptor(&dir)? {
            Some(descriptor) => Ok(Some(LabelIndex::open_or_create(
                &dir,
                descriptor,
                &self.analyzers,
                self.writer_memory_mb,
            )?)),
            None => Ok(None),
        }
    }

    /// Like [`open`](Self::open), but a name that cannot exist yields `None`.
    pub fn find(&self, kind: IndexKind, name: &str) -> Result<Option<LabelIndex>, SearchError> {
        match self.open(kind, name) {
            Err(SearchError::InvalidIndexName(_)) => Ok(None),
            other => other,
        }
    }

    /// Descriptors of every index of one kind, sorted by name.
    pub fn list(&self, kind: IndexKind) -> Result<Vec<IndexDescriptor>, SearchError> {
        let dir = self.kind_dir(kind);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut descriptors = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            match Self::read_descriptor(&entry.path()) {
                Ok(Some(descriptor)) => descriptors.push(descriptor),
                Ok(None) => {
                    debug!(path = ?entry.path(), "Skipping directory without descriptor")
                }
                Err(e) => warn!(path = ?entry.path(), error = %e, "Skipping unreadable index"),
            }
        }
        descriptors.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(descriptors)
    }

    /// Names of every index of one kind, sorted.
    pub fn list_names(&self, kind: IndexKind) -> Result<Vec<String>, SearchError> {
        Ok(self.list(kind)?.into_iter().map(|d| d.name).collect())
    }

    /// Delete an index and its files. Returns its descriptor if it existed.
    pub fn delete(
        &self,
        kind: IndexKind,
        name: &str,
    ) -> Result<Option<IndexDescriptor>, SearchError> {
        let dir = self.index_dir(kind, name)?;
        let Some(descriptor) = Self::read_descriptor(&dir)? else {
            return Ok(None);
        };
        fs::remove_dir_all(&dir)?;
        info!(kind = %kind, name, "Deleted index");
        Ok(Some(descriptor))
    }
}
