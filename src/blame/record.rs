use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::integrations::Decoration;

/// One line of blame output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlameEntry {
    /// One-based line number.
    pub line: u32,
    pub revision: String,
    /// Author as reported by blame itself, if the client has it.
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

impl BlameEntry {
    pub fn new(line: u32, revision: impl Into<String>) -> Self {
        Self {
            line,
            revision: revision.into(),
            author: None,
            date: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionMetadata {
    pub revision: String,
    pub author: Option<String>,
    pub date: Option<String>,
    pub message: Option<String>,
}

impl RevisionMetadata {
    pub fn new(revision: impl Into<String>) -> Self {
        Self {
            revision: revision.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct LineAnnotation {
    pub decoration: Decoration,
    pub metadata: RevisionMetadata,
}

/// Blame overlay currently applied to one file, keyed by one-based line.
#[derive(Debug, Clone, Default)]
pub struct AnnotationRecord {
    lines: BTreeMap<u32, LineAnnotation>,
}

impl AnnotationRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, line: u32) -> Option<&LineAnnotation> {
        self.lines.get(&line)
    }

    /// Replaces the slot for `line`. The previous annotation is returned, not disposed.
    pub fn insert(&mut self, line: u32, annotation: LineAnnotation) -> Option<LineAnnotation> {
        self.lines.insert(line, annotation)
    }

    pub fn remove(&mut self, line: u32) -> Option<LineAnnotation> {
        self.lines.remove(&line)
    }

    pub fn lines(&self) -> impl Iterator<Item = u32> + '_ {
        self.lines.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &LineAnnotation)> {
        self.lines.iter().map(|(line, annotation)| (*line, annotation))
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn dispose_all(&self) {
        for annotation in self.lines.values() {
            annotation.decoration.dispose();
        }
    }
}

/// Distinct revisions referenced by `entries`, sorted.
pub fn unique_revisions(entries: &[BlameEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|entry| entry.revision.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Pairs every blame line with its revision metadata.
///
/// Log data wins; the author and date carried by the blame entry fill in
/// whatever the logs did not provide.
pub fn join_metadata(
    entries: &[BlameEntry],
    logs: &[RevisionMetadata],
) -> Vec<(u32, RevisionMetadata)> {
    let by_revision: HashMap<&str, &RevisionMetadata> = logs
        .iter()
        .map(|log| (log.revision.as_str(), log))
        .collect();

    entries
        .iter()
        .map(|entry| {
            let log = by_revision.get(entry.revision.as_str());
            let metadata = RevisionMetadata {
                revision: entry.revision.clone(),
                author: log
                    .and_then(|log| log.author.clone())
                    .or_else(|| entry.author.clone()),
                date: log
                    .and_then(|log| log.date.clone())
                    .or_else(|| entry.date.clone()),
                message: log.and_then(|log| log.message.clone()),
            };
            (entry.line, metadata)
        })
        .collect()
}
