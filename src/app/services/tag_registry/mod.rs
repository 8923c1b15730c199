//! Tag registry keyed by tag name
//!
//! The registry holds one [`TagRecord`] per tag name for a whole run, in the
//! order tags were first seen. Primary rows create records, eligible signal
//! rows add I/O fields, and enrichment adds setpoints. Records are never
//! removed.
//!
//! Tag names are expected to be unique across every controller in the export
//! tree. When they are not, the configured [`DuplicateTagPolicy`] decides the
//! outcome and the caller is told which controller lost.

use std::collections::HashMap;
use tracing::debug;

use crate::app::models::{SignalFields, TagRecord};
use crate::config::DuplicateTagPolicy;
use crate::error::{Error, Result};


/// Outcome of registering a primary record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// First record with this tag name
    Inserted,
    /// An earlier record was overwritten in place
    Replaced { previous_origin: String },
}

/// Outcome of merging a signal into a tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalMerge {
    /// The tag had no signal yet and now carries this one
    Merged,
    /// The tag already carried a signal; the new one was ignored
    AlreadyMerged,
}

/// Insertion-ordered mapping from tag name to tag record
#[derive(Debug, Clone)]
pub struct TagRegistry {
    entries: Vec<TagRecord>,
    index: HashMap<String, usize>,
    policy: DuplicateTagPolicy,
}

impl TagRegistry {
    /// Create an empty registry
    pub fn new(policy: DuplicateTagPolicy) -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            policy,
        }
    }

    /// Add a record built from a primary row
    ///
    /// Under [`DuplicateTagPolicy::Replace`] a repeated tag name overwrites
    /// the earlier record, signal and all, but keeps its position. Under
    /// [`DuplicateTagPolicy::Reject`] the earlier record stays and
    /// [`Error::DuplicateTag`] is returned.
    pub fn register_primary(&mut self, record: TagRecord) -> Result<Registration> {
        match self.index.get(&record.tag_name) {
            None => {
                self.index
                    .insert(record.tag_name.clone(), self.entries.len());
                self.entries.push(record);
                Ok(Registration::Inserted)
            }
            Some(&position) => {
                let previous_origin = self.entries[position].origin();
                match self.policy {
                    DuplicateTagPolicy::Replace => {
                        self.entries[position] = record;
                        Ok(Registration::Replaced { previous_origin })
                    }
                    DuplicateTagPolicy::Reject => Err(Error::DuplicateTag {
                        tag_name: record.tag_name.clone(),
                        existing: previous_origin,
                        rejected: record.origin(),
                    }),
                }
            }
        }
    }

    /// Attach signal fields to an existing tag
    ///
    /// Fields are never overwritten: a tag that already carries a signal
    /// keeps it. Fails with [`Error::UnknownTag`] when no primary record
    /// exists for `tag_name`.
    pub fn merge_secondary(&mut self, tag_name: &str, fields: SignalFields) -> Result<SignalMerge> {
        let record = self
            .get_mut(tag_name)
            .ok_or_else(|| Error::UnknownTag {
                tag_name: tag_name.to_string(),
            })?;

        if record.signal.is_some() {
            debug!(
                "Tag {} already has a signal, ignoring I/O address {}",
                tag_name, fields.io_address
            );
            return Ok(SignalMerge::AlreadyMerged);
        }

        record.signal = Some(fields);
        Ok(SignalMerge::Merged)
    }

    /// Records matching `predicate`, in insertion order
    pub fn filter<'a, P>(&'a self, mut predicate: P) -> impl Iterator<Item = &'a TagRecord> + 'a
    where
        P: FnMut(&TagRecord) -> bool + 'a,
    {
        self.entries.iter().filter(move |record| predicate(*record))
    }

    /// All records in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &TagRecord> {
        self.entries.iter()
    }

    pub fn get(&self, tag_name: &str) -> Option<&TagRecord> {
        self.index.get(tag_name).map(|&position| &self.entries[position])
    }

    pub fn get_mut(&mut self, tag_name: &str) -> Option<&mut TagRecord> {
        let position = *self.index.get(tag_name)?;
        Some(&mut self.entries[position])
    }

    pub fn contains(&self, tag_name: &str) -> bool {
        self.index.contains_key(tag_name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn policy(&self) -> DuplicateTagPolicy {
        self.policy
    }
}

impl Default for TagRegistry {
    fn default() -> Self {
        Self::new(DuplicateTagPolicy::Replace)
    }
}
