// SPDX-License-Identifier: MPL-2.0
//! Grouping of flat storage keys into a navigable directory tree.
//!
//! The first key segment is treated as the bucket-root marker and dropped.
//! The remaining segments are grouped level by level: a group recurses one
//! level deeper only while every member still has at least two segments below
//! the grouping segment, otherwise it resolves to a flat list of files.
//!
//! Sibling order is the order in which a segment first appears in the input.
//! Use [`TreeNode::sorted`] when a deterministic alphabetical order is needed.
//!
//! # Example
//!
//! ```
//! use bucket_roster::domain::tree::{build_tree, TreeEntry};
//!
//! let keys = ["bucket/a/x.png", "bucket/a/y.png", "bucket/b/z.png"];
//! let tree = build_tree(keys, "https://s3.amazonaws.com", "bucket").unwrap();
//!
//! let names: Vec<_> = tree.keys().collect();
//! assert_eq!(names, vec!["a", "b"]);
//! assert!(matches!(tree.get("a"), Some(TreeEntry::Files(files)) if files.len() == 2));
//! ```

use crate::domain::storage::{join_url, KEY_DELIMITER};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Errors raised while building a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The same path is both a file and a directory at one level.
    #[error("'{path}' is both a file and a directory")]
    Collision { path: String },
}

// =============================================================================
// LeafRecord
// =============================================================================

/// A terminal object entry of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafRecord {
    /// Remaining segments joined by `-`.
    pub id: String,
    /// Last segment (the file name).
    pub name: String,
    /// First remaining segment.
    pub directory: String,
    /// Resolved object URL (`<storage-root>/<bucket>/<key>`).
    pub url: String,
    /// Key segments after the bucket-root marker.
    pub segments: Vec<String>,
}

impl LeafRecord {
    /// Builds the leaf for one raw key.
    ///
    /// A key without any `/` has no segment left after the root marker; it is
    /// kept as a single empty segment so it still groups at the top level,
    /// and its raw key is used as the display name.
    #[must_use]
    pub fn from_key(key: &str, storage_root: &str, bucket: &str) -> Self {
        let url = join_url(&join_url(storage_root, bucket), key);
        let segments: Vec<String> = key
            .split(KEY_DELIMITER)
            .skip(1)
            .map(str::to_string)
            .collect();

        match (segments.first(), segments.last()) {
            (Some(directory), Some(name)) => Self {
                id: segments.join("-"),
                name: name.clone(),
                directory: directory.clone(),
                url,
                segments,
            },
            _ => Self {
                id: String::new(),
                name: key.to_string(),
                directory: String::new(),
                url,
                segments: vec![String::new()],
            },
        }
    }

    fn path_prefix(&self, len: usize) -> String {
        self.segments[..len].join("/")
    }
}

// =============================================================================
// TreeNode
// =============================================================================

/// Content under one segment name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEntry {
    /// A nested directory level.
    Directory(TreeNode),
    /// Files that are not grouped any further.
    Files(Vec<LeafRecord>),
}

impl TreeEntry {
    /// Total number of leaves below this entry.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match self {
            TreeEntry::Directory(node) => node.leaf_count(),
            TreeEntry::Files(files) => files.len(),
        }
    }
}

/// One directory level: segment names mapped to their content, in
/// first-occurrence order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeNode {
    entries: Vec<(String, TreeEntry)>,
}

impl TreeNode {
    /// Creates an empty node.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of direct entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Looks up a direct child by segment name.
    #[must_use]
    pub fn get(&self, segment: &str) -> Option<&TreeEntry> {
        self.entries
            .iter()
            .find(|(name, _)| name == segment)
            .map(|(_, entry)| entry)
    }

    /// Follows a chain of directory names.
    #[must_use]
    pub fn descend<'a, I>(&self, path: I) -> Option<&TreeEntry>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut path = path.into_iter();
        let mut entry = self.get(path.next()?)?;
        for segment in path {
            match entry {
                TreeEntry::Directory(node) => entry = node.get(segment)?,
                TreeEntry::Files(_) => return None,
            }
        }
        Some(entry)
    }

    /// Segment names of the direct entries.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Direct entries in display order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TreeEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// Total number of leaves in the tree.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.entries.iter().map(|(_, entry)| entry.leaf_count()).sum()
    }

    /// Returns a deep copy with directories and files ordered by name.
    #[must_use]
    pub fn sorted(&self) -> Self {
        let mut entries: Vec<(String, TreeEntry)> = self
            .entries
            .iter()
            .map(|(name, entry)| {
                let entry = match entry {
                    TreeEntry::Directory(node) => TreeEntry::Directory(node.sorted()),
                    TreeEntry::Files(files) => {
                        let mut files = files.clone();
                        files.sort_by(|a, b| a.name.cmp(&b.name));
                        TreeEntry::Files(files)
                    }
                };
                (name.clone(), entry)
            })
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Self { entries }
    }
}

// =============================================================================
// Grouping
// =============================================================================

/// Builds the directory tree for a set of raw keys.
///
/// # Errors
///
/// Returns [`TreeError::Collision`] when one key names a file at the same
/// path another key uses as a directory.
pub fn build_tree<I, S>(keys: I, storage_root: &str, bucket: &str) -> Result<TreeNode, TreeError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let records = keys
        .into_iter()
        .map(|key| LeafRecord::from_key(key.as_ref(), storage_root, bucket))
        .collect();
    group_records(records, 0)
}

/// Groups leaves by their segment at `depth`, recursing where every member
/// continues at least two levels further.
pub fn group_records(records: Vec<LeafRecord>, depth: usize) -> Result<TreeNode, TreeError> {
    let mut node = TreeNode::new();

    for (segment, members) in bucket_by_segment(records, depth) {
        let min_len = members
            .iter()
            .map(|record| record.segments.len())
            .min()
            .unwrap_or(0);

        let entry = if min_len > depth + 2 {
            TreeEntry::Directory(group_records(members, depth + 1)?)
        } else {
            ensure_no_collision(&members, depth)?;
            TreeEntry::Files(members)
        };
        node.entries.push((segment, entry));
    }

    Ok(node)
}

fn bucket_by_segment(records: Vec<LeafRecord>, depth: usize) -> Vec<(String, Vec<LeafRecord>)> {
    let mut buckets: Vec<(String, Vec<LeafRecord>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let segment = record.segments.get(depth).cloned().unwrap_or_default();
        match index.get(&segment) {
            Some(&slot) => buckets[slot].1.push(record),
            None => {
                index.insert(segment.clone(), buckets.len());
                buckets.push((segment, vec![record]));
            }
        }
    }

    buckets
}

/// A flat file list hides structure below it, so a member whose full path is
/// a strict prefix of another member's path would be both file and directory.
fn ensure_no_collision(members: &[LeafRecord], depth: usize) -> Result<(), TreeError> {
    if members.len() < 2 {
        return Ok(());
    }

    let files: HashSet<String> = members
        .iter()
        .map(|record| record.path_prefix(record.segments.len()))
        .collect();

    for record in members {
        for len in (depth + 1)..record.segments.len() {
            let prefix = record.path_prefix(len);
            if files.contains(&prefix) {
                return Err(TreeError::Collision { path: prefix });
            }
        }
    }

    Ok(())
}
