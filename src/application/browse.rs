// SPDX-License-Identifier: MPL-2.0
//! Bucket browsing: one listing turned into a [`TreeNode`].

use crate::application::port::ObjectLister;
use crate::config::StorageConfig;
use crate::domain::tree::{build_tree, TreeEntry, TreeNode};
use crate::error::Result;
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::{debug, info};

/// Lists a bucket (or part of it) and groups the keys into a tree.
pub struct BucketBrowser {
    lister: Arc<dyn ObjectLister>,
    storage_root: String,
    bucket: String,
}

impl BucketBrowser {
    #[must_use]
    pub fn new(lister: Arc<dyn ObjectLister>, storage: &StorageConfig) -> Self {
        Self {
            lister,
            storage_root: storage.storage_root.clone(),
            bucket: storage.bucket.clone(),
        }
    }

    /// Builds the tree of every key under `prefix` (`""` for the whole bucket).
    ///
    /// # Errors
    ///
    /// Returns a transport error if the listing fails and a tree error if two
    /// keys make the same path both a file and a directory.
    pub async fn browse(&self, prefix: &str) -> Result<TreeNode> {
        let objects = self.lister.list_objects(prefix).await?;
        debug!(prefix, count = objects.len(), "building key tree");
        let tree = build_tree(
            objects.iter().map(|object| object.key.as_str()),
            &self.storage_root,
            &self.bucket,
        )?;
        info!(
            prefix,
            files = tree.leaf_count(),
            top_level = tree.len(),
            "bucket listed"
        );
        Ok(tree)
    }
}

/// Label shown for a directory segment; underscores read as spaces.
#[must_use]
pub fn directory_label(segment: &str) -> String {
    segment.replace('_', " ")
}

/// Indented text outline of a tree: directories end with `/`, files show
/// their name and URL.
#[must_use]
pub fn outline(tree: &TreeNode) -> String {
    let mut out = String::new();
    write_node(&mut out, tree, 0);
    out
}

fn write_node(out: &mut String, node: &TreeNode, depth: usize) {
    for (segment, entry) in node.iter() {
        let indent = "  ".repeat(depth);
        match entry {
            TreeEntry::Directory(child) => {
                let _ = writeln!(out, "{indent}{}/", directory_label(segment));
                write_node(out, child, depth + 1);
            }
            TreeEntry::Files(files) => {
                let _ = writeln!(out, "{indent}{}/", directory_label(segment));
                for file in files {
                    let _ = writeln!(out, "{indent}  {}  {}", file.name, file.url);
                }
            }
        }
    }
}
