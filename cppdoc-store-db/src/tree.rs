// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Breadcrumb construction for the file and declaration trees.
//!
//! Both trees are stored as rows with an optional parent id. Every package
//! owns exactly one root per tree; the root itself never appears in a
//! breadcrumb.

use std::collections::HashSet;

use crate::connection::StoreDb;
use crate::error::{Error, Result};
use crate::types::{Decl, FileDescriptor};

/// A node of a per-package tree.
pub trait TreeNode {
    /// Tree name used in error messages.
    const TREE: &'static str;

    fn id(&self) -> i64;
    fn parent_id(&self) -> Option<i64>;
    fn package_id(&self) -> i64;
}

impl TreeNode for FileDescriptor {
    const TREE: &'static str = "file";

    fn id(&self) -> i64 {
        self.id
    }

    fn parent_id(&self) -> Option<i64> {
        self.parent_id
    }

    fn package_id(&self) -> i64 {
        self.package_id
    }
}

impl TreeNode for Decl {
    const TREE: &'static str = "declaration";

    fn id(&self) -> i64 {
        self.id
    }

    fn parent_id(&self) -> Option<i64> {
        self.parent_id
    }

    fn package_id(&self) -> i64 {
        self.package_id
    }
}

/// Node lookups needed to walk a tree.
pub trait TreeSource<N: TreeNode> {
    /// All parentless nodes of a package.
    fn roots(&self, package_id: i64) -> Result<Vec<N>>;

    /// A node by id, regardless of package.
    fn node(&self, id: i64) -> Result<Option<N>>;
}

impl TreeSource<FileDescriptor> for StoreDb {
    fn roots(&self, package_id: i64) -> Result<Vec<FileDescriptor>> {
        self.query_file_roots(package_id)
    }

    fn node(&self, id: i64) -> Result<Option<FileDescriptor>> {
        self.query_file(id)
    }
}

impl TreeSource<Decl> for StoreDb {
    fn roots(&self, package_id: i64) -> Result<Vec<Decl>> {
        self.query_decl_roots(package_id)
    }

    fn node(&self, id: i64) -> Result<Option<Decl>> {
        self.query_decl(id)
    }
}

/// The unique root of a package's tree.
///
/// Fails with [`Error::MissingRoot`] unless exactly one root exists.
pub fn find_root<N, S>(source: &S, package_id: i64) -> Result<N>
where
    N: TreeNode,
    S: TreeSource<N> + ?Sized,
{
    let mut roots = source.roots(package_id)?;
    if roots.len() != 1 {
        return Err(Error::MissingRoot {
            tree: N::TREE,
            package: package_id,
            found: roots.len(),
        });
    }
    Ok(roots.remove(0))
}

/// Strict ancestors of `node` without the root, ordered root-to-node.
///
/// The chain of the root, and of any direct child of the root, is empty.
pub fn ancestors<N, S>(source: &S, node: &N) -> Result<Vec<N>>
where
    N: TreeNode,
    S: TreeSource<N> + ?Sized,
{
    let corrupt = |id| Error::CorruptTree {
        tree: N::TREE,
        node: id,
    };

    let mut chain = Vec::new();
    let mut seen = HashSet::from([node.id()]);
    let mut parent_id = node.parent_id();
    while let Some(id) = parent_id {
        if !seen.insert(id) {
            return Err(corrupt(id));
        }
        let parent = source.node(id)?.ok_or_else(|| corrupt(id))?;
        if parent.package_id() != node.package_id() {
            return Err(corrupt(id));
        }
        parent_id = parent.parent_id();
        if parent_id.is_some() {
            chain.push(parent);
        }
    }
    chain.reverse();
    Ok(chain)
}

/// A node together with its package root and breadcrumb.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeContext<N> {
    pub root: N,
    pub node: N,
    pub ancestors: Vec<N>,
}

impl<N: TreeNode + Clone> TreeContext<N> {
    /// Build the context of `node` in the tree of `package_id`.
    ///
    /// Without a node the root is shown with an empty breadcrumb.
    pub fn build<S>(source: &S, package_id: i64, node: Option<N>) -> Result<Self>
    where
        S: TreeSource<N> + ?Sized,
    {
        let root = find_root(source, package_id)?;
        let Some(node) = node else {
            return Ok(Self {
                node: root.clone(),
                root,
                ancestors: Vec::new(),
            });
        };
        if node.package_id() != package_id {
            return Err(Error::CorruptTree {
                tree: N::TREE,
                node: node.id(),
            });
        }

        let ancestors = ancestors(source, &node)?;
        Ok(Self {
            root,
            node,
            ancestors,
        })
    }
}
