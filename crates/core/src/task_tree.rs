//! Subtask hierarchy as an id-keyed arena.
//!
//! Subtasks reference their parent by id. [`TaskTree`] indexes a flat list
//! of tasks (typically all subtasks of one milestone) into roots and child
//! lists without any owning pointers, and answers re-parenting questions.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::types::DbId;

/// Anything that can sit in a [`TaskTree`].
pub trait TreeItem {
    fn id(&self) -> DbId;
    fn parent_id(&self) -> Option<DbId>;
}

/// Arena of tasks with parent back-references.
#[derive(Debug)]
pub struct TaskTree<T> {
    nodes: HashMap<DbId, T>,
    children: HashMap<DbId, Vec<DbId>>,
    roots: Vec<DbId>,
}

/// One task with its nested children, for serialization.
#[derive(Debug, Serialize)]
pub struct TaskBranch<'a, T> {
    #[serde(flatten)]
    pub task: &'a T,
    pub children: Vec<TaskBranch<'a, T>>,
}

impl<T: TreeItem> TaskTree<T> {
    /// Index `items`, preserving their relative order within each child list.
    ///
    /// A task whose parent is not among `items` is treated as a root.
    pub fn build(items: Vec<T>) -> Self {
        let ids: HashSet<DbId> = items.iter().map(TreeItem::id).collect();
        let mut children: HashMap<DbId, Vec<DbId>> = HashMap::new();
        let mut roots = Vec::new();
        let mut nodes = HashMap::with_capacity(items.len());

        for item in items {
            let id = item.id();
            match item.parent_id() {
                Some(parent) if ids.contains(&parent) && parent != id => {
                    children.entry(parent).or_default().push(id);
                }
                _ => roots.push(id),
            }
            nodes.insert(id, item);
        }

        Self {
            nodes,
            children,
            roots,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: DbId) -> Option<&T> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: DbId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Top-level task ids in input order.
    pub fn roots(&self) -> &[DbId] {
        &self.roots
    }

    /// Direct children of `id` in input order.
    pub fn children(&self, id: DbId) -> &[DbId] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether making `new_parent` the parent of `task_id` would form a loop.
    pub fn would_create_cycle(&self, task_id: DbId, new_parent: DbId) -> bool {
        if task_id == new_parent {
            return true;
        }
        let mut seen = HashSet::new();
        let mut cursor = Some(new_parent);
        while let Some(current) = cursor {
            if current == task_id {
                return true;
            }
            if !seen.insert(current) {
                // Pre-existing loop not involving `task_id`.
                return false;
            }
            cursor = self.nodes.get(&current).and_then(TreeItem::parent_id);
        }
        false
    }

    /// Nested view starting from the roots. Tasks caught in a parent loop are unreachable.
    pub fn nested(&self) -> Vec<TaskBranch<'_, T>> {
        self.roots.iter().filter_map(|id| self.branch(*id)).collect()
    }

    fn branch(&self, id: DbId) -> Option<TaskBranch<'_, T>> {
        let task = self.nodes.get(&id)?;
        let children = self
            .children(id)
            .iter()
            .filter_map(|child| self.branch(*child))
            .collect();
        Some(TaskBranch { task, children })
    }
}
