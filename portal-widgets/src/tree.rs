//! Structural edits on an owned widget tree.
//!
//! Every edit bumps the [`VersionMap`] entry of each node whose children
//! changed so the renderer remounts exactly those nodes.

use crate::error::{WidgetError, WidgetResult};
use crate::instance::{GridCell, WidgetInstance};
use crate::registry::TypeRegistry;
use crate::versions::VersionMap;
use tracing::debug;

pub fn find_by_id<'a>(root: &'a WidgetInstance, id: &str) -> Option<&'a WidgetInstance> {
    if root.id() == id {
        return Some(root);
    }
    root.children.iter().find_map(|c| find_by_id(c, id))
}

pub fn find_by_id_mut<'a>(root: &'a mut WidgetInstance, id: &str) -> Option<&'a mut WidgetInstance> {
    if root.id() == id {
        return Some(root);
    }
    root.children.iter_mut().find_map(|c| find_by_id_mut(c, id))
}

pub fn parent_of<'a>(root: &'a WidgetInstance, id: &str) -> Option<&'a WidgetInstance> {
    if root.children.iter().any(|c| c.id() == id) {
        return Some(root);
    }
    root.children.iter().find_map(|c| parent_of(c, id))
}

/// Nodes from `root` down to `id`, both included
pub fn path_to<'a>(root: &'a WidgetInstance, id: &str) -> Option<Vec<&'a WidgetInstance>> {
    if root.id() == id {
        return Some(vec![root]);
    }
    root.children
        .iter()
        .find_map(|c| path_to(c, id))
        .map(|mut path| {
            path.insert(0, root);
            path
        })
}

/// Insert at `index`, or append when the index is absent or out of range
pub fn insert_child(parent: &mut WidgetInstance, child: WidgetInstance, index: Option<usize>) {
    match index {
        Some(i) if i <= parent.children.len() => parent.children.insert(i, child),
        _ => parent.children.push(child),
    }
}

/// Detach the node `id` from its parent. The parent and every ancestor above
/// it get a version bump. The root itself is never removed.
pub fn remove_by_id(root: &mut WidgetInstance, id: &str, versions: &mut VersionMap) -> Option<WidgetInstance> {
    let parent_id = root.id().to_string();
    if let Some(pos) = root.children.iter().position(|c| c.id() == id) {
        let removed = root.children.remove(pos);
        versions.bump(&parent_id);
        return Some(removed);
    }
    for child in root.children.iter_mut() {
        if let Some(removed) = remove_by_id(child, id, versions) {
            versions.bump(&parent_id);
            return Some(removed);
        }
    }
    None
}

/// Add a new subtree under `parent_id`, subject to the parent's acceptance rule
pub fn attach(
    root: &mut WidgetInstance,
    registry: &TypeRegistry,
    versions: &mut VersionMap,
    parent_id: &str,
    child: WidgetInstance,
    index: Option<usize>,
) -> WidgetResult<()> {
    let mut clash = None;
    child.walk(&mut |n| {
        if clash.is_none() && find_by_id(root, n.id()).is_some() {
            clash = Some(n.id().to_string());
        }
    });
    if let Some(id) = clash {
        return Err(WidgetError::DuplicateId { id });
    }

    let parent = find_by_id(root, parent_id).ok_or_else(|| not_found(parent_id))?;
    check_drop(registry, parent, &child)?;

    let parent = find_by_id_mut(root, parent_id).ok_or_else(|| not_found(parent_id))?;
    debug!(parent = %parent_id, child = %child.id(), "attach");
    insert_child(parent, child, index);
    versions.bump(parent_id);
    Ok(())
}

/// Move `id` under `target_id`. The node keeps its id and subtree.
pub fn move_node(
    root: &mut WidgetInstance,
    registry: &TypeRegistry,
    versions: &mut VersionMap,
    id: &str,
    target_id: &str,
    index: Option<usize>,
) -> WidgetResult<()> {
    relocate(root, registry, versions, id, target_id, index, None)
}

/// Move `id` into a grid container at `(row, col)`. Existing spans are dropped.
pub fn move_to_cell(
    root: &mut WidgetInstance,
    registry: &TypeRegistry,
    versions: &mut VersionMap,
    id: &str,
    grid_id: &str,
    row: u32,
    col: u32,
) -> WidgetResult<()> {
    relocate(root, registry, versions, id, grid_id, None, Some(GridCell::new(row, col)))
}

fn relocate(
    root: &mut WidgetInstance,
    registry: &TypeRegistry,
    versions: &mut VersionMap,
    id: &str,
    target_id: &str,
    index: Option<usize>,
    cell: Option<GridCell>,
) -> WidgetResult<()> {
    if root.id() == id {
        return Err(WidgetError::InvalidMove {
            id: id.to_string(),
            reason: "the root cannot be moved".to_string(),
        });
    }
    let node = find_by_id(root, id).ok_or_else(|| not_found(id))?;
    if find_by_id(node, target_id).is_some() {
        return Err(WidgetError::InvalidMove {
            id: id.to_string(),
            reason: format!("'{}' is the node itself or one of its descendants", target_id),
        });
    }
    let target = find_by_id(root, target_id).ok_or_else(|| not_found(target_id))?;
    check_drop(registry, target, node)?;

    let mut node = remove_by_id(root, id, versions).ok_or_else(|| not_found(id))?;
    if cell.is_some() {
        node.set_cell(cell);
    }
    let target = find_by_id_mut(root, target_id).ok_or_else(|| not_found(target_id))?;
    debug!(node = %id, target = %target_id, "move");
    insert_child(target, node, index);
    versions.bump(target_id);
    Ok(())
}

/// Remove `id` and its subtree, returning it. Version entries of the removed
/// nodes are dropped.
pub fn delete_node(root: &mut WidgetInstance, versions: &mut VersionMap, id: &str) -> WidgetResult<WidgetInstance> {
    if root.id() == id {
        return Err(WidgetError::RootRemoval { id: id.to_string() });
    }
    let removed = remove_by_id(root, id, versions).ok_or_else(|| not_found(id))?;
    removed.walk(&mut |n| versions.forget(n.id()));
    Ok(removed)
}

fn check_drop(registry: &TypeRegistry, parent: &WidgetInstance, child: &WidgetInstance) -> WidgetResult<()> {
    if registry.can_accept_child(parent, child) {
        return Ok(());
    }
    Err(WidgetError::DropRejected {
        parent: parent.id().to_string(),
        parent_type: parent.widget_type().to_string(),
        child_type: child.widget_type().to_string(),
    })
}

fn not_found(id: &str) -> WidgetError {
    WidgetError::NodeNotFound { id: id.to_string() }
}
