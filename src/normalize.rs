//! Conversion between the flat (`parent_id` + `order`) and nested (`children` + `depth`) forms
//! of a menu.

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::id::ItemId;
use crate::model::{FlatMenuItem, MenuNode, MenuRecord};

/// Builds the nested tree from flat items.
///
/// Items whose parent is absent from the input (or is the item itself) become roots. Sibling
/// groups are sorted by `order`, keeping input order for ties, and every node's `depth` is
/// set from its position. Items reachable only through a parent cycle are promoted to roots
/// in input order, so no item is ever dropped.
pub fn build_tree<I>(items: I) -> Vec<MenuNode>
where
    I: IntoIterator<Item = FlatMenuItem>,
{
    let items: Vec<FlatMenuItem> = items.into_iter().collect();
    let known: FxHashSet<ItemId> = items.iter().map(|item| item.id).collect();
    let input_order: Vec<ItemId> = items.iter().map(|item| item.id).collect();

    let mut roots = Vec::new();
    let mut groups: FxHashMap<ItemId, Vec<FlatMenuItem>> = FxHashMap::default();
    let mut parent_of: FxHashMap<ItemId, ItemId> = FxHashMap::default();
    for item in items {
        match item.parent_id {
            Some(parent) if parent != item.id && known.contains(&parent) => {
                parent_of.insert(item.id, parent);
                groups.entry(parent).or_default().push(item);
            }
            Some(parent) => {
                trace!(id = %item.id, parent = %parent, "unknown parent, placing item at root");
                roots.push(item);
            }
            None => roots.push(item),
        }
    }

    let mut tree = attach(roots, 0, &mut groups);
    if groups.is_empty() {
        return tree;
    }

    for id in input_order {
        if groups.is_empty() {
            break;
        }
        let Some(parent) = parent_of.get(&id).copied() else {
            continue;
        };
        let Some(item) = take_grouped(&mut groups, parent, id) else {
            continue;
        };
        debug!(id = %id, parent = %parent, "parent cycle, promoting item to root");
        tree.extend(attach(vec![item], 0, &mut groups));
    }
    tree
}

/// Builds the tree from server records, generating temporary ids for unsaved records.
pub fn build_tree_from_records<I>(records: I) -> Vec<MenuNode>
where
    I: IntoIterator<Item = MenuRecord>,
{
    build_tree(records.into_iter().map(MenuRecord::into_flat))
}

fn attach(
    mut items: Vec<FlatMenuItem>,
    depth: usize,
    groups: &mut FxHashMap<ItemId, Vec<FlatMenuItem>>,
) -> Vec<MenuNode> {
    items.sort_by_key(|item| item.order);
    items
        .into_iter()
        .map(|item| {
            let children = groups
                .remove(&item.id)
                .map_or_else(Vec::new, |group| attach(group, depth + 1, groups));
            MenuNode {
                id: item.id,
                title: item.title,
                url: item.url,
                depth,
                children,
            }
        })
        .collect()
}

fn take_grouped(
    groups: &mut FxHashMap<ItemId, Vec<FlatMenuItem>>,
    parent: ItemId,
    id: ItemId,
) -> Option<FlatMenuItem> {
    let group = groups.get_mut(&parent)?;
    let idx = group.iter().position(|item| item.id == id)?;
    let item = group.remove(idx);
    if group.is_empty() {
        groups.remove(&parent);
    }
    Some(item)
}

/// Flattens the tree in pre-order (parent before children, visual order).
pub fn flatten_tree(tree: &[MenuNode]) -> Vec<FlatMenuItem> {
    let len = tree.iter().map(MenuNode::subtree_len).sum();
    let mut out = Vec::with_capacity(len);
    flatten_into(tree, None, &mut out);
    out
}

fn flatten_into(nodes: &[MenuNode], parent: Option<ItemId>, out: &mut Vec<FlatMenuItem>) {
    for (order, node) in nodes.iter().enumerate() {
        out.push(FlatMenuItem {
            id: node.id,
            parent_id: parent,
            title: node.title.clone(),
            url: node.url.clone(),
            order,
            depth: node.depth,
        });
        flatten_into(&node.children, Some(node.id), out);
    }
}

/// Rewrites every `order` to the item's index among same-parent items, in list order.
pub fn renumber_siblings(items: &mut [FlatMenuItem]) {
    let mut counters: FxHashMap<Option<ItemId>, usize> = FxHashMap::default();
    for item in items {
        let next = counters.entry(item.parent_id).or_insert(0);
        item.order = *next;
        *next += 1;
    }
}

/// Returns `id` together with every id whose ancestry passes through it.
pub fn descendants_of(items: &[FlatMenuItem], id: ItemId) -> FxHashSet<ItemId> {
    let mut children: FxHashMap<ItemId, SmallVec<[ItemId; 4]>> = FxHashMap::default();
    for item in items {
        if let Some(parent) = item.parent_id {
            children.entry(parent).or_default().push(item.id);
        }
    }

    let mut found = FxHashSet::default();
    let mut stack = vec![id];
    while let Some(current) = stack.pop() {
        if !found.insert(current) {
            continue;
        }
        if let Some(kids) = children.get(&current) {
            stack.extend(kids.iter().copied());
        }
    }
    found
}

/// Finds a node anywhere in the tree.
pub fn find_node(tree: &[MenuNode], id: ItemId) -> Option<&MenuNode> {
    tree.iter().find_map(|node| {
        if node.id == id {
            Some(node)
        } else {
            find_node(&node.children, id)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn item(id: u64, parent: Option<u64>, order: usize) -> FlatMenuItem {
        FlatMenuItem::new(ItemId::Saved(id), parent.map(ItemId::Saved), order)
            .with_title(format!("item-{id}"))
    }

    fn ids(nodes: &[MenuNode]) -> Vec<ItemId> {
        nodes.iter().map(|node| node.id).collect()
    }

    #[test]
    fn finds_nodes_at_any_depth() {
        let tree = build_tree([item(1, None, 0), item(2, Some(1), 0), item(3, Some(2), 0)]);

        let deep = find_node(&tree, ItemId::Saved(3)).map(|node| (node.id, node.depth));
        assert_eq!(deep, Some((ItemId::Saved(3), 2)));
        assert_eq!(find_node(&tree, ItemId::Saved(1)).map(|node| node.children.len()), Some(1));
        assert!(find_node(&tree, ItemId::Saved(9)).is_none());
    }

    #[test]
    fn builds_nested_levels_sorted_by_order() {
        let tree = build_tree([
            item(1, None, 1),
            item(2, None, 0),
            item(3, Some(1), 1),
            item(4, Some(1), 0),
            item(5, Some(4), 0),
        ]);

        assert_eq!(ids(&tree), vec![ItemId::Saved(2), ItemId::Saved(1)]);
        let one = &tree[1];
        assert_eq!(ids(&one.children), vec![ItemId::Saved(4), ItemId::Saved(3)]);
        assert_eq!(one.children[0].depth, 1);
        assert_eq!(one.children[0].children[0].depth, 2);
    }

    #[test]
    fn ties_keep_input_order() {
        let tree = build_tree([item(7, None, 0), item(3, None, 0), item(5, None, 0)]);
        assert_eq!(
            ids(&tree),
            vec![ItemId::Saved(7), ItemId::Saved(3), ItemId::Saved(5)]
        );
    }

    #[test]
    fn dangling_parent_becomes_root() {
        let tree = build_tree([item(1, Some(99), 0)]);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].id, ItemId::Saved(1));
        assert_eq!(tree[0].depth, 0);
    }

    #[test]
    fn self_parent_becomes_root() {
        let tree = build_tree([item(1, Some(1), 0)]);
        assert_eq!(ids(&tree), vec![ItemId::Saved(1)]);
    }

    #[test]
    fn parent_cycle_keeps_every_item() {
        let tree = build_tree([item(1, Some(2), 0), item(2, Some(1), 0), item(3, None, 0)]);
        assert_eq!(tree.iter().map(MenuNode::subtree_len).sum::<usize>(), 3);
        assert_eq!(ids(&tree), vec![ItemId::Saved(3), ItemId::Saved(1)]);
        assert_eq!(ids(&tree[1].children), vec![ItemId::Saved(2)]);
        assert_eq!(tree[1].children[0].depth, 1);
    }

    #[test]
    fn records_without_id_get_temporary_ids() {
        let tree = build_tree_from_records([MenuRecord {
            title: "Fresh".into(),
            ..MenuRecord::default()
        }]);
        assert!(tree[0].id.is_temporary());
    }

    #[test]
    fn flatten_is_preorder_with_sibling_orders() {
        let tree = build_tree([
            item(1, None, 0),
            item(2, Some(1), 0),
            item(3, Some(1), 1),
            item(4, None, 1),
        ]);
        let flat = flatten_tree(&tree);
        let summary: Vec<_> = flat
            .iter()
            .map(|i| (i.id, i.parent_id, i.order, i.depth))
            .collect();
        assert_eq!(
            summary,
            vec![
                (ItemId::Saved(1), None, 0, 0),
                (ItemId::Saved(2), Some(ItemId::Saved(1)), 0, 1),
                (ItemId::Saved(3), Some(ItemId::Saved(1)), 1, 1),
                (ItemId::Saved(4), None, 1, 0),
            ]
        );
    }

    #[test]
    fn renumber_follows_list_position() {
        let mut flat = vec![item(1, None, 5), item(2, Some(1), 9), item(3, None, 0)];
        renumber_siblings(&mut flat);
        let orders: Vec<_> = flat.iter().map(|i| i.order).collect();
        assert_eq!(orders, vec![0, 0, 1]);
    }

    #[test]
    fn descendants_follow_parent_chain() {
        let flat = vec![
            item(1, None, 0),
            item(3, Some(2), 0),
            item(2, Some(1), 0),
            item(4, None, 1),
        ];
        let found = descendants_of(&flat, ItemId::Saved(1));
        assert_eq!(found.len(), 3);
        assert!(!found.contains(&ItemId::Saved(4)));
    }

    fn check_depths(nodes: &[MenuNode], depth: usize) -> bool {
        nodes
            .iter()
            .all(|node| node.depth == depth && check_depths(&node.children, depth + 1))
    }

    fn arb_flat() -> impl Strategy<Value = Vec<FlatMenuItem>> {
        prop::collection::vec((any::<bool>(), any::<usize>(), 0usize..4), 0..40).prop_map(
            |shape| {
                shape
                    .into_iter()
                    .enumerate()
                    .map(|(idx, (nested, pick, order))| {
                        let parent = (nested && idx > 0).then(|| (pick % idx) as u64);
                        item(idx as u64, parent, order)
                    })
                    .collect()
            },
        )
    }

    proptest! {
        #[test]
        fn flatten_then_build_round_trips(flat in arb_flat()) {
            let tree = build_tree(flat);
            let rebuilt = build_tree(flatten_tree(&tree));
            prop_assert_eq!(rebuilt, tree);
        }

        #[test]
        fn depths_match_nesting(flat in arb_flat()) {
            let tree = build_tree(flat);
            prop_assert!(check_depths(&tree, 0));
        }

        #[test]
        fn flattened_orders_are_dense(flat in arb_flat()) {
            let flat = flatten_tree(&build_tree(flat));
            let mut seen: FxHashMap<Option<ItemId>, usize> = FxHashMap::default();
            for item in &flat {
                let next = seen.entry(item.parent_id).or_insert(0);
                prop_assert_eq!(item.order, *next);
                *next += 1;
            }
        }
    }
}
