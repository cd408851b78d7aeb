//! Pack layout.
//!
//! Containers stack their visible children along the pack axis and stretch
//! them across the other one. Sizing runs top-down in two passes:
//!
//! 1. [`ControlTree::resize_children`] gives every child its minimal size
//!    along the pack axis plus a share of the parent's slack proportional to
//!    its scale.
//! 2. [`ControlTree::place_children`] walks children in insertion order from
//!    the parent's content origin, advancing by size plus gap.
//!
//! All arithmetic is in whole cells. When any child has a non-zero scale,
//! children plus gaps plus padding fill the parent exactly.

use super::tree::{ControlId, ControlTree};
use crate::geometry::{Offset, Size};

impl ControlTree {
    /// Visible children of `id`, in insertion order.
    fn visible_children(&self, id: ControlId) -> Vec<ControlId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|&c| self.nodes.get(c).is_some_and(|n| n.state.visible))
            .collect()
    }

    /// Footprint of the visible children plus gaps and padding, ignoring
    /// the control's own constraint. `None` for leaves.
    fn content_minimum(&self, id: ControlId) -> Option<Size> {
        let state = &self.nodes.get(id)?.state;
        let kids = self.visible_children(id);
        if kids.is_empty() {
            return None;
        }
        let pack = state.pack;
        let mut along = state.gap * (kids.len() as i32 - 1) + 2 * state.padding.along(pack);
        let mut across = 0;
        for kid in kids {
            let min = self.minimal_size(kid);
            along += min.along(pack);
            across = across.max(min.across(pack));
        }
        across += 2 * state.padding.across(pack);
        Some(Size::from_axes(pack, along, across))
    }

    /// Smallest size `id` can take.
    ///
    /// A leaf's minimal size is its constraint. A container's is the sum of
    /// its visible children along the pack axis plus gaps, the largest child
    /// across it, both plus padding on each side, and never below its own
    /// constraint.
    pub fn minimal_size(&self, id: ControlId) -> Size {
        let Some(node) = self.nodes.get(id) else {
            return Size::ZERO;
        };
        match self.content_minimum(id) {
            Some(content) => content.max(node.state.min),
            None => node.state.min,
        }
    }

    /// Resize `id`, clamped to its minimal size, and lay out its subtree.
    /// No-op if the size does not change.
    pub fn set_size(&mut self, id: ControlId, width: i32, height: i32) {
        let min = self.minimal_size(id);
        let size = Size::new(width, height).max(min);
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        if node.state.size == size {
            return;
        }
        node.state.size = size;
        self.resize_children(id);
        self.place_children(id);
    }

    /// Move `id` and its subtree so its top-left corner is at (x, y).
    pub fn set_pos(&mut self, id: ControlId, x: i32, y: i32) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        let pos = Offset::new(x, y);
        if node.state.pos == pos {
            return;
        }
        node.state.pos = pos;
        self.place_children(id);
    }

    /// Set the minimum size and re-clamp. Negative values clamp to 0.
    pub fn set_constraints(&mut self, id: ControlId, min_width: i32, min_height: i32) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        node.state.min = Size::new(min_width.max(0), min_height.max(0));
        self.relayout(id);
    }

    /// Distribute `id`'s slack among its visible children by scale, then
    /// recurse into each child.
    ///
    /// A child with scale 0 keeps its minimal size along the pack axis. When
    /// one child holds the whole scale total it takes all the slack; otherwise
    /// each takes `slack * scale / total` and the rounding remainder goes to
    /// the last scaled child. Children are stretched across the pack axis to
    /// the parent's content size.
    pub fn resize_children(&mut self, id: ControlId) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        let Some(content) = self.content_minimum(id) else {
            return;
        };
        let state = &node.state;
        let pack = state.pack;
        let slack = (state.size.along(pack) - content.along(pack)).max(0);
        let cross = state.size.across(pack) - 2 * state.padding.across(pack);

        let kids = self.visible_children(id);
        let total: i64 = kids
            .iter()
            .map(|&k| i64::from(self.nodes[k].state.scale))
            .sum();
        let last_scaled = kids
            .iter()
            .rposition(|&k| self.nodes[k].state.scale > 0);

        let mut remaining = slack;
        for (i, &kid) in kids.iter().enumerate() {
            let min = self.minimal_size(kid);
            let scale = i64::from(self.nodes[kid].state.scale);
            let mut along = min.along(pack);
            if scale > 0 {
                let share = if scale == total || Some(i) == last_scaled {
                    remaining
                } else {
                    (i64::from(slack) * scale / total) as i32
                };
                remaining -= share;
                along += share;
            }
            let across = cross.max(min.across(pack));
            self.nodes[kid].state.size = Size::from_axes(pack, along, across);
            self.resize_children(kid);
        }
    }

    /// Position `id`'s visible children from its content origin, then
    /// recurse into each child.
    pub fn place_children(&mut self, id: ControlId) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        let state = &node.state;
        let pack = state.pack;
        let origin = state.content_region().offset();
        let gap = state.gap;

        let mut cursor = 0;
        for kid in self.visible_children(id) {
            let pos = Offset::from_axes(pack, cursor, 0) + origin;
            let child = &mut self.nodes[kid].state;
            child.pos = pos;
            cursor += child.size.along(pack) + gap;
            self.place_children(kid);
        }
    }

    /// Re-run layout for the whole tree containing `id`: clamp the root to
    /// its minimal size, then resize and place everything below it.
    pub fn relayout(&mut self, id: ControlId) {
        let root = self.root_of(id);
        let min = self.minimal_size(root);
        if let Some(node) = self.nodes.get_mut(root) {
            node.state.size = node.state.size.max(min);
        }
        self.resize_children(root);
        self.place_children(root);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::ControlState;
    use crate::geometry::{Pack, Region};
    use crate::widgets::Panel;
    use pretty_assertions::assert_eq;

    fn widths(tree: &ControlTree, ids: &[ControlId]) -> Vec<i32> {
        ids.iter().map(|&id| tree.state(id).unwrap().size().width).collect()
    }

    /// Horizontal row, gap 1, three children of min width 5 with scales 0/1/1.
    fn row() -> (ControlTree, ControlId, Vec<ControlId>) {
        let mut tree = ControlTree::new();
        let root = tree.insert(ControlState::new("row").with_gap(1), Panel::new());
        let kids = [0, 1, 1]
            .into_iter()
            .map(|scale| {
                tree.create(
                    root,
                    ControlState::new("").with_min(5, 1).with_scale(scale),
                    Panel::new(),
                )
            })
            .collect();
        (tree, root, kids)
    }

    // ── MinimalSize ──────────────────────────────────────────────────

    #[test]
    fn minimal_size_sums_along_and_maxes_across() {
        let mut tree = ControlTree::new();
        let root = tree.insert(
            ControlState::new("").with_pack(Pack::Vertical).with_gap(2).with_padding(1, 1),
            Panel::new(),
        );
        tree.create(root, ControlState::new("").with_min(4, 3), Panel::new());
        tree.create(root, ControlState::new("").with_min(7, 2), Panel::new());
        assert_eq!(tree.minimal_size(root), Size::new(9, 9));
    }

    #[test]
    fn own_constraint_is_a_floor() {
        let mut tree = ControlTree::new();
        let root = tree.insert(ControlState::new("").with_min(30, 1), Panel::new());
        tree.create(root, ControlState::new("").with_min(4, 3), Panel::new());
        assert_eq!(tree.minimal_size(root), Size::new(30, 3));
    }

    #[test]
    fn hidden_children_take_no_space() {
        let (mut tree, root, kids) = row();
        assert_eq!(tree.minimal_size(root).width, 17);
        tree.set_visible(kids[1], false);
        assert_eq!(tree.minimal_size(root).width, 11);
    }

    #[test]
    fn set_size_clamps_to_minimal_size() {
        let (mut tree, root, _) = row();
        tree.set_size(root, 3, 0);
        assert_eq!(tree.state(root).unwrap().size(), Size::new(17, 1));
    }

    #[test]
    fn set_constraints_reclamps() {
        let mut tree = ControlTree::new();
        let leaf = tree.insert(ControlState::new(""), Panel::new());
        tree.set_size(leaf, 2, 2);
        tree.set_constraints(leaf, 5, 1);
        assert_eq!(tree.state(leaf).unwrap().size(), Size::new(5, 2));
    }

    // ── ResizeChildren ───────────────────────────────────────────────

    #[test]
    fn slack_is_split_by_scale() {
        let (mut tree, root, kids) = row();
        tree.set_size(root, 23, 1);
        assert_eq!(widths(&tree, &kids), vec![5, 8, 8]);
        tree.set_size(root, 21, 1);
        assert_eq!(widths(&tree, &kids), vec![5, 7, 7]);
    }

    #[test]
    fn sizes_plus_gaps_fill_parent_exactly() {
        for width in 17..60 {
            let (mut tree, root, kids) = row();
            tree.set_size(root, width, 1);
            let used: i32 = widths(&tree, &kids).iter().sum::<i32>() + 2;
            assert_eq!(used, width, "width {width}");
        }
    }

    #[test]
    fn uneven_scales_give_remainder_to_last() {
        let mut tree = ControlTree::new();
        let root = tree.insert(ControlState::new("").with_padding(1, 0), Panel::new());
        let kids: Vec<_> = [1, 1, 1]
            .into_iter()
            .map(|s| tree.create(root, ControlState::new("").with_scale(s), Panel::new()))
            .collect();
        tree.set_size(root, 12, 1);
        assert_eq!(widths(&tree, &kids), vec![3, 3, 4]);
    }

    #[test]
    fn single_scaled_child_absorbs_all_slack() {
        let mut tree = ControlTree::new();
        let root = tree.insert(ControlState::new(""), Panel::new());
        let fixed = tree.create(root, ControlState::new("").with_min(3, 1), Panel::new());
        let grow = tree.create(root, ControlState::new("").with_min(1, 1).with_scale(7), Panel::new());
        tree.set_size(root, 40, 1);
        assert_eq!(widths(&tree, &[fixed, grow]), vec![3, 37]);
    }

    #[test]
    fn children_fill_cross_axis() {
        let (mut tree, root, kids) = row();
        tree.set_size(root, 17, 6);
        for kid in kids {
            assert_eq!(tree.state(kid).unwrap().size().height, 6);
        }
    }

    // ── PlaceChildren ────────────────────────────────────────────────

    #[test]
    fn children_are_placed_from_content_origin() {
        let mut tree = ControlTree::new();
        let root = tree.insert(
            ControlState::new("").with_pack(Pack::Vertical).with_gap(1).with_padding(2, 1),
            Panel::new(),
        );
        let a = tree.create(root, ControlState::new("").with_min(3, 2), Panel::new());
        let b = tree.create(root, ControlState::new("").with_min(3, 1), Panel::new());
        tree.set_pos(root, 10, 5);
        assert_eq!(tree.state(a).unwrap().region(), Region::new(12, 6, 3, 2));
        assert_eq!(tree.state(b).unwrap().region(), Region::new(12, 9, 3, 1));
    }

    #[test]
    fn children_stay_inside_parent_content() {
        let mut tree = ControlTree::new();
        let root = tree.insert(ControlState::new("").with_padding(1, 1).with_gap(1), Panel::new());
        let inner = tree.create(root, ControlState::new("").with_scale(1).with_pack(Pack::Vertical), Panel::new());
        let leaf = tree.create(inner, ControlState::new("").with_min(2, 2).with_scale(1), Panel::new());
        tree.set_size(root, 20, 10);
        let content = tree.state(root).unwrap().content_region();
        assert!(content.contains_region(tree.state(inner).unwrap().region()));
        assert!(content.contains_region(tree.state(leaf).unwrap().region()));
    }

    #[test]
    fn layout_is_idempotent() {
        let (mut tree, root, kids) = row();
        tree.set_size(root, 30, 3);
        let snapshot = |tree: &ControlTree| -> Vec<Region> {
            kids.iter().map(|&k| tree.state(k).unwrap().region()).collect()
        };
        let first = snapshot(&tree);
        tree.resize_children(root);
        tree.place_children(root);
        let second = snapshot(&tree);
        tree.resize_children(root);
        tree.place_children(root);
        assert_eq!(first, second);
        assert_eq!(second, snapshot(&tree));
    }

    #[test]
    fn adding_a_child_relayouts_eagerly() {
        let (mut tree, root, kids) = row();
        tree.set_size(root, 23, 1);
        let extra = tree.create(root, ControlState::new("").with_min(2, 1), Panel::new());
        assert_eq!(tree.state(root).unwrap().size().width, 23);
        assert_eq!(widths(&tree, &kids), vec![5, 6, 7]);
        assert_eq!(tree.state(extra).unwrap().pos().x, 21);
    }
}
