//! Control tree: insert, attach, remove, walk.

use slotmap::{new_key_type, SecondaryMap, SlotMap};

use super::state::ControlState;
use super::widget::{EventCtx, Widget};
use crate::canvas::Canvas;
use crate::error::TreeError;
use crate::event::{Event, EventSender};
use crate::theme::ThemeManager;

new_key_type! {
    /// Stable handle to a control. Copy, lightweight (u64).
    pub struct ControlId;
}

/// Empty slice constant for returning when a control has no children.
const EMPTY_CHILDREN: &[ControlId] = &[];

pub(crate) struct Node {
    pub(crate) state: ControlState,
    pub(crate) widget: Box<dyn Widget>,
}

/// Arena owning every control of an application.
///
/// Children are owned through the `children` map; the `parent` map holds
/// plain back-handles used for layout and event bubbling. Every mutation of
/// the structure re-lays out the affected root eagerly.
pub struct ControlTree {
    pub(crate) nodes: SlotMap<ControlId, Node>,
    children: SecondaryMap<ControlId, Vec<ControlId>>,
    parent: SecondaryMap<ControlId, ControlId>,
    windows: SecondaryMap<ControlId, ()>,
}

impl ControlTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            children: SecondaryMap::new(),
            parent: SecondaryMap::new(),
            windows: SecondaryMap::new(),
        }
    }

    /// Insert a detached control.
    pub fn insert(&mut self, state: ControlState, widget: impl Widget) -> ControlId {
        self.insert_boxed(state, Box::new(widget))
    }

    /// Insert a detached control from an already boxed widget.
    pub fn insert_boxed(&mut self, state: ControlState, widget: Box<dyn Widget>) -> ControlId {
        let id = self.nodes.insert(Node { state, widget });
        self.children.insert(id, Vec::new());
        id
    }

    /// Insert a window root. Window roots can never become children.
    pub fn insert_window(&mut self, state: ControlState, widget: impl Widget) -> ControlId {
        let id = self.insert(state, widget);
        self.windows.insert(id, ());
        id
    }

    /// Whether `id` is a window root.
    pub fn is_window(&self, id: ControlId) -> bool {
        self.windows.contains_key(id)
    }

    /// Insert a control and attach it as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` does not exist.
    pub fn create(&mut self, parent: ControlId, state: ControlState, widget: impl Widget) -> ControlId {
        let id = self.insert(state, widget);
        self.add_child(parent, id);
        id
    }

    /// Attach `child` as the last child of `parent` and re-lay out the root.
    ///
    /// # Panics
    ///
    /// Panics on any structural violation: the child is already attached
    /// (to this or another parent), the attach would form a cycle, the child
    /// is a window root, or either control does not exist.
    pub fn add_child(&mut self, parent: ControlId, child: ControlId) {
        if let Err(err) = self.attach(parent, child) {
            panic!("{err}");
        }
    }

    /// Checked form of [`add_child`](Self::add_child).
    pub fn attach(&mut self, parent: ControlId, child: ControlId) -> Result<(), TreeError> {
        for id in [parent, child] {
            if !self.nodes.contains_key(id) {
                return Err(TreeError::Missing(id));
            }
        }
        if self.windows.contains_key(child) {
            return Err(TreeError::WindowRoot(child));
        }
        if let Some(current) = self.parent(child) {
            return Err(if current == parent {
                TreeError::DuplicateChild { parent, child }
            } else {
                TreeError::AlreadyAttached { child, current }
            });
        }
        if parent == child || self.ancestors(parent).contains(&child) {
            return Err(TreeError::Cycle { parent, child });
        }

        self.parent.insert(child, parent);
        if let Some(kids) = self.children.get_mut(parent) {
            kids.push(child);
        }
        tracing::trace!(?parent, ?child, "control attached");
        self.relayout(parent);
        Ok(())
    }

    /// Remove a control and all its descendants, re-laying out the old root.
    ///
    /// Returns the removed control's state, or `None` if it didn't exist.
    pub fn remove(&mut self, id: ControlId) -> Option<ControlState> {
        if !self.nodes.contains_key(id) {
            return None;
        }
        let old_parent = self.parent.remove(id);
        if let Some(parent_id) = old_parent {
            if let Some(siblings) = self.children.get_mut(parent_id) {
                siblings.retain(|&c| c != id);
            }
        }

        let mut removed = None;
        for current in self.walk_depth_first(id) {
            self.children.remove(current);
            self.parent.remove(current);
            self.windows.remove(current);
            let node = self.nodes.remove(current);
            if current == id {
                removed = node.map(|n| n.state);
            }
        }

        if let Some(parent_id) = old_parent {
            self.relayout(parent_id);
        }
        removed
    }

    /// Get the parent of a control, if it has one.
    pub fn parent(&self, id: ControlId) -> Option<ControlId> {
        self.parent.get(id).copied()
    }

    /// Children in insertion order. Empty if none or if `id` does not exist.
    pub fn children(&self, id: ControlId) -> &[ControlId] {
        self.children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// Ancestors from the immediate parent up to the root (excluding `id`).
    pub fn ancestors(&self, id: ControlId) -> Vec<ControlId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(p) = self.parent.get(current).copied() {
            result.push(p);
            current = p;
        }
        result
    }

    /// `[id, parent, ..., root]`. Empty if `id` does not exist.
    pub fn bubble_path(&self, id: ControlId) -> Vec<ControlId> {
        if !self.contains(id) {
            return Vec::new();
        }
        let mut path = vec![id];
        path.extend(self.ancestors(id));
        path
    }

    /// The topmost ancestor of `id` (or `id` itself).
    pub fn root_of(&self, id: ControlId) -> ControlId {
        self.ancestors(id).last().copied().unwrap_or(id)
    }

    /// Pre-order depth-first traversal starting from `start`.
    pub fn walk_depth_first(&self, start: ControlId) -> Vec<ControlId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            for &child in self.children(current).iter().rev() {
                stack.push(child);
            }
        }
        result
    }

    /// Whether the control and every ancestor are visible.
    pub fn is_shown(&self, id: ControlId) -> bool {
        self.bubble_path(id)
            .iter()
            .all(|&c| self.nodes.get(c).is_some_and(|n| n.state.visible))
    }

    /// Whether the tree contains a control with the given id.
    pub fn contains(&self, id: ControlId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of controls.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ── State & widget access ────────────────────────────────────────

    pub fn state(&self, id: ControlId) -> Option<&ControlState> {
        self.nodes.get(id).map(|n| &n.state)
    }

    /// Mutable state. Call [`relayout`](Self::relayout) after changing
    /// `scale`; geometry setters live on the tree.
    pub fn state_mut(&mut self, id: ControlId) -> Option<&mut ControlState> {
        self.nodes.get_mut(id).map(|n| &mut n.state)
    }

    /// Downcast the widget of `id` to a concrete type.
    pub fn widget<W: Widget>(&self, id: ControlId) -> Option<&W> {
        self.nodes.get(id)?.widget.as_any().downcast_ref::<W>()
    }

    /// Mutable downcast of the widget of `id`.
    pub fn widget_mut<W: Widget>(&mut self, id: ControlId) -> Option<&mut W> {
        self.nodes.get_mut(id)?.widget.as_any_mut().downcast_mut::<W>()
    }

    /// Kind name of the widget of `id`.
    pub fn widget_type(&self, id: ControlId) -> Option<&'static str> {
        self.nodes.get(id).map(|n| n.widget.widget_type())
    }

    // ── Flags ────────────────────────────────────────────────────────

    /// Show or hide a control. Hidden controls take no space, so the root
    /// is re-laid out.
    pub fn set_visible(&mut self, id: ControlId, visible: bool) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        if node.state.visible == visible {
            return;
        }
        node.state.visible = visible;
        self.relayout(id);
    }

    pub fn set_enabled(&mut self, id: ControlId, enabled: bool) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.state.enabled = enabled;
        }
    }

    // ── Events ───────────────────────────────────────────────────────

    /// Hand `event` to the widget of `id`. Returns whether it was handled.
    pub fn deliver(&mut self, id: ControlId, event: &Event, sender: &EventSender) -> bool {
        let Some(Node { state, widget }) = self.nodes.get_mut(id) else {
            return false;
        };
        let mut ctx = EventCtx { id, state, sender };
        widget.process_event(&mut ctx, event)
    }

    // ── Drawing ──────────────────────────────────────────────────────

    /// Draw `id` and its visible descendants, each clipped to its own box
    /// intersected with its parent's.
    pub fn draw(&self, id: ControlId, canvas: &mut Canvas, theme: &ThemeManager) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        if !node.state.visible {
            return;
        }
        let mut clipped = canvas.clipped(node.state.region());
        node.widget.draw(&node.state, &mut clipped, theme);
        for &child in self.children(id) {
            self.draw(child, &mut clipped, theme);
        }
    }
}

impl Default for ControlTree {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ControlTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlTree")
            .field("controls", &self.nodes.len())
            .field("windows", &self.windows.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::Panel;

    /// Build a small test tree:
    /// ```text
    ///       root
    ///      /    \
    ///    a        b
    ///   / \
    ///  c   d
    /// ```
    fn build_tree() -> (ControlTree, ControlId, ControlId, ControlId, ControlId, ControlId) {
        let mut tree = ControlTree::new();
        let root = tree.insert(ControlState::new("root"), Panel::new());
        let a = tree.create(root, ControlState::new("a"), Panel::new());
        let b = tree.create(root, ControlState::new("b"), Panel::new());
        let c = tree.create(a, ControlState::new("c"), Panel::new());
        let d = tree.create(a, ControlState::new("d"), Panel::new());
        (tree, root, a, b, c, d)
    }

    #[test]
    fn parent_and_children() {
        let (tree, root, a, b, c, d) = build_tree();
        assert_eq!(tree.parent(a), Some(root));
        assert_eq!(tree.parent(root), None);
        assert_eq!(tree.children(root), &[a, b]);
        assert_eq!(tree.children(a), &[c, d]);
        assert!(tree.children(c).is_empty());
    }

    #[test]
    fn ancestors_and_bubble_path() {
        let (tree, root, a, _b, c, _d) = build_tree();
        assert_eq!(tree.ancestors(c), vec![a, root]);
        assert_eq!(tree.bubble_path(c), vec![c, a, root]);
        assert_eq!(tree.root_of(c), root);
        assert_eq!(tree.root_of(root), root);
    }

    #[test]
    fn walk_depth_first_is_pre_order() {
        let (tree, root, a, b, c, d) = build_tree();
        assert_eq!(tree.walk_depth_first(root), vec![root, a, c, d, b]);
        assert_eq!(tree.walk_depth_first(a), vec![a, c, d]);
    }

    #[test]
    fn remove_subtree() {
        let (mut tree, root, a, b, c, d) = build_tree();
        let removed = tree.remove(a).unwrap();
        assert_eq!(removed.title, "a");
        for gone in [a, c, d] {
            assert!(!tree.contains(gone));
        }
        assert_eq!(tree.children(root), &[b]);
        assert_eq!(tree.len(), 2);
        assert!(tree.remove(a).is_none());
        assert!(tree.bubble_path(a).is_empty());
    }

    #[test]
    fn widget_downcast() {
        let (tree, root, ..) = build_tree();
        assert!(tree.widget::<Panel>(root).is_some());
        assert!(tree.widget::<crate::widgets::Label>(root).is_none());
        assert_eq!(tree.widget_type(root), Some("Panel"));
    }

    #[test]
    fn hidden_ancestor_hides_descendants() {
        let (mut tree, _root, a, b, c, _d) = build_tree();
        tree.set_visible(a, false);
        assert!(!tree.is_shown(c));
        assert!(tree.is_shown(b));
    }

    // ── Structural violations ────────────────────────────────────────

    #[test]
    #[should_panic(expected = "already a child")]
    fn duplicate_child_panics() {
        let (mut tree, root, a, ..) = build_tree();
        tree.add_child(root, a);
    }

    #[test]
    fn attach_reports_each_violation() {
        let (mut tree, root, a, b, c, _d) = build_tree();
        assert_eq!(
            tree.attach(root, a),
            Err(TreeError::DuplicateChild { parent: root, child: a })
        );
        assert_eq!(
            tree.attach(b, c),
            Err(TreeError::AlreadyAttached { child: c, current: a })
        );
        assert_eq!(tree.attach(c, root), Err(TreeError::Cycle { parent: c, child: root }));
        assert_eq!(tree.attach(b, b), Err(TreeError::Cycle { parent: b, child: b }));

        let win = tree.insert_window(ControlState::new("w"), Panel::window());
        assert_eq!(tree.attach(b, win), Err(TreeError::WindowRoot(win)));

        tree.remove(c);
        assert_eq!(tree.attach(b, c), Err(TreeError::Missing(c)));
    }

    #[test]
    fn draw_skips_hidden_controls() {
        use crate::testing::snapshot::canvas_to_string;
        use crate::widgets::Label;

        let mut tree = ControlTree::new();
        let root = tree.insert(ControlState::new("").with_min(6, 1), Panel::new());
        let shown = tree.create(root, ControlState::new("ab").with_min(2, 1), Label::new());
        let hidden = tree.create(root, ControlState::new("cd").with_min(2, 1), Label::new());
        tree.set_visible(hidden, false);
        assert!(tree.is_shown(shown));

        let mut canvas = Canvas::new(6, 1);
        tree.draw(root, &mut canvas, &ThemeManager::new());
        assert_eq!(canvas_to_string(&canvas), "ab");
        assert_eq!(canvas.clip_depth(), 0);
    }
}
