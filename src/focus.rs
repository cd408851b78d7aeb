//! Hit-testing, TAB order, activation and event routing within one window.
//!
//! Every function here works on a single window subtree rooted at `root`.
//! [`FocusChain`] linearizes the subtree for TAB traversal; [`activate`]
//! moves the active flag; [`dispatch`] decides which control sees an event.

use crate::control::{ControlId, ControlTree};
use crate::event::{Event, EventSender};

// ---------------------------------------------------------------------------
// Hit-testing
// ---------------------------------------------------------------------------

/// The deepest visible control under (x, y), or `None` if the point is
/// outside `root`. Later siblings are tested first, so they win overlaps.
pub fn hit_test(tree: &ControlTree, root: ControlId, x: i32, y: i32) -> Option<ControlId> {
    let state = tree.state(root)?;
    if !state.is_visible() || !state.region().contains(x, y) {
        return None;
    }
    tree.children(root)
        .iter()
        .rev()
        .find_map(|&child| hit_test(tree, child, x, y))
        .or(Some(root))
}

// ---------------------------------------------------------------------------
// FocusChain
// ---------------------------------------------------------------------------

/// Controls that TAB traversal visits, in tab order.
///
/// Built by a pre-order walk that skips hidden subtrees and keeps enabled
/// tab-stop controls. The chain is a snapshot; rebuild it after the tree
/// changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusChain {
    nodes: Vec<ControlId>,
}

impl FocusChain {
    /// Build the chain for the subtree under `root`.
    pub fn build(tree: &ControlTree, root: ControlId) -> Self {
        let mut nodes = Vec::new();
        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            let Some(state) = tree.state(current) else {
                continue;
            };
            if !state.is_visible() {
                continue;
            }
            if state.is_enabled() && state.tab_stop {
                nodes.push(current);
            }
            for &child in tree.children(current).iter().rev() {
                stack.push(child);
            }
        }
        Self { nodes }
    }

    /// The controls in tab order.
    pub fn nodes(&self) -> &[ControlId] {
        &self.nodes
    }

    /// Position of `id` in the chain.
    pub fn position(&self, id: ControlId) -> Option<usize> {
        self.nodes.iter().position(|&n| n == id)
    }

    /// The control after `current`, wrapping. Falls back to the first
    /// control when `current` is `None` or not in the chain.
    pub fn next(&self, current: Option<ControlId>) -> Option<ControlId> {
        if self.nodes.is_empty() {
            return None;
        }
        let idx = match current.and_then(|c| self.position(c)) {
            Some(idx) => (idx + 1) % self.nodes.len(),
            None => 0,
        };
        self.nodes.get(idx).copied()
    }

    /// The control before `current`, wrapping. Falls back to the first
    /// control when `current` is `None` or not in the chain.
    pub fn previous(&self, current: Option<ControlId>) -> Option<ControlId> {
        if self.nodes.is_empty() {
            return None;
        }
        let idx = match current.and_then(|c| self.position(c)) {
            Some(0) => self.nodes.len() - 1,
            Some(idx) => idx - 1,
            None => 0,
        };
        self.nodes.get(idx).copied()
    }

    /// Number of controls in the chain.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Activation
// ---------------------------------------------------------------------------

/// The active control in the subtree under `root`.
pub fn active_control(tree: &ControlTree, root: ControlId) -> Option<ControlId> {
    tree.walk_depth_first(root)
        .into_iter()
        .find(|&id| tree.state(id).is_some_and(|s| s.is_active()))
}

/// Whether clicking or tabbing may activate `id`.
pub fn can_activate(tree: &ControlTree, id: ControlId) -> bool {
    tree.state(id)
        .is_some_and(|s| s.is_enabled() && s.tab_stop)
        && tree.is_shown(id)
}

/// Make `target` the active control of the window rooted at `root`.
///
/// The previously active control is cleared and sent `Activate(false)`
/// before `target` is set and sent `Activate(true)`; nothing else is
/// dispatched in between. Returns `false` if `target` is not in the subtree.
pub fn activate(tree: &mut ControlTree, root: ControlId, target: ControlId, sender: &EventSender) -> bool {
    if tree.root_of(target) != root {
        return false;
    }
    let previous = active_control(tree, root);
    if previous == Some(target) {
        return true;
    }
    if let Some(prev) = previous {
        if let Some(state) = tree.state_mut(prev) {
            state.active = false;
        }
        tree.deliver(prev, &Event::Activate(false), sender);
    }
    if let Some(state) = tree.state_mut(target) {
        state.active = true;
    }
    tree.deliver(target, &Event::Activate(true), sender);
    tracing::trace!(?previous, ?target, "control activated");
    true
}

/// Clear the active control of the window rooted at `root`, if any.
pub fn deactivate(tree: &mut ControlTree, root: ControlId, sender: &EventSender) {
    if let Some(prev) = active_control(tree, root) {
        if let Some(state) = tree.state_mut(prev) {
            state.active = false;
        }
        tree.deliver(prev, &Event::Activate(false), sender);
    }
}

/// Activate the next TAB-order control. Returns the new active control.
pub fn focus_next(tree: &mut ControlTree, root: ControlId, sender: &EventSender) -> Option<ControlId> {
    let chain = FocusChain::build(tree, root);
    let next = chain.next(active_control(tree, root))?;
    activate(tree, root, next, sender);
    Some(next)
}

/// Activate the previous TAB-order control. Returns the new active control.
pub fn focus_previous(tree: &mut ControlTree, root: ControlId, sender: &EventSender) -> Option<ControlId> {
    let chain = FocusChain::build(tree, root);
    let prev = chain.previous(active_control(tree, root))?;
    activate(tree, root, prev, sender);
    Some(prev)
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Route `event` inside the window rooted at `root`.
///
/// Primary clicks go to the control under the pointer, activating it first
/// when it can be activated. Addressed events go to their target. Everything
/// else goes to the active control, or the root when nothing is active. An
/// unhandled event is offered to the nearest clip-boundary ancestor of the
/// receiver. Returns whether anything handled it.
pub fn dispatch(tree: &mut ControlTree, root: ControlId, event: &Event, sender: &EventSender) -> bool {
    let receiver = match event {
        Event::Mouse(me) if event.is_primary_click() => {
            let Some(hit) = hit_test(tree, root, i32::from(me.x), i32::from(me.y)) else {
                return false;
            };
            if can_activate(tree, hit) {
                activate(tree, root, hit, sender);
            }
            hit
        }
        _ => match event.target() {
            Some(target) => target,
            None => active_control(tree, root).unwrap_or(root),
        },
    };
    deliver_with_fallback(tree, receiver, event, sender)
}

/// Deliver to `receiver`; if unhandled, offer to the nearest clip-boundary
/// ancestor.
pub fn deliver_with_fallback(tree: &mut ControlTree, receiver: ControlId, event: &Event, sender: &EventSender) -> bool {
    if tree.deliver(receiver, event, sender) {
        return true;
    }
    let boundary = tree
        .ancestors(receiver)
        .into_iter()
        .find(|&a| tree.state(a).is_some_and(|s| s.clip_boundary));
    match boundary {
        Some(b) => tree.deliver(b, event, sender),
        None => false,
    }
}

// ===========================================================================
// Tests
// ===========================================================================
