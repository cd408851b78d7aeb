//! Composer: the window stack and everything that happens between the main
//! loop and a window's controls.
//!
//! The stack is ordered bottom to top; the last non-minimized window is the
//! active one and receives keyboard input. The composer owns the control
//! tree, the theme and the canvas, and handles the window-level parts of
//! input itself: chords, frame drags and title buttons. Whatever is left is
//! routed into the active window by [`focus::dispatch`].

use tracing::{debug, info, trace, warn};

use crate::canvas::Canvas;
use crate::control::{ControlId, ControlState, ControlTree, Widget};
use crate::event::{
    BindingAction, Chord, ChordCommand, ChordOutcome, Event, EventSender, KeyBindingRegistry,
    KeyEvent, MouseAction, MouseBtn, MouseEvent,
};
use crate::focus;
use crate::geometry::{Region, Size};
use crate::terminal::Terminal;
use crate::theme::{ColorId, ObjId, ThemeManager};
use crate::widgets::Panel;
use crate::window::{self, Drag, DragMode, TitleButton, TitleButtons, Window, WINDOW_MIN};

/// Owner of the window stack, control tree, theme and canvas.
pub struct Composer {
    tree: ControlTree,
    windows: Vec<Window>,
    theme: ThemeManager,
    canvas: Canvas,
    bindings: KeyBindingRegistry,
    chord: Chord,
    drag: Option<Drag>,
    sender: EventSender,
    screen: Size,
    quit: bool,
}

impl Composer {
    /// Create a composer for a `width` x `height` screen.
    pub fn new(width: u16, height: u16, sender: EventSender) -> Self {
        Self {
            tree: ControlTree::new(),
            windows: Vec::new(),
            theme: ThemeManager::new(),
            canvas: Canvas::new(width, height),
            bindings: KeyBindingRegistry::with_defaults(),
            chord: Chord::new(),
            drag: None,
            sender,
            screen: Size::new(i32::from(width), i32::from(height)),
            quit: false,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn tree(&self) -> &ControlTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut ControlTree {
        &mut self.tree
    }

    pub fn theme(&self) -> &ThemeManager {
        &self.theme
    }

    pub fn theme_mut(&mut self) -> &mut ThemeManager {
        &mut self.theme
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn bindings_mut(&mut self) -> &mut KeyBindingRegistry {
        &mut self.bindings
    }

    /// A handle for posting events back onto the main loop.
    pub fn sender(&self) -> &EventSender {
        &self.sender
    }

    pub fn chord(&self) -> &Chord {
        &self.chord
    }

    pub fn screen_size(&self) -> Size {
        self.screen
    }

    /// Whether a `Quit` has been processed.
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Clear a processed `Quit` so the main loop can run again.
    pub(crate) fn resume(&mut self) {
        self.quit = false;
    }

    /// Window roots, bottom to top.
    pub fn windows(&self) -> Vec<ControlId> {
        self.windows.iter().map(Window::root).collect()
    }

    /// Bookkeeping for the window rooted at `id`.
    pub fn window(&self, id: ControlId) -> Option<&Window> {
        self.windows.iter().find(|w| w.root == id)
    }

    /// The active window: the topmost one that is not minimized.
    pub fn top(&self) -> Option<ControlId> {
        self.windows
            .iter()
            .rev()
            .find(|w| !w.minimized)
            .map(Window::root)
    }

    /// The active control of the active window.
    pub fn active_control(&self) -> Option<ControlId> {
        focus::active_control(&self.tree, self.top()?)
    }

    fn index_of(&self, id: ControlId) -> Option<usize> {
        self.windows.iter().position(|w| w.root == id)
    }

    fn top_is_modal(&self) -> bool {
        self.top()
            .and_then(|id| self.tree.state(id))
            .is_some_and(|s| s.modal)
    }

    // ── Stack operations ─────────────────────────────────────────────

    /// Add a window with a plain panel body and make it active.
    pub fn add_window(&mut self, title: impl Into<String>, region: Region) -> ControlId {
        self.add_window_with(ControlState::new(title), region, Panel::window())
    }

    /// Add a modal window. Until it closes no other window can be activated.
    pub fn add_modal_window(&mut self, title: impl Into<String>, region: Region) -> ControlId {
        self.add_window_with(ControlState::new(title).with_modal(true), region, Panel::window())
    }

    /// Add a window whose root control uses `widget`, and make it active.
    ///
    /// The root gets a one-cell padding for the frame and is never smaller
    /// than [`WINDOW_MIN`].
    pub fn add_window_with(&mut self, state: ControlState, region: Region, widget: impl Widget) -> ControlId {
        let min = state.constraints().max(WINDOW_MIN);
        let state = state.with_padding(1, 1).with_min(min.width, min.height);
        let title = state.title.clone();
        let root = self.tree.insert_window(state, widget);
        let region = window::fit(region, self.screen, WINDOW_MIN);
        self.tree.set_pos(root, region.x, region.y);
        self.tree.set_size(root, region.width, region.height);

        let previous = self.top();
        self.windows.push(Window::new(root, TitleButtons::ALL));
        self.switch_active(previous);
        self.canvas.invalidate();
        info!(?root, %title, "window added");
        root
    }

    /// Choose which title buttons `id` shows.
    pub fn set_title_buttons(&mut self, id: ControlId, buttons: TitleButtons) {
        if let Some(idx) = self.index_of(id) {
            self.windows[idx].buttons = buttons;
        }
    }

    /// Install a handler consulted before `id` closes. Returning `false`
    /// keeps the window open.
    pub fn on_close(&mut self, id: ControlId, handler: impl FnMut() -> bool + 'static) {
        if let Some(idx) = self.index_of(id) {
            self.windows[idx].on_close = Some(Box::new(handler));
        }
    }

    /// Bring `id` to the top and make it active. Minimized windows are
    /// restored. Refused (returns `false`) while a different modal window is
    /// on top.
    pub fn activate_window(&mut self, id: ControlId) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        let previous = self.top();
        if previous != Some(id) && self.top_is_modal() {
            debug!(?id, "activation refused: modal window on top");
            return false;
        }
        if self.windows[idx].minimized {
            self.windows[idx].minimized = false;
            self.tree.set_visible(id, true);
        }
        let window = self.windows.remove(idx);
        self.windows.push(window);
        self.switch_active(previous);
        true
    }

    /// Update active flags after the stack changed and send the
    /// `Activate(false)` / `Activate(true)` pair.
    fn switch_active(&mut self, previous: Option<ControlId>) {
        let current = self.top();
        for w in &mut self.windows {
            w.active = Some(w.root) == current;
        }
        if previous == current {
            return;
        }
        if let Some(prev) = previous {
            self.tree.deliver(prev, &Event::Activate(false), &self.sender);
        }
        if let Some(cur) = current {
            self.tree.deliver(cur, &Event::Activate(true), &self.sender);
        }
        debug!(?previous, ?current, "window activated");
    }

    /// Rotate the active window to the bottom of the stack.
    ///
    /// Minimized windows stay beneath it, so the next visible window comes
    /// up. The old window is deactivated and the screen repainted before the
    /// new top window is activated. Needs at least two visible windows and
    /// a non-modal top.
    pub fn move_to_bottom(&mut self) -> bool {
        let minimized = self.minimized_count();
        if self.windows.len() - minimized < 2 || self.top_is_modal() {
            return false;
        }
        let Some(previous) = self.top() else {
            return false;
        };
        if let Some(mut window) = self.windows.pop() {
            window.active = false;
            self.windows.insert(minimized, window);
        }
        self.tree.deliver(previous, &Event::Activate(false), &self.sender);
        self.repaint();

        let current = self.top();
        for w in &mut self.windows {
            w.active = Some(w.root) == current;
        }
        if let Some(cur) = current {
            self.tree.deliver(cur, &Event::Activate(true), &self.sender);
        }
        debug!(?previous, ?current, "window moved to bottom");
        true
    }

    /// Minimized windows sit at the bottom of the stack.
    fn minimized_count(&self) -> usize {
        self.windows.iter().take_while(|w| w.minimized).count()
    }

    /// Close the active window.
    ///
    /// The window root is sent `Close`; answering `false` keeps the window
    /// open, as does a close handler returning `false`. The next visible
    /// window becomes active; if only minimized windows remain, the topmost
    /// of them is restored. Closing the last window quits.
    pub fn close(&mut self) -> bool {
        let Some(root) = self.top() else {
            return false;
        };
        if self.windows.len() == 1 {
            info!("last window closed, quitting");
            self.quit = true;
            return true;
        }
        let Some(idx) = self.index_of(root) else {
            return false;
        };
        let accepted = self.tree.deliver(root, &Event::Close, &self.sender)
            && self.windows[idx].accepts_close();
        if !accepted {
            debug!(?root, "close vetoed");
            return false;
        }
        self.windows.remove(idx);
        self.tree.remove(root);
        self.drag = self.drag.filter(|d| d.window != root);
        if self.top().is_none() {
            if let Some(w) = self.windows.last_mut() {
                w.minimized = false;
                let id = w.root;
                self.tree.set_visible(id, true);
            }
        }
        self.switch_active(None);
        self.canvas.invalidate();
        info!(?root, "window closed");
        true
    }

    /// Hide `id` and send it to the bottom of the stack.
    pub fn minimize(&mut self, id: ControlId) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        if self.tree.state(id).is_some_and(|s| s.modal) {
            return false;
        }
        let previous = self.top();
        let mut window = self.windows.remove(idx);
        window.minimized = true;
        window.active = false;
        self.windows.insert(0, window);
        self.tree.set_visible(id, false);
        self.switch_active(previous);
        true
    }

    /// Show a minimized window again and make it active.
    pub fn restore(&mut self, id: ControlId) -> bool {
        match self.window(id) {
            Some(w) if w.minimized => self.activate_window(id),
            _ => false,
        }
    }

    /// Toggle `id` between full screen and its previous geometry.
    pub fn toggle_maximize(&mut self, id: ControlId) {
        let Some(idx) = self.index_of(id) else {
            return;
        };
        let target = match self.windows[idx].saved.take() {
            Some(saved) => saved,
            None => {
                let current = self.tree.state(id).map(|s| s.region()).unwrap_or_default();
                self.windows[idx].saved = Some(current);
                Region::new(0, 0, self.screen.width, self.screen.height)
            }
        };
        self.apply_geometry(id, target);
    }

    // ── Visibility ───────────────────────────────────────────────────

    /// Show or hide a control. If that leaves the window's active control
    /// unable to hold activation, activation moves to the next TAB stop.
    pub fn set_visible(&mut self, id: ControlId, visible: bool) {
        self.tree.set_visible(id, visible);
        self.fix_activation(self.tree.root_of(id));
    }

    /// Enable or disable a control, moving activation like
    /// [`set_visible`](Self::set_visible).
    pub fn set_enabled(&mut self, id: ControlId, enabled: bool) {
        self.tree.set_enabled(id, enabled);
        self.fix_activation(self.tree.root_of(id));
    }

    fn fix_activation(&mut self, root: ControlId) {
        let Some(active) = focus::active_control(&self.tree, root) else {
            return;
        };
        if focus::can_activate(&self.tree, active) {
            return;
        }
        let chain = focus::FocusChain::build(&self.tree, root);
        focus::deactivate(&mut self.tree, root, &self.sender);
        if let Some(next) = chain.next(Some(active)) {
            focus::activate(&mut self.tree, root, next, &self.sender);
        }
    }

    // ── Geometry ─────────────────────────────────────────────────────

    /// Move/resize window `id`, delivering `Moved` and/or `Resized`.
    fn apply_geometry(&mut self, id: ControlId, region: Region) {
        let Some(before) = self.tree.state(id).map(|s| s.region()) else {
            return;
        };
        if region.offset() != before.offset() {
            self.tree.set_pos(id, region.x, region.y);
            let ev = Event::Moved { x: region.x, y: region.y };
            self.tree.deliver(id, &ev, &self.sender);
        }
        if region.size() != before.size() {
            self.tree.set_size(id, region.width, region.height);
            let size = self.tree.state(id).map(|s| s.size()).unwrap_or_default();
            let ev = Event::Resized { width: size.width, height: size.height };
            self.tree.deliver(id, &ev, &self.sender);
        }
    }

    fn window_min(&self, id: ControlId) -> Size {
        self.tree.minimal_size(id).max(WINDOW_MIN)
    }

    /// The terminal changed size: resize the canvas and pull every window
    /// back on screen. Maximized windows follow the screen.
    pub fn resize_screen(&mut self, width: u16, height: u16) {
        self.screen = Size::new(i32::from(width), i32::from(height));
        self.canvas.resize(width, height);
        let screen = Region::new(0, 0, self.screen.width, self.screen.height);
        let targets: Vec<_> = self
            .windows
            .iter()
            .map(|w| (w.root, w.is_maximized()))
            .collect();
        for (root, maximized) in targets {
            let Some(current) = self.tree.state(root).map(|s| s.region()) else {
                continue;
            };
            let target = if maximized { screen } else { current };
            let fitted = window::fit(target, self.screen, self.window_min(root));
            self.apply_geometry(root, fitted);
        }
        debug!(width, height, "screen resized");
    }

    // ── Event processing ─────────────────────────────────────────────

    /// Handle one event from the main loop.
    pub fn process_event(&mut self, event: Event) {
        trace!(event = event.name(), "processing event");
        match event {
            Event::Quit => self.quit = true,
            Event::Redraw => self.canvas.invalidate(),
            Event::Resize { width, height } => self.resize_screen(width, height),
            Event::Error(message) => warn!(%message, "background error"),
            Event::Close => {
                self.close();
            }
            Event::Key(key) => self.process_key(key),
            Event::Mouse(mouse) => self.process_mouse(mouse),
            ref addressed @ (Event::Changed { .. } | Event::Message { .. }) => match addressed.target() {
                Some(target) if self.tree.contains(target) => {
                    focus::deliver_with_fallback(&mut self.tree, target, addressed, &self.sender);
                }
                Some(target) => debug!(?target, "event for removed control dropped"),
                None => {
                    self.dispatch_to_top(addressed);
                }
            },
            other => {
                self.dispatch_to_top(&other);
            }
        }
    }

    fn dispatch_to_top(&mut self, event: &Event) -> bool {
        match self.top() {
            Some(root) => focus::dispatch(&mut self.tree, root, event, &self.sender),
            None => false,
        }
    }

    fn process_key(&mut self, key: KeyEvent) {
        match self.chord.feed(&key) {
            ChordOutcome::Consumed(Some(command)) => return self.run_chord(command),
            ChordOutcome::Consumed(None) => {
                debug!("chord disarmed");
                return;
            }
            ChordOutcome::Pass => {}
        }
        if let Some(action) = self.bindings.resolve(&key).cloned() {
            let top = self.top();
            match (action, top) {
                (BindingAction::Quit, _) => self.quit = true,
                (BindingAction::Arm(mode), _) => {
                    debug!(?mode, "chord armed");
                    self.chord.arm(mode);
                }
                (BindingAction::FocusNext, Some(root)) => {
                    focus::focus_next(&mut self.tree, root, &self.sender);
                }
                (BindingAction::FocusPrevious, Some(root)) => {
                    focus::focus_previous(&mut self.tree, root, &self.sender);
                }
                (BindingAction::Custom(message), _) => {
                    self.dispatch_to_top(&Event::Message { target: None, message });
                }
                (_, None) => {}
            }
            return;
        }
        self.dispatch_to_top(&Event::Key(key));
    }

    fn run_chord(&mut self, command: ChordCommand) {
        debug!(?command, "chord command");
        let Some(root) = self.top() else {
            if command == ChordCommand::Quit {
                self.quit = true;
            }
            return;
        };
        let Some(current) = self.tree.state(root).map(|s| s.region()) else {
            return;
        };
        let min = self.window_min(root);
        match command {
            ChordCommand::MoveBy { dx, dy } => {
                let target = window::apply(DragMode::Move, current, dx, dy, self.screen, min);
                self.apply_geometry(root, target);
            }
            ChordCommand::ResizeBy { dw, dh } => {
                let target = window::apply(DragMode::ResizeBottomRight, current, dw, dh, self.screen, min);
                self.apply_geometry(root, target);
            }
            ChordCommand::MoveToBottom => {
                self.move_to_bottom();
            }
            ChordCommand::Close => {
                self.close();
            }
            ChordCommand::Quit => self.quit = true,
        }
    }

    fn process_mouse(&mut self, mouse: MouseEvent) {
        let (x, y) = (i32::from(mouse.x), i32::from(mouse.y));
        if let Some(drag) = self.drag {
            match mouse.kind {
                MouseAction::Drag(MouseBtn::Left) | MouseAction::Moved => {
                    let min = self.window_min(drag.window);
                    let target = drag.region_at(x, y, self.screen, min);
                    self.apply_geometry(drag.window, target);
                }
                MouseAction::Up(MouseBtn::Left) => self.drag = None,
                _ => {}
            }
            return;
        }

        if !mouse.is_primary_press() {
            self.dispatch_to_top(&Event::Mouse(mouse));
            return;
        }

        let Some(root) = self.window_at(x, y) else {
            trace!(x, y, "click on empty desktop");
            return;
        };
        if self.top() != Some(root) && !self.activate_window(root) {
            return;
        }
        let Some(region) = self.tree.state(root).map(|s| s.region()) else {
            return;
        };
        let buttons = self.window(root).map(|w| w.buttons).unwrap_or(TitleButtons::NONE);
        if let Some(button) = buttons.hit(region, x, y) {
            self.press_title_button(root, button);
            return;
        }
        let mode = DragMode::at(region, x, y);
        if mode != DragMode::None {
            self.drag = Some(Drag {
                window: root,
                mode,
                anchor: (x, y),
                start: region,
            });
            return;
        }
        focus::dispatch(&mut self.tree, root, &Event::Mouse(mouse), &self.sender);
    }

    /// Topmost visible window containing (x, y).
    fn window_at(&self, x: i32, y: i32) -> Option<ControlId> {
        self.windows
            .iter()
            .rev()
            .filter(|w| !w.minimized)
            .map(Window::root)
            .find(|&root| self.tree.state(root).is_some_and(|s| s.region().contains(x, y)))
    }

    fn press_title_button(&mut self, root: ControlId, button: TitleButton) {
        debug!(?root, ?button, "title button");
        match button {
            TitleButton::Close => {
                self.close();
            }
            TitleButton::Maximize => self.toggle_maximize(root),
            TitleButton::Minimize => {
                self.minimize(root);
            }
        }
    }

    // ── Painting ─────────────────────────────────────────────────────

    /// Redraw the desktop and every visible window, bottom to top.
    pub fn repaint(&mut self) {
        let desktop = (self.theme.color(ColorId::Text), self.theme.color(ColorId::Back));
        {
            let mut canvas = self.canvas.styled(desktop.0, desktop.1);
            canvas.clear();
        }
        for w in self.windows.iter().filter(|w| !w.minimized) {
            self.tree.draw(w.root, &mut self.canvas, &self.theme);
            draw_frame(&self.tree, w, &mut self.canvas, &self.theme);
        }
    }

    /// Send the canvas to the terminal.
    pub fn present(&mut self, terminal: &mut dyn Terminal) -> std::io::Result<usize> {
        self.canvas.present(terminal)
    }
}

/// Border, title and title buttons of one window.
fn draw_frame(tree: &ControlTree, window: &Window, canvas: &mut Canvas, theme: &ThemeManager) {
    let Some(state) = tree.state(window.root) else {
        return;
    };
    let region = state.region();
    let (border, glyphs) = if window.active {
        (ColorId::WindowBorderActive, ObjId::DoubleBorder)
    } else {
        (ColorId::WindowBorder, ObjId::SingleBorder)
    };
    let mut canvas = canvas.styled(theme.color(border), theme.color(ColorId::WindowBack));
    canvas.draw_frame(region, theme.object(glyphs));

    let slots = window.buttons.slots(region);
    let title_end = slots.last().map_or(region.right() - 1, |&(_, x)| x);
    let title_width = title_end - region.x - 3;
    if title_width > 0 {
        canvas.put_markup(region.x + 2, region.y, &state.title, title_width);
    }

    for (button, x) in slots {
        let glyph = match button {
            TitleButton::Close => ObjId::TitleClose,
            TitleButton::Maximize if window.is_maximized() => ObjId::TitleRestore,
            TitleButton::Maximize => ObjId::TitleMaximize,
            TitleButton::Minimize => ObjId::TitleMinimize,
        };
        let ch = theme.object(glyph).chars().next().unwrap_or('?');
        canvas.put_char(x, region.y, '[');
        canvas.put_char(x + 1, region.y, ch);
        canvas.put_char(x + 2, region.y, ']');
    }
}

// ===========================================================================
// Tests
// ===========================================================================
