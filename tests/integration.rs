//! Integration tests for cellwin.
//!
//! These tests exercise the public API from outside the crate: layout,
//! dispatch and the window stack through the Pilot, and the real main loop
//! against an in-memory terminal.

use std::cell::Cell;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use cellwin::event::{Event, InputEvent, Key, KeyEvent, Modifiers};
use cellwin::focus::{self, FocusChain};
use cellwin::testing::{canvas_to_string, Pilot, Recorder, TestTerminal};
use cellwin::theme::{Attr, ColorId, ThemeManager};
use cellwin::widgets::{Button, Label, Panel};
use cellwin::{App, AppConfig, ControlState, ControlTree, Pack, Region, Size};
use pretty_assertions::assert_eq;

fn widths(tree: &ControlTree, ids: &[cellwin::ControlId]) -> Vec<i32> {
    ids.iter().map(|&id| tree.state(id).unwrap().size().width).collect()
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

#[test]
fn test_scaled_row_shares_slack() {
    let mut tree = ControlTree::new();
    let row = tree.insert(ControlState::new("row").with_gap(1), Panel::new());
    let ids: Vec<_> = [0, 1, 1]
        .into_iter()
        .map(|scale| tree.create(row, ControlState::new("").with_min(5, 1).with_scale(scale), Panel::new()))
        .collect();

    tree.set_size(row, 23, 1);
    assert_eq!(widths(&tree, &ids), vec![5, 8, 8]);

    tree.set_size(row, 21, 1);
    assert_eq!(widths(&tree, &ids), vec![5, 7, 7]);
    let used: i32 = widths(&tree, &ids).iter().sum::<i32>() + 2;
    assert_eq!(used, 21);

    tree.set_size(row, 3, 1);
    assert_eq!(tree.state(row).unwrap().size(), Size::new(17, 1));
}

#[test]
fn test_vertical_column_places_children_in_order() {
    let mut tree = ControlTree::new();
    let col = tree.insert(
        ControlState::new("col").with_pack(Pack::Vertical).with_padding(1, 1),
        Panel::new(),
    );
    let a = tree.create(col, Label::sized("first"), Label::new());
    let b = tree.create(col, Label::sized("second").with_scale(1), Label::new());
    tree.set_size(col, 10, 8);

    assert_eq!(tree.state(a).unwrap().region(), Region::new(1, 1, 8, 1));
    assert_eq!(tree.state(b).unwrap().region(), Region::new(1, 2, 8, 5));
}

#[test]
#[should_panic(expected = "already a child")]
fn test_duplicate_child_is_fatal() {
    let mut tree = ControlTree::new();
    let root = tree.insert(ControlState::new("root"), Panel::new());
    let child = tree.create(root, ControlState::new("child"), Panel::new());
    tree.add_child(root, child);
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

#[test]
fn test_click_activates_nested_child_not_container() {
    let mut pilot = Pilot::new(40, 12);
    let window = pilot.composer_mut().add_window("w", Region::new(0, 0, 30, 10));
    let tree = pilot.composer_mut().tree_mut();
    let container = tree.create(
        window,
        ControlState::new("A").with_padding(2, 1).with_tab_stop(true),
        Recorder::default(),
    );
    let nested = tree.create(
        container,
        ControlState::new("B").with_min(4, 1).with_tab_stop(true),
        Recorder::default(),
    );
    let at = tree.state(nested).unwrap().pos();

    pilot.click(at.x as u16, at.y as u16);

    let tree = pilot.composer().tree();
    assert_eq!(focus::hit_test(tree, window, at.x, at.y), Some(nested));
    assert!(tree.state(nested).unwrap().is_active());
    assert!(!tree.state(container).unwrap().is_active());
    assert_eq!(pilot.composer().active_control(), Some(nested));
}

#[test]
fn test_tab_wraps_back_to_start() {
    let mut pilot = Pilot::new(40, 12);
    let window = pilot.composer_mut().add_window("w", Region::new(0, 0, 30, 10));
    for name in ["a", "b", "c"] {
        pilot.composer_mut().tree_mut().create(
            window,
            ControlState::new(name).with_min(3, 1).with_tab_stop(true),
            Recorder::default(),
        );
    }
    let chain = FocusChain::build(pilot.composer().tree(), window);
    assert_eq!(chain.len(), 3);

    pilot.press_key(Key::Tab);
    let start = pilot.composer().active_control();
    for _ in 0..chain.len() {
        pilot.press_key(Key::Tab);
    }
    assert_eq!(pilot.composer().active_control(), start);

    pilot.press_key(Key::BackTab);
    assert_eq!(pilot.composer().active_control(), chain.previous(start));
}

// ---------------------------------------------------------------------------
// Window stack
// ---------------------------------------------------------------------------

#[test]
fn test_close_with_veto_keeps_stack() {
    let mut pilot = Pilot::new(60, 20);
    let composer = pilot.composer_mut();
    let w1 = composer.add_window("W1", Region::new(0, 0, 20, 6));
    let w2 = composer.add_window("W2", Region::new(5, 3, 20, 6));
    let w3 = composer.add_window_with(ControlState::new("W3"), Region::new(10, 6, 20, 6), Recorder::default());

    let allow = Rc::new(Cell::new(false));
    let gate = Rc::clone(&allow);
    composer.on_close(w3, move || gate.get());

    assert!(!composer.close());
    assert_eq!(composer.windows(), vec![w1, w2, w3]);
    assert_eq!(composer.tree().widget::<Recorder>(w3).unwrap().events.last(), Some(&Event::Close));

    allow.set(true);
    assert!(composer.close());
    assert_eq!(composer.windows(), vec![w1, w2]);
    assert_eq!(composer.top(), Some(w2));
    assert!(composer.window(w2).unwrap().is_active());
}

#[test]
fn test_drawn_screen_shows_active_and_inactive_frames() {
    let mut pilot = Pilot::new(30, 8);
    pilot.composer_mut().add_window("Back", Region::new(0, 0, 20, 4));
    pilot.composer_mut().add_window("Front", Region::new(6, 3, 20, 4));
    let text = pilot.screen_text();
    let lines: Vec<&str> = text.lines().collect();
    assert!(lines[0].starts_with("┌─Back"));
    assert!(lines[3].contains("╔═Front"));
    assert!(lines[6].contains("╚"));
}

#[test]
fn test_move_chord_and_drag_stay_on_screen() {
    let mut pilot = Pilot::new(40, 10);
    let w = pilot.composer_mut().add_window("w", Region::new(0, 0, 20, 5));
    pilot.press_key_with(Key::Char('p'), Modifiers::CTRL);
    for _ in 0..30 {
        pilot.press_key(Key::Right);
    }
    pilot.press_key(Key::Escape);
    assert_eq!(pilot.composer().tree().state(w).unwrap().pos().x, 20);

    pilot.drag((25, 0), (0, 0));
    assert_eq!(pilot.composer().tree().state(w).unwrap().region(), Region::new(0, 0, 20, 5));
}

#[test]
fn test_button_click_round_trips_through_sender() {
    let mut pilot = Pilot::new(40, 10);
    let window = pilot.composer_mut().add_window("w", Region::new(0, 0, 20, 5));
    let clicked = Rc::new(Cell::new(false));
    let flag = Rc::clone(&clicked);
    let button = pilot.composer_mut().tree_mut().create(
        window,
        ControlState::new("Go").with_min(6, 1).with_tab_stop(true),
        Button::new()
            .press_delay(Duration::from_millis(1))
            .on_click(move |_| flag.set(true)),
    );
    let at = pilot.composer().tree().state(button).unwrap().pos();
    pilot.click(at.x as u16, at.y as u16);
    assert!(pilot.composer().tree().widget::<Button>(button).unwrap().is_pressed());
    assert!(pilot.wait_for_event(Duration::from_secs(5)));
    assert!(clicked.get());
}

// ---------------------------------------------------------------------------
// Themes
// ---------------------------------------------------------------------------

#[test]
fn test_theme_dir_with_parent_fallback() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("base.toml"),
        "name = \"base\"\n[colors]\nwindow_back = \"red\"\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("child.toml"),
        "name = \"child\"\nparent = \"base\"\n[colors]\nback = \"green\"\n",
    )
    .unwrap();

    let mut themes = ThemeManager::new();
    assert_eq!(themes.load_dir(dir.path()).unwrap(), 2);
    themes.set_current("child").unwrap();
    assert_eq!(themes.color(ColorId::Back), "green".parse::<Attr>().unwrap());
    assert_eq!(themes.color(ColorId::WindowBack), "red".parse::<Attr>().unwrap());
    assert_eq!(
        themes.color(ColorId::ButtonBack),
        ThemeManager::new().color(ColorId::ButtonBack)
    );
}

// ---------------------------------------------------------------------------
// Main loop
// ---------------------------------------------------------------------------

#[test]
fn test_events_from_many_threads_arrive_once_and_in_order() {
    const THREADS: usize = 4;
    const PER_THREAD: usize = 50;

    let term = TestTerminal::new(40, 10);
    let mut app = App::with_terminal(Box::new(term.clone()), AppConfig::new()).unwrap();
    let window = app.composer_mut().add_window("sink", Region::new(0, 0, 20, 5));
    let sink = app
        .composer_mut()
        .tree_mut()
        .create(window, ControlState::new("sink"), Recorder::handling());

    let producers: Vec<_> = (0..THREADS)
        .map(|t| {
            let sender = app.sender();
            thread::spawn(move || {
                for n in 0..PER_THREAD {
                    sender.message(sink, format!("{t}:{n}"));
                }
            })
        })
        .collect();
    for producer in producers {
        producer.join().unwrap();
    }
    app.sender().quit();

    tokio_test::block_on(app.run()).unwrap();

    let received: Vec<(usize, usize)> = app
        .composer()
        .tree()
        .widget::<Recorder>(sink)
        .unwrap()
        .events
        .iter()
        .filter_map(|ev| match ev {
            Event::Message { message, .. } => {
                let (t, n) = message.split_once(':')?;
                Some((t.parse().ok()?, n.parse().ok()?))
            }
            _ => None,
        })
        .collect();
    assert_eq!(received.len(), THREADS * PER_THREAD);
    for t in 0..THREADS {
        let sequence: Vec<usize> = received.iter().filter(|(from, _)| *from == t).map(|&(_, n)| n).collect();
        assert_eq!(sequence, (0..PER_THREAD).collect::<Vec<_>>());
    }
    assert!(term.screen_text().contains("sink"));
}

#[test]
fn test_terminal_input_drives_app_until_quit_chord() {
    let term = TestTerminal::new(30, 8);
    let mut app = App::with_terminal(Box::new(term.clone()), AppConfig::new().with_title("demo")).unwrap();
    let window = app.composer_mut().add_window("in", Region::new(0, 0, 20, 5));
    let field = app.composer_mut().tree_mut().create(
        window,
        ControlState::new("f").with_min(4, 1).with_tab_stop(true),
        Recorder::default(),
    );
    term.push_input(InputEvent::Key(KeyEvent::plain(Key::Tab)));
    term.push_input(InputEvent::Key(KeyEvent::plain(Key::Char('x'))));
    term.push_input(InputEvent::Resize { width: 25, height: 6 });
    term.push_input(InputEvent::Key(KeyEvent::new(Key::Char('q'), Modifiers::CTRL)));
    term.push_input(InputEvent::Key(KeyEvent::new(Key::Char('q'), Modifiers::CTRL)));

    tokio_test::block_on(app.run()).unwrap();

    let events = &app.composer().tree().widget::<Recorder>(field).unwrap().events;
    assert_eq!(events.first(), Some(&Event::Activate(true)));
    assert!(events.contains(&Event::Key(KeyEvent::plain(Key::Char('x')))));
    assert_eq!(app.composer().screen_size(), Size::new(25, 6));
    assert!(canvas_to_string(app.composer().canvas()).contains("in"));
    drop(app);
    assert!(!term.is_entered());
}
