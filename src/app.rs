//! App struct: lifecycle and the main loop.
//!
//! [`App`] owns the terminal and the [`Composer`]. [`App::run`] is the single
//! consumer of two producers: terminal input, read on a dedicated thread,
//! and events posted through [`EventSender`] from anywhere. Every iteration
//! repaints the whole screen, waits for whichever producer delivers first,
//! and hands that event to the composer. The loop ends when a `Quit` is
//! processed.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::composer::Composer;
use crate::error::{Error, Result};
use crate::event::{channel, Event, EventReceiver, EventSender, InputEvent};
use crate::logging::{init_logging, LogConfig};
use crate::terminal::{CrosstermTerminal, InputError, InputSource, Terminal};

/// How long the input thread waits before checking whether to stop.
const INPUT_POLL: Duration = Duration::from_millis(50);

type InputItem = std::result::Result<InputEvent, InputError>;

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

/// Configuration for the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Terminal window title.
    pub title: Option<String>,
    /// Theme to select after loading; the built-in theme otherwise.
    pub theme: Option<String>,
    /// Directory of `*.toml` theme files to load at startup.
    pub theme_dir: Option<PathBuf>,
    /// Capture mouse input.
    pub mouse: bool,
    /// Logging setup, applied by [`App::init`].
    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: None,
            theme: None,
            theme_dir: None,
            mouse: true,
            log: LogConfig::default(),
        }
    }
}

impl AppConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title (builder).
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Select a theme by name (builder).
    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    /// Load themes from a directory (builder).
    pub fn with_theme_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.theme_dir = Some(dir.into());
        self
    }

    /// Enable or disable mouse capture (builder).
    pub fn with_mouse(mut self, mouse: bool) -> Self {
        self.mouse = mouse;
        self
    }

    /// Set the logging configuration (builder).
    pub fn with_log(mut self, log: LogConfig) -> Self {
        self.log = log;
        self
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// The main application struct.
///
/// Creating an `App` takes over the terminal; dropping it (or calling
/// [`shutdown`](Self::shutdown)) gives it back, on every exit path.
pub struct App {
    composer: Composer,
    terminal: Box<dyn Terminal>,
    /// Input source between runs; the reader thread owns it while running.
    input: Option<Box<dyn InputSource>>,
    rx: EventReceiver,
    config: AppConfig,
    entered: bool,
}

impl App {
    /// Set up logging and take over the real terminal.
    pub fn init(config: AppConfig) -> Result<Self> {
        init_logging(&config.log)?;
        let terminal = CrosstermTerminal::new(config.mouse);
        Self::with_terminal(Box::new(terminal), config)
    }

    /// Take over `terminal`: load and select themes, then enter it.
    pub fn with_terminal(mut terminal: Box<dyn Terminal>, config: AppConfig) -> Result<Self> {
        let (width, height) = terminal.size().map_err(Error::TerminalInit)?;
        let (tx, rx) = channel();
        let mut composer = Composer::new(width, height, tx);

        if let Some(dir) = &config.theme_dir {
            let loaded = composer.theme_mut().load_dir(dir)?;
            debug!(dir = %dir.display(), loaded, "themes loaded");
        }
        if let Some(name) = &config.theme {
            composer.theme_mut().set_current(name)?;
        }

        terminal.enter().map_err(Error::TerminalInit)?;
        if let Some(title) = &config.title {
            if let Err(e) = terminal.set_title(title) {
                warn!(error = %e, "could not set terminal title");
            }
        }
        info!(width, height, "terminal entered");
        Ok(Self {
            composer,
            terminal,
            input: None,
            rx,
            config,
            entered: true,
        })
    }

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    pub fn composer_mut(&mut self) -> &mut Composer {
        &mut self.composer
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// A handle for posting events from any thread.
    pub fn sender(&self) -> EventSender {
        self.composer.sender().clone()
    }

    /// Run the main loop until `Quit`.
    ///
    /// A fatal input error stops the loop with [`Error::Input`]; transient
    /// input errors are logged and dropped. The input thread is stopped and
    /// joined before this returns, so `run` can be called again.
    pub async fn run(&mut self) -> Result<()> {
        let (input_tx, mut input_rx) = mpsc::unbounded_channel();
        let source = match self.input.take() {
            Some(source) => source,
            None => self.terminal.input(),
        };
        let stop = Arc::new(AtomicBool::new(false));
        let reader = spawn_reader(source, input_tx, Arc::clone(&stop))?;

        self.composer.resume();
        info!("main loop started");
        let result = self.pump(&mut input_rx).await;
        info!("main loop stopped");

        stop.store(true, Ordering::Relaxed);
        drop(input_rx);
        match reader.join() {
            Ok(source) => self.input = Some(source),
            Err(_) => error!("input thread panicked"),
        }
        result
    }

    async fn pump(&mut self, input_rx: &mut mpsc::UnboundedReceiver<InputItem>) -> Result<()> {
        let mut input_open = true;
        while !self.composer.should_quit() {
            self.composer.repaint();
            self.composer.present(self.terminal.as_mut())?;

            tokio::select! {
                item = input_rx.recv(), if input_open => match item {
                    Some(Ok(input)) => self.composer.process_event(Event::from(input)),
                    Some(Err(InputError::Transient(message))) => {
                        warn!(%message, "dropping input error");
                    }
                    Some(Err(InputError::Fatal(message))) => {
                        error!(%message, "input stream failed");
                        return Err(Error::Input(message));
                    }
                    None => input_open = false,
                },
                Some(event) = self.rx.recv() => self.composer.process_event(event),
                else => break,
            }
        }
        Ok(())
    }

    /// Run the main loop on a fresh current-thread runtime.
    pub fn run_blocking(&mut self) -> Result<()> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()?;
        runtime.block_on(self.run())
    }

    /// Give the terminal back. Safe to call more than once.
    pub fn shutdown(&mut self) -> Result<()> {
        if !self.entered {
            return Ok(());
        }
        self.entered = false;
        self.terminal.leave()?;
        info!("terminal restored");
        Ok(())
    }
}

/// Read `source` on its own thread until `stop` is set, the receiving side
/// goes away, or the stream fails. The source is handed back on join.
fn spawn_reader(
    mut source: Box<dyn InputSource>,
    tx: mpsc::UnboundedSender<InputItem>,
    stop: Arc<AtomicBool>,
) -> Result<thread::JoinHandle<Box<dyn InputSource>>> {
    let handle = thread::Builder::new()
        .name("cellwin-input".into())
        .spawn(move || {
            while !stop.load(Ordering::Relaxed) {
                let Some(item) = source.read(INPUT_POLL).transpose() else {
                    continue;
                };
                let fatal = matches!(item, Err(InputError::Fatal(_)));
                if tx.send(item).is_err() || fatal {
                    break;
                }
            }
            source
        })?;
    Ok(handle)
}

impl Drop for App {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            warn!(error = %e, "failed to restore terminal");
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{InputEvent, Key, KeyEvent};
    use crate::geometry::Region;
    use crate::testing::TestTerminal;

    fn app(term: &TestTerminal) -> App {
        App::with_terminal(Box::new(term.clone()), AppConfig::new()).unwrap()
    }

    // ── AppConfig builder ────────────────────────────────────────────

    #[test]
    fn app_config_defaults() {
        let config = AppConfig::new();
        assert!(config.title.is_none());
        assert!(config.theme.is_none());
        assert!(config.theme_dir.is_none());
        assert!(config.mouse);
        assert_eq!(config.log, LogConfig::default());
    }

    #[test]
    fn app_config_builder() {
        let config = AppConfig::new()
            .with_title("My App")
            .with_theme("dark")
            .with_theme_dir("/themes")
            .with_mouse(false)
            .with_log(LogConfig::new().with_level("debug"));
        assert_eq!(config.title, Some("My App".into()));
        assert_eq!(config.theme, Some("dark".into()));
        assert_eq!(config.theme_dir, Some(PathBuf::from("/themes")));
        assert!(!config.mouse);
        assert_eq!(config.log.level, "debug");
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    #[test]
    fn construction_enters_and_drop_leaves() {
        let term = TestTerminal::new(30, 8);
        let app = app(&term);
        assert!(term.is_entered());
        assert_eq!(app.composer().screen_size(), crate::geometry::Size::new(30, 8));
        drop(app);
        assert!(!term.is_entered());
    }

    #[test]
    fn shutdown_is_idempotent() {
        let term = TestTerminal::new(10, 3);
        let mut app = app(&term);
        app.shutdown().unwrap();
        app.shutdown().unwrap();
        assert!(!term.is_entered());
    }

    #[test]
    fn unknown_theme_is_rejected() {
        let term = TestTerminal::new(10, 3);
        let result = App::with_terminal(Box::new(term.clone()), AppConfig::new().with_theme("nope"));
        assert!(matches!(result, Err(Error::UnknownTheme(_))));
        assert!(!term.is_entered());
    }

    #[test]
    fn themes_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("dark.toml"),
            "name = \"dark\"\n[colors]\nback = \"black\"\n",
        )
        .unwrap();
        let term = TestTerminal::new(10, 3);
        let config = AppConfig::new().with_theme_dir(dir.path()).with_theme("dark");
        let app = App::with_terminal(Box::new(term), config).unwrap();
        assert_eq!(app.composer().theme().current(), "dark");
    }

    // ── Main loop ────────────────────────────────────────────────────

    #[tokio::test]
    async fn quit_from_sender_stops_loop_after_repaint() {
        let term = TestTerminal::new(30, 8);
        let mut app = app(&term);
        app.composer_mut().add_window("Main", Region::new(0, 0, 20, 5));
        app.sender().quit();
        app.run().await.unwrap();
        assert!(term.screen_text().contains("Main"));
        assert!(term.flushes() >= 1);
    }

    #[tokio::test]
    async fn transient_errors_are_dropped() {
        let term = TestTerminal::new(30, 8);
        let mut app = app(&term);
        term.push_error(InputError::Transient("bad sequence".into()));
        term.push_input(InputEvent::Key(KeyEvent::ctrl('q')));
        term.push_input(InputEvent::Key(KeyEvent::ctrl('q')));
        app.run().await.unwrap();
        assert!(app.composer().should_quit());
    }

    #[tokio::test]
    async fn fatal_input_error_ends_loop() {
        let term = TestTerminal::new(30, 8);
        let mut app = app(&term);
        term.push_input(InputEvent::Key(KeyEvent::plain(Key::Tab)));
        term.close_input();
        let result = app.run().await;
        assert!(matches!(result, Err(Error::Input(_))));
    }

    #[tokio::test]
    async fn second_run_reuses_input_source() {
        let term = TestTerminal::new(30, 8);
        let mut app = app(&term);
        app.sender().quit();
        app.run().await.unwrap();
        assert!(app.input.is_some());

        // The first reader is gone; input pushed now reaches the second run.
        term.push_input(InputEvent::Key(KeyEvent::ctrl('q')));
        term.push_input(InputEvent::Key(KeyEvent::plain(Key::Char('q'))));
        app.run().await.unwrap();
        assert!(app.composer().should_quit());
        assert!(app.input.is_some());
    }

    #[test]
    fn run_blocking_uses_own_runtime() {
        let term = TestTerminal::new(10, 3);
        let mut app = app(&term);
        app.sender().quit();
        app.run_blocking().unwrap();
    }
}
