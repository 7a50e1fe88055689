//! App struct: lifecycle, frame loop, terminal management.
//!
//! [`App`] ties the [`Runtime`] to a terminal. The `new_headless`
//! constructor allows testing without a real terminal; headless frames run
//! against a caller-provided surface.

use std::io;
use std::time::Instant;

use crate::event::input::{InputEvent, Key, Modifiers};
use crate::event::message::{Envelope, Quit, Refresh};
use crate::geometry::Size;
use crate::render::driver::{Driver, TerminalSurface};
use crate::render::surface::Surface;
use crate::runtime::Runtime;

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

/// Configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Optional window/app title.
    pub title: Option<String>,
    /// Target frames per second for the render loop.
    pub fps: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: None,
            fps: 60,
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

    /// Set the target FPS (builder).
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// The main application struct.
///
/// Owns the runtime and, in terminal mode, the commit surface wrapping the
/// crossterm driver. The surface is `None` in headless mode.
pub struct App {
    /// The widget runtime.
    pub runtime: Runtime,
    /// Terminal commit surface. `None` in headless mode.
    surface: Option<TerminalSurface>,
    /// Application configuration.
    pub config: AppConfig,
    /// Whether the app is still running.
    running: bool,
}

impl App {
    /// Create a new app with a real terminal driver.
    ///
    /// Queries the terminal size to set the initial viewport.
    pub fn new(config: AppConfig) -> io::Result<Self> {
        let (width, height) = Driver::terminal_size()?;
        let driver = Driver::new()?;
        Ok(Self {
            runtime: Runtime::new(Size::new(i32::from(width), i32::from(height))),
            surface: Some(TerminalSurface::new(driver)),
            config,
            running: true,
        })
    }

    /// Create a headless app for testing (no terminal driver).
    pub fn new_headless(width: u16, height: u16) -> Self {
        Self {
            runtime: Runtime::new(Size::new(i32::from(width), i32::from(height))),
            surface: None,
            config: AppConfig::default(),
            running: true,
        }
    }

    /// Handle an input event.
    ///
    /// Ctrl+C always quits. Key events are routed through the runtime
    /// (open dialog first, then the focused element); resizes go through
    /// the resize guard. Other events are currently ignored.
    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Key(key) => {
                if key.code == Key::Char('c') && key.modifiers.contains(Modifiers::CTRL) {
                    self.running = false;
                    return;
                }
                self.runtime.dispatch_key(key);
            }
            InputEvent::Resize { width, height } => {
                self.runtime
                    .dispatch_resize(Size::new(i32::from(width), i32::from(height)));
            }
            // Mouse, focus, paste events are currently unhandled at the app
            // level.
            _ => {}
        }
    }

    /// Run one frame against the given surface: timers, message routing,
    /// then every pending scheduling cycle.
    ///
    /// Built-in messages are handled here ([`Quit`] stops the app,
    /// [`Refresh`] re-renders everything); the rest are returned to the
    /// caller.
    pub fn frame_with(&mut self, surface: &mut dyn Surface) -> Vec<Envelope> {
        self.runtime.tick(Instant::now());
        let mut app_level = Vec::new();
        for envelope in self.runtime.process_messages() {
            if envelope.downcast_ref::<Quit>().is_some() {
                self.running = false;
            } else if envelope.downcast_ref::<Refresh>().is_some() {
                self.runtime.refresh_all();
            } else {
                app_level.push(envelope);
            }
        }
        self.runtime.run_frame(surface);
        app_level
    }

    /// Run one frame against the terminal surface.
    ///
    /// Errors if the app is headless or a commit failed to paint.
    pub fn frame(&mut self) -> io::Result<Vec<Envelope>> {
        let mut surface = self.surface.take().ok_or_else(|| {
            io::Error::new(io::ErrorKind::Unsupported, "headless app has no terminal")
        })?;
        let app_level = self.frame_with(&mut surface);
        let result = surface.take_error();
        self.surface = Some(surface);
        match result {
            Some(err) => Err(err),
            None => Ok(app_level),
        }
    }

    /// Enter alternate screen, raw mode, and hide the cursor.
    pub fn enter_terminal(&mut self) -> io::Result<()> {
        if let Some(surface) = self.surface.as_mut() {
            let driver = surface.driver_mut();
            driver.enter_alt_screen()?;
            driver.hide_cursor()?;
            driver.clear()?;
            driver.flush()?;
        }
        Ok(())
    }

    /// Restore the terminal: show the cursor and leave alternate screen.
    pub fn leave_terminal(&mut self) -> io::Result<()> {
        if let Some(surface) = self.surface.as_mut() {
            let driver = surface.driver_mut();
            driver.show_cursor()?;
            driver.leave_alt_screen()?;
            driver.flush()?;
        }
        Ok(())
    }

    /// Whether the app should quit.
    pub fn should_quit(&self) -> bool {
        !self.running
    }

    /// Request the app to quit.
    pub fn request_quit(&mut self) {
        self.running = false;
    }

    /// Whether the app has a terminal driver (not headless).
    pub fn has_driver(&self) -> bool {
        self.surface.is_some()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
