//! Tool behaviors.
//!
//! Each tool is a small strategy object implementing [`Tool`]: open,
//! user action, close, and (for the timer and monitor) a periodic
//! tick. The session layer owns the lifecycle; tools only mutate their
//! own display state and return [`Effects`] describing the task
//! scheduling they need. Rendering reads an immutable [`ToolView`]
//! snapshot, so the UI never reaches into tool internals.

pub mod base64_tool;
pub mod color_picker;
pub mod convert;
pub mod monitor;
pub mod notes;
pub mod passgen;
pub mod timer;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::Result;

use crate::clipboard::ClipboardBridge;
use crate::scheduler::TickOutcome;
use crate::session::ToolKind;
use crate::store::PersistenceStore;

pub use monitor::{StatSample, StatSource, SysinfoStats};

/// Shared collaborators injected into tool callbacks. These are the
/// only resources that cross session boundaries; everything else a
/// tool touches is its own display state.
pub struct Services {
    pub clipboard: ClipboardBridge,
    pub store: PersistenceStore,
    pub stats: Rc<dyn StatSource>,
    /// Monitor sampling cadence (configurable; default 1.5s).
    pub monitor_interval: Duration,
}

/// A user-driven action inside a tool pane. Actions only ever mutate
/// display state; they never change the session lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolAction {
    /// Append a character to the tool's text input.
    Input(char),
    /// Remove the last character from the tool's text input.
    Backspace,
    /// Insert a line break (notes only).
    Newline,
    /// Run the tool's primary operation on the current input.
    Submit,
    /// Switch between encode and decode (base64 only).
    ToggleMode,
    /// Start the countdown (timer only).
    Start,
    /// Cancel and re-arm the countdown (timer only).
    Reset,
    /// Adjust the password length by the given step.
    LengthDelta(i8),
    /// Generate a fresh password.
    Generate,
    /// Copy the tool's current result to the clipboard.
    Copy,
}

/// Request for recurring background work, applied by the registry.
#[derive(Debug, Clone, Copy)]
pub struct TaskRequest {
    pub interval: Duration,
    /// `Some(n)` fires exactly n times then auto-cancels; `None`
    /// repeats until the session closes.
    pub budget: Option<u32>,
}

/// Side effects a tool callback asks the session layer to perform.
#[derive(Default)]
pub struct Effects {
    pub schedule: Option<TaskRequest>,
    pub cancel_task: bool,
    /// User-visible success notice (surfaced as a toast).
    pub notice: Option<String>,
}

impl Effects {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn schedule(request: TaskRequest) -> Self {
        Self {
            schedule: Some(request),
            ..Self::default()
        }
    }

    pub fn cancel_task() -> Self {
        Self {
            cancel_task: true,
            ..Self::default()
        }
    }

    pub fn notice(text: impl Into<String>) -> Self {
        Self {
            notice: Some(text.into()),
            ..Self::default()
        }
    }
}

/// Immutable render snapshot of one tool's display state.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolView {
    Notes {
        text: String,
    },
    Timer {
        /// `mm:ss`, or the done indicator.
        display: String,
        running: bool,
        done: bool,
    },
    Monitor {
        available: bool,
        cpu_percent: f32,
        ram_percent: f32,
        /// Wall-clock time of the last successful sample.
        sampled_at: Option<String>,
    },
    Password {
        length: u8,
        generated: Option<String>,
    },
    Base64 {
        encoding: bool,
        input: String,
        output: Option<String>,
    },
    Converter {
        input: String,
        result: String,
    },
    Color {
        input: String,
        invalid: bool,
        last_copied: Option<String>,
    },
}

/// Per-tool behavior behind the session lifecycle.
///
/// `on_open`/`on_action`/`on_close` run synchronously on the one
/// cooperative thread; `on_tick` is invoked by the scheduler through
/// the task registered via [`Effects::schedule`].
pub trait Tool {
    fn kind(&self) -> ToolKind;

    /// Called once when the session opens.
    fn on_open(&mut self, services: &mut Services) -> Result<Effects>;

    /// Called for every user action while the session is active.
    fn on_action(&mut self, action: &ToolAction, services: &mut Services) -> Result<Effects>;

    /// Finalize step, called exactly once during close, after the
    /// session's task (if any) has been cancelled.
    fn on_close(&mut self, services: &mut Services) -> Result<()>;

    /// One unit of recurring work. Only reached by tools that
    /// scheduled a task.
    fn on_tick(&mut self, now: Instant) -> Result<TickOutcome> {
        let _ = now;
        Ok(TickOutcome::Finished)
    }

    fn view(&self) -> ToolView;
}

/// Construct the behavior object for a tool kind.
pub fn build(kind: ToolKind, services: &Services) -> Rc<RefCell<dyn Tool>> {
    match kind {
        ToolKind::Notes => Rc::new(RefCell::new(notes::NotesTool::new())),
        ToolKind::Timer => Rc::new(RefCell::new(timer::TimerTool::new())),
        ToolKind::Monitor => Rc::new(RefCell::new(monitor::MonitorTool::new(
            Rc::clone(&services.stats),
            services.monitor_interval,
        ))),
        ToolKind::PasswordGen => Rc::new(RefCell::new(passgen::PasswordTool::new())),
        ToolKind::Base64Tool => Rc::new(RefCell::new(base64_tool::Base64Tool::new())),
        ToolKind::UnitConverter => Rc::new(RefCell::new(convert::ConverterTool::new())),
        ToolKind::ColorPicker => Rc::new(RefCell::new(color_picker::ColorPickerTool::new())),
    }
}
