//! Application state: the registry, scheduler, and shared services,
//! plus dashboard navigation and focus.

use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use crate::clipboard::ClipboardBridge;
use crate::config::Config;
use crate::scheduler::{Scheduler, TaskEvent};
use crate::session::{Runtime, SessionId, SessionRegistry, ToolKind};
use crate::store::PersistenceStore;
use crate::tools::{Services, SysinfoStats, ToolAction, ToolView};
use crate::ui::ToastManager;

/// Which pane is currently receiving input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Dashboard,
    Tool,
}

/// Application state
pub struct App {
    pub config: Config,
    pub scheduler: Scheduler,
    pub services: Services,
    pub registry: SessionRegistry,
    pub toasts: ToastManager,
    pub focus: Focus,
    /// Index into [`ToolKind::ALL`] for the dashboard cursor.
    pub selected_card: usize,
    /// The session shown in the tool pane.
    pub focused_session: Option<SessionId>,
    /// Should quit
    pub should_quit: bool,
}

impl App {
    /// Create a new application instance wired to the real OS
    /// services.
    pub fn new() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        let services = Services {
            clipboard: ClipboardBridge::system(),
            store: PersistenceStore::open()?,
            stats: Rc::new(SysinfoStats::new()),
            monitor_interval: Duration::from_millis(config.monitor_interval_ms),
        };
        Ok(Self::with_services(config, services))
    }

    /// Create an application instance over explicit services (used by
    /// tests to substitute fakes).
    pub fn with_services(config: Config, services: Services) -> Self {
        Self {
            config,
            scheduler: Scheduler::new(),
            services,
            registry: SessionRegistry::new(),
            toasts: ToastManager::new(),
            focus: Focus::Dashboard,
            selected_card: 0,
            focused_session: None,
            should_quit: false,
        }
    }

    /// Advance the scheduler one tick and process task lifecycle
    /// events. Called once per event-loop iteration.
    pub fn advance(&mut self, now: Instant) {
        for event in self.scheduler.tick(now) {
            match event {
                TaskEvent::Completed(handle) => {
                    if let Some((_, kind)) = self.registry.task_ended(handle) {
                        if kind == ToolKind::Timer {
                            self.toasts.success("Focus session complete");
                        }
                    }
                }
                TaskEvent::Faulted(handle, err) => {
                    if let Some((id, _)) = self.registry.task_ended(handle) {
                        self.toasts.error(format!("{id}: background task stopped: {err}"));
                    }
                }
            }
        }
        self.toasts.update();
    }

    /// Open a session for the card under the dashboard cursor and
    /// focus it.
    pub fn open_selected(&mut self, now: Instant) {
        let kind = ToolKind::ALL[self.selected_card];
        let mut rt = Runtime {
            scheduler: &mut self.scheduler,
            services: &mut self.services,
            now,
        };
        match self.registry.open(kind, &mut rt) {
            Ok(id) => {
                self.focused_session = Some(id);
                self.focus = Focus::Tool;
            }
            Err(err) => self.toasts.error(format!("Could not open {kind}: {err}")),
        }
    }

    /// Forward a tool action to the focused session.
    pub fn dispatch(&mut self, action: ToolAction, now: Instant) {
        let Some(id) = self.focused_session else {
            return;
        };
        let mut rt = Runtime {
            scheduler: &mut self.scheduler,
            services: &mut self.services,
            now,
        };
        match self.registry.action(id, &action, &mut rt) {
            Ok(Some(notice)) => self.toasts.success(notice),
            Ok(None) => {}
            Err(err) => self.toasts.error(format!("{id}: {err}")),
        }
    }

    /// Close the focused session, running its finalize step.
    pub fn close_focused(&mut self, now: Instant) {
        let Some(id) = self.focused_session else {
            return;
        };
        let mut rt = Runtime {
            scheduler: &mut self.scheduler,
            services: &mut self.services,
            now,
        };
        match self.registry.close_request(id, &mut rt) {
            Ok(()) => self.toasts.info(format!("{id} closed")),
            Err(err) => self.toasts.error(format!("{id}: {err}")),
        }
        self.focused_session = self.registry.list_active().last().copied();
        if self.focused_session.is_none() {
            self.focus = Focus::Dashboard;
        }
    }

    /// Close every open session (finalize included). Called at quit.
    pub fn close_all(&mut self, now: Instant) {
        let mut rt = Runtime {
            scheduler: &mut self.scheduler,
            services: &mut self.services,
            now,
        };
        self.registry.close_all(&mut rt);
        self.focused_session = None;
    }

    /// Move the tool-pane focus through open sessions in opening
    /// order. `step` is +1 or -1.
    pub fn cycle_session(&mut self, step: isize) {
        let ids = self.registry.list_active();
        if ids.is_empty() {
            return;
        }
        let current = self
            .focused_session
            .and_then(|id| ids.iter().position(|s| *s == id));
        let next = match current {
            Some(pos) => (pos as isize + step).rem_euclid(ids.len() as isize) as usize,
            None => 0,
        };
        self.focused_session = Some(ids[next]);
    }

    pub fn select_next_card(&mut self) {
        self.selected_card = (self.selected_card + 1) % ToolKind::ALL.len();
    }

    pub fn select_prev_card(&mut self) {
        self.selected_card = self
            .selected_card
            .checked_sub(1)
            .unwrap_or(ToolKind::ALL.len() - 1);
    }

    /// Snapshot of the focused session for rendering.
    pub fn focused_view(&self) -> Option<(SessionId, ToolKind, ToolView)> {
        let id = self.focused_session?;
        let session = self.registry.get(id)?;
        Some((id, session.kind(), session.view()))
    }

    /// Kind of the focused session, for key routing.
    pub fn focused_kind(&self) -> Option<ToolKind> {
        self.focused_session
            .and_then(|id| self.registry.get(id))
            .map(|s| s.kind())
    }
}
