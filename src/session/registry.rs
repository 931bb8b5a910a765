//! Session lifecycle and the registry that owns every open session.
//!
//! The registry is the only component that creates and destroys
//! sessions. Close ordering is fixed: cancel the session's periodic
//! task, run the tool's finalize step, then mark the session closed
//! and drop it from the live set. That ordering guarantees no task
//! outlives its session and that the persisted blob reflects the
//! session's final in-memory state.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Instant;

use anyhow::Result;

use crate::scheduler::{PeriodicTask, Scheduler, SchedulerError, TaskHandle};
use crate::tools::{self, Effects, Services, Tool, ToolAction, ToolView};

use super::types::{LifecycleState, SessionError, SessionId, ToolKind};

/// Per-call bundle of the mutable collaborators registry operations
/// need: the scheduler, the shared services, and the current clock.
pub struct Runtime<'a> {
    pub scheduler: &'a mut Scheduler,
    pub services: &'a mut Services,
    pub now: Instant,
}

/// One open tool instance. Owned exclusively by the registry; owns its
/// behavior object and (at most one) periodic task handle.
pub struct ToolSession {
    id: SessionId,
    kind: ToolKind,
    state: LifecycleState,
    task: Option<TaskHandle>,
    tool: Rc<RefCell<dyn Tool>>,
}

impl ToolSession {
    fn new(id: SessionId, kind: ToolKind, tool: Rc<RefCell<dyn Tool>>) -> Self {
        Self {
            id,
            kind,
            state: LifecycleState::Active,
            task: None,
            tool,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn kind(&self) -> ToolKind {
        self.kind
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn task(&self) -> Option<TaskHandle> {
        self.task
    }

    /// Render snapshot of the tool's display state.
    pub fn view(&self) -> ToolView {
        self.tool.borrow().view()
    }

    fn ensure_active(&self) -> Result<(), SessionError> {
        if self.state == LifecycleState::Active {
            Ok(())
        } else {
            Err(SessionError::InvalidState {
                id: self.id,
                state: self.state,
            })
        }
    }

    fn open(&mut self, rt: &mut Runtime) -> Result<()> {
        let effects = self.tool.borrow_mut().on_open(rt.services)?;
        self.apply(effects, rt)
    }

    /// Dispatch a user action. Actions mutate display state only; the
    /// lifecycle state never changes here.
    fn action(&mut self, action: &ToolAction, rt: &mut Runtime) -> Result<Option<String>> {
        self.ensure_active()?;
        let mut effects = self.tool.borrow_mut().on_action(action, rt.services)?;
        let notice = effects.notice.take();
        self.apply(effects, rt)?;
        Ok(notice)
    }

    /// Drive `Active -> Closing -> Closed`. A finalize failure is
    /// reported but never blocks the transition; the session always
    /// reaches `Closed`.
    fn close(&mut self, rt: &mut Runtime) -> Result<(), SessionError> {
        self.ensure_active()?;
        self.state = LifecycleState::Closing;

        if let Some(handle) = self.task.take() {
            rt.scheduler.cancel(handle);
        }
        if let Err(err) = self.tool.borrow_mut().on_close(rt.services) {
            eprintln!("{}: finalize failed: {err:#}", self.id);
        }

        self.state = LifecycleState::Closed;
        Ok(())
    }

    fn apply(&mut self, effects: Effects, rt: &mut Runtime) -> Result<()> {
        if effects.cancel_task {
            if let Some(handle) = self.task.take() {
                rt.scheduler.cancel(handle);
            }
        }
        if let Some(request) = effects.schedule {
            let handle = TaskHandle::from(self.id);
            if self.task.is_some() {
                return Err(SchedulerError::DuplicateTask(handle).into());
            }
            let tool = Rc::clone(&self.tool);
            let mut task = PeriodicTask::new(handle, request.interval, move |now| {
                tool.borrow_mut().on_tick(now)
            });
            if let Some(budget) = request.budget {
                task = task.with_budget(budget);
            }
            rt.scheduler.register(task, rt.now)?;
            self.task = Some(handle);
        }
        Ok(())
    }

    /// The scheduler removed this session's task (completed or
    /// faulted); drop the stale handle.
    fn task_ended(&mut self, handle: TaskHandle) {
        if self.task == Some(handle) {
            self.task = None;
        }
    }
}

/// Tracks all currently open sessions. Multiple sessions of the same
/// kind may coexist, each with independent state.
pub struct SessionRegistry {
    sessions: HashMap<SessionId, ToolSession>,
    /// Opening order, used for listing and session cycling.
    order: Vec<SessionId>,
    next_id: u64,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
            order: Vec::new(),
            next_id: 0,
        }
    }

    /// Create a new session in `Active` state and run the tool's open
    /// hook (which may register a periodic task).
    pub fn open(&mut self, kind: ToolKind, rt: &mut Runtime) -> Result<SessionId> {
        let id = SessionId(self.next_id);
        self.next_id += 1;

        let tool = tools::build(kind, rt.services);
        let mut session = ToolSession::new(id, kind, tool);
        if let Err(err) = session.open(rt) {
            // The session never becomes visible; make sure no task
            // it managed to register survives it.
            if let Some(handle) = session.task.take() {
                rt.scheduler.cancel(handle);
            }
            return Err(err);
        }

        self.sessions.insert(id, session);
        self.order.push(id);
        Ok(id)
    }

    /// Dispatch a user action to a live session.
    pub fn action(
        &mut self,
        id: SessionId,
        action: &ToolAction,
        rt: &mut Runtime,
    ) -> Result<Option<String>> {
        let session = self
            .sessions
            .get_mut(&id)
            .ok_or(SessionError::UnknownSession(id))?;
        session.action(action, rt)
    }

    /// Drive a session through close and remove it from the live set.
    pub fn close_request(&mut self, id: SessionId, rt: &mut Runtime) -> Result<()> {
        let session = self
            .sessions
            .get_mut(&id)
            .ok_or(SessionError::UnknownSession(id))?;
        session.close(rt)?;

        self.sessions.remove(&id);
        self.order.retain(|s| *s != id);
        Ok(())
    }

    /// Close every live session, oldest first. Used at shutdown so
    /// finalize steps (notes persistence) always run.
    pub fn close_all(&mut self, rt: &mut Runtime) {
        for id in self.order.clone() {
            if let Err(err) = self.close_request(id, rt) {
                eprintln!("{id}: close failed: {err:#}");
            }
        }
    }

    /// Currently open sessions, in opening order.
    pub fn list_active(&self) -> Vec<SessionId> {
        self.order.clone()
    }

    pub fn get(&self, id: SessionId) -> Option<&ToolSession> {
        self.sessions.get(&id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Called with the handle of a task the scheduler dropped on its
    /// own (budget exhausted, finished, or faulted). Returns the
    /// owning session's id and kind for notification purposes.
    pub fn task_ended(&mut self, handle: TaskHandle) -> Option<(SessionId, ToolKind)> {
        let id = SessionId::from(handle);
        let session = self.sessions.get_mut(&id)?;
        session.task_ended(handle);
        Some((id, session.kind))
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
