//! Session identity, tool kinds, and lifecycle types.

use std::fmt;

use crate::scheduler::TaskHandle;

/// Unique identifier for a session within this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub(crate) u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

impl From<SessionId> for TaskHandle {
    /// A session owns at most one periodic task, so the session id
    /// doubles as its task handle.
    fn from(id: SessionId) -> Self {
        TaskHandle(id.0)
    }
}

impl From<TaskHandle> for SessionId {
    fn from(handle: TaskHandle) -> Self {
        SessionId(handle.0)
    }
}

/// The closed set of tools the dashboard can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    Notes,
    Timer,
    Monitor,
    PasswordGen,
    Base64Tool,
    UnitConverter,
    ColorPicker,
}

impl ToolKind {
    /// Dashboard order.
    pub const ALL: [ToolKind; 7] = [
        ToolKind::Notes,
        ToolKind::Timer,
        ToolKind::Monitor,
        ToolKind::UnitConverter,
        ToolKind::PasswordGen,
        ToolKind::Base64Tool,
        ToolKind::ColorPicker,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ToolKind::Notes => "Sticky Notes",
            ToolKind::Timer => "Focus Timer",
            ToolKind::Monitor => "System Monitor",
            ToolKind::PasswordGen => "Passwords",
            ToolKind::Base64Tool => "Base64",
            ToolKind::UnitConverter => "Converter",
            ToolKind::ColorPicker => "Color Picker",
        }
    }

    /// Whether sessions of this kind run recurring background work.
    pub fn owns_task(self) -> bool {
        matches!(self, ToolKind::Timer | ToolKind::Monitor)
    }

    /// Whether sessions of this kind read/write the durable notes blob.
    pub fn needs_persistence(self) -> bool {
        matches!(self, ToolKind::Notes)
    }

    /// Whether sessions of this kind write to the shared clipboard slot.
    pub fn needs_clipboard(self) -> bool {
        matches!(
            self,
            ToolKind::PasswordGen | ToolKind::Base64Tool | ToolKind::ColorPicker
        )
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Session lifecycle. `Closing` is only ever observable from inside a
/// close request; user-visible sessions are `Active`, and `Closed` is
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Active,
    Closing,
    Closed,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LifecycleState::Active => "active",
            LifecycleState::Closing => "closing",
            LifecycleState::Closed => "closed",
        };
        f.write_str(s)
    }
}

/// Programmer-error class: misuse of a session handle. Fatal to the
/// single call, never silently ignored.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("{id} is {state} and accepts no further operations")]
    InvalidState { id: SessionId, state: LifecycleState },
    #[error("{0} is not in the live set")]
    UnknownSession(SessionId),
}
