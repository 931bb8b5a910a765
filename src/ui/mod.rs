//! Terminal UI components: dashboard, tool pane, and toasts.

pub mod dashboard;
pub mod layout;
pub mod tool_pane;
pub mod toast;

pub use dashboard::{render_header, Dashboard};
pub use tool_pane::ToolPane;
pub use toast::{Toast, ToastKind, ToastManager, ToastWidget};
