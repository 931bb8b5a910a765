//! Transient notifications, rendered bottom-right over the main view.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,    // Blue
    Success, // Green
    Error,   // Red
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub created_at: Instant,
    pub duration: Duration,
}

impl Toast {
    fn new(message: impl Into<String>, kind: ToastKind) -> Self {
        Self {
            message: message.into(),
            kind,
            created_at: Instant::now(),
            duration: Duration::from_secs(3),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.duration
    }
}

pub struct ToastManager {
    queue: VecDeque<Toast>,
    max_visible: usize,
}

impl ToastManager {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            max_visible: 4,
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Toast::new(message, ToastKind::Info));
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(Toast::new(message, ToastKind::Success));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Toast::new(message, ToastKind::Error));
    }

    fn push(&mut self, toast: Toast) {
        self.queue.push_back(toast);
        while self.queue.len() > self.max_visible {
            self.queue.pop_front();
        }
    }

    /// Remove expired toasts.
    pub fn update(&mut self) {
        self.queue.retain(|t| !t.is_expired());
    }

    pub fn visible(&self) -> Vec<&Toast> {
        self.queue.iter().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Default for ToastManager {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ToastWidget<'a> {
    toasts: &'a [&'a Toast],
}

impl<'a> ToastWidget<'a> {
    pub fn new(toasts: &'a [&'a Toast]) -> Self {
        Self { toasts }
    }

    pub fn render(self, frame: &mut Frame, area: Rect) {
        if self.toasts.is_empty() {
            return;
        }

        let toast_width = 36u16;
        let toast_height = 3u16;
        let gap = 1u16;

        for (idx, toast) in self.toasts.iter().enumerate() {
            let offset = idx as u16 * (toast_height + gap);
            let x = area.right().saturating_sub(toast_width + 2);
            let y = area.bottom().saturating_sub(toast_height + 2 + offset);
            if y < area.top() {
                break;
            }
            let toast_area = Rect::new(x, y, toast_width, toast_height);

            let accent = match toast.kind {
                ToastKind::Info => Style::default().fg(Color::Blue),
                ToastKind::Success => Style::default().fg(Color::Green),
                ToastKind::Error => Style::default().fg(Color::Red),
            };
            let icon = match toast.kind {
                ToastKind::Info => "i",
                ToastKind::Success => "+",
                ToastKind::Error => "!",
            };

            frame.render_widget(Clear, toast_area);
            let text = Paragraph::new(Line::from(vec![
                Span::styled(icon, accent.add_modifier(Modifier::BOLD)),
                Span::raw(" "),
                Span::raw(toast.message.clone()),
            ]))
            .block(Block::default().borders(Borders::ALL).border_style(accent));
            frame.render_widget(text, toast_area);
        }
    }
}
