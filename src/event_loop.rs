//! The cooperative driver: advances the scheduler, draws the UI, and
//! polls for input, all on one thread.

use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{poll, read, Event};
use ratatui::{
    backend::CrosstermBackend,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame, Terminal,
};

use crate::app::{App, Focus};
use crate::handlers::keyboard::{handle_key_event, KeyAction};
use crate::session::ToolKind;
use crate::ui::layout::create_layout;
use crate::ui::{render_header, Dashboard, ToolPane, ToastWidget};

pub fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        // Advance all periodic tasks on the logical clock. The poll
        // timeout below keeps this running at least as often as the
        // shortest task interval.
        app.advance(Instant::now());

        // Draw UI
        terminal.draw(|f| draw_ui(f, app))?;

        // Handle events with timeout for scheduler updates
        if poll(Duration::from_millis(app.config.poll_ms))? {
            match read()? {
                Event::Key(key) => {
                    if matches!(handle_key_event(app, key, Instant::now())?, KeyAction::Quit) {
                        app.should_quit = true;
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }

        if app.should_quit {
            // Close-request every live session so finalize steps
            // (notes persistence) run before teardown.
            app.close_all(Instant::now());
            return Ok(());
        }
    }
}

fn draw_ui(f: &mut Frame, app: &mut App) {
    let (header_area, dashboard_area, tool_area, help_area) = create_layout(f.area());

    render_header(f, header_area);

    let dashboard = Dashboard::new(
        &app.registry,
        app.selected_card,
        app.focused_session,
        app.focus == Focus::Dashboard,
    );
    dashboard.render(f, dashboard_area);

    let pane = ToolPane::new(
        app.focused_view(),
        app.focus == Focus::Tool,
        app.services.clipboard.last(),
    );
    pane.render(f, tool_area);

    draw_help_bar(f, help_area, app);

    // Draw toasts last (overlay on top of everything)
    let toasts = app.toasts.visible();
    if !toasts.is_empty() {
        ToastWidget::new(&toasts).render(f, f.area());
    }
}

fn draw_help_bar(f: &mut Frame, area: Rect, app: &App) {
    let hint_style = Style::default().fg(Color::Cyan);

    let help_text = match app.focus {
        Focus::Dashboard => vec![
            Span::styled(" j/k ", hint_style),
            Span::raw("select "),
            Span::styled(" Enter ", hint_style),
            Span::raw("open "),
            Span::styled(" [/] ", hint_style),
            Span::raw("cycle "),
            Span::styled(" x ", hint_style),
            Span::raw("close "),
            Span::styled(" Tab ", hint_style),
            Span::raw("pane "),
            Span::styled(" q ", hint_style),
            Span::raw("quit"),
        ],
        Focus::Tool => {
            let mut spans = vec![
                Span::styled(" Esc ", hint_style),
                Span::raw("dashboard "),
                Span::styled(" C-w ", hint_style),
                Span::raw("close "),
            ];
            spans.extend(tool_hints(app.focused_kind(), hint_style));
            spans.push(Span::styled(" C-q ", hint_style));
            spans.push(Span::raw("quit"));
            spans
        }
    };

    let help = Paragraph::new(Line::from(help_text)).style(Style::default().bg(Color::DarkGray));
    f.render_widget(help, area);
}

fn tool_hints(kind: Option<ToolKind>, hint_style: Style) -> Vec<Span<'static>> {
    match kind {
        Some(ToolKind::Timer) => vec![
            Span::styled(" s ", hint_style),
            Span::raw("start "),
            Span::styled(" r ", hint_style),
            Span::raw("reset "),
        ],
        Some(ToolKind::PasswordGen) => vec![
            Span::styled(" -/+ ", hint_style),
            Span::raw("length "),
            Span::styled(" g ", hint_style),
            Span::raw("generate "),
            Span::styled(" y ", hint_style),
            Span::raw("copy "),
        ],
        Some(ToolKind::Base64Tool) => vec![
            Span::styled(" Tab ", hint_style),
            Span::raw("mode "),
            Span::styled(" Enter ", hint_style),
            Span::raw("run "),
            Span::styled(" C-y ", hint_style),
            Span::raw("copy "),
        ],
        Some(ToolKind::UnitConverter | ToolKind::ColorPicker) => vec![
            Span::styled(" Enter ", hint_style),
            Span::raw("submit "),
        ],
        Some(ToolKind::Notes) => vec![Span::raw("type to edit, saved on close ")],
        Some(ToolKind::Monitor) | None => Vec::new(),
    }
}
