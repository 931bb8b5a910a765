//! Tool pane: renders the focused session's display state.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::session::{SessionId, ToolKind};
use crate::tools::ToolView;

pub struct ToolPane<'a> {
    session: Option<(SessionId, ToolKind, ToolView)>,
    focused: bool,
    clipboard_last: Option<&'a str>,
}

impl<'a> ToolPane<'a> {
    pub fn new(
        session: Option<(SessionId, ToolKind, ToolView)>,
        focused: bool,
        clipboard_last: Option<&'a str>,
    ) -> Self {
        Self {
            session,
            focused,
            clipboard_last,
        }
    }

    pub fn render(self, frame: &mut Frame, area: Rect) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let Some((id, kind, view)) = self.session else {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(" no session ");
            let hint = Paragraph::new("Open a tool from the dashboard (Enter)")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(hint, area);
            return;
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(format!(" {} [{id}] ", kind.title()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        match view {
            ToolView::Notes { text } => render_notes(frame, inner, &text),
            ToolView::Timer {
                display,
                running,
                done,
            } => render_timer(frame, inner, &display, running, done),
            ToolView::Monitor {
                available,
                cpu_percent,
                ram_percent,
                sampled_at,
            } => render_monitor(frame, inner, available, cpu_percent, ram_percent, sampled_at),
            ToolView::Password { length, generated } => {
                render_password(frame, inner, length, generated.as_deref());
            }
            ToolView::Base64 {
                encoding,
                input,
                output,
            } => render_base64(frame, inner, encoding, &input, output.as_deref()),
            ToolView::Converter { input, result } => {
                render_converter(frame, inner, &input, &result);
            }
            ToolView::Color {
                input,
                invalid,
                last_copied,
            } => render_color(frame, inner, &input, invalid, last_copied.as_deref()),
        }

        if let Some(value) = self.clipboard_last {
            render_clipboard_line(frame, inner, value);
        }
    }
}

fn render_notes(frame: &mut Frame, area: Rect, text: &str) {
    let chunks = split_rows(area, &[Constraint::Length(1), Constraint::Min(0)]);
    let hint = Paragraph::new("Auto-saves on close")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(hint, chunks[0]);

    let body = Paragraph::new(format!("{text}\u{2590}")).wrap(Wrap { trim: false });
    frame.render_widget(body, chunks[1]);
}

fn render_timer(frame: &mut Frame, area: Rect, display: &str, running: bool, done: bool) {
    let style = if done {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else if running {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let status = if done {
        "session complete"
    } else if running {
        "running"
    } else {
        "paused"
    };

    let lines = vec![
        Line::default(),
        Line::from(Span::styled(display.to_string(), style)).alignment(Alignment::Center),
        Line::default(),
        Line::from(Span::styled(status, Style::default().fg(Color::DarkGray)))
            .alignment(Alignment::Center),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_monitor(
    frame: &mut Frame,
    area: Rect,
    available: bool,
    cpu: f32,
    ram: f32,
    sampled_at: Option<String>,
) {
    if !available {
        let msg = Paragraph::new("System stats unavailable on this host")
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    let chunks = split_rows(
        area,
        &[
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ],
    );

    let cpu_gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan))
        .label(format!("CPU {cpu:.1}%"))
        .ratio(f64::from(cpu.clamp(0.0, 100.0)) / 100.0);
    frame.render_widget(cpu_gauge, chunks[1]);

    let ram_gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Yellow))
        .label(format!("RAM {ram:.1}%"))
        .ratio(f64::from(ram.clamp(0.0, 100.0)) / 100.0);
    frame.render_widget(ram_gauge, chunks[3]);

    if let Some(at) = sampled_at {
        let line = Paragraph::new(format!("sampled {at}"))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(line, chunks[4]);
    }
}

fn render_password(frame: &mut Frame, area: Rect, length: u8, generated: Option<&str>) {
    let lines = vec![
        Line::from(format!("Length: {length}  (-/+ to adjust)")),
        Line::default(),
        match generated {
            Some(password) => Line::from(Span::styled(
                password.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            None => Line::from(Span::styled(
                "press g to generate",
                Style::default().fg(Color::DarkGray),
            )),
        },
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_base64(frame: &mut Frame, area: Rect, encoding: bool, input: &str, output: Option<&str>) {
    let mode = if encoding { "Encode" } else { "Decode" };
    let output_line = match output {
        Some(output) if output == crate::tools::base64_tool::INVALID_INPUT => Line::from(
            Span::styled(output.to_string(), Style::default().fg(Color::Red)),
        ),
        Some(output) => Line::from(output.to_string()),
        None => Line::from(Span::styled(
            "press Enter to run",
            Style::default().fg(Color::DarkGray),
        )),
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(
                format!(" {mode} "),
                Style::default().fg(Color::Black).bg(Color::Cyan),
            ),
            Span::styled(" (Tab switches mode)", Style::default().fg(Color::DarkGray)),
        ]),
        Line::default(),
        Line::from(format!("In:  {input}\u{2590}")),
        Line::default(),
        output_line,
    ];
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn render_converter(frame: &mut Frame, area: Rect, input: &str, result: &str) {
    let result_style = if result == crate::tools::convert::INVALID_INPUT {
        Style::default().fg(Color::Red)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let lines = vec![
        Line::from("Kilometers to Miles"),
        Line::default(),
        Line::from(format!("km: {input}\u{2590}")),
        Line::default(),
        Line::from(Span::styled(result.to_string(), result_style)),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_color(frame: &mut Frame, area: Rect, input: &str, invalid: bool, last: Option<&str>) {
    let mut lines = vec![
        Line::from("Hex color (#rrggbb), Enter copies it"),
        Line::default(),
        Line::from(format!("color: {input}\u{2590}")),
    ];
    if invalid {
        lines.push(Line::from(Span::styled(
            "not a #rrggbb value",
            Style::default().fg(Color::Red),
        )));
    } else if let Some(last) = last {
        lines.push(Line::from(Span::styled(
            format!("last copied: {last}"),
            Style::default().fg(Color::DarkGray),
        )));
    }
    frame.render_widget(Paragraph::new(lines), area);
}

/// Clipboard slot readout pinned to the pane's bottom row.
fn render_clipboard_line(frame: &mut Frame, area: Rect, value: &str) {
    if area.height < 2 {
        return;
    }
    let row = Rect::new(area.x, area.bottom() - 1, area.width, 1);
    let shown = if value.chars().count() > 40 {
        let head: String = value.chars().take(37).collect();
        format!("{head}...")
    } else {
        value.to_string()
    };
    let line = Paragraph::new(Line::from(vec![
        Span::styled("clipboard: ", Style::default().fg(Color::DarkGray)),
        Span::styled(shown, Style::default().fg(Color::DarkGray)),
    ]));
    frame.render_widget(line, row);
}

fn split_rows(area: Rect, constraints: &[Constraint]) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints.to_vec())
        .split(area)
}
