//! Dashboard: the tool card list and the open-session strip.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::session::{SessionId, SessionRegistry, ToolKind};

pub struct Dashboard<'a> {
    registry: &'a SessionRegistry,
    selected_card: usize,
    focused_session: Option<SessionId>,
    focused: bool,
}

impl<'a> Dashboard<'a> {
    pub fn new(
        registry: &'a SessionRegistry,
        selected_card: usize,
        focused_session: Option<SessionId>,
        focused: bool,
    ) -> Self {
        Self {
            registry,
            selected_card,
            focused_session,
            focused,
        }
    }

    pub fn render(self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(ToolKind::ALL.len() as u16 + 2),
                Constraint::Min(0),
            ])
            .split(area);

        self.render_cards(frame, chunks[0]);
        self.render_sessions(frame, chunks[1]);
    }

    fn render_cards(&self, frame: &mut Frame, area: Rect) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let items: Vec<ListItem> = ToolKind::ALL
            .iter()
            .enumerate()
            .map(|(idx, kind)| {
                let mut style = Style::default();
                if self.focused && idx == self.selected_card {
                    style = style.fg(Color::Black).bg(Color::Cyan);
                }
                let badge = badge_for(*kind);
                let line = Line::from(vec![
                    Span::styled(format!(" {:<16}", kind.title()), style),
                    Span::styled(badge, style.fg(Color::DarkGray)),
                ]);
                ListItem::new(line).style(style)
            })
            .collect();

        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(" Tools "),
        );
        frame.render_widget(list, area);
    }

    fn render_sessions(&self, frame: &mut Frame, area: Rect) {
        let ids = self.registry.list_active();
        let items: Vec<ListItem> = if ids.is_empty() {
            vec![ListItem::new(Line::from(Span::styled(
                " none open",
                Style::default().fg(Color::DarkGray),
            )))]
        } else {
            ids.iter()
                .map(|id| {
                    let kind = self
                        .registry
                        .get(*id)
                        .map(|s| s.kind().title())
                        .unwrap_or("?");
                    let marker = if Some(*id) == self.focused_session {
                        Span::styled("> ", Style::default().fg(Color::Green))
                    } else {
                        Span::raw("  ")
                    };
                    let mut style = Style::default();
                    if Some(*id) == self.focused_session {
                        style = style.add_modifier(Modifier::BOLD);
                    }
                    ListItem::new(Line::from(vec![
                        marker,
                        Span::styled(format!("{id}  {kind}"), style),
                    ]))
                })
                .collect()
        };

        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Open Sessions "),
        );
        frame.render_widget(list, area);
    }
}

/// Capability hints shown next to each card.
fn badge_for(kind: ToolKind) -> &'static str {
    match (kind.owns_task(), kind.needs_persistence(), kind.needs_clipboard()) {
        (true, _, _) => "tick",
        (_, true, _) => "disk",
        (_, _, true) => "clip",
        _ => "",
    }
}

/// Header line: app title and a live clock.
pub fn render_header(frame: &mut Frame, area: Rect) {
    if area.height == 0 {
        return;
    }
    let now = chrono::Local::now().format("%A %H:%M:%S").to_string();
    let title = " utilitui ";
    let pad_width = (area.width as usize)
        .saturating_sub(title.len() + now.len() + 1);
    let line = Line::from(vec![
        Span::styled(
            title,
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" ".repeat(pad_width)),
        Span::styled(now, Style::default().fg(Color::DarkGray)),
        Span::raw(" "),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
