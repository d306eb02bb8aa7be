use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use super::app::{App, DisplayRole, TuiCommand};
use super::markdown::parse_markdown;
use crate::constants::INPUT_PLACEHOLDER;
use crate::dialogue::SlotName;

/// Render the main UI
pub fn render_ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Main content
            Constraint::Length(3), // Input
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, chunks[0], app);

    if app.show_slots {
        let content = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(72), Constraint::Percentage(28)])
            .split(chunks[1]);
        render_chat(frame, content[0], app);
        render_slots(frame, content[1], app);
    } else {
        render_chat(frame, chunks[1], app);
    }

    render_input(frame, chunks[2], app);
    render_status_bar(frame, chunks[3], app);
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let header_text = vec![Line::from(vec![
        Span::styled(
            "Food Scout",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | Model: "),
        Span::styled(&app.model_name, Style::default().fg(Color::Green)),
        Span::raw(" | Turns: "),
        Span::styled(app.turns.len().to_string(), Style::default().fg(Color::Gray)),
    ])];

    let header = Paragraph::new(header_text)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(header, area);
}

/// Collected and missing preferences
fn render_slots(frame: &mut Frame, area: Rect, app: &App) {
    let mut items = vec![ListItem::new(Line::from(Span::styled(
        "Collected",
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    )))];

    let missing = app.slots.missing();
    for slot in SlotName::ALL {
        if let Some(value) = app.slots.display_value(slot) {
            items.push(ListItem::new(Line::from(vec![
                Span::styled(format!(" {}: ", slot.label()), Style::default().fg(Color::Gray)),
                Span::styled(value, Style::default().fg(Color::White)),
            ])));
        }
    }
    if missing.len() == SlotName::ALL.len() {
        items.push(ListItem::new(Span::styled(
            " nothing yet",
            Style::default().fg(Color::DarkGray),
        )));
    }

    items.push(ListItem::new(""));
    items.push(ListItem::new(Line::from(Span::styled(
        "Missing",
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ))));
    for slot in &missing {
        items.push(ListItem::new(Span::styled(
            format!(" {}", slot.label()),
            Style::default().fg(Color::DarkGray),
        )));
    }
    if missing.is_empty() {
        items.push(ListItem::new(Span::styled(
            " all set",
            Style::default().fg(Color::Green),
        )));
    }

    let list = List::new(items).block(
        Block::default()
            .title(" Preferences ")
            .borders(Borders::LEFT)
            .border_style(Style::default().fg(Color::DarkGray)),
    );

    frame.render_widget(list, area);
}

fn render_chat(frame: &mut Frame, area: Rect, app: &App) {
    let mut lines = Vec::new();

    for msg in app.display_messages() {
        let (label, color) = match msg.role {
            DisplayRole::User => ("You", Color::Blue),
            DisplayRole::Assistant => ("Food Scout", Color::Green),
            DisplayRole::Failed => ("Food Scout", Color::Red),
            DisplayRole::System => ("System", Color::Yellow),
        };

        lines.push(Line::from(vec![
            Span::styled(
                format!("[{}] ", label),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                msg.timestamp.format("%H:%M").to_string(),
                Style::default().fg(Color::DarkGray),
            ),
        ]));

        match msg.role {
            DisplayRole::Assistant => lines.extend(parse_markdown(&msg.content)),
            DisplayRole::Failed => lines.extend(msg.content.lines().map(|line| {
                Line::from(Span::styled(line.to_string(), Style::default().fg(Color::Red)))
            })),
            _ => lines.extend(msg.content.lines().map(|line| Line::from(line.to_string()))),
        }

        lines.push(Line::from(""));
    }

    if app.is_generating {
        lines.push(Line::from(vec![
            Span::styled(
                "[Food Scout] ",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "thinking...",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ),
        ]));
    }

    // Keep the newest lines in view; scroll_offset counts up from the bottom
    let visible = area.height.saturating_sub(2);
    let total = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    let top = total
        .saturating_sub(visible)
        .saturating_sub(app.scroll_offset);

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(" Chat ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .wrap(Wrap { trim: false })
        .scroll((top, 0));

    frame.render_widget(paragraph, area);
}

fn render_input(frame: &mut Frame, area: Rect, app: &App) {
    let showing_command_hints = app.input.starts_with(':');

    let input_area = if showing_command_hints {
        let typed = app.input.trim_start_matches(':').to_lowercase();
        let matching: Vec<_> = TuiCommand::ALL
            .iter()
            .filter(|(name, _)| name.trim_start_matches(':').starts_with(&typed))
            .collect();

        let hints_height = (matching.len() as u16 + 2).min(8);
        if !matching.is_empty() && area.height > hints_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(hints_height), Constraint::Min(3)])
                .split(area);

            let hint_lines: Vec<Line> = matching
                .iter()
                .map(|(name, description)| {
                    Line::from(vec![
                        Span::styled(
                            format!("  {:<12}", name),
                            Style::default()
                                .fg(Color::Yellow)
                                .add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(*description, Style::default().fg(Color::Gray)),
                    ])
                })
                .collect();

            let hints = Paragraph::new(hint_lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .title(" Commands "),
            );
            frame.render_widget(hints, chunks[0]);
            chunks[1]
        } else {
            area
        }
    } else {
        area
    };

    let (text, style) = if app.input.is_empty() {
        (
            INPUT_PLACEHOLDER.to_string(),
            Style::default().fg(Color::DarkGray),
        )
    } else {
        (app.input.clone(), Style::default().fg(Color::White))
    };

    let title = if showing_command_hints {
        " Enter Command "
    } else {
        " Message (Enter to send • :help for commands) "
    };

    let input = Paragraph::new(text).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if showing_command_hints {
                Color::Yellow
            } else {
                Color::DarkGray
            }))
            .title(title),
    );
    frame.render_widget(input, input_area);

    let cursor_offset = u16::try_from(app.input.chars().count()).unwrap_or(u16::MAX);
    let cursor_x = input_area
        .x
        .saturating_add(1)
        .saturating_add(cursor_offset)
        .min(input_area.x + input_area.width.saturating_sub(2));
    frame.set_cursor_position((cursor_x, input_area.y + 1));
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let (mode, mode_color) = if app.is_generating {
        ("WAITING", Color::Yellow)
    } else {
        ("CHAT", Color::Green)
    };

    let status_text = if let Some(status) = &app.status_message {
        status.clone()
    } else if app.is_generating {
        "Waiting for a reply...".to_string()
    } else {
        "Ready".to_string()
    };

    let spans = vec![
        Span::styled(
            format!(" {} ", mode),
            Style::default()
                .bg(mode_color)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        Span::raw(status_text),
        Span::raw(" | "),
        Span::styled("Tab: preferences", Style::default().fg(Color::DarkGray)),
        Span::raw(" | "),
        Span::styled("Ctrl+C: quit", Style::default().fg(Color::DarkGray)),
    ];

    let status_bar = Paragraph::new(Line::from(spans))
        .style(Style::default().bg(Color::Black))
        .block(Block::default());

    frame.render_widget(status_bar, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::UIConfig;
    use crate::dialogue::CandidateSet;
    use crate::extraction::EntityExtractor;
    use crate::models::{MockCompletionClient, SamplingParams};
    use crate::session::{Assistant, Session};
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_render_shows_slots_and_messages() {
        let mut mock = MockCompletionClient::new();
        mock.expect_name().return_const("gpt-4".to_string());
        let assistant = Assistant::new(
            Arc::new(mock),
            EntityExtractor::default(),
            SamplingParams::default(),
        );
        let mut app = App::new(Arc::new(assistant), Session::new().shared(), &UIConfig::default());

        app.slots.apply(&CandidateSet {
            location: vec!["Austin".to_string()],
            ..Default::default()
        });
        app.add_notice("Welcome aboard");

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| render_ui(f, &app)).unwrap();
        let text = buffer_text(&terminal);

        assert!(text.contains("Food Scout"));
        assert!(text.contains("gpt-4"));
        assert!(text.contains("Location: Austin"));
        assert!(text.contains("Cuisine"));
        assert!(text.contains("Welcome aboard"));
        assert!(text.contains("Ready"));
    }
}
