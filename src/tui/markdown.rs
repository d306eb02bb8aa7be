use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// Parse markdown and convert to styled ratatui Lines
pub fn parse_markdown(input: &str) -> Vec<Line<'static>> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let mut renderer = Renderer::default();
    for event in Parser::new_ext(input, options) {
        renderer.handle(event);
    }
    renderer.finish()
}

#[derive(Default)]
struct Renderer {
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    style_stack: Vec<Style>,
    /// One entry per open list: next number for ordered lists
    lists: Vec<Option<u64>>,
    code_block: Option<String>,
}

impl Renderer {
    fn style(&self) -> Style {
        self.style_stack.last().copied().unwrap_or_default()
    }

    fn flush_line(&mut self) {
        if !self.spans.is_empty() {
            self.lines.push(Line::from(std::mem::take(&mut self.spans)));
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => match &mut self.code_block {
                Some(code) => code.push_str(&text),
                None => {
                    let style = self.style();
                    self.spans.push(Span::styled(text.into_string(), style));
                }
            },
            Event::Code(code) => {
                self.spans.push(Span::styled(
                    code.into_string(),
                    Style::default().fg(Color::Yellow),
                ));
            }
            Event::SoftBreak | Event::HardBreak => self.flush_line(),
            Event::Rule => {
                self.flush_line();
                self.lines.push(Line::from(Span::styled(
                    "─".repeat(20),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        let style = match tag {
            Tag::Heading { level, .. } => {
                self.flush_line();
                let color = match level {
                    HeadingLevel::H1 => Color::Cyan,
                    HeadingLevel::H2 => Color::Blue,
                    _ => Color::Green,
                };
                Style::default().fg(color).add_modifier(Modifier::BOLD)
            }
            Tag::Emphasis => self.style().add_modifier(Modifier::ITALIC),
            Tag::Strong => self.style().add_modifier(Modifier::BOLD),
            Tag::Strikethrough => self.style().add_modifier(Modifier::CROSSED_OUT),
            Tag::CodeBlock(kind) => {
                self.flush_line();
                if let CodeBlockKind::Fenced(lang) = kind {
                    if !lang.is_empty() {
                        self.lines.push(Line::from(Span::styled(
                            lang.into_string(),
                            Style::default().fg(Color::Magenta),
                        )));
                    }
                }
                self.code_block = Some(String::new());
                Style::default().fg(Color::Gray)
            }
            Tag::List(first) => {
                self.flush_line();
                self.lists.push(first);
                self.style()
            }
            Tag::Item => {
                let indent = "  ".repeat(self.lists.len().saturating_sub(1));
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{}. ", n);
                        *n += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                self.spans.push(Span::raw(indent));
                self.spans
                    .push(Span::styled(marker, Style::default().fg(Color::Yellow)));
                self.style()
            }
            Tag::Link { .. } => Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
            Tag::BlockQuote(_) => {
                self.flush_line();
                self.spans
                    .push(Span::styled("│ ", Style::default().fg(Color::DarkGray)));
                Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC)
            }
            _ => self.style(),
        };
        self.style_stack.push(style);
    }

    fn end(&mut self, tag: TagEnd) {
        self.style_stack.pop();
        match tag {
            TagEnd::Heading(_) | TagEnd::Paragraph | TagEnd::Item | TagEnd::BlockQuote(_) => {
                self.flush_line()
            }
            TagEnd::CodeBlock => {
                let code = self.code_block.take().unwrap_or_default();
                for line in code.lines() {
                    self.lines.push(Line::from(Span::styled(
                        format!("  {}", line),
                        Style::default().fg(Color::Gray),
                    )));
                }
            }
            TagEnd::List(_) => {
                self.lists.pop();
            }
            _ => {}
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush_line();
        self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_numbered_recommendations() {
        let md = "Here are two picks:\n\n1. **Bouldin Creek Cafe** - vegan brunch, $\n2. **Counter Culture** - plant-based, $$\n";
        let lines = parse_markdown(md);
        assert_eq!(
            plain(&lines),
            vec![
                "Here are two picks:",
                "1. Bouldin Creek Cafe - vegan brunch, $",
                "2. Counter Culture - plant-based, $$",
            ]
        );

        let name = lines[1]
            .spans
            .iter()
            .find(|s| s.content == "Bouldin Creek Cafe")
            .map(|s| s.style);
        assert!(name.is_some_and(|style| style.add_modifier.contains(Modifier::BOLD)));
    }

    #[test]
    fn test_bullets_and_code() {
        let lines = parse_markdown("- cozy\n- quiet\n\n```\naddress: 1 Main St\n```\n");
        assert_eq!(plain(&lines), vec!["• cozy", "• quiet", "  address: 1 Main St"]);
    }

    #[test]
    fn test_plain_text_passes_through() {
        let lines = parse_markdown("What part of town are you in?");
        assert_eq!(plain(&lines), vec!["What part of town are you in?"]);
        assert!(parse_markdown("").is_empty());
    }
}
