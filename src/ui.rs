use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::definition::DefinitionResult;
use crate::session::{Decoration, Frame};

const HORIZONTAL_MARGIN: u16 = 5;
const MAX_DEFINITION_LINES: u16 = 4;
pub const NO_DEFINITION: &str = "(no definition found)";

fn word_line(frame: &Frame) -> Line<'static> {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_bold_style = Style::default()
        .patch(bold_style)
        .add_modifier(Modifier::DIM);

    match frame.decoration {
        Decoration::Success => Line::from(Span::styled(
            frame.word.clone(),
            Style::default().patch(bold_style).fg(Color::Green),
        )),
        Decoration::Error => Line::from(Span::styled(
            frame.word.clone(),
            Style::default()
                .patch(bold_style)
                .fg(Color::Red)
                .add_modifier(Modifier::REVERSED),
        )),
        Decoration::Plain if frame.reveal => {
            Line::from(Span::styled(frame.word.clone(), dim_bold_style))
        }
        Decoration::Plain => Line::from(vec![
            Span::styled(frame.typed.clone(), bold_style),
            // underlined so the remaining length stays visible
            Span::styled(
                " ".repeat(frame.filler()),
                dim_bold_style.add_modifier(Modifier::UNDERLINED),
            ),
        ]),
    }
}

fn definition_span(definition: &DefinitionResult) -> Span<'static> {
    match definition {
        DefinitionResult::Text(text) => Span::styled(
            format!("💡 {text}"),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        ),
        DefinitionResult::Unavailable => {
            Span::styled(NO_DEFINITION, Style::default().fg(Color::DarkGray))
        }
    }
}

impl Widget for &Frame {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);

        let definition = self.definition.as_ref().map(definition_span);
        let definition_lines = definition
            .as_ref()
            .map(|span| {
                let lines = (span.content.width() as f64 / max_chars_per_line as f64).ceil();
                (lines as u16).clamp(1, MAX_DEFINITION_LINES)
            })
            .unwrap_or(0);
        let streak_lines = if self.required > 1 { 1 } else { 0 };

        let occupied = 1 + 1 + definition_lines + streak_lines;
        let padding = area.height.saturating_sub(occupied) / 2;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Length(padding),
                Constraint::Length(1), // word
                Constraint::Length(1), // gap
                Constraint::Length(definition_lines),
                Constraint::Length(streak_lines),
                Constraint::Min(0),
            ])
            .split(area);

        Paragraph::new(word_line(self))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);

        if let Some(span) = definition {
            Paragraph::new(Line::from(span))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .render(chunks[3], buf);
        }

        if streak_lines > 0 {
            Paragraph::new(Span::styled(
                format!("✅ {}/{}", self.streak, self.required),
                Style::default().fg(Color::DarkGray),
            ))
            .alignment(Alignment::Center)
            .render(chunks[4], buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn frame(word: &str, typed: &str, decoration: Decoration) -> Frame {
        Frame {
            word: word.into(),
            typed: typed.into(),
            decoration,
            reveal: false,
            definition: None,
            streak: 0,
            required: 1,
        }
    }

    fn draw(frame: &Frame) -> Buffer {
        let backend = TestBackend::new(60, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| f.render_widget(frame, f.area()))
            .unwrap();
        terminal.backend().buffer().clone()
    }

    fn rows(buf: &Buffer) -> Vec<String> {
        (0..buf.area.height)
            .map(|y| {
                (0..buf.area.width)
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect()
    }

    fn find(buf: &Buffer, needle: &str) -> Option<(u16, u16)> {
        rows(buf).iter().enumerate().find_map(|(y, row)| {
            row.find(needle)
                .map(|x| (row[..x].chars().count() as u16, y as u16))
        })
    }

    #[test]
    fn typing_frame_shows_prefix_only() {
        let buf = draw(&frame("cat", "ca", Decoration::Plain));
        let all = rows(&buf).join("\n");
        assert!(all.contains("ca"));
        assert!(!all.contains("cat"));
    }

    #[test]
    fn word_is_centered_vertically() {
        let buf = draw(&frame("necessary", "", Decoration::Success));
        let (_, y) = find(&buf, "necessary").unwrap();
        assert!((4..=6).contains(&y), "row {y}");
    }

    #[test]
    fn error_flash_is_red() {
        let buf = draw(&frame("cat", "", Decoration::Error));
        let (x, y) = find(&buf, "cat").unwrap();
        assert_eq!(buf[(x, y)].fg, Color::Red);
        assert!(buf[(x, y)].modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn success_flash_is_green() {
        let buf = draw(&frame("cat", "", Decoration::Success));
        let (x, y) = find(&buf, "cat").unwrap();
        assert_eq!(buf[(x, y)].fg, Color::Green);
    }

    #[test]
    fn definition_and_streak_lines() {
        let mut f = frame("cat", "", Decoration::Plain);
        f.definition = Some(DefinitionResult::Text("A small feline.".into()));
        f.streak = 1;
        f.required = 3;
        let all = rows(&draw(&f)).join("\n");
        assert!(all.contains("A small feline."));
        assert!(all.contains("1/3"));
    }

    #[test]
    fn unavailable_definition_sentinel() {
        let mut f = frame("cat", "", Decoration::Plain);
        f.definition = Some(DefinitionResult::Unavailable);
        let all = rows(&draw(&f)).join("\n");
        assert!(all.contains(NO_DEFINITION));
        assert!(!all.contains("/1"));
    }

    #[test]
    fn tiny_terminal_does_not_panic() {
        let backend = TestBackend::new(4, 2);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut f = frame("extraordinary", "ex", Decoration::Plain);
        f.definition = Some(DefinitionResult::Text("Very unusual.".into()));
        f.required = 2;
        terminal
            .draw(|fr| fr.render_widget(&f, fr.area()))
            .unwrap();
    }
}
