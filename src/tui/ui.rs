//! UI rendering for the TUI

use ratatui::{
    prelude::*,
    widgets::{
        Block, Borders, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation,
        ScrollbarState, Wrap,
    },
};

use super::app::{PickerApp, PromptApp};
use super::state;

/// Match picker: header, ranked list, footer
pub fn draw_picker(frame: &mut Frame, app: &PickerApp) {
    let layout = Layout::vertical([
        Constraint::Length(1), // Header
        Constraint::Min(3),    // List
        Constraint::Length(1), // Footer
    ])
    .split(frame.area());

    let header = Paragraph::new(format!(" cmdwiki │ {} matches", app.ranked.len()))
        .style(Style::default().bg(Color::Blue).fg(Color::White).bold());
    frame.render_widget(header, layout[0]);

    let block = Block::default()
        .title(" Select a command ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(layout[1]);
    frame.render_widget(block, layout[1]);

    let visible_height = inner.height as usize;
    let start = app.model.scroll_offset.min(app.ranked.len());
    let end = (start + visible_height).min(app.ranked.len());
    let width = inner.width as usize;

    let items: Vec<ListItem> = app.ranked[start..end]
        .iter()
        .enumerate()
        .map(|(idx, ranked)| {
            let is_selected = start + idx == app.model.selected_index;
            let command = ranked.command;

            let mut spans = vec![Span::raw(" "), Span::raw(command.title.clone())];
            if !command.description.is_empty() {
                let used = command.title.chars().count() + 4;
                spans.push(Span::styled(
                    format!(" - {}", state::truncate(&command.description, width.saturating_sub(used))),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            if command.ai_generated {
                spans.push(Span::styled(" [ai]", Style::default().fg(Color::Magenta)));
            }

            let style = if is_selected {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(spans)).style(style)
        })
        .collect();
    frame.render_widget(List::new(items), inner);

    if app.ranked.len() > visible_height {
        let mut scrollbar_state = ScrollbarState::default()
            .content_length(app.ranked.len())
            .position(app.model.scroll_offset);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            inner,
            &mut scrollbar_state,
        );
    }

    let footer = Paragraph::new(" j/k:move  Ctrl+d/u:page  g/G:top/bottom  Enter:select  q/Esc:quit")
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));
    frame.render_widget(footer, layout[2]);
}

/// Command view: rendered document, hint line, input line, footer
pub fn draw_prompt(frame: &mut Frame, app: &PromptApp) {
    let layout = Layout::vertical([
        Constraint::Min(3),    // Document
        Constraint::Length(1), // Hint / warning
        Constraint::Length(3), // Input
        Constraint::Length(1), // Footer
    ])
    .split(frame.area());

    let command = app.resolver.command();
    let document = Paragraph::new(app.document.as_str())
        .block(
            Block::default()
                .title(format!(" {} ", command.title))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.model.doc_scroll, 0));
    frame.render_widget(document, layout[0]);

    frame.render_widget(hint_line(app), layout[1]);

    let name = app.active().unwrap_or_default();
    let marker = match app.feedback() {
        Some(true) => Span::styled(" ✔", Style::default().fg(Color::Green)),
        Some(false) => Span::styled(" ❌", Style::default().fg(Color::Red)),
        None => Span::raw(""),
    };
    let input = if app.model.input.is_empty() {
        let placeholder = app.hint().placeholder.unwrap_or_default();
        Span::styled(placeholder, Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(app.model.input.clone())
    };
    let border = if app.rejected { Color::Red } else { Color::Yellow };
    let prompt = Paragraph::new(Line::from(vec![
        Span::styled("> ", Style::default().fg(Color::Yellow)),
        input,
        marker,
    ]))
    .block(
        Block::default()
            .title(format!(" {} ", name))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    frame.render_widget(prompt, layout[2]);

    // Cursor after the typed text, inside the border
    let area = layout[2];
    let typed = u16::try_from(app.model.input.chars().count()).unwrap_or(u16::MAX);
    let x = area
        .x
        .saturating_add(3)
        .saturating_add(typed)
        .min(area.right().saturating_sub(2));
    frame.set_cursor_position((x, area.y.saturating_add(1)));

    let footer = Paragraph::new(" Enter:submit  ↑/↓:scroll  Esc:cancel")
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));
    frame.render_widget(footer, layout[3]);
}

fn hint_line(app: &PromptApp) -> Paragraph<'static> {
    if let Some(warning) = app.resolver.warning() {
        return Paragraph::new(format!(" ⚠ {}", warning)).style(Style::default().fg(Color::Yellow));
    }
    if app.rejected {
        return Paragraph::new(" Value does not match the required format")
            .style(Style::default().fg(Color::Red));
    }
    match app.hint().description {
        Some(desc) => Paragraph::new(format!(" {}", desc)).style(Style::default().fg(Color::Cyan)),
        None => Paragraph::new(""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::search::Ranked;
    use ratatui::backend::TestBackend;

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
    fn test_picker_lists_titles() {
        let mut first = Command::new("list files");
        first.description = "show directory contents".to_string();
        let second = Command::new("list network");
        let commands = vec![first, second];
        let ranked: Vec<Ranked> = commands
            .iter()
            .map(|command| Ranked { command, score: 1.0 })
            .collect();
        let app = PickerApp::new(&ranked);

        let mut terminal = Terminal::new(TestBackend::new(60, 10)).unwrap();
        terminal.draw(|f| draw_picker(f, &app)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("2 matches"));
        assert!(text.contains("list files"));
        assert!(text.contains("show directory contents"));
        assert!(text.contains("list network"));
    }

    #[test]
    fn test_prompt_shows_variable_and_hint() {
        let mut cmd = Command::new("add address");
        cmd.content = "ip addr add <cidr> dev <iface>".to_string();
        cmd.variables = vec!["cidr".to_string(), "iface".to_string()];
        let mut attrs = crate::command::Attributes::new();
        attrs.insert("desc".to_string(), "Address with prefix".to_string());
        cmd.metadata.insert("cidr".to_string(), attrs);

        let app = PromptApp::new(&cmd, "Adds an address\n".to_string());
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal.draw(|f| draw_prompt(f, &app)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("add address"));
        assert!(text.contains("Adds an address"));
        assert!(text.contains("cidr"));
        assert!(text.contains("Address with prefix"));
    }

    #[test]
    fn test_prompt_cursor_stays_inside_input_box() {
        let mut cmd = Command::new("echo");
        cmd.content = "echo <text>".to_string();
        cmd.variables = vec!["text".to_string()];

        let mut app = PromptApp::new(&cmd, String::new());
        app.model.input = "x".repeat(70_000);
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal.draw(|f| draw_prompt(f, &app)).unwrap();

        let cursor = terminal.get_cursor_position().unwrap();
        assert_eq!(cursor.x, 58);
    }
}
