use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::editor::EditorState;

use super::app::{App, Field};

pub(super) fn draw(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(area);

    let header = Paragraph::new(Line::from(vec![
        Span::styled("runpad", Style::default().fg(Color::Black).bg(Color::White)),
        Span::raw("  "),
        Span::styled(
            app.store_root().display().to_string(),
            Style::default().fg(Color::Gray),
        ),
    ]))
    .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    draw_fields(frame, app, chunks[1]);
    draw_footer(frame, app, chunks[2]);

    if app.editor.is_open() {
        draw_editor(frame, app);
    }
}

fn draw_fields(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let selected = app.selected_field();
    let mut lines: Vec<Line> = Vec::new();

    for field in app.fields() {
        let (label, style) = match field {
            Field::Base => (app.spec.base.clone(), Style::default().fg(Color::Yellow)),
            Field::Arg(i) => (app.spec.args[i].clone(), Style::default()),
            Field::AddArg => (
                "+ add argument".to_string(),
                Style::default().fg(Color::Gray),
            ),
            Field::Run => (
                "RUN".to_string(),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
        };
        let style = if field == selected {
            style.add_modifier(Modifier::REVERSED)
        } else {
            style
        };
        let marker = if field == selected { "> " } else { "  " };
        lines.push(Line::from(vec![Span::raw(marker), Span::styled(label, style)]));

        if field == Field::AddArg {
            // Placeholder for the URL appended at dispatch time.
            lines.push(Line::from(Span::styled(
                "  URL",
                Style::default().fg(Color::Cyan),
            )));
        }
    }

    let body = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Command"));
    frame.render_widget(body, area);
}

fn draw_footer(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let mut lines = vec![Line::from(Span::styled(
        "Enter edit/run  a add  r run  q quit",
        Style::default().fg(Color::Gray),
    ))];
    if let Some(status) = &app.status {
        lines.insert(
            0,
            Line::from(Span::styled(
                status.as_str(),
                Style::default().fg(Color::White),
            )),
        );
    }
    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_editor(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let w = area.width.saturating_sub(6).clamp(20, 70);
    let h = 7u16.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    let box_area = Rect {
        x,
        y,
        width: w,
        height: h,
    };

    frame.render_widget(Clear, box_area);

    let title = match app.editor.state() {
        EditorState::EditingCommand => "Edit command",
        EditorState::EditingArgument(_) => "Edit argument",
        EditorState::CreatingArgument => "New argument",
        EditorState::Closed => "",
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(box_area);
    frame.render_widget(block, box_area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(inner);

    frame.render_widget(
        Paragraph::new(app.input.buf.as_str())
            .block(Block::default().borders(Borders::ALL).title("Edit")),
        parts[0],
    );
    frame.set_cursor_position((parts[0].x + 1 + app.input.cursor_col() as u16, parts[0].y + 1));

    let hint = match app.editor.state() {
        EditorState::EditingArgument(_) => "Enter submit  Ctrl-r remove  Esc cancel",
        _ => "Enter submit  Esc cancel",
    };
    frame.render_widget(
        Paragraph::new(Span::styled(hint, Style::default().fg(Color::Gray))),
        parts[1],
    );
}
