use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Row, Table, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;
use marmita_core::{format_day, format_money, RecordState, Stage, View};

use crate::tui::app::{App, InputMode};

pub fn draw(f: &mut Frame, app: &App) {
    let size = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(3), // Input
            Constraint::Length(1), // Status / Help
        ])
        .split(size);

    let title = match &app.view {
        Some(view) => format!("MARMITA  |  {}  |  {}", view.display_name, format_day(view.day)),
        None => "MARMITA".to_string(),
    };
    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(header, main_chunks[0]);

    match &app.view {
        Some(view) if view.stage == Stage::Ready => {
            let content_chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
                .split(main_chunks[1]);

            let left = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(5), Constraint::Min(6)])
                .split(content_chunks[0]);

            draw_today(f, view, left[0]);
            draw_summary(f, app, view, left[1]);
            draw_month_days(f, app, content_chunks[1]);
        }
        _ => {
            let prompt = match app.input_mode {
                InputMode::Price => "How much does a meal box cost? Type the price and press Enter.",
                _ => "Type your name and press Enter to log in.",
            };
            let welcome = Paragraph::new(prompt)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
            f.render_widget(welcome, main_chunks[1]);
        }
    }

    draw_input(f, app, main_chunks[2]);

    let footer_text = match (&app.status, app.input_mode) {
        (Some(status), _) => status.clone(),
        (None, InputMode::Normal) => "y: Yes | n: No | ←/→: Month | p: Price | L: Logout | q: Quit".to_string(),
        (None, _) => "Enter: Confirm | Esc: Back | Ctrl-C: Quit".to_string(),
    };
    let footer = Paragraph::new(footer_text)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(footer, main_chunks[3]);
}

fn draw_today(f: &mut Frame, view: &View, area: Rect) {
    let (text, color) = match view.state {
        RecordState::Undecided => ("Did you buy a meal box today?  (y/n)", Color::Yellow),
        RecordState::ConfirmedYes => ("Meal box recorded for today.", Color::Green),
        RecordState::ConfirmedNo => ("No meal box today.", Color::Blue),
    };
    let today = Paragraph::new(Line::from(Span::styled(text, Style::default().fg(color).add_modifier(Modifier::BOLD))))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().title(" Today ").borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(today, area);
}

fn draw_summary(f: &mut Frame, app: &App, view: &View, area: Rect) {
    let price = view
        .unit_price
        .map(|p| format_money(p, &app.currency))
        .unwrap_or_else(|| "-".to_string());

    let lines = vec![
        Line::from(vec![
            Span::styled(" < ", Style::default().fg(Color::DarkGray)),
            Span::styled(view.month.label(), Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(" > ", Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Meal boxes: ", Style::default().fg(Color::Blue)),
            Span::styled(view.summary.count.to_string(), Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("Total:      ", Style::default().fg(Color::Blue)),
            Span::styled(
                format_money(view.summary.total, &app.currency),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Price now:  ", Style::default().fg(Color::Blue)),
            Span::raw(price),
        ]),
    ];

    let summary = Paragraph::new(lines)
        .block(Block::default().title(" Summary ").borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(summary, area);
}

fn draw_month_days(f: &mut Frame, app: &App, area: Rect) {
    let rows: Vec<Row> = app
        .current_month_history()
        .map(|month| {
            month
                .days
                .iter()
                .rev()
                .map(|day| {
                    let (icon, style) = if day.purchased {
                        ("✔", Style::default().fg(Color::Green))
                    } else {
                        ("✖", Style::default().fg(Color::Red))
                    };
                    let price = day
                        .price
                        .map(|p| format_money(p, &app.currency))
                        .unwrap_or_else(|| "-".to_string());
                    Row::new(vec![
                        Span::raw(format_day(day.date)),
                        Span::raw(day.date.format("%a").to_string()),
                        Span::styled(icon, style),
                        Span::raw(price),
                    ])
                })
                .collect()
        })
        .unwrap_or_default();

    let table = Table::new(
        rows,
        [
            Constraint::Length(11), // Date
            Constraint::Length(4),  // Weekday
            Constraint::Length(3),  // Answer
            Constraint::Min(10),    // Price
        ],
    )
    .header(Row::new(vec!["Date", "Day", "", "Price"]).style(Style::default().fg(Color::Yellow)))
    .block(Block::default().title(" Days ").borders(Borders::ALL).border_type(BorderType::Rounded));

    f.render_widget(table, area);
}

fn draw_input(f: &mut Frame, app: &App, area: Rect) {
    let title = match app.input_mode {
        InputMode::Login => " Name ",
        InputMode::Price => " Meal box price ",
        InputMode::Normal => " ",
    };
    let style = if app.input_mode == InputMode::Normal {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Yellow)
    };
    let input = Paragraph::new(app.input.as_str())
        .style(style)
        .block(Block::default().title(title).borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(input, area);

    if app.input_mode != InputMode::Normal {
        let before: String = app.input.chars().take(app.cursor_position).collect();
        f.set_cursor_position((area.x + before.width() as u16 + 1, area.y + 1));
    }
}
