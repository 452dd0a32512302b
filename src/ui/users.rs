use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::api::UserRecord;
use crate::app::AppState;
use crate::app::directory::UserDirectory;
use crate::app::record_form::{FormMode, RecordForm};
use crate::ui::components::render_form;

fn or_missing(s: &str) -> &str {
    if s.is_empty() { "Not available" } else { s }
}

pub fn render_directory(f: &mut Frame, area: Rect, app: &AppState, dir: &UserDirectory) {
    let detail_height = if dir.expanded().is_some() { 6 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(detail_height),
            Constraint::Length(1),
        ])
        .split(area);

    let summary = format!(
        "Registered users: {}   page {}/{}{}",
        dir.users().len(),
        dir.page(),
        dir.total_pages().max(1),
        if dir.loading { "   loading…" } else { "" }
    );
    f.render_widget(Paragraph::new(summary).style(Style::default().fg(app.theme.muted)), chunks[0]);

    let block = Block::default()
        .title("Users")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));
    if dir.visible().is_empty() {
        f.render_widget(Paragraph::new("No users").block(block), chunks[1]);
    } else {
        let rows = dir.visible().iter().enumerate().map(|(i, u)| {
            let marker = if dir.is_expanded(u.id) { "▼" } else { "▶" };
            let style = if i == dir.cursor() {
                Style::default()
                    .fg(app.theme.highlight_fg)
                    .bg(app.theme.highlight_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(app.theme.text)
            };
            Row::new(vec![
                Cell::from(marker),
                Cell::from(u.id.to_string()),
                Cell::from(u.full_name()),
                Cell::from(u.email.clone()),
            ])
            .style(style)
        });
        let widths = [
            Constraint::Length(2),
            Constraint::Length(6),
            Constraint::Percentage(50),
            Constraint::Percentage(50),
        ];
        let header = Row::new(vec!["", "ID", "NAME", "EMAIL"])
            .style(Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD));
        let table = Table::new(rows, widths).header(header).block(block).column_spacing(1);
        f.render_widget(table, chunks[1]);
    }

    if let Some(user) = dir.expanded().and_then(|id| dir.users().iter().find(|u| u.id == id)) {
        render_user_details(f, chunks[2], app, user);
    }

    if let Some(err) = &dir.error {
        f.render_widget(
            Paragraph::new(format!("! {err}")).style(Style::default().fg(app.theme.error)),
            chunks[3],
        );
    }
}

fn render_user_details(f: &mut Frame, area: Rect, app: &AppState, user: &UserRecord) {
    let mut lines = vec![
        Line::raw(format!("Email: {}", or_missing(&user.email))),
        Line::raw(format!("Phone: {}", or_missing(&user.phone))),
        Line::raw(format!("Birth date: {}", or_missing(&user.birth_date))),
    ];
    if let Some(role) = &user.role {
        lines.push(Line::raw(format!("Role: {role}")));
    }
    let p = Paragraph::new(lines).style(Style::default().fg(app.theme.text)).block(
        Block::default()
            .title(user.full_name())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(p, area);
}

pub fn render_record_form(f: &mut Frame, area: Rect, app: &AppState, rec: &RecordForm) {
    let title = match rec.mode {
        FormMode::Create => "New user".to_string(),
        FormMode::Edit(id) if rec.loading => format!("Edit user {id} (loading…)"),
        FormMode::Edit(id) => format!("Edit user {id}  (empty password is sent as-is)"),
    };
    render_form(f, area, &app.theme, &title, &rec.form, 0);
}
