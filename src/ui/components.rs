//! Shared UI components (status bar, forms, modal helpers).
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::form::{FormState, RequestStatus};
use crate::app::keymap::KeyAction;
use crate::app::{AppState, ModalState, Screen, Theme};

/// Render the bottom status bar with key hints for the current screen.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let km = &app.keymap;
    let key = |a: KeyAction| km.key_for(a).unwrap_or_else(|| "-".to_string());
    let hints = match &app.screen {
        Screen::Menu { .. } => format!("{}: select  {}: back  {}: quit", key(KeyAction::Select), key(KeyAction::Back), key(KeyAction::Quit)),
        Screen::Login(_) | Screen::Register(_) | Screen::Record(_) => {
            "Tab/Shift-Tab: field  Enter: submit  Esc: back  Ctrl+c: quit".to_string()
        }
        Screen::Directory(_) => format!(
            "{}: details  {}/{}: page  {}: new  {}: edit  {}: delete  {}: refresh  {}: back",
            key(KeyAction::Select),
            key(KeyAction::PrevPage),
            key(KeyAction::NextPage),
            key(KeyAction::NewRecord),
            key(KeyAction::EditRecord),
            key(KeyAction::DeleteRecord),
            key(KeyAction::Refresh),
            key(KeyAction::Back),
        ),
    };
    let p = Paragraph::new(format!("{hints}   [{}]", app.base_url))
        .style(Style::default().fg(app.theme.status_fg).bg(app.theme.status_bg));
    f.render_widget(p, area);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Inline line for a request lifecycle; empty when idle.
pub fn status_line(theme: &Theme, status: &RequestStatus) -> Line<'static> {
    match status {
        RequestStatus::Idle | RequestStatus::Succeeded => Line::raw(""),
        RequestStatus::Submitting => Line::from(Span::styled("Sending…", Style::default().fg(theme.muted))),
        RequestStatus::Failed(msg) => Line::from(Span::styled(format!("! {msg}"), Style::default().fg(theme.error))),
    }
}

/// Draw a form centered in `area`, shifted `shake` columns sideways.
pub fn render_form(f: &mut Frame, area: Rect, theme: &Theme, title: &str, form: &FormState, shake: i16) {
    let height = form.fields().len() as u16 + 5;
    let mut rect = centered_rect(56, height, area);
    rect.x = rect.x.saturating_add_signed(shake).min(area.right().saturating_sub(rect.width));

    let mut lines: Vec<Line> = Vec::with_capacity(form.fields().len() + 2);
    for (i, field) in form.fields().iter().enumerate() {
        let value = form.get(*field);
        let shown = if field.is_secret() { "*".repeat(value.chars().count()) } else { value.to_string() };
        let focused = i == form.focus_index();
        let marker = if focused { "▶ " } else { "  " };
        let style = if focused {
            Style::default().fg(theme.highlight_fg).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{marker}{:<24}", field.label()), style),
            Span::styled(shown, Style::default().fg(theme.text)),
        ]));
    }
    lines.push(Line::raw(""));
    lines.push(status_line(theme, &form.status));

    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(title.to_string())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

/// Two-option delete prompt.
pub fn render_confirm_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    if let ModalState::DeleteConfirm { display_name, selected, .. } = state {
        let rect = centered_rect(56, 8, area);
        let cancel = if *selected == 0 { "[Cancel]" } else { " Cancel " };
        let delete = if *selected == 1 { "[Delete]" } else { " Delete " };
        let body = format!(
            "Delete {display_name}? This cannot be undone.\n\n   {cancel}    {delete}\n\nLeft/Right: choose  Enter: confirm  Esc: cancel"
        );
        let p = Paragraph::new(body).wrap(Wrap { trim: false }).block(
            Block::default()
                .title("Confirm delete")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.error)),
        );
        f.render_widget(Clear, rect);
        f.render_widget(p, rect);
    }
}

/// Render a generic informational modal dialog.
pub fn render_info_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    if let ModalState::Info { message } = state {
        let max_w = area.width.saturating_sub(6).max(30);
        let width = 44u16.min(max_w);
        let approx_lines = (message.len() as u16 / width.saturating_sub(4).max(10)).max(1);
        let height = (approx_lines + 4).min(area.height.saturating_sub(4).max(5));
        let rect = centered_rect(width, height, area);
        let p = Paragraph::new(format!("{message}\n\nEnter: OK"))
            .style(Style::default().fg(app.theme.success))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title("Info")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(app.theme.border)),
            );
        f.render_widget(Clear, rect);
        f.render_widget(p, rect);
    }
}
