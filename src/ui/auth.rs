//! Menu, login and registration screens.
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::app::auth::{LoginForm, RegisterForm};
use crate::app::nav::Route;
use crate::app::{AppState, menu_entries};
use crate::ui::components::{centered_rect, render_form};

fn menu_greeting(route: Route) -> &'static str {
    match route {
        Route::Welcome => "Welcome! Sign in or pick the users area.",
        Route::UserPortal => "Sign in or create an account.",
        Route::AdminDashboard => "Control panel",
        Route::UserDashboard => "Welcome to your dashboard.",
        _ => "",
    }
}

pub fn render_menu(f: &mut Frame, area: Rect, app: &AppState, route: Route, selected: usize) {
    let entries = menu_entries(route);
    let rect = centered_rect(48, entries.len() as u16 + 5, area);
    let mut lines = vec![
        Line::styled(menu_greeting(route), Style::default().fg(app.theme.title)),
        Line::raw(""),
    ];
    for (i, (label, _)) in entries.iter().enumerate() {
        let line = if i == selected {
            Line::styled(
                format!("▶ {label}"),
                Style::default().fg(app.theme.highlight_fg).add_modifier(Modifier::BOLD),
            )
        } else {
            Line::styled(format!("  {label}"), Style::default().fg(app.theme.text))
        };
        lines.push(line);
    }
    let p = Paragraph::new(lines).block(
        Block::default()
            .title(route.title())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

pub fn render_login(f: &mut Frame, area: Rect, app: &AppState, login: &LoginForm, shake: i16) {
    let title = format!("{} sign in", login.role.label());
    render_form(f, area, &app.theme, &title, &login.form, shake);
}

pub fn render_register(f: &mut Frame, area: Rect, app: &AppState, reg: &RegisterForm, shake: i16) {
    render_form(f, area, &app.theme, "Create account", &reg.form, shake);
}
