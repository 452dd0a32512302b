//! Rendering. Pure functions of `AppState`; no I/O besides the frame.
pub mod auth;
pub mod components;
pub mod users;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, ModalState, Screen};

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)])
        .split(f.area());

    let route = app.route();
    let header = Paragraph::new(format!("{}  {}", route.title(), route.path()))
        .style(
            Style::default()
                .fg(app.theme.header_fg)
                .bg(app.theme.header_bg)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .title("userdesk")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(header, root[0]);

    let shake = app.shake_offset();
    match &app.screen {
        Screen::Menu { route, selected } => auth::render_menu(f, root[1], app, *route, *selected),
        Screen::Login(login) => auth::render_login(f, root[1], app, login, shake),
        Screen::Register(reg) => auth::render_register(f, root[1], app, reg, shake),
        Screen::Directory(dir) => users::render_directory(f, root[1], app, dir),
        Screen::Record(rec) => users::render_record_form(f, root[1], app, rec),
    }

    components::render_status_bar(f, root[2], app);

    if let Some(modal) = &app.modal {
        match modal {
            ModalState::DeleteConfirm { .. } => components::render_confirm_modal(f, f.area(), app, modal),
            ModalState::Info { .. } => components::render_info_modal(f, f.area(), app, modal),
        }
    }
}
