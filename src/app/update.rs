use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::Backend;
use std::time::Duration;

use crate::api::{ApiClient, UserId};
use crate::app::directory::{Confirmation, PageDirection};
use crate::app::keymap::KeyAction;
use crate::app::nav::Route;
use crate::app::{AppState, MenuAction, ModalState, Screen, menu_entries};
use crate::ui;

/// Work that needs the network. Produced by key handling or by entering a
/// screen, executed by [`execute`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Login,
    Register,
    FetchUsers,
    LoadRecord,
    SubmitRecord,
    ResolveDelete {
        id: UserId,
        display_name: String,
        confirmation: Confirmation,
    },
}

pub async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut AppState, api: &ApiClient) -> Result<()> {
    tracing::info!(base_url = api.base_url(), "started");
    loop {
        terminal.draw(|f| ui::render(f, app))?;
        if app.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(50))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            let mut next = handle_key(app, key);
            while let Some(cmd) = next {
                mark_pending(app, &cmd);
                terminal.draw(|f| ui::render(f, app))?;
                next = execute(app, api, cmd).await;
            }
        }
    }
    tracing::info!("exiting");
    Ok(())
}

/// Flag the screen as busy so the frame drawn before awaiting shows it.
fn mark_pending(app: &mut AppState, cmd: &Command) {
    match (&mut app.screen, cmd) {
        (Screen::Login(login), Command::Login) => login.form.begin_submit(),
        (Screen::Register(reg), Command::Register) => reg.form.begin_submit(),
        (Screen::Record(rec), Command::SubmitRecord) => rec.form.begin_submit(),
        (Screen::Record(rec), Command::LoadRecord) => rec.loading = true,
        (Screen::Directory(dir), Command::FetchUsers | Command::ResolveDelete { .. }) => dir.loading = true,
        _ => {}
    }
}

/// Map one key press onto state changes, returning a command when the
/// press needs the network.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Option<Command> {
    if app.modal.is_some() {
        return handle_modal_key(app, key);
    }
    match app.screen {
        Screen::Login(_) | Screen::Register(_) | Screen::Record(_) => handle_form_key(app, key),
        Screen::Directory(_) => handle_directory_key(app, key),
        Screen::Menu { .. } => handle_menu_key(app, key),
    }
}

fn handle_modal_key(app: &mut AppState, key: KeyEvent) -> Option<Command> {
    match app.modal.as_mut()? {
        ModalState::Info { .. } => {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                app.modal = None;
            }
            None
        }
        ModalState::DeleteConfirm { id, display_name, selected } => {
            let confirmation = match key.code {
                KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Char('h') | KeyCode::Char('l') => {
                    *selected = 1 - *selected;
                    return None;
                }
                KeyCode::Enter if *selected == 1 => Confirmation::Confirm,
                KeyCode::Char('y') => Confirmation::Confirm,
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char('n') => Confirmation::Cancel,
                _ => return None,
            };
            let cmd = Command::ResolveDelete {
                id: *id,
                display_name: display_name.clone(),
                confirmation,
            };
            app.modal = None;
            Some(cmd)
        }
    }
}

fn handle_form_key(app: &mut AppState, key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if key.code == KeyCode::Char('c') {
            app.should_quit = true;
        }
        return None;
    }
    if key.code == KeyCode::Esc {
        return app.back();
    }
    let (form, submit) = match &mut app.screen {
        Screen::Login(login) => (&mut login.form, Command::Login),
        Screen::Register(reg) => (&mut reg.form, Command::Register),
        Screen::Record(rec) if !rec.loading => (&mut rec.form, Command::SubmitRecord),
        _ => return None,
    };
    if form.is_submitting() {
        return None;
    }
    match key.code {
        KeyCode::Tab | KeyCode::Down => form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
        KeyCode::Backspace => form.pop_char(),
        KeyCode::Char(c) => form.push_char(c),
        KeyCode::Enter => return Some(submit),
        _ => {}
    }
    None
}

fn handle_directory_key(app: &mut AppState, key: KeyEvent) -> Option<Command> {
    let action = app.keymap.resolve(&key)?;
    let Screen::Directory(dir) = &mut app.screen else {
        return None;
    };
    match action {
        KeyAction::Quit => app.should_quit = true,
        KeyAction::Back => return app.back(),
        KeyAction::MoveUp => dir.move_cursor(true),
        KeyAction::MoveDown => dir.move_cursor(false),
        KeyAction::PrevPage => dir.paginate(PageDirection::Prev),
        KeyAction::NextPage => dir.paginate(PageDirection::Next),
        KeyAction::Select => {
            if let Some(id) = dir.selected().map(|u| u.id) {
                dir.toggle_expand(id);
            }
        }
        KeyAction::NewRecord => return app.navigate(Route::CreateUser),
        KeyAction::EditRecord => {
            let id = dir.selected()?.id;
            tracing::debug!(%id, "edit requested");
            return app.navigate(Route::EditUser(id));
        }
        KeyAction::DeleteRecord => {
            let user = dir.selected()?;
            app.modal = Some(ModalState::DeleteConfirm {
                id: user.id,
                display_name: user.full_name(),
                selected: 0,
            });
        }
        KeyAction::Refresh => return Some(Command::FetchUsers),
        KeyAction::Ignore => {}
    }
    None
}

fn handle_menu_key(app: &mut AppState, key: KeyEvent) -> Option<Command> {
    let action = app.keymap.resolve(&key)?;
    let Screen::Menu { route, selected } = &mut app.screen else {
        return None;
    };
    let entries = menu_entries(*route);
    match action {
        KeyAction::Quit => app.should_quit = true,
        KeyAction::Back => return app.back(),
        KeyAction::MoveUp => *selected = selected.saturating_sub(1),
        KeyAction::MoveDown => {
            if *selected + 1 < entries.len() {
                *selected += 1;
            }
        }
        KeyAction::Select => match entries.get(*selected)?.1 {
            MenuAction::Go(to) => return app.navigate(to),
            MenuAction::Logout(to) => {
                tracing::info!("logged out");
                return app.reset_to(to);
            }
            MenuAction::Quit => app.should_quit = true,
        },
        _ => {}
    }
    None
}

/// Run one command against the backend and apply its outcome. May return a
/// follow-up command (e.g. the fetch triggered by landing on the directory).
pub async fn execute(app: &mut AppState, api: &ApiClient, cmd: Command) -> Option<Command> {
    match cmd {
        Command::Login => {
            let Screen::Login(login) = &mut app.screen else {
                return None;
            };
            let role = login.role;
            match login.submit(api).await {
                Ok(_token) => app.navigate(Route::dashboard_for(role)),
                Err(_) => {
                    app.trigger_shake();
                    None
                }
            }
        }
        Command::Register => {
            let Screen::Register(reg) = &mut app.screen else {
                return None;
            };
            match reg.submit(api).await {
                Ok(()) => {
                    let next = app.navigate(Route::UserDashboard);
                    app.info("User registered successfully");
                    next
                }
                Err(_) => {
                    app.trigger_shake();
                    None
                }
            }
        }
        Command::FetchUsers => {
            if let Screen::Directory(dir) = &mut app.screen {
                // failure is kept in dir.error and rendered inline
                let _ = dir.fetch_all(api).await;
            }
            None
        }
        Command::LoadRecord => {
            if let Screen::Record(rec) = &mut app.screen {
                let _ = rec.load(api).await;
            }
            None
        }
        Command::SubmitRecord => {
            let Screen::Record(rec) = &mut app.screen else {
                return None;
            };
            let message = rec.success_message();
            match rec.submit(api).await {
                Ok(()) => {
                    let next = app.return_to(Route::Directory);
                    app.info(message);
                    next
                }
                Err(_) => None,
            }
        }
        Command::ResolveDelete {
            id,
            display_name,
            confirmation,
        } => {
            let Screen::Directory(dir) = &mut app.screen else {
                return None;
            };
            let res = dir.remove(api, id, &display_name, confirmation).await;
            dir.loading = false;
            if let Ok(true) = res {
                app.info("User deleted successfully");
            }
            None
        }
    }
}
