//! Application state types and entry glue.
//!
//! `AppState` owns the navigator and the state of the one screen currently
//! shown. Navigating replaces that state, so nothing entered on a screen
//! survives leaving it.
//!
pub mod auth;
pub mod directory;
pub mod form;
pub mod keymap;
pub mod nav;
pub mod record_form;
pub mod settings;
pub mod update;

use ratatui::style::Color;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::api::{Role, UserId};
use auth::{LoginForm, RegisterForm};
use directory::UserDirectory;
use keymap::Keymap;
use nav::{Navigator, Route};
use record_form::RecordForm;
use update::Command;

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub error: Color,
    pub success: Color,
}

const THEME_KEYS: &[&str] = &[
    "text",
    "muted",
    "title",
    "border",
    "header_bg",
    "header_fg",
    "status_bg",
    "status_fg",
    "highlight_fg",
    "highlight_bg",
    "error",
    "success",
];

impl Theme {
    /// Catppuccin Mocha.
    pub fn mocha() -> Self {
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),
            muted: Color::Rgb(0x7f, 0x84, 0x9c),
            title: Color::Rgb(0xcb, 0xa6, 0xf7),
            border: Color::Rgb(0x58, 0x5b, 0x70),
            header_bg: Color::Rgb(0x31, 0x32, 0x44),
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf),
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a),
            error: Color::Rgb(0xf3, 0x8b, 0xa8),
            success: Color::Rgb(0xa6, 0xe3, 0xa1),
        }
    }

    fn slot(&mut self, key: &str) -> Option<&mut Color> {
        Some(match key {
            "text" => &mut self.text,
            "muted" => &mut self.muted,
            "title" => &mut self.title,
            "border" => &mut self.border,
            "header_bg" => &mut self.header_bg,
            "header_fg" => &mut self.header_fg,
            "status_bg" => &mut self.status_bg,
            "status_fg" => &mut self.status_fg,
            "highlight_fg" => &mut self.highlight_fg,
            "highlight_bg" => &mut self.highlight_bg,
            "error" => &mut self.error,
            "success" => &mut self.success,
            _ => return None,
        })
    }

    /// Unknown keys and unparsable colors keep the `mocha` value.
    pub fn parse(contents: &str) -> Self {
        let mut theme = Self::mocha();
        for (key, val) in contents.lines().filter_map(settings::parse_line) {
            if let (Some(color), Some(slot)) = (parse_color(val), theme.slot(key)) {
                *slot = color;
            }
        }
        theme
    }

    pub fn from_file(path: &Path) -> Option<Self> {
        std::fs::read_to_string(path).ok().map(|c| Self::parse(&c))
    }

    pub fn write_file(&self, path: &Path) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut copy = *self;
        let mut buf = String::from("# userdesk theme\n# Colors: #RRGGBB or 'reset'\n\n");
        for key in THEME_KEYS {
            if let Some(color) = copy.slot(key) {
                let _ = writeln!(&mut buf, "{key} = {}", color_to_str(*color));
            }
        }
        std::fs::write(path, buf)
    }

    pub fn load_or_init(path: &Path) -> Self {
        if path.exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        let theme = Self::mocha();
        if let Err(e) = theme.write_file(path) {
            tracing::warn!(path = %path.display(), error = %e, "could not write theme");
        }
        theme
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::mocha()
    }
}

fn parse_color(s: &str) -> Option<Color> {
    let lower = s.trim().to_ascii_lowercase();
    if lower == "reset" {
        return Some(Color::Reset);
    }
    let hex = lower.strip_prefix('#').unwrap_or(&lower);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

fn color_to_str(c: Color) -> String {
    match c {
        Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
        _ => "reset".to_string(),
    }
}

const SHAKE_STEP: Duration = Duration::from_millis(50);
const SHAKE_OFFSETS: [i16; 5] = [2, -2, 2, -2, 0];

/// Short horizontal shake of a form after a failed login or registration.
#[derive(Clone, Copy, Debug)]
pub struct Shake {
    started_at: Instant,
}

impl Shake {
    pub fn start() -> Self {
        Self { started_at: Instant::now() }
    }

    /// Column offset `elapsed` after the start, `None` once finished.
    pub fn offset_after(elapsed: Duration) -> Option<i16> {
        let step = (elapsed.as_millis() / SHAKE_STEP.as_millis()) as usize;
        SHAKE_OFFSETS.get(step).copied()
    }

    pub fn offset(&self) -> Option<i16> {
        Self::offset_after(self.started_at.elapsed())
    }
}

/// What a menu entry does when selected.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MenuAction {
    Go(Route),
    /// Drop history and land on the given screen.
    Logout(Route),
    Quit,
}

pub fn menu_entries(route: Route) -> &'static [(&'static str, MenuAction)] {
    match route {
        Route::Welcome => &[
            ("Administrator sign in", MenuAction::Go(Route::AdminLogin)),
            ("Users", MenuAction::Go(Route::UserPortal)),
            ("Quit", MenuAction::Quit),
        ],
        Route::UserPortal => &[
            ("Sign in", MenuAction::Go(Route::UserLogin)),
            ("Register", MenuAction::Go(Route::Register)),
        ],
        Route::AdminDashboard => &[
            ("Manage users", MenuAction::Go(Route::Directory)),
            ("Log out", MenuAction::Logout(Route::Welcome)),
        ],
        Route::UserDashboard => &[("Log out", MenuAction::Logout(Route::UserLogin))],
        _ => &[],
    }
}

/// State of the screen on display. Replaced on every navigation.
#[derive(Clone, Debug)]
pub enum Screen {
    Menu { route: Route, selected: usize },
    Login(LoginForm),
    Register(RegisterForm),
    Directory(UserDirectory),
    Record(RecordForm),
}

impl Screen {
    pub fn for_route(route: Route) -> Self {
        match route {
            Route::AdminLogin => Screen::Login(LoginForm::new(Role::Admin)),
            Route::UserLogin => Screen::Login(LoginForm::new(Role::User)),
            Route::Register => Screen::Register(RegisterForm::new()),
            Route::Directory => Screen::Directory(UserDirectory::new()),
            Route::CreateUser => Screen::Record(RecordForm::create()),
            Route::EditUser(id) => Screen::Record(RecordForm::edit(id)),
            Route::Welcome | Route::UserPortal | Route::AdminDashboard | Route::UserDashboard => {
                Screen::Menu { route, selected: 0 }
            }
        }
    }
}

/// Modal dialogs drawn over the current screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalState {
    /// Two options: 0 = cancel (default), 1 = delete.
    DeleteConfirm {
        id: UserId,
        display_name: String,
        selected: usize,
    },
    Info {
        message: String,
    },
}

pub struct AppState {
    pub nav: Navigator,
    pub screen: Screen,
    pub modal: Option<ModalState>,
    pub theme: Theme,
    pub keymap: Keymap,
    pub shake: Option<Shake>,
    pub base_url: String,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(theme: Theme, keymap: Keymap, base_url: impl Into<String>) -> Self {
        Self {
            nav: Navigator::new(Route::Welcome),
            screen: Screen::for_route(Route::Welcome),
            modal: None,
            theme,
            keymap,
            shake: None,
            base_url: base_url.into(),
            should_quit: false,
        }
    }

    pub fn route(&self) -> Route {
        self.nav.current()
    }

    /// Push `route` and build a fresh screen for it.
    pub fn navigate(&mut self, route: Route) -> Option<Command> {
        self.nav.push(route);
        self.enter(route)
    }

    pub fn back(&mut self) -> Option<Command> {
        let route = self.nav.back()?;
        self.enter(route)
    }

    pub fn reset_to(&mut self, route: Route) -> Option<Command> {
        self.nav.reset(route);
        self.enter(route)
    }

    /// Pop back to `route` if it is in the history, else push it.
    pub fn return_to(&mut self, route: Route) -> Option<Command> {
        while self.nav.current() != route {
            if self.nav.back().is_none() {
                return self.navigate(route);
            }
        }
        self.enter(route)
    }

    /// Screens that load data on entry hand back the command to run.
    fn enter(&mut self, route: Route) -> Option<Command> {
        self.screen = Screen::for_route(route);
        self.shake = None;
        match route {
            Route::Directory => Some(Command::FetchUsers),
            Route::EditUser(_) => Some(Command::LoadRecord),
            _ => None,
        }
    }

    pub fn trigger_shake(&mut self) {
        self.shake = Some(Shake::start());
    }

    /// Current shake offset; clears a finished shake.
    pub fn shake_offset(&mut self) -> i16 {
        match self.shake.and_then(|s| s.offset()) {
            Some(off) => off,
            None => {
                self.shake = None;
                0
            }
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.modal = Some(ModalState::Info { message: message.into() });
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
