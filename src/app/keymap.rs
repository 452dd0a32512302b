//! Keybinding configuration: parse `keybinds.conf`, provide defaults, and map keys to actions.
//!
//! Bindings apply to list and menu screens. Form screens take text input
//! directly and only react to fixed editing keys (Tab, Enter, Esc, Backspace).

use std::collections::HashMap;
use std::path::Path;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::settings::parse_line;

/// Semantic keyboard actions that can be bound to key combinations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Exit the application.
    Quit,
    /// Go back to the previous screen.
    Back,
    MoveUp,
    MoveDown,
    /// Previous page of the user directory.
    PrevPage,
    /// Next page of the user directory.
    NextPage,
    /// Activate the highlighted menu entry, or expand the highlighted record.
    Select,
    /// Open the create form.
    NewRecord,
    /// Open the edit form for the highlighted record.
    EditRecord,
    /// Ask to delete the highlighted record.
    DeleteRecord,
    /// Refetch the directory.
    Refresh,
    Ignore,
}

const ACTIONS: &[(&str, KeyAction)] = &[
    ("Quit", KeyAction::Quit),
    ("Back", KeyAction::Back),
    ("MoveUp", KeyAction::MoveUp),
    ("MoveDown", KeyAction::MoveDown),
    ("PrevPage", KeyAction::PrevPage),
    ("NextPage", KeyAction::NextPage),
    ("Select", KeyAction::Select),
    ("NewRecord", KeyAction::NewRecord),
    ("EditRecord", KeyAction::EditRecord),
    ("DeleteRecord", KeyAction::DeleteRecord),
    ("Refresh", KeyAction::Refresh),
    ("Ignore", KeyAction::Ignore),
];

#[derive(Clone, Debug)]
pub struct Keymap {
    bindings: HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Keymap {
    /// Arrow keys plus vim-style hjkl, Enter to select, Esc to go back.
    pub fn new_defaults() -> Self {
        use KeyCode::*;
        use KeyModifiers as M;
        let mut bindings = HashMap::new();
        bindings.insert((M::NONE, Char('q')), KeyAction::Quit);
        bindings.insert((M::CONTROL, Char('c')), KeyAction::Quit);
        bindings.insert((M::NONE, Esc), KeyAction::Back);
        bindings.insert((M::NONE, Up), KeyAction::MoveUp);
        bindings.insert((M::NONE, Down), KeyAction::MoveDown);
        bindings.insert((M::NONE, Char('k')), KeyAction::MoveUp);
        bindings.insert((M::NONE, Char('j')), KeyAction::MoveDown);
        bindings.insert((M::NONE, Left), KeyAction::PrevPage);
        bindings.insert((M::NONE, Right), KeyAction::NextPage);
        bindings.insert((M::NONE, Char('h')), KeyAction::PrevPage);
        bindings.insert((M::NONE, Char('l')), KeyAction::NextPage);
        bindings.insert((M::NONE, PageUp), KeyAction::PrevPage);
        bindings.insert((M::NONE, PageDown), KeyAction::NextPage);
        bindings.insert((M::NONE, Enter), KeyAction::Select);
        bindings.insert((M::NONE, Char('n')), KeyAction::NewRecord);
        bindings.insert((M::NONE, Char('e')), KeyAction::EditRecord);
        bindings.insert((M::NONE, Char('d')), KeyAction::DeleteRecord);
        bindings.insert((M::NONE, Delete), KeyAction::DeleteRecord);
        bindings.insert((M::NONE, Char('r')), KeyAction::Refresh);
        Self { bindings }
    }

    /// Load `path`, or write and return the defaults when it is missing.
    pub fn load_or_init(path: &Path) -> Self {
        if path.exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        let km = Self::default();
        if let Err(e) = km.write_file(path) {
            tracing::warn!(path = %path.display(), error = %e, "could not write keybinds");
        }
        km
    }

    /// Defaults overridden by `<Action> = <KeySpec>` lines.
    pub fn from_file(path: &Path) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    pub fn parse(contents: &str) -> Self {
        let mut map = Self::default();
        for (lhs, rhs) in contents.lines().filter_map(parse_line) {
            match (parse_action(lhs), parse_key(rhs)) {
                (Some(action), Some(key)) => {
                    map.bindings.insert(key, action);
                }
                _ => tracing::warn!(line = %format!("{lhs} = {rhs}"), "ignoring keybinding"),
            }
        }
        map
    }

    pub fn write_file(&self, path: &Path) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# userdesk keybindings\n");
        buf.push_str("# Format: <Action> = <KeySpec>\n");
        buf.push_str("# KeySpec examples: q, Ctrl+c, Enter, Esc, Up, Down, Left, Right, PageUp, PageDown, Delete\n\n");
        let mut entries: Vec<(String, &'static str)> = self
            .bindings
            .iter()
            .map(|((m, c), a)| (Self::format_key(*m, *c), format_action(*a)))
            .collect();
        entries.sort_by(|a, b| a.1.cmp(b.1).then_with(|| a.0.cmp(&b.0)));
        for (key, action) in entries {
            let _ = writeln!(&mut buf, "{action} = {key}");
        }
        std::fs::write(path, buf)
    }

    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&(key.modifiers, key.code)).copied()
    }

    /// First key bound to `action`, for on-screen hints.
    pub fn key_for(&self, action: KeyAction) -> Option<String> {
        let mut keys: Vec<String> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|((m, c), _)| Self::format_key(*m, *c))
            .collect();
        keys.sort_by_key(|k| (k.len(), k.clone()));
        keys.into_iter().next()
    }

    pub fn format_key(mods: KeyModifiers, code: KeyCode) -> String {
        use KeyCode::*;
        let base = match code {
            Enter => "Enter".to_string(),
            Delete => "Delete".to_string(),
            Esc => "Esc".to_string(),
            Tab => "Tab".to_string(),
            Up => "Up".to_string(),
            Down => "Down".to_string(),
            Left => "Left".to_string(),
            Right => "Right".to_string(),
            PageUp => "PageUp".to_string(),
            PageDown => "PageDown".to_string(),
            Char(c) => c.to_string(),
            _ => format!("{:?}", code),
        };
        if mods.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{}", base)
        } else {
            base
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    use KeyCode::*;
    let (mods, rest) = match spec.trim().strip_prefix("Ctrl+") {
        Some(after) => (KeyModifiers::CONTROL, after),
        None => (KeyModifiers::NONE, spec.trim()),
    };
    let code = match rest {
        "Enter" => Enter,
        "Delete" => Delete,
        "Esc" | "Escape" => Esc,
        "Tab" => Tab,
        "Up" => Up,
        "Down" => Down,
        "Left" => Left,
        "Right" => Right,
        "PageUp" => PageUp,
        "PageDown" => PageDown,
        _ => {
            let mut chars = rest.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Char(c),
                _ => return None,
            }
        }
    };
    Some((mods, code))
}

fn parse_action(s: &str) -> Option<KeyAction> {
    ACTIONS.iter().find(|(name, _)| *name == s.trim()).map(|(_, a)| *a)
}

pub fn format_action(a: KeyAction) -> &'static str {
    ACTIONS
        .iter()
        .find(|(_, action)| *action == a)
        .map(|(name, _)| *name)
        .unwrap_or("Ignore")
}
