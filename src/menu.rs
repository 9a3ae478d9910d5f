// Menu actions and their keyboard shortcuts.
//
// Shortcuts are declared as strings such as `mod+o`: modifier tokens
// (`shift`, `alt`, `ctrl`, `meta`, `mod`) and one terminal key joined by
// `+`. `mod` is the platform's primary modifier. Terminals on macOS keep
// Cmd chords for themselves, so there `mod` also matches Ctrl.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Other,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Other
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hotkey {
    shift: bool,
    alt: bool,
    ctrl: bool,
    meta: bool,
    primary: bool,
    key: KeyCode,
}

impl Hotkey {
    pub fn parse(spec: &str) -> Result<Self> {
        let mut hotkey = Hotkey {
            shift: false,
            alt: false,
            ctrl: false,
            meta: false,
            primary: false,
            key: KeyCode::Null,
        };
        let tokens: Vec<&str> = spec.split('+').map(str::trim).collect();
        let (key, modifiers) = match tokens.split_last() {
            Some((key, modifiers)) if !key.is_empty() => (*key, modifiers),
            _ => anyhow::bail!("Hotkey {spec:?} has no key"),
        };

        for token in modifiers {
            match token.to_ascii_lowercase().as_str() {
                "shift" => hotkey.shift = true,
                "alt" => hotkey.alt = true,
                "ctrl" => hotkey.ctrl = true,
                "meta" => hotkey.meta = true,
                "mod" => hotkey.primary = true,
                other => anyhow::bail!("Unknown modifier {other:?} in hotkey {spec:?}"),
            }
        }
        hotkey.key = parse_key(key)
            .ok_or_else(|| anyhow::anyhow!("Unknown key {key:?} in hotkey {spec:?}"))?;
        Ok(hotkey)
    }

    /// Modifier set with `mod` resolved for `platform`.
    pub fn modifiers(&self, platform: Platform) -> KeyModifiers {
        let mut m = KeyModifiers::NONE;
        if self.shift {
            m |= KeyModifiers::SHIFT;
        }
        if self.alt {
            m |= KeyModifiers::ALT;
        }
        if self.ctrl {
            m |= KeyModifiers::CONTROL;
        }
        if self.meta {
            m |= KeyModifiers::SUPER;
        }
        if self.primary {
            m |= match platform {
                Platform::MacOs => KeyModifiers::SUPER,
                Platform::Other => KeyModifiers::CONTROL,
            };
        }
        m
    }

    pub fn key(&self) -> KeyCode {
        self.key
    }

    pub fn matches(&self, event: &KeyEvent, platform: Platform) -> bool {
        let relevant = KeyModifiers::SHIFT
            | KeyModifiers::ALT
            | KeyModifiers::CONTROL
            | KeyModifiers::SUPER;
        let mut modifiers = event.modifiers & relevant;
        let code = match event.code {
            KeyCode::Char(c) => {
                // Some terminals report shift only through the case.
                if c.is_ascii_uppercase() {
                    modifiers |= KeyModifiers::SHIFT;
                }
                KeyCode::Char(c.to_ascii_lowercase())
            }
            other => other,
        };
        code == self.key
            && (modifiers == self.modifiers(platform)
                || self.ctrl_fallback(platform) && modifiers == self.modifiers(Platform::Other))
    }

    fn ctrl_fallback(&self, platform: Platform) -> bool {
        self.primary && platform == Platform::MacOs
    }

    /// Plain-text label such as `Ctrl+O`.
    pub fn label(&self, platform: Platform) -> String {
        let m = self.modifiers(platform);
        let mut parts: Vec<String> = Vec::new();
        if m.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".into());
        }
        if m.contains(KeyModifiers::ALT) {
            parts.push("Alt".into());
        }
        if m.contains(KeyModifiers::SHIFT) {
            parts.push("Shift".into());
        }
        if m.contains(KeyModifiers::SUPER) {
            parts.push(match platform {
                Platform::MacOs => "Cmd".into(),
                Platform::Other => "Super".into(),
            });
        }
        parts.push(key_label(self.key));
        parts.join("+")
    }

    /// Label for the menu: `Cmd+O/Ctrl+O` where the Ctrl chord also works.
    pub fn menu_label(&self, platform: Platform) -> String {
        if self.ctrl_fallback(platform) {
            format!("{}/{}", self.label(platform), self.label(Platform::Other))
        } else {
            self.label(platform)
        }
    }
}

impl FromStr for Hotkey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Hotkey::parse(s)
    }
}

fn parse_key(key: &str) -> Option<KeyCode> {
    let lower = key.to_ascii_lowercase();
    let mut chars = lower.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(KeyCode::Char(c));
    }
    let code = match lower.as_str() {
        "enter" | "return" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "space" => KeyCode::Char(' '),
        "backspace" => KeyCode::Backspace,
        "delete" | "del" => KeyCode::Delete,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        f if f.starts_with('f') => KeyCode::F(f[1..].parse().ok().filter(|n| (1..=12).contains(n))?),
        _ => return None,
    };
    Some(code)
}

fn key_label(key: KeyCode) -> String {
    match key {
        KeyCode::Char(' ') => "Space".into(),
        KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
        KeyCode::F(n) => format!("F{n}"),
        other => format!("{other:?}"),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    /// Open the drop target's file picker.
    SelectFile,
    /// Ask the host shell to quit.
    Quit,
}

#[derive(Clone, Debug)]
pub struct MenuItem {
    pub label: String,
    pub hotkey: Option<Hotkey>,
    pub action: MenuAction,
}

impl MenuItem {
    pub fn new(label: &str, hotkey: Option<&str>, action: MenuAction) -> Result<Self> {
        Ok(MenuItem {
            label: label.to_string(),
            hotkey: hotkey.map(Hotkey::parse).transpose()?,
            action,
        })
    }
}

#[derive(Clone, Debug)]
pub struct Menu {
    pub items: Vec<MenuItem>,
}

impl Menu {
    /// "Select file" (`mod+o`) and "Quit" (`mod+q`).
    pub fn standard() -> Result<Self> {
        Ok(Menu {
            items: vec![
                MenuItem::new("Select file", Some("mod+o"), MenuAction::SelectFile)?,
                MenuItem::new("Quit", Some("mod+q"), MenuAction::Quit)?,
            ],
        })
    }

    pub fn action_for_key(&self, event: &KeyEvent, platform: Platform) -> Option<MenuAction> {
        self.items
            .iter()
            .find(|item| {
                item.hotkey
                    .as_ref()
                    .is_some_and(|h| h.matches(event, platform))
            })
            .map(|item| item.action)
    }
}
