use std::collections::HashMap;
use std::fmt;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Logical controller buttons. Screens reason about these rather than raw
/// key codes so a skin's help prompts and a user's key layout stay in sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    Up,
    Down,
    Left,
    Right,
    A,
    B,
    X,
    Y,
    L,
    R,
    Start,
    Select,
}

impl InputAction {
    pub fn is_directional(self) -> bool {
        matches!(self, Self::Up | Self::Down | Self::Left | Self::Right)
    }

    /// Glyph label used by help prompts for this button.
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
            Self::A => "a",
            Self::B => "b",
            Self::X => "x",
            Self::Y => "y",
            Self::L => "l",
            Self::R => "r",
            Self::Start => "start",
            Self::Select => "select",
        }
    }
}

impl fmt::Display for InputAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        key.code == self.code && key.modifiers == self.mods
    }

    pub fn display(&self) -> String {
        let mut parts = Vec::new();
        if self.mods.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".to_string());
        }
        if self.mods.contains(KeyModifiers::SHIFT) {
            parts.push("Shift".to_string());
        }
        if self.mods.contains(KeyModifiers::ALT) {
            parts.push("Alt".to_string());
        }
        let code = match self.code {
            KeyCode::Char(' ') => "Space".to_string(),
            KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Backspace => "Backspace".to_string(),
            KeyCode::Left => "Left".to_string(),
            KeyCode::Right => "Right".to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            KeyCode::PageUp => "PageUp".to_string(),
            KeyCode::PageDown => "PageDown".to_string(),
            KeyCode::F(n) => format!("F{}", n),
            _ => format!("{:?}", self.code),
        };
        parts.push(code);
        parts.join("+")
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Maps keyboard combos to logical buttons. This is the device
/// configuration handed to screens alongside every input event.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    map: HashMap<InputAction, Vec<KeyCombo>>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        use InputAction::*;
        let mut kb = Self::new();
        kb.add(Up, KeyCombo::plain(KeyCode::Up));
        kb.add(Up, KeyCombo::plain(KeyCode::Char('k')));
        kb.add(Down, KeyCombo::plain(KeyCode::Down));
        kb.add(Down, KeyCombo::plain(KeyCode::Char('j')));
        kb.add(Left, KeyCombo::plain(KeyCode::Left));
        kb.add(Left, KeyCombo::plain(KeyCode::Char('h')));
        kb.add(Right, KeyCombo::plain(KeyCode::Right));
        kb.add(Right, KeyCombo::plain(KeyCode::Char('l')));
        kb.add(A, KeyCombo::plain(KeyCode::Enter));
        kb.add(B, KeyCombo::plain(KeyCode::Esc));
        kb.add(B, KeyCombo::plain(KeyCode::Backspace));
        kb.add(X, KeyCombo::plain(KeyCode::Char('x')));
        kb.add(Y, KeyCombo::plain(KeyCode::Char('y')));
        kb.add(L, KeyCombo::plain(KeyCode::PageUp));
        kb.add(R, KeyCombo::plain(KeyCode::PageDown));
        kb.add(Start, KeyCombo::plain(KeyCode::Char(' ')));
        kb.add(Select, KeyCombo::plain(KeyCode::Tab));
        kb
    }
}

impl KeyBindings {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn add(&mut self, action: InputAction, combo: KeyCombo) {
        self.map.entry(action).or_default().push(combo);
    }

    pub fn matches(&self, action: InputAction, key: &KeyEvent) -> bool {
        self.map
            .get(&action)
            .is_some_and(|list| list.iter().any(|c| c.matches(key)))
    }

    pub fn action_for_key(&self, key: &KeyEvent) -> Option<InputAction> {
        self.map
            .iter()
            .find(|(_, list)| list.iter().any(|c| c.matches(key)))
            .map(|(act, _)| *act)
    }

    /// Return the display strings for all combos mapped to `action`.
    pub fn combos_for(&self, action: InputAction) -> Vec<String> {
        self.map
            .get(&action)
            .map(|list| list.iter().map(|c| c.display()).collect())
            .unwrap_or_default()
    }

    /// Translate a raw terminal event into an `InputEvent`.
    pub fn translate(&self, event: &Event) -> InputEvent {
        let (action, pressed) = match event {
            Event::Key(key) => (
                self.action_for_key(key),
                key.kind != KeyEventKind::Release,
            ),
            _ => (None, true),
        };
        InputEvent {
            raw: event.clone(),
            action,
            pressed,
        }
    }
}

/// One input event as seen by the orchestrator and screens.
#[derive(Debug, Clone)]
pub struct InputEvent {
    pub raw: Event,
    pub action: Option<InputAction>,
    /// False for key releases. Screensaver controls only react to presses.
    pub pressed: bool,
}

impl InputEvent {
    pub fn is(&self, action: InputAction) -> bool {
        self.action == Some(action)
    }

    pub fn is_directional(&self) -> bool {
        self.action.is_some_and(InputAction::is_directional)
    }

    pub fn key(&self) -> Option<&KeyEvent> {
        match &self.raw {
            Event::Key(key) => Some(key),
            _ => None,
        }
    }

    /// Build a key-press event for `action` using its first binding.
    pub fn press(bindings: &KeyBindings, action: InputAction) -> Self {
        let combo = bindings
            .map
            .get(&action)
            .and_then(|list| list.first().cloned())
            .unwrap_or_else(|| KeyCombo::plain(KeyCode::Null));
        Self {
            raw: Event::Key(KeyEvent::new(combo.code, combo.mods)),
            action: Some(action),
            pressed: true,
        }
    }
}
