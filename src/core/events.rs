use crate::domain::model::FilterField;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub ctrl: bool,
    pub meta: bool,
}

impl KeyPress {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            meta: false,
        }
    }

    /// Parses `ctrl+enter`, `cmd+enter`, `meta+enter`, `escape`/`esc`.
    pub fn parse(spec: &str) -> Option<Self> {
        let mut press = KeyPress::plain(Key::Other);
        let mut key = None;
        for part in spec.split('+').map(|p| p.trim().to_ascii_lowercase()) {
            match part.as_str() {
                "ctrl" | "control" => press.ctrl = true,
                "cmd" | "meta" | "super" => press.meta = true,
                "enter" | "return" => key = Some(Key::Enter),
                "escape" | "esc" => key = Some(Key::Escape),
                _ => return None,
            }
        }
        press.key = key?;
        Some(press)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Submit,
    Reset,
}

impl Shortcut {
    /// 平台修飾鍵 + Enter 送出，Escape 重設
    pub fn from_key(press: KeyPress) -> Option<Self> {
        match press.key {
            Key::Enter if press.ctrl || press.meta => Some(Shortcut::Submit),
            Key::Escape => Some(Shortcut::Reset),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    FilterChanged { field: FilterField, value: String },
    Submit,
    Key(KeyPress),
    Quit,
}

impl UiEvent {
    /// One interactive command per line, e.g. `district 1010` or `ctrl+enter`.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        if let Some(field) = FilterField::parse(command) {
            return Some(UiEvent::FilterChanged {
                field,
                value: rest.to_string(),
            });
        }

        match command {
            "submit" | "search" => Some(UiEvent::Submit),
            "quit" | "exit" => Some(UiEvent::Quit),
            _ if rest.is_empty() => KeyPress::parse(command).map(UiEvent::Key),
            _ => None,
        }
    }
}
