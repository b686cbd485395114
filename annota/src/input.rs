//! # Input
//!
//! The normalized event stream fed to [`crate::pen_tools::ToolState`]. Positions are always in
//! viewport coordinates, and every event carries its own modifier state so tools never have to
//! ask a live input backend what's held.

use ultraviolet::Vec2;

bitflags::bitflags! {
    #[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b001;
        const CTRL = 0b010;
        const ALT = 0b100;
    }
}

#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Debug,
    Default,
    strum::AsRefStr,
    strum::EnumString,
    serde::Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    #[default]
    Primary,
    Middle,
    Secondary,
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct PointerEvent {
    pub pos: Vec2,
    pub button: PointerButton,
    pub modifiers: Modifiers,
    /// Normalized pen pressure, if the device reports one.
    pub pressure: Option<f32>,
}
impl PointerEvent {
    #[must_use]
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            button: PointerButton::Primary,
            modifiers: Modifiers::empty(),
            pressure: None,
        }
    }
    #[must_use]
    pub fn with_button(self, button: PointerButton) -> Self {
        Self { button, ..self }
    }
    #[must_use]
    pub fn with_modifiers(self, modifiers: Modifiers) -> Self {
        Self { modifiers, ..self }
    }
    #[must_use]
    pub fn with_pressure(self, pressure: f32) -> Self {
        Self {
            pressure: Some(pressure),
            ..self
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Key {
    Space,
    Escape,
    Enter,
    Backspace,
    Delete,
    Char(char),
}
impl std::str::FromStr for Key {
    type Err = UnknownKey;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => return Ok(Self::Char(c)),
            (None, _) => return Err(UnknownKey(String::new())),
            _ => (),
        }
        match s.to_ascii_lowercase().as_str() {
            "space" => Ok(Self::Space),
            "escape" | "esc" => Ok(Self::Escape),
            "enter" | "return" => Ok(Self::Enter),
            "backspace" => Ok(Self::Backspace),
            "delete" | "del" => Ok(Self::Delete),
            _ => Err(UnknownKey(s.to_owned())),
        }
    }
}
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown key {0:?}")]
pub struct UnknownKey(pub String);

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}
impl From<Key> for KeyEvent {
    fn from(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::empty(),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct WheelEvent {
    pub pos: Vec2,
    /// Notches scrolled. Positive is away from the user.
    pub delta: f32,
    pub modifiers: Modifiers,
}

/// A pressure sample from a tablet, which may arrive between pointer events.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct TabletEvent {
    pub pos: Vec2,
    pub pressure: f32,
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn parse_keys() {
        assert_eq!("a".parse::<Key>(), Ok(Key::Char('a')));
        assert_eq!("Space".parse::<Key>(), Ok(Key::Space));
        assert_eq!("del".parse::<Key>(), Ok(Key::Delete));
        assert!("hyper".parse::<Key>().is_err());
        assert!("".parse::<Key>().is_err());
    }
}
