//! Keyboard input.
//!
//! The shell sends one DM42 key code per press and `0` on release. Digits,
//! `.`, `E` and `CHS` edit a command line; function keys enter it first and
//! then run their command.

use log::{trace, warn};

use crate::runtime::{
    error::Result,
    vm::{Runtime, commands::lookup},
};

/// DM42 key codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Key {
    Sigma = 1,
    Inv = 2,
    Sqrt = 3,
    Log = 4,
    Ln = 5,
    Xeq = 6,
    Sto = 7,
    Rcl = 8,
    Rdn = 9,
    Sin = 10,
    Cos = 11,
    Tan = 12,
    Enter = 13,
    Swap = 14,
    Chs = 15,
    E = 16,
    Bsp = 17,
    Up = 18,
    Seven = 19,
    Eight = 20,
    Nine = 21,
    Div = 22,
    Down = 23,
    Four = 24,
    Five = 25,
    Six = 26,
    Mul = 27,
    Shift = 28,
    One = 29,
    Two = 30,
    Three = 31,
    Sub = 32,
    Exit = 33,
    Zero = 34,
    Dot = 35,
    Run = 36,
    Add = 37,
}

impl Key {
    pub const RELEASE: u8 = 0;

    pub fn from_code(code: u8) -> Option<Key> {
        use Key::*;
        const KEYS: [Key; 37] = [
            Sigma, Inv, Sqrt, Log, Ln, Xeq, Sto, Rcl, Rdn, Sin, Cos, Tan, Enter, Swap, Chs, E, Bsp,
            Up, Seven, Eight, Nine, Div, Down, Four, Five, Six, Mul, Shift, One, Two, Three, Sub,
            Exit, Zero, Dot, Run, Add,
        ];
        KEYS.get(usize::from(code).checked_sub(1)?).copied()
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Character typed into the command line, if any.
    fn text(self) -> Option<char> {
        Some(match self {
            Key::Zero => '0',
            Key::One => '1',
            Key::Two => '2',
            Key::Three => '3',
            Key::Four => '4',
            Key::Five => '5',
            Key::Six => '6',
            Key::Seven => '7',
            Key::Eight => '8',
            Key::Nine => '9',
            Key::Dot => '.',
            Key::E => 'E',
            _ => return None,
        })
    }

    /// Command bound to the key in the given shift state.
    fn command(self, shifted: bool) -> Option<&'static str> {
        Some(match (self, shifted) {
            (Key::Add, false) => "+",
            (Key::Sub, false) => "-",
            (Key::Mul, false) => "*",
            (Key::Div, false) => "/",
            (Key::Inv, false) => "INV",
            (Key::Inv, true) => "^",
            (Key::Sqrt, false) => "SQRT",
            (Key::Swap, false) => "SWAP",
            (Key::Rdn, false) => "ROT",
            (Key::Chs, _) => "NEG",
            (Key::Bsp, false) => "DROP",
            (Key::Bsp, true) => "CLEAR",
            (Key::Enter, false) => "DUP",
            (Key::Run, _) => "EVAL",
            _ => return None,
        })
    }
}

/// Shift state, command-line editor and repeat detection.
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    shift: bool,
    editor: Option<String>,
    /// Key pressed and not yet released.
    held: Option<u8>,
}

impl KeyState {
    pub fn shift(&self) -> bool {
        self.shift
    }

    /// Command line being typed, if any.
    pub fn editor(&self) -> Option<&str> {
        self.editor.as_deref()
    }

    fn type_char(&mut self, ch: char) {
        let editor = self.editor.get_or_insert_with(String::new);
        if ch == 'E' && editor.chars().last().is_none_or(|c| !c.is_ascii_digit() && c != '.') {
            editor.push('1');
        }
        editor.push(ch);
    }

    /// Toggles the sign of the number being typed, or of its exponent once
    /// one has been started.
    fn change_sign(&mut self) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        let word_start = editor.rfind(' ').map_or(0, |at| at + 1);
        let sign_at = match editor[word_start..].rfind('E') {
            Some(e) => word_start + e + 1,
            None => word_start,
        };
        if editor[sign_at..].starts_with('-') {
            editor.remove(sign_at);
        } else {
            editor.insert(sign_at, '-');
        }
    }

    fn backspace(&mut self) {
        if let Some(editor) = self.editor.as_mut() {
            editor.pop();
            if editor.is_empty() {
                self.editor = None;
            }
        }
    }
}

impl Runtime {
    /// Handles one key event.
    ///
    /// A repeated code without an intervening release is one logical press
    /// when repeat suppression is on. The outcome of the last command is kept
    /// for the screen's error line.
    pub fn push_key(&mut self, code: u8) -> Result<()> {
        if code == Key::RELEASE {
            self.keys.held = None;
            return Ok(());
        }
        if self.config.key_repeat_suppression && self.keys.held == Some(code) {
            trace!("key {}: repeat ignored", code);
            return Ok(());
        }
        self.keys.held = Some(code);

        let Some(key) = Key::from_code(code) else {
            warn!("ignored key code {}", code);
            return Ok(());
        };
        self.press(key)
    }

    pub fn key_state(&self) -> &KeyState {
        &self.keys
    }

    fn press(&mut self, key: Key) -> Result<()> {
        if key == Key::Shift {
            self.keys.shift = !self.keys.shift;
            return Ok(());
        }
        let shifted = std::mem::take(&mut self.keys.shift);
        let editing = self.keys.editor.is_some();

        if let Some(ch) = key.text() {
            self.keys.type_char(ch);
            return Ok(());
        }
        match key {
            Key::Exit => {
                // Key presses never overlap a running program; halting one
                // goes through the interrupt handle.
                if editing {
                    self.keys.editor = None;
                } else {
                    self.last_error = None;
                }
                return Ok(());
            }
            Key::Chs if editing => {
                self.keys.change_sign();
                return Ok(());
            }
            Key::Bsp if editing && !shifted => {
                self.keys.backspace();
                return Ok(());
            }
            Key::Enter if editing => return self.enter_editor(),
            _ => {}
        }

        let Some(name) = key.command(shifted) else {
            trace!("key {:?} has no binding", key);
            return Ok(());
        };
        self.enter_editor()?;
        match lookup(name) {
            Some(index) => {
                let result = self.run_command(index);
                self.last_error = result.as_ref().err().cloned();
                result
            }
            None => {
                warn!("key {:?} is bound to unknown command {}", key, name);
                Ok(())
            }
        }
    }

    /// Executes the command line being edited. On failure the text stays in
    /// the editor.
    fn enter_editor(&mut self) -> Result<()> {
        let Some(text) = self.keys.editor.clone() else {
            return Ok(());
        };
        self.execute(&text)?;
        self.keys.editor = None;
        Ok(())
    }
}
