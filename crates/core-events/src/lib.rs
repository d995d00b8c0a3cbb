//! Core event types and channel helpers for vix.
//!
//! Key events form a closed vocabulary: every key the editor understands is a `KeyCode`
//! variant, so the per-mode translation tables can match exhaustively.

use std::fmt;
use thiserror::Error;
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;

// The host loop reads from a bounded mpsc channel of this size. The input task uses
// `send().await`, which parks until space is available rather than dropping keys.
pub const EVENT_CHANNEL_CAP: usize = 1024;

/// Top-level event enum consumed by the central event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Input(InputEvent),
    Shutdown,
}

/// Normalized input events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    /// Terminal resize (columns, rows).
    Resize(u16, u16),
}

/// Trait implemented by any async event producer. Implementors hold their configuration
/// and spawn one background task that pushes `Event`s into the shared channel, stopping
/// once `tx.send(..).await` fails.
pub trait AsyncEventSource: Send + 'static {
    /// Stable identifier used for logging.
    fn name(&self) -> &'static str;
    fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()>;
}

/// Registry of event sources spawned together at startup.
#[derive(Default)]
pub struct EventSourceRegistry {
    sources: Vec<Box<dyn AsyncEventSource>>,
}

impl EventSourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<S: AsyncEventSource>(&mut self, src: S) {
        self.sources.push(Box::new(src));
    }

    /// Spawn all registered sources, each with its own clone of `tx`. The registry is
    /// drained so a second call spawns nothing. During shutdown the caller drops its
    /// last `Sender` before awaiting the handles so sources observe the closed channel.
    pub fn spawn_all(&mut self, tx: &Sender<Event>) -> Vec<JoinHandle<()>> {
        let mut out = Vec::with_capacity(self.sources.len());
        for src in self.sources.drain(..) {
            let name = src.name();
            tracing::info!(target: "runtime.events", source = name, "spawning event source");
            out.push(src.spawn(tx.clone()));
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyEvent {
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            mods: KeyModifiers::empty(),
        }
    }

    pub fn char(c: char) -> Self {
        Self::new(KeyCode::Char(c))
    }

    pub fn ctrl(c: char) -> Self {
        Self {
            code: KeyCode::Char(c),
            mods: KeyModifiers::CTRL,
        }
    }

    /// Printable character with no Ctrl/Alt chord (Shift is already folded into the char).
    pub fn printable(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c) if !self.mods.intersects(KeyModifiers::CTRL | KeyModifiers::ALT) => {
                Some(c)
            }
            _ => None,
        }
    }
}

/// Logical keys understood by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Delete,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const CTRL = 0b0000_0001;
        const ALT  = 0b0000_0010;
        const SHIFT= 0b0000_0100;
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.code {
            KeyCode::Char(c) if self.mods.contains(KeyModifiers::CTRL) => {
                return write!(f, "<C-{c}>");
            }
            KeyCode::Char('<') => "<lt>",
            KeyCode::Char(c) => return write!(f, "{c}"),
            KeyCode::Enter => "<CR>",
            KeyCode::Esc => "<Esc>",
            KeyCode::Backspace => "<BS>",
            KeyCode::Delete => "<Del>",
            KeyCode::Tab => "<Tab>",
            KeyCode::Up => "<Up>",
            KeyCode::Down => "<Down>",
            KeyCode::Left => "<Left>",
            KeyCode::Right => "<Right>",
            KeyCode::Home => "<Home>",
            KeyCode::End => "<End>",
            KeyCode::PageUp => "<PageUp>",
            KeyCode::PageDown => "<PageDown>",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyParseError {
    #[error("unknown key name <{0}>")]
    UnknownKey(String),
    #[error("unterminated key name starting at byte {0}")]
    Unterminated(usize),
}

/// Parse Vim-style key notation into key events: plain characters map to themselves,
/// `<Name>` spells special keys (`<Esc>`, `<CR>`, `<BS>`, `<Del>`, `<Tab>`, arrows,
/// `<Home>`, `<End>`, `<PageUp>`, `<PageDown>`, `<lt>`) and `<C-x>` a Ctrl chord.
pub fn parse_keys(notation: &str) -> Result<Vec<KeyEvent>, KeyParseError> {
    let mut out = Vec::new();
    let mut rest = notation;
    let mut offset = 0;
    while let Some(c) = rest.chars().next() {
        if c != '<' {
            out.push(KeyEvent::char(c));
            rest = &rest[c.len_utf8()..];
            offset += c.len_utf8();
            continue;
        }
        let Some(close) = rest.find('>') else {
            return Err(KeyParseError::Unterminated(offset));
        };
        let name = &rest[1..close];
        out.push(named_key(name)?);
        rest = &rest[close + 1..];
        offset += close + 1;
    }
    Ok(out)
}

fn named_key(name: &str) -> Result<KeyEvent, KeyParseError> {
    let lower = name.to_ascii_lowercase();
    if let Some(ch) = lower.strip_prefix("c-") {
        let mut chars = ch.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Ok(KeyEvent::ctrl(c));
        }
    }
    let code = match lower.as_str() {
        "esc" => KeyCode::Esc,
        "cr" | "enter" | "return" => KeyCode::Enter,
        "bs" | "backspace" => KeyCode::Backspace,
        "del" | "delete" => KeyCode::Delete,
        "tab" => KeyCode::Tab,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "lt" => KeyCode::Char('<'),
        "space" => KeyCode::Char(' '),
        _ => return Err(KeyParseError::UnknownKey(name.to_string())),
    };
    Ok(KeyEvent::new(code))
}
