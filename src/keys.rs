use std::fmt;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::{spawn, task};

use crate::errors::Result;

/// A key press: a printable character or one of the named keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Up,
    Down,
    Left,
    Right,
    Esc,
    Enter,
    Backspace,
    Tab,
    F(u8),
    Other,
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{c}"),
            Key::Up => f.write_str("up"),
            Key::Down => f.write_str("down"),
            Key::Left => f.write_str("left"),
            Key::Right => f.write_str("right"),
            Key::Esc => f.write_str("esc"),
            Key::Enter => f.write_str("enter"),
            Key::Backspace => f.write_str("backspace"),
            Key::Tab => f.write_str("tab"),
            Key::F(n) => write!(f, "f{n}"),
            Key::Other => f.write_str("other"),
        }
    }
}

impl From<KeyEvent> for Key {
    fn from(event: KeyEvent) -> Self {
        match event.code {
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Esc => Key::Esc,
            KeyCode::Enter => Key::Enter,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Tab => Key::Tab,
            KeyCode::F(n) => Key::F(n),
            _ => Key::Other,
        }
    }
}

pub type KeySender = mpsc::UnboundedSender<Key>;
pub type KeyReceiver = mpsc::UnboundedReceiver<Key>;

pub fn make_key_channel() -> (KeySender, KeyReceiver) {
    mpsc::unbounded_channel()
}

/// Puts the terminal back to normal when dropped.
struct RawMode;

impl RawMode {
    fn enable() -> Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(RawMode)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(err) = terminal::disable_raw_mode() {
            log::error!("[Keys] failed to restore terminal: {err}");
        }
    }
}

fn is_interrupt(event: &KeyEvent) -> bool {
    event.code == KeyCode::Char('c') && event.modifiers.contains(KeyModifiers::CONTROL)
}

/// Key presses read from the terminal.
///
/// The terminal stays in raw mode while the reader task runs. The task ends
/// when the receiving end is dropped, on Ctrl-C, or when aborted with
/// [`TerminalKeys::stop`]; raw mode is switched off in every case.
#[derive(Debug)]
pub struct TerminalKeys {
    task: task::JoinHandle<()>,
}

impl TerminalKeys {
    pub fn spawn() -> Result<(Self, KeyReceiver)> {
        let (tx, rx) = make_key_channel();
        let raw_mode = RawMode::enable()?;
        log::debug!("[Keys] START LISTENING");

        let task = spawn(async move {
            let _raw_mode = raw_mode;
            let mut events = EventStream::new();
            loop {
                let event = tokio::select! {
                    _ = tx.closed() => break,
                    event = events.next() => event,
                };
                let Some(event) = event else { break };

                match event {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        if is_interrupt(&key) {
                            log::info!("[Keys] interrupted");
                            break;
                        }
                        if tx.send(Key::from(key)).is_err() {
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(err) => {
                        log::error!("[Keys] error reading terminal: {err}");
                        break;
                    }
                }
            }
            log::debug!("[Keys] STOP LISTENING");
        });

        Ok((Self { task }, rx))
    }

    pub fn stop(&self) {
        self.task.abort();
    }

    /// Waits for the reader task to finish.
    pub async fn join(self) {
        if let Err(err) = self.task.await {
            if err.is_panic() {
                log::error!("[Keys] reader task panicked");
            }
        }
    }
}
