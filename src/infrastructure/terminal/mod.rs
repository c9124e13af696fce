// Terminal module - crossterm-backed host console
use crate::core::console::{ConsoleMode, HostConsole, HostInput};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// The process's own terminal
#[derive(Debug, Default)]
pub struct CrosstermConsole {
    raw: AtomicBool,
}

impl CrosstermConsole {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HostConsole for CrosstermConsole {
    fn enable_raw(&self) -> io::Result<()> {
        enable_raw_mode()?;
        self.raw.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn disable_raw(&self) -> io::Result<()> {
        disable_raw_mode()?;
        self.raw.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn mode(&self) -> ConsoleMode {
        if self.raw.load(Ordering::SeqCst) {
            ConsoleMode::Raw
        } else {
            ConsoleMode::Cooked
        }
    }

    fn input(&self) -> Box<dyn HostInput> {
        Box::new(CrosstermInput)
    }

    fn output(&self) -> Box<dyn Write + Send> {
        Box::new(io::stdout())
    }
}

/// Keyboard reader translating key events back into terminal bytes
pub struct CrosstermInput;

impl HostInput for CrosstermInput {
    fn poll_input(&mut self, timeout: Duration) -> io::Result<Option<Vec<u8>>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }

        match event::read()? {
            Event::Key(key) => Ok(key_event_to_bytes(key)),
            _ => Ok(None),
        }
    }
}

/// Restore cooked mode before the default hook prints the panic message
pub fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        default_hook(info);
    }));
}

/// Bytes a VT-style terminal would send for `key`
pub fn key_event_to_bytes(key: KeyEvent) -> Option<Vec<u8>> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    match key.code {
        KeyCode::Char(c) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                if let Some(byte) = control_byte(c) {
                    return Some(vec![byte]);
                }
            }
            let mut buffer = [0u8; 4];
            Some(c.encode_utf8(&mut buffer).as_bytes().to_vec())
        }
        KeyCode::Enter => Some(vec![b'\r']),
        KeyCode::Tab => Some(vec![b'\t']),
        KeyCode::BackTab => Some(b"\x1b[Z".to_vec()),
        KeyCode::Backspace => Some(vec![0x7f]),
        KeyCode::Esc => Some(vec![0x1b]),
        KeyCode::Up => Some(b"\x1b[A".to_vec()),
        KeyCode::Down => Some(b"\x1b[B".to_vec()),
        KeyCode::Right => Some(b"\x1b[C".to_vec()),
        KeyCode::Left => Some(b"\x1b[D".to_vec()),
        KeyCode::Home => Some(b"\x1b[H".to_vec()),
        KeyCode::End => Some(b"\x1b[F".to_vec()),
        KeyCode::PageUp => Some(b"\x1b[5~".to_vec()),
        KeyCode::PageDown => Some(b"\x1b[6~".to_vec()),
        KeyCode::Delete => Some(b"\x1b[3~".to_vec()),
        KeyCode::Insert => Some(b"\x1b[2~".to_vec()),
        _ => None,
    }
}

fn control_byte(c: char) -> Option<u8> {
    match c.to_ascii_lowercase() {
        c @ 'a'..='z' => Some(c as u8 - b'a' + 1),
        '@' | ' ' | '2' => Some(0x00),
        '[' | '3' => Some(0x1b),
        '\\' | '4' => Some(0x1c),
        ']' | '5' => Some(0x1d),
        '^' | '6' => Some(0x1e),
        '_' | '7' => Some(0x1f),
        _ => None,
    }
}
