// src/display/terminal.rs
//! Terminal-based display and keyboard touch stand-in

use super::SpeedDisplay;
use crate::{
    decision::RenderCommand,
    error::{Result, SpeedLimitError},
    toggle::TouchSensor,
};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, DisableLineWrap, EnableLineWrap},
};
use std::{
    io::{self, Write},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

const SIGN_WIDTH: usize = 20;

/// Draws the speed limit sign as text. Restores the terminal on drop.
pub struct TerminalDisplay<W: Write = io::Stdout> {
    out: W,
    raw_mode: bool,
}

impl TerminalDisplay<io::Stdout> {
    /// Take over stdout: hide the cursor and enter raw mode for key input
    pub fn new() -> Result<Self> {
        let mut out = io::stdout();
        execute!(out, Hide, DisableLineWrap)?;
        terminal::enable_raw_mode()?;
        Ok(Self {
            out,
            raw_mode: true,
        })
    }
}

impl<W: Write> TerminalDisplay<W> {
    /// Render into an arbitrary writer without touching terminal modes
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            raw_mode: false,
        }
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    fn render_message(&mut self, text: &str) -> Result<()> {
        execute!(
            self.out,
            SetForegroundColor(Color::Yellow),
            Print(format!("{}\r\n", text)),
            ResetColor
        )?;
        Ok(())
    }

    fn render_sign(&mut self, value: u32, unit: &str) -> Result<()> {
        let border = format!("+{}+\r\n", "-".repeat(SIGN_WIDTH));
        let blank = format!("|{}|\r\n", " ".repeat(SIGN_WIDTH));

        execute!(
            self.out,
            SetForegroundColor(Color::Red),
            Print(&border),
            Print(&blank),
            Print(format!("|{:^width$}|\r\n", "SPEED LIMIT", width = SIGN_WIDTH)),
            Print(&blank),
            ResetColor,
            Print(format!("|{:^width$}|\r\n", value, width = SIGN_WIDTH)),
            Print(format!("|{:^width$}|\r\n", unit, width = SIGN_WIDTH)),
            SetForegroundColor(Color::Red),
            Print(&blank),
            Print(&border),
            ResetColor
        )?;
        Ok(())
    }

    fn render_footer(&mut self) -> Result<()> {
        execute!(
            self.out,
            SetForegroundColor(Color::Green),
            Print("\r\n[space] toggle MPH/KPH   [q] quit\r\n"),
            ResetColor
        )?;
        Ok(())
    }
}

impl<W: Write> SpeedDisplay for TerminalDisplay<W> {
    fn render(&mut self, command: &RenderCommand) -> Result<()> {
        if self.raw_mode {
            execute!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        }

        match command {
            RenderCommand::ShowMessage(text) => self.render_message(text)?,
            RenderCommand::ShowSpeedLimit { value, unit } => self.render_sign(*value, unit.label())?,
        }

        if self.raw_mode {
            self.render_footer()?;
        }

        self.out
            .flush()
            .map_err(|e| SpeedLimitError::Display(e.to_string()))
    }
}

impl<W: Write> Drop for TerminalDisplay<W> {
    fn drop(&mut self) {
        if self.raw_mode {
            let _ = terminal::disable_raw_mode();
            let _ = execute!(self.out, Show, EnableLineWrap);
        }
    }
}

/// Keyboard stand-in for the touch panel: space or `t` is a touch,
/// `q` or Ctrl+C stops the application.
pub struct KeyboardTouch {
    running: Arc<AtomicBool>,
}

impl KeyboardTouch {
    pub fn new(running: Arc<AtomicBool>) -> Self {
        Self { running }
    }

    fn handle_key(&self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }

        match key.code {
            KeyCode::Char(' ') | KeyCode::Char('t') => true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running.store(false, Ordering::Relaxed);
                false
            }
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running.store(false, Ordering::Relaxed);
                false
            }
            _ => false,
        }
    }
}

impl TouchSensor for KeyboardTouch {
    fn is_pressed(&mut self) -> Result<bool> {
        let mut pressed = false;
        // Drain everything queued since the last poll without blocking
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                pressed |= self.handle_key(key);
            }
        }
        Ok(pressed)
    }
}
