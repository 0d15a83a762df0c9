//! Terminal setup and management

use crate::error::{Result, SshuiError};
use crossterm::{
    cursor::Show,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use tracing::debug;

/// Terminal configuration
#[derive(Debug, Clone)]
pub struct TerminalConfig {
    /// Use alternate screen
    pub alternate_screen: bool,

    /// Enable raw mode
    pub raw_mode: bool,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            alternate_screen: true,
            raw_mode: true,
        }
    }
}

/// Owns the terminal for the lifetime of the UI; restores it on drop
pub struct TerminalManager {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    config: TerminalConfig,
}

impl TerminalManager {
    /// Acquire the terminal
    pub fn new(config: TerminalConfig) -> Result<Self> {
        if config.raw_mode {
            enable_raw_mode().map_err(SshuiError::Terminal)?;
        }

        let mut stdout = io::stdout();

        if config.alternate_screen {
            if let Err(e) = execute!(stdout, EnterAlternateScreen) {
                if config.raw_mode {
                    let _ = disable_raw_mode();
                }
                return Err(SshuiError::Terminal(e));
            }
        }

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend).map_err(SshuiError::Terminal)?;
        debug!("Terminal acquired");

        Ok(Self { terminal, config })
    }

    /// Get mutable reference to terminal
    pub fn terminal_mut(&mut self) -> &mut Terminal<CrosstermBackend<Stdout>> {
        &mut self.terminal
    }

    /// Get terminal size
    pub fn size(&self) -> Result<(u16, u16)> {
        let rect = self.terminal.size()?;
        Ok((rect.width, rect.height))
    }
}

impl Drop for TerminalManager {
    fn drop(&mut self) {
        if self.config.raw_mode {
            let _ = disable_raw_mode();
        }

        if self.config.alternate_screen {
            let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
        }
        debug!("Terminal restored");
    }
}
