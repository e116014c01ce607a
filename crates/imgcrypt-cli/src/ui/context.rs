//! How output should look, decided once per command.

use std::io::IsTerminal;

/// Shape of what goes to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// One JSON document, nothing else
    Json,
    /// `key=value` lines
    #[default]
    Plain,
    /// Badges, tables, and color
    Pretty,
}

impl OutputMode {
    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json)
    }

    pub fn is_pretty(&self) -> bool {
        matches!(self, Self::Pretty)
    }
}

/// Snapshot of the terminal the process was started in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Terminal {
    stdout_tty: bool,
    stderr_tty: bool,
    dumb: bool,
    no_color_env: bool,
}

impl Terminal {
    fn detect() -> Self {
        Self {
            stdout_tty: std::io::stdout().is_terminal(),
            stderr_tty: std::io::stderr().is_terminal(),
            dumb: std::env::var("TERM").is_ok_and(|term| term == "dumb"),
            no_color_env: std::env::var_os("NO_COLOR").is_some(),
        }
    }
}

/// Rendering decisions shared by every UI helper.
#[derive(Debug, Clone)]
pub struct UiContext {
    /// Spinners draw on stderr, so only its TTY status matters for them
    pub stderr_tty: bool,
    pub color: bool,
    pub unicode: bool,
    pub mode: OutputMode,
    pub quiet: bool,
}

impl UiContext {
    pub fn from_env(json: bool, no_color: bool, quiet: bool) -> Self {
        Self::for_terminal(Terminal::detect(), json, no_color, quiet)
    }

    fn for_terminal(term: Terminal, json: bool, no_color: bool, quiet: bool) -> Self {
        // --json wins; a dumb or redirected stdout gets plain lines.
        let mode = if json {
            OutputMode::Json
        } else if term.stdout_tty && !term.dumb {
            OutputMode::Pretty
        } else {
            OutputMode::Plain
        };

        Self {
            stderr_tty: term.stderr_tty,
            color: mode.is_pretty() && !no_color && !term.no_color_env,
            unicode: !term.dumb,
            mode,
            quiet,
        }
    }

    /// Prompts need a human on both stdin and stderr.
    pub fn is_interactive(&self) -> bool {
        self.stderr_tty && std::io::stdin().is_terminal()
    }

    pub fn allows_animation(&self) -> bool {
        self.stderr_tty && !self.quiet && !self.mode.is_json()
    }
}
