//! Message formatting and display.
//!
//! Messages honour quiet and verbose modes. When the merged PDF itself is
//! written to stdout, every message goes to stderr instead.
//!
//! # Examples
//!
//! ```
//! use pagemerge::output::formatter::OutputFormatter;
//!
//! let formatter = OutputFormatter::new(false, false);
//! formatter.info("Merging 3 sources...");
//! formatter.success("Merge completed");
//! ```

use crate::config::{Config, OutputMode};
use std::io::{self, IsTerminal, Write};

/// Level of output message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    /// Informational message.
    Info,
    /// Success message.
    Success,
    /// Warning message.
    Warning,
    /// Error message.
    Error,
    /// Debug/verbose message.
    Debug,
}

impl MessageLevel {
    fn prefix(self) -> &'static str {
        match self {
            Self::Info => "",
            Self::Success => "✓ ",
            Self::Warning => "⚠ ",
            Self::Error => "✗ ",
            Self::Debug => "→ ",
        }
    }

    fn color(self) -> Option<&'static str> {
        match self {
            Self::Info => None,
            Self::Success => Some("\x1b[32m"),
            Self::Warning => Some("\x1b[33m"),
            Self::Error => Some("\x1b[31m"),
            Self::Debug => Some("\x1b[36m"),
        }
    }
}

/// Where messages are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Standard output.
    Stdout,
    /// Standard error.
    Stderr,
}

impl Target {
    fn is_terminal(self) -> bool {
        match self {
            Self::Stdout => io::stdout().is_terminal(),
            Self::Stderr => io::stderr().is_terminal(),
        }
    }
}

/// Output formatter with configurable verbosity.
pub struct OutputFormatter {
    quiet: bool,
    verbose: bool,
    colored: bool,
    target: Target,
}

impl OutputFormatter {
    /// Create a formatter writing to stdout.
    pub fn new(quiet: bool, verbose: bool) -> Self {
        Self::with_target(quiet, verbose, Target::Stdout)
    }

    /// Create a formatter writing to `target`.
    pub fn with_target(quiet: bool, verbose: bool, target: Target) -> Self {
        Self {
            quiet,
            verbose,
            colored: Self::should_use_color(target),
            target,
        }
    }

    /// Create a formatter from configuration.
    ///
    /// Anything other than [`OutputMode::File`] may put document bytes on
    /// stdout, so those modes report on stderr.
    pub fn from_config(config: &Config) -> Self {
        let target = match config.mode {
            OutputMode::File => Target::Stdout,
            _ => Target::Stderr,
        };
        Self::with_target(config.quiet, config.verbose, target)
    }

    /// Create a quiet formatter (only warnings and errors).
    pub fn quiet() -> Self {
        Self::new(true, false)
    }

    /// Create a verbose formatter.
    pub fn verbose() -> Self {
        Self::new(false, true)
    }

    fn should_use_color(target: Target) -> bool {
        target.is_terminal() && std::env::var_os("TERM").is_some()
    }

    /// Print an informational message. Suppressed in quiet mode.
    pub fn info(&self, message: &str) {
        if !self.quiet {
            self.print_message(MessageLevel::Info, message);
        }
    }

    /// Print a success message. Suppressed in quiet mode.
    pub fn success(&self, message: &str) {
        if !self.quiet {
            self.print_message(MessageLevel::Success, message);
        }
    }

    /// Print a warning message, even in quiet mode.
    pub fn warning(&self, message: &str) {
        self.print_message(MessageLevel::Warning, message);
    }

    /// Print an error message. Always goes to stderr.
    pub fn error(&self, message: &str) {
        let line = self.render(MessageLevel::Error, message);
        let _ = writeln!(io::stderr().lock(), "{line}");
    }

    /// Print a debug message. Only displayed in verbose mode.
    pub fn debug(&self, message: &str) {
        if self.verbose {
            self.print_message(MessageLevel::Debug, message);
        }
    }

    /// Print a section header.
    pub fn section(&self, title: &str) {
        if !self.quiet {
            self.emit(&format!("\n{title}"));
        }
    }

    /// Print a labelled detail line. Only shown in verbose mode.
    pub fn detail(&self, label: &str, value: &str) {
        if self.verbose {
            self.emit(&format!("  {label}: {value}"));
        }
    }

    /// Print a numbered list item.
    pub fn list_item(&self, index: usize, message: &str) {
        if !self.quiet {
            self.emit(&format!("  {index}. {message}"));
        }
    }

    /// Print a blank line.
    pub fn blank_line(&self) {
        if !self.quiet {
            self.emit("");
        }
    }

    /// Print text verbatim, ignoring quiet mode.
    ///
    /// Used for output the user asked for explicitly, such as a dry-run plan.
    pub fn raw(&self, text: &str) {
        self.emit(text);
    }

    /// Format a message the way it would be printed.
    pub fn render(&self, level: MessageLevel, message: &str) -> String {
        let prefix = level.prefix();
        match level.color() {
            Some(color) if self.colored => format!("{color}{prefix}{message}\x1b[0m"),
            _ => format!("{prefix}{message}"),
        }
    }

    fn print_message(&self, level: MessageLevel, message: &str) {
        self.emit(&self.render(level, message));
    }

    fn emit(&self, line: &str) {
        // Output is best effort; a closed pipe is not an error worth reporting.
        let _ = match self.target {
            Target::Stdout => writeln!(io::stdout().lock(), "{line}"),
            Target::Stderr => writeln!(io::stderr().lock(), "{line}"),
        };
    }

    /// Returns true unless quiet mode is enabled.
    pub fn should_print(&self) -> bool {
        !self.quiet
    }

    /// Check if verbose output should be shown.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Check if quiet mode is enabled.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Where non-error messages are written.
    pub fn target(&self) -> Target {
        self.target
    }
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self::new(false, false)
    }
}
