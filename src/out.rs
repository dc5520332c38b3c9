use core::fmt;

use std::io;

use termcolor::{Color, ColorSpec, WriteColor};

/// Print an informational line.
macro_rules! info {
    ($o:expr, $($arg:tt)*) => {
        $o.line($crate::out::Level::Info, format_args!($($arg)*))?
    };
}

/// Print a warning line.
macro_rules! warning {
    ($o:expr, $($arg:tt)*) => {
        $o.line($crate::out::Level::Warn, format_args!($($arg)*))?
    };
}

/// Print an error line.
macro_rules! error {
    ($o:expr, $($arg:tt)*) => {
        $o.line($crate::out::Level::Error, format_args!($($arg)*))?
    };
}

/// Print a line without a level tag.
macro_rules! blank {
    ($o:expr, $($arg:tt)*) => {
        $o.line($crate::out::Level::Blank, format_args!($($arg)*))?
    };
}

pub(crate) use {blank, error, info, warning};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Level {
    Info,
    Warn,
    Error,
    Blank,
}

impl Level {
    fn tag(self) -> Option<(&'static str, Color)> {
        match self {
            Level::Info => Some(("info", Color::Green)),
            Level::Warn => Some(("warn", Color::Yellow)),
            Level::Error => Some(("error", Color::Red)),
            Level::Blank => None,
        }
    }
}

/// Line oriented terminal output.
pub struct Out<'a> {
    w: &'a mut dyn WriteColor,
    indent: usize,
}

impl<'a> Out<'a> {
    /// Construct a new output over the given writer.
    pub fn new(w: &'a mut dyn WriteColor) -> Self {
        Self { w, indent: 0 }
    }

    /// Borrow the output with additional indentation.
    pub fn indent(&mut self, n: usize) -> Out<'_> {
        Out {
            w: &mut *self.w,
            indent: self.indent + n,
        }
    }

    pub(crate) fn line(&mut self, level: Level, args: fmt::Arguments<'_>) -> io::Result<()> {
        self.prefix(level)?;
        writeln!(self.w, "{args}")?;
        Ok(())
    }

    /// Write text without a trailing newline and flush it, used for prompts.
    pub(crate) fn prompt(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        self.prefix(Level::Blank)?;
        write!(self.w, "{args}")?;
        self.w.flush()
    }

    fn prefix(&mut self, level: Level) -> io::Result<()> {
        for _ in 0..self.indent {
            self.w.write_all(b"  ")?;
        }

        if let Some((tag, color)) = level.tag() {
            self.w
                .set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
            write!(self.w, "{tag}")?;
            self.w.reset()?;
            write!(self.w, ": ")?;
        }

        Ok(())
    }
}
