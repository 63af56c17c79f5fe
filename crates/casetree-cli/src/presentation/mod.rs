// Presentation - view models for each command plus the console renderer
// that prints them as JSON or as plain text tables.

mod table;
mod views;

pub use table::Table;
pub use views::{CatalogView, TreeView};

use crate::types::OutputFormat;
use anyhow::Result;
use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use serde::Serialize;

/// Plain-text rendering of a view model.
pub trait PlainView {
    fn plain(&self, palette: Palette) -> String;
}

/// Styling switch for plain output; a no-op when color is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    color: bool,
}

impl Palette {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn header(self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn dim(self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn link(self, text: &str) -> String {
        if self.color {
            text.cyan().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn warning(self, text: &str) -> String {
        if self.color {
            text.yellow().bold().to_string()
        } else {
            text.to_string()
        }
    }
}

pub struct ConsoleRenderer {
    format: OutputFormat,
    palette: Palette,
}

impl ConsoleRenderer {
    pub fn new(format: OutputFormat) -> Self {
        let color = format == OutputFormat::Plain
            && std::io::stdout().is_terminal()
            && std::env::var_os("NO_COLOR").is_none();
        Self {
            format,
            palette: Palette::new(color),
        }
    }

    pub fn render<T>(&self, view: &T) -> Result<()>
    where
        T: Serialize + PlainView,
    {
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(view)?),
            OutputFormat::Plain => print!("{}", view.plain(self.palette)),
        }
        Ok(())
    }

    /// Non-fatal notice; goes to stderr so JSON on stdout stays parseable.
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", self.palette.warning("Warning:"), message);
    }
}
