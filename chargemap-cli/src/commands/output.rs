//! Output sink shared by all commands.

#[cfg(test)]
use std::cell::RefCell;

use chargemap::cluster::ClusterColor;
use console::style;

/// Line-oriented output used by command handlers.
pub trait Output {
    /// Print a plain line.
    fn println(&self, line: &str);

    /// Print a section header.
    fn header(&self, title: &str);

    /// Print a line indented under the current section.
    fn indented(&self, line: &str) {
        self.println(&format!("  {}", line));
    }

    /// Print an empty line.
    fn newline(&self) {
        self.println("");
    }

    /// Render a cluster color label (plain by default).
    fn color_label(&self, color: ClusterColor) -> String {
        color.to_string()
    }
}

/// Writes to stdout with terminal styling.
#[derive(Debug, Default)]
pub struct ConsoleOutput;

impl Output for ConsoleOutput {
    fn println(&self, line: &str) {
        println!("{}", line);
    }

    fn header(&self, title: &str) {
        println!("{}", style(title).bold().underlined());
    }

    fn color_label(&self, color: ClusterColor) -> String {
        let label = color.to_string();
        match color {
            ClusterColor::Green => style(label).green().to_string(),
            ClusterColor::Amber => style(label).yellow().to_string(),
            ClusterColor::Red => style(label).red().to_string(),
        }
    }
}

/// Collects lines in memory.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct BufferOutput {
    lines: RefCell<Vec<String>>,
}

#[cfg(test)]
impl BufferOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything printed so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    /// Whether any line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.borrow().iter().any(|l| l.contains(needle))
    }
}

#[cfg(test)]
impl Output for BufferOutput {
    fn println(&self, line: &str) {
        self.lines.borrow_mut().push(line.to_string());
    }

    fn header(&self, title: &str) {
        self.println(&format!("== {} ==", title));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_output_collects_lines() {
        let out = BufferOutput::new();
        out.header("Clusters");
        out.indented("#1 green");
        out.newline();

        assert_eq!(out.lines(), vec!["== Clusters ==", "  #1 green", ""]);
        assert!(out.contains("#1"));
    }

    #[test]
    fn test_plain_color_label() {
        let out = BufferOutput::new();
        assert_eq!(out.color_label(ClusterColor::Red), "red");
    }
}
