//! Crossterm terminal output backend.
//!
//! The `Presenter` wraps a buffered stdout writer and draws a
//! [`RendererNode`] tree as styled text lines: column boxes stack their
//! children vertically, row boxes merge children line-by-line. It is the
//! minimal cell-free renderer the hook runtime needs; a full compositor can
//! replace it behind the same `draw` call.

use std::io::{self, BufWriter, Stdout, Write};

use crossterm::{
    cursor, execute, queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};

use crate::component::{Direction, RendererNode};

// ---------------------------------------------------------------------------
// Frame flattening
// ---------------------------------------------------------------------------

/// One styled run of text within a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub bold: bool,
    pub dim: bool,
}

/// Flatten a node tree into lines of styled spans.
///
/// Column boxes concatenate their children's lines vertically; row boxes
/// merge children's lines index-by-index, so a row of single-line children
/// becomes one line.
pub fn frame_lines(node: &RendererNode) -> Vec<Vec<Span>> {
    match node {
        RendererNode::Text { content, bold, dim } => vec![vec![Span {
            text: content.clone(),
            bold: *bold,
            dim: *dim,
        }]],
        RendererNode::Box {
            direction: Direction::Column,
            children,
        } => children.iter().flat_map(frame_lines).collect(),
        RendererNode::Box {
            direction: Direction::Row,
            children,
        } => {
            let mut merged: Vec<Vec<Span>> = Vec::new();
            for child in children {
                for (index, line) in frame_lines(child).into_iter().enumerate() {
                    if index < merged.len() {
                        merged[index].extend(line);
                    } else {
                        merged.push(line);
                    }
                }
            }
            merged
        }
    }
}

// ---------------------------------------------------------------------------
// Presenter
// ---------------------------------------------------------------------------

/// Terminal output backend using crossterm.
///
/// Wraps a `BufWriter<Stdout>` for batched writes. The presenter does NOT
/// automatically enter alternate screen on creation — call
/// `enter_alt_screen` explicitly.
pub struct Presenter {
    writer: BufWriter<Stdout>,
}

impl Presenter {
    /// Create a presenter wrapping stdout.
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            writer: BufWriter::new(io::stdout()),
        })
    }

    /// Enter alternate screen and enable raw mode.
    pub fn enter_alt_screen(&mut self) -> io::Result<()> {
        execute!(self.writer, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        Ok(())
    }

    /// Leave alternate screen and disable raw mode.
    pub fn leave_alt_screen(&mut self) -> io::Result<()> {
        terminal::disable_raw_mode()?;
        execute!(self.writer, LeaveAlternateScreen)?;
        Ok(())
    }

    /// Hide the cursor.
    pub fn hide_cursor(&mut self) -> io::Result<()> {
        execute!(self.writer, cursor::Hide)
    }

    /// Show the cursor.
    pub fn show_cursor(&mut self) -> io::Result<()> {
        execute!(self.writer, cursor::Show)
    }

    /// Get the terminal size (columns, rows) via crossterm.
    pub fn terminal_size() -> io::Result<(u16, u16)> {
        terminal::size()
    }

    /// Clear the screen and draw one frame, top-left anchored.
    ///
    /// Uses `queue!` for batching and flushes once at the end.
    pub fn draw(&mut self, frame: &RendererNode) -> io::Result<()> {
        queue!(self.writer, Clear(ClearType::All))?;
        for (row, line) in frame_lines(frame).into_iter().enumerate() {
            queue!(self.writer, cursor::MoveTo(0, row as u16))?;
            for span in line {
                if span.bold {
                    queue!(self.writer, SetAttribute(Attribute::Bold))?;
                }
                if span.dim {
                    queue!(self.writer, SetAttribute(Attribute::Dim))?;
                }
                queue!(self.writer, Print(&span.text))?;
                queue!(self.writer, SetAttribute(Attribute::Reset))?;
            }
        }
        self.writer.flush()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
