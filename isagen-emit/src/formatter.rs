//! Structured source text and its renderer
//!
//! Emitters never concatenate output text directly. They produce
//! [`Fragment`]s; the [`Formatter`] keeps them as indented lines and renders
//! the whole artifact in one place, so layout is decided here only.

/// Indentation unit of rendered output
pub const INDENT: &str = "    ";

/// One unit of emitted source
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fragment {
    /// A line at the current depth; empty lines are skipped
    Line(String),
    /// A line that opens a nested block
    Open(String),
    /// A line that closes the innermost block
    Close(String),
}

impl Fragment {
    pub fn line(text: impl Into<String>) -> Self {
        Fragment::Line(text.into())
    }

    pub fn open(text: impl Into<String>) -> Self {
        Fragment::Open(text.into())
    }

    pub fn close(text: impl Into<String>) -> Self {
        Fragment::Close(text.into())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Line {
    depth: usize,
    text: String,
}

/// Indented line buffer for one artifact
#[derive(Clone, Debug, Default)]
pub struct Formatter {
    lines: Vec<Line>,
    depth: usize,
}

impl Formatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, fragment: Fragment) {
        match fragment {
            Fragment::Line(text) => self.line(text),
            Fragment::Open(text) => {
                self.line(text);
                self.depth += 1;
            }
            Fragment::Close(text) => {
                self.depth = self.depth.saturating_sub(1);
                self.line(text);
            }
        }
    }

    pub fn extend(&mut self, fragments: impl IntoIterator<Item = Fragment>) {
        for fragment in fragments {
            self.push(fragment);
        }
    }

    fn line(&mut self, text: String) {
        if text.is_empty() {
            return;
        }
        self.lines.push(Line {
            depth: self.depth,
            text,
        });
    }

    /// Current nesting depth
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Render every line, newline-terminated
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            for _ in 0..line.depth {
                out.push_str(INDENT);
            }
            out.push_str(&line.text);
            out.push('\n');
        }
        out
    }
}
