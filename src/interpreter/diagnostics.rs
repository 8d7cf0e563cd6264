//=====================================================
// File: interpreter/diagnostics.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Error sink for per-line QuillScript failures
// Objective: Carry (line, source, message) diagnostics and render them for
//            the terminal or collect them for embedding and tests
//=====================================================

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use super::errors::{ErrorCode, RuntimeError};

const RED: &str = "\u{001b}[1;31m";
const YELLOW: &str = "\u{001b}[1;33m";
const CYAN: &str = "\u{001b}[1;36m";
const RESET: &str = "\u{001b}[0m";

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub line: usize,
    pub source: String,
    pub message: String,
    pub code: ErrorCode,
    pub suggestion: Option<&'static str>,
}

impl Diagnostic {
    pub fn from_error(line: usize, source: impl Into<String>, error: &RuntimeError) -> Self {
        Self {
            line,
            source: source.into(),
            message: error.to_string(),
            code: error.code(),
            suggestion: error.suggestion(),
        }
    }
}

pub trait ErrorSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

//=====================================================
// Section 1.0 - Terminal Reporter
//=====================================================

/// Writes a header, the offending line, a caret underline, the message and an
/// optional suggestion.
pub struct TerminalReporter<W: Write = io::Stderr> {
    out: W,
    color: bool,
    suggestions: bool,
}

impl TerminalReporter<io::Stderr> {
    pub fn stderr(color: bool, suggestions: bool) -> Self {
        Self::new(io::stderr(), color, suggestions)
    }
}

impl<W: Write> TerminalReporter<W> {
    pub fn new(out: W, color: bool, suggestions: bool) -> Self {
        Self {
            out,
            color,
            suggestions,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.color {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    pub fn render(&self, diagnostic: &Diagnostic) -> String {
        let mut rendered = format!(
            "{} on line {}:\n",
            self.paint(RED, &format!("❌ Error [{}]", diagnostic.code)),
            self.paint(YELLOW, &diagnostic.line.to_string()),
        );
        rendered.push_str(&format!("    {}\n", diagnostic.source));
        let underline = "^".repeat(diagnostic.source.chars().count().max(1));
        rendered.push_str(&format!("    {}\n", self.paint(RED, &underline)));
        rendered.push_str(&format!("    {}\n", self.paint(RED, &diagnostic.message)));
        if self.suggestions {
            if let Some(suggestion) = diagnostic.suggestion {
                rendered.push_str(&format!("{} {suggestion}\n", self.paint(CYAN, "Suggestion:")));
            }
        }
        rendered
    }
}

impl<W: Write> ErrorSink for TerminalReporter<W> {
    fn report(&mut self, diagnostic: Diagnostic) {
        let rendered = self.render(&diagnostic);
        // Reporting must never abort the run; a closed stderr just loses the text.
        let _ = writeln!(self.out, "{rendered}");
    }
}

//=====================================================
// Section 2.0 - Collecting Sink
//=====================================================

/// Keeps diagnostics in memory. Clones share one log, so a handle kept by the
/// caller sees everything reported through the clone given to the interpreter.
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    entries: Rc<RefCell<Vec<Diagnostic>>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.entries.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl ErrorSink for CollectingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.entries.borrow_mut().push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Diagnostic {
        Diagnostic::from_error(
            3,
            "print({arr[5]})",
            &RuntimeError::IndexOutOfBounds {
                name: "arr".into(),
                index: 5,
                len: 3,
            },
        )
    }

    #[test]
    fn plain_rendering_has_every_part() {
        let reporter = TerminalReporter::new(Vec::new(), false, true);
        let rendered = reporter.render(&sample());
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "❌ Error [E004] on line 3:");
        assert_eq!(lines[1], "    print({arr[5]})");
        assert_eq!(lines[2], "    ^^^^^^^^^^^^^^^");
        assert_eq!(
            lines[3],
            "    Index out of bounds: 5 (array 'arr' has 3 elements)"
        );
    }

    #[test]
    fn colored_rendering_uses_ansi() {
        let mut reporter = TerminalReporter::new(Vec::new(), true, true);
        reporter.report(Diagnostic::from_error(
            1,
            "print({x})",
            &RuntimeError::UndefinedVariable("x".into()),
        ));
        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(text.contains(RED));
        assert!(text.contains("Suggestion:"));
    }

    #[test]
    fn collecting_sink_shares_its_log() {
        let sink = CollectingSink::new();
        let mut handle = sink.clone();
        handle.report(sample());
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.diagnostics()[0].line, 3);
    }
}

//=====================================================
// End of file
//=====================================================
