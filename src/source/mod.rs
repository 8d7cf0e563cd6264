//=====================================================
// File: source/mod.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Line acquisition for QuillScript programs
// Objective: Read a script, strip comments, trim and number lines, and
//            aggregate function-definition blocks into single items
//=====================================================

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::interpreter::RuntimeError;
use crate::parser;

//=====================================================
// Section 1.0 - Items
//=====================================================

/// A trimmed, comment-free, non-empty line with its 1-based physical line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    pub number: usize,
    pub text: String,
}

impl SourceLine {
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    /// A single statement line.
    Line(SourceLine),
    /// `fn name(params) {` followed by its body, closing `}` consumed.
    FunctionDef {
        header: SourceLine,
        name: String,
        params: String,
        body: Vec<SourceLine>,
    },
    /// A block the line source could not aggregate; reported against `line`.
    Malformed {
        line: SourceLine,
        error: RuntimeError,
    },
}

impl Item {
    pub fn line(&self) -> &SourceLine {
        match self {
            Item::Line(line) => line,
            Item::FunctionDef { header, .. } => header,
            Item::Malformed { line, .. } => line,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SourceFile {
    pub path: Option<PathBuf>,
    pub items: Vec<Item>,
}

impl SourceFile {
    pub fn load(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let mut file = Self::parse(&text);
        file.path = Some(path.to_path_buf());
        Ok(file)
    }

    pub fn parse(text: &str) -> Self {
        Self {
            path: None,
            items: aggregate(strip_comments(text)),
        }
    }
}

//=====================================================
// Section 2.0 - Comment Stripping
//=====================================================

/// Remove `//` and `/* */` comments (the latter may span lines), trim, and drop
/// empty lines. Markers inside double-quoted strings are literal text.
pub fn strip_comments(text: &str) -> Vec<SourceLine> {
    let mut lines = Vec::new();
    let mut in_block = false;

    for (index, raw) in text.lines().enumerate() {
        let chars: Vec<char> = raw.chars().collect();
        let mut kept = String::with_capacity(raw.len());
        let mut in_string = false;
        let mut i = 0;

        while i < chars.len() {
            let ch = chars[i];
            let next = chars.get(i + 1).copied();
            if in_block {
                if ch == '*' && next == Some('/') {
                    in_block = false;
                    i += 2;
                } else {
                    i += 1;
                }
                continue;
            }
            if !in_string && ch == '/' && next == Some('/') {
                break;
            }
            if !in_string && ch == '/' && next == Some('*') {
                in_block = true;
                i += 2;
                continue;
            }
            if ch == '"' {
                in_string = !in_string;
            }
            kept.push(ch);
            i += 1;
        }

        let trimmed = kept.trim_matches(|c| c == ' ' || c == '\t' || c == '\r');
        if !trimmed.is_empty() {
            lines.push(SourceLine::new(index + 1, trimmed));
        }
    }
    lines
}

//=====================================================
// Section 3.0 - Block Aggregation
//=====================================================

fn aggregate(lines: Vec<SourceLine>) -> Vec<Item> {
    let mut items = Vec::new();
    let mut lines = lines.into_iter();

    while let Some(line) = lines.next() {
        let Some((name, params)) = parser::function_header(&line.text) else {
            items.push(Item::Line(line));
            continue;
        };
        let (name, params) = (name.to_string(), params.to_string());

        let mut body = Vec::new();
        let mut depth = 0usize;
        let mut nested = false;
        let mut closed = false;
        for body_line in lines.by_ref() {
            if parser::function_header(&body_line.text).is_some() {
                nested = true;
                depth += 1;
                continue;
            }
            if body_line.text == "}" {
                if depth == 0 {
                    closed = true;
                    break;
                }
                depth -= 1;
                continue;
            }
            body.push(body_line);
        }

        let item = if !closed {
            Item::Malformed {
                line,
                error: RuntimeError::UnterminatedFunction(name),
            }
        } else if nested {
            Item::Malformed {
                line,
                error: RuntimeError::NestedFunction(name),
            }
        } else {
            Item::FunctionDef {
                header: line,
                name,
                params,
                body,
            }
        };
        items.push(item);
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments_are_stripped_and_lines_numbered() {
        let lines = strip_comments(
            "x = 5 // five\n\n  // whole line\n/* block\n still block */ y = 2\nprint(\"a // b\")\n",
        );
        assert_eq!(
            lines,
            vec![
                SourceLine::new(1, "x = 5"),
                SourceLine::new(5, "y = 2"),
                SourceLine::new(6, "print(\"a // b\")"),
            ]
        );
    }

    #[test]
    fn load_records_path_and_parse_does_not() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("main.qls");
        std::fs::write(&path, "x = 1 // one\nprint({x})\n").expect("write script");
        let file = SourceFile::load(&path).expect("load script");
        assert_eq!(file.path.as_deref(), Some(path.as_path()));
        assert_eq!(file.items.len(), 2);
        assert!(SourceFile::parse("x = 1\n").path.is_none());
        assert!(SourceFile::load(dir.path().join("absent.qls")).is_err());
    }

    #[test]
    fn function_blocks_are_aggregated() {
        let file = SourceFile::parse("fn greet(name) {\n  print({name})\n}\ngreet(\"Ada\")\n");
        assert_eq!(file.items.len(), 2);
        match &file.items[0] {
            Item::FunctionDef {
                header,
                name,
                params,
                body,
            } => {
                assert_eq!(header.number, 1);
                assert_eq!(name, "greet");
                assert_eq!(params, "name");
                assert_eq!(body, &vec![SourceLine::new(2, "print({name})")]);
            }
            other => panic!("expected function definition, found {other:?}"),
        }
        assert_eq!(file.items[1].line().text, "greet(\"Ada\")");
    }

    #[test]
    fn unterminated_function_is_malformed() {
        let file = SourceFile::parse("fn broken() {\nprint(\"x\")\n");
        assert!(matches!(
            &file.items[0],
            Item::Malformed { error: RuntimeError::UnterminatedFunction(name), .. } if name == "broken"
        ));
    }

    #[test]
    fn nested_function_is_malformed_and_skipped_whole() {
        let file = SourceFile::parse(
            "fn outer() {\nfn inner() {\nprint(\"in\")\n}\nprint(\"out\")\n}\nprint(\"after\")\n",
        );
        assert_eq!(file.items.len(), 2);
        assert!(matches!(
            &file.items[0],
            Item::Malformed { error: RuntimeError::NestedFunction(_), .. }
        ));
        assert_eq!(file.items[1].line().number, 7);
    }
}

//=====================================================
// End of file
//=====================================================
