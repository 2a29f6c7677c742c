//! Syntax highlighting: a lexical classifier for the visible cells.
//!
//! [`classify`] looks at one line and returns a [`Class`] for every char in
//! a window of it. It knows nothing about colors or the screen; the view
//! maps classes to colors when it paints.
//!
//! The scanner is a small state machine, not a parser:
//!
//! | State         | On                          | Class / next state             |
//! |---------------|-----------------------------|--------------------------------|
//! | Normal        | digit                       | Number                         |
//! | Normal        | `'` or `"`                  | String, enter InString(quote)  |
//! | Normal        | `//` or `#`                 | Comment, enter InComment       |
//! | Normal        | `+ - * / > < = % & \| ^ ! :`| Operator                       |
//! | Normal        | keyword at a word boundary  | Keyword for the whole word     |
//! | InString(q)   | `q`                         | String, back to Normal         |
//! | InString(q)   | anything else               | String                         |
//! | InComment     | anything                    | Comment, to end of line        |
//!
//! Scanning starts at the left edge of the window, so a string or comment
//! that opened to the left of it is not seen.

use std::fmt;

// ---------------------------------------------------------------------------
// Class
// ---------------------------------------------------------------------------

/// What a char is, as far as coloring goes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Class {
    #[default]
    Plain,
    Number,
    String,
    Operator,
    Comment,
    Keyword,
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Plain => "plain",
            Self::Number => "number",
            Self::String => "string",
            Self::Operator => "operator",
            Self::Comment => "comment",
            Self::Keyword => "keyword",
        };
        f.write_str(name)
    }
}

/// Words classed as [`Class::Keyword`]. A loose union of several
/// scripting and C-family languages.
pub const KEYWORDS: &[&str] = &[
    "false", "False", "NaN", "None", "bool", "break", "byte", "case", "catch", "class", "const",
    "continue", "def", "do", "double", "as", "elif", "else", "enum", "eval", "except", "exec",
    "exit", "export", "extends", "extern", "finally", "float", "for", "from", "func", "function",
    "global", "if", "import", "in", "int", "is", "lambda", "nil", "not", "null", "pass", "print",
    "raise", "return", "self", "short", "signed", "sizeof", "static", "struct", "switch", "this",
    "throw", "throws", "true", "True", "try", "typedef", "typeof", "undefined", "union",
    "unsigned", "until", "var", "void", "while", "with", "yield",
];

const OPERATORS: &[char] = &['+', '-', '*', '>', '<', '=', '%', '&', '|', '^', '!', ':'];

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

#[derive(Clone, Copy)]
enum State {
    Normal,
    InString(char),
    InComment,
}

/// Classify chars `start_col..start_col + width` of `line`.
///
/// The result has one entry per char in that window, clipped to the end of
/// the line, so it is empty when `start_col` is past the end.
#[must_use]
pub fn classify(line: &str, start_col: usize, width: usize) -> Vec<Class> {
    let chars: Vec<char> = line.chars().collect();
    let start = start_col.min(chars.len());
    let end = start_col.saturating_add(width).min(chars.len());

    let mut classes = Vec::with_capacity(end - start);
    let mut state = State::Normal;
    let mut i = start;

    while i < end {
        let ch = chars[i];
        match state {
            State::InComment => {
                classes.push(Class::Comment);
                i += 1;
            }
            State::InString(quote) => {
                classes.push(Class::String);
                if ch == quote {
                    state = State::Normal;
                }
                i += 1;
            }
            State::Normal => {
                if ch.is_ascii_digit() {
                    classes.push(Class::Number);
                    i += 1;
                } else if ch == '"' || ch == '\'' {
                    classes.push(Class::String);
                    state = State::InString(ch);
                    i += 1;
                } else if ch == '#' || (ch == '/' && chars.get(i + 1) == Some(&'/')) {
                    classes.push(Class::Comment);
                    state = State::InComment;
                    i += 1;
                } else if ch == '/' || OPERATORS.contains(&ch) {
                    classes.push(Class::Operator);
                    i += 1;
                } else if let Some(len) = keyword_at(&chars, i, start) {
                    let stop = (i + len).min(end);
                    classes.extend(std::iter::repeat_n(Class::Keyword, stop - i));
                    i = stop;
                } else {
                    classes.push(Class::Plain);
                    i += 1;
                }
            }
        }
    }

    classes
}

/// Length of the keyword starting at `chars[i]`, if one does at a word
/// boundary. `scan_start` counts as a boundary on the left.
fn keyword_at(chars: &[char], i: usize, scan_start: usize) -> Option<usize> {
    if i > scan_start && is_ident(chars[i - 1]) {
        return None;
    }
    KEYWORDS.iter().find_map(|kw| {
        let len = kw.chars().count();
        let candidate = chars.get(i..i + len)?;
        let matches = candidate.iter().copied().eq(kw.chars());
        let bounded = chars.get(i + len).is_none_or(|&next| !is_ident(next));
        (matches && bounded).then_some(len)
    })
}

fn is_ident(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
