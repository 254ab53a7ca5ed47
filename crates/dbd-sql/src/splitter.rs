//! Statement splitting for change scripts
//!
//! A script body is split on its delimiter only where the delimiter appears
//! in code: never inside a quoted literal or identifier, a comment, or a
//! dollar-quoted body. Which quotes and comments exist is a property of the
//! dialect, see [`LexicalRules`]. Statements holding nothing but whitespace
//! or comments are dropped.

use dbd_core::DelimiterType;

/// Quoting and comment conventions of a dialect.
///
/// Single quotes, double quotes, `--` and `/* */` comments are always
/// recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexicalRules {
    /// `\` escapes the next character inside quoted strings (MySQL)
    pub backslash_escapes: bool,

    /// `#` starts a line comment (MySQL)
    pub hash_comments: bool,

    /// `` `name` `` quotes an identifier (MySQL)
    pub backtick_identifiers: bool,

    /// `[name]` quotes an identifier (SQL Server)
    pub bracket_identifiers: bool,

    /// `$$ ... $$` and `$tag$ ... $tag$` quote a body (PostgreSQL, DuckDB)
    pub dollar_quotes: bool,
}

impl LexicalRules {
    /// Rules with none of the dialect extensions
    pub const ANSI: Self = Self {
        backslash_escapes: false,
        hash_comments: false,
        backtick_identifiers: false,
        bracket_identifiers: false,
        dollar_quotes: false,
    };
}

impl Default for LexicalRules {
    /// Backtick identifiers and dollar quotes, which never clash with
    /// ordinary code in the other dialects
    fn default() -> Self {
        Self {
            backtick_identifiers: true,
            dollar_quotes: true,
            ..Self::ANSI
        }
    }
}

/// Lexical state while scanning a script
#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    Code,
    SingleQuote,
    DoubleQuote,
    Backtick,
    Bracket,
    LineComment,
    BlockComment,
    DollarQuote(String),
}

/// Splits script bodies into individually executable statements.
#[derive(Debug, Clone)]
pub struct StatementSplitter {
    delimiter: String,
    delimiter_type: DelimiterType,
    rules: LexicalRules,
}

impl StatementSplitter {
    /// Create a splitter for `delimiter` in the given style
    pub fn new(delimiter: impl Into<String>, delimiter_type: DelimiterType) -> Self {
        Self {
            delimiter: delimiter.into().trim().to_string(),
            delimiter_type,
            rules: LexicalRules::default(),
        }
    }

    /// Use a dialect's quoting and comment conventions
    pub fn with_rules(mut self, rules: LexicalRules) -> Self {
        self.rules = rules;
        self
    }

    /// The lexical rules in effect
    pub fn rules(&self) -> LexicalRules {
        self.rules
    }

    /// The delimiter token
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// The delimiter style
    pub fn delimiter_type(&self) -> DelimiterType {
        self.delimiter_type
    }

    /// Split `script` into statements, in original order.
    pub fn split(&self, script: &str) -> Vec<String> {
        let chars: Vec<char> = script.chars().collect();
        let delimiter: Vec<char> = self.delimiter.chars().collect();
        let word_delimiter = delimiter.iter().any(|c| is_word_char(*c));

        let mut statements = Vec::new();
        let mut current = String::new();
        let mut has_code = false;
        let mut state = State::Code;
        let mut at_line_start = true;
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            let next = chars.get(i + 1).copied();

            match &state {
                State::Code => {
                    if self.delimiter_type == DelimiterType::Row && at_line_start {
                        let end = line_end(&chars, i);
                        let line: String = chars[i..end].iter().collect();
                        if line.trim().eq_ignore_ascii_case(&self.delimiter) {
                            flush(&mut statements, &mut current, &mut has_code);
                            i = (end + 1).min(chars.len());
                            continue;
                        }
                    }

                    if self.delimiter_type == DelimiterType::Normal
                        && self.is_normal_delimiter(&chars, i, &delimiter, word_delimiter)
                    {
                        flush(&mut statements, &mut current, &mut has_code);
                        i += delimiter.len();
                        at_line_start = false;
                        continue;
                    }

                    match (c, next) {
                        ('-', Some('-')) => {
                            current.push_str("--");
                            state = State::LineComment;
                            i += 2;
                            at_line_start = false;
                            continue;
                        }
                        ('/', Some('*')) => {
                            current.push_str("/*");
                            state = State::BlockComment;
                            i += 2;
                            at_line_start = false;
                            continue;
                        }
                        ('#', _) if self.rules.hash_comments => {
                            current.push('#');
                            state = State::LineComment;
                            i += 1;
                            at_line_start = false;
                            continue;
                        }
                        ('\'', _) => state = State::SingleQuote,
                        ('"', _) => state = State::DoubleQuote,
                        ('`', _) if self.rules.backtick_identifiers => state = State::Backtick,
                        ('[', _) if self.rules.bracket_identifiers => state = State::Bracket,
                        ('$', _) if self.rules.dollar_quotes => {
                            if let Some(tag) = dollar_tag(&chars, i) {
                                current.push_str(&tag);
                                i += tag.chars().count();
                                state = State::DollarQuote(tag);
                                has_code = true;
                                at_line_start = false;
                                continue;
                            }
                        }
                        _ => {}
                    }

                    if !c.is_whitespace() {
                        has_code = true;
                    }
                }
                State::LineComment => {
                    if c == '\n' {
                        state = State::Code;
                    }
                }
                State::BlockComment => {
                    if c == '*' && next == Some('/') {
                        current.push_str("*/");
                        state = State::Code;
                        i += 2;
                        at_line_start = false;
                        continue;
                    }
                }
                State::SingleQuote | State::DoubleQuote => {
                    if c == '\\' && self.rules.backslash_escapes {
                        if let Some(escaped) = next {
                            current.push(c);
                            current.push(escaped);
                            at_line_start = false;
                            i += 2;
                            continue;
                        }
                    }
                    let closing = if state == State::SingleQuote { '\'' } else { '"' };
                    if c == closing {
                        state = State::Code;
                    }
                }
                State::Bracket => {
                    if c == ']' {
                        if next == Some(']') {
                            current.push_str("]]");
                            at_line_start = false;
                            i += 2;
                            continue;
                        }
                        state = State::Code;
                    }
                }
                State::Backtick => {
                    if c == '`' {
                        state = State::Code;
                    }
                }
                State::DollarQuote(tag) => {
                    if starts_with_at(&chars, i, tag) {
                        let len = tag.chars().count();
                        current.push_str(tag);
                        state = State::Code;
                        i += len;
                        at_line_start = false;
                        continue;
                    }
                }
            }

            current.push(c);
            at_line_start = c == '\n';
            i += 1;
        }

        flush(&mut statements, &mut current, &mut has_code);
        statements
    }

    /// A terminating delimiter in normal style.
    ///
    /// Punctuation delimiters split wherever they appear in code. Word
    /// delimiters must stand apart from identifiers and end their line.
    fn is_normal_delimiter(
        &self,
        chars: &[char],
        i: usize,
        delimiter: &[char],
        word_delimiter: bool,
    ) -> bool {
        if delimiter.is_empty() || i + delimiter.len() > chars.len() {
            return false;
        }
        let candidate = &chars[i..i + delimiter.len()];
        let matches = if word_delimiter {
            candidate
                .iter()
                .zip(delimiter)
                .all(|(a, b)| a.eq_ignore_ascii_case(b))
        } else {
            candidate == delimiter
        };
        if !matches {
            return false;
        }
        if !word_delimiter {
            return true;
        }

        let preceded_ok = i == 0 || !is_word_char(chars[i - 1]);
        let rest_blank = chars[i + delimiter.len()..line_end(chars, i)]
            .iter()
            .all(|c| c.is_whitespace());
        preceded_ok && rest_blank
    }
}

fn flush(statements: &mut Vec<String>, current: &mut String, has_code: &mut bool) {
    if *has_code {
        statements.push(current.trim().to_string());
    }
    current.clear();
    *has_code = false;
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Index of the `\n` ending the line containing `i`, or the end of input
fn line_end(chars: &[char], i: usize) -> usize {
    chars[i..]
        .iter()
        .position(|c| *c == '\n')
        .map(|p| i + p)
        .unwrap_or(chars.len())
}

fn starts_with_at(chars: &[char], i: usize, needle: &str) -> bool {
    let mut idx = i;
    for n in needle.chars() {
        if chars.get(idx) != Some(&n) {
            return false;
        }
        idx += 1;
    }
    true
}

/// Opening dollar-quote tag at `i` (`$$` or `$name$`), if any
fn dollar_tag(chars: &[char], i: usize) -> Option<String> {
    if i > 0 && is_word_char(chars[i - 1]) {
        return None;
    }
    let mut tag = String::from("$");
    let mut j = i + 1;
    while let Some(&c) = chars.get(j) {
        if c == '$' {
            tag.push('$');
            return Some(tag);
        }
        let valid = if j == i + 1 {
            c.is_alphabetic() || c == '_'
        } else {
            is_word_char(c)
        };
        if !valid {
            return None;
        }
        tag.push(c);
        j += 1;
    }
    None
}

#[cfg(test)]
#[path = "splitter_test.rs"]
mod tests;
