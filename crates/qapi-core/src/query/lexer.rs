//! A small SPARQL tokenizer.
//!
//! It knows just enough of the grammar to tell keywords, variables, IRIs and
//! literals apart, so that comments and quoted text never leak into query
//! classification or parameter detection.

use crate::error::QueryError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// Keyword, prefixed name, number or boolean.
    Word(&'a str),
    /// A variable. `token` is the text as written, e.g. `?_name`.
    Var { name: &'a str, token: &'a str },
    Iri(&'a str),
    Literal,
    Punct(char),
}

impl Token<'_> {
    pub fn is_keyword(&self, keyword: &str) -> bool {
        matches!(self, Token::Word(w) if w.eq_ignore_ascii_case(keyword))
    }
}

pub fn tokenize(src: &str) -> Result<Vec<Token<'_>>, QueryError> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while let Some(c) = src[pos..].chars().next() {
        if c.is_whitespace() {
            pos += c.len_utf8();
            continue;
        }
        match c {
            '#' => {
                pos = src[pos..].find('\n').map_or(src.len(), |i| pos + i);
            }
            '?' | '$' => {
                let start = pos + 1;
                let end = scan_while(src, start, is_name_char);
                if end == start {
                    tokens.push(Token::Punct(c));
                    pos = start;
                } else {
                    tokens.push(Token::Var {
                        name: &src[start..end],
                        token: &src[pos..end],
                    });
                    pos = end;
                }
            }
            '<' => match iri_end(src, pos + 1) {
                Some(end) => {
                    tokens.push(Token::Iri(&src[pos + 1..end]));
                    pos = end + 1;
                }
                None => {
                    tokens.push(Token::Punct('<'));
                    pos += 1;
                }
            },
            '"' | '\'' => {
                pos = literal_end(src, pos, c)?;
                tokens.push(Token::Literal);
            }
            c if is_name_char(c) || c == ':' => {
                let mut end = scan_while(src, pos, |ch| {
                    is_name_char(ch) || matches!(ch, ':' | '-' | '.')
                });
                // A trailing dot terminates the triple, it is not part of the name.
                while src[pos..end].ends_with('.') {
                    end -= 1;
                }
                tokens.push(Token::Word(&src[pos..end]));
                pos = end;
            }
            other => {
                tokens.push(Token::Punct(other));
                pos += other.len_utf8();
            }
        }
    }

    Ok(tokens)
}

/// Check that `{}`, `()` and `[]` nest properly.
pub fn check_balanced(tokens: &[Token<'_>]) -> Result<(), QueryError> {
    let mut stack = Vec::new();
    for token in tokens {
        if let Token::Punct(c) = token {
            match c {
                '{' | '(' | '[' => stack.push(*c),
                '}' | ')' | ']' => {
                    let open = match c {
                        '}' => '{',
                        ')' => '(',
                        _ => '[',
                    };
                    if stack.pop() != Some(open) {
                        return Err(QueryError::Unbalanced(*c));
                    }
                }
                _ => {}
            }
        }
    }
    match stack.pop() {
        Some(open) => Err(QueryError::Unbalanced(open)),
        None => Ok(()),
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn scan_while(src: &str, start: usize, pred: impl Fn(char) -> bool) -> usize {
    src[start..]
        .char_indices()
        .find(|(_, ch)| !pred(*ch))
        .map_or(src.len(), |(i, _)| start + i)
}

/// Find the closing `>` of an IRI reference, or `None` if `<` is an operator.
///
/// A `<` directly followed by a variable is always a comparison.
fn iri_end(src: &str, start: usize) -> Option<usize> {
    if src[start..].starts_with(['?', '$']) {
        return None;
    }
    for (i, ch) in src[start..].char_indices() {
        match ch {
            '>' => return Some(start + i),
            c if c.is_whitespace() => return None,
            '<' | '"' | '{' | '}' | '|' | '^' | '`' | '\\' => return None,
            _ => {}
        }
    }
    None
}

/// Return the position just past a string literal starting at `start`.
fn literal_end(src: &str, start: usize, quote: char) -> Result<usize, QueryError> {
    let triple: String = std::iter::repeat_n(quote, 3).collect();
    let long = src[start..].starts_with(&triple);
    let mut pos = start + if long { 3 } else { 1 };

    while let Some(c) = src[pos..].chars().next() {
        if c == '\\' {
            pos += 1;
            if let Some(escaped) = src[pos..].chars().next() {
                pos += escaped.len_utf8();
            }
            continue;
        }
        if long {
            if src[pos..].starts_with(&triple) {
                return Ok(pos + 3);
            }
        } else if c == quote {
            return Ok(pos + 1);
        } else if c == '\n' {
            break;
        }
        pos += c.len_utf8();
    }
    Err(QueryError::Unterminated("string literal"))
}
