//! Route pattern parsing and matching.
//!
//! A pattern is literal text with named placeholders: `/hello/{name}`,
//! `/files/{stem}.txt`. A placeholder captures one or more characters of a single
//! path segment (it never crosses a `/`), everything else must match exactly.

use crate::PathParams;
use crate::router::RegistrationError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Param(String),
}

/// A parsed route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    tokens: Vec<Token>,
}

impl PathPattern {
    pub fn parse(raw: impl Into<String>) -> Result<Self, RegistrationError> {
        let raw = raw.into();
        let invalid = |reason: &str| RegistrationError::invalid_pattern(&raw, reason);

        let mut tokens = Vec::new();
        let mut literal = String::new();
        let mut chars = raw.chars();

        while let Some(c) = chars.next() {
            match c {
                '{' => {
                    let mut name = String::new();
                    let closed = chars.by_ref().any(|c| {
                        if c == '}' {
                            return true;
                        }
                        name.push(c);
                        false
                    });

                    if !closed {
                        return Err(invalid("unclosed `{`"));
                    }
                    if !is_identifier(&name) {
                        return Err(invalid("placeholder name must be an identifier"));
                    }
                    if tokens.iter().any(|t| matches!(t, Token::Param(n) if *n == name)) {
                        return Err(invalid("duplicated placeholder name"));
                    }

                    if literal.is_empty() {
                        if matches!(tokens.last(), Some(Token::Param(_))) {
                            return Err(invalid("placeholders must be separated by literal text"));
                        }
                    } else {
                        tokens.push(Token::Literal(std::mem::take(&mut literal)));
                    }
                    tokens.push(Token::Param(name));
                }
                '}' => return Err(invalid("unmatched `}`")),
                c => literal.push(c),
            }
        }

        if !literal.is_empty() {
            tokens.push(Token::Literal(literal));
        }

        Ok(Self { raw, tokens })
    }

    /// The pattern as it was registered
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Names of the placeholders, in pattern order
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().filter_map(|t| match t {
            Token::Param(name) => Some(name.as_str()),
            Token::Literal(_) => None,
        })
    }

    /// Matches the whole `path`, returning the captured placeholders.
    pub fn matches(&self, path: &str) -> Option<PathParams> {
        let mut captures = Vec::with_capacity(self.tokens.len());
        if !match_tokens(&self.tokens, path, &mut captures) {
            return None;
        }
        Some(captures.into_iter().collect())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_alphabetic() || c == '_') && chars.all(|c| c.is_alphanumeric() || c == '_')
}

// a placeholder takes the shortest capture that lets the rest of the pattern match
fn match_tokens<'t, 'p>(tokens: &'t [Token], path: &'p str, captures: &mut Vec<(&'t str, &'p str)>) -> bool {
    match tokens.split_first() {
        None => path.is_empty(),

        Some((Token::Literal(literal), rest)) => {
            path.strip_prefix(literal.as_str()).is_some_and(|tail| match_tokens(rest, tail, captures))
        }

        Some((Token::Param(name), rest)) => {
            let segment_end = path.find('/').unwrap_or(path.len());
            for end in (1..=segment_end).filter(|&i| path.is_char_boundary(i)) {
                captures.push((name.as_str(), &path[..end]));
                if match_tokens(rest, &path[end..], captures) {
                    return true;
                }
                captures.pop();
            }
            false
        }
    }
}
