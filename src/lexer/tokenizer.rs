use once_cell::sync::Lazy;
use regex::Regex;

use super::*;
use super::scanner::{bump, mark_token_start, skip_whitespace_and_comments, take_line};

static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?[0-9]+(\.[0-9]+)?$").expect("valid number pattern"));
static NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\w[\w-]*$").expect("valid name pattern"));

pub(super) fn next_token(lexer: &mut Lexer) -> Result<Token, OclError> {
    skip_whitespace_and_comments(lexer);
    mark_token_start(lexer);

    match lexer.peek {
        Some('\n') => tokenize_symbol(lexer, Token::Newline),
        Some('=') => tokenize_symbol(lexer, Token::Equals),
        Some('{') => tokenize_symbol(lexer, Token::LBrace),
        Some('}') => tokenize_symbol(lexer, Token::RBrace),
        Some('[') => tokenize_symbol(lexer, Token::LBracket),
        Some(']') => tokenize_symbol(lexer, Token::RBracket),
        Some(',') => tokenize_symbol(lexer, Token::Comma),
        Some('"') => tokenize_string(lexer),
        Some('<') => tokenize_heredoc(lexer),
        Some(c) if is_word_char(c) => tokenize_word(lexer),
        Some(ch) => tokenize_unexpected_char(lexer, ch),
        None => Ok(Token::Eof),
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c == '.'
}

fn tokenize_symbol(lexer: &mut Lexer, token: Token) -> Result<Token, OclError> {
    bump(lexer);
    Ok(token)
}

/// Names and numbers share a character run; the whole run decides which it is.
fn tokenize_word(lexer: &mut Lexer) -> Result<Token, OclError> {
    let (line, column) = lexer.token_start();
    let mut word = String::new();

    while let Some(ch) = lexer.peek {
        if is_word_char(ch) {
            word.push(ch);
            bump(lexer);
        } else {
            break;
        }
    }

    if NUMBER.is_match(&word) {
        Ok(Token::Number(word))
    } else if NAME.is_match(&word) {
        Ok(Token::Ident(word))
    } else {
        Err(OclError::parse(
            format!("Invalid token '{}'", word),
            line,
            column,
            Some("Names use letters, digits, '_' and '-'; numbers look like 42, -7 or 1.25"),
            101,
        ))
    }
}

fn tokenize_string(lexer: &mut Lexer) -> Result<Token, OclError> {
    let (line, column) = lexer.token_start();
    bump(lexer); // opening quote
    let mut content = String::new();

    loop {
        match lexer.peek {
            Some('"') => {
                bump(lexer);
                return Ok(Token::String(content));
            }
            Some('\\') => {
                bump(lexer);
                match bump(lexer) {
                    Some('n') => content.push('\n'),
                    Some('t') => content.push('\t'),
                    Some('r') => content.push('\r'),
                    Some('\\') => content.push('\\'),
                    Some('"') => content.push('"'),
                    Some('\n') | None => break,
                    Some(other) => content.push(other),
                }
            }
            Some('\n') | None => break,
            Some(ch) => {
                content.push(ch);
                bump(lexer);
            }
        }
    }

    Err(OclError::parse(
        "Unterminated string literal",
        line,
        column,
        Some("Close the string with '\"' on the same line, or use a heredoc for multi-line text"),
        102,
    ))
}

fn tokenize_heredoc(lexer: &mut Lexer) -> Result<Token, OclError> {
    let (line, column) = lexer.token_start();
    bump(lexer); // first '<'
    if lexer.peek != Some('<') {
        return Err(OclError::parse(
            "Unexpected character '<'",
            line,
            column,
            Some("Heredocs start with '<<TAG' or '<<-TAG'"),
            104,
        ));
    }
    bump(lexer);

    let indented = lexer.peek == Some('-');
    if indented {
        bump(lexer);
    }

    let mut tag = String::new();
    while let Some(ch) = lexer.peek {
        if ch.is_alphanumeric() || ch == '_' {
            tag.push(ch);
            bump(lexer);
        } else {
            break;
        }
    }
    if tag.is_empty() {
        return Err(OclError::parse(
            "Expected heredoc tag after '<<'",
            lexer.line(),
            lexer.column() + 1,
            Some("Write a tag such as <<EOT"),
            105,
        ));
    }

    let rest = take_line(lexer);
    if !rest.trim().is_empty() || lexer.peek.is_none() {
        return Err(OclError::parse(
            format!("Expected a new line after heredoc tag '{}'", tag),
            lexer.line(),
            lexer.column() + 1,
            Some("Heredoc content starts on the line after the tag"),
            105,
        ));
    }
    bump(lexer); // newline after the tag

    let mut lines: Vec<String> = Vec::new();
    loop {
        if lexer.peek.is_none() {
            return Err(OclError::parse(
                format!("Unterminated heredoc, expected closing tag '{}'", tag),
                lexer.line(),
                lexer.column() + 1,
                Some("End the heredoc with a line containing only its tag"),
                106,
            ));
        }

        let raw = take_line(lexer);
        let text = raw.trim_end_matches('\r');
        if text.trim() == tag {
            let indent = text.chars().take_while(|c| c.is_whitespace()).count();
            let content = if indented {
                lines
                    .iter()
                    .map(|l| strip_indent(l, indent))
                    .collect::<Vec<_>>()
                    .join("\n")
            } else {
                lines.join("\n")
            };
            // The newline after the closing tag is left for the parser
            return Ok(Token::Heredoc { tag, indented, content });
        }

        lines.push(text.to_string());
        bump(lexer);
    }
}

/// Removes up to `width` leading whitespace characters.
fn strip_indent(line: &str, width: usize) -> &str {
    let mut rest = line;
    for _ in 0..width {
        match rest.chars().next() {
            Some(c) if c.is_whitespace() => rest = &rest[c.len_utf8()..],
            _ => break,
        }
    }
    rest
}

fn tokenize_unexpected_char(lexer: &mut Lexer, ch: char) -> Result<Token, OclError> {
    let (line, column) = lexer.token_start();
    bump(lexer);
    Err(OclError::parse(
        format!("Unexpected character '{}'", ch),
        line,
        column,
        Some("Unexpected character in input"),
        103,
    ))
}
