use super::*;
use crate::ast::{Attribute, Block, Body, Element};

pub(super) fn parse_document(parser: &mut Parser) -> Result<Document, OclError> {
    let mut body = Body::new();

    loop {
        parser.skip_newlines()?;
        match parser.peek() {
            Some(Token::Eof) | None => break,
            Some(Token::Ident(_)) | Some(Token::Number(_)) => {
                body.push(parse_element(parser)?);
                expect_terminator(parser, false)?;
            }
            Some(_) => {
                return Err(parser.unexpected(
                    "an attribute or block name",
                    "Top-level items are 'name = value' attributes or 'name { ... }' blocks",
                    205,
                ));
            }
        }
    }

    Ok(Document::from(body))
}

fn parse_name(parser: &mut Parser) -> Result<String, OclError> {
    let (line, column) = parser.peek_pos;
    match parser.peek() {
        Some(Token::Ident(_)) | Some(Token::Number(_)) => {}
        _ => return Err(parser.unexpected("a name", "Names use letters, digits, '_' and '-'", 203)),
    }

    match parser.bump()? {
        Token::Ident(name) => Ok(name),
        // Names may consist of digits only
        Token::Number(n) if n.chars().all(|c| c.is_ascii_digit()) => Ok(n),
        other => Err(OclError::parse(
            format!("Invalid name: {}", other.describe()),
            line,
            column,
            Some("Names use letters, digits, '_' and '-'"),
            203,
        )),
    }
}

fn parse_element(parser: &mut Parser) -> Result<Element, OclError> {
    let name = parse_name(parser)?;

    match parser.peek() {
        Some(Token::Equals) => {
            parser.bump()?;
            let value = value::parse_literal(parser)?;
            Ok(Attribute::new(name, value).into())
        }
        Some(Token::String(_)) | Some(Token::LBrace) => parse_block(parser, name).map(Element::from),
        _ => Err(parser.unexpected(
            &format!("'=' or '{{' after '{}'", name),
            "Attributes are written 'name = value'; blocks 'name \"label\" {'",
            204,
        )),
    }
}

fn parse_block(parser: &mut Parser, name: String) -> Result<Block, OclError> {
    let mut labels = Vec::new();
    while let Some(Token::String(_)) = parser.peek() {
        if let Token::String(label) = parser.bump()? {
            labels.push(label);
        }
    }

    parser.expect(Token::LBrace, "A block's '{' must be on the same line as its name")?;

    // `{` directly followed by `}` (whitespace and newlines allowed) is an empty body
    let opened_line = matches!(parser.peek(), Some(Token::Newline));
    parser.skip_newlines()?;
    if let Some(Token::RBrace) = parser.peek() {
        parser.bump()?;
        return Ok(Block::with_parts(name, labels, Body::new()));
    }

    if !opened_line {
        return Err(parser.unexpected(
            "a new line after '{'",
            "The first item in a block starts on the line after '{'",
            206,
        ));
    }

    let mut body = Body::new();
    loop {
        parser.skip_newlines()?;
        match parser.peek() {
            Some(Token::RBrace) => {
                parser.bump()?;
                break;
            }
            Some(Token::Ident(_)) | Some(Token::Number(_)) => {
                body.push(parse_element(parser)?);
                expect_terminator(parser, true)?;
            }
            _ => {
                return Err(parser.unexpected(
                    &format!("an attribute, block or '}}' to close '{}'", name),
                    "Every block needs a closing '}'",
                    207,
                ));
            }
        }
    }

    Ok(Block::with_parts(name, labels, body))
}

/// An element ends at a newline, at end of input, or (inside a block) right
/// before the closing brace.
fn expect_terminator(parser: &mut Parser, in_block: bool) -> Result<(), OclError> {
    match parser.peek() {
        Some(Token::Newline) => {
            parser.bump()?;
            Ok(())
        }
        Some(Token::Eof) | None => Ok(()),
        Some(Token::RBrace) if in_block => Ok(()),
        _ => Err(parser.unexpected(
            "a new line",
            "Put each attribute and block on its own line",
            208,
        )),
    }
}
