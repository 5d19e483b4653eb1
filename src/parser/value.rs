use super::*;
use crate::ast::StringLiteral;

const VALUE_HINT: &str = "Values are quoted strings, heredocs, numbers, true/false, null or arrays";
const ARRAY_HINT: &str = "Array literals hold only strings, only numbers or only booleans";

pub(super) fn parse_literal(parser: &mut Parser) -> Result<Value, OclError> {
    let (line, column) = parser.peek_pos;

    match parser.peek() {
        Some(Token::String(_)) | Some(Token::Heredoc { .. }) | Some(Token::Number(_)) => {
            scalar_from_token(parser.bump()?, line, column)
        }
        Some(Token::Ident(word)) if is_keyword(word) => scalar_from_token(parser.bump()?, line, column),
        Some(Token::LBracket) => parse_array(parser),
        _ => Err(parser.unexpected("a value", VALUE_HINT, 210)),
    }
}

fn is_keyword(word: &str) -> bool {
    matches!(word, "true" | "false" | "null")
}

fn scalar_from_token(token: Token, line: usize, column: usize) -> Result<Value, OclError> {
    match token {
        Token::String(s) => Ok(Value::String(StringLiteral::new(s))),
        Token::Heredoc { tag, indented: true, content } => {
            Ok(Value::String(StringLiteral::indented_heredoc(content, tag)))
        }
        Token::Heredoc { tag, content, .. } => Ok(Value::String(StringLiteral::heredoc(content, tag))),
        Token::Number(text) => parse_number(&text, line, column),
        Token::Ident(word) if word == "true" => Ok(Value::Bool(true)),
        Token::Ident(word) if word == "false" => Ok(Value::Bool(false)),
        Token::Ident(word) if word == "null" => Ok(Value::Null),
        other => Err(OclError::parse(
            format!("Expected a value, found {}", other.describe()),
            line,
            column,
            Some(VALUE_HINT),
            210,
        )),
    }
}

fn parse_number(text: &str, line: usize, column: usize) -> Result<Value, OclError> {
    if text.contains('.') {
        text.parse::<f64>().map(Value::Float).map_err(|_| {
            OclError::parse(format!("Invalid decimal '{}'", text), line, column, None, 209)
        })
    } else {
        text.parse::<i128>().map(Value::Integer).map_err(|_| {
            OclError::parse(
                format!("Integer literal '{}' is out of range", text),
                line,
                column,
                Some("Integers must fit in 128 bits"),
                209,
            )
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ArrayKind {
    Strings,
    Numbers,
    Bools,
}

impl ArrayKind {
    fn of(token: &Token) -> Option<Self> {
        match token {
            Token::String(_) => Some(ArrayKind::Strings),
            Token::Number(_) => Some(ArrayKind::Numbers),
            Token::Ident(word) if word == "true" || word == "false" => Some(ArrayKind::Bools),
            _ => None,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            ArrayKind::Strings => "string",
            ArrayKind::Numbers => "number",
            ArrayKind::Bools => "boolean",
        }
    }
}

/// Arrays are homogeneous: all quoted strings, all numbers or all booleans.
/// A number array with any decimal entry is read as decimals throughout.
fn parse_array(parser: &mut Parser) -> Result<Value, OclError> {
    parser.bump()?; // consume [
    parser.skip_newlines()?;

    if let Some(Token::RBracket) = parser.peek() {
        parser.bump()?;
        return Ok(Value::Array(Vec::new()));
    }

    let mut kind: Option<ArrayKind> = None;
    let mut items = Vec::new();

    loop {
        parser.skip_newlines()?;
        let (line, column) = parser.peek_pos;

        let item_kind = match parser.peek().and_then(ArrayKind::of) {
            Some(k) => k,
            None => return Err(parser.unexpected("a string, number or boolean array element", ARRAY_HINT, 211)),
        };

        match kind {
            None => kind = Some(item_kind),
            Some(k) if k != item_kind => {
                return Err(OclError::parse(
                    format!(
                        "Mixed-type array literal: expected a {} element, found a {}",
                        k.describe(),
                        item_kind.describe()
                    ),
                    line,
                    column,
                    Some(ARRAY_HINT),
                    212,
                ));
            }
            Some(_) => {}
        }

        items.push(scalar_from_token(parser.bump()?, line, column)?);

        parser.skip_newlines()?;
        match parser.peek() {
            Some(Token::Comma) => {
                parser.bump()?;
            }
            Some(Token::RBracket) => {
                parser.bump()?;
                break;
            }
            _ => return Err(parser.unexpected("',' or ']'", "Separate array elements with ','", 213)),
        }
    }

    let has_decimal = items.iter().any(|v| matches!(v, Value::Float(_)));
    if has_decimal {
        items = items
            .into_iter()
            .map(|v| match v {
                Value::Integer(n) => Value::Float(n as f64),
                other => other,
            })
            .collect();
    }

    Ok(Value::Array(items))
}
