// Author: Dustin Pilgrim
// License: MIT

use crate::lexer::{Lexer, Token};
use crate::OclError;
use crate::ast::{Document, Value};

mod document;
mod value;

/// Parse OCL source text into a [`Document`].
///
/// Parsing stops at the first error; no partial tree is returned.
pub fn parse(input: &str) -> Result<Document, OclError> {
    tracing::debug!(bytes = input.len(), "parsing OCL document");
    let document = Parser::new(input)?.parse_document()?;
    tracing::trace!(elements = document.body().len(), "parsed OCL document");
    Ok(document)
}

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    peek: Option<Token>,
    peek_pos: (usize, usize),
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Result<Self, OclError> {
        let mut lexer = Lexer::new(input);
        let peek = Some(lexer.next_token()?);
        let peek_pos = lexer.token_start();
        Ok(Self {
            lexer,
            peek,
            peek_pos,
        })
    }

    pub(crate) fn bump(&mut self) -> Result<Token, OclError> {
        let (line, column) = self.peek_pos;
        let curr = self.peek.take().ok_or_else(|| {
            OclError::parse("Unexpected end of input", line, column, None, 201)
        })?;
        if curr != Token::Eof {
            self.peek = Some(self.lexer.next_token()?);
            self.peek_pos = self.lexer.token_start();
        } else {
            self.peek = Some(Token::Eof);
        }
        Ok(curr)
    }

    pub(crate) fn peek(&self) -> Option<&Token> {
        self.peek.as_ref()
    }

    /// Consume the next token if it equals `expected`, otherwise fail with
    /// an error describing what was found instead.
    pub(crate) fn expect(&mut self, expected: Token, hint: &str) -> Result<Token, OclError> {
        if self.peek() == Some(&expected) {
            return self.bump();
        }
        Err(self.unexpected(&expected.describe(), hint, 202))
    }

    /// Builds an error for the token currently under the cursor.
    pub(crate) fn unexpected(&self, expected: &str, hint: &str, code: u32) -> OclError {
        let (line, column) = self.peek_pos;
        let found = match self.peek() {
            Some(Token::Eof) | None => return OclError::parse(
                format!("Unexpected end of input, expected {}", expected),
                line,
                column,
                Some(hint),
                201,
            ),
            Some(tok) => tok.describe(),
        };
        OclError::parse(
            format!("Expected {}, found {}", expected, found),
            line,
            column,
            Some(hint),
            code,
        )
    }

    pub(crate) fn skip_newlines(&mut self) -> Result<(), OclError> {
        while let Some(Token::Newline) = self.peek() {
            self.bump()?;
        }
        Ok(())
    }

    pub fn parse_document(&mut self) -> Result<Document, OclError> {
        document::parse_document(self)
    }

    pub fn parse_value(&mut self) -> Result<Value, OclError> {
        value::parse_literal(self)
    }
}
