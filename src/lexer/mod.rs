// Author: Dustin Pilgrim
// License: MIT

use std::str::Chars;
use crate::OclError;

mod scanner;
mod tokenizer;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // --- literals ---
    Ident(String),
    /// Raw numeric text, e.g. `42`, `-7`, `1.25`
    Number(String),
    String(String),
    Heredoc {
        tag: String,
        indented: bool,
        content: String,
    },

    // --- structure ---
    Equals,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,

    // --- layout ---
    Newline,
    Eof,
}

impl Token {
    /// Short description used in parse error messages.
    pub fn describe(&self) -> String {
        match self {
            Token::Ident(name) => format!("name '{}'", name),
            Token::Number(n) => format!("number {}", n),
            Token::String(s) => format!("string \"{}\"", s),
            Token::Heredoc { tag, .. } => format!("heredoc <<{}", tag),
            Token::Equals => "'='".into(),
            Token::LBrace => "'{'".into(),
            Token::RBrace => "'}'".into(),
            Token::LBracket => "'['".into(),
            Token::RBracket => "']'".into(),
            Token::Comma => "','".into(),
            Token::Newline => "end of line".into(),
            Token::Eof => "end of input".into(),
        }
    }
}

pub struct Lexer<'a> {
    input: Chars<'a>,
    peek: Option<char>,
    line: usize,
    column: usize,
    token_line: usize,
    token_column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer {
            input: input.chars(),
            peek: None,
            line: 1,
            column: 0,
            token_line: 1,
            token_column: 1,
        };
        lexer.peek = lexer.input.next();
        lexer
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    /// Line and column where the most recent token started.
    pub fn token_start(&self) -> (usize, usize) {
        (self.token_line, self.token_column)
    }

    pub fn next_token(&mut self) -> Result<Token, OclError> {
        tokenizer::next_token(self)
    }
}
