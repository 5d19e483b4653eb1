use super::*;

/// Advance the character iterator and update line/column tracking
pub(super) fn bump(lexer: &mut Lexer) -> Option<char> {
    let curr = lexer.peek;
    if let Some(c) = curr {
        if c == '\n' {
            lexer.line += 1;
            lexer.column = 0;
        } else {
            lexer.column += 1;
        }
    }
    lexer.peek = lexer.input.next();
    curr
}

/// Skip same-line whitespace and `#` comments. Newlines are tokens.
pub(super) fn skip_whitespace_and_comments(lexer: &mut Lexer) {
    while let Some(c) = lexer.peek {
        match c {
            ' ' | '\t' | '\r' => {
                bump(lexer);
            }
            '#' => {
                // Comment runs to the end of the line; the newline stays
                while let Some(ch) = lexer.peek {
                    if ch == '\n' {
                        break;
                    }
                    bump(lexer);
                }
            }
            _ => break,
        }
    }
}

/// Consume characters up to (not including) the next newline.
pub(super) fn take_line(lexer: &mut Lexer) -> String {
    let mut line = String::new();
    while let Some(c) = lexer.peek {
        if c == '\n' {
            break;
        }
        line.push(c);
        bump(lexer);
    }
    line
}

/// Mark the current position as the start of a token.
pub(super) fn mark_token_start(lexer: &mut Lexer) {
    lexer.token_line = lexer.line;
    lexer.token_column = lexer.column + 1;
}
