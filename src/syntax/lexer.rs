//! Command-line tokenizer.
//!
//! Splits RPL input into words. Quoted algebraics (`'x+1'`) and
//! parenthesized complex literals (`(1, 2)`) stay single tokens even when
//! they contain spaces; program delimiters `«` `»` (or `<<` `>>`) are tokens
//! of their own.

use crate::runtime::error::{Result, RuntimeError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Literal, command name or bare symbol.
    Word(String),
    /// Contents of a `'...'` algebraic, without the quotes.
    Quoted(String),
    ProgramStart,
    ProgramEnd,
}

pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, position: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    fn current_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn read_char(&mut self) -> Option<char> {
        let ch = self.current_char()?;
        self.position += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while self.current_char().is_some_and(char::is_whitespace) {
            self.read_char();
        }
    }

    /// Length of a program delimiter at the cursor, if any.
    fn delimiter(&self) -> Option<(Token, usize)> {
        let rest = self.rest();
        if rest.starts_with('«') {
            Some((Token::ProgramStart, '«'.len_utf8()))
        } else if rest.starts_with('»') {
            Some((Token::ProgramEnd, '»'.len_utf8()))
        } else if rest.starts_with("<<") {
            Some((Token::ProgramStart, 2))
        } else if rest.starts_with(">>") {
            Some((Token::ProgramEnd, 2))
        } else {
            None
        }
    }

    fn error(&self, message: &str) -> RuntimeError {
        RuntimeError::syntax(message, self.input)
    }

    fn read_quoted(&mut self) -> Result<Token> {
        self.read_char();
        let start = self.position;
        loop {
            match self.read_char() {
                Some('\'') => {
                    let text = &self.input[start..self.position - 1];
                    return Ok(Token::Quoted(text.trim().to_string()));
                }
                Some(_) => {}
                None => return Err(self.error("unterminated algebraic")),
            }
        }
    }

    fn read_word(&mut self) -> Result<Token> {
        let start = self.position;
        let mut depth = 0usize;
        while let Some(ch) = self.current_char() {
            if depth == 0 && (ch.is_whitespace() || self.delimiter().is_some()) {
                break;
            }
            match ch {
                '(' => depth += 1,
                ')' if depth == 0 => return Err(self.error("unbalanced parenthesis")),
                ')' => depth -= 1,
                _ => {}
            }
            self.read_char();
        }
        if depth > 0 {
            return Err(self.error("unbalanced parenthesis"));
        }
        let word: String = self.input[start..self.position]
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        Ok(Token::Word(word))
    }

    pub fn next_token(&mut self) -> Result<Option<Token>> {
        self.skip_whitespace();
        let Some(ch) = self.current_char() else {
            return Ok(None);
        };
        if let Some((token, len)) = self.delimiter() {
            self.position += len;
            return Ok(Some(token));
        }
        if ch == '\'' {
            return self.read_quoted().map(Some);
        }
        self.read_word().map(Some)
    }
}

/// Splits a whole command line.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token()? {
        tokens.push(token);
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str) -> Token {
        Token::Word(text.to_string())
    }

    #[test]
    fn words_split_on_whitespace() {
        assert_eq!(
            tokenize("1 2  +\n3.5").unwrap(),
            vec![word("1"), word("2"), word("+"), word("3.5")]
        );
    }

    #[test]
    fn quoted_algebraics_keep_spaces() {
        assert_eq!(
            tokenize("'x + 1' EVAL").unwrap(),
            vec![Token::Quoted("x + 1".into()), word("EVAL")]
        );
        assert!(tokenize("'x + 1").is_err());
    }

    #[test]
    fn complex_literals_are_one_word() {
        assert_eq!(tokenize("(1, 2) ABS").unwrap(), vec![word("(1,2)"), word("ABS")]);
        assert!(tokenize("(1,2").is_err());
    }

    #[test]
    fn program_delimiters_split_adjacent_words() {
        assert_eq!(
            tokenize("«1 +» <<DUP>>").unwrap(),
            vec![
                Token::ProgramStart,
                word("1"),
                word("+"),
                Token::ProgramEnd,
                Token::ProgramStart,
                word("DUP"),
                Token::ProgramEnd,
            ]
        );
    }
}
