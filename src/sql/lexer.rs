use miette::{LabeledSpan, Result, SourceSpan, miette};

use crate::sql::keyword::Keyword;

#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    Keyword(Keyword),
    Identifier(&'a str),
    Integer(i64),
    String(&'a str),

    Comma,
    Equal,
    Colon,

    LeftParen,
    RightParen,
}

impl std::fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Keyword(kw) => write!(f, "keyword `{kw}`"),
            Token::Identifier(name) => write!(f, "name `{name}`"),
            Token::Integer(i) => write!(f, "integer {i}"),
            Token::String(s) => write!(f, "string \"{s}\""),
            Token::Comma => write!(f, "`,`"),
            Token::Equal => write!(f, "`=`"),
            Token::Colon => write!(f, "`:`"),
            Token::LeftParen => write!(f, "`(`"),
            Token::RightParen => write!(f, "`)`"),
        }
    }
}

/// Whether `c` can begin a table or column name.
pub(crate) fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Whether `c` can appear after the first character of a name.
pub(crate) fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Splits one command line into tokens, each with its byte span.
pub(crate) struct Lexer<'a> {
    pub rest: &'a str,
    pub position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            rest: input,
            position: 0,
        }
    }

    fn advance(&mut self, len: usize) -> SourceSpan {
        let span = SourceSpan::from(self.position..self.position + len);
        self.position += len;
        self.rest = &self.rest[len..];
        span
    }

    fn skip_whitespace(&mut self) {
        let non_whitespace_pos = self
            .rest
            .char_indices()
            .find(|(_, ch)| !ch.is_whitespace())
            .map(|(pos, _)| pos)
            .unwrap_or(self.rest.len());

        self.advance(non_whitespace_pos);
    }

    fn consume_word(&mut self) -> (&'a str, SourceSpan) {
        let word_end = self
            .rest
            .find(|c: char| !is_identifier_char(c))
            .unwrap_or(self.rest.len());

        let word = &self.rest[..word_end];
        (word, self.advance(word_end))
    }

    fn consume_string(&mut self) -> Result<(&'a str, SourceSpan)> {
        let Some(close) = self.rest[1..].find('"') else {
            let span = SourceSpan::from(self.position..self.position + self.rest.len());
            return Err(miette!(
                labels = vec![LabeledSpan::at(span, "string starts here")],
                "Unterminated string literal"
            ));
        };

        let string_value = &self.rest[1..close + 1];
        Ok((string_value, self.advance(close + 2)))
    }

    fn consume_integer(&mut self) -> Result<(i64, SourceSpan)> {
        let sign_len = usize::from(self.rest.starts_with('-'));
        let number_end = self.rest[sign_len..]
            .find(|c: char| !c.is_ascii_digit())
            .map(|end| end + sign_len)
            .unwrap_or(self.rest.len());

        let number_str = &self.rest[..number_end];
        let span = self.advance(number_end);

        number_str.parse::<i64>().map(|n| (n, span)).map_err(|_| {
            miette!(
                labels = vec![LabeledSpan::at(span, "not a 64-bit integer")],
                "Invalid integer: {number_str}"
            )
        })
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<(Token<'a>, SourceSpan)>;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_whitespace();

        let char = self.rest.chars().next()?;

        let token = match char {
            ',' => Ok((Token::Comma, self.advance(1))),
            '=' => Ok((Token::Equal, self.advance(1))),
            ':' => Ok((Token::Colon, self.advance(1))),
            '(' => Ok((Token::LeftParen, self.advance(1))),
            ')' => Ok((Token::RightParen, self.advance(1))),
            '"' => self
                .consume_string()
                .map(|(value, span)| (Token::String(value), span)),
            '-' if self.rest[1..].starts_with(|c: char| c.is_ascii_digit()) => self
                .consume_integer()
                .map(|(value, span)| (Token::Integer(value), span)),
            _ if char.is_ascii_digit() => self
                .consume_integer()
                .map(|(value, span)| (Token::Integer(value), span)),
            _ if is_identifier_start(char) => {
                let (word, span) = self.consume_word();

                match word.parse::<Keyword>() {
                    Ok(keyword) => Ok((Token::Keyword(keyword), span)),
                    Err(_) => Ok((Token::Identifier(word), span)),
                }
            }
            _ => {
                let span = self.advance(char.len_utf8());
                Err(miette!(
                    labels = vec![LabeledSpan::at(span, "here")],
                    "Unexpected character '{char}'"
                ))
            }
        };

        Some(token)
    }
}
