use std::iter::Peekable;

use miette::{LabeledSpan, Report, Result, SourceSpan, miette};

use crate::{
    core::types::Value,
    db::{predicate::Predicate, table::ColumnDef},
    sql::{
        keyword::Keyword,
        lexer::{Lexer, Token},
        statement::Command,
    },
};

/// Parses one command line.
pub fn parse_command(input: &str) -> Result<Command> {
    CommandParser::new(input).parse()
}

/// Command parser that turns tokens into a [`Command`].
///
/// Uses recursive descent over a peekable token stream. Errors carry a
/// labelled span into the input, so callers can attach the source with
/// [`Report::with_source_code`].
pub struct CommandParser<'src> {
    /// Token stream from the lexer
    lexer: Peekable<Lexer<'src>>,

    /// Length of the input, used to point at the end of the line.
    end: usize,
}

impl<'src> CommandParser<'src> {
    /// Creates a new parser for the given command string.
    pub fn new(input: &'src str) -> Self {
        Self {
            lexer: Lexer::new(input).peekable(),
            end: input.len(),
        }
    }

    /// Parses the whole input as a single command.
    pub fn parse(&mut self) -> Result<Command> {
        let (token, span) = self.next_token()?;

        let Token::Keyword(keyword) = token else {
            return Err(unexpected(&token, span, "a command"));
        };

        let command = match keyword {
            Keyword::CreateTable => self.parse_create_table()?,
            Keyword::DropTable => Command::DropTable {
                name: self.expect_identifier()?.to_owned(),
            },
            Keyword::ListTables => Command::ListTables,
            Keyword::Insert => self.parse_insert()?,
            Keyword::Select => self.parse_select()?,
            Keyword::Update => self.parse_update()?,
            Keyword::Delete => self.parse_delete()?,
            Keyword::Info => Command::Info {
                table: self.expect_identifier()?.to_owned(),
            },
            Keyword::Help => Command::Help,
            Keyword::Exit => Command::Exit,
            _ => {
                return Err(miette!(
                    labels = vec![LabeledSpan::at(span, "not a command")],
                    help = "Type `help` to list the available commands",
                    "Unknown command `{keyword}`"
                ));
            }
        };

        self.expect_end()?;
        Ok(command)
    }

    fn parse_create_table(&mut self) -> Result<Command> {
        let name = self.expect_identifier()?.to_owned();

        let mut columns = Vec::new();
        while self.lexer.peek().is_some() {
            let column = self.expect_identifier()?;
            self.expect_token(Token::Colon)?;
            let (type_name, type_span) = self.expect_identifier_spanned()?;

            let def = ColumnDef::typed(column, type_name).map_err(|err| {
                miette!(
                    labels = vec![LabeledSpan::at(type_span, "unsupported type")],
                    help = "Supported types are int, str and bool",
                    "{err}"
                )
            })?;
            columns.push(def);
        }

        if columns.is_empty() {
            return Err(miette!(
                labels = vec![LabeledSpan::at_offset(self.end, "columns go here")],
                help = "Example: create_table users name:str age:int",
                "create_table needs at least one <name>:<type> column"
            ));
        }

        Ok(Command::CreateTable { name, columns })
    }

    fn parse_insert(&mut self) -> Result<Command> {
        self.expect_keyword(Keyword::Into)?;
        let table = self.expect_identifier()?.to_owned();
        self.expect_keyword(Keyword::Values)?;
        self.expect_token(Token::LeftParen)?;

        let mut values = vec![self.parse_value()?];
        while self.consume_if(Token::Comma) {
            values.push(self.parse_value()?);
        }

        self.expect_token(Token::RightParen)?;

        Ok(Command::Insert { table, values })
    }

    fn parse_select(&mut self) -> Result<Command> {
        self.expect_keyword(Keyword::From)?;
        let table = self.expect_identifier()?.to_owned();

        let predicate = if self.consume_if(Token::Keyword(Keyword::Where)) {
            Some(self.parse_predicate()?)
        } else {
            None
        };

        Ok(Command::Select { table, predicate })
    }

    fn parse_update(&mut self) -> Result<Command> {
        let table = self.expect_identifier()?.to_owned();
        self.expect_keyword(Keyword::Set)?;

        let mut assignments = vec![self.parse_assignment()?];
        while self.consume_if(Token::Comma) {
            assignments.push(self.parse_assignment()?);
        }

        self.expect_keyword(Keyword::Where)?;
        let predicate = self.parse_predicate()?;

        Ok(Command::Update {
            table,
            assignments,
            predicate,
        })
    }

    fn parse_delete(&mut self) -> Result<Command> {
        self.expect_keyword(Keyword::From)?;
        let table = self.expect_identifier()?.to_owned();
        self.expect_keyword(Keyword::Where)?;
        let predicate = self.parse_predicate()?;

        Ok(Command::Delete { table, predicate })
    }

    /// `<col>=<val> [and <col>=<val>]...`
    fn parse_predicate(&mut self) -> Result<Predicate> {
        let mut predicate = Predicate::new();

        loop {
            let (column, value) = self.parse_assignment()?;
            predicate = predicate.and(&column, value);

            if !self.consume_if(Token::Keyword(Keyword::And)) {
                break;
            }
        }

        Ok(predicate)
    }

    fn parse_assignment(&mut self) -> Result<(String, Value)> {
        let column = self.expect_identifier()?.to_owned();
        self.expect_token(Token::Equal)?;
        let value = self.parse_value()?;

        Ok((column, value))
    }

    fn parse_value(&mut self) -> Result<Value> {
        let (token, span) = self.next_token()?;

        let value = match token {
            Token::String(s) => Value::Text(s.to_owned()),
            Token::Integer(i) => Value::Integer(i),
            Token::Keyword(kw) if kw.is_bool_literal() => Value::Boolean(kw == Keyword::True),
            other => {
                return Err(miette!(
                    labels = vec![LabeledSpan::at(span, "expected a value")],
                    help = "Values are double-quoted strings, integers, true or false",
                    "Unexpected {other}"
                ));
            }
        };

        Ok(value)
    }

    fn next_token(&mut self) -> Result<(Token<'src>, SourceSpan)> {
        match self.lexer.next() {
            Some(token) => token,
            None => Err(miette!(
                labels = vec![LabeledSpan::at_offset(self.end, "input ends here")],
                "Unexpected end of command"
            )),
        }
    }

    fn consume_if(&mut self, expected: Token) -> bool {
        let matched = matches!(self.lexer.peek(), Some(Ok((token, _))) if *token == expected);
        if matched {
            self.lexer.next();
        }
        matched
    }

    fn expect_token(&mut self, expected: Token) -> Result<SourceSpan> {
        let (token, span) = self.next_token()?;
        if token == expected {
            Ok(span)
        } else {
            Err(unexpected(&token, span, &expected.to_string()))
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<SourceSpan> {
        self.expect_token(Token::Keyword(keyword))
    }

    fn expect_identifier_spanned(&mut self) -> Result<(&'src str, SourceSpan)> {
        match self.next_token()? {
            (Token::Identifier(name), span) => Ok((name, span)),
            (token, span) => Err(unexpected(&token, span, "a name")),
        }
    }

    fn expect_identifier(&mut self) -> Result<&'src str> {
        self.expect_identifier_spanned().map(|(name, _)| name)
    }

    fn expect_end(&mut self) -> Result<()> {
        match self.lexer.next() {
            None => Ok(()),
            Some(Err(err)) => Err(err),
            Some(Ok((token, span))) => Err(unexpected(&token, span, "end of command")),
        }
    }
}

fn unexpected(found: &Token, span: SourceSpan, expected: &str) -> Report {
    miette!(
        labels = vec![LabeledSpan::at(span, format!("expected {expected}"))],
        "Unexpected {found}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DataType;

    #[test]
    fn test_parse_create_table() {
        let command = parse_command("create_table users name:str age:int active:bool").unwrap();

        assert_eq!(
            command,
            Command::CreateTable {
                name: "users".to_string(),
                columns: vec![
                    ColumnDef::new("name", DataType::Str),
                    ColumnDef::new("age", DataType::Int),
                    ColumnDef::new("active", DataType::Bool),
                ],
            }
        );
    }

    #[test]
    fn test_parse_create_table_errors() {
        assert!(parse_command("create_table users").is_err());
        assert!(parse_command("create_table users score:float").is_err());
        assert!(parse_command("create_table users score").is_err());
    }

    #[test]
    fn test_parse_insert() {
        let command = parse_command(r#"INSERT INTO users VALUES ("Alice", 30, false)"#).unwrap();

        assert_eq!(
            command,
            Command::Insert {
                table: "users".to_string(),
                values: vec!["Alice".into(), Value::Integer(30), Value::Boolean(false)],
            }
        );
    }

    #[test]
    fn test_parse_select_with_and_without_where() {
        assert_eq!(
            parse_command("select from users").unwrap(),
            Command::Select {
                table: "users".to_string(),
                predicate: None,
            }
        );

        assert_eq!(
            parse_command(r#"select from users where name = "Bob" and age = 4"#).unwrap(),
            Command::Select {
                table: "users".to_string(),
                predicate: Some(Predicate::new().and("name", "Bob").and("age", 4_i64)),
            }
        );
    }

    #[test]
    fn test_parse_update() {
        let command = parse_command(r#"update users set age=31, active=true where name="Alice""#)
            .unwrap();

        assert_eq!(
            command,
            Command::Update {
                table: "users".to_string(),
                assignments: vec![
                    ("age".to_string(), Value::Integer(31)),
                    ("active".to_string(), Value::Boolean(true)),
                ],
                predicate: Predicate::new().and("name", "Alice"),
            }
        );
    }

    #[test]
    fn test_update_and_delete_require_where() {
        assert!(parse_command("update users set age=1").is_err());
        assert!(parse_command("delete from users").is_err());
    }

    #[test]
    fn test_parse_delete_and_simple_commands() {
        assert_eq!(
            parse_command("delete from users where ID=2").unwrap(),
            Command::Delete {
                table: "users".to_string(),
                predicate: Predicate::new().and("ID", 2_i64),
            }
        );
        assert_eq!(parse_command("list_tables").unwrap(), Command::ListTables);
        assert_eq!(
            parse_command("info users").unwrap(),
            Command::Info {
                table: "users".to_string()
            }
        );
        assert_eq!(
            parse_command("drop_table users").unwrap(),
            Command::DropTable {
                name: "users".to_string()
            }
        );
        assert_eq!(parse_command("HELP").unwrap(), Command::Help);
        assert_eq!(parse_command("exit").unwrap(), Command::Exit);
    }

    #[test]
    fn test_trailing_tokens_rejected() {
        assert!(parse_command("list_tables now").is_err());
        assert!(parse_command("exit 1").is_err());
    }

    #[test]
    fn test_error_points_at_offending_token() {
        let err = parse_command("select users").unwrap_err();
        let labels: Vec<LabeledSpan> = err.labels().unwrap().collect();

        assert_eq!(labels[0].offset(), 7);
        assert_eq!(labels[0].len(), 5);
    }

    #[test]
    fn test_unknown_command() {
        assert!(parse_command("frobnicate users").is_err());
        assert!(parse_command("where a=1").is_err());
        assert!(parse_command("").is_err());
    }
}
