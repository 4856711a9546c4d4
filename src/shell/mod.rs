//! Interactive command loop.
//!
//! Reads one command per line, runs it against a [`Database`] and prints
//! the outcome. Errors are reported and the loop carries on; only `exit`
//! or the end of input stops it.

use std::io::{BufRead, Write};

use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme, IntoDiagnostic, Result};
use tracing::debug;

use crate::{
    db::database::{Database, Outcome},
    sql::{parser::parse_command, statement::Command},
    storage::Storage,
};

pub mod format;

pub const HELP: &str = "\
Commands:
  create_table <name> <column:type> ...    create a table (types: int, str, bool)
  drop_table <name>                        drop a table and its records
  list_tables                              list all tables
  info <name>                              show a table's columns and record count
  insert into <name> values (<v1>, ...)    add a record
  select from <name> [where <col>=<v>]     show matching records
  update <name> set <col>=<v>[, ...] where <col>=<v>
                                           change matching records
  delete from <name> where <col>=<v>       remove matching records
  help                                     show this message
  exit                                     leave the shell

Conditions can be joined with `and`. Values are \"double-quoted\" strings,
integers, true or false.
";

const PROMPT: &str = ">>> ";

/// How a single line ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStatus {
    /// The command ran, or the line was empty.
    Done,

    /// The line did not parse or the command failed. The error was printed.
    Failed,

    /// A destructive command was not confirmed.
    Cancelled,

    /// `exit` was entered.
    Exit,
}

/// Line-oriented shell over any reader and writer.
pub struct Shell<S: Storage, R: BufRead, W: Write> {
    db: Database<S>,
    input: R,
    output: W,
    confirm_destructive: bool,
    reporter: GraphicalReportHandler,
}

impl<S: Storage, R: BufRead, W: Write> Shell<S, R, W> {
    pub fn new(db: Database<S>, input: R, output: W) -> Self {
        Self {
            db,
            input,
            output,
            confirm_destructive: true,
            reporter: GraphicalReportHandler::new(),
        }
    }

    /// Whether `drop_table` and `delete` ask for confirmation first.
    pub fn confirm_destructive(mut self, confirm: bool) -> Self {
        self.confirm_destructive = confirm;
        self
    }

    /// Renders errors without colour or unicode decoration.
    pub fn plain(mut self) -> Self {
        self.reporter = GraphicalReportHandler::new_themed(GraphicalTheme::ascii());
        self
    }

    /// Runs until `exit` or end of input.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.output.write_all(PROMPT.as_bytes()).into_diagnostic()?;
            self.output.flush().into_diagnostic()?;

            let Some(line) = self.read_line()? else {
                writeln!(self.output).into_diagnostic()?;
                break;
            };

            if self.execute_line(&line)? == LineStatus::Exit {
                break;
            }
        }

        Ok(())
    }

    /// Parses and runs one line, printing its outcome or error.
    ///
    /// Only failures to write output are returned as errors; a failed command
    /// is reported as [`LineStatus::Failed`].
    pub fn execute_line(&mut self, line: &str) -> Result<LineStatus> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(LineStatus::Done);
        }

        let command = match parse_command(line) {
            Ok(command) => command,
            Err(err) => {
                let report = err.with_source_code(line.to_owned());
                self.report(&*report)?;
                return Ok(LineStatus::Failed);
            }
        };

        if command == Command::Exit {
            return Ok(LineStatus::Exit);
        }

        if self.confirm_destructive && command.is_destructive() && !self.confirm(line)? {
            writeln!(self.output, "Operation cancelled.").into_diagnostic()?;
            return Ok(LineStatus::Cancelled);
        }

        debug!(command = ?command, "executing");
        match self.db.execute(command) {
            Ok(Outcome::Exit) => Ok(LineStatus::Exit),
            Ok(outcome) => {
                writeln!(self.output, "{}", format::render_outcome(&outcome)).into_diagnostic()?;
                Ok(LineStatus::Done)
            }
            Err(err) => {
                self.report(&err)?;
                Ok(LineStatus::Failed)
            }
        }
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut buf = String::new();
        let read = self.input.read_line(&mut buf).into_diagnostic()?;
        Ok((read > 0).then_some(buf))
    }

    fn confirm(&mut self, line: &str) -> Result<bool> {
        let action = line.split_whitespace().next().unwrap_or(line);
        write!(self.output, "Are you sure you want to run \"{action}\"? [y/n]: ")
            .into_diagnostic()?;
        self.output.flush().into_diagnostic()?;

        let answer = self.read_line()?.unwrap_or_default();
        Ok(answer.trim().eq_ignore_ascii_case("y"))
    }

    fn report(&mut self, diagnostic: &dyn Diagnostic) -> Result<()> {
        let mut rendered = String::new();
        if self
            .reporter
            .render_report(&mut rendered, diagnostic)
            .is_err()
        {
            rendered = diagnostic.to_string();
        }

        write!(self.output, "{rendered}").into_diagnostic()?;
        if !rendered.ends_with('\n') {
            writeln!(self.output).into_diagnostic()?;
        }
        Ok(())
    }
}
