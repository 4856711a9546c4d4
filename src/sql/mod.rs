pub(crate) mod keyword;
pub(crate) mod lexer;
pub mod parser;
pub mod statement;
