use strum::EnumString;

/// Keywords recognized by the command parser.
///
/// These keywords are case-insensitive and reserved: a word that parses as
/// a keyword is never treated as a table or column name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, strum::Display)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Keyword {
    CreateTable,
    DropTable,
    ListTables,
    Info,
    Help,
    Exit,

    Insert,
    Into,
    Values,
    Select,
    From,
    Where,
    Update,
    Set,
    Delete,
    And,

    True,
    False,
}

impl Keyword {
    pub fn is_bool_literal(self) -> bool {
        matches!(self, Self::True | Self::False)
    }
}
