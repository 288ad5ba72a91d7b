use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::pg::{Pg, PgValue};
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::str::FromStr;
use thiserror::Error;

/// A stored text value that does not name any variant of the expected enum.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind} value: {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

// Declares an enum persisted as TEXT, with its wire spelling given per variant.
macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, AsExpression, FromSqlRow, Serialize, Deserialize,
        )]
        #[diesel(sql_type = Text)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($text => Ok($name::$variant),)+
                    other => Err(UnknownVariant {
                        kind: stringify!($name),
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl ToSql<Text, Pg> for $name {
            fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
                out.write_all(self.as_str().as_bytes())?;
                Ok(IsNull::No)
            }
        }

        impl FromSql<Text, Pg> for $name {
            fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
                let raw = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
                Ok(raw.parse::<$name>()?)
            }
        }
    };
}

text_enum! {
    /// Whether an exam is a self-paced practice run or a proctored live sitting.
    ExamKind {
        Practice => "practice",
        Live => "live",
    }
}

text_enum! {
    QuestionKind {
        Mcq => "mcq",
        Qa => "qa",
    }
}

text_enum! {
    Difficulty {
        Simple => "Simple",
        Difficult => "Difficult",
        Challenging => "Challenging",
    }
}

text_enum! {
    /// Lifecycle of an exam attempt. Only `InProgress` attempts accept answers.
    AttemptStatus {
        InProgress => "in_progress",
        Completed => "completed",
        Abandoned => "abandoned",
    }
}
