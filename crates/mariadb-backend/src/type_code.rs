//! Column type codes reported by the MariaDB client protocol.
//!
//! Every result column carries a one-byte `enum_field_types` value. Schema
//! inference only looks at which family a code belongs to.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A protocol column type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeCode(pub u8);

impl TypeCode {
    pub const DECIMAL: Self = Self(0);
    pub const TINY: Self = Self(1);
    pub const SHORT: Self = Self(2);
    pub const LONG: Self = Self(3);
    pub const FLOAT: Self = Self(4);
    pub const DOUBLE: Self = Self(5);
    pub const NULL: Self = Self(6);
    pub const TIMESTAMP: Self = Self(7);
    pub const LONGLONG: Self = Self(8);
    pub const INT24: Self = Self(9);
    pub const DATE: Self = Self(10);
    pub const TIME: Self = Self(11);
    pub const DATETIME: Self = Self(12);
    pub const YEAR: Self = Self(13);
    pub const NEWDATE: Self = Self(14);
    pub const VARCHAR: Self = Self(15);
    pub const BIT: Self = Self(16);
    pub const TIMESTAMP2: Self = Self(17);
    pub const DATETIME2: Self = Self(18);
    pub const TIME2: Self = Self(19);
    pub const JSON: Self = Self(245);
    pub const NEWDECIMAL: Self = Self(246);
    pub const ENUM: Self = Self(247);
    pub const SET: Self = Self(248);
    pub const TINY_BLOB: Self = Self(249);
    pub const MEDIUM_BLOB: Self = Self(250);
    pub const LONG_BLOB: Self = Self(251);
    pub const BLOB: Self = Self(252);
    pub const VAR_STRING: Self = Self(253);
    pub const STRING: Self = Self(254);
    pub const GEOMETRY: Self = Self(255);

    /// Floating point, double and (new) decimal columns.
    pub fn is_floating(self) -> bool {
        FLOATING.contains(&self)
    }

    /// Columns whose values carry a calendar date.
    pub fn has_date(self) -> bool {
        DATE_BEARING.contains(&self)
    }

    /// Columns whose values carry a time of day.
    pub fn has_time(self) -> bool {
        TIME_BEARING.contains(&self)
    }

    /// Any date- or time-bearing column.
    pub fn is_temporal(self) -> bool {
        self.has_date() || self.has_time()
    }

    /// Integer family, including YEAR.
    pub fn is_integer(self) -> bool {
        INTEGER.contains(&self)
    }

    /// Single-bit columns, treated as booleans.
    pub fn is_boolean(self) -> bool {
        BOOLEAN.contains(&self)
    }

    /// Character columns, including ENUM and SET.
    pub fn is_character(self) -> bool {
        CHARACTER.contains(&self)
    }

    /// Protocol name of the code, if it is a known one.
    pub fn name(self) -> Option<&'static str> {
        let name = match self.0 {
            0 => "DECIMAL",
            1 => "TINY",
            2 => "SHORT",
            3 => "LONG",
            4 => "FLOAT",
            5 => "DOUBLE",
            6 => "NULL",
            7 => "TIMESTAMP",
            8 => "LONGLONG",
            9 => "INT24",
            10 => "DATE",
            11 => "TIME",
            12 => "DATETIME",
            13 => "YEAR",
            14 => "NEWDATE",
            15 => "VARCHAR",
            16 => "BIT",
            17 => "TIMESTAMP2",
            18 => "DATETIME2",
            19 => "TIME2",
            245 => "JSON",
            246 => "NEWDECIMAL",
            247 => "ENUM",
            248 => "SET",
            249 => "TINY_BLOB",
            250 => "MEDIUM_BLOB",
            251 => "LONG_BLOB",
            252 => "BLOB",
            253 => "VAR_STRING",
            254 => "STRING",
            255 => "GEOMETRY",
            _ => return None,
        };
        Some(name)
    }
}

const FLOATING: &[TypeCode] = &[
    TypeCode::DECIMAL,
    TypeCode::FLOAT,
    TypeCode::DOUBLE,
    TypeCode::NEWDECIMAL,
];

const DATE_BEARING: &[TypeCode] = &[
    TypeCode::TIMESTAMP,
    TypeCode::DATE,
    TypeCode::DATETIME,
    TypeCode::NEWDATE,
    TypeCode::TIMESTAMP2,
    TypeCode::DATETIME2,
];

const TIME_BEARING: &[TypeCode] = &[
    TypeCode::TIMESTAMP,
    TypeCode::TIME,
    TypeCode::DATETIME,
    TypeCode::TIMESTAMP2,
    TypeCode::DATETIME2,
    TypeCode::TIME2,
];

const INTEGER: &[TypeCode] = &[
    TypeCode::TINY,
    TypeCode::SHORT,
    TypeCode::LONG,
    TypeCode::LONGLONG,
    TypeCode::INT24,
    TypeCode::YEAR,
];

const BOOLEAN: &[TypeCode] = &[TypeCode::BIT];

const CHARACTER: &[TypeCode] = &[
    TypeCode::VARCHAR,
    TypeCode::ENUM,
    TypeCode::SET,
    TypeCode::VAR_STRING,
    TypeCode::STRING,
];

impl From<u8> for TypeCode {
    fn from(code: u8) -> Self {
        Self(code)
    }
}

impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name}({})", self.0),
            None => write!(f, "UNKNOWN({})", self.0),
        }
    }
}
