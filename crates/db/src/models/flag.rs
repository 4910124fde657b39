//! Strict 0/1 flag storage.
//!
//! Boolean-ish listing columns are SMALLINT in the schema. `Flag` is the
//! single point where Rust booleans are coerced to that representation,
//! so no handler or repository ever writes an ad-hoc `if b { 1 } else { 0 }`
//! and nothing but 0 or 1 can reach a column.

use serde::{Deserialize, Serialize};

/// A stored boolean, guaranteed to be exactly 0 or 1 at the SQL boundary.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct Flag(i16);

impl Flag {
    pub const OFF: Flag = Flag(0);
    pub const ON: Flag = Flag(1);

    pub fn as_bool(self) -> bool {
        self.0 != 0
    }
}

impl From<bool> for Flag {
    fn from(value: bool) -> Self {
        if value { Flag::ON } else { Flag::OFF }
    }
}

impl Default for Flag {
    fn default() -> Self {
        Flag::OFF
    }
}

/// Parse a form-data flag value. Clients send the literal strings
/// `"true"` / `"false"`; anything other than `"true"`/`"1"` is off.
impl From<&str> for Flag {
    fn from(value: &str) -> Self {
        Flag::from(matches!(value, "true" | "1"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_coercion_is_strict_zero_one() {
        assert_eq!(Flag::from(true), Flag::ON);
        assert_eq!(Flag::from(false), Flag::OFF);
        assert!(Flag::ON.as_bool());
        assert!(!Flag::OFF.as_bool());
    }

    #[test]
    fn form_values_parse_the_literal_strings_clients_send() {
        assert_eq!(Flag::from("true"), Flag::ON);
        assert_eq!(Flag::from("1"), Flag::ON);
        assert_eq!(Flag::from("false"), Flag::OFF);
        assert_eq!(Flag::from("yes"), Flag::OFF);
        assert_eq!(Flag::from(""), Flag::OFF);
    }

    #[test]
    fn serializes_as_bare_number() {
        assert_eq!(serde_json::to_string(&Flag::ON).unwrap(), "1");
        assert_eq!(serde_json::to_string(&Flag::OFF).unwrap(), "0");
    }
}
