use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A selectable conversational identity.
///
/// The persona drives both the client-side presentation and the naming of
/// the real-time room a conversation runs in. The set is closed: anything
/// outside it is rejected at the API boundary rather than defaulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    Adina,
    Rafa,
}

impl Persona {
    /// All recognized personas.
    pub const ALL: [Persona; 2] = [Persona::Adina, Persona::Rafa];

    /// Returns the lowercase wire label for this persona.
    pub fn as_str(self) -> &'static str {
        match self {
            Persona::Adina => "adina",
            Persona::Rafa => "rafa",
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognized persona label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized persona: {0:?}")]
pub struct ParsePersonaError(pub String);

impl FromStr for Persona {
    type Err = ParsePersonaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "adina" => Ok(Persona::Adina),
            "rafa" => Ok(Persona::Rafa),
            other => Err(ParsePersonaError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_recognized_label() {
        for persona in Persona::ALL {
            assert_eq!(persona.as_str().parse::<Persona>(), Ok(persona));
        }
    }

    #[test]
    fn rejects_unknown_labels() {
        assert!("gabriel".parse::<Persona>().is_err());
        assert!("".parse::<Persona>().is_err());
        // Labels are lowercase on the wire; case variants are not accepted.
        assert!("Adina".parse::<Persona>().is_err());
    }

    #[test]
    fn serde_uses_lowercase_labels() {
        let json = serde_json::to_string(&Persona::Rafa).unwrap();
        assert_eq!(json, "\"rafa\"");

        let parsed: Persona = serde_json::from_str("\"adina\"").unwrap();
        assert_eq!(parsed, Persona::Adina);
    }

    #[test]
    fn display_matches_wire_label() {
        assert_eq!(Persona::Adina.to_string(), "adina");
        assert_eq!(Persona::Rafa.to_string(), "rafa");
    }
}
