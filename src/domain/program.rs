use crate::utils::error::SpecError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bumped whenever a program is added to or removed from [`Program::ALL`].
pub const CATALOG_VERSION: u32 = 1;

/// Licensable programs. The set is closed: anything else is rejected at the
/// input boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Program {
    CaseOne,
    CaseOneManageCases,
    DocOne,
    BotOne,
    CasebookStandard,
    CasebookPro,
    Caselook,
    CasebookApi,
}

impl Program {
    /// Catalog order; the first entry is the form default.
    pub const ALL: [Program; 8] = [
        Program::CaseOne,
        Program::CaseOneManageCases,
        Program::DocOne,
        Program::BotOne,
        Program::CasebookStandard,
        Program::CasebookPro,
        Program::Caselook,
        Program::CasebookApi,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Program::CaseOne => "Case.one",
            Program::CaseOneManageCases => "Case.one тариф Управляй делами",
            Program::DocOne => "Doc.one",
            Program::BotOne => "Bot.one",
            Program::CasebookStandard => "Casebook тариф Standard",
            Program::CasebookPro => "Casebook тариф PRO",
            Program::Caselook => "Caselook",
            Program::CasebookApi => "Casebook API",
        }
    }
}

impl Default for Program {
    fn default() -> Self {
        Program::ALL[0]
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Program {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Program::ALL
            .iter()
            .copied()
            .find(|program| program.as_str() == wanted)
            .ok_or_else(|| SpecError::UnknownProgram {
                name: s.to_string(),
            })
    }
}

impl TryFrom<String> for Program {
    type Error = SpecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Program> for String {
    fn from(program: Program) -> Self {
        program.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_every_catalog_entry() {
        for program in Program::ALL {
            assert_eq!(program.as_str().parse::<Program>().unwrap(), program);
        }
    }

    #[test]
    fn test_parse_trims_but_is_exact() {
        assert_eq!(" Doc.one ".parse::<Program>().unwrap(), Program::DocOne);
        assert!(matches!(
            "doc.one".parse::<Program>(),
            Err(SpecError::UnknownProgram { .. })
        ));
        assert!("Casebook".parse::<Program>().is_err());
    }

    #[test]
    fn test_default_is_first_catalog_entry() {
        assert_eq!(Program::default(), Program::CaseOne);
    }

    #[test]
    fn test_serde_uses_display_name() {
        let json = serde_json::to_string(&Program::CasebookPro).unwrap();
        assert_eq!(json, "\"Casebook тариф PRO\"");
        let back: Program = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Program::CasebookPro);
        assert!(serde_json::from_str::<Program>("\"Excel\"").is_err());
    }
}
