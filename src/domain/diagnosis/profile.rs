//! Diagnosis profile value objects.
//!
//! The profile is produced elsewhere (by the diagnosis quizzes) and is
//! read-only here. Every part of it is optional.

use crate::domain::foundation::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A four-letter personality code such as `INFP`.
///
/// Each letter is one pole of an axis: E/I, S/N, T/F, J/P.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PersonalityType {
    code: String,
}

const AXES: [(char, char); 4] = [('E', 'I'), ('S', 'N'), ('T', 'F'), ('J', 'P')];

impl PersonalityType {
    pub fn as_str(&self) -> &str {
        &self.code
    }

    fn letter(&self, axis: usize) -> Option<char> {
        self.code.chars().nth(axis)
    }

    pub fn is_extraverted(&self) -> bool {
        self.letter(0) == Some('E')
    }

    pub fn is_introverted(&self) -> bool {
        self.letter(0) == Some('I')
    }

    pub fn is_sensing(&self) -> bool {
        self.letter(1) == Some('S')
    }

    pub fn is_intuitive(&self) -> bool {
        self.letter(1) == Some('N')
    }

    pub fn is_thinking(&self) -> bool {
        self.letter(2) == Some('T')
    }

    pub fn is_feeling(&self) -> bool {
        self.letter(2) == Some('F')
    }

    pub fn is_judging(&self) -> bool {
        self.letter(3) == Some('J')
    }

    pub fn is_perceiving(&self) -> bool {
        self.letter(3) == Some('P')
    }
}

impl FromStr for PersonalityType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        let letters: Vec<char> = code.chars().collect();

        if letters.len() != AXES.len() {
            return Err(ValidationError::invalid_format(
                "personality_type",
                format!("expected 4 letters, got '{}'", s.trim()),
            ));
        }
        for (letter, (a, b)) in letters.iter().zip(AXES) {
            if *letter != a && *letter != b {
                return Err(ValidationError::invalid_format(
                    "personality_type",
                    format!("'{}' is not one of {}/{}", letter, a, b),
                ));
            }
        }

        Ok(Self { code })
    }
}

impl TryFrom<String> for PersonalityType {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PersonalityType> for String {
    fn from(value: PersonalityType) -> Self {
        value.code
    }
}

impl fmt::Display for PersonalityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

/// Body-constitution type, 1 through 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ConstitutionType(u8);

impl ConstitutionType {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    /// Creates a constitution type, returning error if out of range.
    pub fn try_new(value: u8) -> Result<Self, ValidationError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(ValidationError::out_of_range(
                "constitution_type",
                i32::from(Self::MIN),
                i32::from(Self::MAX),
                i32::from(value),
            ));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for ConstitutionType {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<ConstitutionType> for u8 {
    fn from(value: ConstitutionType) -> Self {
        value.0
    }
}

impl fmt::Display for ConstitutionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Traits from the fortune reading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FortuneTraits {
    pub animal: Option<String>,
    pub six_star: Option<String>,
    pub current_period: Option<String>,
    #[serde(default)]
    pub characteristics: Vec<String>,
}

/// Read-only results of the user's diagnoses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisProfile {
    pub personality_type: Option<PersonalityType>,
    pub constitution_primary: Option<ConstitutionType>,
    pub constitution_secondary: Option<ConstitutionType>,
    #[serde(default)]
    pub constitution_characteristics: Vec<String>,
    pub fortune: Option<FortuneTraits>,
}

impl DiagnosisProfile {
    /// Creates an empty profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the personality type from its four-letter code.
    ///
    /// # Errors
    ///
    /// - `InvalidFormat` if the code is not a valid four-letter type
    pub fn with_personality_type(mut self, code: &str) -> Result<Self, ValidationError> {
        self.personality_type = Some(code.parse()?);
        Ok(self)
    }

    /// Sets the constitution types. A secondary of 0 means none.
    ///
    /// # Errors
    ///
    /// - `OutOfRange` if primary is outside 1..=10 or secondary outside 0..=10
    pub fn with_constitution(mut self, primary: u8, secondary: u8) -> Result<Self, ValidationError> {
        self.constitution_primary = Some(ConstitutionType::try_new(primary)?);
        self.constitution_secondary = match secondary {
            0 => None,
            n if n <= ConstitutionType::MAX => Some(ConstitutionType::try_new(n)?),
            n => {
                return Err(ValidationError::out_of_range(
                    "constitution_secondary",
                    0,
                    i32::from(ConstitutionType::MAX),
                    i32::from(n),
                ))
            }
        };
        Ok(self)
    }

    /// Sets the descriptive characteristics of the constitution type.
    pub fn with_constitution_characteristics(mut self, characteristics: Vec<String>) -> Self {
        self.constitution_characteristics = characteristics;
        self
    }

    /// Sets the fortune traits.
    pub fn with_fortune(mut self, fortune: FortuneTraits) -> Self {
        self.fortune = Some(fortune);
        self
    }

    /// Returns true if no diagnosis data is present.
    pub fn is_empty(&self) -> bool {
        self.personality_type.is_none()
            && self.constitution_primary.is_none()
            && self.fortune.is_none()
    }
}
