use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StrengthLabel {
    VeryWeak,
    Weak,
    Medium,
    Strong,
    VeryStrong,
}

impl StrengthLabel {
    pub fn from_score(score: u8) -> Self {
        match score {
            5.. => StrengthLabel::VeryStrong,
            4 => StrengthLabel::Strong,
            3 => StrengthLabel::Medium,
            2 => StrengthLabel::Weak,
            _ => StrengthLabel::VeryWeak,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            StrengthLabel::VeryWeak => "Very Weak",
            StrengthLabel::Weak => "Weak",
            StrengthLabel::Medium => "Medium",
            StrengthLabel::Strong => "Strong",
            StrengthLabel::VeryStrong => "Very Strong",
        }
    }

    /// Color token used by the strength meter.
    pub const fn color(self) -> &'static str {
        match self {
            StrengthLabel::VeryWeak => "bg-red-500",
            StrengthLabel::Weak => "bg-orange-500",
            StrengthLabel::Medium => "bg-yellow-400",
            StrengthLabel::Strong => "bg-yellow-500",
            StrengthLabel::VeryStrong => "bg-green-500",
        }
    }
}

impl fmt::Display for StrengthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived password score; recomputed on every change, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasswordStrength {
    pub score: u8,
    pub strength: StrengthLabel,
    pub color: &'static str,
    pub feedback: Vec<&'static str>,
}
