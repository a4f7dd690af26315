//! Document invariant errors and field format checks.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://[^\s/?#]+[^\s]*$").expect("valid link regex"));

/// Violated document invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentValidationError {
    /// Email is neither a bare address nor a `mailto:` URI.
    InvalidEmail(String),
    /// A link field is not an absolute http(s) URI.
    InvalidLink { field: &'static str, value: String },
    /// A list entry carries an empty id.
    EmptyId { section: &'static str },
    /// Two entries of one section share an id.
    DuplicateId { section: &'static str, id: String },
    /// Two skill categories share a name.
    DuplicateCategory(String),
    /// Two skills in one category share a case-insensitive name.
    DuplicateSkill { category: String, name: String },
    /// Skill level outside `0..=100`.
    SkillLevelOutOfRange { name: String, level: u8 },
}

impl Display for DocumentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEmail(value) => write!(f, "invalid email: `{value}`"),
            Self::InvalidLink { field, value } => {
                write!(f, "invalid link in `{field}`: `{value}`")
            }
            Self::EmptyId { section } => write!(f, "empty id in `{section}`"),
            Self::DuplicateId { section, id } => write!(f, "duplicate id `{id}` in `{section}`"),
            Self::DuplicateCategory(name) => write!(f, "duplicate skill category `{name}`"),
            Self::DuplicateSkill { category, name } => {
                write!(f, "duplicate skill `{name}` in category `{category}`")
            }
            Self::SkillLevelOutOfRange { name, level } => {
                write!(f, "skill `{name}` has level {level}, expected 0..=100")
            }
        }
    }
}

impl Error for DocumentValidationError {}

/// Checks an email field. Empty values are accepted as "not present".
pub fn check_email(value: &str) -> Result<(), DocumentValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(());
    }
    let address = trimmed.strip_prefix("mailto:").unwrap_or(trimmed);
    if EMAIL_RE.is_match(address) {
        Ok(())
    } else {
        Err(DocumentValidationError::InvalidEmail(value.to_string()))
    }
}

/// Checks a link field. Empty values are accepted as "not present".
pub fn check_link(field: &'static str, value: &str) -> Result<(), DocumentValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() || LINK_RE.is_match(trimmed) {
        return Ok(());
    }
    Err(DocumentValidationError::InvalidLink {
        field,
        value: value.to_string(),
    })
}

/// Checks an asset reference: absolute link or site-relative path.
pub fn check_asset(field: &'static str, value: &str) -> Result<(), DocumentValidationError> {
    if value.trim().starts_with('/') && !value.trim().starts_with("//") {
        return Ok(());
    }
    check_link(field, value)
}
