//! Console user roles.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_ANNOTATOR: &str = "annotator";
pub const ROLE_REVIEWER: &str = "reviewer";
pub const ROLE_FINAL_REVIEWER: &str = "final_reviewer";

/// All valid role strings.
pub const VALID_ROLES: &[&str] = &[
    ROLE_ADMIN,
    ROLE_ANNOTATOR,
    ROLE_REVIEWER,
    ROLE_FINAL_REVIEWER,
];

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Role of the signed-in console user. Admins manage batches; the other
/// three roles each own one stage of the annotation workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Annotator,
    Reviewer,
    FinalReviewer,
}

impl Role {
    /// Convert from the wire string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            ROLE_ADMIN => Ok(Self::Admin),
            ROLE_ANNOTATOR => Ok(Self::Annotator),
            ROLE_REVIEWER => Ok(Self::Reviewer),
            ROLE_FINAL_REVIEWER => Ok(Self::FinalReviewer),
            _ => Err(format!(
                "Invalid role '{s}'. Must be one of: {}",
                VALID_ROLES.join(", ")
            )),
        }
    }

    /// Convert to the wire string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => ROLE_ADMIN,
            Self::Annotator => ROLE_ANNOTATOR,
            Self::Reviewer => ROLE_REVIEWER,
            Self::FinalReviewer => ROLE_FINAL_REVIEWER,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Annotator => "Annotator",
            Self::Reviewer => "Reviewer",
            Self::FinalReviewer => "Final Reviewer",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
