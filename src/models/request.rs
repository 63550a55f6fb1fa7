use serde::{Deserialize, Serialize};

use super::deck::ValidationErrors;

// ---------------------------------------------------------------------------
// DeckDraft: unresolved deck input, as received from a caller
// ---------------------------------------------------------------------------

/// A reference to a catalog card. The category is kept as the raw tag so
/// that an unknown tag surfaces as an `InvalidCategory` error at resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRef {
    pub id: i64,
    pub category: String,
}

impl CardRef {
    pub fn new(id: i64, category: impl Into<String>) -> Self {
        Self {
            id,
            category: category.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRef {
    pub id: i64,
    pub category: String,
    pub quantity: u32,
}

impl LineRef {
    pub fn new(id: i64, category: impl Into<String>, quantity: u32) -> Self {
        Self {
            id,
            category: category.into(),
            quantity,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub main_card: Option<CardRef>,
    #[serde(default)]
    pub sub_card: Option<CardRef>,
    #[serde(default)]
    pub cards: Vec<LineRef>,
}

// ---------------------------------------------------------------------------
// ValidationReport: result of a dry-run check
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "ValidationErrors::is_empty")]
    pub errors: ValidationErrors,
}

impl From<ValidationErrors> for ValidationReport {
    fn from(errors: ValidationErrors) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}
