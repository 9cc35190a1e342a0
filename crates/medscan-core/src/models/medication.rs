//! Medication data models.

use serde::{Deserialize, Serialize};

/// A partially extracted medication.
///
/// Every field is optional. A record is never required to be complete;
/// absent fields are omitted when serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicationInfo {
    /// Drug name (brand or generic).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Strength, e.g. "500 mg".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,

    /// Administration frequency, e.g. "twice".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,

    /// Administration route, e.g. "by mouth".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,

    /// Prescribing clinician.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prescriber: Option<String>,

    /// Dispensed quantity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,

    /// Remaining refills.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refills: Option<String>,

    /// Free-text directions, e.g. "Take 1 tablet by mouth twice daily."
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,

    /// Structural completeness score (0 - 100).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<u8>,
}

impl MedicationInfo {
    /// Whether a text field holds a non-empty value.
    pub fn has(field: &Option<String>) -> bool {
        field.as_deref().is_some_and(|v| !v.is_empty())
    }

    /// Display name, falling back to an empty string.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}

/// A product record returned by the drug database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrugRecord {
    /// Product NDC in labeler-product form, e.g. "0087-6060".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_ndc: Option<String>,

    /// Brand (proprietary) name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_name: Option<String>,

    /// Generic (non-proprietary) name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic_name: Option<String>,

    /// Administration routes, upper-case as published ("ORAL").
    #[serde(default)]
    pub route: Vec<String>,

    /// Active ingredients with strengths.
    #[serde(default)]
    pub active_ingredients: Vec<ActiveIngredient>,
}

/// An active ingredient of a drug product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveIngredient {
    /// Ingredient name.
    #[serde(default)]
    pub name: String,

    /// Strength string, e.g. "500 mg/1".
    #[serde(default)]
    pub strength: String,
}
