//! Jewelry type records and their field rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

pub const TYPE_MAX_LEN: usize = 50;
pub const DESCRIPTION_MAX_LEN: usize = 500;

/// A stored jewelry type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JewelryType {
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Display name, unique under case-insensitive comparison.
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
    pub description: String,
    /// Image URL.
    pub image: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for create and update.
///
/// On create every field is required; on update absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct JewelryTypeInput {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl JewelryTypeInput {
    /// Trims every supplied value in place.
    pub fn trimmed(self) -> Self {
        Self {
            kind: self.kind.map(|s| s.trim().to_string()),
            description: self.description.map(|s| s.trim().to_string()),
            image: self.image.map(|s| s.trim().to_string()),
        }
    }
}

/// A validated jewelry type ready for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewJewelryType {
    pub kind: String,
    pub description: String,
    pub image: String,
}

/// A validated partial update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JewelryTypeChanges {
    pub kind: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl JewelryTypeChanges {
    pub fn apply(&self, record: &mut JewelryType) {
        if let Some(kind) = &self.kind {
            record.kind = kind.clone();
        }
        if let Some(description) = &self.description {
            record.description = description.clone();
        }
        if let Some(image) = &self.image {
            record.image = image.clone();
        }
    }
}

fn check_type(value: &str, errors: &mut Vec<String>) {
    if value.is_empty() {
        errors.push("Jewelry type is required".to_string());
    } else if value.chars().count() > TYPE_MAX_LEN {
        errors.push(format!("Type name cannot exceed {} characters", TYPE_MAX_LEN));
    }
}

fn check_description(value: &str, errors: &mut Vec<String>) {
    if value.is_empty() {
        errors.push("Description is required".to_string());
    } else if value.chars().count() > DESCRIPTION_MAX_LEN {
        errors.push(format!(
            "Description cannot exceed {} characters",
            DESCRIPTION_MAX_LEN
        ));
    }
}

fn check_image(value: &str, errors: &mut Vec<String>) {
    if value.is_empty() {
        errors.push("Image URL is required".to_string());
    }
}

/// Validates a create payload. Expects values already trimmed.
pub fn validate_new(input: &JewelryTypeInput) -> Result<NewJewelryType, Vec<String>> {
    let kind = input.kind.clone().unwrap_or_default();
    let description = input.description.clone().unwrap_or_default();
    let image = input.image.clone().unwrap_or_default();

    let mut errors = Vec::new();
    check_type(&kind, &mut errors);
    check_description(&description, &mut errors);
    check_image(&image, &mut errors);

    if errors.is_empty() {
        Ok(NewJewelryType {
            kind,
            description,
            image,
        })
    } else {
        Err(errors)
    }
}

/// Validates only the fields present in an update payload. Expects values already trimmed.
pub fn validate_changes(input: &JewelryTypeInput) -> Result<JewelryTypeChanges, Vec<String>> {
    let mut errors = Vec::new();
    if let Some(kind) = &input.kind {
        check_type(kind, &mut errors);
    }
    if let Some(description) = &input.description {
        check_description(description, &mut errors);
    }
    if let Some(image) = &input.image {
        check_image(image, &mut errors);
    }

    if errors.is_empty() {
        Ok(JewelryTypeChanges {
            kind: input.kind.clone(),
            description: input.description.clone(),
            image: input.image.clone(),
        })
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(kind: Option<&str>, description: Option<&str>, image: Option<&str>) -> JewelryTypeInput {
        JewelryTypeInput {
            kind: kind.map(str::to_string),
            description: description.map(str::to_string),
            image: image.map(str::to_string),
        }
        .trimmed()
    }

    #[test]
    fn create_requires_every_field_in_order() {
        let errors = validate_new(&input(None, Some("   "), None)).unwrap_err();
        assert_eq!(
            errors,
            vec![
                "Jewelry type is required",
                "Description is required",
                "Image URL is required"
            ]
        );
    }

    #[test]
    fn create_trims_and_accepts() {
        let draft = validate_new(&input(Some("  Ring "), Some(" Bands "), Some(" http://x/r.png ")))
            .unwrap();
        assert_eq!(draft.kind, "Ring");
        assert_eq!(draft.description, "Bands");
        assert_eq!(draft.image, "http://x/r.png");
    }

    #[test]
    fn length_limits_count_characters() {
        let at_limit = "é".repeat(TYPE_MAX_LEN);
        assert!(validate_new(&input(Some(&at_limit), Some("d"), Some("i"))).is_ok());

        let long_type = "x".repeat(TYPE_MAX_LEN + 1);
        let long_desc = "y".repeat(DESCRIPTION_MAX_LEN + 1);
        let errors = validate_new(&input(Some(&long_type), Some(&long_desc), Some("i"))).unwrap_err();
        assert_eq!(
            errors,
            vec![
                "Type name cannot exceed 50 characters",
                "Description cannot exceed 500 characters"
            ]
        );
    }

    #[test]
    fn changes_only_check_supplied_fields() {
        let changes = validate_changes(&input(None, Some("new text"), None)).unwrap();
        assert_eq!(changes.kind, None);
        assert_eq!(changes.description.as_deref(), Some("new text"));

        let errors = validate_changes(&input(Some(" "), None, Some(""))).unwrap_err();
        assert_eq!(errors, vec!["Jewelry type is required", "Image URL is required"]);
    }

    #[test]
    fn serializes_with_wire_names() {
        let now = Utc::now();
        let record = JewelryType {
            id: Uuid::nil(),
            kind: "Ring".to_string(),
            description: "d".to_string(),
            image: "i".to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["_id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["type"], "Ring");
        assert_eq!(json["isActive"], true);
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
    }
}
