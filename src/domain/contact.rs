//! Contact messages submitted through the public form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

pub const NAME_MAX_LEN: usize = 100;
pub const EMAIL_MAX_LEN: usize = 254;
pub const PHONE_MAX_LEN: usize = 20;
pub const SUBJECT_MAX_LEN: usize = 200;
pub const MESSAGE_MAX_LEN: usize = 2000;

/// Handling state of a contact message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    #[default]
    New,
    Read,
    Replied,
}

impl ContactStatus {
    pub const ALL: [ContactStatus; 3] = [Self::New, Self::Read, Self::Replied];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Read => "read",
            Self::Replied => "replied",
        }
    }

    fn allowed() -> String {
        Self::ALL
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Status must be one of: {}", ContactStatus::allowed())]
pub struct UnknownStatus(pub String);

impl FromStr for ContactStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

impl TryFrom<String> for ContactStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A stored contact message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub message: String,
    #[sqlx(try_from = "String")]
    pub status: ContactStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public form submission body.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ContactInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Admin status update body.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ContactStatusInput {
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
}

fn trimmed(value: &Option<String>) -> String {
    value.as_deref().map(str::trim).unwrap_or_default().to_string()
}

/// Blank optional fields are dropped rather than stored empty.
fn trimmed_optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn looks_like_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .map(|(host, tld)| !host.is_empty() && !tld.is_empty())
                    .unwrap_or(false)
        }
        None => false,
    }
}

fn check_required(value: &str, label: &str, max: usize, errors: &mut Vec<String>) {
    if value.is_empty() {
        errors.push(format!("{} is required", label));
    } else if value.chars().count() > max {
        errors.push(format!("{} cannot exceed {} characters", label, max));
    }
}

fn check_optional(value: &Option<String>, label: &str, max: usize, errors: &mut Vec<String>) {
    if let Some(v) = value {
        if v.chars().count() > max {
            errors.push(format!("{} cannot exceed {} characters", label, max));
        }
    }
}

/// Validates a form submission, trimming every value first.
pub fn validate_new(input: &ContactInput) -> Result<NewContact, Vec<String>> {
    let name = trimmed(&input.name);
    let email = trimmed(&input.email).to_lowercase();
    let phone = trimmed_optional(&input.phone);
    let subject = trimmed_optional(&input.subject);
    let message = trimmed(&input.message);

    let mut errors = Vec::new();
    check_required(&name, "Name", NAME_MAX_LEN, &mut errors);
    check_required(&email, "Email", EMAIL_MAX_LEN, &mut errors);
    if !email.is_empty() && email.chars().count() <= EMAIL_MAX_LEN && !looks_like_email(&email) {
        errors.push("Please provide a valid email".to_string());
    }
    check_optional(&phone, "Phone", PHONE_MAX_LEN, &mut errors);
    check_optional(&subject, "Subject", SUBJECT_MAX_LEN, &mut errors);
    check_required(&message, "Message", MESSAGE_MAX_LEN, &mut errors);

    if errors.is_empty() {
        Ok(NewContact {
            name,
            email,
            phone,
            subject,
            message,
        })
    } else {
        Err(errors)
    }
}

/// Validates a status update body.
pub fn validate_status(input: &ContactStatusInput) -> Result<ContactStatus, Vec<String>> {
    match input.status.as_deref().map(str::trim) {
        None | Some("") => Err(vec!["Status is required".to_string()]),
        Some(raw) => raw.parse().map_err(|e: UnknownStatus| vec![e.to_string()]),
    }
}
