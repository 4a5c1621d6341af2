//! Typed list parameters built from raw query strings.

use crate::domain::contact::ContactStatus;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;

/// Parses the leading integer of `raw` (after optional whitespace and sign), ignoring any
/// trailing characters. `"12abc"` yields 12, `"abc"` yields `None`.
pub fn parse_int_prefix(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

fn positive_or(raw: Option<&str>, default: u64) -> u64 {
    match raw.and_then(parse_int_prefix) {
        Some(n) if n > 0 => n as u64,
        _ => default,
    }
}

/// A page window over a sorted result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    pub fn from_raw(page: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            page: positive_or(page, DEFAULT_PAGE),
            limit: positive_or(limit, DEFAULT_LIMIT),
        }
    }

    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn pagination(&self, total: u64) -> Pagination {
        Pagination {
            page: self.page,
            limit: self.limit,
            total,
            pages: total.div_ceil(self.limit),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub pages: u64,
}

/// One page of records plus its pagination block.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Sortable jewelry type fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Type,
    Description,
    Image,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "_id" => Some(Self::Id),
            "type" => Some(Self::Type),
            "description" => Some(Self::Description),
            "image" => Some(Self::Image),
            "isActive" => Some(Self::IsActive),
            "createdAt" => Some(Self::CreatedAt),
            "updatedAt" => Some(Self::UpdatedAt),
            _ => None,
        }
    }

    /// Column name in the relational backend.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Type => "type",
            Self::Description => "description",
            Self::Image => "image",
            Self::IsActive => "is_active",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Type | Self::Description | Self::Image)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    /// Parses `field:direction`. Any direction other than `desc` sorts ascending.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let mut parts = raw.split(':');
        let name = parts.next().unwrap_or_default();
        let field =
            SortField::parse(name).ok_or_else(|| format!("Invalid sort field: {}", name))?;
        let direction = match parts.next() {
            Some("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        };
        Ok(Self { field, direction })
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: SortField::Type,
            direction: SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JewelryTypeFilter {
    pub is_active: Option<bool>,
    /// Literal, case-insensitive substring of `type`.
    pub type_contains: Option<String>,
}

/// Raw query string of the jewelry type list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawJewelryTypeQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    #[serde(rename = "isActive")]
    pub is_active: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JewelryTypeQuery {
    pub page: PageRequest,
    pub filter: JewelryTypeFilter,
    pub sort: SortSpec,
}

impl TryFrom<RawJewelryTypeQuery> for JewelryTypeQuery {
    type Error = String;

    fn try_from(raw: RawJewelryTypeQuery) -> Result<Self, Self::Error> {
        let sort = match raw.sort_by.as_deref() {
            Some(s) if !s.is_empty() => SortSpec::parse(s)?,
            _ => SortSpec::default(),
        };
        Ok(Self {
            page: PageRequest::from_raw(raw.page.as_deref(), raw.limit.as_deref()),
            filter: JewelryTypeFilter {
                is_active: raw.is_active.map(|v| v == "true"),
                type_contains: raw.kind.filter(|s| !s.is_empty()),
            },
            sort,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFilter {
    pub status: Option<ContactStatus>,
}

/// Raw query string of the contact list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawContactQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactQuery {
    pub page: PageRequest,
    pub filter: ContactFilter,
}

impl TryFrom<RawContactQuery> for ContactQuery {
    type Error = String;

    fn try_from(raw: RawContactQuery) -> Result<Self, Self::Error> {
        let status = match raw.status.as_deref() {
            Some(s) if !s.is_empty() => Some(s.parse::<ContactStatus>().map_err(|e| e.to_string())?),
            _ => None,
        };
        Ok(Self {
            page: PageRequest::from_raw(raw.page.as_deref(), raw.limit.as_deref()),
            filter: ContactFilter { status },
        })
    }
}
