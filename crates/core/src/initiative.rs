//! Initiative entity, request DTOs, and the pure lifecycle rules.
//!
//! Creation and partial update are expressed as functions over plain
//! values (ids and clock readings are passed in) so the rules can be tested
//! without a store. The service layer in `agrinit-api` supplies the id, the
//! caller identity and `Utc::now()`.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::amount::{deserialize_amount, deserialize_optional_amount};
use crate::category::Category;
use crate::error::CoreError;
use crate::types::{RecordId, Timestamp};

/// Entity name used in not-found errors.
pub const ENTITY: &str = "Initiative";

/// Message returned when a required text field is absent or blank.
pub const REQUIRED_FIELDS_MESSAGE: &str = "Title, description, and category are required";

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_COMPLETED: &str = "completed";

/// All status values the service writes.
pub const VALID_STATUSES: &[&str] = &[STATUS_ACTIVE, STATUS_COMPLETED];

/// Lifecycle status of an initiative.
///
/// Reading is permissive: a stored record with any other status string
/// still decodes as [`InitiativeStatus::Unrecognized`]. Writing goes through
/// [`InitiativeStatus::from_str_value`], which only accepts the known values.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InitiativeStatus {
    #[default]
    Active,
    Completed,
    Unrecognized(String),
}

impl InitiativeStatus {
    /// Strict conversion used for client input.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            STATUS_ACTIVE => Ok(Self::Active),
            STATUS_COMPLETED => Ok(Self::Completed),
            _ => Err(format!(
                "Invalid status '{s}'. Must be one of: {}",
                VALID_STATUSES.join(", ")
            )),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => STATUS_ACTIVE,
            Self::Completed => STATUS_COMPLETED,
            Self::Unrecognized(s) => s,
        }
    }
}

impl From<String> for InitiativeStatus {
    fn from(s: String) -> Self {
        Self::from_str_value(&s).unwrap_or(Self::Unrecognized(s))
    }
}

impl From<InitiativeStatus> for String {
    fn from(status: InitiativeStatus) -> Self {
        match status {
            InitiativeStatus::Unrecognized(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A persisted initiative, stored as one JSON value under `initiative:<id>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Initiative {
    pub id: RecordId,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub status: InitiativeStatus,
    #[serde(default)]
    pub target_area: String,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub beneficiaries: u64,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub budget: u64,
    pub created_by: RecordId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for creating an initiative.
///
/// Every field is optional at the serde level so that a missing required
/// field surfaces as a validation error rather than a decoding error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInitiative {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub target_area: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_amount")]
    pub beneficiaries: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_optional_amount")]
    pub budget: Option<u64>,
}

/// Request body for a partial update. Absent fields are left untouched.
///
/// Fields that may never change (`id`, `createdBy`, `createdAt`,
/// `updatedAt`) have no counterpart here and are ignored if a client sends
/// them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInitiative {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub target_area: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_amount")]
    pub beneficiaries: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_optional_amount")]
    pub budget: Option<u64>,
}

// ---------------------------------------------------------------------------
// Lifecycle rules
// ---------------------------------------------------------------------------

/// Trimmed, non-empty text or `None`.
fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn parse_status(value: &str) -> Result<InitiativeStatus, CoreError> {
    InitiativeStatus::from_str_value(value.trim()).map_err(CoreError::Validation)
}

impl CreateInitiative {
    /// Validate the payload and build a new record.
    ///
    /// `createdAt` and `updatedAt` are both set to `now`.
    pub fn into_initiative(
        self,
        id: RecordId,
        created_by: RecordId,
        now: Timestamp,
    ) -> Result<Initiative, CoreError> {
        let (Some(title), Some(description), Some(category)) = (
            non_blank(self.title.as_deref()),
            non_blank(self.description.as_deref()),
            non_blank(self.category.as_deref()),
        ) else {
            return Err(CoreError::Validation(REQUIRED_FIELDS_MESSAGE.to_string()));
        };

        let status = match non_blank(self.status.as_deref()) {
            Some(s) => parse_status(&s)?,
            None => InitiativeStatus::Active,
        };

        Ok(Initiative {
            id,
            title,
            description,
            category: Category::parse(&category),
            status,
            target_area: self.target_area.map(|s| s.trim().to_string()).unwrap_or_default(),
            beneficiaries: self.beneficiaries.unwrap_or(0),
            budget: self.budget.unwrap_or(0),
            created_by,
            created_at: now,
            updated_at: now,
        })
    }
}

impl Initiative {
    /// Merge a partial update over this record.
    ///
    /// `id`, `createdBy` and `createdAt` are carried over unchanged and
    /// `updatedAt` is always moved forward (see [`next_updated_at`]).
    pub fn apply_update(&self, update: UpdateInitiative, now: Timestamp) -> Result<Self, CoreError> {
        let mut merged = self.clone();

        if let Some(title) = update.title {
            merged.title = required_text(&title)?;
        }
        if let Some(description) = update.description {
            merged.description = required_text(&description)?;
        }
        if let Some(category) = update.category {
            merged.category = Category::parse(&required_text(&category)?);
        }
        // A blank status means "unchanged", as it means "default" on create.
        if let Some(status) = non_blank(update.status.as_deref()) {
            merged.status = parse_status(&status)?;
        }
        if let Some(target_area) = update.target_area {
            merged.target_area = target_area.trim().to_string();
        }
        if let Some(beneficiaries) = update.beneficiaries {
            merged.beneficiaries = beneficiaries;
        }
        if let Some(budget) = update.budget {
            merged.budget = budget;
        }

        merged.updated_at = next_updated_at(self.updated_at, now);
        Ok(merged)
    }
}

fn required_text(value: &str) -> Result<String, CoreError> {
    non_blank(Some(value)).ok_or_else(|| CoreError::Validation(REQUIRED_FIELDS_MESSAGE.to_string()))
}

/// The `updatedAt` to stamp on an update: `now`, unless the clock has not
/// moved past the previous stamp, in which case one millisecond after it.
pub fn next_updated_at(previous: Timestamp, now: Timestamp) -> Timestamp {
    if now > previous {
        now
    } else {
        previous + Duration::milliseconds(1)
    }
}

/// Sort newest `createdAt` first; equal timestamps fall back to `id` order.
pub fn sort_newest_first(initiatives: &mut [Initiative]) {
    initiatives.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}
