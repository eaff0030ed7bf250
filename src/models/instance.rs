//! Book instance (physical copy) model and loan status types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Availability status of a copy. Stored as a single-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    #[serde(rename = "m")]
    Maintenance,
    #[serde(rename = "o")]
    OnLoan,
    #[serde(rename = "r")]
    Reserved,
    #[serde(rename = "a")]
    Available,
}

impl LoanStatus {
    pub fn as_code(&self) -> &'static str {
        match self {
            LoanStatus::Maintenance => "m",
            LoanStatus::OnLoan => "o",
            LoanStatus::Reserved => "r",
            LoanStatus::Available => "a",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LoanStatus::Maintenance => "Maintenance",
            LoanStatus::OnLoan => "On loan",
            LoanStatus::Reserved => "Reserved",
            LoanStatus::Available => "Available",
        }
    }
}

impl Default for LoanStatus {
    fn default() -> Self {
        LoanStatus::Maintenance
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for LoanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "m" => Ok(LoanStatus::Maintenance),
            "o" => Ok(LoanStatus::OnLoan),
            "r" => Ok(LoanStatus::Reserved),
            "a" => Ok(LoanStatus::Available),
            _ => Err(format!("Invalid loan status code: {}", s)),
        }
    }
}

// SQLx conversion: stored as the single-letter code
impl sqlx::Type<Postgres> for LoanStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for LoanStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.trim().parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for LoanStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <String as Encode<Postgres>>::encode(self.as_code().to_string(), buf)
    }
}

/// A physical copy of a book. The identifier is assigned once at creation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookInstance {
    pub id: Uuid,
    pub book_id: Option<i32>,
    pub imprint: String,
    pub status: LoanStatus,
    pub due_back: Option<NaiveDate>,
    pub borrower_id: Option<i32>,
}

impl BookInstance {
    /// A copy is overdue iff it has a due date strictly before the given day.
    pub fn is_overdue_on(&self, today: NaiveDate) -> bool {
        self.due_back.map(|due| due < today).unwrap_or(false)
    }

    /// Overdue relative to the current date
    pub fn is_overdue(&self) -> bool {
        self.is_overdue_on(chrono::Utc::now().date_naive())
    }
}

/// Copy with book and borrower context, for loan list views
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InstanceDetails {
    pub id: Uuid,
    pub book_id: Option<i32>,
    pub book_title: Option<String>,
    pub imprint: String,
    pub status: LoanStatus,
    pub due_back: Option<NaiveDate>,
    pub borrower_id: Option<i32>,
    pub borrower_name: Option<String>,
    pub is_overdue: bool,
}

/// Create instance request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateInstance {
    pub book_id: Option<i32>,
    #[validate(length(min = 1, max = 200, message = "Imprint must be 1-200 characters"))]
    pub imprint: String,
    #[serde(default)]
    pub status: LoanStatus,
    pub due_back: Option<NaiveDate>,
    pub borrower_id: Option<i32>,
}

/// Update instance request. Absent fields are left unchanged;
/// `due_back` and `borrower_id` are overwritten when present.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateInstance {
    pub book_id: Option<i32>,
    #[validate(length(min = 1, max = 200, message = "Imprint must be 1-200 characters"))]
    pub imprint: Option<String>,
    pub status: Option<LoanStatus>,
    pub due_back: Option<NaiveDate>,
    pub borrower_id: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn instance(due_back: Option<NaiveDate>) -> BookInstance {
        BookInstance {
            id: Uuid::new_v4(),
            book_id: None,
            imprint: "Test imprint".to_string(),
            status: LoanStatus::OnLoan,
            due_back,
            borrower_id: None,
        }
    }

    #[test]
    fn overdue_when_due_back_is_yesterday() {
        let today = chrono::Utc::now().date_naive();
        let copy = instance(Some(today - Duration::days(1)));
        assert!(copy.is_overdue_on(today));
    }

    #[test]
    fn not_overdue_without_due_back() {
        let today = chrono::Utc::now().date_naive();
        assert!(!instance(None).is_overdue_on(today));
    }

    #[test]
    fn not_overdue_when_due_today_or_later() {
        let today = chrono::Utc::now().date_naive();
        assert!(!instance(Some(today)).is_overdue_on(today));
        assert!(!instance(Some(today + Duration::days(7))).is_overdue_on(today));
    }

    #[test]
    fn status_codes_round_trip() {
        for status in [
            LoanStatus::Maintenance,
            LoanStatus::OnLoan,
            LoanStatus::Reserved,
            LoanStatus::Available,
        ] {
            assert_eq!(status.as_code().parse::<LoanStatus>().unwrap(), status);
        }
    }

    #[test]
    fn default_status_is_maintenance() {
        assert_eq!(LoanStatus::default(), LoanStatus::Maintenance);
    }
}
