//! Loan tracking service: on-loan lists, the renewal workflow and
//! instance management.

use chrono::{Duration, NaiveDate};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::instance::{BookInstance, CreateInstance, InstanceDetails, UpdateInstance},
    repository::Repository,
};

/// Renewal proposals default to three weeks out.
const RENEWAL_PROPOSAL_WEEKS: i64 = 3;
/// A renewal may not push the due date more than four weeks out.
const RENEWAL_MAX_WEEKS: i64 = 4;

/// Default date pre-filled in the renewal form
pub fn proposed_renewal_date(today: NaiveDate) -> NaiveDate {
    today + Duration::weeks(RENEWAL_PROPOSAL_WEEKS)
}

/// Check a proposed renewal date against today. Both today itself and
/// exactly four weeks out are accepted.
pub fn validate_renewal_date(proposed: NaiveDate, today: NaiveDate) -> AppResult<()> {
    if proposed < today {
        return Err(AppError::Validation(
            "invalid renewal date - date in past".to_string(),
        ));
    }
    if proposed > today + Duration::weeks(RENEWAL_MAX_WEEKS) {
        return Err(AppError::Validation(
            "invalid renewal date - beyond max".to_string(),
        ));
    }
    Ok(())
}

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// On-loan instances borrowed by the given user, due date ascending
    pub async fn loans_for_user(&self, user_id: i32) -> AppResult<Vec<InstanceDetails>> {
        self.repository.instances.on_loan_for_user(user_id).await
    }

    /// All on-loan instances, due date ascending
    pub async fn all_on_loan(&self) -> AppResult<Vec<InstanceDetails>> {
        self.repository.instances.on_loan().await
    }

    /// The instance and the proposed date for pre-filling the renewal form
    pub async fn renewal_proposal(&self, id: Uuid) -> AppResult<(BookInstance, NaiveDate)> {
        let instance = self.repository.instances.get_by_id(id).await?;
        let today = chrono::Utc::now().date_naive();
        Ok((instance, proposed_renewal_date(today)))
    }

    /// Renew a loan: validate the proposed date and persist it.
    /// Nothing is mutated when validation fails.
    pub async fn renew(&self, id: Uuid, due_back: NaiveDate) -> AppResult<BookInstance> {
        // 404 before validation for unknown instances
        self.repository.instances.get_by_id(id).await?;

        let today = chrono::Utc::now().date_naive();
        validate_renewal_date(due_back, today)?;

        let renewed = self.repository.instances.set_due_back(id, due_back).await?;
        tracing::info!("Renewed instance {} until {}", id, due_back);
        Ok(renewed)
    }

    // Instance management (admin)

    pub async fn list_instances(&self) -> AppResult<Vec<InstanceDetails>> {
        self.repository.instances.list().await
    }

    pub async fn get_instance(&self, id: Uuid) -> AppResult<BookInstance> {
        self.repository.instances.get_by_id(id).await
    }

    pub async fn create_instance(&self, instance: CreateInstance) -> AppResult<BookInstance> {
        instance
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.check_instance_references(instance.book_id, instance.borrower_id)
            .await?;
        self.repository.instances.create(&instance).await
    }

    pub async fn update_instance(
        &self,
        id: Uuid,
        instance: UpdateInstance,
    ) -> AppResult<BookInstance> {
        instance
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.check_instance_references(instance.book_id, instance.borrower_id)
            .await?;
        self.repository.instances.update(id, &instance).await
    }

    pub async fn delete_instance(&self, id: Uuid) -> AppResult<()> {
        self.repository.instances.delete(id).await
    }

    async fn check_instance_references(
        &self,
        book_id: Option<i32>,
        borrower_id: Option<i32>,
    ) -> AppResult<()> {
        if let Some(book_id) = book_id {
            self.repository.books.get_by_id(book_id).await?;
        }
        if let Some(borrower_id) = borrower_id {
            self.repository.users.get_by_id(borrower_id).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn proposal_is_three_weeks_out() {
        assert_eq!(
            proposed_renewal_date(today()),
            today() + Duration::weeks(3)
        );
    }

    #[test]
    fn rejects_date_in_past() {
        let err = validate_renewal_date(today() - Duration::days(1), today()).unwrap_err();
        match err {
            AppError::Validation(msg) => {
                assert_eq!(msg, "invalid renewal date - date in past");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn rejects_date_beyond_four_weeks() {
        let err = validate_renewal_date(today() + Duration::days(30), today()).unwrap_err();
        match err {
            AppError::Validation(msg) => {
                assert_eq!(msg, "invalid renewal date - beyond max");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn accepts_today() {
        assert!(validate_renewal_date(today(), today()).is_ok());
    }

    #[test]
    fn accepts_exactly_four_weeks() {
        assert!(validate_renewal_date(today() + Duration::weeks(4), today()).is_ok());
    }

    #[test]
    fn rejects_one_day_past_four_weeks() {
        assert!(
            validate_renewal_date(today() + Duration::weeks(4) + Duration::days(1), today())
                .is_err()
        );
    }

    #[test]
    fn accepts_the_default_proposal() {
        assert!(validate_renewal_date(proposed_renewal_date(today()), today()).is_ok());
    }
}
