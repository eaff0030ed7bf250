//! Loan list and renewal endpoints

use axum::{
    extract::{Path, State},
    response::Redirect,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::instance::{BookInstance, InstanceDetails},
};

use super::AuthenticatedUser;

/// Renewal form data: the instance and the pre-filled proposed date
#[derive(Serialize, ToSchema)]
pub struct RenewalProposal {
    pub instance: BookInstance,
    /// Default proposed due date (today + 3 weeks)
    pub proposed_due_back: NaiveDate,
}

/// Renewal submission
#[derive(Deserialize, ToSchema)]
pub struct RenewBookForm {
    /// Proposed new due date
    pub due_back: NaiveDate,
}

/// On-loan instances borrowed by the authenticated user, due date ascending
#[utoipa::path(
    get,
    path = "/loans/mine",
    tag = "loans",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The user's borrowed copies", body = Vec<InstanceDetails>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_loans(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<InstanceDetails>>> {
    let loans = state.services.loans.loans_for_user(claims.user_id).await?;
    Ok(Json(loans))
}

/// All on-loan instances, due date ascending (librarian view)
#[utoipa::path(
    get,
    path = "/loans/borrowed",
    tag = "loans",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All borrowed copies", body = Vec<InstanceDetails>),
        (status = 403, description = "Missing permission")
    )
)]
pub async fn all_borrowed(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<InstanceDetails>>> {
    claims.require_can_mark_returned()?;

    let loans = state.services.loans.all_on_loan().await?;
    Ok(Json(loans))
}

/// Renewal form data for a book instance, with the default proposed date
#[utoipa::path(
    get,
    path = "/instances/{id}/renewal",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Book instance ID")
    ),
    responses(
        (status = 200, description = "Renewal form data", body = RenewalProposal),
        (status = 403, description = "Missing permission"),
        (status = 404, description = "Instance not found")
    )
)]
pub async fn renewal_form(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RenewalProposal>> {
    claims.require_can_mark_returned()?;

    let (instance, proposed_due_back) = state.services.loans.renewal_proposal(id).await?;
    Ok(Json(RenewalProposal {
        instance,
        proposed_due_back,
    }))
}

/// Renew a loan. On success the new due date is persisted and the
/// response redirects to the all-borrowed list.
#[utoipa::path(
    post,
    path = "/instances/{id}/renewal",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Book instance ID")
    ),
    request_body = RenewBookForm,
    responses(
        (status = 303, description = "Renewed, redirect to the all-borrowed list"),
        (status = 400, description = "Invalid renewal date"),
        (status = 403, description = "Missing permission"),
        (status = 404, description = "Instance not found")
    )
)]
pub async fn renew_instance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(form): Json<RenewBookForm>,
) -> AppResult<Redirect> {
    claims.require_can_mark_returned()?;

    state.services.loans.renew(id, form.due_back).await?;
    Ok(Redirect::to("/api/v1/loans/borrowed"))
}
