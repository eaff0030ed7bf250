//! Catalog index endpoint

use axum::{
    extract::{Query, State},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{error::AppResult, services::catalog::CatalogSummary};

/// Cookie identifying a visitor session for the visit counter
const SESSION_COOKIE: &str = "lectern_session";

/// Index query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct CatalogQuery {
    /// Substring to match against genre names and book titles
    pub contains: Option<String>,
}

/// Catalog index: record counts, per-session visit counter and optional
/// substring matches against genres and titles.
#[utoipa::path(
    get,
    path = "/catalog",
    tag = "catalog",
    params(CatalogQuery),
    responses(
        (status = 200, description = "Catalog summary", body = CatalogSummary)
    )
)]
pub async fn index(
    State(state): State<crate::AppState>,
    Query(query): Query<CatalogQuery>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<CatalogSummary>)> {
    let session_key = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
        .unwrap_or_else(Uuid::new_v4);

    let summary = state
        .services
        .catalog
        .index_summary(session_key, query.contains.as_deref())
        .await?;

    let jar = jar.add(
        Cookie::build((SESSION_COOKIE, session_key.to_string()))
            .path("/")
            .http_only(true)
            .build(),
    );

    Ok((jar, Json(summary)))
}
