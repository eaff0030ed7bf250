//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{admin, auth, authors, books, catalog, health, loans};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Lectern API",
        version = "0.1.0",
        description = "Library Catalog REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        // Catalog index
        catalog::index,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::create_author,
        authors::update_author,
        authors::delete_author,
        // Loans
        loans::my_loans,
        loans::all_borrowed,
        loans::renewal_form,
        loans::renew_instance,
        // Admin
        admin::list_genres,
        admin::create_genre,
        admin::update_genre,
        admin::delete_genre,
        admin::list_languages,
        admin::create_language,
        admin::update_language,
        admin::delete_language,
        admin::create_author,
        admin::update_author,
        admin::delete_author,
        admin::create_book,
        admin::update_book,
        admin::delete_book,
        admin::list_instances,
        admin::get_instance,
        admin::create_instance,
        admin::update_instance,
        admin::delete_instance,
        admin::list_users,
        admin::create_user,
        admin::delete_user,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserInfo,
            crate::models::user::CreateUser,
            // Catalog
            crate::services::catalog::CatalogSummary,
            // Books
            crate::models::book::Book,
            crate::models::book::BookSummary,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            // Authors
            crate::models::author::Author,
            crate::models::author::AuthorDetails,
            crate::models::author::CreateAuthor,
            crate::models::author::UpdateAuthor,
            // Genres
            crate::models::genre::Genre,
            crate::models::genre::CreateGenre,
            crate::models::genre::UpdateGenre,
            // Languages
            crate::models::language::Language,
            crate::models::language::LanguageCode,
            crate::models::language::CreateLanguage,
            crate::models::language::UpdateLanguage,
            // Instances and loans
            crate::models::instance::BookInstance,
            crate::models::instance::InstanceDetails,
            crate::models::instance::LoanStatus,
            crate::models::instance::CreateInstance,
            crate::models::instance::UpdateInstance,
            loans::RenewalProposal,
            loans::RenewBookForm,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "catalog", description = "Catalog index and summary"),
        (name = "books", description = "Book management"),
        (name = "authors", description = "Author management"),
        (name = "loans", description = "Loan tracking and renewal"),
        (name = "admin", description = "Administrative record management")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
