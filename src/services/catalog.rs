//! Catalog management service: books, authors, genres, languages and
//! the index page summary.

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        author::{Author, AuthorDetails, CreateAuthor, UpdateAuthor},
        book::{Book, BookQuery, BookSummary, CreateBook, UpdateBook},
        genre::{CreateGenre, Genre, UpdateGenre},
        language::{CreateLanguage, Language, UpdateLanguage},
    },
    repository::Repository,
};

/// Index page summary: record counts, session visits and optional
/// substring matches.
#[derive(Debug, Clone, serde::Serialize, utoipa::ToSchema)]
pub struct CatalogSummary {
    pub num_books: i64,
    pub num_instances: i64,
    pub num_instances_available: i64,
    pub num_authors: i64,
    pub num_visits: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_word: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matching_genres: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matching_books: Option<Vec<BookSummary>>,
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Build the index summary and bump the session visit counter
    pub async fn index_summary(
        &self,
        session_key: Uuid,
        contains: Option<&str>,
    ) -> AppResult<CatalogSummary> {
        let num_books = self.repository.books.count().await?;
        let num_instances = self.repository.instances.count().await?;
        let num_instances_available = self.repository.instances.count_available().await?;
        let num_authors = self.repository.authors.count().await?;
        let num_visits = self.repository.visits.record_visit(session_key).await?;

        let (matching_genres, matching_books) = match contains {
            Some(word) => (
                Some(self.repository.genres.names_containing(word).await?),
                Some(self.repository.books.titles_containing(word).await?),
            ),
            None => (None, None),
        };

        Ok(CatalogSummary {
            num_books,
            num_instances,
            num_instances_available,
            num_authors,
            num_visits,
            requested_word: contains.map(String::from),
            matching_genres,
            matching_books,
        })
    }

    // Books

    pub async fn list_books(&self, query: &BookQuery) -> AppResult<(Vec<BookSummary>, i64)> {
        self.repository.books.list(query).await
    }

    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    pub async fn create_book(&self, book: CreateBook) -> AppResult<Book> {
        book.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.check_book_references(book.author_id, book.language_id, &book.genre_ids)
            .await?;
        self.repository.books.create(&book).await
    }

    pub async fn update_book(&self, id: i32, book: UpdateBook) -> AppResult<Book> {
        book.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.check_book_references(
            book.author_id,
            book.language_id,
            book.genre_ids.as_deref().unwrap_or(&[]),
        )
        .await?;
        self.repository.books.update(id, &book).await
    }

    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await
    }

    async fn check_book_references(
        &self,
        author_id: Option<i32>,
        language_id: Option<i32>,
        genre_ids: &[i32],
    ) -> AppResult<()> {
        if let Some(author_id) = author_id {
            self.repository.authors.get_by_id(author_id).await?;
        }
        if let Some(language_id) = language_id {
            self.repository.languages.get_by_id(language_id).await?;
        }
        for genre_id in genre_ids {
            self.repository.genres.get_by_id(*genre_id).await?;
        }
        Ok(())
    }

    // Authors

    pub async fn list_authors(&self, page: i64, per_page: i64) -> AppResult<(Vec<Author>, i64)> {
        self.repository
            .authors
            .list(page.max(1), per_page.clamp(1, 100))
            .await
    }

    pub async fn get_author(&self, id: i32) -> AppResult<AuthorDetails> {
        let author = self.repository.authors.get_by_id(id).await?;
        let books = self.repository.authors.books_by_author(id).await?;
        Ok(AuthorDetails { author, books })
    }

    pub async fn create_author(&self, author: CreateAuthor) -> AppResult<Author> {
        author
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.authors.create(&author).await
    }

    pub async fn update_author(&self, id: i32, author: UpdateAuthor) -> AppResult<Author> {
        author
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.authors.update(id, &author).await
    }

    pub async fn delete_author(&self, id: i32) -> AppResult<()> {
        self.repository.authors.delete(id).await
    }

    // Genres

    pub async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        self.repository.genres.list().await
    }

    pub async fn create_genre(&self, genre: CreateGenre) -> AppResult<Genre> {
        genre
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.genres.create(&genre).await
    }

    pub async fn update_genre(&self, id: i32, genre: UpdateGenre) -> AppResult<Genre> {
        genre
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.genres.update(id, &genre).await
    }

    pub async fn delete_genre(&self, id: i32) -> AppResult<()> {
        self.repository.genres.delete(id).await
    }

    // Languages

    pub async fn list_languages(&self) -> AppResult<Vec<Language>> {
        self.repository.languages.list().await
    }

    pub async fn create_language(&self, language: CreateLanguage) -> AppResult<Language> {
        self.repository.languages.create(&language).await
    }

    pub async fn update_language(&self, id: i32, language: UpdateLanguage) -> AppResult<Language> {
        self.repository.languages.update(id, &language).await
    }

    pub async fn delete_language(&self, id: i32) -> AppResult<()> {
        self.repository.languages.delete(id).await
    }
}
