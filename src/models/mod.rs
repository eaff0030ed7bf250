//! Data models for Lectern

pub mod author;
pub mod book;
pub mod genre;
pub mod instance;
pub mod language;
pub mod user;

// Re-export commonly used types
pub use author::Author;
pub use book::{Book, BookSummary};
pub use genre::Genre;
pub use instance::{BookInstance, InstanceDetails, LoanStatus};
pub use language::{Language, LanguageCode};
pub use user::{User, UserClaims};
