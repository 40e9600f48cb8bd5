//! Book catalog service

use axum::http::Method;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, CreateBook, UpdateBook},
    repository::Repository,
    services::{permissions, storage::StorageService},
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
    storage: StorageService,
}

impl CatalogService {
    pub fn new(repository: Repository, storage: StorageService) -> Self {
        Self { repository, storage }
    }

    /// All available books, newest first (public)
    pub async fn list_available(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list_available().await
    }

    /// Books owned by the principal, newest first
    pub async fn list_owned(&self, principal_id: i32) -> AppResult<Vec<Book>> {
        self.repository.books.list_by_owner(principal_id).await
    }

    /// Get a single book (public)
    pub async fn get_book(&self, book_id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(book_id).await
    }

    /// Create a book owned by the principal
    pub async fn create_book(&self, principal_id: i32, book: CreateBook) -> AppResult<Book> {
        book.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        self.repository.books.create(principal_id, &book).await
    }

    /// Update a book's content fields (owner only)
    pub async fn update_book(
        &self,
        principal_id: i32,
        book_id: i32,
        method: &Method,
        update: UpdateBook,
    ) -> AppResult<Book> {
        update
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let book = self.repository.books.get_by_id(book_id).await?;
        if !permissions::can_mutate_book(principal_id, book.owner_id, method) {
            return Err(AppError::Authorization(
                "Only the owner can modify this book".to_string(),
            ));
        }

        self.repository.books.update(book_id, &update).await
    }

    /// Delete a book and its rentals (owner only)
    pub async fn delete_book(&self, principal_id: i32, book_id: i32) -> AppResult<()> {
        let book = self.repository.books.get_by_id(book_id).await?;
        if !permissions::can_mutate_book(principal_id, book.owner_id, &Method::DELETE) {
            return Err(AppError::Authorization(
                "Only the owner can delete this book".to_string(),
            ));
        }

        self.repository.books.delete(book_id).await
    }

    /// Attach an uploaded image to a book (owner only)
    ///
    /// The payload must decode as an image; the blob is handed to the storage
    /// service and the resulting public URL is persisted on the book row.
    pub async fn upload_image(
        &self,
        principal_id: i32,
        book_id: i32,
        data: &[u8],
    ) -> AppResult<Book> {
        let book = self.repository.books.get_by_id(book_id).await?;
        if !permissions::is_owner(principal_id, book.owner_id) {
            return Err(AppError::Authorization(
                "Only the owner can upload an image for this book".to_string(),
            ));
        }

        let format = image::guess_format(data)
            .map_err(|_| AppError::Validation("Payload is not a recognized image".to_string()))?;
        image::load_from_memory_with_format(data, format)
            .map_err(|_| AppError::Validation("Payload is not a decodable image".to_string()))?;

        let ext = format.extensions_str().first().copied().unwrap_or("bin");
        let url = self.storage.store_book_image(data, ext).await?;

        self.repository.books.set_image(book_id, &url).await
    }
}
