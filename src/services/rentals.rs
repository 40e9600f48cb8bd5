//! Rental workflow service
//!
//! Owns the rental lifecycle and its side effect on book availability. All
//! cross-aggregate writes (a rental transition flipping `books.is_available`)
//! go through here and the transactional repository paths underneath.

use crate::{
    error::{AppError, AppResult, DomainRule},
    models::rental::{CreateRental, Rental, RentalDetails},
    repository::Repository,
    services::permissions::{self, RentalAction},
};

#[derive(Clone)]
pub struct RentalsService {
    repository: Repository,
}

impl RentalsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Rental requests for books the principal owns, newest first
    pub async fn list_incoming(&self, principal_id: i32) -> AppResult<Vec<RentalDetails>> {
        self.repository.rentals.list_incoming(principal_id).await
    }

    /// Rental requests made by the principal, newest first
    pub async fn list_mine(&self, principal_id: i32) -> AppResult<Vec<RentalDetails>> {
        self.repository.rentals.list_by_renter(principal_id).await
    }

    /// Request to borrow a book
    pub async fn request_rental(
        &self,
        renter_id: i32,
        rental: CreateRental,
    ) -> AppResult<Rental> {
        let book = self.repository.books.get_by_id(rental.book_id).await?;

        if book.owner_id == renter_id {
            return Err(AppError::Domain(
                DomainRule::SelfRental,
                "You cannot rent your own book".to_string(),
            ));
        }

        if !book.is_available {
            return Err(AppError::Domain(
                DomainRule::Unavailable,
                "This book is currently not available".to_string(),
            ));
        }

        let created = self.repository.rentals.create(renter_id, &rental).await?;

        tracing::info!(
            rental_id = created.id,
            book_id = book.id,
            renter_id,
            "rental requested"
        );

        Ok(created)
    }

    /// Accept a pending rental request (book owner only)
    pub async fn accept(&self, actor_id: i32, rental_id: i32) -> AppResult<Rental> {
        let (rental, book_owner_id) = self.repository.rentals.get_with_owner(rental_id).await?;

        if !permissions::can_act_on_rental(
            actor_id,
            rental.renter_id,
            book_owner_id,
            RentalAction::Accept,
        ) {
            return Err(AppError::Authorization(
                "Only the book owner can accept a rental".to_string(),
            ));
        }

        let accepted = self.repository.rentals.accept(rental_id).await?;

        tracing::info!(rental_id, book_id = accepted.book_id, "rental accepted");

        Ok(accepted)
    }

    /// Decline a pending rental request (book owner only)
    pub async fn decline(&self, actor_id: i32, rental_id: i32) -> AppResult<Rental> {
        let (rental, book_owner_id) = self.repository.rentals.get_with_owner(rental_id).await?;

        if !permissions::can_act_on_rental(
            actor_id,
            rental.renter_id,
            book_owner_id,
            RentalAction::Decline,
        ) {
            return Err(AppError::Authorization(
                "Only the book owner can decline a rental".to_string(),
            ));
        }

        self.repository.rentals.decline(rental_id).await
    }

    /// Mark an accepted rental as returned (renter or book owner)
    pub async fn mark_returned(&self, actor_id: i32, rental_id: i32) -> AppResult<Rental> {
        let (rental, book_owner_id) = self.repository.rentals.get_with_owner(rental_id).await?;

        if !permissions::can_act_on_rental(
            actor_id,
            rental.renter_id,
            book_owner_id,
            RentalAction::MarkReturned,
        ) {
            return Err(AppError::Authorization(
                "Only the renter or the book owner can mark a rental returned".to_string(),
            ));
        }

        let returned = self.repository.rentals.mark_returned(rental_id).await?;

        tracing::info!(rental_id, book_id = returned.book_id, "rental returned");

        Ok(returned)
    }

    /// Delete a rental record (book owner only)
    ///
    /// No state-machine guard: a rental is deletable in any status, matching
    /// the long-standing behavior callers rely on. See DESIGN.md for the
    /// availability-flag caveat this carries.
    pub async fn delete(&self, actor_id: i32, rental_id: i32) -> AppResult<()> {
        let (rental, book_owner_id) = self.repository.rentals.get_with_owner(rental_id).await?;

        if !permissions::can_act_on_rental(
            actor_id,
            rental.renter_id,
            book_owner_id,
            RentalAction::Delete,
        ) {
            return Err(AppError::Authorization(
                "Only the book owner can delete a rental".to_string(),
            ));
        }

        self.repository.rentals.delete(rental_id).await
    }
}
