//! Rentals repository for database operations
//!
//! Transitions that touch both the rental and its book (accept, return) run in
//! a single transaction with the book row locked `FOR UPDATE`, so concurrent
//! transitions on the same book serialize at the lock and the availability
//! flag never drifts from the set of accepted rentals.

use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult, DomainRule},
    models::{
        book::BookShort,
        rental::{CreateRental, Rental, RentalDetails},
        user::UserShort,
    },
};

#[derive(Clone)]
pub struct RentalsRepository {
    pool: Pool<Postgres>,
}

impl RentalsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get rental by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Rental> {
        sqlx::query_as::<_, Rental>("SELECT * FROM rentals WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Rental with id {} not found", id)))
    }

    /// Get rental together with the owning user of its book (for authorization)
    pub async fn get_with_owner(&self, id: i32) -> AppResult<(Rental, i32)> {
        let row = sqlx::query(
            r#"
            SELECT r.*, b.owner_id AS book_owner_id
            FROM rentals r
            JOIN books b ON r.book_id = b.id
            WHERE r.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Rental with id {} not found", id)))?;

        let rental = Rental {
            id: row.get("id"),
            renter_id: row.get("renter_id"),
            book_id: row.get("book_id"),
            status: row.get("status"),
            request_date: row.get("request_date"),
            start_date: row.get("start_date"),
            end_date: row.get("end_date"),
            message: row.get("message"),
        };

        Ok((rental, row.get("book_owner_id")))
    }

    /// Rentals for books owned by `owner_id` (incoming requests), newest first
    pub async fn list_incoming(&self, owner_id: i32) -> AppResult<Vec<RentalDetails>> {
        self.list_details("b.owner_id = $1", owner_id).await
    }

    /// Rentals requested by `renter_id`, newest first
    pub async fn list_by_renter(&self, renter_id: i32) -> AppResult<Vec<RentalDetails>> {
        self.list_details("r.renter_id = $1", renter_id).await
    }

    async fn list_details(&self, filter: &str, id: i32) -> AppResult<Vec<RentalDetails>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT r.id, r.status, r.request_date, r.start_date, r.end_date, r.message,
                   b.id AS book_id, b.owner_id, b.title, b.author, b.condition,
                   b.is_available, b.image,
                   u.id AS renter_id, u.email, u.first_name, u.last_name
            FROM rentals r
            JOIN books b ON r.book_id = b.id
            JOIN users u ON r.renter_id = u.id
            WHERE {}
            ORDER BY r.request_date DESC
            "#,
            filter
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            result.push(RentalDetails {
                id: row.get("id"),
                status: row.get("status"),
                request_date: row.get("request_date"),
                start_date: row.get("start_date"),
                end_date: row.get("end_date"),
                message: row.get("message"),
                book: BookShort {
                    id: row.get("book_id"),
                    owner_id: row.get("owner_id"),
                    title: row.get("title"),
                    author: row.get("author"),
                    condition: row.get("condition"),
                    is_available: row.get("is_available"),
                    image: row.get("image"),
                },
                renter: UserShort {
                    id: row.get("renter_id"),
                    email: row.get("email"),
                    first_name: row.get("first_name"),
                    last_name: row.get("last_name"),
                },
            });
        }

        Ok(result)
    }

    /// Create a new rental request in `pending` state
    ///
    /// Creating a request does not touch book availability; the flag only
    /// flips on acceptance.
    pub async fn create(&self, renter_id: i32, rental: &CreateRental) -> AppResult<Rental> {
        let created = sqlx::query_as::<_, Rental>(
            r#"
            INSERT INTO rentals (renter_id, book_id, status, start_date, end_date, message)
            VALUES ($1, $2, 'pending', $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(renter_id)
        .bind(rental.book_id)
        .bind(rental.start_date)
        .bind(rental.end_date)
        .bind(&rental.message)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Transition a pending rental to `accepted` and mark the book unavailable
    ///
    /// Both writes commit atomically. The status update is guarded on
    /// `pending` and the availability update on `is_available = TRUE`; if
    /// either guard matches no row the transaction rolls back, so two
    /// concurrent accepts for the same book cannot both succeed.
    pub async fn accept(&self, rental_id: i32) -> AppResult<Rental> {
        let mut tx = self.pool.begin().await?;

        let book_id = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT b.id FROM books b
            JOIN rentals r ON r.book_id = b.id
            WHERE r.id = $1
            FOR UPDATE OF b
            "#,
        )
        .bind(rental_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Rental with id {} not found", rental_id)))?;

        let updated =
            sqlx::query("UPDATE rentals SET status = 'accepted' WHERE id = $1 AND status = 'pending'")
                .bind(rental_id)
                .execute(&mut *tx)
                .await?
                .rows_affected();

        if updated == 0 {
            return Err(AppError::Domain(
                DomainRule::InvalidTransition,
                "Rental is not pending".to_string(),
            ));
        }

        let flipped =
            sqlx::query("UPDATE books SET is_available = FALSE WHERE id = $1 AND is_available = TRUE")
                .bind(book_id)
                .execute(&mut *tx)
                .await?
                .rows_affected();

        if flipped == 0 {
            // A concurrent accept already took the book.
            return Err(AppError::Domain(
                DomainRule::InvalidTransition,
                "Book is no longer available".to_string(),
            ));
        }

        let rental = sqlx::query_as::<_, Rental>("SELECT * FROM rentals WHERE id = $1")
            .bind(rental_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(rental)
    }

    /// Transition a pending rental to `declined`; no book side effect
    pub async fn decline(&self, rental_id: i32) -> AppResult<Rental> {
        let declined = sqlx::query_as::<_, Rental>(
            "UPDATE rentals SET status = 'declined' WHERE id = $1 AND status = 'pending' RETURNING *",
        )
        .bind(rental_id)
        .fetch_optional(&self.pool)
        .await?;

        match declined {
            Some(rental) => Ok(rental),
            None => {
                // Distinguish a rental deleted out from under us from one in
                // the wrong state.
                let exists: bool =
                    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM rentals WHERE id = $1)")
                        .bind(rental_id)
                        .fetch_one(&self.pool)
                        .await?;

                if exists {
                    Err(AppError::Domain(
                        DomainRule::InvalidTransition,
                        "Rental is not pending".to_string(),
                    ))
                } else {
                    Err(AppError::NotFound(format!(
                        "Rental with id {} not found",
                        rental_id
                    )))
                }
            }
        }
    }

    /// Transition an accepted rental to `returned` and restore availability
    ///
    /// Same atomicity discipline as [`accept`](Self::accept).
    pub async fn mark_returned(&self, rental_id: i32) -> AppResult<Rental> {
        let mut tx = self.pool.begin().await?;

        let book_id = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT b.id FROM books b
            JOIN rentals r ON r.book_id = b.id
            WHERE r.id = $1
            FOR UPDATE OF b
            "#,
        )
        .bind(rental_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Rental with id {} not found", rental_id)))?;

        let updated =
            sqlx::query("UPDATE rentals SET status = 'returned' WHERE id = $1 AND status = 'accepted'")
                .bind(rental_id)
                .execute(&mut *tx)
                .await?
                .rows_affected();

        if updated == 0 {
            return Err(AppError::Domain(
                DomainRule::InvalidTransition,
                "Rental is not active".to_string(),
            ));
        }

        sqlx::query("UPDATE books SET is_available = TRUE WHERE id = $1")
            .bind(book_id)
            .execute(&mut *tx)
            .await?;

        let rental = sqlx::query_as::<_, Rental>("SELECT * FROM rentals WHERE id = $1")
            .bind(rental_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(rental)
    }

    /// Hard delete a rental, regardless of status
    pub async fn delete(&self, rental_id: i32) -> AppResult<()> {
        let deleted = sqlx::query("DELETE FROM rentals WHERE id = $1")
            .bind(rental_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(AppError::NotFound(format!(
                "Rental with id {} not found",
                rental_id
            )));
        }

        Ok(())
    }
}
