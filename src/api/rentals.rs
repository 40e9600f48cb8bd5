//! Rental workflow endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::rental::{CreateRental, Rental, RentalDetails},
};

use super::AuthenticatedUser;

/// Transition response with the updated rental
#[derive(Serialize, ToSchema)]
pub struct RentalActionResponse {
    /// Human-readable outcome
    pub status: String,
    /// The rental after the transition
    pub rental: Rental,
}

/// Rental requests for books the current user owns
#[utoipa::path(
    get,
    path = "/rentals",
    tag = "rentals",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Incoming rental requests, newest first", body = Vec<RentalDetails>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_incoming(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<RentalDetails>>> {
    let rentals = state.services.rentals.list_incoming(claims.user_id).await?;
    Ok(Json(rentals))
}

/// Rental requests made by the current user
#[utoipa::path(
    get,
    path = "/rentals/mine",
    tag = "rentals",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "My rental requests, newest first", body = Vec<RentalDetails>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_rentals(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<RentalDetails>>> {
    let rentals = state.services.rentals.list_mine(claims.user_id).await?;
    Ok(Json(rentals))
}

/// Request to borrow a book
#[utoipa::path(
    post,
    path = "/rentals",
    tag = "rentals",
    security(("bearer_auth" = [])),
    request_body = CreateRental,
    responses(
        (status = 201, description = "Rental request created", body = Rental),
        (status = 400, description = "Own book or book unavailable"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn create_rental(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(rental): Json<CreateRental>,
) -> AppResult<(StatusCode, Json<Rental>)> {
    let created = state
        .services
        .rentals
        .request_rental(claims.user_id, rental)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Accept a rental request (book owner only)
#[utoipa::path(
    post,
    path = "/rentals/{id}/accept",
    tag = "rentals",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Rental ID")
    ),
    responses(
        (status = 200, description = "Rental accepted", body = RentalActionResponse),
        (status = 400, description = "Rental is not pending"),
        (status = 403, description = "Not the book owner"),
        (status = 404, description = "Rental not found")
    )
)]
pub async fn accept_rental(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<RentalActionResponse>> {
    let rental = state.services.rentals.accept(claims.user_id, id).await?;
    Ok(Json(RentalActionResponse {
        status: "Rental accepted".to_string(),
        rental,
    }))
}

/// Decline a rental request (book owner only)
#[utoipa::path(
    post,
    path = "/rentals/{id}/decline",
    tag = "rentals",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Rental ID")
    ),
    responses(
        (status = 200, description = "Rental declined", body = RentalActionResponse),
        (status = 400, description = "Rental is not pending"),
        (status = 403, description = "Not the book owner"),
        (status = 404, description = "Rental not found")
    )
)]
pub async fn decline_rental(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<RentalActionResponse>> {
    let rental = state.services.rentals.decline(claims.user_id, id).await?;
    Ok(Json(RentalActionResponse {
        status: "Rental declined".to_string(),
        rental,
    }))
}

/// Mark an accepted rental as returned (renter or book owner)
#[utoipa::path(
    post,
    path = "/rentals/{id}/return",
    tag = "rentals",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Rental ID")
    ),
    responses(
        (status = 200, description = "Rental marked as returned", body = RentalActionResponse),
        (status = 400, description = "Rental is not active"),
        (status = 403, description = "Not a party to this rental"),
        (status = 404, description = "Rental not found")
    )
)]
pub async fn return_rental(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<RentalActionResponse>> {
    let rental = state
        .services
        .rentals
        .mark_returned(claims.user_id, id)
        .await?;
    Ok(Json(RentalActionResponse {
        status: "Rental marked as returned".to_string(),
        rental,
    }))
}

/// Delete a rental record (book owner only)
#[utoipa::path(
    delete,
    path = "/rentals/{id}",
    tag = "rentals",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Rental ID")
    ),
    responses(
        (status = 204, description = "Rental deleted"),
        (status = 403, description = "Not the book owner"),
        (status = 404, description = "Rental not found")
    )
)]
pub async fn delete_rental(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.rentals.delete(claims.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
