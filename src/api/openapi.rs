//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, health, rentals};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookswap API",
        version = "0.3.0",
        description = "Peer-to-peer book lending marketplace REST API",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::me,
        auth::update_my_profile,
        // Books
        books::list_books,
        books::my_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        books::upload_image,
        // Rentals
        rentals::list_incoming,
        rentals::my_rentals,
        rentals::create_rental,
        rentals::accept_rental,
        rentals::decline_rental,
        rentals::return_rental,
        rentals::delete_rental,
    ),
    components(
        schemas(
            // Users
            crate::models::user::User,
            crate::models::user::UserShort,
            crate::models::user::UpdateProfile,
            // Books
            crate::models::book::Book,
            crate::models::book::BookShort,
            crate::models::book::BookCondition,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            // Rentals
            crate::models::rental::Rental,
            crate::models::rental::RentalDetails,
            crate::models::rental::RentalStatus,
            crate::models::rental::CreateRental,
            rentals::RentalActionResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authenticated user endpoints"),
        (name = "books", description = "Book catalog"),
        (name = "rentals", description = "Rental workflow")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
