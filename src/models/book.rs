//! Book model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use validator::Validate;

/// Physical condition of a listed book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BookCondition {
    New,
    LikeNew,
    Good,
    Fair,
    Poor,
}

impl BookCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookCondition::New => "new",
            BookCondition::LikeNew => "like_new",
            BookCondition::Good => "good",
            BookCondition::Fair => "fair",
            BookCondition::Poor => "poor",
        }
    }
}

impl std::fmt::Display for BookCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BookCondition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(BookCondition::New),
            "like_new" => Ok(BookCondition::LikeNew),
            "good" => Ok(BookCondition::Good),
            "fair" => Ok(BookCondition::Fair),
            "poor" => Ok(BookCondition::Poor),
            _ => Err(format!("Invalid book condition: {}", s)),
        }
    }
}

// SQLx conversion for BookCondition (stored as VARCHAR)
impl sqlx::Type<Postgres> for BookCondition {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        // Accept every textual column type String decodes from (VARCHAR included)
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for BookCondition {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for BookCondition {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// Book model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub owner_id: i32,
    pub title: String,
    pub author: String,
    pub description: String,
    pub condition: BookCondition,
    pub is_available: bool,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Short book representation embedded in rental listings
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookShort {
    pub id: i32,
    pub owner_id: i32,
    pub title: String,
    pub author: String,
    pub condition: BookCondition,
    pub is_available: bool,
    pub image: Option<String>,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author is required"))]
    pub author: String,
    #[serde(default)]
    pub description: String,
    pub condition: BookCondition,
}

/// Update book request (PUT and PATCH share this; absent fields are kept)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Author cannot be empty"))]
    pub author: Option<String>,
    pub description: Option<String>,
    pub condition: Option<BookCondition>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_parse_round_trip() {
        for s in ["new", "like_new", "good", "fair", "poor"] {
            let condition: BookCondition = s.parse().unwrap();
            assert_eq!(condition.as_str(), s);
        }
    }

    #[test]
    fn test_condition_decodes_from_varchar_column() {
        use sqlx::postgres::PgTypeInfo;
        use sqlx::Type;

        // The condition column is VARCHAR(20), not TEXT
        assert!(<BookCondition as Type<sqlx::Postgres>>::compatible(
            &PgTypeInfo::with_name("VARCHAR")
        ));
        assert!(<BookCondition as Type<sqlx::Postgres>>::compatible(
            &<String as Type<sqlx::Postgres>>::type_info()
        ));
    }

    #[test]
    fn test_condition_rejects_unknown() {
        assert!("pristine".parse::<BookCondition>().is_err());
        assert!("".parse::<BookCondition>().is_err());
    }
}
