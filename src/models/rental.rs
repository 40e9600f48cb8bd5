//! Rental model and the rental state machine

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;

use super::book::BookShort;
use super::user::UserShort;

/// Rental lifecycle status
///
/// Transitions: pending -> accepted | declined; accepted -> returned | cancelled.
/// Declined, returned and cancelled are terminal; nothing re-enters pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RentalStatus {
    Pending,
    Accepted,
    Declined,
    Returned,
    Cancelled,
}

impl RentalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RentalStatus::Pending => "pending",
            RentalStatus::Accepted => "accepted",
            RentalStatus::Declined => "declined",
            RentalStatus::Returned => "returned",
            RentalStatus::Cancelled => "cancelled",
        }
    }

    /// Whether the status has no outgoing transitions
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RentalStatus::Declined | RentalStatus::Returned | RentalStatus::Cancelled
        )
    }

    /// Whether a direct transition to `next` is allowed
    pub fn can_transition_to(&self, next: RentalStatus) -> bool {
        matches!(
            (self, next),
            (RentalStatus::Pending, RentalStatus::Accepted)
                | (RentalStatus::Pending, RentalStatus::Declined)
                | (RentalStatus::Accepted, RentalStatus::Returned)
                | (RentalStatus::Accepted, RentalStatus::Cancelled)
        )
    }
}

impl std::fmt::Display for RentalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RentalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RentalStatus::Pending),
            "accepted" => Ok(RentalStatus::Accepted),
            "declined" => Ok(RentalStatus::Declined),
            "returned" => Ok(RentalStatus::Returned),
            "cancelled" => Ok(RentalStatus::Cancelled),
            _ => Err(format!("Invalid rental status: {}", s)),
        }
    }
}

// SQLx conversion for RentalStatus (stored as VARCHAR)
impl sqlx::Type<Postgres> for RentalStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        // Accept every textual column type String decodes from (VARCHAR included)
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for RentalStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for RentalStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// Rental model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Rental {
    pub id: i32,
    pub renter_id: i32,
    pub book_id: i32,
    pub status: RentalStatus,
    pub request_date: DateTime<Utc>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub message: String,
}

/// Rental with book and renter details for listings
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RentalDetails {
    pub id: i32,
    pub status: RentalStatus,
    pub request_date: DateTime<Utc>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub message: String,
    pub book: BookShort,
    pub renter: UserShort,
}

/// Create rental request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRental {
    pub book_id: i32,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::RentalStatus::*;
    use super::*;

    const ALL: [RentalStatus; 5] = [Pending, Accepted, Declined, Returned, Cancelled];

    #[test]
    fn test_pending_transitions() {
        assert!(Pending.can_transition_to(Accepted));
        assert!(Pending.can_transition_to(Declined));
        assert!(!Pending.can_transition_to(Returned));
        assert!(!Pending.can_transition_to(Cancelled));
        assert!(!Pending.can_transition_to(Pending));
    }

    #[test]
    fn test_accepted_transitions() {
        assert!(Accepted.can_transition_to(Returned));
        assert!(Accepted.can_transition_to(Cancelled));
        assert!(!Accepted.can_transition_to(Pending));
        assert!(!Accepted.can_transition_to(Declined));
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        for status in ALL {
            if status.is_terminal() {
                for next in ALL {
                    assert!(
                        !status.can_transition_to(next),
                        "{} -> {} should be rejected",
                        status,
                        next
                    );
                }
            }
        }
    }

    #[test]
    fn test_nothing_reenters_pending() {
        for status in ALL {
            assert!(!status.can_transition_to(Pending));
        }
    }

    #[test]
    fn test_status_decodes_from_varchar_column() {
        use sqlx::postgres::PgTypeInfo;
        use sqlx::Type;

        // The status column is VARCHAR(20), not TEXT
        assert!(<RentalStatus as Type<sqlx::Postgres>>::compatible(
            &PgTypeInfo::with_name("VARCHAR")
        ));
        assert!(<RentalStatus as Type<sqlx::Postgres>>::compatible(
            &<String as Type<sqlx::Postgres>>::type_info()
        ));
    }

    #[test]
    fn test_status_parse_round_trip() {
        for status in ALL {
            let parsed: RentalStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
        assert!("active".parse::<RentalStatus>().is_err());
    }
}
