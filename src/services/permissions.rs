//! Shared authorization predicates
//!
//! Permission checks are a static table over explicit actions; the acting
//! principal is always passed in, never read from ambient request context.

use axum::http::Method;

/// Actions a principal can attempt on a rental
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RentalAction {
    Accept,
    Decline,
    MarkReturned,
    Delete,
}

/// Whether the principal owns the book
pub fn is_owner(principal_id: i32, book_owner_id: i32) -> bool {
    principal_id == book_owner_id
}

/// Read methods are open to everyone; writes are owner-only
pub fn can_mutate_book(principal_id: i32, book_owner_id: i32, method: &Method) -> bool {
    if method.is_safe() {
        return true;
    }
    is_owner(principal_id, book_owner_id)
}

/// Whether the principal may perform `action` on a rental
///
/// Accept/decline (and the owner-of-record delete) belong to the book's
/// owner; marking returned is open to either party of the transaction.
pub fn can_act_on_rental(
    principal_id: i32,
    renter_id: i32,
    book_owner_id: i32,
    action: RentalAction,
) -> bool {
    match action {
        RentalAction::Accept | RentalAction::Decline | RentalAction::Delete => {
            is_owner(principal_id, book_owner_id)
        }
        RentalAction::MarkReturned => {
            principal_id == renter_id || is_owner(principal_id, book_owner_id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: i32 = 1;
    const RENTER: i32 = 2;
    const STRANGER: i32 = 3;

    #[test]
    fn test_is_owner() {
        assert!(is_owner(OWNER, OWNER));
        assert!(!is_owner(RENTER, OWNER));
    }

    #[test]
    fn test_book_reads_are_open() {
        assert!(can_mutate_book(STRANGER, OWNER, &Method::GET));
        assert!(can_mutate_book(STRANGER, OWNER, &Method::HEAD));
    }

    #[test]
    fn test_book_writes_are_owner_only() {
        for method in [Method::PUT, Method::PATCH, Method::DELETE, Method::POST] {
            assert!(can_mutate_book(OWNER, OWNER, &method));
            assert!(!can_mutate_book(RENTER, OWNER, &method));
        }
    }

    #[test]
    fn test_accept_decline_owner_only() {
        for action in [RentalAction::Accept, RentalAction::Decline] {
            assert!(can_act_on_rental(OWNER, RENTER, OWNER, action));
            assert!(!can_act_on_rental(RENTER, RENTER, OWNER, action));
            assert!(!can_act_on_rental(STRANGER, RENTER, OWNER, action));
        }
    }

    #[test]
    fn test_mark_returned_renter_or_owner() {
        assert!(can_act_on_rental(OWNER, RENTER, OWNER, RentalAction::MarkReturned));
        assert!(can_act_on_rental(RENTER, RENTER, OWNER, RentalAction::MarkReturned));
        assert!(!can_act_on_rental(STRANGER, RENTER, OWNER, RentalAction::MarkReturned));
    }

    #[test]
    fn test_delete_scoped_to_owner_of_record() {
        assert!(can_act_on_rental(OWNER, RENTER, OWNER, RentalAction::Delete));
        assert!(!can_act_on_rental(RENTER, RENTER, OWNER, RentalAction::Delete));
    }
}
