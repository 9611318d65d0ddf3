//! Cart Models

use std::fmt;

use jiff::{SignedDuration, Timestamp};
use pitstop::{cart::Cart, pricing::Totals};
use rusty_money::iso::Currency;
use uuid::Uuid;

/// The single session or user that owns a cart.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CartOwner {
    /// Anonymous guest session
    Session(Uuid),

    /// Signed-in user
    User(Uuid),
}

impl fmt::Display for CartOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Session(uuid) => write!(f, "session:{uuid}"),
            Self::User(uuid) => write!(f, "user:{uuid}"),
        }
    }
}

/// Persisted cart state.
#[derive(Debug, Clone, PartialEq)]
pub struct CartRecord {
    pub owner: CartOwner,
    pub cart: Cart,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub expires_at: Timestamp,
}

impl CartRecord {
    /// A fresh, empty cart expiring `ttl` after `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the expiry is out of range.
    pub fn new(
        owner: CartOwner,
        currency: &'static Currency,
        now: Timestamp,
        ttl: SignedDuration,
    ) -> Result<Self, jiff::Error> {
        Ok(Self {
            owner,
            cart: Cart::new(currency),
            created_at: now,
            updated_at: now,
            expires_at: now.checked_add(ttl)?,
        })
    }

    #[must_use]
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires_at <= now
    }

    /// Mark the record as updated and slide its expiry.
    ///
    /// # Errors
    ///
    /// Returns an error if the expiry is out of range.
    pub fn touch(&mut self, now: Timestamp, ttl: SignedDuration) -> Result<(), jiff::Error> {
        self.expires_at = now.checked_add(ttl)?;
        self.updated_at = now;

        Ok(())
    }
}

/// A cart together with its freshly computed totals.
#[derive(Debug, Clone, PartialEq)]
pub struct CartView {
    pub owner: CartOwner,
    pub cart: Cart,
    pub totals: Totals,
    pub expires_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::EUR;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn new_record_is_empty_and_expires_after_ttl() -> TestResult {
        let now = Timestamp::now();
        let owner = CartOwner::Session(Uuid::now_v7());

        let record = CartRecord::new(owner, EUR, now, SignedDuration::from_hours(72))?;

        assert!(record.cart.is_empty());
        assert_eq!(record.expires_at.duration_since(now), SignedDuration::from_hours(72));
        assert!(!record.is_expired(now));
        assert!(record.is_expired(record.expires_at));

        Ok(())
    }

    #[test]
    fn touch_slides_expiry() -> TestResult {
        let now = Timestamp::now();
        let later = now.checked_add(SignedDuration::from_hours(1))?;
        let ttl = SignedDuration::from_hours(2);

        let mut record = CartRecord::new(CartOwner::User(Uuid::now_v7()), EUR, now, ttl)?;
        record.touch(later, ttl)?;

        assert_eq!(record.created_at, now);
        assert_eq!(record.updated_at, later);
        assert_eq!(record.expires_at, later.checked_add(ttl)?);

        Ok(())
    }

    #[test]
    fn owners_display_with_kind_prefix() {
        let uuid = Uuid::nil();

        assert_eq!(
            CartOwner::Session(uuid).to_string(),
            "session:00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(
            CartOwner::User(uuid).to_string(),
            "user:00000000-0000-0000-0000-000000000000"
        );
    }
}
