//! The bookstore: carts per client session, checkout and purchase history.
//!
//! # Design
//! `Bookstore` is plain synchronous state; the HTTP layer wraps it in a
//! mutex. Login, payment and time are injected so every rule can be tested
//! with simulators.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::auth::{LoginSystem, StaticLoginSystem};
use crate::calendar::{Clock, MonthOfYear, SystemClock};
use crate::cart::{Cart, Catalogue};
use crate::cashier::{AcceptAllPayments, Cashier, CreditCard, PaymentProcessor, SalesSummary};
use crate::config::{ServerConfig, DEFAULT_CART_TTL_MINUTES};
use crate::error::StoreError;

#[derive(Debug)]
struct ActiveCart {
    client_id: String,
    cart: Cart,
    last_used: DateTime<Utc>,
}

pub struct Bookstore {
    catalogue: Catalogue,
    login: Box<dyn LoginSystem>,
    cashier: Cashier,
    clock: Arc<dyn Clock>,
    cart_ttl: Duration,
    carts: HashMap<Uuid, ActiveCart>,
}

impl Bookstore {
    pub fn new(
        catalogue: Catalogue,
        login: Box<dyn LoginSystem>,
        processor: Box<dyn PaymentProcessor>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            catalogue,
            login,
            cashier: Cashier::new(processor),
            clock,
            cart_ttl: Duration::minutes(DEFAULT_CART_TTL_MINUTES),
            carts: HashMap::new(),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(
            config.catalogue.clone(),
            Box::new(StaticLoginSystem::new(config.clients.clone())),
            Box::new(AcceptAllPayments),
            Arc::new(SystemClock),
        )
        .with_cart_ttl_minutes(config.cart_ttl_minutes)
    }

    /// A cart unused for this long can no longer be read, filled or paid.
    /// Durations beyond what `chrono` can represent saturate.
    pub fn with_cart_ttl_minutes(mut self, minutes: i64) -> Self {
        self.cart_ttl = Duration::try_minutes(minutes).unwrap_or(if minutes < 0 {
            Duration::zero()
        } else {
            Duration::MAX
        });
        self
    }

    pub fn create_cart(&mut self, client_id: &str, password: &str) -> Result<Uuid, StoreError> {
        self.authenticate(client_id, password)?;
        let now = self.clock.now();
        let ttl = self.cart_ttl;
        self.carts.retain(|_, active| !is_expired(active.last_used, now, ttl));
        let cart_id = Uuid::new_v4();
        self.carts.insert(
            cart_id,
            ActiveCart {
                client_id: client_id.to_string(),
                cart: Cart::new(),
                last_used: now,
            },
        );
        Ok(cart_id)
    }

    pub fn list_cart(&mut self, cart_id: Uuid) -> Result<Vec<(String, u32)>, StoreError> {
        let active = touch(&mut self.carts, cart_id, self.clock.now(), self.cart_ttl)?;
        Ok(active.cart.books().to_vec())
    }

    pub fn add_to_cart(&mut self, cart_id: Uuid, isbn: &str, quantity: u32) -> Result<(), StoreError> {
        let active = touch(&mut self.carts, cart_id, self.clock.now(), self.cart_ttl)?;
        active.cart.add_book(&self.catalogue, isbn, quantity)
    }

    /// Returns the transaction id of the registered sale.
    pub fn checkout_cart(
        &mut self,
        cart_id: Uuid,
        card_number: &str,
        expiry: MonthOfYear,
        owner: &str,
    ) -> Result<Uuid, StoreError> {
        let active = touch(&mut self.carts, cart_id, self.clock.now(), self.cart_ttl)?;
        let card = CreditCard::new(card_number, expiry, owner)?;
        let today = self.clock.current_month();
        self.cashier
            .checkout(&active.client_id, &active.cart, &self.catalogue, &card, today)
    }

    pub fn list_purchases(&self, client_id: &str, password: &str) -> Result<SalesSummary, StoreError> {
        self.authenticate(client_id, password)?;
        Ok(self.cashier.summary_for(client_id))
    }

    fn authenticate(&self, client_id: &str, password: &str) -> Result<(), StoreError> {
        if self.login.authenticate(client_id, password) {
            Ok(())
        } else {
            Err(StoreError::InvalidCredentials)
        }
    }
}

// A ttl reaching back past the earliest representable instant never expires.
fn is_expired(last_used: DateTime<Utc>, now: DateTime<Utc>, ttl: Duration) -> bool {
    now.checked_sub_signed(ttl)
        .is_some_and(|cutoff| cutoff >= last_used)
}

/// Look up a live cart and mark it used now. An expired cart is dropped.
fn touch(
    carts: &mut HashMap<Uuid, ActiveCart>,
    cart_id: Uuid,
    now: DateTime<Utc>,
    ttl: Duration,
) -> Result<&mut ActiveCart, StoreError> {
    let last_used = carts.get(&cart_id).ok_or(StoreError::UnknownCart)?.last_used;
    if is_expired(last_used, now, ttl) {
        carts.remove(&cart_id);
        return Err(StoreError::SessionExpired);
    }
    let active = carts.get_mut(&cart_id).ok_or(StoreError::UnknownCart)?;
    active.last_used = now;
    Ok(active)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::calendar::ManualClock;
    use crate::cashier::PaymentDeclined;

    struct Declining;

    impl PaymentProcessor for Declining {
        fn debit(&self, _amount: u64, _card: &CreditCard) -> Result<(), PaymentDeclined> {
            Err(PaymentDeclined("gateway down".to_string()))
        }
    }

    fn catalogue() -> Catalogue {
        Catalogue::from([("isbn1".to_string(), 100), ("isbn2".to_string(), 250)])
    }

    fn login() -> Box<dyn LoginSystem> {
        Box::new(StaticLoginSystem::new(HashMap::from([(
            "client".to_string(),
            "pw".to_string(),
        )])))
    }

    fn clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::starting_at(
            Utc.with_ymd_and_hms(2023, 11, 24, 10, 0, 0).unwrap(),
        ))
    }

    fn store_with(clock: Arc<ManualClock>, processor: Box<dyn PaymentProcessor>) -> Bookstore {
        Bookstore::new(catalogue(), login(), processor, clock)
    }

    fn store() -> Bookstore {
        store_with(clock(), Box::new(AcceptAllPayments))
    }

    fn expiry() -> MonthOfYear {
        MonthOfYear::new(12, 2023).unwrap()
    }

    #[test]
    fn new_cart_is_empty() {
        let mut store = store();
        let cart_id = store.create_cart("client", "pw").unwrap();
        assert!(store.list_cart(cart_id).unwrap().is_empty());
    }

    #[test]
    fn create_cart_requires_valid_credentials() {
        let mut store = store();
        assert_eq!(store.create_cart("client", "nope"), Err(StoreError::InvalidCredentials));
    }

    #[test]
    fn each_cart_gets_its_own_id() {
        let mut store = store();
        let first = store.create_cart("client", "pw").unwrap();
        let second = store.create_cart("client", "pw").unwrap();
        assert_ne!(first, second);
        store.add_to_cart(first, "isbn1", 1).unwrap();
        assert!(store.list_cart(second).unwrap().is_empty());
    }

    #[test]
    fn unknown_cart_is_rejected() {
        let mut store = store();
        let missing = Uuid::new_v4();
        assert_eq!(store.list_cart(missing), Err(StoreError::UnknownCart));
        assert_eq!(store.add_to_cart(missing, "isbn1", 1), Err(StoreError::UnknownCart));
        assert_eq!(
            store.checkout_cart(missing, "1", expiry(), "Ada"),
            Err(StoreError::UnknownCart)
        );
    }

    #[test]
    fn added_books_are_listed_in_order() {
        let mut store = store();
        let cart_id = store.create_cart("client", "pw").unwrap();
        store.add_to_cart(cart_id, "isbn2", 2).unwrap();
        store.add_to_cart(cart_id, "isbn1", 1).unwrap();
        assert_eq!(
            store.list_cart(cart_id).unwrap(),
            vec![("isbn2".to_string(), 2), ("isbn1".to_string(), 1)]
        );
    }

    #[test]
    fn cart_expires_after_thirty_idle_minutes() {
        let clock = clock();
        let mut store = store_with(clock.clone(), Box::new(AcceptAllPayments));
        let cart_id = store.create_cart("client", "pw").unwrap();
        clock.advance_minutes(30);
        assert_eq!(store.list_cart(cart_id), Err(StoreError::SessionExpired));
    }

    #[test]
    fn expired_cart_is_forgotten() {
        let clock = clock();
        let mut store = store_with(clock.clone(), Box::new(AcceptAllPayments));
        let cart_id = store.create_cart("client", "pw").unwrap();
        clock.advance_minutes(30);
        assert_eq!(store.add_to_cart(cart_id, "isbn1", 1), Err(StoreError::SessionExpired));
        assert!(store.carts.is_empty());
        assert_eq!(store.list_cart(cart_id), Err(StoreError::UnknownCart));
    }

    #[test]
    fn creating_a_cart_sweeps_expired_ones() {
        let clock = clock();
        let mut store = store_with(clock.clone(), Box::new(AcceptAllPayments));
        let stale = store.create_cart("client", "pw").unwrap();
        clock.advance_minutes(30);
        let fresh = store.create_cart("client", "pw").unwrap();
        assert_eq!(store.carts.len(), 1);
        assert!(store.carts.contains_key(&fresh));
        assert!(!store.carts.contains_key(&stale));
    }

    #[test]
    fn huge_ttl_never_expires_and_never_panics() {
        let clock = clock();
        let mut store = store_with(clock.clone(), Box::new(AcceptAllPayments)).with_cart_ttl_minutes(200_000_000_000);
        let cart_id = store.create_cart("client", "pw").unwrap();
        clock.advance_minutes(60 * 24 * 365);
        assert!(store.list_cart(cart_id).unwrap().is_empty());

        let mut store = store_with(clock.clone(), Box::new(AcceptAllPayments)).with_cart_ttl_minutes(i64::MAX / 2);
        let cart_id = store.create_cart("client", "pw").unwrap();
        assert!(store.list_cart(cart_id).unwrap().is_empty());
    }

    #[test]
    fn using_a_cart_refreshes_it() {
        let clock = clock();
        let mut store = store_with(clock.clone(), Box::new(AcceptAllPayments));
        let cart_id = store.create_cart("client", "pw").unwrap();
        clock.advance_minutes(20);
        store.add_to_cart(cart_id, "isbn1", 1).unwrap();
        clock.advance_minutes(20);
        assert_eq!(store.list_cart(cart_id).unwrap().len(), 1);
    }

    #[test]
    fn custom_ttl_is_honoured() {
        let clock = clock();
        let mut store = store_with(clock.clone(), Box::new(AcceptAllPayments)).with_cart_ttl_minutes(5);
        let cart_id = store.create_cart("client", "pw").unwrap();
        clock.advance_minutes(5);
        assert_eq!(store.list_cart(cart_id), Err(StoreError::SessionExpired));
    }

    #[test]
    fn expired_cart_cannot_be_checked_out() {
        let clock = clock();
        let mut store = store_with(clock.clone(), Box::new(AcceptAllPayments));
        let cart_id = store.create_cart("client", "pw").unwrap();
        store.add_to_cart(cart_id, "isbn1", 1).unwrap();
        clock.advance_minutes(31);
        assert_eq!(
            store.checkout_cart(cart_id, "1", expiry(), "Ada"),
            Err(StoreError::SessionExpired)
        );
    }

    #[test]
    fn checkout_validates_card_before_charging() {
        let mut store = store();
        let cart_id = store.create_cart("client", "pw").unwrap();
        store.add_to_cart(cart_id, "isbn1", 1).unwrap();
        assert_eq!(
            store.checkout_cart(cart_id, "1", expiry(), "J. Doe"),
            Err(StoreError::InvalidCardData)
        );
        assert_eq!(store.list_purchases("client", "pw").unwrap(), SalesSummary::default());
    }

    #[test]
    fn checkout_with_card_expired_last_month() {
        let mut store = store();
        let cart_id = store.create_cart("client", "pw").unwrap();
        store.add_to_cart(cart_id, "isbn1", 1).unwrap();
        let last_month = MonthOfYear::new(10, 2023).unwrap();
        assert_eq!(
            store.checkout_cart(cart_id, "1", last_month, "Ada"),
            Err(StoreError::ExpiredCard)
        );
    }

    #[test]
    fn declined_payment_is_reported() {
        let mut store = store_with(clock(), Box::new(Declining));
        let cart_id = store.create_cart("client", "pw").unwrap();
        store.add_to_cart(cart_id, "isbn1", 1).unwrap();
        assert_eq!(
            store.checkout_cart(cart_id, "1", expiry(), "Ada"),
            Err(StoreError::PaymentFailed)
        );
    }

    #[test]
    fn purchases_accumulate_per_client() {
        let mut store = store();
        let cart_id = store.create_cart("client", "pw").unwrap();
        store.add_to_cart(cart_id, "isbn1", 2).unwrap();
        store.checkout_cart(cart_id, "1", expiry(), "Ada").unwrap();

        let other = store.create_cart("client", "pw").unwrap();
        store.add_to_cart(other, "isbn2", 1).unwrap();
        store.checkout_cart(other, "1", expiry(), "Ada").unwrap();

        let summary = store.list_purchases("client", "pw").unwrap();
        assert_eq!(summary.total, 450);
        assert_eq!(
            summary.books,
            vec![("isbn1".to_string(), 2), ("isbn2".to_string(), 1)]
        );
    }

    #[test]
    fn list_purchases_requires_valid_credentials() {
        let store = store();
        assert_eq!(store.list_purchases("client", "bad"), Err(StoreError::InvalidCredentials));
    }

    #[test]
    fn from_config_uses_configured_clients() {
        let config = ServerConfig::default();
        let mut store = Bookstore::from_config(&config);
        assert!(store.create_cart("client-1", "pw").is_ok());
        assert_eq!(store.create_cart("client-1", "other"), Err(StoreError::InvalidCredentials));
    }
}
