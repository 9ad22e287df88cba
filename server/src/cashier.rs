//! Checkout: card validation, payment and the sales registry.

use std::collections::HashMap;

use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::calendar::MonthOfYear;
use crate::cart::{Cart, Catalogue};
use crate::error::StoreError;

const MAX_CARD_DIGITS: usize = 16;
const MAX_OWNER_CHARS: usize = 30;
const SHOWN_DIGITS: usize = 4;

/// A card that passed the format checks. Expiry is checked at checkout;
/// the owner name is only validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditCard {
    number: String,
    expiry: MonthOfYear,
}

impl CreditCard {
    pub fn new(number: &str, expiry: MonthOfYear, owner: &str) -> Result<Self, StoreError> {
        let owner_len = owner.chars().count();
        if owner_len == 0 || owner_len > MAX_OWNER_CHARS {
            return Err(StoreError::InvalidCardData);
        }
        if !owner.chars().all(|c| c.is_alphabetic() || c == ' ') {
            return Err(StoreError::InvalidCardData);
        }
        if number.is_empty() || number.len() > MAX_CARD_DIGITS {
            return Err(StoreError::InvalidCardData);
        }
        if !number.bytes().all(|b| b.is_ascii_digit()) {
            return Err(StoreError::InvalidCardData);
        }
        Ok(Self {
            number: number.to_string(),
            expiry,
        })
    }

    /// Trailing digits, safe to log.
    pub fn last_digits(&self) -> &str {
        &self.number[self.number.len().saturating_sub(SHOWN_DIGITS)..]
    }

    pub fn is_expired(&self, today: MonthOfYear) -> bool {
        self.expiry.is_before(today)
    }
}

#[derive(Debug, Error)]
#[error("payment declined: {0}")]
pub struct PaymentDeclined(pub String);

/// The merchant's payment gateway.
pub trait PaymentProcessor: Send + Sync {
    fn debit(&self, amount: u64, card: &CreditCard) -> Result<(), PaymentDeclined>;
}

/// Accepts every charge. Stands in for a real gateway.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllPayments;

impl PaymentProcessor for AcceptAllPayments {
    fn debit(&self, _amount: u64, _card: &CreditCard) -> Result<(), PaymentDeclined> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sale {
    pub id: Uuid,
    pub total: u64,
    pub books: Vec<(String, u32)>,
}

/// Everything one client has bought, books merged in first-bought order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SalesSummary {
    pub total: u64,
    pub books: Vec<(String, u32)>,
}

impl SalesSummary {
    fn from_sales<'a>(sales: impl IntoIterator<Item = &'a Sale>) -> Self {
        let mut summary = Self::default();
        for sale in sales {
            summary.total += sale.total;
            for (isbn, quantity) in &sale.books {
                match summary.books.iter_mut().find(|(book, _)| book == isbn) {
                    Some((_, held)) => *held = held.saturating_add(*quantity),
                    None => summary.books.push((isbn.clone(), *quantity)),
                }
            }
        }
        summary
    }
}

pub struct Cashier {
    processor: Box<dyn PaymentProcessor>,
    sales_by_client: HashMap<String, Vec<Sale>>,
}

impl Cashier {
    pub fn new(processor: Box<dyn PaymentProcessor>) -> Self {
        Self {
            processor,
            sales_by_client: HashMap::new(),
        }
    }

    /// Charge the card for the cart and register the sale under `client_id`.
    pub fn checkout(
        &mut self,
        client_id: &str,
        cart: &Cart,
        catalogue: &Catalogue,
        card: &CreditCard,
        today: MonthOfYear,
    ) -> Result<Uuid, StoreError> {
        if cart.is_empty() {
            return Err(StoreError::EmptyCart);
        }
        if card.is_expired(today) {
            return Err(StoreError::ExpiredCard);
        }
        let total = cart.total_price(catalogue);
        self.processor.debit(total, card).map_err(|declined| {
            warn!(client_id, total, card = card.last_digits(), error = %declined, "payment declined");
            StoreError::PaymentFailed
        })?;

        let sale = Sale {
            id: Uuid::new_v4(),
            total,
            books: cart.books().to_vec(),
        };
        let id = sale.id;
        self.sales_by_client
            .entry(client_id.to_string())
            .or_default()
            .push(sale);
        Ok(id)
    }

    pub fn summary_for(&self, client_id: &str) -> SalesSummary {
        SalesSummary::from_sales(self.sales_by_client.get(client_id).into_iter().flatten())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    use super::*;

    struct Declining;

    impl PaymentProcessor for Declining {
        fn debit(&self, _amount: u64, _card: &CreditCard) -> Result<(), PaymentDeclined> {
            Err(PaymentDeclined("insufficient funds".to_string()))
        }
    }

    /// Remembers the last amount charged.
    #[derive(Clone, Default)]
    struct Recording(Arc<AtomicU64>);

    impl PaymentProcessor for Recording {
        fn debit(&self, amount: u64, _card: &CreditCard) -> Result<(), PaymentDeclined> {
            self.0.store(amount, Ordering::SeqCst);
            Ok(())
        }
    }

    fn catalogue() -> Catalogue {
        Catalogue::from([("isbn1".to_string(), 100), ("isbn2".to_string(), 250)])
    }

    fn today() -> MonthOfYear {
        MonthOfYear::new(11, 2023).unwrap()
    }

    fn card() -> CreditCard {
        CreditCard::new("1234567890123456", MonthOfYear::new(12, 2023).unwrap(), "Alan Turing").unwrap()
    }

    fn cart_with(books: &[(&str, u32)]) -> Cart {
        let mut cart = Cart::new();
        for (isbn, quantity) in books {
            cart.add_book(&catalogue(), isbn, *quantity).unwrap();
        }
        cart
    }

    #[test]
    fn card_rejects_bad_owner() {
        let expiry = today();
        assert_eq!(CreditCard::new("1", expiry, ""), Err(StoreError::InvalidCardData));
        assert_eq!(CreditCard::new("1", expiry, "J. Doe"), Err(StoreError::InvalidCardData));
        assert_eq!(
            CreditCard::new("1", expiry, &"a".repeat(31)),
            Err(StoreError::InvalidCardData)
        );
    }

    #[test]
    fn card_rejects_bad_number() {
        let expiry = today();
        assert_eq!(CreditCard::new("", expiry, "Ada"), Err(StoreError::InvalidCardData));
        assert_eq!(CreditCard::new("12345678901234567", expiry, "Ada"), Err(StoreError::InvalidCardData));
        assert_eq!(CreditCard::new("1234-5678", expiry, "Ada"), Err(StoreError::InvalidCardData));
    }

    #[test]
    fn only_trailing_digits_are_shown() {
        assert_eq!(card().last_digits(), "3456");
        assert_eq!(CreditCard::new("12", today(), "Ada").unwrap().last_digits(), "12");
    }

    #[test]
    fn card_expiring_this_month_is_valid() {
        assert!(!CreditCard::new("1", today(), "Ada").unwrap().is_expired(today()));
    }

    #[test]
    fn empty_cart_cannot_be_checked_out() {
        let mut cashier = Cashier::new(Box::new(AcceptAllPayments));
        let err = cashier
            .checkout("client", &Cart::new(), &catalogue(), &card(), today())
            .unwrap_err();
        assert_eq!(err, StoreError::EmptyCart);
    }

    #[test]
    fn expired_card_is_rejected() {
        let mut cashier = Cashier::new(Box::new(AcceptAllPayments));
        let expired = CreditCard::new("1", MonthOfYear::new(10, 2023).unwrap(), "Ada").unwrap();
        let err = cashier
            .checkout("client", &cart_with(&[("isbn1", 1)]), &catalogue(), &expired, today())
            .unwrap_err();
        assert_eq!(err, StoreError::ExpiredCard);
        assert_eq!(cashier.summary_for("client"), SalesSummary::default());
    }

    #[test]
    fn declined_payment_registers_nothing() {
        let mut cashier = Cashier::new(Box::new(Declining));
        let err = cashier
            .checkout("client", &cart_with(&[("isbn1", 1)]), &catalogue(), &card(), today())
            .unwrap_err();
        assert_eq!(err, StoreError::PaymentFailed);
        assert_eq!(cashier.summary_for("client").total, 0);
    }

    #[test]
    fn checkout_charges_cart_total() {
        let recording = Recording::default();
        let mut cashier = Cashier::new(Box::new(recording.clone()));
        cashier
            .checkout("client", &cart_with(&[("isbn1", 2), ("isbn2", 1)]), &catalogue(), &card(), today())
            .unwrap();
        assert_eq!(recording.0.load(Ordering::SeqCst), 450);
    }

    #[test]
    fn summary_merges_sales_of_one_client() {
        let mut cashier = Cashier::new(Box::new(AcceptAllPayments));
        let first = cashier
            .checkout("client", &cart_with(&[("isbn1", 1)]), &catalogue(), &card(), today())
            .unwrap();
        let second = cashier
            .checkout("client", &cart_with(&[("isbn2", 1), ("isbn1", 2)]), &catalogue(), &card(), today())
            .unwrap();
        cashier
            .checkout("other", &cart_with(&[("isbn2", 4)]), &catalogue(), &card(), today())
            .unwrap();
        assert_ne!(first, second);

        let summary = cashier.summary_for("client");
        assert_eq!(summary.total, 100 + 250 + 200);
        assert_eq!(
            summary.books,
            vec![("isbn1".to_string(), 3), ("isbn2".to_string(), 1)]
        );
    }

    #[test]
    fn summary_of_unknown_client_is_empty() {
        let cashier = Cashier::new(Box::new(AcceptAllPayments));
        assert_eq!(cashier.summary_for("nobody"), SalesSummary::default());
    }
}
