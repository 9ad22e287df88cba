//! Shopping carts and the catalogue they draw from.

use std::collections::HashMap;

use crate::error::StoreError;

/// ISBN to unit price.
pub type Catalogue = HashMap<String, u64>;

/// Books added so far, in first-added order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    books: Vec<(String, u32)>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn add_book(&mut self, catalogue: &Catalogue, isbn: &str, quantity: u32) -> Result<(), StoreError> {
        if quantity < 1 {
            return Err(StoreError::NonPositiveQuantity);
        }
        if !catalogue.contains_key(isbn) {
            return Err(StoreError::BookNotFound);
        }
        match self.books.iter_mut().find(|(book, _)| book == isbn) {
            Some((_, held)) => *held = held.saturating_add(quantity),
            None => self.books.push((isbn.to_string(), quantity)),
        }
        Ok(())
    }

    pub fn books(&self) -> &[(String, u32)] {
        &self.books
    }

    /// Books not in `catalogue` cannot be in a cart, so they price at zero.
    pub fn total_price(&self, catalogue: &Catalogue) -> u64 {
        self.books
            .iter()
            .map(|(isbn, quantity)| catalogue.get(isbn).copied().unwrap_or(0) * u64::from(*quantity))
            .sum()
    }
}
