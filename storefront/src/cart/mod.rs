//! 购物车 - cart state and checkout through a WhatsApp message

mod checkout;

pub use checkout::{CheckoutMessage, checkout};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::Product;

/// One cart line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: String,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub image: Option<String>,
    pub quantity: u32,
}

impl CartItem {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Shopping cart, one line per product
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add `quantity` of `product`, merging with an existing line
    pub fn add(&mut self, product: &Product, quantity: u32) -> AppResult<()> {
        if quantity == 0 {
            return Err(AppError::with_message(
                ErrorCode::ValueOutOfRange,
                "Quantity must be at least 1",
            ));
        }
        if !product.in_stock() {
            return Err(
                AppError::new(ErrorCode::ProductOutOfStock).with_detail("id", product.id.clone())
            );
        }

        match self.items.iter_mut().find(|line| line.id == product.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.items.push(CartItem {
                id: product.id.clone(),
                name: product.name.clone(),
                price: product.price,
                image: product.cover_image().map(str::to_string),
                quantity,
            }),
        }
        tracing::debug!(id = %product.id, quantity, "Added to cart");
        Ok(())
    }

    /// Set a line's quantity; zero removes the line
    pub fn update_quantity(&mut self, id: &str, quantity: u32) -> AppResult<()> {
        if quantity == 0 {
            return self
                .remove(id)
                .then_some(())
                .ok_or_else(|| Self::missing(id));
        }
        let line = self
            .items
            .iter_mut()
            .find(|line| line.id == id)
            .ok_or_else(|| Self::missing(id))?;
        line.quantity = quantity;
        Ok(())
    }

    /// Remove a line, returning whether it existed
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|line| line.id != id);
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Total units across all lines
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|line| line.quantity).sum()
    }

    fn missing(id: &str) -> AppError {
        AppError::new(ErrorCode::CartItemNotFound).with_detail("id", id)
    }
}
