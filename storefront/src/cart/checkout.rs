//! Checkout message
//!
//! The store takes orders over WhatsApp: checkout renders the cart as a
//! pre-filled chat message and a `wa.me` link. No payment is involved.

use shared::error::{AppError, AppResult, ErrorCode};

use super::Cart;
use crate::catalog::format_price;
use crate::metrics::MetricsService;

const GREETING: &str = "¡Hola! Me gustaría realizar el siguiente pedido:\n\n";
const CLOSING: &str = "\n\nPor favor, quisiera confirmar este pedido. ¡Gracias!";

/// Rendered order message and its WhatsApp link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutMessage {
    pub text: String,
    pub url: String,
}

impl CheckoutMessage {
    pub fn build(cart: &Cart, phone: &str) -> AppResult<Self> {
        if cart.is_empty() {
            return Err(AppError::new(ErrorCode::CartEmpty));
        }
        let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return Err(AppError::validation("WhatsApp phone number has no digits")
                .with_detail("phone", phone));
        }

        let mut text = String::from(GREETING);
        for item in cart.items() {
            text.push_str(&format!(
                "• {} x{} - {}\n",
                item.name,
                item.quantity,
                format_price(item.line_total())
            ));
        }
        text.push_str(&format!("\nTotal: {}", format_price(cart.subtotal())));
        text.push_str(CLOSING);

        let url = format!("https://wa.me/{}?text={}", digits, urlencoding::encode(&text));
        Ok(Self { text, url })
    }
}

/// Build the checkout message and record WhatsApp clicks
///
/// One click goes to the daily total plus one per cart line. Counter
/// failures are logged by the metrics service and never block the link.
pub async fn checkout(
    cart: &Cart,
    phone: &str,
    metrics: &MetricsService,
) -> AppResult<CheckoutMessage> {
    let message = CheckoutMessage::build(cart, phone)?;

    let _ = metrics.increment_whatsapp_clicks(None).await;
    for item in cart.items() {
        let _ = metrics.increment_whatsapp_clicks(Some(&item.id)).await;
    }

    tracing::info!(
        lines = cart.items().len(),
        units = cart.item_count(),
        "Checkout message prepared"
    );
    Ok(message)
}
