//! Order Message
//!
//! Renders a cart as the fixed multi-line message sent to the restaurant. Sections follow
//! the cart's category grouping; every amount is formatted as `$0.00`.

use std::fmt::Write;

use jiff::{
    Timestamp,
    tz::{Offset, TimeZone},
};
use serde::{Deserialize, Serialize};

use crate::{cart::Cart, order::OrderError};

/// Default restaurant name shown in the header and closing line.
pub const DEFAULT_RESTAURANT_NAME: &str = "La Casa del Encebollado";

/// Default UTC offset of the message timestamp (Ecuador, UTC−5).
pub const DEFAULT_UTC_OFFSET_HOURS: i8 = -5;

/// Parameters of the message template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTemplate {
    /// Restaurant name
    pub restaurant_name: String,

    /// UTC offset the date and time are rendered in, in whole hours
    pub utc_offset_hours: i8,
}

impl Default for OrderTemplate {
    fn default() -> Self {
        Self {
            restaurant_name: DEFAULT_RESTAURANT_NAME.to_string(),
            utc_offset_hours: DEFAULT_UTC_OFFSET_HOURS,
        }
    }
}

/// Render `cart` as an order message generated at `generated_at`.
///
/// An empty cart renders as an empty string.
///
/// # Errors
///
/// - [`OrderError::Pricing`]: a subtotal or the total could not be computed.
/// - [`OrderError::Time`]: the configured UTC offset is out of range.
pub fn format_order(
    cart: &Cart<'_>,
    template: &OrderTemplate,
    generated_at: Timestamp,
) -> Result<String, OrderError> {
    if cart.is_empty() {
        return Ok(String::new());
    }

    let name = &template.restaurant_name;
    let mut message = String::new();

    writeln!(message, "🍽️ *PEDIDO - {name}*\n")?;

    for group in cart.grouped_by_category() {
        writeln!(message, "📋 *{}*", group.category.label())?;

        for item in &group.items {
            writeln!(message, "• {}", item.product().name)?;
            writeln!(message, "  Cantidad: {}", item.quantity())?;
            writeln!(message, "  Precio unitario: {}", item.unit_price())?;
            writeln!(message, "  Subtotal: {}\n", item.subtotal()?)?;
        }
    }

    let zoned = generated_at.to_zoned(TimeZone::fixed(Offset::from_hours(
        template.utc_offset_hours,
    )?));

    writeln!(message, "💰 *TOTAL: {}*\n", cart.total_price()?)?;
    writeln!(message, "📅 Fecha: {}", zoned.strftime("%d/%m/%Y"))?;
    writeln!(message, "🕐 Hora: {}\n", zoned.strftime("%H:%M:%S"))?;
    write!(message, "¡Gracias por elegir {name}! 🙏")?;

    Ok(message)
}
