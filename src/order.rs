//! Orders
//!
//! Checkout turns the cart into a WhatsApp-style text message and hands a link carrying
//! that message to an [`OrderChannel`](channel::OrderChannel).

use std::fmt;

use thiserror::Error;

use crate::pricing::TotalPriceError;

pub mod channel;
pub mod message;

/// Errors raised while formatting or handing off an order.
#[derive(Debug, Error)]
pub enum OrderError {
    /// There is nothing to order.
    #[error("The cart is empty")]
    EmptyCart,

    /// Line or grand totals could not be computed.
    #[error(transparent)]
    Pricing(#[from] TotalPriceError),

    /// The message timestamp could not be rendered.
    #[error("Invalid message time zone: {0}")]
    Time(#[from] jiff::Error),

    /// Writing the message failed.
    #[error("Failed to format order message: {0}")]
    Format(#[from] fmt::Error),

    /// The channel base URL is not a valid URL.
    #[error("Invalid channel URL: {0}")]
    Url(#[from] url::ParseError),

    /// The channel base URL cannot carry a path.
    #[error("Channel URL cannot be a base: {0}")]
    CannotBeABase(String),

    /// The channel failed to accept the link.
    #[error("Failed to hand off order: {0}")]
    Dispatch(#[from] std::io::Error),
}
