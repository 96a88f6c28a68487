//! Order Channel
//!
//! The hand-off link has the form `<base>/<destination>?text=<message>`. The message is
//! encoded as an `application/x-www-form-urlencoded` query value.

use std::io::Write;

use tracing::info;
use url::Url;

use crate::order::OrderError;

/// Default base URL of the messaging service.
pub const DEFAULT_CHANNEL_BASE_URL: &str = "https://wa.me";

/// Default destination identifier (the restaurant's WhatsApp number).
pub const DEFAULT_DESTINATION: &str = "593987654321";

/// Build the hand-off link for `message`.
///
/// # Errors
///
/// - [`OrderError::Url`]: `base` is not a valid URL.
/// - [`OrderError::CannotBeABase`]: `base` cannot carry a path (e.g. `mailto:`).
pub fn order_link(base: &str, destination: &str, message: &str) -> Result<Url, OrderError> {
    let mut link = Url::parse(base)?;

    link.path_segments_mut()
        .map_err(|()| OrderError::CannotBeABase(base.to_string()))?
        .pop_if_empty()
        .push(destination);

    link.query_pairs_mut().append_pair("text", message);

    Ok(link)
}

/// Something that can open a hand-off link.
#[cfg_attr(test, mockall::automock)]
pub trait OrderChannel {
    /// Hand `link` off to the messaging service.
    ///
    /// # Errors
    ///
    /// Returns an [`OrderError`] if the link could not be handed off.
    fn dispatch(&mut self, link: &Url) -> Result<(), OrderError>;
}

/// Channel that records every link it receives.
#[derive(Debug, Default, Clone)]
pub struct MemoryChannel {
    sent: Vec<Url>,
}

impl MemoryChannel {
    /// Create an empty channel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Links handed off so far, oldest first.
    #[must_use]
    pub fn sent(&self) -> &[Url] {
        &self.sent
    }
}

impl OrderChannel for MemoryChannel {
    fn dispatch(&mut self, link: &Url) -> Result<(), OrderError> {
        self.sent.push(link.clone());

        Ok(())
    }
}

/// Channel that writes each link on its own line, for terminals and pipes.
#[derive(Debug)]
pub struct WriterChannel<W> {
    writer: W,
}

impl<W: Write> WriterChannel<W> {
    /// Write links to `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OrderChannel for WriterChannel<W> {
    fn dispatch(&mut self, link: &Url) -> Result<(), OrderError> {
        writeln!(self.writer, "{link}")?;
        self.writer.flush()?;

        info!(host = link.host_str().unwrap_or_default(), "order link written");

        Ok(())
    }
}
