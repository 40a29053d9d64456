//! Permalink resolution: validate, rewrite, fetch, extract.

use crate::config::Hosts;
use crate::error::Error;
use crate::extract;
use crate::permalink::Permalink;
use crate::transport::{HttpRequest, Transport};

/// Resolves permalinks to the text of the line range they point at.
///
/// Holds no cache and no per-call state, so one instance can serve any
/// number of concurrent resolutions.
#[derive(Debug, Clone)]
pub struct Previewer<T> {
    /// Which hosts count as permalinks and where raw content lives.
    hosts: Hosts,
    /// How raw content is fetched.
    transport: T,
}

impl<T: Transport> Previewer<T> {
    /// Build a previewer over `transport` for the given hosts.
    pub fn new(transport: T, hosts: Hosts) -> Self {
        return Self { hosts, transport };
    }

    /// Resolve `permalink` to the selected lines, or `None` if no preview is
    /// available.
    ///
    /// Inputs that are not permalinks give `None` without touching the
    /// network. Fetch and processing failures are logged at warn level and
    /// also give `None`. A range past the end of the file gives `Some("")`.
    pub async fn resolve(&self, permalink: &str) -> Option<String> {
        return match self.try_resolve(permalink).await {
            Ok(text) => Some(text),
            Err(e) if e.is_validation() => {
                tracing::debug!(permalink, error = %e, "not a permalink");
                None
            },
            Err(e) => {
                tracing::warn!(permalink, error = %e, "failed to fetch the code preview");
                None
            },
        };
    }

    /// Like [`Previewer::resolve`] but keeps the failure reason.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPermalink` or `Error::ForeignHost` when the input
    /// is rejected before any request, and `Error::Http`,
    /// `Error::UnexpectedStatus`, `Error::NonTextBody`, or `Error::UrlParse`
    /// when fetching fails.
    pub async fn try_resolve(&self, permalink: &str) -> Result<String, Error> {
        let parsed = Permalink::parse(permalink, &self.hosts)?;
        return self.fetch_range(&parsed).await;
    }

    /// Fetch the raw file behind an already parsed permalink and cut out its range.
    ///
    /// # Errors
    ///
    /// Returns the transport error, or `Error::UnexpectedStatus` for a non-2xx reply.
    pub async fn fetch_range(&self, permalink: &Permalink) -> Result<String, Error> {
        let url = permalink.raw_url(&self.hosts)?;
        tracing::debug!(%url, range = %permalink.range, "fetching raw content");

        let response = self.transport.send(HttpRequest::get(url.clone())).await?;
        if !response.is_success() {
            return Err(Error::UnexpectedStatus { status: response.status, url: url.to_string() });
        }

        return Ok(extract::line_range(&response.body, permalink.range));
    }
}
