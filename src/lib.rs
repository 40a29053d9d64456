//! Preview the line range a source-hosting permalink points at, and talk to
//! the profile/post API that shares those permalinks.
//!
//! The core is [`Previewer::resolve`]: a permalink such as
//! `https://github.com/<owner>/<repo>/blob/<rev>/<path>#L10-L20` is validated,
//! rewritten to the raw-content host, fetched once, and cut down to the
//! requested lines. Anything that goes wrong yields `None`.

pub mod api;
pub mod auth;
pub mod commands;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod extract;
pub mod feed;
pub mod permalink;
pub mod preview;
pub mod transport;
pub mod types;

pub use error::Error;
pub use permalink::Permalink;
pub use preview::Previewer;
pub use types::{LineRange, Revision};
