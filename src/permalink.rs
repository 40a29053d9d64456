//! Structural matching of permalinks and their rewrite to raw-content URLs.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use url::Url;

use crate::config::Hosts;
use crate::error::Error;
use crate::types::{LineRange, Revision};

/// Whole-string pattern for `https://<host>/<owner>/<repo>/blob/<rev>/<path..>#L<a>-L<b>`.
#[allow(clippy::unwrap_used, reason = "pattern is a literal and covered by tests")]
static PERMALINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    return Regex::new(
        r"^https://(?<host>[A-Za-z0-9.-]+)/(?<owner>[A-Za-z0-9._-]+)/(?<repo>[A-Za-z0-9._-]+)/blob/(?<revision>[0-9a-f]{40})(?<path>(?:/[A-Za-z0-9._-]+)+)#(?<start>L[0-9]+)-(?<end>L[0-9]+)$",
    )
    .unwrap();
});

/// A permalink to a line range of one file at an immutable revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permalink {
    /// Account or organisation owning the repository.
    pub owner: String,
    /// File path below the revision, one entry per segment.
    pub path: Vec<String>,
    /// Lines selected by the fragment.
    pub range: LineRange,
    /// Repository name.
    pub repo: String,
    /// Pinned revision.
    pub revision: Revision,
}

impl Permalink {
    /// Match `input` against the permalink structure and split it into its parts.
    ///
    /// The match is anchored at both ends, so leading or trailing text fails.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPermalink` if the structure does not match, a
    /// line number is zero, or a name is a dot segment, and `Error::ForeignHost` if the host
    /// is not the configured web host.
    pub fn parse(input: &str, hosts: &Hosts) -> Result<Self, Error> {
        let Some(cap) = PERMALINK_PATTERN.captures(input) else {
            return Err(invalid(input, mismatch_reason(input)));
        };

        let host = capture(&cap, "host");
        if !host.eq_ignore_ascii_case(&hosts.web) {
            return Err(Error::ForeignHost { expected: hosts.web.clone(), host: host.to_string() });
        }

        let owner = capture(&cap, "owner");
        let repo = capture(&cap, "repo");
        if is_dot_segment(owner) || is_dot_segment(repo) {
            return Err(invalid(input, "owner and repository cannot be . or .."));
        }

        let path: Vec<String> = capture(&cap, "path")
            .split('/')
            .filter(|segment| return !segment.is_empty())
            .map(String::from)
            .collect();
        if path.iter().any(|segment| return is_dot_segment(segment)) {
            return Err(invalid(input, "dot segments are not allowed in the file path"));
        }

        let range = LineRange {
            end: parse_line_number(input, capture(&cap, "end"))?,
            start: parse_line_number(input, capture(&cap, "start"))?,
        };

        return Ok(Self {
            owner: owner.to_string(),
            path,
            range,
            repo: repo.to_string(),
            revision: Revision(capture(&cap, "revision").to_string()),
        });
    }

    /// The raw-content URL for this file at this revision.
    ///
    /// Swaps in the raw host and drops the `blob` marker after the repository
    /// name. The fragment is never part of the result.
    ///
    /// # Errors
    ///
    /// Returns `Error::UrlParse` if the configured raw host does not form a URL.
    pub fn raw_url(&self, hosts: &Hosts) -> Result<Url, Error> {
        let raw = format!(
            "https://{}/{}/{}/{}/{}",
            hosts.raw,
            self.owner,
            self.repo,
            self.revision,
            self.path.join("/"),
        );
        return Ok(Url::parse(&raw)?);
    }
}

/// Named capture text; the pattern makes every group mandatory.
fn capture<'h>(cap: &Captures<'h>, name: &str) -> &'h str {
    return cap.name(name).map_or("", |m| return m.as_str());
}

/// `.` and `..` would be collapsed by URL normalisation.
fn is_dot_segment(segment: &str) -> bool {
    return segment == "." || segment == "..";
}

/// Build an `InvalidPermalink` error for `input`.
fn invalid(input: &str, reason: &'static str) -> Error {
    return Error::InvalidPermalink { input: input.to_string(), reason };
}

/// Best-effort explanation of why `input` failed the structural match.
fn mismatch_reason(input: &str) -> &'static str {
    if !input.starts_with("https://") {
        return "expected an https:// URL";
    }
    let Some((_, fragment)) = input.split_once('#') else {
        return "missing #L<start>-L<end> fragment";
    };
    if !fragment.starts_with('L') || !fragment.contains("-L") {
        return "fragment is not of the form L<start>-L<end>";
    }
    if !input.contains("/blob/") {
        return "missing /blob/ segment";
    }
    return "expected /<owner>/<repo>/blob/<40-hex revision>/<path>";
}

/// Parse one `L<n>` side of the fragment into a one-based line number.
///
/// Numbers past `u32::MAX` saturate; no file is that long, so the range
/// simply selects nothing.
///
/// # Errors
///
/// Returns `Error::InvalidPermalink` for zero.
fn parse_line_number(input: &str, side: &str) -> Result<u32, Error> {
    let digits = side.strip_prefix('L').unwrap_or(side);
    // The pattern guarantees ASCII digits, so overflow is the only failure.
    let line = digits.parse::<u32>().unwrap_or(u32::MAX);
    if line == 0 {
        return Err(invalid(input, "line numbers start at 1"));
    }
    return Ok(line);
}
