//! Pull request link handling

use crate::types::ChangeRequestRef;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static PR_URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://[A-Za-z0-9.\-]+(?::\d+)?/[^\s/]+/[^\s/]+/pull/\d+")
        .expect("PR link pattern is valid")
});

/// Parse a pull request link of the form `https://<host>/<owner>/<repo>/pull/<number>`
///
/// Returns `None` for anything else; a link that isn't a pull request just
/// means there is nothing to poll. Trailing tab segments (`/files`,
/// `/checks`), queries and fragments are ignored.
pub fn parse_change_request_url(link: &str) -> Option<ChangeRequestRef> {
    let url = Url::parse(link.trim()).ok()?;
    if !matches!(url.scheme(), "https" | "http") {
        return None;
    }

    let host = match url.port() {
        Some(port) => format!("{}:{port}", url.host_str()?),
        None => url.host_str()?.to_string(),
    };

    let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
    let [owner, repo, "pull", number, rest @ ..] = segments.as_slice() else {
        return None;
    };
    if rest.len() > 1 {
        return None;
    }

    let number: u64 = number.parse().ok()?;
    if number == 0 {
        return None;
    }

    Some(ChangeRequestRef {
        host,
        owner: (*owner).to_string(),
        repo: (*repo).to_string(),
        number,
    })
}

/// Find the first pull request link in free text
///
/// Useful for piping the output of `gh pr create` straight into the timer.
pub fn find_change_request_url(text: &str) -> Option<&str> {
    PR_URL_PATTERN.find(text).map(|m| m.as_str())
}
