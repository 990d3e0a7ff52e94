//! Retrieval of the full raw log feed via continuation-token pagination.

use std::sync::Arc;

use crate::models::RawLog;
use crate::{AuthToken, SetgraphApi, SetgraphError};

/// Fixed page size for the log feed.
pub const LOG_PAGE_LIMIT: u32 = 50;

/// Fetch every raw log for the authenticated user, in server order.
///
/// The loop ends when a response has no next link, the batch is empty, or
/// the continuation token extracted from the next link is empty. Unlike
/// the catalog fetch, any non-success status here fails the whole export.
pub async fn fetch_all_logs(
    api: Arc<dyn SetgraphApi>,
    token: AuthToken,
) -> Result<Vec<RawLog>, SetgraphError> {
    let mut all = Vec::new();
    let mut continuation: Option<String> = None;
    loop {
        let page = api
            .log_page(&token, LOG_PAGE_LIMIT, continuation.as_deref())
            .await?;
        let batch_len = page.logs.len();
        all.extend(page.logs);
        tracing::debug!(batch = batch_len, total = all.len(), "fetched log page");
        if batch_len == 0 {
            break;
        }

        let next = page
            .links
            .next
            .as_ref()
            .and_then(|link| continuation_token(&link.href));
        match next {
            Some(next_token) if !next_token.is_empty() => continuation = Some(next_token),
            _ => break,
        }
    }
    Ok(all)
}

/// Pull the `continuationToken` query parameter out of a next link, which
/// may be absolute or server-relative.
fn continuation_token(href: &str) -> Option<String> {
    let url = match reqwest::Url::parse(href) {
        Ok(url) => url,
        Err(_) => reqwest::Url::parse("https://setgraph.invalid")
            .ok()?
            .join(href)
            .ok()?,
    };
    url.query_pairs()
        .find(|(key, _)| key == "continuationToken")
        .map(|(_, value)| value.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_token_from_absolute_href() {
        let href = "https://api.setgraph.app/api/v1/users/u1/logs?limit=50&continuationToken=tok42";
        assert_eq!(continuation_token(href).as_deref(), Some("tok42"));
    }

    #[test]
    fn extracts_token_from_relative_href() {
        let href = "/api/v1/users/u1/logs?continuationToken=tok42";
        assert_eq!(continuation_token(href).as_deref(), Some("tok42"));
    }

    #[test]
    fn missing_token_parameter_yields_none() {
        let href = "https://api.setgraph.app/api/v1/users/u1/logs?limit=50";
        assert_eq!(continuation_token(href), None);
    }

    #[test]
    fn empty_token_is_preserved_for_caller_to_stop_on() {
        let href = "/api/v1/users/u1/logs?continuationToken=";
        assert_eq!(continuation_token(href).as_deref(), Some(""));
    }
}
