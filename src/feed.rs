//! Post feed with inline previews for permalink-range posts.

use std::fmt::Write as _;

use crate::api::{ApiClient, Post, PostKind};
use crate::auth::TokenProvider;
use crate::error::Error;
use crate::preview::Previewer;
use crate::transport::Transport;

/// One post and, when available, the code its permalink points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    /// The post as the API returned it.
    pub post: Post,
    /// Selected lines, or `None` when the post has no previewable permalink.
    pub preview: Option<String>,
}

/// Fetch one page of posts and resolve every permalink-range preview.
///
/// Previews are resolved concurrently and independently; a preview that
/// fails is simply absent. Entries keep the order the API returned.
///
/// # Errors
///
/// Returns `Error::UnexpectedStatus` if the listing is not a success,
/// `Error::Json` if it does not decode, or token and transport errors.
pub async fn load<T, P>(
    api: &ApiClient<T, P>,
    previewer: &Previewer<T>,
    limit: u32,
    offset: u32,
) -> Result<Vec<FeedEntry>, Error>
where
    T: Transport + Clone + Send + Sync + 'static,
    P: TokenProvider,
{
    let response = api.list_posts(limit, offset).await?;
    if !response.is_success() {
        return Err(Error::UnexpectedStatus {
            status: response.status,
            url: api.posts_page_url(limit, offset)?.to_string(),
        });
    }
    let posts: Vec<Post> = serde_json::from_str(&response.body)?;
    tracing::debug!(count = posts.len(), "loaded posts");

    let pending: Vec<_> = posts
        .iter()
        .map(|post| {
            if post.kind != PostKind::PermalinkRange {
                return None;
            }
            let previewer = previewer.clone();
            let permalink = post.data.clone();
            return Some(tokio::spawn(async move { return previewer.resolve(&permalink).await }));
        })
        .collect();

    let mut entries = Vec::with_capacity(posts.len());
    for (post, task) in posts.into_iter().zip(pending) {
        let preview = match task {
            None => None,
            Some(handle) => handle.await.unwrap_or_else(|e| {
                tracing::warn!(error = %e, "preview task did not complete");
                return None;
            }),
        };
        entries.push(FeedEntry { post, preview });
    }

    return Ok(entries);
}

/// Render entries as markdown, previews as indented code blocks.
pub fn render(entries: &[FeedEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        let post = &entry.post;
        let id = post.id.map_or_else(|| return "-".to_string(), |id| return id.to_string());
        let _ = writeln!(out, "## #{id} by {} ({})", post.author_id, post.visibility);
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", post.content);

        if let Some(preview) = &entry.preview {
            let _ = writeln!(out);
            let _ = writeln!(out, "<{}>", post.data);
            let _ = writeln!(out);
            for line in preview.split('\n') {
                let _ = writeln!(out, "    {line}");
            }
        }
        let _ = writeln!(out);
    }
    return out;
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic, reason = "tests")]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::api::Visibility;
    use crate::auth::StaticToken;
    use crate::config::Hosts;
    use crate::transport::fake::FakeTransport;

    const POSTS: &str = r#"[
        {"id":1,"author_id":"a","content":"first","type":"permalink-range","data":"https://github.com/acme/widgets/blob/0123456789abcdef0123456789abcdef01234567/a.rs#L1-L1","visibility":"public"},
        {"id":2,"author_id":"b","content":"broken","type":"permalink-range","data":"not a permalink","visibility":"followers"}
    ]"#;

    #[tokio::test]
    async fn previews_valid_permalinks_and_skips_the_rest() {
        let transport = Arc::new(FakeTransport::answering(200, POSTS));
        let api = ApiClient::new("http://api.test", Arc::clone(&transport), StaticToken("t".to_string())).unwrap();
        let previewer = Previewer::new(Arc::clone(&transport), Hosts::default());

        let entries = load(&api, &previewer, 5, 0).await.unwrap();
        assert_eq!(entries.len(), 2);
        // The fake answers the raw fetch with the listing body too; line 1 is "[".
        assert_eq!(entries.first().unwrap().preview.as_deref(), Some("["));
        assert_eq!(entries.get(1).unwrap().preview, None);
        // One listing request plus one raw fetch; the invalid permalink never fetched.
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn failed_listing_is_an_error() {
        let transport = Arc::new(FakeTransport::answering(401, "unauthorized"));
        let api = ApiClient::new("http://api.test", Arc::clone(&transport), StaticToken("t".to_string())).unwrap();
        let previewer = Previewer::new(Arc::clone(&transport), Hosts::default());

        let err = load(&api, &previewer, 5, 0).await.unwrap_err();
        let Error::UnexpectedStatus { status, url } = err else {
            panic!("expected UnexpectedStatus, got {err:?}");
        };
        assert_eq!(status, 401);
        assert_eq!(url, "http://api.test/api/posts?limit=5&offset=0");
    }

    #[test]
    fn render_omits_missing_previews() {
        let post = Post {
            author_id: "a".to_string(),
            content: "hello".to_string(),
            data: "https://example.test".to_string(),
            id: Some(3),
            kind: PostKind::PermalinkRange,
            visibility: Visibility::Public,
        };
        let with = FeedEntry { post: post.clone(), preview: Some("fn main() {}\n}".to_string()) };
        let without = FeedEntry { post, preview: None };

        let md = render(&[with]);
        assert!(md.contains("## #3 by a (public)"));
        assert!(md.contains("    fn main() {}\n    }\n"));

        let md = render(&[without]);
        assert!(!md.contains("<https://example.test>"));
    }
}
