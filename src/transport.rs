//! HTTP transport seam: the resolver and API client only see this trait.

use std::future::Future;
use std::sync::Arc;

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use url::Url;

use crate::error::Error;

/// One outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Bearer token for the `Authorization` header, if any.
    pub bearer: Option<String>,
    /// JSON body, if any.
    pub json_body: Option<String>,
    /// HTTP method.
    pub method: Method,
    /// Absolute request URL.
    pub url: Url,
}

impl HttpRequest {
    /// An unauthenticated GET with no body.
    pub fn get(url: Url) -> Self {
        return Self { bearer: None, json_body: None, method: Method::GET, url };
    }
}

/// A fully read response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Response body decoded as UTF-8 text.
    pub body: String,
    /// HTTP status code.
    pub status: u16,
}

impl HttpResponse {
    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        return (200..300).contains(&self.status);
    }
}

/// Something that can send an [`HttpRequest`] and read the whole body.
///
/// Implementations must not retry and must not impose a timeout of their own.
pub trait Transport {
    /// Send `request` and read the body as text.
    ///
    /// # Errors
    ///
    /// Returns `Error::Http` on connection or protocol failure and
    /// `Error::NonTextBody` if the body is not UTF-8.
    fn send(&self, request: HttpRequest) -> impl Future<Output = Result<HttpResponse, Error>> + Send;
}

impl<T: Transport + Sync + Send> Transport for Arc<T> {
    fn send(&self, request: HttpRequest) -> impl Future<Output = Result<HttpResponse, Error>> + Send {
        return (**self).send(request);
    }
}

/// [`Transport`] backed by a shared `reqwest` client.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    /// Connection-pooling client; cheap to clone.
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Wrap an existing client.
    pub fn new(client: reqwest::Client) -> Self {
        return Self { client };
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, Error> {
        let url = request.url.to_string();
        let mut builder = self.client.request(request.method.clone(), request.url);
        if let Some(token) = &request.bearer {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(body) = request.json_body {
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }

        tracing::debug!(method = %request.method, %url, "sending request");
        let response = builder.send().await?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await?;
        let body = decode_body(url, &bytes)?;

        return Ok(HttpResponse { body, status });
    }
}

/// Decode a response body as UTF-8; anything else is not previewable text.
///
/// # Errors
///
/// Returns `Error::NonTextBody` naming `url` if `bytes` is not valid UTF-8.
fn decode_body(url: String, bytes: &[u8]) -> Result<String, Error> {
    return match std::str::from_utf8(bytes) {
        Ok(text) => Ok(text.to_string()),
        Err(_err) => Err(Error::NonTextBody { url }),
    };
}


#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests")]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    use super::*;

    /// Accept one connection on a local port, answer it with `reply`, and
    /// hand back everything the client sent.
    async fn serve_once(reply: &'static [u8]) -> (Url, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = Url::parse(&format!("http://{}/api/posts", listener.local_addr().unwrap())).unwrap();

        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut seen = Vec::new();
            let mut buf = [0_u8; 1024];
            while !request_complete(&seen) {
                let read = stream.read(&mut buf).await.unwrap();
                if read == 0 {
                    break;
                }
                seen.extend_from_slice(buf.get(..read).unwrap());
            }
            stream.write_all(reply).await.unwrap();
            stream.shutdown().await.unwrap();
            return String::from_utf8(seen).unwrap();
        });
        return (url, server);
    }

    /// Whether `seen` holds the full head and as much body as `content-length` promises.
    fn request_complete(seen: &[u8]) -> bool {
        let text = String::from_utf8_lossy(seen);
        let Some((head, body)) = text.split_once("\r\n\r\n") else {
            return false;
        };
        let length = head
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                if !name.eq_ignore_ascii_case("content-length") {
                    return None;
                }
                return value.trim().parse::<usize>().ok();
            })
            .unwrap_or(0);
        return body.len() >= length;
    }

    fn transport() -> ReqwestTransport {
        return ReqwestTransport::new(reqwest::Client::builder().no_proxy().build().unwrap());
    }

    #[test]
    fn utf8_bodies_decode() {
        assert_eq!(decode_body("u".to_string(), b"one\ntwo").unwrap(), "one\ntwo");
    }

    #[test]
    fn invalid_utf8_is_not_text() {
        let err = decode_body("https://raw.test/a".to_string(), b"\xff\xfe").unwrap_err();
        assert!(matches!(err, Error::NonTextBody { ref url } if url == "https://raw.test/a"), "got {err:?}");
    }

    #[tokio::test]
    async fn sends_bearer_and_json_and_passes_status_through() {
        let (url, server) =
            serve_once(b"HTTP/1.1 418 I'm a teapot\r\ncontent-length: 5\r\nconnection: close\r\n\r\nhello")
                .await;
        let request = HttpRequest {
            bearer: Some("tok".to_string()),
            json_body: Some(r#"{"a":1}"#.to_string()),
            method: Method::POST,
            url,
        };

        let response = transport().send(request).await.unwrap();
        assert_eq!(response, HttpResponse { body: "hello".to_string(), status: 418 });
        assert!(!response.is_success());

        let sent = server.await.unwrap();
        let lowered = sent.to_ascii_lowercase();
        assert!(sent.starts_with("POST /api/posts HTTP/1.1\r\n"), "{sent}");
        assert!(lowered.contains("\r\nauthorization: bearer tok\r\n"), "{sent}");
        assert!(lowered.contains("\r\ncontent-type: application/json\r\n"), "{sent}");
        assert!(sent.ends_with(r#"{"a":1}"#), "{sent}");
    }

    #[tokio::test]
    async fn unauthenticated_get_has_no_authorization_header() {
        let (url, server) =
            serve_once(b"HTTP/1.1 200 OK\r\ncontent-length: 2\r\nconnection: close\r\n\r\nok").await;

        let response = transport().send(HttpRequest::get(url)).await.unwrap();
        assert!(response.is_success());
        assert_eq!(response.body, "ok");

        let sent = server.await.unwrap().to_ascii_lowercase();
        assert!(sent.starts_with("get /api/posts http/1.1\r\n"), "{sent}");
        assert!(!sent.contains("authorization:"), "{sent}");
    }

    #[tokio::test]
    async fn binary_body_is_a_non_text_error() {
        let (url, server) =
            serve_once(b"HTTP/1.1 200 OK\r\ncontent-length: 6\r\nconnection: close\r\n\r\na\n\xff\xfe\nc").await;
        let expected = url.to_string();

        let err = transport().send(HttpRequest::get(url)).await.unwrap_err();
        assert!(matches!(err, Error::NonTextBody { ref url } if *url == expected), "got {err:?}");
        server.await.unwrap();
    }
}
