//! Typed client for the profile and post REST endpoints.

use std::fmt;
use std::str::FromStr;

use reqwest::Method;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::auth::TokenProvider;
use crate::error::Error;
use crate::transport::{HttpRequest, HttpResponse, Transport};

/// A user profile. `id` is assigned by the identity provider and omitted
/// from the body when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Avatar image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Public handle.
    pub handle: String,
    /// Subject identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// A shared post. For `PostKind::PermalinkRange`, `data` holds the permalink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Profile id of the author.
    pub author_id: String,
    /// What the author says about the shared code.
    pub content: String,
    /// The shared payload; a permalink for permalink-range posts.
    pub data: String,
    /// Server-assigned id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// What `data` holds.
    #[serde(rename = "type")]
    pub kind: PostKind,
    /// Who can see the post.
    pub visibility: Visibility,
}

impl Post {
    /// Check required fields before sending, reporting every problem at once.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPost` listing each empty required field.
    pub fn validate(&self) -> Result<(), Error> {
        let problems: Vec<String> = [
            ("author_id", &self.author_id),
            ("content", &self.content),
            ("data", &self.data),
        ]
        .into_iter()
        .filter(|(_, value)| return value.is_empty())
        .map(|(field, _)| return format!("field '{field}' is required"))
        .collect();

        if problems.is_empty() {
            return Ok(());
        }
        return Err(Error::InvalidPost { problems });
    }
}

/// What a post's `data` field contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum PostKind {
    /// A permalink to a line range.
    PermalinkRange,
}

/// Who can see a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Visibility {
    /// Only the author's followers.
    Followers,
    /// Everyone.
    Public,
}

/// Wire names shared by `Display`, `FromStr`, and serde for the post enums.
macro_rules! wire_enum {
    ($ty:ident, $what:literal, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            /// Lowercase wire name.
            pub const fn as_str(self) -> &'static str {
                return match self {
                    $(Self::$variant => $name,)+
                };
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                return f.write_str(self.as_str());
            }
        }

        impl FromStr for $ty {
            type Err = String;

            /// Case-insensitive, surrounding whitespace ignored.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalized = s.trim().to_lowercase();
                return match normalized.as_str() {
                    $($name => Ok(Self::$variant),)+
                    _ => Err(format!("{normalized:?} is not a valid {}", $what)),
                };
            }
        }

        impl TryFrom<String> for $ty {
            type Error = String;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                return value.parse();
            }
        }

        impl From<$ty> for &'static str {
            fn from(value: $ty) -> Self {
                return value.as_str();
            }
        }
    };
}

wire_enum!(PostKind, "post type", { PermalinkRange => "permalink-range" });
wire_enum!(Visibility, "post visibility", { Followers => "followers", Public => "public" });

/// Authenticated client for `/api/profile` and `/api/posts`.
#[derive(Debug, Clone)]
pub struct ApiClient<T, P> {
    /// Origin (and optional path prefix) the API paths hang off.
    base: Url,
    /// Bearer token source.
    tokens: P,
    /// How requests are sent.
    transport: T,
}

impl<T: Transport, P: TokenProvider> ApiClient<T, P> {
    /// Build a client rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `Error::UrlParse` if `base_url` is not an absolute hierarchical URL.
    pub fn new(base_url: &str, transport: T, tokens: P) -> Result<Self, Error> {
        let base = Url::parse(base_url)?;
        if base.cannot_be_a_base() {
            return Err(Error::UrlParse(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }
        return Ok(Self { base, tokens, transport });
    }

    /// `POST /api/posts`
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPost` without sending if validation fails, or
    /// token, encoding, and transport errors.
    pub async fn create_post(&self, post: &Post) -> Result<HttpResponse, Error> {
        post.validate()?;
        return self.send_json(Method::POST, &["api", "posts"], post).await;
    }

    /// `POST /api/profile`
    ///
    /// # Errors
    ///
    /// Returns token, encoding, or transport errors.
    pub async fn create_profile(&self, profile: &Profile) -> Result<HttpResponse, Error> {
        return self.send_json(Method::POST, &["api", "profile"], profile).await;
    }

    /// `DELETE /api/posts/{id}`
    ///
    /// # Errors
    ///
    /// Returns token or transport errors.
    pub async fn delete_post(&self, id: &str) -> Result<HttpResponse, Error> {
        return self.send(Method::DELETE, &["api", "posts", id], None).await;
    }

    /// `DELETE /api/profile/{id}`
    ///
    /// # Errors
    ///
    /// Returns token or transport errors.
    pub async fn delete_profile(&self, id: &str) -> Result<HttpResponse, Error> {
        return self.send(Method::DELETE, &["api", "profile", id], None).await;
    }

    /// Absolute URL for `segments` below the base, each segment percent-encoded.
    ///
    /// # Errors
    ///
    /// Returns `Error::UrlParse` if the base cannot take path segments.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| return Error::UrlParse(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        return Ok(url);
    }

    /// `GET /api/posts/{id}`
    ///
    /// # Errors
    ///
    /// Returns token or transport errors.
    pub async fn get_post(&self, id: &str) -> Result<HttpResponse, Error> {
        return self.send(Method::GET, &["api", "posts", id], None).await;
    }

    /// `GET /api/profile/{id}`
    ///
    /// # Errors
    ///
    /// Returns token or transport errors.
    pub async fn get_profile(&self, id: &str) -> Result<HttpResponse, Error> {
        return self.send(Method::GET, &["api", "profile", id], None).await;
    }

    /// `GET /api/posts?limit={limit}&offset={offset}`
    ///
    /// # Errors
    ///
    /// Returns token or transport errors.
    pub async fn list_posts(&self, limit: u32, offset: u32) -> Result<HttpResponse, Error> {
        let url = self.posts_page_url(limit, offset)?;
        return self.send_to(Method::GET, url, None).await;
    }

    /// Absolute URL of one page of the post listing.
    ///
    /// # Errors
    ///
    /// Returns `Error::UrlParse` if the base cannot take path segments.
    pub fn posts_page_url(&self, limit: u32, offset: u32) -> Result<Url, Error> {
        let mut url = self.endpoint(&["api", "posts"])?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("offset", &offset.to_string());
        return Ok(url);
    }

    /// Send a bodiless or pre-encoded request to `segments`.
    ///
    /// # Errors
    ///
    /// Returns URL, token, or transport errors.
    async fn send(
        &self,
        method: Method,
        segments: &[&str],
        json_body: Option<String>,
    ) -> Result<HttpResponse, Error> {
        let url = self.endpoint(segments)?;
        return self.send_to(method, url, json_body).await;
    }

    /// Encode `body` as JSON and send it to `segments`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Json`, or URL, token, or transport errors.
    async fn send_json<B: Serialize + Sync>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> Result<HttpResponse, Error> {
        let json = serde_json::to_string(body)?;
        return self.send(method, segments, Some(json)).await;
    }

    /// Attach the bearer token and hand the request to the transport.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingToken` or the transport error.
    async fn send_to(
        &self,
        method: Method,
        url: Url,
        json_body: Option<String>,
    ) -> Result<HttpResponse, Error> {
        let bearer = self.tokens.token()?;
        tracing::debug!(%method, %url, "api request");
        let response = self
            .transport
            .send(HttpRequest { bearer: Some(bearer), json_body, method, url })
            .await?;
        tracing::debug!(status = response.status, "api response");
        return Ok(response);
    }

    /// `PUT /api/posts`
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPost` without sending if validation fails, or
    /// token, encoding, and transport errors.
    pub async fn update_post(&self, post: &Post) -> Result<HttpResponse, Error> {
        post.validate()?;
        return self.send_json(Method::PUT, &["api", "posts"], post).await;
    }

    /// `PUT /api/profile`
    ///
    /// # Errors
    ///
    /// Returns token, encoding, or transport errors.
    pub async fn update_profile(&self, profile: &Profile) -> Result<HttpResponse, Error> {
        return self.send_json(Method::PUT, &["api", "profile"], profile).await;
    }
}
