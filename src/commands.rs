//! Core CLI commands for codepeek: preview, raw, api calls, feed.

use std::process::ExitCode;

use crate::api::{ApiClient, Post, Profile};
use crate::auth::{EnvToken, StaticToken, TokenProvider};
use crate::config::Config;
use crate::diagnostics;
use crate::error::Error;
use crate::feed;
use crate::permalink::Permalink;
use crate::preview::Previewer;
use crate::transport::{HttpResponse, ReqwestTransport};

/// Exit code when the command ran but produced no usable result:
/// no preview, or a non-2xx API response.
const EXIT_UNSUCCESSFUL: u8 = 1;
/// Exit code for input that is not a permalink.
const EXIT_INVALID: u8 = 2;

/// One call against the REST API, as selected on the command line.
/// JSON payloads are passed through as given and decoded before sending.
pub enum ApiCall {
    /// `POST /api/posts`
    CreatePost(String),
    /// `POST /api/profile`
    CreateProfile(String),
    /// `DELETE /api/posts/{id}`
    DeletePost(String),
    /// `DELETE /api/profile/{id}`
    DeleteProfile(String),
    /// `GET /api/posts/{id}`
    GetPost(String),
    /// `GET /api/profile/{id}`
    GetProfile(String),
    /// `GET /api/posts?limit=&offset=`
    ListPosts {
        /// Page size.
        limit: u32,
        /// Posts to skip.
        offset: u32,
    },
    /// `PUT /api/posts`
    UpdatePost(String),
    /// `PUT /api/profile`
    UpdateProfile(String),
}

/// Token from `--token` if given, else from the configured environment variable.
enum Token {
    /// Read from the environment on each request.
    Env(EnvToken),
    /// Given on the command line.
    Static(StaticToken),
}

impl TokenProvider for Token {
    fn token(&self) -> Result<String, Error> {
        return match self {
            Self::Env(env) => env.token(),
            Self::Static(fixed) => fixed.token(),
        };
    }
}

/// Build the API client the api and feed commands share.
///
/// # Errors
///
/// Returns `Error::UrlParse` if `base_url` is invalid.
fn api_client(
    config: &Config,
    transport: ReqwestTransport,
    token: Option<String>,
) -> Result<ApiClient<ReqwestTransport, Token>, Error> {
    let tokens = match token {
        Some(token) => Token::Static(StaticToken(token)),
        None => Token::Env(EnvToken::new(config.api.token_env.as_str())),
    };
    return ApiClient::new(&config.api.base_url, transport, tokens);
}

/// Run one API call and print `<status>` followed by the body.
/// Exits 0 on a 2xx status and 1 otherwise.
///
/// # Errors
///
/// Returns JSON decoding, token, or transport errors.
pub async fn api(config: &Config, token: Option<String>, call: ApiCall) -> Result<ExitCode, Error> {
    let client = api_client(config, ReqwestTransport::default(), token)?;

    let response = match call {
        ApiCall::CreatePost(json) => client.create_post(&serde_json::from_str::<Post>(&json)?).await?,
        ApiCall::CreateProfile(json) => {
            client.create_profile(&serde_json::from_str::<Profile>(&json)?).await?
        },
        ApiCall::DeletePost(id) => client.delete_post(&id).await?,
        ApiCall::DeleteProfile(id) => client.delete_profile(&id).await?,
        ApiCall::GetPost(id) => client.get_post(&id).await?,
        ApiCall::GetProfile(id) => client.get_profile(&id).await?,
        ApiCall::ListPosts { limit, offset } => client.list_posts(limit, offset).await?,
        ApiCall::UpdatePost(json) => client.update_post(&serde_json::from_str::<Post>(&json)?).await?,
        ApiCall::UpdateProfile(json) => {
            client.update_profile(&serde_json::from_str::<Profile>(&json)?).await?
        },
    };

    return Ok(print_response(&response));
}

/// List a page of posts with previews for their permalinks.
///
/// # Errors
///
/// Returns errors from listing or decoding the posts.
pub async fn feed(
    config: &Config,
    token: Option<String>,
    limit: u32,
    offset: u32,
) -> Result<ExitCode, Error> {
    let transport = ReqwestTransport::default();
    let client = api_client(config, transport.clone(), token)?;
    let previewer = Previewer::new(transport, config.hosts.clone());

    let entries = feed::load(&client, &previewer, limit, offset).await?;
    if entries.is_empty() {
        eprintln!("No posts.");
        return Ok(ExitCode::SUCCESS);
    }
    print!("{}", feed::render(&entries));
    return Ok(ExitCode::SUCCESS);
}

/// Fetch and print the line range a permalink points at.
///
/// A permalink that cannot be previewed prints a diagnostic and exits 1;
/// this is not an error of the command itself.
pub async fn preview(config: &Config, permalink: &str) -> ExitCode {
    let previewer = Previewer::new(ReqwestTransport::default(), config.hosts.clone());
    return match previewer.try_resolve(permalink).await {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        },
        Err(e) => {
            tracing::debug!(permalink, error = %e, "no preview available");
            diagnostics::print_error(&e);
            ExitCode::from(EXIT_UNSUCCESSFUL)
        },
    };
}

/// Print `<status>` and the body; map the status to an exit code.
fn print_response(response: &HttpResponse) -> ExitCode {
    println!("{}", response.status);
    if !response.body.is_empty() {
        println!("{}", response.body);
    }
    if response.is_success() {
        return ExitCode::SUCCESS;
    }
    return ExitCode::from(EXIT_UNSUCCESSFUL);
}

/// Print the raw-content URL a permalink rewrites to, without fetching.
pub fn raw(config: &Config, permalink: &str) -> ExitCode {
    let url = Permalink::parse(permalink, &config.hosts)
        .and_then(|parsed| return parsed.raw_url(&config.hosts));
    return match url {
        Ok(url) => {
            println!("{url}");
            ExitCode::SUCCESS
        },
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::from(EXIT_INVALID)
        },
    };
}
