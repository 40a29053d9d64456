use crate::config::CONFIG_FILE;
use crate::error::Error;

/// Bold on.
const BOLD: &str = "\x1b[1m";
/// Attributes off.
const RESET: &str = "\x1b[0m";

/// Render an error as valid markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as a structured markdown diagnostic.
///
/// Each variant produces a block with what happened and, where the user can
/// act on it, how to fix it.
pub fn render_error(e: &Error) -> String {
    return match e {
        Error::InvalidPermalink { input, reason } => render_invalid_permalink(input, reason),
        Error::ForeignHost { host, expected } => render_foreign_host(host, expected),
        Error::MissingToken { source_name } => render_missing_token(source_name),
        Error::UnexpectedStatus { status, url } => render_unexpected_status(*status, url),
        Error::InvalidPost { problems } => render_invalid_post(problems),
        _ => render_generic(e),
    };
}

/// Variants without a dedicated fix section.
fn render_generic(e: &Error) -> String {
    return match e {
        Error::Http(err) => format!("\
# Error: Request Failed

{err}
"),
        Error::NonTextBody { url } => format!("\
# Error: Not Text

The response from `{url}` is not UTF-8 text.
"),
        Error::TomlDe { path, source } => format!("\
# Error: Invalid Config

`{}`: {source}

## Fix

Correct or remove `{CONFIG_FILE}`.
", path.display()),
        Error::Json(err) => format!("\
# Error: Invalid JSON

{err}
"),
        Error::UrlParse(err) => format!("\
# Error: Invalid URL

{err}

## Fix

Check `base_url` and the hosts in `{CONFIG_FILE}`.
"),
        Error::Io(err) => format!("\
# Error: I/O

{err}
"),
        _ => format!("\
# Error

{e}
"),
    };
}

/// `InvalidPermalink`: restate the accepted shape.
fn render_invalid_permalink(input: &str, reason: &str) -> String {
    return format!("\
# Error: Invalid Permalink

`{input}` is not a permalink to a line range: {reason}.

## Expected

    https://github.com/<owner>/<repo>/blob/<40-hex revision>/<path>#L<start>-L<end>

Use the \"Copy permalink\" action on a line selection to get one.
");
}

/// `ForeignHost`: point at the hosts config.
fn render_foreign_host(host: &str, expected: &str) -> String {
    return format!("\
# Error: Unsupported Host

Permalinks must point at `{expected}`, not `{host}`.

## Fix

Set the hosts in `{CONFIG_FILE}`:

    [hosts]
    web = \"{host}\"
    raw = \"<raw content host>\"
");
}

/// `MissingToken`: name the variable or flag.
fn render_missing_token(source_name: &str) -> String {
    return format!("\
# Error: Missing Token

No bearer token: {source_name} is not set.

## Fix

Pass `--token <TOKEN>` or export the variable named by `token_env` in `{CONFIG_FILE}`.
");
}

/// `UnexpectedStatus`: show the status and URL.
fn render_unexpected_status(status: u16, url: &str) -> String {
    return format!("\
# Error: Unexpected Status

`{url}` answered {status}.
");
}

/// `InvalidPost`: one bullet per problem.
fn render_invalid_post(problems: &[String]) -> String {
    let mut out = "\
# Error: Invalid Post

".to_string();
    for problem in problems {
        out.push_str("- ");
        out.push_str(problem);
        out.push('\n');
    }
    return out;
}
