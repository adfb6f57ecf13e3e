//! Best-effort coercion of JavaScript-style object literals into JSON.
//!
//! `{ tokenName: 'something', }` becomes `{"tokenName": "something"}`.
//! The rewrite is textual and runs five passes in order:
//!
//! 1. double-quoted values after a colon are re-emitted with their inner
//!    colons masked,
//! 2. single-quoted values likewise, converted to double quotes,
//! 3. bare or quoted keys are wrapped in double quotes,
//! 4. masked colons are restored,
//! 5. trailing commas before `}` or `]` are dropped.
//!
//! Masking keeps a value such as `'http://x'` from being read as a key in
//! pass 3. Input that is not close to an object literal comes out as
//! invalid JSON; [`parse_relaxed`] reports that as a parse error.

use crate::pipe::Pipeline;
use regex::{Captures, Regex};
use std::sync::LazyLock;

const COLON_MASK: &str = "@colon@";

static DOUBLE_QUOTED_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#":\s*"([^"]*)""#).expect("valid regex"));
static SINGLE_QUOTED_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":\s*'([^']*)'").expect("valid regex"));
static KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(['"])?([a-z0-9A-Z_]+)(['"])?\s*:"#).expect("valid regex"));
static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",(\s*[}\]])").expect("valid regex"));

fn mask_value(caps: &Captures<'_>) -> String {
    format!(": \"{}\"", caps[1].replace(':', COLON_MASK))
}

fn passes() -> Pipeline<String> {
    Pipeline::new()
        .then(|text: String| DOUBLE_QUOTED_VALUE.replace_all(&text, mask_value).into_owned())
        .then(|text: String| SINGLE_QUOTED_VALUE.replace_all(&text, mask_value).into_owned())
        .then(|text: String| KEY.replace_all(&text, "\"${2}\": ").into_owned())
        .then(|text: String| text.replace(COLON_MASK, ":"))
        .then(|text: String| TRAILING_COMMA.replace_all(&text, "${1}").into_owned())
}

/// Rewrite a JS-style object literal as JSON text.
pub fn relax_json(text: &str) -> String {
    passes().run(text.to_string())
}

/// [`relax_json`] followed by a strict parse.
pub fn parse_relaxed(text: &str) -> Result<serde_json::Value, serde_json::Error> {
    let relaxed = relax_json(text);
    log::trace!(target: "tools.relaxed_json", "relaxed {} bytes -> {relaxed}", text.len());
    serde_json::from_str(&relaxed)
}
