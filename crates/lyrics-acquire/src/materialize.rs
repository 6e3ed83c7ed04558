//! Sandboxed evaluation of the page-state script.
//!
//! The state script comes from a third-party page, so it only ever runs inside
//! a fresh Boa [`Context`] with no host bindings registered: no I/O, no
//! network, no filesystem, only value construction and assignment.

use crate::config::SandboxLimits;
use crate::error::LyricsError;
use boa_engine::{Context, JsString, JsValue, Source};
use regex::Regex;
use std::sync::LazyLock;

/// Property path from the state namespace to the lyrics HTML fragment.
pub const LYRICS_HTML_PATH: [&str; 4] = ["songPage", "lyricsData", "body", "html"];

static WINDOW_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|[^\w$.])window\.([A-Za-z_$])").expect("valid regex"));

/// Drop the `window.` qualifier from assignment targets so they bind on the
/// sandbox's own global scope. Only matches `window.` in identifier position,
/// not as the tail of a longer name (`mywindow.x`) or a member (`a.window.x`).
pub fn strip_window_prefix(script: &str) -> String {
    WINDOW_PREFIX.replace_all(script, "${1}${2}").into_owned()
}

/// Run the state script in a new sandbox and read the lyrics HTML fragment
/// from `<namespace>.songPage.lyricsData.body.html`.
///
/// Blocking and CPU-bound; the caller is responsible for the wall-clock
/// deadline in [`SandboxLimits::deadline`].
pub fn materialize_lyrics_html(
    script: &str,
    namespace: &str,
    limits: &SandboxLimits,
) -> Result<String, LyricsError> {
    let script = strip_window_prefix(script);

    // One interpreter per call: global bindings never leak between extractions.
    let mut context = Context::default();
    context
        .runtime_limits_mut()
        .set_loop_iteration_limit(limits.loop_iterations);
    context
        .runtime_limits_mut()
        .set_recursion_limit(limits.recursion);

    context
        .eval(Source::from_bytes(script.as_bytes()))
        .map_err(|e| LyricsError::ScriptExecution(e.to_string()))?;
    tracing::debug!(bytes = script.len(), "Executed state script");

    let value = read_path(&mut context, namespace, &LYRICS_HTML_PATH)?;
    let path = dotted(namespace, &LYRICS_HTML_PATH);

    let html = value.as_string().ok_or_else(|| LyricsError::UnexpectedShape {
        path: path.clone(),
        reason: format!("expected string, found {}", describe(&value)),
    })?;

    html.to_std_string()
        .map_err(|e| LyricsError::Parse(format!("fragment at `{path}` is not valid text: {e}")))
}

/// Walk `namespace.path...` from the global object, one property at a time,
/// failing on the first segment that is missing or not an object.
fn read_path(
    context: &mut Context,
    namespace: &str,
    path: &[&str],
) -> Result<JsValue, LyricsError> {
    let global = context.global_object();
    let script_error = |e: boa_engine::JsError| LyricsError::ScriptExecution(e.to_string());

    let mut value = global
        .get(JsString::from(namespace), context)
        .map_err(script_error)?;
    let mut walked = namespace.to_string();

    for segment in path {
        let object = match value.as_object() {
            Some(object) => object.clone(),
            None => {
                return Err(LyricsError::UnexpectedShape {
                    path: walked,
                    reason: format!("expected object, found {}", describe(&value)),
                })
            }
        };
        value = object
            .get(JsString::from(*segment), context)
            .map_err(script_error)?;
        walked.push('.');
        walked.push_str(segment);
    }

    if value.is_undefined() {
        return Err(LyricsError::UnexpectedShape {
            path: walked,
            reason: "field is missing".to_string(),
        });
    }

    Ok(value)
}

fn dotted(namespace: &str, path: &[&str]) -> String {
    std::iter::once(namespace)
        .chain(path.iter().copied())
        .collect::<Vec<_>>()
        .join(".")
}

fn describe(value: &JsValue) -> &'static str {
    if value.is_undefined() {
        "undefined"
    } else if value.is_null() {
        "null"
    } else if value.is_boolean() {
        "boolean"
    } else if value.is_number() {
        "number"
    } else if value.is_bigint() {
        "bigint"
    } else if value.is_string() {
        "string"
    } else if value.is_symbol() {
        "symbol"
    } else if value.is_callable() {
        "function"
    } else {
        "object"
    }
}
