use crate::error::LyricsError;
use scraper::{Html, Selector};

/// Find the text of the inline `<script>` carrying the page state.
///
/// Scripts are scanned in document order and every one containing `marker`
/// overwrites the previous match, so the last matching script wins.
pub fn locate_state_script(html: &str, marker: &str) -> Result<String, LyricsError> {
    let document = Html::parse_document(html);
    let script_sel = Selector::parse("script").expect("valid selector");

    let mut state_script = None;
    let mut matches = 0usize;

    for (index, script) in document.select(&script_sel).enumerate() {
        let text: String = script.text().collect();
        if text.contains(marker) {
            tracing::debug!(index, bytes = text.len(), "Found state script candidate");
            matches += 1;
            state_script = Some(text);
        }
    }

    if matches > 1 {
        tracing::warn!(matches, "Multiple state scripts found, using the last one");
    }

    state_script.ok_or_else(|| LyricsError::StateNotFound {
        marker: marker.to_string(),
    })
}
