//! Turning assistant text into SSML the synthesizer can speak.

use std::sync::LazyLock;

use regex::Regex;

static LINE_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\n\r]").unwrap());

/// Stage directions and markup: `(...)`, `{...}`, `[...]`, fenced code, `*...*`.
static STAGE_DIRECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(.*?\)|\{.*?\}|\[.*?\]|```.*?```|\*.*?\*").unwrap()
});

static NYA_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)nya+n*~*").unwrap());

const PAUSE: &str = "<break />";
const NYA_PHONEME: &str = r#"<phoneme alphabet="ipa" ph="njan"></phoneme>"#;

/// Prepare assistant text for speech.
///
/// Line breaks are dropped, bracketed stage directions become pauses, and
/// the cat-speech interjection is pinned to a fixed pronunciation.
pub fn prepare_for_speech(text: &str) -> String {
    let text = LINE_BREAK_RE.replace_all(text, "");
    let text = STAGE_DIRECTION_RE.replace_all(&text, PAUSE);
    NYA_RE.replace_all(&text, NYA_PHONEME).into_owned()
}

/// Substitute prepared text into an SSML template at `{text}`.
pub fn render_ssml(template: &str, text: &str) -> String {
    template.replace("{text}", &prepare_for_speech(text))
}
