//! Flattened transcript prompt for completion-style models.

use parley_common::{Role, Turn};

/// Render the system prompt and turns as a `Name: text` transcript that
/// ends with the assistant's cue, e.g.
///
/// ```text
/// You are Aria.
/// Bob: hello
/// Aria:
/// ```
pub(crate) fn render_prompt<'a>(
    system_prompt: &str,
    turns: impl Iterator<Item = &'a Turn>,
    user_name: &str,
    assistant_name: &str,
) -> String {
    let lines: Vec<String> = turns
        .map(|turn| {
            let speaker = match turn.role {
                Role::User => user_name,
                Role::Assistant => assistant_name,
                Role::System => "system",
            };
            format!("{speaker}: {}", turn.content)
        })
        .collect();

    format!("{system_prompt}\n{}\n{assistant_name}:", lines.join("\n"))
}
