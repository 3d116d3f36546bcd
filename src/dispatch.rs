use crate::model::{CommandSpec, DispatchPayload};

/// Resolves the currently active URL. Best effort: `None` aborts the
/// dispatch silently, it is never surfaced as an error.
pub trait UrlSource {
    fn active_url(&mut self) -> Option<String>;
}

/// Reads the URL from the system clipboard. Only http(s) values are
/// accepted; anything else (or an unavailable clipboard) resolves to
/// absent.
pub struct ClipboardUrlSource {
    clipboard: Option<arboard::Clipboard>,
}

impl ClipboardUrlSource {
    pub fn new() -> Self {
        Self {
            clipboard: arboard::Clipboard::new().ok(),
        }
    }
}

impl Default for ClipboardUrlSource {
    fn default() -> Self {
        Self::new()
    }
}

impl UrlSource for ClipboardUrlSource {
    fn active_url(&mut self) -> Option<String> {
        let text = self.clipboard.as_mut()?.get_text().ok()?;
        let text = text.lines().next()?.trim().to_string();
        (text.starts_with("http://") || text.starts_with("https://")).then_some(text)
    }
}

/// Combine the current command with the resolved URL. Returns a fresh
/// payload whose args end with the URL; the model's own args are
/// neither aliased nor mutated. No URL, no payload.
pub fn encode(spec: &CommandSpec, url: Option<&str>) -> Option<DispatchPayload> {
    let url = url?;
    let mut args = spec.args.clone();
    args.push(url.to_string());
    Some(DispatchPayload {
        command: spec.base.clone(),
        args,
    })
}

#[cfg(test)]
#[path = "tests/dispatch_tests.rs"]
mod tests;
