//! Rich-text editor content and change subscription
//!
//! The editor owns the current HTML and publishes every modification on a
//! `tokio::sync::watch` channel. Forms subscribe and copy the content when a
//! change arrives instead of periodically reading the editor.
//!
//! ```rust,ignore
//! let editor = EditorContent::new("");
//! let mut changes = editor.subscribe();
//!
//! editor.set_html("<p>Hello</p>");
//! let html = changes.changed().await.unwrap();
//! form.content = html;
//! ```

use regex::Regex;
use std::sync::OnceLock;
use tokio::sync::watch;

/// Shared editor content
#[derive(Debug)]
pub struct EditorContent {
    sender: watch::Sender<String>,
}

impl EditorContent {
    pub fn new(initial_html: impl Into<String>) -> Self {
        let (sender, _) = watch::channel(initial_html.into());
        Self { sender }
    }

    /// Replace the content; subscribers are only woken if it actually changed
    ///
    /// Returns whether a change was published.
    pub fn set_html(&self, html: impl Into<String>) -> bool {
        let html = html.into();
        self.sender.send_if_modified(|current| {
            if *current == html {
                return false;
            }
            *current = html;
            true
        })
    }

    /// Current HTML
    pub fn html(&self) -> String {
        self.sender.borrow().clone()
    }

    /// Current content as plain text
    pub fn text(&self) -> String {
        plain_text(&self.sender.borrow())
    }

    /// Subscribe to content changes
    ///
    /// The subscription starts at the current content; only later edits are
    /// reported as changes.
    pub fn subscribe(&self) -> EditorSubscription {
        EditorSubscription {
            receiver: self.sender.subscribe(),
        }
    }
}

impl Default for EditorContent {
    fn default() -> Self {
        Self::new(String::new())
    }
}

/// Receiving side of an editor change subscription
#[derive(Debug)]
pub struct EditorSubscription {
    receiver: watch::Receiver<String>,
}

impl EditorSubscription {
    /// Wait for the next change and return the new HTML
    ///
    /// Returns `None` once the editor has been dropped.
    pub async fn changed(&mut self) -> Option<String> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }

    /// Copy pending content into `target` without waiting
    ///
    /// Returns whether there was a change to apply.
    pub fn apply_pending(&mut self, target: &mut String) -> bool {
        match self.receiver.has_changed() {
            Ok(true) => {
                target.clone_from(&self.receiver.borrow_and_update());
                true
            }
            _ => false,
        }
    }
}

/// Strip markup from editor HTML
///
/// Block-level tags become word breaks, inline tags vanish, common entities
/// are decoded and whitespace is collapsed.
pub fn plain_text(html: &str) -> String {
    static BLOCK_TAG: OnceLock<Regex> = OnceLock::new();
    static ANY_TAG: OnceLock<Regex> = OnceLock::new();

    let block = BLOCK_TAG.get_or_init(|| {
        Regex::new(r"(?i)</?(p|div|br|li|ul|ol|h[1-6]|blockquote|pre|tr|td)\b[^>]*>")
            .expect("block tag pattern is valid")
    });
    let any = ANY_TAG.get_or_init(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

    let spaced = block.replace_all(html, " ");
    let stripped = any.replace_all(&spaced, "");
    let decoded = stripped
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");

    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_strips_tags() {
        assert_eq!(
            plain_text("<p>Hello <strong>world</strong></p><p>Second</p>"),
            "Hello world Second"
        );
        assert_eq!(plain_text("Fish &amp; chips&nbsp;today"), "Fish & chips today");
        assert_eq!(plain_text("<p><br></p>"), "");
    }

    #[test]
    fn test_plain_text_keeps_inline_words_together() {
        assert_eq!(plain_text("Fri<em>day</em>"), "Friday");
    }

    #[tokio::test]
    async fn test_subscription_receives_changes() {
        let editor = EditorContent::new("<p>draft</p>");
        let mut changes = editor.subscribe();

        assert!(editor.set_html("<p>final</p>"));
        assert_eq!(changes.changed().await.as_deref(), Some("<p>final</p>"));
        assert_eq!(editor.text(), "final");
    }

    #[tokio::test]
    async fn test_identical_content_is_not_published() {
        let editor = EditorContent::new("same");
        let mut changes = editor.subscribe();

        assert!(!editor.set_html("same"));
        let mut target = String::new();
        assert!(!changes.apply_pending(&mut target));
        assert!(target.is_empty());
    }

    #[tokio::test]
    async fn test_apply_pending_copies_latest_edit() {
        let editor = EditorContent::default();
        let mut changes = editor.subscribe();

        editor.set_html("one");
        editor.set_html("two");

        let mut target = String::new();
        assert!(changes.apply_pending(&mut target));
        assert_eq!(target, "two");
        assert!(!changes.apply_pending(&mut target));
    }

    #[tokio::test]
    async fn test_changed_returns_none_after_editor_dropped() {
        let editor = EditorContent::new("x");
        let mut changes = editor.subscribe();
        drop(editor);
        assert_eq!(changes.changed().await, None);
    }
}
