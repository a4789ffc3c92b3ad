//! Markdown → sanitized HTML for the preview pane.
//!
//! Thin wrapper around `pulldown_cmark`. Raw HTML in the source is
//! re-emitted as text, so it reaches the output escaped rather than live;
//! everything else is the library's standard rendering.

use pulldown_cmark::{Event, Options, Parser, html};

/// Render markdown to HTML with raw HTML neutralized.
pub fn render_html(text: &str) -> String {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_TASKLISTS);

    let events = Parser::new_ext(text, opts).map(|event| match event {
        // Text events get entity-escaped by the HTML writer.
        Event::Html(raw) => Event::Text(raw),
        Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut out = String::new();
    html::push_html(&mut out, events);
    out
}
