//! Turning notices into markup.
//!
//! Everything here is pure string building; a [`RenderTarget`] is whatever
//! holds the current contents of a display area.

use std::borrow::Cow;

use crate::structures::Notice;

/// Characters of content shown in the summary layout before the ellipsis.
pub const SUMMARY_LIMIT: usize = 200;
pub const ELLIPSIS: char = '…';

pub trait RenderTarget {
    /// Replace the whole contents of the area.
    fn replace(&mut self, html: String);
}

impl RenderTarget for String {
    fn replace(&mut self, html: String) {
        *self = html;
    }
}

/// In-memory display area.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Region {
    html: String,
}

impl Region {
    pub fn new() -> Self {
        Region::default()
    }

    pub fn html(&self) -> &str {
        &self.html
    }
}

impl RenderTarget for Region {
    fn replace(&mut self, html: String) {
        self.html = html;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Home page "latest" card, content truncated.
    Summary,
    Grid,
    /// Grid plus a delete button per notice.
    Admin,
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Cut `raw` to `limit` characters, appending [`ELLIPSIS`] when anything was dropped.
pub fn truncate(raw: &str, limit: usize) -> Cow<'_, str> {
    match raw.char_indices().nth(limit) {
        None => Cow::Borrowed(raw),
        Some((cut, _)) => {
            let mut short = raw[..cut].to_owned();
            short.push(ELLIPSIS);
            Cow::Owned(short)
        }
    }
}

fn notice_unit(notice: &Notice, layout: Layout) -> String {
    let title = escape_html(&notice.title);
    let category = escape_html(&notice.category);
    let date = escape_html(&notice.date);
    match layout {
        Layout::Summary => {
            // escape after cutting so an entity is never split
            let content = escape_html(&truncate(&notice.content, SUMMARY_LIMIT));
            format!(
                "<article class=\"notice notice-latest\"><h5>{}</h5><p class=\"muted\">{}</p><small>{} • {}</small></article>",
                title, content, category, date
            )
        }
        Layout::Grid => format!(
            "<article class=\"notice\"><h3>{}</h3><p>{}</p><small><strong>{}</strong> • {}</small></article>",
            title,
            escape_html(&notice.content),
            category,
            date
        ),
        Layout::Admin => format!(
            "<div class=\"notice\"><h4>{}</h4><p class=\"muted\">{}</p><small>{} • {}</small><button class=\"delete\" data-notice-id=\"{}\">Delete</button></div>",
            title,
            escape_html(&notice.content),
            category,
            date,
            escape_html(&notice.id.to_string())
        ),
    }
}

pub fn muted(text: &str) -> String {
    format!("<div class=\"muted\">{}</div>", escape_html(text))
}

/// Render one unit per notice into `target`, or `placeholder` when there are none.
pub fn render_list<T: RenderTarget>(
    notices: &[Notice],
    layout: Layout,
    placeholder: &str,
    target: &mut T,
) {
    if notices.is_empty() {
        target.replace(muted(placeholder));
        return;
    }
    let html = notices
        .iter()
        .map(|n| notice_unit(n, layout))
        .collect::<Vec<_>>()
        .join("\n");
    target.replace(html);
}

pub fn render_message<T: RenderTarget>(text: &str, target: &mut T) {
    target.replace(muted(text));
}
