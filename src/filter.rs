use crate::structures::Notice;

/// Case-insensitive substring match over `title + " " + content`.
pub fn matches(notice: &Notice, needle_lower: &str) -> bool {
    format!("{} {}", notice.title, notice.content)
        .to_lowercase()
        .contains(needle_lower)
}

/// Keep the notices matching `term`, preserving order. An empty term keeps everything.
pub fn search(notices: Vec<Notice>, term: &str) -> Vec<Notice> {
    if term.is_empty() {
        return notices;
    }
    let needle = term.to_lowercase();
    notices.into_iter().filter(|n| matches(n, &needle)).collect()
}

pub fn in_category(notices: Vec<Notice>, category: &str) -> Vec<Notice> {
    notices
        .into_iter()
        .filter(|n| n.category == category)
        .collect()
}
