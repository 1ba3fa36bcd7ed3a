use regex::Regex;
use std::sync::LazyLock;

static UPPER_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("([A-Z]+)").expect("valid regex"));
static TITLE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("([A-Z][a-z]+)").expect("valid regex"));

/// Turn a platform key like `appleMusic` into a human label like
/// `Apple Music`. All-caps runs stay intact (`ITUNES` stays `ITUNES`);
/// a key with no case transitions just gets its first letter uppercased.
#[must_use]
pub fn humanize_platform(key: &str) -> String {
    let spaced = UPPER_RUN.replace_all(key, " $1");
    let spaced = TITLE_RUN.replace_all(&spaced, " $1");

    let mut tokens = spaced.split_whitespace();
    let Some(head) = tokens.next() else {
        return String::new();
    };

    let mut label = capitalize_first(head);
    for token in tokens {
        label.push(' ');
        label.push_str(token);
    }
    label
}

fn capitalize_first(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Group `items` into rows of at most `n`, preserving order. The last row
/// holds the remainder. `n == 0` is a contract violation.
#[must_use]
pub fn chunk_rows<T>(items: Vec<T>, n: usize) -> Vec<Vec<T>> {
    assert!(n > 0, "row width must be positive");

    let mut rows = Vec::with_capacity(items.len().div_ceil(n));
    let mut iter = items.into_iter();
    loop {
        let row: Vec<T> = iter.by_ref().take(n).collect();
        if row.is_empty() {
            break;
        }
        rows.push(row);
    }
    rows
}
