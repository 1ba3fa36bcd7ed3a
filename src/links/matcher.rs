use regex::Regex;

// Loose on purpose: anything non-whitespace after the domain is part of the
// link, and the domain token may sit anywhere in the host.
const RE_PREFIX: &str = r"\b(?:\w+://)?[\w.]*";
const RE_SUFFIX: &str = r"\S+";

/// Find the first (leftmost) substring of `text` that looks like a URL
/// rooted at one of `domains`: an optional `scheme://`, a host-ish prefix,
/// the domain token itself, then a non-whitespace tail.
///
/// Domain tokens are escaped before interpolation, so `spotify.com` matches
/// a literal dot rather than any character.
pub fn find_url<'t>(text: &'t str, domains: &[String]) -> Option<&'t str> {
    if domains.is_empty() {
        return None;
    }

    let alternation = domains
        .iter()
        .map(|d| regex::escape(d))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = format!("{RE_PREFIX}(?:{alternation}){RE_SUFFIX}");

    // Escaped alternation of literals inside a fixed template cannot fail
    // to compile.
    let re = Regex::new(&pattern).expect("escaped domain pattern is valid");
    re.find(text).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domains(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn matches_https_url() {
        assert_eq!(
            find_url("https://open.spotify.com/test", &domains(&["spotify"])),
            Some("https://open.spotify.com/test")
        );
    }

    #[test]
    fn matches_schemeless_url_inside_text() {
        let text = "Look at this cool video: youtube.com/video/dgfdfgfd \nI like it a lot";
        assert_eq!(
            find_url(text, &domains(&["spotify", "youtube"])),
            Some("youtube.com/video/dgfdfgfd")
        );
    }

    #[test]
    fn returns_leftmost_match() {
        let text = "youtube.com/a then spotify.com/b";
        assert_eq!(
            find_url(text, &domains(&["spotify", "youtube"])),
            Some("youtube.com/a")
        );
    }

    #[test]
    fn unlisted_domain_does_not_match() {
        assert_eq!(
            find_url("https://open.spotify.com/test", &domains(&["youtube", "deezer"])),
            None
        );
        assert_eq!(
            find_url("https://example.com/test", &domains(&["apple"])),
            None
        );
    }

    #[test]
    fn plain_text_does_not_match() {
        assert_eq!(find_url("No link in message", &domains(&["yandex"])), None);
    }

    #[test]
    fn domain_tokens_are_escaped() {
        // An unescaped dot would let `spotify.com` match `spotify#com`.
        assert_eq!(
            find_url("https://spotify#com/track", &domains(&["spotify.com"])),
            None
        );
        assert_eq!(
            find_url("https://open.spotify.com/track", &domains(&["spotify.com"])),
            Some("https://open.spotify.com/track")
        );
    }

    #[test]
    fn empty_domain_list_never_matches() {
        assert_eq!(find_url("https://open.spotify.com/test", &[]), None);
    }
}
