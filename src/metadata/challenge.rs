/// Title fragments of known bot interstitials (Cloudflare and friends).
///
/// Plain substring match: a page merely titled about Cloudflare is flagged
/// too. That over-match is accepted; see DESIGN.md.
const CHALLENGE_PHRASES: [&str; 3] = ["just a moment", "attention required", "cloudflare"];

pub fn is_challenge(title: &str) -> bool {
    let title = title.trim().to_lowercase();
    CHALLENGE_PHRASES.iter().any(|phrase| title.contains(phrase))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_interstitials() {
        assert!(is_challenge("Just a moment..."));
        assert!(is_challenge("Attention Required! | Cloudflare"));
        assert!(is_challenge("  JUST A MOMENT  "));
    }

    #[test]
    fn test_cloudflare_substring_any_case() {
        for title in ["cloudflare", "  CloudFlare  ", "\tCLOUDFLARE\n", "Cloudflare Engineering Blog"] {
            assert!(is_challenge(title), "{title:?}");
        }
    }

    #[test]
    fn test_regular_titles() {
        assert!(!is_challenge(""));
        assert!(!is_challenge("Rust Programming Language"));
        assert!(!is_challenge("Wait a moment"));
    }
}
