use crate::metadata::challenge::is_challenge;
use crate::metadata::types::Metadata;

/// Challenge text is treated as missing so it never reaches the record.
/// The image is kept; interstitials rarely carry one and it is validated later.
fn neutralize(m: &Metadata) -> Metadata {
    if is_challenge(&m.title) {
        Metadata {
            image: m.image.clone(),
            ..Default::default()
        }
    } else {
        Metadata {
            title: m.title.clone(),
            description: m.description.clone(),
            image: m.image.clone(),
            ..Default::default()
        }
    }
}

/// Primary wins field by field; fallback fills only what is still empty.
/// `source` and `blocked` are left for the caller.
pub fn merge(primary: &Metadata, fallback: &Metadata) -> Metadata {
    let mut merged = neutralize(primary);
    let fallback = neutralize(fallback);

    if merged.title.is_empty() {
        merged.title = fallback.title;
    }
    if merged.description.is_empty() {
        merged.description = fallback.description;
    }
    if merged.image.is_empty() {
        merged.image = fallback.image;
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(title: &str, description: &str, image: &str) -> Metadata {
        Metadata {
            title: title.into(),
            description: description.into(),
            image: image.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_only_empty_fields_filled() {
        let merged = merge(&meta("", "D1", ""), &meta("T2", "D2", "I2"));
        assert_eq!(merged, meta("T2", "D1", "I2"));
    }

    #[test]
    fn test_primary_kept_when_complete() {
        let merged = merge(&meta("T1", "D1", "I1"), &meta("T2", "D2", "I2"));
        assert_eq!(merged, meta("T1", "D1", "I1"));
    }

    #[test]
    fn test_challenge_primary_neutralized_keeps_image() {
        let merged = merge(
            &meta("Just a moment...", "Checking your browser", "I1"),
            &meta("Real", "", "I2"),
        );
        assert_eq!(merged, meta("Real", "", "I1"));
    }

    #[test]
    fn test_challenge_fallback_neutralized() {
        let merged = merge(
            &meta("", "", ""),
            &meta("Attention Required! | Cloudflare", "blocked", "I2"),
        );
        assert_eq!(merged, meta("", "", "I2"));
    }

    #[test]
    fn test_source_not_derived() {
        let mut primary = meta("T1", "", "");
        primary.source = Some(crate::metadata::Source::Direct);
        primary.blocked = true;
        let merged = merge(&primary, &meta("", "", ""));
        assert_eq!(merged.source, None);
        assert!(!merged.blocked);
    }
}
