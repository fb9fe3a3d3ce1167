use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonicalize free text for comparison: NFKD-decompose, drop combining
/// marks, lowercase, and collapse runs of whitespace/hyphens/underscores to
/// single spaces.
///
/// Idempotent: `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase();

    folded
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Similarity ratio between two strings (0-1)
///
/// 0.0 when either side normalizes to empty, 1.0 when both normalize to the
/// same string, otherwise the Sørensen-Dice bigram ratio of the normalized
/// sides. Symmetric and reflexive.
#[inline]
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);

    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }

    strsim::sorensen_dice(&a, &b)
}
