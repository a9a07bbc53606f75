//! Symbol normalization: the lookup key for every pricing rule.

/// Uppercase `raw` and drop every character that is not an ASCII letter or digit.
///
/// Uppercasing happens first and is Unicode-aware, so `ß` becomes `SS` and survives.
/// `"eur/usd"`, `"EUR USD"` and `"EURUSD"` all normalize to `"EURUSD"`.
/// Never fails; empty input yields an empty string.
pub fn normalize(raw: &str) -> String {
    raw.to_uppercase()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect()
}
