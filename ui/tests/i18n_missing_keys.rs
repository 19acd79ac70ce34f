use std::collections::{BTreeSet, HashSet};

/// Translation completeness test.
/// Ensures the Arabic catalogue provides every key present in the fallback
/// (en-US) `forcegym-ui.ftl`, and nothing the fallback lacks.
///
/// This is a lightweight parser:
/// - Ignores comment lines starting with `#`
/// - Treats any line of the form `key =` or `key=` as a message definition
/// - Skips blank / attribute / variant / continuation lines
/// - Does not attempt to parse multi-line pattern bodies (only keys)
#[test]
fn arabic_catalogue_matches_fallback() {
    const EN_US: &str = include_str!("../i18n/en-US/forcegym-ui.ftl");
    const AR_EG: &str = include_str!("../i18n/ar-EG/forcegym-ui.ftl");

    let fallback_keys = extract_keys(EN_US);
    assert!(
        !fallback_keys.is_empty(),
        "Fallback (en-US) contains no keys."
    );
    assert_no_dup_keys(EN_US, "en-US");
    assert_no_dup_keys(AR_EG, "ar-EG");

    let arabic_keys = extract_keys(AR_EG);
    let missing: BTreeSet<_> = fallback_keys.difference(&arabic_keys).cloned().collect();
    let extra: BTreeSet<_> = arabic_keys.difference(&fallback_keys).cloned().collect();

    assert!(
        missing.is_empty(),
        "ar-EG is missing {} key(s):\n  {}\n\nHint: copy the missing keys from en-US, then translate.",
        missing.len(),
        missing.into_iter().collect::<Vec<_>>().join("\n  ")
    );
    assert!(
        extra.is_empty(),
        "ar-EG defines keys en-US lacks:\n  {}",
        extra.into_iter().collect::<Vec<_>>().join("\n  ")
    );
}

fn message_key(line: &str) -> Option<&str> {
    let line = line.trim();
    if line.is_empty() || line.starts_with(['#', '.', '[', '*', '}', '-']) {
        return None;
    }
    let (left, _) = line.split_once('=')?;
    let key = left.trim();
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    valid.then_some(key)
}

/// Extract message keys from a Fluent file (simple heuristic).
fn extract_keys(src: &str) -> HashSet<String> {
    src.lines()
        .filter(|line| !line.starts_with(char::is_whitespace))
        .filter_map(message_key)
        .map(str::to_string)
        .collect()
}

/// Assert no duplicate key definitions in a single FTL file (rudimentary).
fn assert_no_dup_keys(src: &str, locale: &str) {
    let mut seen = HashSet::new();
    let mut dups = BTreeSet::new();

    for raw in src.lines().filter(|line| !line.starts_with(char::is_whitespace)) {
        if let Some(key) = message_key(raw) {
            if !seen.insert(key.to_string()) {
                dups.insert(format!("{key}  (line: \"{raw}\")"));
            }
        }
    }

    if !dups.is_empty() {
        panic!(
            "Duplicate key definitions in {locale}:\n  {}",
            dups.into_iter().collect::<Vec<_>>().join("\n  ")
        );
    }
}
