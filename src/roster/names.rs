//! Name normalization utilities.
//!
//! Player names arrive from two feeds that disagree on transliteration and
//! diacritics ("Müller" vs "Mueller", "Håland" vs "Haland"). Matching is
//! therefore attempted both on the accented form and on a folded ASCII form.
//! This module provides:
//! - `normalize`: lowercase + fixed diacritic replacement table
//! - `split_name`: first/family split on the first space only
//! - `NameParts`: both variants of both name components, precomputed

/// Fixed replacement table for diacritic folding.
///
/// Whole-character substitutions only, so application order cannot cause
/// double substitution. German umlauts expand to their two-letter
/// transcriptions (ä→ae, ö→oe, ü→ue, ß→ss); everything else drops the mark.
const REPLACEMENTS: &[(char, &str)] = &[
    ('ä', "ae"),
    ('æ', "ae"),
    ('á', "a"),
    ('ą', "a"),
    ('ć', "c"),
    ('č', "c"),
    ('ç', "c"),
    ('ď', "d"),
    ('é', "e"),
    ('ę', "e"),
    ('ë', "e"),
    ('ğ', "g"),
    ('ı', "i"),
    ('í', "i"),
    ('ï', "i"),
    ('ł', "l"),
    ('ń', "n"),
    ('ň', "n"),
    ('ñ', "n"),
    ('ö', "oe"),
    ('ø', "oe"),
    ('ó', "o"),
    ('ô', "o"),
    ('ß', "ss"),
    ('š', "s"),
    ('ş', "s"),
    ('ś', "s"),
    ('ü', "ue"),
    ('ú', "u"),
    ('ý', "y"),
    ('ź', "z"),
    ('ž', "z"),
];

/// Normalizes a raw display name for cross-feed matching.
///
/// Lowercases the whole string, then applies the fixed diacritic replacement
/// table character by character. Deterministic, pure and idempotent:
/// `normalize(normalize(x)) == normalize(x)` for every input.
///
/// # Examples
/// ```
/// use squad_optimizer::roster::names::normalize;
///
/// assert_eq!(normalize("Müller"), "mueller");
/// assert_eq!(normalize("Håland"), "håland"); // å is not in the table
/// assert_eq!(normalize("GROSSKREUTZ"), "grosskreutz");
/// ```
pub fn normalize(raw_name: &str) -> String {
    fold_diacritics(&raw_name.to_lowercase())
}

/// Applies the replacement table without changing case.
///
/// Used on already-lowercased name components where only the folding step is
/// wanted.
pub fn fold_diacritics(name: &str) -> String {
    let mut folded = String::with_capacity(name.len());
    for ch in name.chars() {
        match REPLACEMENTS.iter().find(|(from, _)| *from == ch) {
            Some((_, to)) => folded.push_str(to),
            None => folded.push(ch),
        }
    }
    folded
}

/// Splits a full name into (first, family), lowercased, diacritics kept.
///
/// The split happens on the first space only, so multi-word family names
/// survive intact ("Kevin De Bruyne" → ("kevin", "de bruyne")). A single-word
/// name has no first name and is treated entirely as the family name.
///
/// # Examples
/// ```
/// use squad_optimizer::roster::names::split_name;
///
/// assert_eq!(
///     split_name("Manuel Neuer"),
///     (Some("manuel".to_string()), "neuer".to_string())
/// );
/// assert_eq!(split_name("Ronaldinho"), (None, "ronaldinho".to_string()));
/// ```
pub fn split_name(full_name: &str) -> (Option<String>, String) {
    match full_name.split_once(' ') {
        Some((first, family)) => (Some(first.to_lowercase()), family.to_lowercase()),
        None => (None, full_name.to_lowercase()),
    }
}

/// Precomputed name components in both matching modes.
///
/// Matching first tries the accented (diacritic-preserving) components and
/// falls back to the folded ones, so both are derived up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameParts {
    /// First name, lowercased, diacritics kept. None for single-word names.
    pub first: Option<String>,
    /// Family name, lowercased, diacritics kept.
    pub family: String,
    /// First name with the replacement table applied.
    pub first_folded: Option<String>,
    /// Family name with the replacement table applied.
    pub family_folded: String,
}

impl NameParts {
    /// Derives both variants of both components from a raw display name.
    pub fn of(raw_name: &str) -> Self {
        let (first, family) = split_name(raw_name);
        let first_folded = first.as_deref().map(fold_diacritics);
        let family_folded = fold_diacritics(&family);
        NameParts {
            first,
            family,
            first_folded,
            family_folded,
        }
    }

    /// First-name initial in the accented form, if a first name exists.
    pub fn initial(&self) -> Option<char> {
        self.first.as_ref().and_then(|f| f.chars().next())
    }

    /// First-name initial in the folded form, if a first name exists.
    pub fn initial_folded(&self) -> Option<char> {
        self.first_folded.as_ref().and_then(|f| f.chars().next())
    }
}
