//! Title normalization for cross-catalogue series matching.
//!
//! Turns a free-text title into an upper-case comparison key that is stable
//! across the punctuation and romanization differences between AniDB,
//! TheTVDB and media library folder names.
//!
//! The rule set is fixed and not locale-aware.

use unicode_normalization::UnicodeNormalization;

/// Apply the full normalization pipeline.
///
/// Steps applied in order:
/// 1. Lower-case + Unicode NFKD
/// 2. Leading episode-number prefix removal (`"01 - "`)
/// 3. Modifier letter / combining mark removal
/// 4. Quote and exclamation removal
/// 5. Separator punctuation → space
/// 6. `&` → `and`
/// 7. Article removal
/// 8. Whitespace collapse + upper-case
pub fn normalise(title: &str) -> String {
    let s = decompose(title);
    let s = strip_episode_prefix(&s);
    let s = strip_modifiers(s);
    let s = erase_quotes(&s);
    let s = separators_to_spaces(&s);
    let s = expand_ampersand(&s);
    let s = remove_articles(&s);
    collapse_and_upper(&s)
}

// ── Step 1: Lower-case + NFKD ─────────────────────────────────────────

fn decompose(s: &str) -> String {
    s.to_lowercase().nfkd().collect()
}

// ── Step 2: Episode-number prefix ─────────────────────────────────────

/// Strip a leading `"<1-3 digits> - "` prefix, as left by file-structure names.
fn strip_episode_prefix(s: &str) -> &str {
    let digits = s.chars().take_while(|c| c.is_ascii_digit()).count();
    if (1..=3).contains(&digits) {
        // ASCII digits are one byte each.
        if let Some(rest) = s[digits..].strip_prefix(" - ") {
            return rest;
        }
    }
    s
}

// ── Step 3: Modifier letters and combining marks ──────────────────────

/// Spacing modifier letters and combining diacritical marks left behind by NFKD.
const MODIFIER_RANGE: std::ops::RangeInclusive<char> = '\u{02B0}'..='\u{0333}';

fn strip_modifiers(s: &str) -> String {
    s.chars().filter(|c| !MODIFIER_RANGE.contains(c)).collect()
}

// ── Step 4: Quotes ────────────────────────────────────────────────────

const ERASED: &[char] = &['"', '\'', '!', '`', '?'];

fn erase_quotes(s: &str) -> String {
    s.chars().filter(|c| !ERASED.contains(c)).collect()
}

// ── Step 5: Separators ────────────────────────────────────────────────

/// Characters that separate words in one catalogue and are absent in another.
///
/// Includes U+2212 (minus sign) and U+2014 (em dash) alongside the en dash,
/// since catalogue titles use all three as subtitle separators.
const SEPARATORS: &[char] = &[
    '/', ',', '.', ':', ';', '\\', '(', ')', '{', '}', '[', ']', '+', '-', '_', '=', '\u{2013}',
    '\u{2014}', '\u{2212}', '*',
];

fn separators_to_spaces(s: &str) -> String {
    s.chars()
        .map(|c| if SEPARATORS.contains(&c) { ' ' } else { c })
        .collect()
}

// ── Step 6: Ampersand ─────────────────────────────────────────────────

fn expand_ampersand(s: &str) -> String {
    s.replace('&', " and ")
}

// ── Step 7: Articles ──────────────────────────────────────────────────

/// Drop every standalone "the". Separators are already spaces at this point,
/// so ", the" and a leading "the " both surface as a bare word.
fn remove_articles(s: &str) -> String {
    s.split_whitespace()
        .filter(|word| *word != "the")
        .collect::<Vec<_>>()
        .join(" ")
}

// ── Step 8: Collapse + upper-case ─────────────────────────────────────

fn collapse_and_upper(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn episode_prefix_stripped() {
        assert_eq!(strip_episode_prefix("01 - cowboy bebop"), "cowboy bebop");
        assert_eq!(strip_episode_prefix("123 - title"), "title");
    }

    #[test]
    fn long_number_prefix_kept() {
        assert_eq!(strip_episode_prefix("1234 - title"), "1234 - title");
        assert_eq!(strip_episode_prefix("86 eighty six"), "86 eighty six");
    }

    #[test]
    fn diacritics_removed() {
        assert_eq!(normalise("Pokémon"), "POKEMON");
        assert_eq!(normalise("Shōjo Kakumei Utena"), "SHOJO KAKUMEI UTENA");
    }

    #[test]
    fn quotes_erased() {
        assert_eq!(normalise("Frieren: Beyond Journey's End"), "FRIEREN BEYOND JOURNEYS END");
        assert_eq!(normalise("K-On!!"), "K ON");
    }

    #[test]
    fn separators_become_spaces() {
        assert_eq!(normalise("Fate/Zero"), "FATE ZERO");
        assert_eq!(normalise("Mobile_Suit_Gundam"), "MOBILE SUIT GUNDAM");
        assert_eq!(normalise("Title (2011)"), "TITLE 2011");
    }

    #[test]
    fn ampersand_expanded() {
        assert_eq!(normalise("Spice & Wolf"), "SPICE AND WOLF");
        assert_eq!(normalise("Spice&Wolf"), "SPICE AND WOLF");
    }

    #[test]
    fn articles_removed() {
        assert_eq!(normalise("The Melancholy of Haruhi Suzumiya"), "MELANCHOLY OF HARUHI SUZUMIYA");
        assert_eq!(normalise("Garden of Sinners, The"), "GARDEN OF SINNERS");
        assert_eq!(normalise("Into the Abyss"), "INTO ABYSS");
    }

    #[test]
    fn article_inside_word_kept() {
        assert_eq!(normalise("Bathe Other"), "BATHE OTHER");
        assert_eq!(normalise("Theatre"), "THEATRE");
    }

    #[test]
    fn fullwidth_folds_to_ascii() {
        assert_eq!(normalise("ＦＵＬＬＷＩＤＴＨ"), "FULLWIDTH");
    }

    #[test]
    fn separator_variants_agree() {
        let a = normalise("Re:Zero \u{2212} Starting Life in Another World");
        let b = normalise("RE ZERO STARTING LIFE IN ANOTHER WORLD");
        assert_eq!(a, b);
        assert_eq!(a, "RE ZERO STARTING LIFE IN ANOTHER WORLD");
        assert_eq!(normalise("Re:Zero - Starting Life in Another World"), b);
    }

    #[test]
    fn file_structure_name() {
        assert_eq!(normalise("05 - The Big Fight"), "BIG FIGHT");
    }

    #[test]
    fn empty_and_punctuation_only() {
        assert_eq!(normalise(""), "");
        assert_eq!(normalise("---"), "");
        assert_eq!(normalise("?!"), "");
    }

    #[test]
    fn absent_title_stays_absent() {
        let title: Option<&str> = None;
        assert_eq!(title.map(normalise), None);
    }

    proptest! {
        #[test]
        fn prop_normalise_idempotent(title in "[a-zA-Z0-9 &:;,.!?'()/_=+*\\-éöāū]{0,48}") {
            let once = normalise(&title);
            prop_assert_eq!(normalise(&once), once);
        }

        #[test]
        fn prop_case_insensitive(title in "[a-zA-Z0-9 :&]{0,48}") {
            prop_assert_eq!(normalise(&title.to_uppercase()), normalise(&title.to_lowercase()));
        }
    }
}
