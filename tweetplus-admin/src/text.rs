//! Text cleanup applied to every tweet before it is sent.
//!
//! [`normalize`] canonicalizes Unicode and then unifies the characters that
//! tend to leak in from word processors: stray control characters, the many
//! dash and hyphen code points, curly quotes and unusual line breaks.
use tweetplus_common::NormalForm;
use unicode_normalization::UnicodeNormalization;

const SOFT_HYPHEN: char = '\u{00AD}';

/// Every `Dash` code point other than `-` itself, plus the hyphen bullet.
///
/// Replaced after normalization, so compatibility forms that decompose into
/// one of these are covered too.
const HYPHENS: &[char] = &[
    '\u{058A}',  // armenian hyphen
    '\u{05BE}',  // hebrew maqaf
    '\u{1400}',  // canadian syllabics hyphen
    '\u{1806}',  // mongolian todo soft hyphen
    '\u{2010}',  // hyphen
    '\u{2011}',  // non-breaking hyphen
    '\u{2012}',  // figure dash
    '\u{2013}',  // en dash
    '\u{2014}',  // em dash
    '\u{2015}',  // horizontal bar
    '\u{2043}',  // hyphen bullet
    '\u{2053}',  // swung dash
    '\u{207B}',  // superscript minus
    '\u{208B}',  // subscript minus
    '\u{2212}',  // minus sign
    '\u{2E17}',  // double oblique hyphen
    '\u{2E1A}',  // hyphen with diaeresis
    '\u{2E3A}',  // two-em dash
    '\u{2E3B}',  // three-em dash
    '\u{2E40}',  // double hyphen
    '\u{2E5D}',  // oblique hyphen
    '\u{301C}',  // wave dash
    '\u{3030}',  // wavy dash
    '\u{30A0}',  // katakana-hiragana double hyphen
    '\u{FE31}',  // vertical em dash
    '\u{FE32}',  // vertical en dash
    '\u{FE58}',  // small em dash
    '\u{FE63}',  // small hyphen-minus
    '\u{FF0D}',  // fullwidth hyphen-minus
    '\u{10EAD}', // yezidi hyphenation mark
];

const DOUBLE_QUOTES: &[char] = &['\u{201C}', '\u{201D}', '\u{201E}', '\u{201F}'];

const SINGLE_QUOTES: &[char] = &[
    '\u{2018}', '\u{2019}', '\u{201A}', '\u{201B}', '\u{2032}', '\u{0060}', '\u{00B4}',
];

/// Control characters are dropped, except the whitespace ones that the
/// line-ending rules below rewrite.
fn is_removable_control(c: char) -> bool {
    c.is_control() && !matches!(c, '\t' | '\n' | '\u{000B}' | '\u{000C}' | '\r' | '\u{0085}')
}

/// Normalize Unicode, hyphens, quotes and whitespace.
///
/// With `collapse` every whitespace run (newlines included) becomes a single
/// space and the ends are trimmed; without it only line endings are unified
/// to `\n`.
///
/// ```
/// use tweetplus_admin::text::normalize;
/// use tweetplus_common::NormalForm;
///
/// let cleaned = normalize("\u{201C}Caf\u{E9}\u{201D} \u{2013} menu\r\n", NormalForm::Nfkc, true);
/// assert_eq!(cleaned, "\"Café\" - menu");
/// ```
pub fn normalize(text: &str, form: NormalForm, collapse: bool) -> String {
    // Removals come first so that canonical composition sees the final
    // neighbours of every combining mark.
    let stripped: String = text
        .chars()
        .filter(|&c| !is_removable_control(c) && c != SOFT_HYPHEN)
        .collect();

    let canonical: String = match form {
        NormalForm::Nfc => stripped.nfc().collect(),
        NormalForm::Nfd => stripped.nfd().collect(),
        NormalForm::Nfkc => stripped.nfkc().collect(),
        NormalForm::Nfkd => stripped.nfkd().collect(),
    };

    let mut text = canonical.replace(HYPHENS, "-");

    // "``" must be merged before single backticks become apostrophes, and
    // apostrophes must be unified before "''" is merged.
    text = text.replace("``", "\"");
    text = text.replace(SINGLE_QUOTES, "'");
    text = text.replace("''", "\"");
    text = text.replace(DOUBLE_QUOTES, "\"");

    text = text.replace(['\u{000B}', '\u{000C}', '\u{0085}'], " ");
    text = text
        .replace("\r\n", "\n")
        .replace(['\r', '\u{2028}', '\u{2029}'], "\n");

    if collapse {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    } else {
        text
    }
}

/// [`normalize`] with NFKC and whitespace collapsing.
pub fn normalize_default(text: &str) -> String {
    normalize(text, NormalForm::Nfkc, true)
}

/// Shorten `text` to at most `limit` characters, ending in `…` when cut.
///
/// ```
/// use tweetplus_admin::text::truncate_chars;
///
/// assert_eq!(truncate_chars("abcdef", 4), "abc…");
/// assert_eq!(truncate_chars("abc", 4), "abc");
/// ```
pub fn truncate_chars(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut out: String = text.chars().take(limit.saturating_sub(1)).collect();
    if limit > 0 {
        out.push('…');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "",
        "   ",
        "plain ascii text",
        "\u{201C}Smart\u{201D} \u{2018}quotes\u{2019} and ``latex'' style",
        "em\u{2014}dash, en\u{2013}dash, minus \u{2212}5, soft\u{00AD}hyphen",
        "line one\r\nline two\rline three\u{2028}four\u{2029}five",
        "tab\tvt\u{000B}ff\u{000C}nel\u{0085}end",
        "bell\u{0007} null\u{0000} esc\u{001B} del\u{007F} c1\u{0090}",
        "e\u{0001}\u{0301} stays composable",
        "\u{2019}\u{2019} curly pair",
        "'''triple''' and ````quad````",
        "ﬁne ＡＢＣ ① ½ …",
        "  leading and trailing  \n\n ",
        "Ünïcödé déjà vu — naïve café",
    ];

    fn all_variants(s: &str) -> Vec<(NormalForm, bool, String)> {
        let mut out = Vec::new();
        for form in [
            NormalForm::Nfc,
            NormalForm::Nfd,
            NormalForm::Nfkc,
            NormalForm::Nfkd,
        ] {
            for collapse in [true, false] {
                out.push((form, collapse, normalize(s, form, collapse)));
            }
        }
        out
    }

    #[test]
    fn idempotent_for_every_form() {
        for sample in SAMPLES {
            for (form, collapse, once) in all_variants(sample) {
                let twice = normalize(&once, form, collapse);
                assert_eq!(once, twice, "form={form} collapse={collapse} input={sample:?}");
            }
        }
    }

    #[test]
    fn output_has_no_controls() {
        for sample in SAMPLES {
            for (_, collapse, out) in all_variants(sample) {
                for c in out.chars() {
                    if collapse {
                        assert!(!c.is_control(), "control {c:?} in {out:?}");
                    } else {
                        assert!(
                            !c.is_control() || c == '\n' || c == '\t',
                            "control {c:?} in {out:?}"
                        );
                    }
                    assert_ne!(c, SOFT_HYPHEN);
                }
            }
        }
    }

    #[test]
    fn collapse_leaves_single_inner_spaces() {
        for sample in SAMPLES {
            let out = normalize(sample, NormalForm::Nfkc, true);
            assert_eq!(out.trim(), out);
            let chars: Vec<char> = out.chars().collect();
            for pair in chars.windows(2) {
                assert!(
                    !(pair[0].is_whitespace() && pair[1].is_whitespace()),
                    "adjacent whitespace in {out:?}"
                );
            }
        }
    }

    #[test]
    fn unifies_quotes() {
        assert_eq!(
            normalize_default("\u{201C}Hi\u{201D} ``there'' \u{2018}you\u{2019} `x`"),
            "\"Hi\" \"there\" 'you' 'x'"
        );
        assert_eq!(normalize_default("\u{2019}\u{2019}"), "\"");
        // NFKC decomposes the acute accent, so it only survives as a quote
        // under the canonical forms.
        assert_eq!(normalize("x\u{00B4}", NormalForm::Nfc, true), "x'");
    }

    #[test]
    fn unifies_hyphens_and_drops_soft_hyphens() {
        assert_eq!(
            normalize_default("a\u{2010}b\u{2013}c\u{2014}d\u{2212}e co\u{00AD}operate"),
            "a-b-c-d-e cooperate"
        );
    }

    #[test]
    fn every_dash_becomes_hyphen_minus() {
        let input = "a\u{FE31}b\u{FE32}c\u{058A}d\u{05BE}e\u{1806}f\u{2E17}g\u{2E1A}h\u{2E40}i\u{301C}j\u{3030}k\u{30A0}l";
        for form in [
            NormalForm::Nfc,
            NormalForm::Nfd,
            NormalForm::Nfkc,
            NormalForm::Nfkd,
        ] {
            assert_eq!(normalize(input, form, true), "a-b-c-d-e-f-g-h-i-j-k-l", "form={form}");
        }
    }

    #[test]
    fn keeps_lines_without_collapse() {
        assert_eq!(
            normalize("one\r\ntwo\rthree\u{2028}four\u{2029}five", NormalForm::Nfkc, false),
            "one\ntwo\nthree\nfour\nfive"
        );
        assert_eq!(
            normalize("a\u{000B}b\u{000C}c\u{0085}d  e", NormalForm::Nfkc, false),
            "a b c d  e"
        );
    }

    #[test]
    fn collapses_all_whitespace() {
        assert_eq!(
            normalize_default("  one\r\n\ttwo \u{2029} three  "),
            "one two three"
        );
    }

    #[test]
    fn strips_controls_before_composition() {
        assert_eq!(normalize_default("e\u{0001}\u{0301}"), "\u{E9}");
        assert_eq!(normalize_default("bell\u{0007}!"), "bell!");
    }

    #[test]
    fn compatibility_forms_expand_ligatures_and_ellipsis() {
        assert_eq!(normalize_default("ﬁne…"), "fine...");
        assert_eq!(normalize("ﬁne…", NormalForm::Nfc, true), "ﬁne…");
    }

    #[test]
    fn truncation_counts_characters() {
        assert_eq!(truncate_chars("ééééé", 3), "éé…");
        assert_eq!(truncate_chars("abc", 0), "");
        assert_eq!(truncate_chars(&"x".repeat(200), 116).chars().count(), 116);
    }
}
