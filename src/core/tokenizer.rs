//! Token estimates for collated output
//!
//! Bundles are usually pasted into an LLM prompt, so `--stats` reports what each
//! one costs. BPE counting goes through tiktoken; `heuristic` skips the encoder
//! and uses per-character ratios instead.

use once_cell::sync::Lazy;
use std::fmt;
use std::str::FromStr;
use tiktoken_rs::{cl100k_base, o200k_base, CoreBPE};

/// Encoding used to size an output file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenModel {
    /// cl100k_base
    #[default]
    Cl100k,
    /// o200k_base
    O200k,
    /// Character-ratio estimate, no encoder loaded
    Heuristic,
}

const MODEL_NAMES: &[&str] = &["cl100k", "o200k", "heuristic"];

impl TokenModel {
    fn encoder(self) -> Option<&'static CoreBPE> {
        let loaded = match self {
            TokenModel::Cl100k => &*CL100K,
            TokenModel::O200k => &*O200K,
            TokenModel::Heuristic => return None,
        };
        match loaded {
            Ok(bpe) => Some(bpe),
            Err(message) => {
                log::warn!("{}; falling back to heuristic token estimate", message);
                None
            }
        }
    }

    pub fn available_models() -> &'static [&'static str] {
        MODEL_NAMES
    }
}

impl fmt::Display for TokenModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let index = match self {
            TokenModel::Cl100k => 0,
            TokenModel::O200k => 1,
            TokenModel::Heuristic => 2,
        };
        f.write_str(MODEL_NAMES[index])
    }
}

impl FromStr for TokenModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cl100k" | "cl100k_base" => Ok(TokenModel::Cl100k),
            "o200k" | "o200k_base" => Ok(TokenModel::O200k),
            "heuristic" | "estimate" => Ok(TokenModel::Heuristic),
            other => Err(format!(
                "Unknown token model: {}. Available: {}",
                other,
                TokenModel::available_models().join(", ")
            )),
        }
    }
}

static CL100K: Lazy<Result<CoreBPE, String>> =
    Lazy::new(|| cl100k_base().map_err(|e| format!("cannot load cl100k_base: {}", e)));

static O200K: Lazy<Result<CoreBPE, String>> =
    Lazy::new(|| o200k_base().map_err(|e| format!("cannot load o200k_base: {}", e)));

/// Number of tokens `text` encodes to under `model`
pub fn count_tokens(text: &str, model: TokenModel) -> usize {
    if text.is_empty() {
        return 0;
    }
    match model.encoder() {
        Some(bpe) => bpe.encode_with_special_tokens(text).len(),
        None => estimate_tokens_heuristic(text),
    }
}

/// Character classes with distinct chars-per-token ratios
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    /// ASCII letters, digits, underscore, whitespace
    Word,
    /// Other ASCII (brackets, operators, quotes)
    Punct,
    /// CJK and fullwidth forms
    Wide,
    Other,
}

impl CharClass {
    fn of(c: char) -> Self {
        if c.is_ascii_alphanumeric() || c == '_' || c.is_ascii_whitespace() {
            CharClass::Word
        } else if c.is_ascii() {
            CharClass::Punct
        } else if is_wide(c) {
            CharClass::Wide
        } else {
            CharClass::Other
        }
    }

    /// Tokens per run of `count` chars, as `count * num / den` rounded up
    fn tokens(self, count: usize) -> usize {
        let (num, den) = match self {
            CharClass::Word => (1, 4),
            CharClass::Punct => (1, 2),
            CharClass::Wide => (2, 3),
            CharClass::Other => (1, 2),
        };
        (count * num).div_ceil(den)
    }
}

const WIDE_RANGES: &[(u32, u32)] = &[
    (0x3000, 0x303F), // CJK symbols and punctuation
    (0x3040, 0x30FF), // kana
    (0x3400, 0x4DBF), // CJK extension A
    (0x4E00, 0x9FFF), // CJK unified ideographs
    (0xAC00, 0xD7AF), // hangul
    (0xFF00, 0xFFEF), // fullwidth forms
];

fn is_wide(c: char) -> bool {
    let cp = c as u32;
    WIDE_RANGES.iter().any(|&(lo, hi)| (lo..=hi).contains(&cp))
}

/// Estimate tokens from character classes alone
pub fn estimate_tokens_heuristic(text: &str) -> usize {
    let mut counts = [0usize; 4];
    for c in text.chars() {
        counts[CharClass::of(c) as usize] += 1;
    }
    [
        CharClass::Word,
        CharClass::Punct,
        CharClass::Wide,
        CharClass::Other,
    ]
    .iter()
    .map(|class| class.tokens(counts[*class as usize]))
    .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_tokens_empty() {
        assert_eq!(count_tokens("", TokenModel::default()), 0);
        assert_eq!(count_tokens("", TokenModel::Heuristic), 0);
    }

    #[test]
    fn test_count_tokens_header_and_body() {
        let text = "//src/App.tsx\nexport default function App() {}\n\n";
        assert!(count_tokens(text, TokenModel::Cl100k) > 0);
        assert!(count_tokens(text, TokenModel::Heuristic) > 0);
    }

    #[test]
    fn test_heuristic_words() {
        // 9 word chars -> ceil(9/4)
        assert_eq!(estimate_tokens_heuristic("abcd efgh"), 3);
    }

    #[test]
    fn test_heuristic_punctuation() {
        assert_eq!(estimate_tokens_heuristic("{}"), 1);
        assert_eq!(estimate_tokens_heuristic("{};"), 2);
    }

    #[test]
    fn test_heuristic_wide() {
        // 3 wide chars -> ceil(6/3)
        assert_eq!(estimate_tokens_heuristic("你好世"), 2);
    }

    #[test]
    fn test_heuristic_mixed_classes_add_up() {
        assert_eq!(estimate_tokens_heuristic("ab{}"), 2);
        assert_eq!(estimate_tokens_heuristic("é"), 1);
    }

    #[test]
    fn test_char_class() {
        assert_eq!(CharClass::of('_'), CharClass::Word);
        assert_eq!(CharClass::of('\n'), CharClass::Word);
        assert_eq!(CharClass::of('/'), CharClass::Punct);
        assert_eq!(CharClass::of('ア'), CharClass::Wide);
        assert_eq!(CharClass::of('ß'), CharClass::Other);
    }

    #[test]
    fn test_model_from_str() {
        assert_eq!("cl100k".parse::<TokenModel>().unwrap(), TokenModel::Cl100k);
        assert_eq!("O200K_BASE".parse::<TokenModel>().unwrap(), TokenModel::O200k);
        assert_eq!("estimate".parse::<TokenModel>().unwrap(), TokenModel::Heuristic);
        assert!("gpt-2".parse::<TokenModel>().unwrap_err().contains("Available"));
    }

    #[test]
    fn test_model_display_roundtrip() {
        for name in TokenModel::available_models() {
            let model: TokenModel = name.parse().unwrap();
            assert_eq!(model.to_string(), *name);
        }
    }
}
