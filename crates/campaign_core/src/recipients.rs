use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

static SCAN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}(?:\.[a-zA-Z]{2,})?")
        .expect("scan pattern is valid")
});

static ADDRESS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@.]{2,}$").expect("address pattern is valid")
});

const DELIMITERS: &[char] = &[',', ';', '\n'];

/// How candidate addresses are pulled out of pasted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractionStrategy {
    /// Scan for address-shaped substrings; tolerates stray punctuation.
    #[default]
    Scan,
    /// Split on commas, semicolons and newlines; each piece must be an address.
    Delimited,
}

/// Normalized, deduplicated recipient addresses.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecipientSet {
    addresses: BTreeSet<String>,
}

impl RecipientSet {
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    pub fn contains(&self, address: &str) -> bool {
        self.addresses.contains(address)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.addresses.iter().map(String::as_str)
    }

    pub fn join(&self, separator: &str) -> String {
        self.iter().collect::<Vec<_>>().join(separator)
    }

    fn insert_candidate(&mut self, candidate: &str) {
        let normalized = candidate.trim().to_lowercase();
        if is_valid_address(&normalized) {
            self.addresses.insert(normalized);
        }
    }
}

/// Extracts recipients with the default scanning strategy.
pub fn extract(text: &str) -> RecipientSet {
    extract_with(text, ExtractionStrategy::default())
}

pub fn extract_with(text: &str, strategy: ExtractionStrategy) -> RecipientSet {
    let mut set = RecipientSet::default();
    match strategy {
        ExtractionStrategy::Scan => {
            for found in SCAN_PATTERN.find_iter(text) {
                set.insert_candidate(found.as_str());
            }
        }
        ExtractionStrategy::Delimited => {
            for piece in text.split(DELIMITERS) {
                set.insert_candidate(piece);
            }
        }
    }
    set
}

/// `local@domain.tld`: no whitespace or `@` in either part and a final label
/// of at least two characters.
pub fn is_valid_address(candidate: &str) -> bool {
    ADDRESS_PATTERN.is_match(candidate)
}
