//! Property tests for the front end.
//!
//! A minimal generator and runner on top of `rand`: each property is checked
//! against a few hundred random inputs and the first counterexample is
//! reported.

use frontend::{
    ast::dump::{quote_buffer, quote_char, quote_string},
    lexer::tokens::TokenValue,
    parse_str, parse_with_config, tokenize, ParserConfig,
};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

// Generators
// ----------------------------------------------------------------------------

pub trait Strategy {
    type Value: std::fmt::Debug + Clone;
    fn generate<R: Rng>(&self, rng: &mut R) -> Self::Value;
}

/// Source text glued together from fragments that are likely to interact:
/// keywords, brackets, literals, operators and stray punctuation.
pub struct SourceSoup {
    max_fragments: usize,
}

const FRAGMENTS: &[&str] = &[
    "x", "y", "foo", "Bar", "_", "日本", "import", "include", "as", "def", "class", "struct",
    "inherits", "enum", "alias", "incase", "static", "wild", "ref", "if", "elif", "else", "for",
    "in", "while", "do", "break", "continue", "return", "and", "or", "xor", "not", "0", "42",
    "0x1F", "0b101", "3.14", "1e3", "7u", "9sb", "2.5i", "300b", "12abc", "'c'", "'ab'", "''",
    "b'z'", "\"text\"", "\"open", "b\"buf\"", "\"\"\"multi\nline\"\"\"", "(", ")", "[", "]", "{",
    "}", ",", ".", ":", ";", "!", "->", "...", "+", "-", "*", "/", "%", "@", "^", "=", "+=", "~=",
    "..", "++", "--", "==", "!=", "<", ">", "<=", ">=", "~", "&", "|", "<<", ">>", "$", "?",
    "# note", "\n", "\n", " ", " ", "\t",
];

impl SourceSoup {
    pub fn new(max_fragments: usize) -> Self {
        Self { max_fragments }
    }
}

impl Strategy for SourceSoup {
    type Value = String;

    fn generate<R: Rng>(&self, rng: &mut R) -> String {
        let count = rng.gen_range(0..=self.max_fragments);
        let mut source = String::new();

        for _ in 0..count {
            if let Some(fragment) = FRAGMENTS.choose(rng) {
                source.push_str(fragment);
            }
            if rng.gen_bool(0.5) {
                source.push(' ');
            }
        }

        source
    }
}

/// Strings drawn from characters that need escaping, mixed with plain ones.
pub struct AwkwardString {
    max_len: usize,
}

const AWKWARD: &[char] = &[
    'a', 'Z', '0', ' ', '"', '\'', '\\', '\n', '\r', '\t', '\0', '\u{07}', '\u{08}', '\u{0B}',
    '\u{0C}', '\u{1B}', '\u{7F}', '\u{85}', 'é', '日', '🦀', '#', '$',
];

impl Strategy for AwkwardString {
    type Value = String;

    fn generate<R: Rng>(&self, rng: &mut R) -> String {
        let len = rng.gen_range(0..=self.max_len);
        (0..len)
            .filter_map(|_| AWKWARD.choose(rng).copied())
            .collect()
    }
}

pub struct Bytes {
    max_len: usize,
}

impl Strategy for Bytes {
    type Value = Vec<u8>;

    fn generate<R: Rng>(&self, rng: &mut R) -> Vec<u8> {
        let len = rng.gen_range(0..=self.max_len);
        (0..len).map(|_| rng.gen()).collect()
    }
}

// Runner
// ----------------------------------------------------------------------------

pub struct PropertyRunner {
    iterations: usize,
    seed: u64,
}

impl PropertyRunner {
    pub fn new(iterations: usize, seed: u64) -> Self {
        Self { iterations, seed }
    }

    pub fn run<S, F>(&self, strategy: S, property: F)
    where
        S: Strategy,
        F: Fn(S::Value) -> Result<(), String>,
    {
        let mut rng = StdRng::seed_from_u64(self.seed);

        for i in 0..self.iterations {
            let input = strategy.generate(&mut rng);
            if let Err(msg) = property(input.clone()) {
                panic!(
                    "\n=== Property Failed! ===\nIteration: {}\nInput (Counterexample): {:?}\nError: {}\n========================\n",
                    i + 1,
                    input,
                    msg
                );
            }
        }
    }
}

// Properties
// ----------------------------------------------------------------------------

#[test]
fn prop_lexer_is_deterministic() {
    PropertyRunner::new(300, 1).run(SourceSoup::new(40), |source| {
        let (first, first_diagnostics) = tokenize(&source, None);
        let (second, second_diagnostics) = tokenize(&source, None);

        if first != second {
            return Err(String::from("token streams differ"));
        }
        if first_diagnostics.into_vec() != second_diagnostics.into_vec() {
            return Err(String::from("diagnostics differ"));
        }
        Ok(())
    });
}

#[test]
fn prop_tokens_cover_the_source_in_order() {
    PropertyRunner::new(300, 2).run(SourceSoup::new(40), |source| {
        let (tokens, _) = tokenize(&source, None);
        let length = source.chars().count();

        let mut previous_end = 0;
        for token in &tokens {
            if token.position.offset < previous_end {
                return Err(format!("token {} overlaps its predecessor", token.debug()));
            }
            if token.length == 0 {
                return Err(format!("token {} is empty", token.debug()));
            }
            previous_end = token.position.offset + token.length;
        }

        if previous_end > length {
            return Err(String::from("tokens run past the end of the source"));
        }
        Ok(())
    });
}

#[test]
fn prop_parser_terminates_and_is_deterministic() {
    PropertyRunner::new(300, 3).run(SourceSoup::new(60), |source| {
        let (first, first_diagnostics) = parse_str(&source, None);
        let (second, second_diagnostics) = parse_str(&source, None);

        if first.to_string() != second.to_string() {
            return Err(String::from("dumps differ"));
        }
        if first_diagnostics.len() != second_diagnostics.len() {
            return Err(String::from("diagnostic counts differ"));
        }
        Ok(())
    });
}

#[test]
fn prop_clean_parse_has_no_invalid_nodes() {
    PropertyRunner::new(300, 4).run(SourceSoup::new(12), |source| {
        let (module, diagnostics) = parse_str(&source, None);

        if diagnostics.is_empty() && module.to_string().contains("\"type\": \"invalid\"") {
            return Err(String::from("invalid node without a diagnostic"));
        }
        Ok(())
    });
}

#[test]
fn prop_clone_is_equal() {
    PropertyRunner::new(200, 5).run(SourceSoup::new(40), |source| {
        let (module, _) = parse_str(&source, None);
        let copy = module.clone();

        if copy != module {
            return Err(String::from("clone differs from the original"));
        }
        if copy.node_count() != module.node_count() {
            return Err(String::from("clone has a different node count"));
        }
        Ok(())
    });
}

#[test]
fn prop_depth_limit_is_honoured() {
    PropertyRunner::new(100, 6).run(SourceSoup::new(80), |source| {
        let chars = source.chars().collect::<Vec<char>>();
        let config = ParserConfig {
            max_depth: 4,
            ..ParserConfig::default()
        };

        // Must return, whatever the input
        let (module, _) = parse_with_config(&chars, None, config);
        let _ = module.to_string();
        Ok(())
    });
}

#[test]
fn prop_quoted_string_lexes_back() {
    PropertyRunner::new(500, 7).run(AwkwardString { max_len: 16 }, |value| {
        let quoted = quote_string(&value);
        let (tokens, diagnostics) = tokenize(&quoted, None);

        if !diagnostics.is_empty() {
            return Err(format!("{} produced diagnostics", quoted));
        }
        match tokens.as_slice() {
            [token] if token.value == TokenValue::String(value.clone()) => Ok(()),
            _ => Err(format!("{} lexed to {:?}", quoted, tokens)),
        }
    });
}

#[test]
fn prop_quoted_char_lexes_back() {
    PropertyRunner::new(200, 8).run(AwkwardString { max_len: 1 }, |value| {
        let character = match value.chars().next() {
            Some(character) => character,
            None => return Ok(()),
        };

        let quoted = quote_char(character);
        let (tokens, diagnostics) = tokenize(&quoted, None);

        match tokens.as_slice() {
            [token] if diagnostics.is_empty() && token.value == TokenValue::Character(character) => {
                Ok(())
            }
            _ => Err(format!("{} lexed to {:?}", quoted, tokens)),
        }
    });
}

#[test]
fn prop_quoted_buffer_lexes_back() {
    PropertyRunner::new(300, 9).run(Bytes { max_len: 16 }, |value| {
        let quoted = quote_buffer(&value);
        let (tokens, diagnostics) = tokenize(&quoted, None);

        match tokens.as_slice() {
            [token] if diagnostics.is_empty() && token.value == TokenValue::Buffer(value.clone()) => {
                Ok(())
            }
            _ => Err(format!("{} lexed to {:?}", quoted, tokens)),
        }
    });
}
