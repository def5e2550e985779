//! The facade tying the whole regex pipeline together: source text to a
//! compiled, minimized [Matcher]. See the [crate::regex] module docs for the
//! full source -> token -> AST -> NFA -> DFA -> minimized DFA pipeline this
//! drives.

use super::ast::RegexAst;
use super::lexer::{self, LexError};
use super::parser::{self, SyntaxError};
use crate::dfa::Dfa;
use thiserror::Error;

/// Everything that can go wrong compiling a regex source string. Both
/// variants carry the position at which they occurred; neither indicates a
/// bug in this crate (see [crate::dfa::parse::DfaParseError] and
/// [crate::nfa::parse::NfaParseError] for the file-format analogues of the
/// "this should never happen" case, which this pipeline never reaches
/// because it builds its own NFA/DFA internally rather than parsing one from
/// text).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegexError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

/// Tokenizes and parses `source`, yielding the AST without compiling it any
/// further. Most callers want [compile] instead; this is exposed separately
/// for callers that need the AST itself (to run [RegexAst::naive_match], or
/// to convert it to an NFA without minimizing).
pub fn parse(source: &str) -> Result<RegexAst, RegexError> {
    let tokens = lexer::tokenize(source)?;
    let ast = parser::parse(&tokens, source.len())?;
    Ok(ast)
}

/// Runs the full pipeline: lex, parse, build the Thompson-construction NFA,
/// determinize it via subset construction, minimize the result, and
/// normalize its state names. Compilation is pure; nothing is retained
/// between calls.
pub fn compile(source: &str) -> Result<Matcher, RegexError> {
    let ast = parse(source)?;
    let mut dfa = ast.to_nfa().to_dfa();
    dfa.minimize();
    dfa.normalize_states();
    Ok(Matcher { dfa })
}

/// A compiled regular expression: a minimized DFA plus the word-acceptance
/// test. Immutable once built, so a `Matcher` may be shared across threads
/// and queried concurrently without any coordination, since every query is a
/// pure read over the same DFA.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matcher {
    dfa: Dfa,
}

impl Matcher {
    /// Decides whether `word` is in this regex's language, by walking the
    /// minimized DFA one character at a time. Linear in the length of
    /// `word`; never fails, since every well-formed DFA returns a boolean
    /// for any string (an input character absent from the DFA's alphabet is
    /// simply a rejection, not an error; see [crate::dfa::eval::DfaEvaluator::step]).
    pub fn accepts(&self, word: &str) -> bool {
        let symbols: Vec<String> = word.chars().map(|c| c.to_string()).collect();
        let symbols: Vec<&str> = symbols.iter().map(String::as_str).collect();
        self.dfa.accepts(&symbols)
    }

    /// The minimized DFA backing this matcher, for callers that want to
    /// inspect or further combine it (e.g. with [crate::dfa::Dfa::union]).
    pub fn dfa(&self) -> &Dfa {
        &self.dfa
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accepts(source: &str, word: &str) -> bool {
        compile(source).unwrap().accepts(word)
    }

    #[test]
    fn single_char() {
        assert!(accepts("a", "a"));
        assert!(!accepts("a", ""));
        assert!(!accepts("a", "aa"));
        assert!(!accepts("a", "b"));
    }

    #[test]
    fn union() {
        assert!(accepts("ab|cd", "ab"));
        assert!(accepts("ab|cd", "cd"));
        assert!(!accepts("ab|cd", ""));
        assert!(!accepts("ab|cd", "a"));
        assert!(!accepts("ab|cd", "abcd"));
    }

    #[test]
    fn star() {
        assert!(accepts("a*", ""));
        assert!(accepts("a*", "a"));
        assert!(accepts("a*", "aaaa"));
        assert!(!accepts("a*", "b"));
        assert!(!accepts("a*", "aab"));
    }

    #[test]
    fn plus_grouped() {
        assert!(accepts("(ab)+", "ab"));
        assert!(accepts("(ab)+", "abab"));
        assert!(!accepts("(ab)+", ""));
        assert!(!accepts("(ab)+", "a"));
        assert!(!accepts("(ab)+", "aba"));
    }

    #[test]
    fn exact_range() {
        assert!(accepts("a{2,3}", "aa"));
        assert!(accepts("a{2,3}", "aaa"));
        assert!(!accepts("a{2,3}", "a"));
        assert!(!accepts("a{2,3}", "aaaa"));
    }

    #[test]
    fn char_class_plus() {
        assert!(accepts("[a-c]+", "a"));
        assert!(accepts("[a-c]+", "bca"));
        assert!(accepts("[a-c]+", "ccc"));
        assert!(!accepts("[a-c]+", ""));
        assert!(!accepts("[a-c]+", "d"));
        assert!(!accepts("[a-c]+", "abd"));
    }

    #[test]
    fn digit_and_word_shorthands() {
        assert!(accepts(r"\d{3}-\d{4}", "123-4567"));
        assert!(!accepts(r"\d{3}-\d{4}", "12-4567"));
        assert!(!accepts(r"\d{3}-\d{4}", "abc-defg"));

        assert!(accepts(r"\w+", "hello_42"));
        assert!(!accepts(r"\w+", ""));
        assert!(!accepts(r"\w+", "hi!"));
    }

    #[test]
    fn empty_source_is_lambda() {
        assert!(accepts("", ""));
        assert!(!accepts("", "a"));
    }

    #[test]
    fn optional() {
        assert!(accepts("ab?c", "ac"));
        assert!(accepts("ab?c", "abc"));
        assert!(!accepts("ab?c", "abbc"));
    }

    #[test]
    fn naive_match_agrees_with_compiled_matcher() {
        let cases = [
            ("a", vec!["", "a", "aa", "b"]),
            ("ab|cd", vec!["ab", "cd", "", "a", "abcd"]),
            ("a*", vec!["", "a", "aaaa", "b", "aab"]),
            ("(ab)+", vec!["ab", "abab", "", "a", "aba"]),
            ("a{2,3}", vec!["a", "aa", "aaa", "aaaa"]),
            ("[a-c]+", vec!["", "a", "bca", "ccc", "d", "abd"]),
        ];
        for (source, words) in cases {
            let ast = parse(source).unwrap();
            let matcher = compile(source).unwrap();
            for word in words {
                assert_eq!(
                    ast.naive_match(word),
                    matcher.accepts(word),
                    "disagreement on regex {source:?}, word {word:?}"
                );
            }
        }
    }

    #[test]
    fn normalize_states_is_deterministic_across_runs() {
        let a = compile(r"\d{3}-\d{4}").unwrap();
        let b = compile(r"\d{3}-\d{4}").unwrap();
        assert_eq!(a.dfa(), b.dfa());
    }

    #[test]
    fn unterminated_escape_is_lex_error() {
        assert!(matches!(parse("a\\"), Err(RegexError::Lex(_))));
    }

    #[test]
    fn inverted_class_is_syntax_error() {
        assert!(matches!(parse("[z-a]"), Err(RegexError::Syntax(_))));
    }
}
