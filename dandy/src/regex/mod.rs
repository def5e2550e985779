//! # Regular expressions
//!
//! Dandy compiles a regular expression source string into a minimized DFA
//! and answers membership queries against it. The pipeline, leaves first:
//!
//! source text -> [tokens](lexer) -> [AST](ast) -> [ε-NFA](crate::nfa)
//! (Thompson construction) -> [DFA](crate::dfa) (subset construction) ->
//! minimized DFA -> acceptance test.
//!
//! [compile] drives the whole thing and hands back a [Matcher]; most callers
//! only need that one function.
//!
//! ## Syntax
//!
//! `.` is *not* a metacharacter in this dialect; it's a literal character.
//! Eight characters are reserved and have special meaning outside brackets:
//! `|`, `*`, `+`, `?`, `(`, `)`, `[`, `]`. Anything else, including one of
//! those eight preceded by `\`, is a literal character.
//!
//! * `ab` matches only `ab` (concatenation is implicit)
//! * `a|b` matches `a` or `b`
//! * `a*`/`a+`/`a?` are Kleene star/plus and "zero or one"
//! * `a{2,3}` matches `aa` or `aaa`; `a{3}` matches only `aaa`
//! * `[a-c]` matches one of `a`, `b`, `c`; `[abc]` is equivalent
//! * `\d` is shorthand for `[0-9]`, `\w` for `[A-Za-z0-9_]`
//! * `\(`, `\[`, `\\`, `\-`, ... escape a reserved character to its literal
//!
//! Outside `[...]`, a sequence like `a-b` is *not* an interval: it denotes
//! the literal three characters `a`, `-`, `b`. Intervals only mean "a range
//! of characters" inside brackets, and require the first endpoint to not
//! exceed the second (`[z-a]` is a [parser::SyntaxError]).
//!
//! ```
//! use dandy::regex::compile;
//!
//! let ends_with_aab = compile("(a|b)*aab").unwrap();
//! assert!(ends_with_aab.accepts("aaab"));
//! assert!(ends_with_aab.accepts("bbabbaab"));
//! assert!(!ends_with_aab.accepts("aaba"));
//!
//! let us_zip_plus_four = compile(r"\d{5}(-\d{4})?").unwrap();
//! assert!(us_zip_plus_four.accepts("12345"));
//! assert!(us_zip_plus_four.accepts("12345-6789"));
//! assert!(!us_zip_plus_four.accepts("1234"));
//! ```
//!
//! The compiled [Matcher] is immutable and safe to share across threads; see
//! the crate-level docs for how it relates to the table-file automata
//! ([crate::dfa], [crate::nfa]) it's built out of. A [Matcher]'s underlying
//! DFA ([Matcher::dfa]) can be combined with other automata exactly like any
//! other [crate::dfa::Dfa] (union, intersection, equivalence, ...).

pub mod ast;
pub mod compile;
pub mod lexer;
pub mod parser;

pub use ast::RegexAst;
pub use compile::{compile, parse, Matcher, RegexError};
pub use lexer::LexError;
pub use parser::SyntaxError;

use std::fmt;

impl fmt::Display for RegexAst {
    /// Reconstructs a source string in this module's dialect that denotes
    /// the same language as `self`. Not guaranteed to be the string this
    /// AST was originally parsed from (e.g. `[a-c]` round-trips through the
    /// AST as a `CharClass` and is printed back out as `[abc]`), only to
    /// denote the same language. Parenthesizes strictly according to the
    /// grammar's precedence (postfix > concatenation > `|`), regardless of
    /// how the AST was actually built.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_union(self, f)
    }
}

fn write_union(ast: &RegexAst, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match ast {
        RegexAst::Union(a, b) => {
            write_union(a, f)?;
            write!(f, "|")?;
            write_union(b, f)
        }
        _ => write_concat(ast, f),
    }
}

fn write_concat(ast: &RegexAst, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match ast {
        RegexAst::Concat(a, b) => {
            write_concat(a, f)?;
            write_concat(b, f)
        }
        RegexAst::Union(_, _) => {
            write!(f, "(")?;
            write_union(ast, f)?;
            write!(f, ")")
        }
        _ => write_postfix(ast, f),
    }
}

fn write_postfix(ast: &RegexAst, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match ast {
        RegexAst::Star(a) => {
            write_atom(a, f)?;
            write!(f, "*")
        }
        RegexAst::Plus(a) => {
            write_atom(a, f)?;
            write!(f, "+")
        }
        _ => write_atom(ast, f),
    }
}

fn write_atom(ast: &RegexAst, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match ast {
        RegexAst::Char(c) => write_literal(*c, f),
        RegexAst::CharClass(set) => {
            write!(f, "[")?;
            for c in set {
                write_literal(*c, f)?;
            }
            write!(f, "]")
        }
        RegexAst::Empty => write!(f, "[]"),
        RegexAst::Lambda => write!(f, "()"),
        _ => {
            write!(f, "(")?;
            write_union(ast, f)?;
            write!(f, ")")
        }
    }
}

const RESERVED: [char; 8] = ['|', '*', '+', '?', '(', ')', '[', ']'];

fn write_literal(c: char, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if RESERVED.contains(&c) || c == '\\' {
        write!(f, "\\{c}")
    } else {
        write!(f, "{c}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_round_trips_through_compile() {
        for source in ["a", "ab|cd", "a*", "(ab)+", "[a-c]+"] {
            let ast = parse(source).unwrap();
            let printed = ast.to_string();
            let reparsed = parse(&printed).unwrap();
            for word in ["", "a", "ab", "abab", "cd", "bca"] {
                assert_eq!(
                    ast.naive_match(word),
                    reparsed.naive_match(word),
                    "source {source:?} printed as {printed:?} changed the language on {word:?}"
                );
            }
        }
    }
}
