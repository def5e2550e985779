//! Tokenizer for the regex dialect accepted by [super::parser].
//!
//! The lexer makes a single pass over the source string and produces an owned
//! [Vec<Token>], each token tagged with the byte position it started at. It
//! never looks at grammar context; that is the parser's job. The only
//! context-sensitive decision it makes is the same one the grammar pushes
//! down to every token kind that can form one half of a character interval
//! (`CHAR`/`ESCAPED`): whenever such a token is immediately followed by `-`
//! and another such token, the three are fused into a single `CLASS_INT`
//! token instead of three separate ones. Whether that interval means
//! "literal three characters" or "a range of characters" is decided later,
//! by the parser, depending on whether it appears inside `[...]`.

use thiserror::Error;

const LITERALS: [char; 8] = ['|', '*', '+', '?', '(', ')', '[', ']'];

fn is_literal(c: char) -> bool {
    LITERALS.contains(&c)
}

/// The inclusive bounds of a `{m,n}` (or `{n}`, read as `{n,n}`) repetition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeCount {
    pub min: u32,
    pub max: u32,
}

/// The two endpoints of a lexical `A-B` sequence. Whether this denotes a
/// character range or a literal three-character run of `A`, `-`, `B` is a
/// parser-level (context-sensitive) decision, not a lexer-level one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassInterval {
    pub first: char,
    pub last: char,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Char(char),
    Escaped(char),
    Range(RangeCount),
    ClassInt(ClassInterval),
    ClassDigit,
    ClassWord,
    Literal(char),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unterminated escape at position {0}")]
    UnterminatedEscape(usize),
    #[error("malformed range at position {0}: minimum {1} is greater than maximum {2}")]
    MalformedRange(usize, u32, u32),
}

/// Tokenizes `source` into a flat token stream, or fails on the two lexical
/// error conditions the grammar defines: a trailing unescaped `\`, or a
/// `{m,n}` range whose minimum exceeds its maximum. Everything else that
/// doesn't look like a recognized construct (stray `{`/`}`, a lone `-`)
/// degrades gracefully to a `CHAR` token rather than erroring.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let chars: Vec<(usize, char)> = source.char_indices().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let (pos, c) = chars[i];

        if c == '{' {
            if let Some((count, consumed)) = try_range(&chars[i..]) {
                if count.min > count.max {
                    return Err(LexError::MalformedRange(pos, count.min, count.max));
                }
                tokens.push(Token {
                    kind: TokenKind::Range(count),
                    position: pos,
                });
                i += consumed;
                continue;
            }
            tokens.push(Token {
                kind: TokenKind::Char(c),
                position: pos,
            });
            i += 1;
            continue;
        }

        if c == '\\' {
            let (_, x) = *chars
                .get(i + 1)
                .ok_or(LexError::UnterminatedEscape(pos))?;
            match x {
                'd' => {
                    tokens.push(Token {
                        kind: TokenKind::ClassDigit,
                        position: pos,
                    });
                    i += 2;
                }
                'w' => {
                    tokens.push(Token {
                        kind: TokenKind::ClassWord,
                        position: pos,
                    });
                    i += 2;
                }
                _ => {
                    if let Some((last, consumed)) = try_interval_tail(&chars[i + 2..]) {
                        tokens.push(Token {
                            kind: TokenKind::ClassInt(ClassInterval { first: x, last }),
                            position: pos,
                        });
                        i += 2 + consumed;
                    } else {
                        tokens.push(Token {
                            kind: TokenKind::Escaped(x),
                            position: pos,
                        });
                        i += 2;
                    }
                }
            }
            continue;
        }

        if is_literal(c) {
            tokens.push(Token {
                kind: TokenKind::Literal(c),
                position: pos,
            });
            i += 1;
            continue;
        }

        if let Some((last, consumed)) = try_interval_tail(&chars[i + 1..]) {
            tokens.push(Token {
                kind: TokenKind::ClassInt(ClassInterval { first: c, last }),
                position: pos,
            });
            i += 1 + consumed;
            continue;
        }
        tokens.push(Token {
            kind: TokenKind::Char(c),
            position: pos,
        });
        i += 1;
    }
    Ok(tokens)
}

/// `rest` starts right after a CHAR/ESCAPED atom. Returns the second atom's
/// character and how many source characters (`-` plus the atom) it consumed,
/// if `rest` actually continues with `-` followed by another CHAR/ESCAPED atom.
fn try_interval_tail(rest: &[(usize, char)]) -> Option<(char, usize)> {
    let (_, dash) = *rest.first()?;
    if dash != '-' {
        return None;
    }
    let (_, next) = *rest.get(1)?;
    if next == '\\' {
        let (_, escaped) = *rest.get(2)?;
        return Some((escaped, 3));
    }
    if is_literal(next) {
        return None;
    }
    Some((next, 2))
}

/// `rest[0]` is `{`. Returns the parsed count and the number of source
/// characters consumed (including both braces) if `rest` starts with a
/// syntactically valid `{n}` or `{m,n}`.
fn try_range(rest: &[(usize, char)]) -> Option<(RangeCount, usize)> {
    let mut idx = 1;
    let start = idx;
    while rest.get(idx).is_some_and(|(_, c)| c.is_ascii_digit()) {
        idx += 1;
    }
    if idx == start {
        return None;
    }
    let first: u32 = digits(&rest[start..idx]).parse().ok()?;

    if rest.get(idx).map(|(_, c)| *c) == Some(',') {
        idx += 1;
        let start2 = idx;
        while rest.get(idx).is_some_and(|(_, c)| c.is_ascii_digit()) {
            idx += 1;
        }
        if idx == start2 {
            return None;
        }
        let second: u32 = digits(&rest[start2..idx]).parse().ok()?;
        if rest.get(idx).map(|(_, c)| *c) != Some('}') {
            return None;
        }
        Some((
            RangeCount {
                min: first,
                max: second,
            },
            idx + 1,
        ))
    } else if rest.get(idx).map(|(_, c)| *c) == Some('}') {
        Some((
            RangeCount {
                min: first,
                max: first,
            },
            idx + 1,
        ))
    } else {
        None
    }
}

fn digits(slice: &[(usize, char)]) -> String {
    slice.iter().map(|(_, c)| *c).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn token_positions_span_the_whole_source_without_gaps_or_overlap() {
        for source in ["a-z+\\d{2,3}[abc]", r"\w|\(a\)", "---", "{not a range}"] {
            let tokens = tokenize(source).unwrap();
            assert_eq!(
                tokens.first().map(|t| t.position),
                Some(0),
                "first token of {source:?} didn't start at offset 0"
            );
            let mut positions: Vec<usize> = tokens.iter().map(|t| t.position).collect();
            positions.push(source.len());
            // Every byte of the source belongs to exactly one token's span: consecutive
            // token positions are strictly increasing and the last one reaches the end.
            assert!(
                positions.windows(2).all(|w| w[0] < w[1]),
                "token positions for {source:?} were not strictly increasing: {positions:?}"
            );
        }
    }

    #[test]
    fn digit_and_word_shorthands_are_single_tokens() {
        assert_eq!(kinds(r"\d"), vec![TokenKind::ClassDigit]);
        assert_eq!(kinds(r"\w"), vec![TokenKind::ClassWord]);
    }

    #[test]
    fn stray_braces_that_dont_form_a_range_are_char_tokens() {
        assert_eq!(kinds("{"), vec![TokenKind::Char('{')]);
        assert_eq!(kinds("}"), vec![TokenKind::Char('}')]);
        assert_eq!(
            kinds("{not a range}"),
            "{not a range}".chars().map(TokenKind::Char).collect::<Vec<_>>()
        );
    }

    #[test]
    fn valid_ranges_tokenize_as_range() {
        assert_eq!(
            kinds("{3}"),
            vec![TokenKind::Range(RangeCount { min: 3, max: 3 })]
        );
        assert_eq!(
            kinds("{2,5}"),
            vec![TokenKind::Range(RangeCount { min: 2, max: 5 })]
        );
    }

    #[test]
    fn inverted_range_is_a_lex_error() {
        assert_eq!(
            tokenize("{5,2}"),
            Err(LexError::MalformedRange(0, 5, 2))
        );
    }

    #[test]
    fn char_dash_char_fuses_into_a_class_interval() {
        assert_eq!(
            kinds("a-z"),
            vec![TokenKind::ClassInt(ClassInterval { first: 'a', last: 'z' })]
        );
    }

    #[test]
    fn three_dashes_fuse_into_one_class_interval_of_dashes() {
        assert_eq!(
            kinds("---"),
            vec![TokenKind::ClassInt(ClassInterval { first: '-', last: '-' })]
        );
    }

    #[test]
    fn unterminated_escape_is_a_lex_error() {
        assert_eq!(tokenize("a\\"), Err(LexError::UnterminatedEscape(1)));
    }

    #[test]
    fn escaped_reserved_characters_are_escaped_tokens() {
        assert_eq!(kinds(r"\|\(\)\["), vec![
            TokenKind::Escaped('|'),
            TokenKind::Escaped('('),
            TokenKind::Escaped(')'),
            TokenKind::Escaped('['),
        ]);
    }
}
