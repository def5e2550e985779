//! Recursive-descent parser turning a [super::lexer::Token] stream into a
//! [RegexAst].
//!
//! Grammar (see the crate-level regex documentation for the full prose):
//!
//! ```text
//! regex  := union
//! union  := concat ('|' concat)*
//! concat := op*                     (zero ops reduces to Lambda)
//! op     := val ('*' | '+' | '?' | RANGE)?
//! val    := '(' regex ')' | '[' set ']' | CHAR | ESCAPED | CLASS_DIGIT
//!         | CLASS_WORD | CLASS_INT
//! set    := atom*                   (zero atoms denotes Empty)
//! atom   := CHAR | ESCAPED | CLASS_INT
//! ```
//!
//! `concat`'s ability to reduce to zero ops (rather than requiring at least
//! one) is what lets `()`, a leading/trailing `|`, and the empty pattern all
//! parse as `Lambda` instead of erroring.

use super::ast::RegexAst;
use super::lexer::{ClassInterval, RangeCount, Token, TokenKind};
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("unexpected token {found:?} at position {position}")]
    UnexpectedToken { position: usize, found: TokenKind },
    #[error("unexpected end of input at position {position}")]
    UnexpectedEnd { position: usize },
    #[error("unbalanced bracket at position {position}")]
    UnbalancedBracket { position: usize },
    #[error("inverted class interval '{first}'-'{last}' at position {position}")]
    InvertedClassInterval {
        position: usize,
        first: char,
        last: char,
    },
}

/// Parses a full token stream into a [RegexAst]. `source_len` (the byte
/// length of the original source) is only used to report a sensible position
/// for errors that occur at end-of-input.
pub fn parse(tokens: &[Token], source_len: usize) -> Result<RegexAst, SyntaxError> {
    let mut parser = Parser {
        tokens,
        pos: 0,
        eof_position: source_len,
    };
    let ast = parser.regex()?;
    if let Some(tok) = parser.peek() {
        return Err(SyntaxError::UnexpectedToken {
            position: tok.position,
            found: tok.kind.clone(),
        });
    }
    Ok(ast)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    eof_position: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&Token> {
        let tok = self.tokens.get(self.pos);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn match_literal(&mut self, expected: char) -> bool {
        if let Some(Token {
            kind: TokenKind::Literal(c),
            ..
        }) = self.peek()
        {
            if *c == expected {
                self.advance();
                return true;
            }
        }
        false
    }

    fn expect_literal(&mut self, expected: char) -> Result<(), SyntaxError> {
        match self.peek() {
            Some(Token {
                kind: TokenKind::Literal(c),
                ..
            }) if *c == expected => {
                self.advance();
                Ok(())
            }
            Some(tok) => Err(SyntaxError::UnbalancedBracket {
                position: tok.position,
            }),
            None => Err(SyntaxError::UnbalancedBracket {
                position: self.eof_position,
            }),
        }
    }

    fn can_start_val(&self) -> bool {
        matches!(
            self.peek().map(|t| &t.kind),
            Some(TokenKind::Literal('('))
                | Some(TokenKind::Literal('['))
                | Some(TokenKind::Char(_))
                | Some(TokenKind::Escaped(_))
                | Some(TokenKind::ClassDigit)
                | Some(TokenKind::ClassWord)
                | Some(TokenKind::ClassInt(_))
        )
    }

    fn regex(&mut self) -> Result<RegexAst, SyntaxError> {
        self.union()
    }

    fn union(&mut self) -> Result<RegexAst, SyntaxError> {
        let mut node = self.concat()?;
        while self.match_literal('|') {
            let rhs = self.concat()?;
            node = RegexAst::Union(Box::new(node), Box::new(rhs));
        }
        Ok(node)
    }

    fn concat(&mut self) -> Result<RegexAst, SyntaxError> {
        let mut ops = Vec::new();
        while self.can_start_val() {
            ops.push(self.op()?);
        }
        Ok(ops
            .into_iter()
            .rev()
            .reduce(|acc, op| RegexAst::Concat(Box::new(op), Box::new(acc)))
            .unwrap_or(RegexAst::Lambda))
    }

    fn op(&mut self) -> Result<RegexAst, SyntaxError> {
        let v = self.val()?;
        if self.match_literal('*') {
            Ok(RegexAst::Star(Box::new(v)))
        } else if self.match_literal('+') {
            Ok(RegexAst::Plus(Box::new(v)))
        } else if self.match_literal('?') {
            Ok(RegexAst::Union(Box::new(v), Box::new(RegexAst::Lambda)))
        } else if let Some(&range) = self.peek().and_then(|t| match &t.kind {
            TokenKind::Range(r) => Some(r),
            _ => None,
        }) {
            self.advance();
            Ok(apply_range(v, range))
        } else {
            Ok(v)
        }
    }

    fn val(&mut self) -> Result<RegexAst, SyntaxError> {
        match self.peek() {
            Some(Token {
                kind: TokenKind::Literal('('),
                ..
            }) => {
                self.advance();
                let inner = self.regex()?;
                self.expect_literal(')')?;
                Ok(inner)
            }
            Some(Token {
                kind: TokenKind::Literal('['),
                ..
            }) => {
                self.advance();
                let set = self.set()?;
                self.expect_literal(']')?;
                Ok(set)
            }
            Some(Token {
                kind: TokenKind::Char(c),
                ..
            }) => {
                let c = *c;
                self.advance();
                Ok(RegexAst::Char(c))
            }
            Some(Token {
                kind: TokenKind::Escaped(c),
                ..
            }) => {
                let c = *c;
                self.advance();
                Ok(RegexAst::Char(c))
            }
            Some(Token {
                kind: TokenKind::ClassDigit,
                ..
            }) => {
                self.advance();
                Ok(digit_class())
            }
            Some(Token {
                kind: TokenKind::ClassWord,
                ..
            }) => {
                self.advance();
                Ok(word_class())
            }
            Some(Token {
                kind: TokenKind::ClassInt(ClassInterval { first, last }),
                ..
            }) => {
                let (first, last) = (*first, *last);
                self.advance();
                Ok(RegexAst::Concat(
                    Box::new(RegexAst::Concat(
                        Box::new(RegexAst::Char(first)),
                        Box::new(RegexAst::Char('-')),
                    )),
                    Box::new(RegexAst::Char(last)),
                ))
            }
            Some(tok) => Err(SyntaxError::UnexpectedToken {
                position: tok.position,
                found: tok.kind.clone(),
            }),
            None => Err(SyntaxError::UnexpectedEnd {
                position: self.eof_position,
            }),
        }
    }

    fn set(&mut self) -> Result<RegexAst, SyntaxError> {
        let mut chars = BTreeSet::new();
        loop {
            match self.peek() {
                Some(Token {
                    kind: TokenKind::Char(c),
                    ..
                }) => {
                    chars.insert(*c);
                    self.advance();
                }
                Some(Token {
                    kind: TokenKind::Escaped(c),
                    ..
                }) => {
                    chars.insert(*c);
                    self.advance();
                }
                Some(Token {
                    kind: TokenKind::ClassInt(ClassInterval { first, last }),
                    position,
                }) => {
                    let (first, last, position) = (*first, *last, *position);
                    if first > last {
                        return Err(SyntaxError::InvertedClassInterval {
                            position,
                            first,
                            last,
                        });
                    }
                    chars.extend(first..=last);
                    self.advance();
                }
                _ => break,
            }
        }
        if chars.is_empty() {
            Ok(RegexAst::Empty)
        } else {
            Ok(RegexAst::CharClass(chars))
        }
    }
}

fn digit_class() -> RegexAst {
    RegexAst::CharClass(('0'..='9').collect())
}

fn word_class() -> RegexAst {
    let mut set: BTreeSet<char> = ('a'..='z').collect();
    set.extend('A'..='Z');
    set.extend('0'..='9');
    set.insert('_');
    RegexAst::CharClass(set)
}

fn apply_range(val: RegexAst, range: RangeCount) -> RegexAst {
    let mut acc = RegexAst::Empty;
    for k in range.min..=range.max {
        acc = RegexAst::Union(Box::new(acc), Box::new(pow_concat(val.clone(), k)));
    }
    acc
}

fn pow_concat(val: RegexAst, k: u32) -> RegexAst {
    if k == 0 {
        RegexAst::Lambda
    } else {
        RegexAst::Concat(Box::new(val.clone()), Box::new(pow_concat(val, k - 1)))
    }
}
