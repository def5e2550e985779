//! The regex abstract syntax tree and the two independent semantics built on
//! top of it: [RegexAst::naive_match] (a direct, exponential-time reference
//! matcher used only to cross-check the compiled automaton in tests) and
//! [RegexAst::to_nfa] (Thompson construction, used by [super::compile]).

use crate::nfa::{Nfa, NfaState};
use std::collections::BTreeSet;
use std::rc::Rc;

/// A parsed regular expression. `Concat` and `Union` are binary, `Star` and
/// `Plus` unary; a parser never needs to build an n-ary node, since the
/// grammar is already expressed in terms of these four combinators plus the
/// three leaf kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegexAst {
    /// The empty language, matching nothing.
    Empty,
    /// The language containing only the empty string.
    Lambda,
    Char(char),
    /// A non-empty set of single characters, any one of which matches.
    CharClass(BTreeSet<char>),
    Concat(Box<RegexAst>, Box<RegexAst>),
    Union(Box<RegexAst>, Box<RegexAst>),
    Star(Box<RegexAst>),
    Plus(Box<RegexAst>),
}

impl RegexAst {
    /// Decides whether `word` is in this regex's language by directly
    /// walking the AST, splitting `word` at every possible boundary for
    /// `Concat`/`Star`/`Plus`. This is exponential in the worst case and
    /// exists purely as an independent oracle to differentially test
    /// [super::compile] against, not as a production matcher.
    pub fn naive_match(&self, word: &str) -> bool {
        let chars: Vec<char> = word.chars().collect();
        self.matches(&chars)
    }

    fn matches(&self, word: &[char]) -> bool {
        match self {
            RegexAst::Empty => false,
            RegexAst::Lambda => word.is_empty(),
            RegexAst::Char(c) => word.len() == 1 && word[0] == *c,
            RegexAst::CharClass(set) => word.len() == 1 && set.contains(&word[0]),
            RegexAst::Concat(a, b) => (0..=word.len())
                .any(|k| a.matches(&word[..k]) && b.matches(&word[k..])),
            RegexAst::Union(a, b) => a.matches(word) || b.matches(word),
            RegexAst::Star(a) => star_matches(a, word),
            RegexAst::Plus(a) => plus_matches(a, word),
        }
    }

    /// Compiles this AST into an epsilon-NFA via Thompson construction,
    /// following the disjoint-fragment-merge protocol: every leaf is built
    /// with fresh, globally unique state indices, and every combinator wires
    /// up its children's fragments with epsilon transitions rather than
    /// mutating them. The alphabet is exactly the set of characters that
    /// appear in the AST, each represented as a single-character `Rc<str>`
    /// symbol so the resulting automaton can be fed straight into the
    /// existing generic [crate::nfa]/[crate::dfa] machinery.
    pub fn to_nfa(&self) -> Nfa {
        let mut alphabet_set = BTreeSet::new();
        collect_alphabet(self, &mut alphabet_set);
        let alphabet: Vec<char> = alphabet_set.into_iter().collect();

        let mut counter = 0usize;
        let mut fragment = build(self, &alphabet, &mut counter);
        fragment.states[fragment.initial].initial = true;
        for &f in &fragment.finals {
            fragment.states[f].accepting = true;
        }

        let alphabet_rc: Rc<[Rc<str>]> = alphabet
            .iter()
            .map(|c| Rc::from(c.to_string().as_str()))
            .collect::<Vec<_>>()
            .into();

        Nfa {
            alphabet: alphabet_rc,
            states: fragment.states,
            initial_state: fragment.initial,
        }
    }
}

fn star_matches(a: &RegexAst, word: &[char]) -> bool {
    word.is_empty() || (1..=word.len()).any(|k| a.matches(&word[..k]) && star_matches(a, &word[k..]))
}

fn plus_matches(a: &RegexAst, word: &[char]) -> bool {
    (1..=word.len())
        .any(|k| a.matches(&word[..k]) && (k == word.len() || star_matches(a, &word[k..])))
}

fn collect_alphabet(ast: &RegexAst, set: &mut BTreeSet<char>) {
    match ast {
        RegexAst::Empty | RegexAst::Lambda => {}
        RegexAst::Char(c) => {
            set.insert(*c);
        }
        RegexAst::CharClass(chars) => set.extend(chars.iter().copied()),
        RegexAst::Concat(a, b) | RegexAst::Union(a, b) => {
            collect_alphabet(a, set);
            collect_alphabet(b, set);
        }
        RegexAst::Star(a) | RegexAst::Plus(a) => collect_alphabet(a, set),
    }
}

/// A partially built NFA fragment: its own state vector plus which of those
/// states is the fragment's initial state and which are its final states.
/// Neither `initial` nor `accepting` flags are set on the underlying
/// [NfaState]s until the whole tree is built; tracking them out-of-band here
/// means a state demoted from "final" by an enclosing `Concat` never needs
/// its flag cleared, because it was never set in the first place.
struct Fragment {
    states: Vec<NfaState>,
    initial: usize,
    finals: Vec<usize>,
}

fn fresh_state(counter: &mut usize, alphabet_len: usize) -> NfaState {
    let idx = *counter;
    *counter += 1;
    NfaState {
        name: Rc::from(format!("q{idx}").as_str()),
        initial: false,
        accepting: false,
        epsilon_transitions: Vec::new(),
        transitions: vec![Vec::new(); alphabet_len],
    }
}

fn merge_states(dest: &mut Vec<NfaState>, mut src: Vec<NfaState>, offset: usize) {
    for state in &mut src {
        for trans in &mut state.transitions {
            for t in trans.iter_mut() {
                *t += offset;
            }
        }
        for t in &mut state.epsilon_transitions {
            *t += offset;
        }
    }
    dest.extend(src);
}

fn apply_plus(fragment: &mut Fragment) {
    for &f in &fragment.finals.clone() {
        fragment.states[f].epsilon_transitions.push(fragment.initial);
    }
}

fn build(ast: &RegexAst, alphabet: &[char], counter: &mut usize) -> Fragment {
    match ast {
        RegexAst::Empty => {
            let s = fresh_state(counter, alphabet.len());
            Fragment {
                states: vec![s],
                initial: 0,
                finals: vec![],
            }
        }
        RegexAst::Lambda => {
            let s = fresh_state(counter, alphabet.len());
            Fragment {
                states: vec![s],
                initial: 0,
                finals: vec![0],
            }
        }
        RegexAst::Char(c) => {
            let mut q0 = fresh_state(counter, alphabet.len());
            let q1 = fresh_state(counter, alphabet.len());
            let pos = alphabet
                .iter()
                .position(|x| x == c)
                .expect("every AST character is in the collected alphabet");
            q0.transitions[pos].push(1);
            Fragment {
                states: vec![q0, q1],
                initial: 0,
                finals: vec![1],
            }
        }
        RegexAst::CharClass(set) => {
            let mut q0 = fresh_state(counter, alphabet.len());
            let q1 = fresh_state(counter, alphabet.len());
            for c in set {
                let pos = alphabet
                    .iter()
                    .position(|x| x == c)
                    .expect("every AST character is in the collected alphabet");
                q0.transitions[pos].push(1);
            }
            Fragment {
                states: vec![q0, q1],
                initial: 0,
                finals: vec![1],
            }
        }
        RegexAst::Concat(a, b) => {
            let mut fa = build(a, alphabet, counter);
            let fb = build(b, alphabet, counter);
            let offset = fa.states.len();
            merge_states(&mut fa.states, fb.states, offset);
            for &f in &fa.finals {
                fa.states[f].epsilon_transitions.push(offset + fb.initial);
            }
            Fragment {
                states: fa.states,
                initial: fa.initial,
                finals: fb.finals.into_iter().map(|f| f + offset).collect(),
            }
        }
        RegexAst::Union(a, b) => {
            let mut fa = build(a, alphabet, counter);
            let fb = build(b, alphabet, counter);
            let offset = fa.states.len();
            let a_initial = fa.initial;
            merge_states(&mut fa.states, fb.states, offset);

            let mut ini = fresh_state(counter, alphabet.len());
            ini.epsilon_transitions.push(a_initial);
            ini.epsilon_transitions.push(offset + fb.initial);
            let new_initial = fa.states.len();
            fa.states.push(ini);

            let mut finals = fa.finals;
            finals.extend(fb.finals.into_iter().map(|f| f + offset));
            Fragment {
                states: fa.states,
                initial: new_initial,
                finals,
            }
        }
        RegexAst::Plus(a) => {
            let mut fa = build(a, alphabet, counter);
            apply_plus(&mut fa);
            fa
        }
        RegexAst::Star(a) => {
            let mut fa = build(a, alphabet, counter);
            apply_plus(&mut fa);
            fa.finals.push(fa.initial);
            fa
        }
    }
}
