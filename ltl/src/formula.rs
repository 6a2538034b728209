//! The canonical, hash-consed DAG of LTL sub-formulas (spec.md §3.1-3.2) and
//! the collector that builds it from a [`crate::parse_tree::Node`].

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::parse_tree::Node;

/// A signed formula id. Non-negative `n` names formula index `n` in the DAG;
/// negative ids denote negation via bitwise complement (`!n`, not `-n`), so
/// negation never allocates and `!!id == id`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Fid(i64);

impl Fid {
    pub const TRUE: Fid = Fid(i64::MAX);
    pub const FALSE: Fid = Fid(!i64::MAX);

    pub fn atomic(k: usize) -> Fid {
        Fid(k as i64)
    }

    pub(crate) fn from_index(i: usize) -> Fid {
        Fid(i as i64)
    }

    pub fn raw(self) -> i64 {
        self.0
    }

    pub fn is_negation(self) -> bool {
        self.0 < 0
    }

    /// The underlying non-negative index, sign stripped.
    pub fn original(self) -> usize {
        if self.is_negation() {
            (!self.0) as usize
        } else {
            self.0 as usize
        }
    }
}

impl std::ops::Not for Fid {
    type Output = Fid;
    fn not(self) -> Fid {
        Fid(!self.0)
    }
}

/// A primitive formula: one of the four kinds spec.md §3.2 allows to be
/// stored. `NOT` is never stored — it is folded into the sign of a [`Fid`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum FormulaKind {
    Atomic(usize),
    Next(Fid),
    Conj(Fid, Fid),
    Until(Fid, Fid),
}

impl FormulaKind {
    pub fn is_atomic(&self) -> bool {
        matches!(self, FormulaKind::Atomic(_))
    }

    /// `NEXT` and `UNTIL` formulas are "uncertain": their membership in an
    /// elementary set is not fixed by their operands alone.
    pub fn is_uncertain(&self) -> bool {
        matches!(self, FormulaKind::Next(_) | FormulaKind::Until(_, _))
    }

    /// `f[0]` (the left/only operand).
    pub fn lhs(&self) -> Option<Fid> {
        match self {
            FormulaKind::Atomic(_) => None,
            FormulaKind::Next(a) => Some(*a),
            FormulaKind::Conj(a, _) => Some(*a),
            FormulaKind::Until(a, _) => Some(*a),
        }
    }

    /// `f[1]` (the right operand, binary kinds only).
    pub fn rhs(&self) -> Option<Fid> {
        match self {
            FormulaKind::Conj(_, b) => Some(*b),
            FormulaKind::Until(_, b) => Some(*b),
            _ => None,
        }
    }
}

/// The flat, ordered DAG of primitive formulas: `formulas[0..num_ap)` are the
/// atomic propositions in order, everything after references only earlier
/// indices (modulo the `TRUE`/`FALSE` sentinels).
#[derive(Clone, Debug)]
pub struct Formulas {
    entries: Vec<FormulaKind>,
    num_ap: usize,
}

impl Formulas {
    pub fn num_ap(&self) -> usize {
        self.num_ap
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, i: usize) -> &FormulaKind {
        &self.entries[i]
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &FormulaKind)> {
        self.entries.iter().enumerate()
    }

    /// `debug_check_formula`: the DAG invariant from spec.md §4.1.
    /// A violation is a programmer error in the collector, not a user input
    /// error, so this fails fast rather than returning a `Result`.
    pub fn debug_check(&self) {
        debug_assert!(self.entries.len() >= self.num_ap, "invalid formula size");
        debug_assert!(self.num_ap > 0, "invalid number of atomic propositions");
        for i in 0..self.num_ap {
            debug_assert!(self.entries[i].is_atomic(), "first num_ap entries must be atomic");
        }
        let valid = |f: Fid, i: usize| f == Fid::TRUE || f == Fid::FALSE || f.original() < i;
        for i in self.num_ap..self.entries.len() {
            let f = &self.entries[i];
            debug_assert!(!f.is_atomic(), "atomic formula found past num_ap");
            debug_assert!(valid(f.lhs().unwrap(), i), "operand does not precede its user");
            if let Some(rhs) = f.rhs() {
                debug_assert!(valid(rhs, i), "operand does not precede its user");
            }
        }
    }
}

/// Recursive post-order collector: rewrites derived operators to the
/// primitive set (spec.md §3.2) and interns primitive formulas into a
/// hash-cons table keyed on `(kind, operands)`.
pub struct Collector<'a> {
    entries: Vec<FormulaKind>,
    interned: HashMap<FormulaKind, usize>,
    ap_index: &'a HashMap<String, usize>,
}

impl<'a> Collector<'a> {
    /// Build the formula DAG for `root`, resolving atomic names against
    /// `ap_index` (the AP name table shared with the transition system).
    /// Returns the DAG together with the root's id.
    pub fn collect(root: &Node, ap_index: &'a HashMap<String, usize>) -> Result<(Formulas, Fid)> {
        if ap_index.is_empty() {
            return Err(Error::NoAtomicPropositions);
        }
        let num_ap = ap_index.len();
        let mut entries = Vec::with_capacity(num_ap);
        for i in 0..num_ap {
            entries.push(FormulaKind::Atomic(i));
        }
        let mut collector = Collector {
            entries,
            interned: HashMap::new(),
            ap_index,
        };
        let root_id = collector.build(root)?;
        let formulas = Formulas {
            entries: collector.entries,
            num_ap,
        };
        formulas.debug_check();
        Ok((formulas, root_id))
    }

    fn intern(&mut self, kind: FormulaKind) -> Fid {
        debug_assert!(!kind.is_atomic(), "do not intern atomic formulas here");
        if let Some(&i) = self.interned.get(&kind) {
            return Fid::from_index(i);
        }
        let i = self.entries.len();
        self.entries.push(kind);
        self.interned.insert(kind, i);
        Fid::from_index(i)
    }

    fn conj(&mut self, a: Fid, b: Fid) -> Fid {
        let (lo, hi) = if a.raw() <= b.raw() { (a, b) } else { (b, a) };
        self.intern(FormulaKind::Conj(lo, hi))
    }

    fn until(&mut self, a: Fid, b: Fid) -> Fid {
        self.intern(FormulaKind::Until(a, b))
    }

    fn next(&mut self, a: Fid) -> Fid {
        self.intern(FormulaKind::Next(a))
    }

    fn build(&mut self, node: &Node) -> Result<Fid> {
        Ok(match node {
            Node::True => Fid::TRUE,
            Node::False => Fid::FALSE,
            Node::Atomic(name) => {
                let k = self
                    .ap_index
                    .get(name)
                    .ok_or_else(|| Error::UnknownAtomic(name.clone()))?;
                Fid::atomic(*k)
            }
            Node::Not(a) => !self.build(a)?,
            Node::Next(a) => {
                let a = self.build(a)?;
                self.next(a)
            }
            Node::Conj(a, b) => {
                let a = self.build(a)?;
                let b = self.build(b)?;
                self.conj(a, b)
            }
            // a | b == !(!a & !b)
            Node::Disj(a, b) => {
                let a = self.build(a)?;
                let b = self.build(b)?;
                !self.conj(!a, !b)
            }
            // a -> b == !(a & !b)
            Node::Impl(a, b) => {
                let a = self.build(a)?;
                let b = self.build(b)?;
                !self.conj(a, !b)
            }
            Node::Until(a, b) => {
                let a = self.build(a)?;
                let b = self.build(b)?;
                self.until(a, b)
            }
            // F a == true U a
            Node::Eventually(a) => {
                let a = self.build(a)?;
                self.until(Fid::TRUE, a)
            }
            // G a == !(true U !a)
            Node::Always(a) => {
                let a = self.build(a)?;
                !self.until(Fid::TRUE, !a)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ap(names: &[&str]) -> HashMap<String, usize> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.to_string(), i))
            .collect()
    }

    #[test]
    fn negation_is_free() {
        let id = Fid::atomic(3);
        assert_eq!(!!id, id);
        assert_eq!(!Fid::TRUE, Fid::FALSE);
        assert_eq!(!Fid::FALSE, Fid::TRUE);
    }

    #[test]
    fn atomic_formulas_come_first() {
        let names = ap(&["a", "b"]);
        let root = Node::parse("a & b").unwrap();
        let (formulas, _root) = Collector::collect(&root, &names).unwrap();
        assert!(formulas.get(0).is_atomic());
        assert!(formulas.get(1).is_atomic());
    }

    #[test]
    fn conjunction_is_hash_consed_with_canonical_order() {
        let names = ap(&["a", "b"]);
        // "a & b" and "b & a" must hash-cons to the same node, so the two
        // occurrences inside the until share one operand slot: 2 atoms + 1
        // conjunction + 1 until, not 2 atoms + 2 conjunctions + 1 until.
        let root = Node::parse("(a & b) U (b & a)").unwrap();
        let (formulas, _root_id) = Collector::collect(&root, &names).unwrap();
        assert_eq!(formulas.len(), 4);
        match formulas.get(3) {
            FormulaKind::Until(a, b) => assert_eq!(a, b),
            other => panic!("expected Until, got {:?}", other),
        }
    }

    #[test]
    fn operands_precede_their_user() {
        let names = ap(&["a", "b", "c"]);
        let root = Node::parse("F (a U (b & c))").unwrap();
        let (formulas, _) = Collector::collect(&root, &names).unwrap();
        formulas.debug_check();
    }

    #[test]
    fn unknown_atomic_is_rejected() {
        let names = ap(&["a"]);
        let root = Node::parse("b").unwrap();
        assert!(Collector::collect(&root, &names).is_err());
    }

    #[test]
    fn no_atomic_propositions_is_rejected() {
        let names = HashMap::new();
        let root = Node::True;
        assert!(matches!(
            Collector::collect(&root, &names),
            Err(Error::NoAtomicPropositions)
        ));
    }
}
