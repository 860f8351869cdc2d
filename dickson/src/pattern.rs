//! Indices n for which D_n(1, x) takes exactly two values.
//!
//! For every prime p > 3 there are exactly three such indices in `0..p^2`,
//! given by the closed forms in [`Pattern`]. This module finds the indices
//! (from a table or directly from the recurrence), assigns them to the
//! patterns and checks the closed forms.
//!
//! The primes 2 and 3 are exceptions, the formulas are not checked for them.

use std::collections::{BTreeMap, BTreeSet};

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;

use crate::fit;
use crate::primes::is_twin_prime;
use crate::rings::Fp;
use crate::sequence::{Sweep, ValueSet, value_set};
use crate::table::Record;

/// The cardinality-2 indices of each prime, in increasing order.
pub type IndexMap = BTreeMap<u64, Vec<u64>>;

/// A closed form for an index with a two-element value set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Pattern {
    /// `n = (p^2 + 1)/2` with values `{1, p - 1}`.
    HalfSquarePlusOne,
    /// `n = p^2 - 1` with values `{1, 2}`.
    SquareMinusOne,
    /// `n = (p^2 + 2p - 1)/2` with values `{1, p - 1}`.
    HalfSquarePlusTwoP,
}

impl Pattern {
    pub const ALL: [Pattern; 3] = [
        Pattern::HalfSquarePlusOne,
        Pattern::SquareMinusOne,
        Pattern::HalfSquarePlusTwoP,
    ];

    /// The number the pattern is reported under.
    pub fn number(self) -> usize {
        match self {
            Pattern::HalfSquarePlusOne => 1,
            Pattern::SquareMinusOne => 2,
            Pattern::HalfSquarePlusTwoP => 3,
        }
    }

    /// The index for the prime `p`.
    pub fn index(self, p: u64) -> u64 {
        match self {
            Pattern::HalfSquarePlusOne => (p * p + 1) / 2,
            Pattern::SquareMinusOne => p * p - 1,
            Pattern::HalfSquarePlusTwoP => (p * p + 2 * p - 1) / 2,
        }
    }

    /// The value set at [`Pattern::index`].
    pub fn expected_values(self, p: u64) -> BTreeSet<u64> {
        match self {
            Pattern::SquareMinusOne => BTreeSet::from([1, 2]),
            _ => BTreeSet::from([1, p - 1]),
        }
    }

    pub fn formula(self) -> &'static str {
        match self {
            Pattern::HalfSquarePlusOne => "(p^2 + 1)/2",
            Pattern::SquareMinusOne => "p^2 - 1",
            Pattern::HalfSquarePlusTwoP => "(p^2 + 2p - 1)/2",
        }
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Pattern {}: n = {}", self.number(), self.formula())
    }
}

/// Do the closed forms apply to `p`?
pub fn general_case(p: u64) -> bool {
    p > 3
}

/// Groups the indices of the records with exactly two values by prime.
pub fn cardinality_two_indices(records: &[Record]) -> IndexMap {
    let mut map = IndexMap::new();
    for r in records.iter().filter(|r| r.value_count == 2) {
        map.entry(r.p).or_insert_with(Vec::new).push(r.n);
    }
    for ns in map.values_mut() {
        ns.sort_unstable();
        ns.dedup();
    }
    map
}

/// Computes the indices in `0..p^2` with exactly two values directly.
pub fn exhaustive_cardinality_two(r: &Fp) -> Vec<u64> {
    let end = r.modulus() * r.modulus();
    Sweep::new(r)
        .take_while(|vs| vs.n() < end)
        .filter(|vs| vs.cardinality() == 2)
        .map(|vs| vs.n())
        .collect()
}

/// What an index was classified as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Label {
    Pattern(Pattern),
    /// Matched no rule.
    Residual,
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::Pattern(pattern) => pattern.fmt(f),
            Label::Residual => f.write_str("Residual"),
        }
    }
}

struct Rule {
    label: Label,
    matches: Box<dyn Fn(u64, u64) -> bool + Send + Sync>,
}

impl Rule {
    fn new(
        pattern: Pattern,
        matches: impl Fn(u64, u64) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self { label: Label::Pattern(pattern), matches: Box::new(matches) }
    }
}

fn make_rules() -> Vec<Rule> {
    vec![
        Rule::new(Pattern::HalfSquarePlusOne, |p, n| {
            n == Pattern::HalfSquarePlusOne.index(p)
        }),
        // Any positive multiple of (p^2 - 1)/2, not just p^2 - 1 itself.
        Rule::new(Pattern::SquareMinusOne, |p, n| {
            let base = (p * p - 1) / 2;
            base > 0 && n > 0 && Integer::is_multiple_of(&n, &base)
        }),
        Rule::new(Pattern::HalfSquarePlusTwoP, |p, n| {
            n == Pattern::HalfSquarePlusTwoP.index(p)
        }),
    ]
}

lazy_static::lazy_static! {
    /// The classification rules in priority order.
    static ref RULES: Vec<Rule> = make_rules();
}

/// Classifies the cardinality-2 indices of the prime `p`.
///
/// The rules are tried in the order of [`Pattern::ALL`] and each rule claims
/// at most one index, the smallest unclaimed one it matches. Everything that
/// is left over is [`Label::Residual`].
pub fn classify(p: u64, indices: &[u64]) -> Vec<(u64, Label)> {
    let mut labels = vec![Label::Residual; indices.len()];
    for rule in RULES.iter() {
        let claimed = indices.iter().enumerate().position(|(i, &n)| {
            labels[i] == Label::Residual && (rule.matches)(p, n)
        });
        if let Some(i) = claimed {
            labels[i] = rule.label;
        }
    }
    indices.iter().copied().zip(labels).collect()
}

/// The value set at a pattern's index compared to the expected one.
#[derive(Clone, Debug)]
pub struct IndexCheck {
    pub pattern: Pattern,
    pub actual: ValueSet,
    pub expected: BTreeSet<u64>,
}

impl IndexCheck {
    pub fn passed(&self) -> bool {
        self.actual.values() == &self.expected
    }
}

/// Computes the value sets at the three pattern indices.
/// Returns `None` for `p <= 3`.
pub fn verify_value_sets(r: &Fp) -> Option<Vec<IndexCheck>> {
    let p = r.modulus();
    if !general_case(p) {
        return None;
    }

    let checks = Pattern::ALL
        .iter()
        .map(|&pattern| IndexCheck {
            pattern,
            actual: value_set(pattern.index(p), r),
            expected: pattern.expected_values(p),
        })
        .collect();

    Some(checks)
}

/// The observed indices of a prime disagree with the closed forms.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mismatch {
    pub p: u64,
    pub actual: Vec<u64>,
    pub expected: Vec<u64>,
}

/// How well a closed form predicts the index it was matched with.
#[derive(Clone, Debug)]
pub struct PatternAccuracy {
    pub pattern: Pattern,
    /// The number of primes where an index was matched with the pattern.
    pub pairs: usize,
    /// The mean of the squared differences, exactly.
    pub mean_square: BigRational,
}

impl PatternAccuracy {
    pub fn rmse(&self) -> f64 {
        fit::rmse(&self.mean_square)
    }
}

/// The result of [`verify_formulas`].
#[derive(Clone, Debug)]
pub struct FormulaReport {
    pub primes_checked: usize,
    pub mismatches: Vec<Mismatch>,
    pub accuracy: Vec<PatternAccuracy>,
}

impl FormulaReport {
    /// Do the closed forms reproduce the data exactly?
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
            && self.accuracy.iter().all(|a| num_traits::Zero::is_zero(&a.mean_square))
    }
}

/// Compares the observed cardinality-2 indices of every prime `p > 3` with
/// the three closed forms.
///
/// Each index the classifier assigns to a pattern is paired with the
/// pattern's prediction for the accuracy figures.
pub fn verify_formulas(groups: &IndexMap) -> FormulaReport {
    let mut mismatches = Vec::new();
    let mut residuals: BTreeMap<Pattern, Vec<BigRational>> = Pattern::ALL
        .iter()
        .map(|&pattern| (pattern, Vec::new()))
        .collect();
    let mut primes_checked = 0;

    for (&p, ns) in groups.iter().filter(|&(&p, _)| general_case(p)) {
        primes_checked += 1;

        let expected: BTreeSet<u64> = Pattern::ALL.iter().map(|pat| pat.index(p)).collect();
        let actual: BTreeSet<u64> = ns.iter().copied().collect();
        if actual != expected {
            mismatches.push(Mismatch {
                p,
                actual: actual.into_iter().collect(),
                expected: expected.into_iter().collect(),
            });
        }

        for (n, label) in classify(p, ns) {
            if let Label::Pattern(pattern) = label {
                let d = BigInt::from(n) - BigInt::from(pattern.index(p));
                residuals.entry(pattern).or_default().push(d.into());
            }
        }
    }

    let accuracy = residuals
        .into_iter()
        .map(|(pattern, r)| PatternAccuracy {
            pattern,
            pairs: r.len(),
            mean_square: fit::mean_square(&r),
        })
        .collect();

    FormulaReport { primes_checked, mismatches, accuracy }
}

/// The result of [`check_patterns`] for one prime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternCheck {
    pub p: u64,
    pub observed: Vec<u64>,
    /// Whether `(p^2 + 1)/2` was observed, `None` if it is not checked.
    pub half_square_plus_one: Option<bool>,
    /// The first positive multiple `k * (p^2 - 1)/2` that was observed, as
    /// `(n, k)`.
    pub multiple: Option<(u64, u64)>,
}

/// Checks for every prime whether `(p^2 + 1)/2` and some multiple of
/// `(p^2 - 1)/2` are among the observed indices.
pub fn check_patterns(groups: &IndexMap) -> Vec<PatternCheck> {
    groups
        .iter()
        .map(|(&p, ns)| {
            let half_square_plus_one = general_case(p)
                .then(|| ns.contains(&Pattern::HalfSquarePlusOne.index(p)));
            let base = (p * p - 1) / 2;
            let multiple = ns
                .iter()
                .find(|&&n| base > 0 && n > 0 && Integer::is_multiple_of(&n, &base))
                .map(|&n| (n, n / base));
            PatternCheck { p, observed: ns.clone(), half_square_plus_one, multiple }
        })
        .collect()
}

/// Whether an index is a multiple of `p + 1` and `p - 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Divisibility {
    pub p_plus_one: bool,
    pub p_minus_one: bool,
}

pub fn divisibility(p: u64, n: u64) -> Divisibility {
    Divisibility {
        p_plus_one: Integer::is_multiple_of(&n, &(p + 1)),
        p_minus_one: p > 1 && Integer::is_multiple_of(&n, &(p - 1)),
    }
}

/// The indices that are left after removing the ones matched to patterns 1
/// and 2. Primes without leftovers are omitted.
///
/// With `non_twin_only`, twin primes are skipped as well.
pub fn residual_indices(groups: &IndexMap, non_twin_only: bool) -> IndexMap {
    groups
        .iter()
        .filter(|&(&p, _)| !non_twin_only || !is_twin_prime(p))
        .filter_map(|(&p, ns)| {
            let rest: Vec<u64> = classify(p, ns)
                .into_iter()
                .filter(|(_, label)| !matches!(
                    label,
                    Label::Pattern(Pattern::HalfSquarePlusOne | Pattern::SquareMinusOne)
                ))
                .map(|(n, _)| n)
                .collect();
            (!rest.is_empty()).then_some((p, rest))
        })
        .collect()
}

/// A guess for the residual index, `(p^2 - p + 2)/2`.
pub fn residual_hypothesis(p: u64) -> u64 {
    (p * p - p + 2) / 2
}
