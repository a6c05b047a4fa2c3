//! Clauses: the facts recorded by one concrete run.
//!
//! A [`Clause`] pairs a program [`Location`] (and the kind of [`Instruction`]
//! found there) with a [`Predicate`]. Path-kind predicates record the outcome
//! of a decision; all other predicates are straight-line effects.
//!
//! Clauses are plain values: two clauses are the same clause iff all of their
//! parts are equal, regardless of which trace (or which position in a trace)
//! they came from. The [`ExecutionGraph`][crate::graph::ExecutionGraph] relies
//! on this to merge traces.

use std::fmt;
use std::sync::Arc;

/// A location (instruction identifier) in the instrumented program.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Location(u32);

impl Location {
    /// Creates a location with the given identifier.
    pub const fn new(id: u32) -> Self {
        Location(id)
    }

    /// Returns the raw identifier.
    pub const fn id(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

impl From<u32> for Location {
    fn from(id: u32) -> Self {
        Location(id)
    }
}

impl From<Location> for u32 {
    fn from(location: Location) -> Self {
        location.0
    }
}

/// The kind of instruction found at a clause location.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Instruction {
    /// Two-way conditional branch.
    Branch,
    /// Switch with `branches` explicit case targets and an implicit default.
    Switch { branches: usize },
    /// Dense switch over the keys `min..=max` and an implicit default.
    TableSwitch { min: i64, max: i64 },
    /// Any instruction that does not fix its number of outcomes.
    Other,
}

impl Instruction {
    /// Number of statically possible outcomes, if the instruction alone determines it.
    ///
    /// Switches count their implicit default target as one extra outcome.
    ///
    /// # Panics
    ///
    /// Panics if a table switch has `max < min`.
    pub fn outcomes(self) -> Option<usize> {
        match self {
            Instruction::Branch => Some(2),
            Instruction::Switch { branches } => Some(branches.saturating_add(1)),
            Instruction::TableSwitch { min, max } => {
                assert!(min <= max, "Table switch range {}..={} is empty", min, max);
                let keys = usize::try_from(max.abs_diff(min)).unwrap_or(usize::MAX).saturating_add(1);
                Some(keys.saturating_add(1))
            }
            Instruction::Other => None,
        }
    }
}

/// Whether a predicate records a decision or an effect.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PredicateKind {
    /// Outcome of a branch decision.
    Path,
    /// Straight-line effect (assignment, call, store, ...).
    Other,
}

/// Comparison operator.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
        };
        write!(f, "{}", s)
    }
}

/// Symbolic term appearing in a predicate.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Term {
    Var(Arc<str>),
    Int(i64),
    Bool(bool),
    Cmp(CmpOp, Box<Term>, Box<Term>),
    /// Runtime type check: `term instanceof ty`.
    InstanceOf(Box<Term>, Arc<str>),
}

impl Term {
    pub fn var(name: &str) -> Self {
        Term::Var(Arc::from(name))
    }

    pub fn int(value: i64) -> Self {
        Term::Int(value)
    }

    pub fn bool(value: bool) -> Self {
        Term::Bool(value)
    }

    pub fn cmp(op: CmpOp, lhs: Term, rhs: Term) -> Self {
        Term::Cmp(op, Box::new(lhs), Box::new(rhs))
    }

    pub fn instance_of(term: Term, ty: &str) -> Self {
        Term::InstanceOf(Box::new(term), Arc::from(ty))
    }

    pub fn is_instance_of(&self) -> bool {
        matches!(self, Term::InstanceOf(..))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Var(name) => write!(f, "{}", name),
            Term::Int(value) => write!(f, "{}", value),
            Term::Bool(value) => write!(f, "{}", value),
            Term::Cmp(op, lhs, rhs) => write!(f, "({} {} {})", lhs, op, rhs),
            Term::InstanceOf(term, ty) => write!(f, "({} instanceof {})", term, ty),
        }
    }
}

/// What a predicate says.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Payload {
    /// `lhs == rhs`
    Equality { lhs: Term, rhs: Term },
    /// `lhs != rhs`
    Inequality { lhs: Term, rhs: Term },
    /// Anything the graph does not need to look into.
    Opaque(Arc<str>),
}

impl Payload {
    pub fn equality(lhs: Term, rhs: Term) -> Self {
        Payload::Equality { lhs, rhs }
    }

    pub fn inequality(lhs: Term, rhs: Term) -> Self {
        Payload::Inequality { lhs, rhs }
    }

    pub fn opaque(text: &str) -> Self {
        Payload::Opaque(Arc::from(text))
    }

    /// Is this an equality or inequality?
    pub fn is_comparison(&self) -> bool {
        matches!(self, Payload::Equality { .. } | Payload::Inequality { .. })
    }

    /// Is this a comparison against a runtime type?
    pub fn is_type_check(&self) -> bool {
        match self {
            Payload::Equality { lhs, rhs } | Payload::Inequality { lhs, rhs } => {
                lhs.is_instance_of() || rhs.is_instance_of()
            }
            Payload::Opaque(_) => false,
        }
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Equality { lhs, rhs } => write!(f, "{} == {}", lhs, rhs),
            Payload::Inequality { lhs, rhs } => write!(f, "{} != {}", lhs, rhs),
            Payload::Opaque(text) => write!(f, "{}", text),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Predicate {
    kind: PredicateKind,
    payload: Payload,
}

impl Predicate {
    pub fn new(kind: PredicateKind, payload: Payload) -> Self {
        Self { kind, payload }
    }

    /// Predicate recording a branch outcome.
    pub fn path(payload: Payload) -> Self {
        Self::new(PredicateKind::Path, payload)
    }

    /// Predicate recording a straight-line effect.
    pub fn effect(payload: Payload) -> Self {
        Self::new(PredicateKind::Other, payload)
    }

    pub fn kind(&self) -> PredicateKind {
        self.kind
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn is_path(&self) -> bool {
        self.kind == PredicateKind::Path
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            PredicateKind::Path => write!(f, "[P] {}", self.payload),
            PredicateKind::Other => write!(f, "[E] {}", self.payload),
        }
    }
}

/// One recorded fact at one program location.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Clause {
    location: Location,
    instruction: Instruction,
    predicate: Predicate,
}

impl Clause {
    pub fn new(location: Location, instruction: Instruction, predicate: Predicate) -> Self {
        Self {
            location,
            instruction,
            predicate,
        }
    }

    /// Outcome of a two-way branch at `location`.
    pub fn branch(location: impl Into<Location>, payload: Payload) -> Self {
        Self::new(location.into(), Instruction::Branch, Predicate::path(payload))
    }

    /// Straight-line effect at `location`.
    pub fn effect(location: impl Into<Location>, payload: Payload) -> Self {
        Self::new(location.into(), Instruction::Other, Predicate::effect(payload))
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn instruction(&self) -> Instruction {
        self.instruction
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    /// Does this clause record a branch decision?
    pub fn is_path(&self) -> bool {
        self.predicate.is_path()
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.predicate)
    }
}
