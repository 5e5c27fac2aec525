//! Oxidation-state lookup.
//!
//! The reaction finder does not solve oxidation states itself; it asks a solver
//! for the most probable assignments of a formula and uses only the first one.
//! A solver that has nothing to say returns `None`, which the finder treats as
//! "no valence change" for every element.
//!
//! Two solvers ship with the crate:
//! - [`NoOxidationData`] knows nothing and always returns `None`;
//! - [`OxidationStateTable`] answers from a user-supplied table `formula -> candidates`,
//!   e.g. precomputed by an external valence solver and stored as JSON.
//!
//! # Examples
//! ```
//! use SynthRecipe::Synthesis::valence::{OxidationStateSolver, OxidationStateTable, ValenceSolver};
//! use std::collections::HashMap;
//! let mut table = OxidationStateTable::new();
//! table.insert("Fe2O3", vec![HashMap::from([("Fe".to_string(), 3.0), ("O".to_string(), -2.0)])]);
//! let solver = ValenceSolver::from(table);
//! assert_eq!(solver.most_probable("Fe2O3").unwrap()["Fe"], 3.0);
//! assert!(solver.most_probable("FeO").is_none());
//! ```
use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// oxidation state of every element of a formula
pub type ValenceAssignment = HashMap<String, f64>;

#[enum_dispatch]
pub trait OxidationStateSolver {
    /// Candidate oxidation-state assignments for a formula, most probable first.
    /// `None` means the solver has no data or failed on this formula.
    fn oxidation_states(&self, formula: &str) -> Option<Vec<ValenceAssignment>>;

    /// first candidate, if any
    fn most_probable(&self, formula: &str) -> Option<ValenceAssignment> {
        self.oxidation_states(formula)
            .and_then(|candidates| candidates.into_iter().next())
    }
}

/// solver without any data
#[derive(Debug, Clone, Default)]
pub struct NoOxidationData;

impl OxidationStateSolver for NoOxidationData {
    fn oxidation_states(&self, _formula: &str) -> Option<Vec<ValenceAssignment>> {
        None
    }
}

/// Precomputed oxidation states keyed by formula
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OxidationStateTable {
    pub states: HashMap<String, Vec<ValenceAssignment>>,
}

impl OxidationStateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, formula: &str, candidates: Vec<ValenceAssignment>) {
        self.states.insert(formula.to_string(), candidates);
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl OxidationStateSolver for OxidationStateTable {
    fn oxidation_states(&self, formula: &str) -> Option<Vec<ValenceAssignment>> {
        match self.states.get(formula) {
            Some(candidates) if !candidates.is_empty() => Some(candidates.clone()),
            _ => None,
        }
    }
}

#[enum_dispatch(OxidationStateSolver)]
#[derive(Debug, Clone)]
pub enum ValenceSolver {
    NoData(NoOxidationData),
    Table(OxidationStateTable),
}

impl Default for ValenceSolver {
    fn default() -> Self {
        ValenceSolver::NoData(NoOxidationData)
    }
}
