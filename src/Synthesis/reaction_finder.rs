//! Reaction assembly for one target.
//!
//! [`ReactionFinder::new`] filters the precursors mentioned together with a target and
//! classifies the remaining ones:
//! 1) metals/alloys and duplicated mentions ("copper nitrate" next to Cu(NO3)2) are dropped;
//! 2) intermediates with the same oxidation states of the elements shared with the target
//!    (e.g. CuO next to Cu(NO3)2 for a Cu(II) target) are collapsed to the first one;
//! 3) every precursor becomes either a *tool* (shares no non-water element with the target,
//!    may still act as an oxidizing or reducing agent) or a *reacting candidate*, which is
//!    further classified by the sign of its valence change: oxidized, reduced or other.
//!
//! [`ReactionFinder::reaction`] then picks a redox-consistent left side.
use crate::Synthesis::agents::{Redox, is_known_agent};
use crate::Synthesis::errors::FinderError;
use crate::Synthesis::material::MaterialComposition;
use crate::settings::FinderSettings;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Valence changes are rounded to this many decimal places before their sign is taken,
/// so a change smaller than 0.0005 counts as no change. The unrounded sum would put
/// such a precursor among the oxidized or reduced ones.
pub const FLOAT_ROUND: i32 = 3;

/// A reaction `left_side -> right_side`, without stoichiometric coefficients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionDescriptor {
    /// sorted, unique precursor formulas
    pub left_side: Vec<String>,
    pub right_side: Vec<String>,
    pub reaction_string: String,
}

impl ReactionDescriptor {
    pub fn new<I: IntoIterator<Item = String>>(left_side: I, target_formula: &str) -> Self {
        let left_side: Vec<String> = left_side
            .into_iter()
            .collect::<BTreeSet<String>>()
            .into_iter()
            .collect();
        let reaction_string = format!("{} -> {}", left_side.join(" + "), target_formula);
        ReactionDescriptor {
            left_side,
            right_side: vec![target_formula.to_string()],
            reaction_string,
        }
    }

    /// Two descriptors describe the same reaction if both sides contain the same formulas
    pub fn same_reaction(&self, other: &ReactionDescriptor) -> bool {
        let set = |v: &[String]| v.iter().cloned().collect::<BTreeSet<String>>();
        set(&self.left_side) == set(&other.left_side)
            && set(&self.right_side) == set(&other.right_side)
    }
}

/// Drops mentions that duplicate a material already written as a formula.
///
/// Materials whose text is the formula itself come first; a material mentioned by
/// name (text differs from formula) survives only if no formula-mention has the same
/// set of non-water elements.
pub fn clean_named_duplicates<'a>(
    materials: Vec<&'a MaterialComposition>,
) -> Vec<&'a MaterialComposition> {
    let (as_formula, as_name): (Vec<&MaterialComposition>, Vec<&MaterialComposition>) =
        materials.into_iter().partition(|m| m.text_matches_formula());
    let formula_elements: Vec<BTreeSet<String>> =
        as_formula.iter().map(|m| m.nh2o_elements()).collect();
    let mut cleaned = as_formula;
    cleaned.extend(
        as_name
            .into_iter()
            .filter(|m| !formula_elements.contains(&m.nh2o_elements())),
    );
    cleaned
}

/// Keeps the first material per first-fragment formula; materials without one are always kept.
pub fn dedup_by_first_formula<'a>(
    materials: Vec<&'a MaterialComposition>,
) -> Vec<&'a MaterialComposition> {
    let mut seen: HashSet<&str> = HashSet::new();
    materials
        .into_iter()
        .filter(|m| match m.first_formula() {
            Some(formula) => seen.insert(formula),
            None => true,
        })
        .collect()
}

fn round_valence(value: f64) -> f64 {
    let scale = 10f64.powi(FLOAT_ROUND);
    (value * scale).round() / scale
}

#[derive(Debug)]
pub struct ReactionFinder<'a> {
    target: &'a MaterialComposition,
    precursors: Vec<&'a MaterialComposition>,
    precursor_candidates: Vec<&'a MaterialComposition>,
    precursor_candidates_str: Vec<String>,
    precursors_tool: Vec<&'a MaterialComposition>,
    precursors_oxidized: Vec<String>,
    precursors_reduced: Vec<String>,
    precursors_other: Vec<String>,
    precursors_valence_change: BTreeMap<String, f64>,
    min_reacting_formulas: usize,
}

impl<'a> ReactionFinder<'a> {
    /// Filters and classifies the precursors of `target`.
    ///
    /// Fails with [`FinderError::StupidRecipe`] if the target is among the precursors,
    /// if nothing reacts, or if the reacting precursors do not provide every non-water
    /// element of the target.
    pub fn new(
        precursors: &'a [MaterialComposition],
        target: &'a MaterialComposition,
        settings: &FinderSettings,
    ) -> Result<Self, FinderError> {
        let mut finder = ReactionFinder {
            target,
            precursors: precursors.iter().collect(),
            precursor_candidates: Vec::new(),
            precursor_candidates_str: Vec::new(),
            precursors_tool: Vec::new(),
            precursors_oxidized: Vec::new(),
            precursors_reduced: Vec::new(),
            precursors_other: Vec::new(),
            precursors_valence_change: BTreeMap::new(),
            min_reacting_formulas: settings.min_reacting_formulas,
        };
        finder.clean_precursors();
        finder.prepare_precursors()?;
        Ok(finder)
    }

    /// Common elements of a precursor and the target, water elements excluded
    fn common_elements(&self, precursor: &MaterialComposition) -> BTreeSet<String> {
        precursor
            .nh2o_elements()
            .intersection(&self.target.nh2o_elements())
            .cloned()
            .collect()
    }

    fn clean_precursors(&mut self) {
        let not_metals: Vec<&MaterialComposition> = self
            .precursors
            .iter()
            .copied()
            .filter(|p| !p.is_metal_or_alloy())
            .collect();
        let cleaned = clean_named_duplicates(dedup_by_first_formula(not_metals));

        // intermediates like CuO next to Cu(NO3)2: keep the first precursor per set of
        // oxidation states of the common elements. Elements the solver did not assign are
        // left out of the key, so precursors without any common element (and with some
        // oxidation data) all share the empty key.
        let mut seen_keys: Vec<BTreeMap<String, f64>> = Vec::new();
        let mut final_precursors = Vec::new();
        for precursor in cleaned {
            let valence = precursor.valence_dict();
            if valence.is_empty() {
                final_precursors.push(precursor);
                continue;
            }
            let key: BTreeMap<String, f64> = self
                .common_elements(precursor)
                .into_iter()
                .filter_map(|e| valence.get(&e).map(|v| (e, *v)))
                .collect();
            if !seen_keys.contains(&key) {
                seen_keys.push(key);
                final_precursors.push(precursor);
            } else {
                debug!(
                    "dropping intermediate {} for target {}",
                    precursor.material_formula(),
                    self.target.material_formula()
                );
            }
        }
        self.precursors = final_precursors;
    }

    fn valence_change(&self, precursor: &MaterialComposition, common: &BTreeSet<String>) -> f64 {
        let target_valence = self.target.valence_dict();
        let precursor_valence = precursor.valence_dict();
        let change: f64 = common
            .iter()
            .map(|e| match (target_valence.get(e), precursor_valence.get(e)) {
                (Some(t), Some(p)) => t - p,
                _ => 0.0,
            })
            .sum();
        round_valence(change)
    }

    fn prepare_precursors(&mut self) -> Result<(), FinderError> {
        let mut seen_precursors: HashSet<&str> = HashSet::new();
        let target_elements = self.target.all_elements_dict();
        for precursor in self.precursors.clone() {
            if !seen_precursors.insert(precursor.material_formula()) {
                continue;
            }
            if precursor.all_elements_dict() == target_elements {
                return Err(FinderError::StupidRecipe(
                    "Precursor list contains target".to_string(),
                ));
            }

            if precursor.all_elements().is_empty() {
                if is_known_agent(precursor) {
                    self.precursors_tool.push(precursor);
                }
                debug!(
                    "Skipping empty precursor {}: {}",
                    precursor.material_string(),
                    precursor.material_formula()
                );
                continue;
            }

            let common = self.common_elements(precursor);
            if common.is_empty() {
                self.precursors_tool.push(precursor);
                continue;
            }

            let formula = precursor.material_formula().to_string();
            let change = self.valence_change(precursor, &common);
            self.precursor_candidates.push(precursor);
            self.precursor_candidates_str.push(formula.clone());
            if change > 0.0 {
                self.precursors_oxidized.push(formula.clone());
            } else if change < 0.0 {
                self.precursors_reduced.push(formula.clone());
            } else {
                self.precursors_other.push(formula.clone());
            }
            self.precursors_valence_change.insert(formula, change);
        }

        if self.precursor_candidates.is_empty() {
            return Err(FinderError::StupidRecipe(
                "Precursor candidates is empty".to_string(),
            ));
        }

        let provided: BTreeSet<String> = self
            .precursor_candidates
            .iter()
            .flat_map(|p| p.nh2o_elements())
            .collect();
        let missing: Vec<String> = self
            .target
            .nh2o_elements()
            .difference(&provided)
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(FinderError::StupidRecipe(format!(
                "Precursor candidates do not provide non H2O elements: {:?}",
                missing
            )));
        }
        Ok(())
    }

    /// Left side when every non-neutral candidate changes valence in one direction:
    /// an agent among the tools goes in together with all candidates; an agent among
    /// the candidates is accepted only if there are enough distinct candidates.
    fn left_side_with_agent(&self, redox: Redox) -> Vec<String> {
        let agent_tools: Vec<String> = self
            .precursors_tool
            .iter()
            .filter_map(|tool| redox.agent_name(tool))
            .collect();
        if !agent_tools.is_empty() {
            let mut lhs = agent_tools;
            lhs.extend(self.precursor_candidates_str.iter().cloned());
            return lhs;
        }
        let agent_in_candidates = self
            .precursor_candidates
            .iter()
            .any(|c| redox.material_is_agent(c));
        let distinct: HashSet<&String> = self.precursor_candidates_str.iter().collect();
        if agent_in_candidates && distinct.len() >= self.min_reacting_formulas {
            return self.precursor_candidates_str.clone();
        }
        Vec::new()
    }

    /// Builds the reaction; consumes the finder.
    ///
    /// Fails with [`FinderError::CannotFind`] when no redox-consistent left side exists.
    pub fn reaction(self) -> Result<ReactionDescriptor, FinderError> {
        let lhs = match (
            self.precursors_oxidized.is_empty(),
            self.precursors_reduced.is_empty(),
        ) {
            (true, true) => self.precursors_other.clone(),
            (true, false) => self.left_side_with_agent(Redox::Reducing),
            (false, true) => self.left_side_with_agent(Redox::Oxidizing),
            (false, false) => self.precursor_candidates_str.clone(),
        };
        if lhs.is_empty() {
            return Err(FinderError::CannotFind(
                "Cannot find the reaction".to_string(),
            ));
        }
        Ok(ReactionDescriptor::new(
            lhs,
            self.target.material_formula(),
        ))
    }

    pub fn target(&self) -> &MaterialComposition {
        self.target
    }

    /// precursors left after removal of metals, duplicates and intermediates
    pub fn precursors(&self) -> Vec<&str> {
        self.precursors.iter().map(|p| p.material_formula()).collect()
    }

    pub fn candidates(&self) -> &[String] {
        &self.precursor_candidates_str
    }

    pub fn tools(&self) -> Vec<&str> {
        self.precursors_tool
            .iter()
            .map(|p| p.material_formula())
            .collect()
    }

    pub fn oxidized(&self) -> &[String] {
        &self.precursors_oxidized
    }

    pub fn reduced(&self) -> &[String] {
        &self.precursors_reduced
    }

    pub fn other(&self) -> &[String] {
        &self.precursors_other
    }

    /// target valence minus precursor valence, summed over common elements
    pub fn valence_changes(&self) -> &BTreeMap<String, f64> {
        &self.precursors_valence_change
    }
}
