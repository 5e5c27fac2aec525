//! Batch driver: from the raw records of one synthesis paragraph to a list of reactions.
//!
//! Targets with element variables (e.g. `M` in `MTiO3` with `M ∈ {Ba, Sr}`) are expanded
//! into one concrete target per substituent. Precursors that are in fact one of the
//! targets (intermediates) are dropped, duplicated targets are cleaned, and every
//! remaining target gets its own [`ReactionFinder`]. Failures are per target: a
//! target that cannot be explained is logged and skipped.
use crate::Synthesis::errors::FinderError;
use crate::Synthesis::material::{MaterialComposition, MaterialRecord};
use crate::Synthesis::reaction_finder::{
    ReactionDescriptor, ReactionFinder, clean_named_duplicates, dedup_by_first_formula,
};
use crate::Synthesis::valence::{OxidationStateSolver, ValenceSolver};
use crate::settings::FinderSettings;
use log::{debug, info, warn};
use prettytable::{Cell, Row, Table};
use regex::Regex;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::LazyLock;

// "(s)", "(aq)" and similar annotations mark phases or solutions, not targets
static ANNOTATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(([a-z]+)\)").expect("annotation pattern is a valid regex")
});

/// a target record together with the element substitution that makes it concrete
pub type TargetExpansion<'a> = (&'a MaterialRecord, Option<HashMap<String, String>>);

/// Expands every target with element variables into one pair per variable and substituent.
/// Targets without variables (or whose declared variables don't occur) give a single pair
/// with no substitution.
pub fn expand_targets(targets: &[MaterialRecord]) -> Vec<TargetExpansion<'_>> {
    let mut expanded = Vec::new();
    for target in targets {
        let used = target.element_vars_used();
        if used.is_empty() {
            expanded.push((target, None));
            continue;
        }
        for variable in used {
            for substituent in &target.elements_vars[&variable] {
                let substitution = HashMap::from([(variable.clone(), substituent.clone())]);
                expanded.push((target, Some(substitution)));
            }
        }
    }
    expanded
}

/// Removes annotated, empty and duplicated targets.
///
/// 1) targets whose text carries a parenthesized lowercase annotation are dropped;
/// 2) targets whose first fragment has no elements are dropped;
/// 3) the first target per first-fragment formula is kept;
/// 4) targets mentioned by name are dropped when a formula-mention has the same non-water elements;
/// 5) of the remaining name-mentions, the first one per set of non-water elements is kept.
pub fn clean_targets(targets: &[MaterialComposition]) -> Vec<&MaterialComposition> {
    let kept: Vec<&MaterialComposition> = targets
        .iter()
        .filter(|t| !ANNOTATION.is_match(t.material_string()))
        .filter(|t| match t.first_component() {
            Some(component) => !component.elements.is_empty(),
            None => true,
        })
        .collect();
    let mut named_elements: Vec<BTreeSet<String>> = Vec::new();
    clean_named_duplicates(dedup_by_first_formula(kept))
        .into_iter()
        .filter(|t| {
            if t.text_matches_formula() {
                return true;
            }
            let elements = t.nh2o_elements();
            if named_elements.contains(&elements) {
                debug!("dropping target {}: same elements as an earlier name", t.material_string());
                return false;
            }
            named_elements.push(elements);
            true
        })
        .collect()
}

/// Finds reactions for every target of a paragraph.
///
/// Returns at most one reaction per target, without repetitions (same sets of
/// precursors and targets). A paragraph expanding to `settings.max_targets` targets
/// or more is considered too ambiguous and yields nothing.
pub fn balance_recipe<S: OxidationStateSolver + ?Sized>(
    precursors: &[MaterialRecord],
    targets: &[MaterialRecord],
    solver: &S,
    settings: &FinderSettings,
) -> Vec<ReactionDescriptor> {
    let mut solutions: Vec<ReactionDescriptor> = Vec::new();

    let targets_to_balance = expand_targets(targets);
    if targets_to_balance.len() >= settings.max_targets {
        info!(
            "{} targets after expansion of element variables, giving up",
            targets_to_balance.len()
        );
        return solutions;
    }

    let mut target_objects = Vec::new();
    let mut target_strings: HashSet<String> = HashSet::new();
    for (target, substitution) in targets_to_balance {
        match MaterialComposition::from_record(target, substitution.as_ref(), solver) {
            Ok(material) => {
                target_objects.push(material);
                target_strings.insert(target.material_string.clone());
                target_strings.insert(target.material_formula.clone());
                target_strings.extend(
                    target
                        .composition
                        .iter()
                        .filter_map(|c| c.formula.clone())
                        .filter(|f| !f.is_empty()),
                );
            }
            Err(e) => warn!("skipping target {}: {}", target.material_string, e),
        }
    }

    let mut precursor_objects = Vec::new();
    for precursor in precursors {
        if is_intermediate(precursor, &target_strings) {
            debug!("skipping intermediate precursor {}", precursor.material_string);
            continue;
        }
        match MaterialComposition::from_record(precursor, None, solver) {
            Ok(material) => precursor_objects.push(material),
            Err(e) => warn!("skipping precursor {}: {}", precursor.material_string, e),
        }
    }

    for target in clean_targets(&target_objects) {
        match find_reaction(&precursor_objects, target, settings) {
            Ok(solution) => {
                if !solutions.iter().any(|s| s.same_reaction(&solution)) {
                    solutions.push(solution);
                }
            }
            Err(e) => info!("no reaction for {}: {}", target.material_formula(), e),
        }
    }
    solutions
}

/// [`balance_recipe`] without oxidation-state data and with default thresholds
pub fn balance_recipe_with_defaults(
    precursors: &[MaterialRecord],
    targets: &[MaterialRecord],
) -> Vec<ReactionDescriptor> {
    balance_recipe(
        precursors,
        targets,
        &ValenceSolver::default(),
        &FinderSettings::default(),
    )
}

fn find_reaction(
    precursors: &[MaterialComposition],
    target: &MaterialComposition,
    settings: &FinderSettings,
) -> Result<ReactionDescriptor, FinderError> {
    ReactionFinder::new(precursors, target, settings)?.reaction()
}

fn is_intermediate(precursor: &MaterialRecord, target_strings: &HashSet<String>) -> bool {
    if target_strings.contains(&precursor.material_string) {
        return true;
    }
    if !precursor.material_formula.is_empty() && target_strings.contains(&precursor.material_formula) {
        return true;
    }
    precursor
        .composition
        .first()
        .and_then(|c| c.formula.as_ref())
        .is_some_and(|f| !f.is_empty() && target_strings.contains(f))
}

/// prints the reactions as a table
pub fn print_reactions(reactions: &[ReactionDescriptor]) {
    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("#"),
        Cell::new("precursors"),
        Cell::new("target"),
        Cell::new("reaction"),
    ]));
    for (i, reaction) in reactions.iter().enumerate() {
        table.add_row(Row::new(vec![
            Cell::new(&(i + 1).to_string()),
            Cell::new(&reaction.left_side.join(", ")),
            Cell::new(&reaction.right_side.join(", ")),
            Cell::new(&reaction.reaction_string),
        ]));
    }
    table.printstd();
}
