//! Composition model of a material mentioned in a synthesis paragraph.
//!
//! A raw record comes from a text-mining pipeline: the original text excerpt
//! (`material_string`), a human-readable formula (`material_formula`, e.g. `FeCl3·6H2O`)
//! and a list of formula fragments with per-element amounts. [`MaterialComposition`]
//! aggregates the fragments into exact per-element and per-species amounts, split
//! along the "released as crystal water" boundary, and fetches a best-guess
//! oxidation-state assignment from an [`OxidationStateSolver`].
use crate::Synthesis::amount::Amount;
use crate::Synthesis::errors::FinderError;
use crate::Synthesis::periodic_table::{
    is_element, is_h2o_element, is_h2o_species, is_volatile_element,
};
use crate::Synthesis::valence::{OxidationStateSolver, ValenceAssignment};
use log::debug;
use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

/// One formula fragment of a composition, e.g. `FeCl3` and `H2O` for `FeCl3·6H2O`
/// Keys other than the four below (`phase`, ...) are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawComponent {
    #[serde(default)]
    pub formula: Option<String>,
    /// molar amount of the fragment
    #[serde(deserialize_with = "amount_string")]
    pub amount: String,
    #[serde(deserialize_with = "amount_map")]
    pub elements: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "optional_amount_map")]
    pub species: Option<BTreeMap<String, String>>,
}

impl RawComponent {
    pub fn new(formula: Option<&str>, amount: &str, elements: &[(&str, &str)]) -> Self {
        RawComponent {
            formula: formula.map(|f| f.to_string()),
            amount: amount.to_string(),
            elements: elements
                .iter()
                .map(|(e, a)| (e.to_string(), a.to_string()))
                .collect(),
            species: None,
        }
    }

    pub fn with_species(mut self, species: &[(&str, &str)]) -> Self {
        self.species = Some(
            species
                .iter()
                .map(|(s, a)| (s.to_string(), a.to_string()))
                .collect(),
        );
        self
    }
}

/// A material record as produced by the text-mining pipeline. Keys the reaction
/// finder does not use (`material_name`, `phase`, `additives`, ...) are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRecord {
    pub material_string: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub material_formula: String,
    #[serde(default)]
    pub composition: Vec<RawComponent>,
    #[serde(default)]
    pub amounts_vars: BTreeMap<String, Value>,
    /// element variable -> allowed substituents, e.g. `{"M": ["Ba", "Sr"]}`
    #[serde(default)]
    pub elements_vars: BTreeMap<String, Vec<String>>,
}

impl MaterialRecord {
    pub fn new(material_string: &str, material_formula: &str, composition: Vec<RawComponent>) -> Self {
        MaterialRecord {
            material_string: material_string.to_string(),
            material_formula: material_formula.to_string(),
            composition,
            amounts_vars: BTreeMap::new(),
            elements_vars: BTreeMap::new(),
        }
    }

    pub fn with_element_var(mut self, variable: &str, substituents: &[&str]) -> Self {
        self.elements_vars.insert(
            variable.to_string(),
            substituents.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    /// element symbols (before substitution) used anywhere in the composition
    pub fn composition_elements(&self) -> BTreeSet<String> {
        self.composition
            .iter()
            .flat_map(|c| c.elements.keys().cloned())
            .collect()
    }

    /// declared element variables that actually occur in the composition
    pub fn element_vars_used(&self) -> BTreeSet<String> {
        let elements = self.composition_elements();
        self.elements_vars
            .keys()
            .filter(|var| elements.contains(*var))
            .cloned()
            .collect()
    }
}

/// Composition of a material, aggregated over all of its fragments.
///
/// Built once, never mutated afterwards.
#[derive(Debug, Clone)]
pub struct MaterialComposition {
    material_string: String,
    material_formula: String,
    composition: Vec<RawComponent>,
    substitution: HashMap<String, String>,
    volatile_elements: BTreeMap<String, Amount>,
    non_h2o_elements: BTreeMap<String, Amount>,
    h2o_elements: BTreeMap<String, Amount>,
    non_h2o_species: BTreeMap<String, Amount>,
    h2o_species: BTreeMap<String, Amount>,
    valence: ValenceAssignment,
}

fn accumulate(
    map: &mut BTreeMap<String, Amount>,
    key: &str,
    value: Amount,
) -> Result<(), FinderError> {
    match map.get_mut(key) {
        Some(total) => *total = total.checked_add(&value)?,
        None => {
            map.insert(key.to_string(), value);
        }
    }
    Ok(())
}

fn parse_amount(text: &str, what: &str) -> Result<Amount, FinderError> {
    Amount::parse(text).map_err(|e| {
        FinderError::Formula(format!("cannot parse {}: {} ({})", what, text, e))
    })
}

impl MaterialComposition {
    /// Aggregates the fragments of a material.
    ///
    /// `substitution` remaps element symbols before aggregation, which instantiates a
    /// variable site such as `M` in `MTiO3`. Fails with [`FinderError::Formula`] when an
    /// amount cannot be parsed or a (substituted) element symbol is unknown. Failed
    /// oxidation-state lookups are not errors: the valence map just stays incomplete.
    pub fn new<S: OxidationStateSolver + ?Sized>(
        material_string: &str,
        material_formula: &str,
        composition: Vec<RawComponent>,
        substitution: Option<&HashMap<String, String>>,
        solver: &S,
    ) -> Result<Self, FinderError> {
        let mut material = MaterialComposition {
            material_string: material_string.to_string(),
            material_formula: material_formula.to_string(),
            composition,
            substitution: substitution.cloned().unwrap_or_default(),
            volatile_elements: BTreeMap::new(),
            non_h2o_elements: BTreeMap::new(),
            h2o_elements: BTreeMap::new(),
            non_h2o_species: BTreeMap::new(),
            h2o_species: BTreeMap::new(),
            valence: HashMap::new(),
        };
        material.parse(solver)?;
        Ok(material)
    }

    pub fn from_record<S: OxidationStateSolver + ?Sized>(
        record: &MaterialRecord,
        substitution: Option<&HashMap<String, String>>,
        solver: &S,
    ) -> Result<Self, FinderError> {
        Self::new(
            &record.material_string,
            &record.material_formula,
            record.composition.clone(),
            substitution,
            solver,
        )
    }

    fn parse<S: OxidationStateSolver + ?Sized>(&mut self, solver: &S) -> Result<(), FinderError> {
        for component in &self.composition {
            let fraction = parse_amount(&component.amount, "component molar fraction")?;

            if let Some(formula) = component.formula.as_deref().filter(|f| !f.is_empty()) {
                match solver.most_probable(formula) {
                    Some(states) => {
                        for (element, state) in states {
                            self.valence.entry(element).or_insert(state);
                        }
                    }
                    None => debug!("no oxidation states for {}", formula),
                }
            }

            for (element, amount_s) in &component.elements {
                let element = self
                    .substitution
                    .get(element)
                    .map(|s| s.as_str())
                    .unwrap_or(element.as_str());
                let amount = parse_amount(amount_s, "element amount")?;
                if !is_element(element) {
                    return Err(FinderError::Formula(format!(
                        "{} is not a valid chemical element",
                        element
                    )));
                }
                let total = fraction.checked_mul(&amount)?;
                if is_h2o_element(element) {
                    accumulate(&mut self.h2o_elements, element, total.clone())?;
                } else {
                    accumulate(&mut self.non_h2o_elements, element, total.clone())?;
                }
                if is_volatile_element(element) {
                    accumulate(&mut self.volatile_elements, element, total)?;
                }
            }

            if let Some(species) = &component.species {
                for (name, amount_s) in species {
                    let amount = parse_amount(amount_s, "species amount")?;
                    if name.is_empty() {
                        continue;
                    }
                    let total = fraction.checked_mul(&amount)?;
                    if is_h2o_species(name) {
                        accumulate(&mut self.h2o_species, name, total)?;
                    } else {
                        accumulate(&mut self.non_h2o_species, name, total)?;
                    }
                }
            }
        }
        Ok(())
    }

    pub fn material_string(&self) -> &str {
        &self.material_string
    }

    pub fn material_formula(&self) -> &str {
        &self.material_formula
    }

    pub fn composition(&self) -> &[RawComponent] {
        &self.composition
    }

    pub fn substitution(&self) -> &HashMap<String, String> {
        &self.substitution
    }

    pub fn first_component(&self) -> Option<&RawComponent> {
        self.composition.first()
    }

    /// non-empty formula of the first fragment
    pub fn first_formula(&self) -> Option<&str> {
        self.first_component()
            .and_then(|c| c.formula.as_deref())
            .filter(|f| !f.is_empty())
    }

    /// true when the text excerpt is the formula itself, e.g. "Fe2O3", and not a name like "iron oxide"
    pub fn text_matches_formula(&self) -> bool {
        self.material_formula.replace(' ', "")
            == self.material_string.replace(' ', "").replace('@', "")
    }

    pub fn v_elements_dict(&self) -> &BTreeMap<String, Amount> {
        &self.volatile_elements
    }

    pub fn v_elements(&self) -> BTreeSet<String> {
        self.volatile_elements.keys().cloned().collect()
    }

    /// A material that releases nothing with crystal water is treated as a metal or alloy.
    pub fn is_metal_or_alloy(&self) -> bool {
        self.h2o_elements.is_empty()
    }

    pub fn nh2o_elements_dict(&self) -> &BTreeMap<String, Amount> {
        &self.non_h2o_elements
    }

    pub fn nh2o_elements(&self) -> BTreeSet<String> {
        self.non_h2o_elements.keys().cloned().collect()
    }

    pub fn h2o_elements_dict(&self) -> &BTreeMap<String, Amount> {
        &self.h2o_elements
    }

    pub fn h2o_elements(&self) -> BTreeSet<String> {
        self.h2o_elements.keys().cloned().collect()
    }

    pub fn all_elements_dict(&self) -> BTreeMap<String, Amount> {
        let mut all = self.non_h2o_elements.clone();
        all.extend(self.h2o_elements.clone());
        all
    }

    pub fn all_elements(&self) -> BTreeSet<String> {
        self.non_h2o_elements
            .keys()
            .chain(self.h2o_elements.keys())
            .cloned()
            .collect()
    }

    pub fn nh2o_species_dict(&self) -> &BTreeMap<String, Amount> {
        &self.non_h2o_species
    }

    pub fn nh2o_species(&self) -> BTreeSet<String> {
        self.non_h2o_species.keys().cloned().collect()
    }

    pub fn h2o_species_dict(&self) -> &BTreeMap<String, Amount> {
        &self.h2o_species
    }

    pub fn h2o_species(&self) -> BTreeSet<String> {
        self.h2o_species.keys().cloned().collect()
    }

    pub fn all_species_dict(&self) -> BTreeMap<String, Amount> {
        let mut all = self.non_h2o_species.clone();
        all.extend(self.h2o_species.clone());
        all
    }

    pub fn all_species(&self) -> BTreeSet<String> {
        self.non_h2o_species
            .keys()
            .chain(self.h2o_species.keys())
            .cloned()
            .collect()
    }

    /// best-effort oxidation states, empty when the solver had no data
    pub fn valence_dict(&self) -> &ValenceAssignment {
        &self.valence
    }
}

impl fmt::Display for MaterialComposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<MaterialComposition for {}>", self.material_formula)
    }
}

/////////////////////////////SERDE HELPERS//////////////////////////////////////////////
// amounts come either as strings ("1-x") or as plain JSON numbers (6, 0.5)
#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Str(String),
    Int(i64),
    Float(f64),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> String {
        match value {
            StringOrNumber::Str(s) => s,
            StringOrNumber::Int(i) => i.to_string(),
            StringOrNumber::Float(x) => x.to_string(),
        }
    }
}

fn amount_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(StringOrNumber::deserialize(deserializer)?.into())
}

fn amount_map<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<String, String>, D::Error> {
    let raw = BTreeMap::<String, StringOrNumber>::deserialize(deserializer)?;
    Ok(raw.into_iter().map(|(k, v)| (k, v.into())).collect())
}

fn optional_amount_map<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<BTreeMap<String, String>>, D::Error> {
    let raw = Option::<BTreeMap<String, StringOrNumber>>::deserialize(deserializer)?;
    Ok(raw.map(|m| m.into_iter().map(|(k, v)| (k, v.into())).collect()))
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Synthesis::valence::{NoOxidationData, OxidationStateTable};
    use approx::assert_relative_eq;
    use serde_json::json;

    fn fecl3_hydrate() -> Vec<RawComponent> {
        vec![
            RawComponent::new(Some("FeCl3"), "1", &[("Fe", "1"), ("Cl", "3")])
                .with_species(&[("Fe", "1"), ("Cl", "3")]),
            RawComponent::new(Some("H2O"), "6", &[("H", "2"), ("O", "1")])
                .with_species(&[("H2O", "1")]),
        ]
    }

    #[test]
    fn test_hydrate_is_split_along_water_boundary() {
        let m = MaterialComposition::new(
            "FeCl3·6H2O",
            "FeCl3·6H2O",
            fecl3_hydrate(),
            None,
            &NoOxidationData,
        )
        .unwrap();
        assert_eq!(m.nh2o_elements(), BTreeSet::from(["Cl".to_string(), "Fe".to_string()]));
        assert_eq!(m.h2o_elements(), BTreeSet::from(["H".to_string(), "O".to_string()]));
        assert_eq!(m.h2o_elements_dict()["H"], Amount::integer(12));
        assert_eq!(m.h2o_elements_dict()["O"], Amount::integer(6));
        assert_eq!(m.nh2o_elements_dict()["Cl"], Amount::integer(3));
        assert_eq!(m.all_elements().len(), 4);
        assert_eq!(m.v_elements(), BTreeSet::from(["H".to_string(), "O".to_string()]));
        assert_eq!(m.h2o_species(), BTreeSet::from(["H2O".to_string()]));
        assert_eq!(m.h2o_species_dict()["H2O"], Amount::integer(6));
        assert_eq!(m.nh2o_species().len(), 2);
        assert_eq!(m.all_species().len(), 3);
        assert!(!m.is_metal_or_alloy());
        assert!(m.valence_dict().is_empty());
        assert!(m.text_matches_formula());
        assert_eq!(m.first_formula(), Some("FeCl3"));
        assert_eq!(m.to_string(), "<MaterialComposition for FeCl3·6H2O>");
    }

    #[test]
    fn test_anhydrous_salt_counts_as_metal_or_alloy() {
        let comp = vec![RawComponent::new(Some("NaCl"), "1", &[("Na", "1"), ("Cl", "1")])];
        let m = MaterialComposition::new("NaCl", "NaCl", comp, None, &NoOxidationData).unwrap();
        assert!(m.is_metal_or_alloy());
    }

    #[test]
    fn test_variable_amounts_are_summed_exactly() {
        let comp = vec![
            RawComponent::new(Some("BaTiO3"), "1-x", &[("Ba", "1"), ("Ti", "1"), ("O", "3")]),
            RawComponent::new(Some("SrTiO3"), "x", &[("Sr", "1"), ("Ti", "1"), ("O", "3")]),
        ];
        let m = MaterialComposition::new(
            "Ba1-xSrxTiO3",
            "Ba1-xSrxTiO3",
            comp,
            None,
            &NoOxidationData,
        )
        .unwrap();
        assert_eq!(m.nh2o_elements_dict()["Ti"], Amount::integer(1));
        assert_eq!(m.h2o_elements_dict()["O"], Amount::integer(3));
        assert_eq!(m.nh2o_elements_dict()["Ba"], Amount::parse("1-x").unwrap());
    }

    #[test]
    fn test_substitution_instantiates_variable_site() {
        let comp = vec![RawComponent::new(Some("MTiO3"), "1", &[("M", "1"), ("Ti", "1"), ("O", "3")])];
        let sub = HashMap::from([("M".to_string(), "Sr".to_string())]);
        let m = MaterialComposition::new("MTiO3", "MTiO3", comp.clone(), Some(&sub), &NoOxidationData)
            .unwrap();
        assert!(m.nh2o_elements().contains("Sr"));
        assert!(!m.nh2o_elements().contains("M"));
        assert_eq!(m.substitution()["M"], "Sr");

        let err = MaterialComposition::new("MTiO3", "MTiO3", comp, None, &NoOxidationData).unwrap_err();
        assert_eq!(
            err,
            FinderError::Formula("M is not a valid chemical element".to_string())
        );
    }

    #[test]
    fn test_unparseable_amounts_fail() {
        let bad_fraction = vec![RawComponent::new(Some("CuO"), "1/", &[("Cu", "1"), ("O", "1")])];
        assert!(matches!(
            MaterialComposition::new("CuO", "CuO", bad_fraction, None, &NoOxidationData),
            Err(FinderError::Formula(_))
        ));
        let bad_element = vec![RawComponent::new(Some("CuO"), "1", &[("Cu", "1)"), ("O", "1")])];
        assert!(matches!(
            MaterialComposition::new("CuO", "CuO", bad_element, None, &NoOxidationData),
            Err(FinderError::Formula(_))
        ));
    }

    #[test]
    fn test_valence_merges_first_candidate_per_fragment() {
        let mut table = OxidationStateTable::new();
        table.insert(
            "FeCl3",
            vec![
                HashMap::from([("Fe".to_string(), 3.0), ("Cl".to_string(), -1.0)]),
                HashMap::from([("Fe".to_string(), 2.0), ("Cl".to_string(), -1.0)]),
            ],
        );
        table.insert(
            "H2O",
            vec![HashMap::from([("H".to_string(), 1.0), ("O".to_string(), -2.0)])],
        );
        let m = MaterialComposition::new("FeCl3·6H2O", "FeCl3·6H2O", fecl3_hydrate(), None, &table)
            .unwrap();
        assert_relative_eq!(m.valence_dict()["Fe"], 3.0);
        assert_relative_eq!(m.valence_dict()["Cl"], -1.0);
        assert_relative_eq!(m.valence_dict()["O"], -2.0);
    }

    #[test]
    fn test_record_from_mined_json() {
        let record: MaterialRecord = serde_json::from_value(json!({
            "material_string": "strontium titanate",
            "material_name": "",
            "material_formula": "MTiO3",
            "phase": "",
            "additives": [],
            "oxygen_deficiency": null,
            "is_acronym": false,
            "amounts_vars": {},
            "elements_vars": {"M": ["Sr", "Ba"], "A": ["La"]},
            "composition": [
                {"formula": "MTiO3", "amount": 1, "elements": {"M": "1", "Ti": 1, "O": 3.0}}
            ]
        }))
        .unwrap();
        assert_eq!(record.composition[0].amount, "1");
        assert_eq!(record.composition[0].elements["O"], "3");
        assert_eq!(record.composition[0].species, None);
        assert_eq!(record.element_vars_used(), BTreeSet::from(["M".to_string()]));
        let m = MaterialComposition::from_record(&record, None, &NoOxidationData);
        assert!(m.is_err());
        assert!(!MaterialComposition::from_record(
            &record,
            Some(&HashMap::from([("M".to_string(), "Ba".to_string())])),
            &NoOxidationData
        )
        .unwrap()
        .text_matches_formula());
    }

    #[test]
    fn test_component_ignores_unknown_keys() {
        let component: RawComponent = serde_json::from_value(json!({
            "formula": "CuFe2O4", "amount": "1", "elements": {"Cu": "1", "Fe": "2", "O": "4"},
            "phase": "spinel", "charge": 0
        }))
        .unwrap();
        assert_eq!(
            component,
            RawComponent::new(Some("CuFe2O4"), "1", &[("Cu", "1"), ("Fe", "2"), ("O", "4")])
        );
    }

    #[test]
    fn test_overflowing_amounts_fail() {
        let comp = vec![RawComponent::new(Some("Fe"), "1", &[("Fe", "10^64")])];
        assert!(matches!(
            MaterialComposition::new("Fe", "Fe", comp, None, &NoOxidationData),
            Err(FinderError::Formula(_))
        ));
        let huge = "100000000000000000000";
        let comp = vec![
            RawComponent::new(Some("FeO"), huge, &[("Fe", huge), ("O", "1")]),
        ];
        assert!(matches!(
            MaterialComposition::new("FeO", "FeO", comp, None, &NoOxidationData),
            Err(FinderError::Formula(_))
        ));
    }
}
