//! Reference tables of known oxidizing and reducing agents.
//!
//! Molecules are matched against a material's formula (or raw text when the
//! formula is missing); ions are matched against the non-water species of its
//! composition. The tables are plain statics, nothing mutates them.
use crate::Synthesis::material::MaterialComposition;

pub const OXIDIZING_AGENT_LIST: [&str; 37] = [
    "H2S4O6", "N2", "NO", "S", "H2SO4", "H2SO3", "I2", "I3", "H2MnO4", "V2O5", "HNO3",
    "CO(NH2)2", "S2O8", "(NH4)2S2O8", "N2O4", "Br2", "MnO2", "O2", "O3", "ClO2", "HNO2", "HBrO",
    "Cl2", "HClO4", "HIO", "HIO3", "HClO3", "HBrO3", "Mn2O3", "H5IO6", "HClO2", "HClO", "HMnO4",
    "PbO2", "H2O2", "H2S2O8", "H2N2O2",
];

pub const REDUCING_AGENT_LIST: [&str; 35] = [
    "N2H4",
    "N2H4·H2O",
    "HN3",
    "H2S2O4",
    "H3PO3",
    "H2SO3",
    "N2O4",
    "H2",
    "P",
    "PVP",
    "CH3(CH2)15N(Br)(CH3)3",
    "PEG 6000",
    "PEG",
    "C14H14S2",
    "DMF",
    "C2H2O4",
    "l-Cys",
    "L-Cysteine",
    "EDTA",
    "NaBH4",
    "L-cysteine",
    "C6H9NO",
    "C3H7NO2S",
    "C10H16N2O8",
    "C2H5NS",
    "C6H12O6",
    "H3PO2",
    "NO",
    "H2S2O6",
    "HCOOH",
    "H(Ac)",
    "CH2O2",
    "H2N2O2",
    "H2O2",
    "PH3",
];

pub const OXIDIZING_IONS_LIST: [&str; 18] = [
    "S4O6", "S", "SO4", "NO", "N2H5", "ClO2", "BrO", "Cl2", "ClO4", "NH3OH", "HIO", "IO3", "ClO3",
    "BrO3", "ClO", "MnO4", "S2O8", "N2O2",
];

pub const REDUCING_IONS_LIST: [&str; 10] = [
    "S2O4",
    "PO3",
    "SO3",
    "C3H5O(COO)3",
    "C6H5O7",
    "PO2",
    "NO",
    "S2O6",
    "COOH",
    "N2O2",
];

/// Direction of electron transfer an agent provides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redox {
    Oxidizing,
    Reducing,
}

pub fn is_oxidizing_agent(formula: &str) -> bool {
    OXIDIZING_AGENT_LIST.contains(&formula)
}

pub fn is_reducing_agent(formula: &str) -> bool {
    REDUCING_AGENT_LIST.contains(&formula)
}

pub fn is_oxidizing_ion(species: &str) -> bool {
    OXIDIZING_IONS_LIST.contains(&species)
}

pub fn is_reducing_ion(species: &str) -> bool {
    REDUCING_IONS_LIST.contains(&species)
}

/// true if any of the species is a known oxidizing ion
pub fn has_oxidizing_ion<'a, I>(species: I) -> bool
where
    I: IntoIterator<Item = &'a String>,
{
    species.into_iter().any(|s| is_oxidizing_ion(s))
}

/// true if any of the species is a known reducing ion
pub fn has_reducing_ion<'a, I>(species: I) -> bool
where
    I: IntoIterator<Item = &'a String>,
{
    species.into_iter().any(|s| is_reducing_ion(s))
}

impl Redox {
    pub fn is_agent(&self, formula: &str) -> bool {
        match self {
            Redox::Oxidizing => is_oxidizing_agent(formula),
            Redox::Reducing => is_reducing_agent(formula),
        }
    }

    pub fn is_ion(&self, species: &str) -> bool {
        match self {
            Redox::Oxidizing => is_oxidizing_ion(species),
            Redox::Reducing => is_reducing_ion(species),
        }
    }

    /// A material acts as an agent of this kind if its formula is in the molecule
    /// table or one of its non-water species is in the ion table.
    pub fn material_is_agent(&self, material: &MaterialComposition) -> bool {
        self.is_agent(material.material_formula())
            || material.nh2o_species_dict().keys().any(|s| self.is_ion(s))
    }

    /// Name under which a material enters the left side as an agent: its formula when
    /// it is a known agent, or, for materials without a formula, the raw text when
    /// that text is a known agent.
    pub fn agent_name(&self, material: &MaterialComposition) -> Option<String> {
        let formula = material.material_formula();
        if self.material_is_agent(material) {
            let name = if formula.is_empty() {
                material.material_string()
            } else {
                formula
            };
            return Some(name.to_string());
        }
        if formula.is_empty() && self.is_agent(material.material_string()) {
            return Some(material.material_string().to_string());
        }
        None
    }
}

/// Whether a material appears in any of the four tables, either by its formula,
/// its raw text or one of its non-water species
pub fn is_known_agent(material: &MaterialComposition) -> bool {
    let names = [material.material_formula(), material.material_string()];
    names
        .iter()
        .any(|name| is_oxidizing_agent(name) || is_reducing_agent(name))
        || has_oxidizing_ion(material.nh2o_species_dict().keys())
        || has_reducing_ion(material.nh2o_species_dict().keys())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_tables_have_no_duplicates() {
        let ox: HashSet<&str> = OXIDIZING_AGENT_LIST.iter().copied().collect();
        let red: HashSet<&str> = REDUCING_AGENT_LIST.iter().copied().collect();
        let ox_ions: HashSet<&str> = OXIDIZING_IONS_LIST.iter().copied().collect();
        let red_ions: HashSet<&str> = REDUCING_IONS_LIST.iter().copied().collect();
        assert_eq!(ox.len(), OXIDIZING_AGENT_LIST.len());
        assert_eq!(red.len(), REDUCING_AGENT_LIST.len());
        assert_eq!(ox_ions.len(), OXIDIZING_IONS_LIST.len());
        assert_eq!(red_ions.len(), REDUCING_IONS_LIST.len());
    }

    #[test]
    fn test_membership() {
        assert!(is_oxidizing_agent("HNO3"));
        assert!(is_oxidizing_agent("(NH4)2S2O8"));
        assert!(!is_oxidizing_agent("N2H4"));
        assert!(is_reducing_agent("N2H4·H2O"));
        assert!(is_reducing_agent("PEG 6000"));
        assert!(!is_reducing_agent("HNO3"));
        // amphoteric entries sit in both tables
        for both in ["NO", "H2O2", "H2N2O2"] {
            assert!(is_oxidizing_agent(both) && is_reducing_agent(both));
        }
        assert!(Redox::Oxidizing.is_ion("MnO4"));
        assert!(Redox::Reducing.is_ion("C6H5O7"));
        assert!(!Redox::Reducing.is_ion("MnO4"));
    }

    #[test]
    fn test_species_intersection() {
        let species = vec!["Na".to_string(), "SO3".to_string()];
        assert!(has_reducing_ion(&species));
        assert!(!has_oxidizing_ion(&species));
        let empty: Vec<String> = Vec::new();
        assert!(!has_reducing_ion(&empty));
    }
}
