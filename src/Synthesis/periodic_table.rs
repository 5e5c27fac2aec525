//! Element symbols of the periodic table and the subsets the reaction finder cares about

/// Symbols of all known chemical elements, ordered by atomic number
pub const ELEMENTS: [&str; 118] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl",
    "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As",
    "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In",
    "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb",
    "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl",
    "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk",
    "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh",
    "Fl", "Mc", "Lv", "Ts", "Og",
];

/// elements that may leave the solid as gas during synthesis (decomposition of nitrates,
/// carbonates, hydroxides and so on); everything else is non-volatile
pub const VOLATILE_ELEMENTS: [&str; 4] = ["H", "C", "N", "O"];

/// elements released when a hydrate loses its crystal water
pub const H2O_ELEMENTS: [&str; 2] = ["H", "O"];

/// species released when a hydrate loses its crystal water
pub const H2O_SPECIES: [&str; 1] = ["H2O"];

pub fn is_element(symbol: &str) -> bool {
    ELEMENTS.contains(&symbol)
}

pub fn is_volatile_element(symbol: &str) -> bool {
    VOLATILE_ELEMENTS.contains(&symbol)
}

pub fn is_h2o_element(symbol: &str) -> bool {
    H2O_ELEMENTS.contains(&symbol)
}

pub fn is_h2o_species(species: &str) -> bool {
    H2O_SPECIES.contains(&species)
}
