/// exact polynomial amounts with rational coefficients ("1-x", "0.5", "3/2*y")
pub mod amount;
/// element symbols and the volatile/water element sets
pub mod periodic_table;
/// errors of composition parsing and reaction search
pub mod errors;
/// tables of oxidizing and reducing agents (molecules and ions)
pub mod agents;
/// oxidation-state lookup: trait and data-backed solvers
pub mod valence;
/// composition model of a mined material
pub mod material;
/// precursor filtering and classification for one target, reaction assembly
/// # Examples
/// ```
/// use SynthRecipe::Synthesis::material::{MaterialComposition, RawComponent};
/// use SynthRecipe::Synthesis::reaction_finder::ReactionFinder;
/// use SynthRecipe::Synthesis::valence::NoOxidationData;
/// use SynthRecipe::settings::FinderSettings;
/// let hydrate = |salt: &str, n: &str, elements: &[(&str, &str)]| {
///     vec![
///         RawComponent::new(Some(salt), "1", elements),
///         RawComponent::new(Some("H2O"), n, &[("H", "2"), ("O", "1")]),
///     ]
/// };
/// let precursors = vec![
///     MaterialComposition::new(
///         "FeCl3·6H2O",
///         "FeCl3·6H2O",
///         hydrate("FeCl3", "6", &[("Fe", "1"), ("Cl", "3")]),
///         None,
///         &NoOxidationData,
///     )
///     .unwrap(),
///     MaterialComposition::new(
///         "FeCl2·4H2O",
///         "FeCl2·4H2O",
///         hydrate("FeCl2", "4", &[("Fe", "1"), ("Cl", "2")]),
///         None,
///         &NoOxidationData,
///     )
///     .unwrap(),
/// ];
/// let target = MaterialComposition::new(
///     "Fe3O4",
///     "Fe3O4",
///     vec![RawComponent::new(Some("Fe3O4"), "1", &[("Fe", "3"), ("O", "4")])],
///     None,
///     &NoOxidationData,
/// )
/// .unwrap();
/// let finder = ReactionFinder::new(&precursors, &target, &FinderSettings::default()).unwrap();
/// let reaction = finder.reaction().unwrap();
/// assert_eq!(reaction.reaction_string, "FeCl2·4H2O + FeCl3·6H2O -> Fe3O4");
/// ```
pub mod reaction_finder;
/// batch driver over all targets of a synthesis paragraph
pub mod recipe;
