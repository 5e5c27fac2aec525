use crate::Synthesis::material::{MaterialComposition, MaterialRecord, RawComponent};
use crate::Synthesis::reaction_finder::ReactionFinder;
use crate::Synthesis::recipe::{balance_recipe, balance_recipe_with_defaults, print_reactions};
use crate::Synthesis::valence::{
    NoOxidationData, OxidationStateTable, ValenceAssignment, ValenceSolver,
};
use crate::settings::FinderSettings;
use std::collections::HashMap;

fn hydrate(formula: &str, salt: &str, salt_elements: &[(&str, &str)], water: &str) -> MaterialRecord {
    MaterialRecord::new(
        formula,
        formula,
        vec![
            RawComponent::new(Some(salt), "1", salt_elements),
            RawComponent::new(Some("H2O"), water, &[("H", "2"), ("O", "1")])
                .with_species(&[("H2O", "1")]),
        ],
    )
}

fn simple(formula: &str, elements: &[(&str, &str)]) -> MaterialRecord {
    MaterialRecord::new(
        formula,
        formula,
        vec![RawComponent::new(Some(formula), "1", elements)],
    )
}

fn states(pairs: &[(&str, f64)]) -> Vec<ValenceAssignment> {
    vec![pairs.iter().map(|(e, v)| (e.to_string(), *v)).collect::<HashMap<_, _>>()]
}

pub fn synthesis_examples(task: usize) {
    match task {
        0 => {
            // co-precipitation of magnetite from ferric and ferrous chlorides
            let precursors = vec![
                hydrate("FeCl3·6H2O", "FeCl3", &[("Fe", "1"), ("Cl", "3")], "6"),
                hydrate("FeCl2·4H2O", "FeCl2", &[("Fe", "1"), ("Cl", "2")], "4"),
                simple("NH3", &[("N", "1"), ("H", "3")]),
            ];
            let targets = vec![simple("Fe3O4", &[("Fe", "3"), ("O", "4")])];
            let reactions = balance_recipe_with_defaults(&precursors, &targets);
            print_reactions(&reactions);
        }
        1 => {
            // hydrazine reduces Fe(III) nitrate; without oxidation states the agent is not needed
            let precursors = vec![
                hydrate(
                    "Fe(NO3)3·9H2O",
                    "Fe(NO3)3",
                    &[("Fe", "1"), ("N", "3"), ("O", "9")],
                    "9",
                ),
                simple("N2H4", &[("N", "2"), ("H", "4")]),
            ];
            let targets = vec![simple("FeO", &[("Fe", "1"), ("O", "1")])];
            println!("without oxidation states:");
            print_reactions(&balance_recipe_with_defaults(&precursors, &targets));

            let mut table = OxidationStateTable::new();
            table.insert("Fe(NO3)3", states(&[("Fe", 3.0), ("N", 5.0), ("O", -2.0)]));
            table.insert("FeO", states(&[("Fe", 2.0), ("O", -2.0)]));
            let solver = ValenceSolver::from(table);
            println!("with oxidation states:");
            let reactions = balance_recipe(&precursors, &targets, &solver, &FinderSettings::new());
            print_reactions(&reactions);
        }
        2 => {
            // solid-state synthesis of a titanate with a variable A site
            let precursors = vec![
                simple("BaCO3", &[("Ba", "1"), ("C", "1"), ("O", "3")]),
                simple("SrCO3", &[("Sr", "1"), ("C", "1"), ("O", "3")]),
                simple("TiO2", &[("Ti", "1"), ("O", "2")]),
            ];
            let targets = vec![
                simple("MTiO3", &[("M", "1"), ("Ti", "1"), ("O", "3")])
                    .with_element_var("M", &["Ba", "Sr"]),
            ];
            let reactions = balance_recipe_with_defaults(&precursors, &targets);
            print_reactions(&reactions);
            match serde_json::to_string_pretty(&reactions) {
                Ok(json) => println!("{}", json),
                Err(e) => println!("cannot serialize reactions: {}", e),
            }
        }
        3 => {
            // classification of precursors for a single target
            let solver = NoOxidationData;
            let records = vec![
                hydrate("Cu(NO3)2·3H2O", "Cu(NO3)2", &[("Cu", "1"), ("N", "2"), ("O", "6")], "3"),
                simple("Cu", &[("Cu", "1")]),
                simple("NaOH", &[("Na", "1"), ("O", "1"), ("H", "1")]),
                simple("H2O2", &[("H", "2"), ("O", "2")]),
            ];
            let precursors: Vec<MaterialComposition> = records
                .iter()
                .filter_map(|r| MaterialComposition::from_record(r, None, &solver).ok())
                .collect();
            let target_record = simple("CuO", &[("Cu", "1"), ("O", "1")]);
            let target = match MaterialComposition::from_record(&target_record, None, &solver) {
                Ok(target) => target,
                Err(e) => {
                    println!("bad target: {}", e);
                    return;
                }
            };
            match ReactionFinder::new(&precursors, &target, &FinderSettings::default()) {
                Ok(finder) => {
                    println!("precursors: {:?}", finder.precursors());
                    println!("reacting: {:?}", finder.candidates());
                    println!("tools: {:?}", finder.tools());
                    println!("valence changes: {:?}", finder.valence_changes());
                    match finder.reaction() {
                        Ok(reaction) => println!("{}", reaction.reaction_string),
                        Err(e) => println!("{}", e),
                    }
                }
                Err(e) => println!("{}", e),
            }
        }
        _ => println!("no such example"),
    }
}
