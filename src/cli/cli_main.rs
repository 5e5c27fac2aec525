use super::cli_examples::examples_menu;
use crate::Synthesis::reaction_finder::ReactionDescriptor;
use crate::Synthesis::recipe::{balance_recipe, print_reactions};
use crate::Synthesis::valence::ValenceSolver;
use crate::Utils::load_from_file::{LoadError, load_oxidation_table, load_recipe_batch};
use crate::settings::FinderSettings;
use log::error;
use std::io::{self, Write};

/// Loads a batch (and optionally an oxidation-state table) and reconstructs its reactions
pub fn run_batch(
    batch_file: &str,
    oxidation_file: Option<&str>,
) -> Result<Vec<ReactionDescriptor>, LoadError> {
    let batch = load_recipe_batch(batch_file)?;
    let solver = match oxidation_file {
        Some(file) => ValenceSolver::from(load_oxidation_table(file)?),
        None => ValenceSolver::default(),
    };
    let settings = FinderSettings::new();
    Ok(balance_recipe(
        &batch.precursors,
        &batch.targets,
        &solver,
        &settings,
    ))
}

/// runs a batch and prints the table and the JSON result
pub fn report_batch(batch_file: &str, oxidation_file: Option<&str>) {
    match run_batch(batch_file, oxidation_file) {
        Ok(reactions) => {
            print_reactions(&reactions);
            match serde_json::to_string_pretty(&reactions) {
                Ok(json) => println!("{}", json),
                Err(e) => error!("Failed to serialize reactions: {}", e),
            }
        }
        Err(e) => error!("{}", e),
    }
}

pub fn run_interactive_menu() {
    loop {
        show_main_menu();
        let choice = get_user_input();

        match choice.trim() {
            "1" => examples_menu(),
            "2" => batch_from_user_input(),
            "0" => {
                println!("Goodbye!");
                break;
            }
            _ => println!("Invalid choice. Please try again."),
        }
    }
}
/* colors
Blue (\x1b[34m) - Welcome header text

Yellow (\x1b[33m) - Menu options (1, 2, 0)

Cyan (\x1b[36m) - "Enter your choice:" prompt

Reset (\x1b[0m) - Returns to normal color after each colored section
*/
fn show_main_menu() {
    println!(
        "\x1b[34m\n Welcome to SynthRecipe: reconstruction of synthesis reactions\n
    from mined precursor and target compositions \n
    (c) Gleb E. Zaslavsky, 2024 \n \x1b[0m"
    );
    println!("\x1b[33m1. Examples\x1b[0m");
    println!("\x1b[33m2. Balance a recipe batch from file\x1b[0m");
    println!("\x1b[33m0. Exit\x1b[0m");
    print!("\x1b[36mEnter your choice: \x1b[0m");
    let _ = io::stdout().flush();
}

fn batch_from_user_input() {
    print!("Path to the recipe batch (JSON): ");
    let _ = io::stdout().flush();
    let batch_file = get_user_input();
    print!("Path to the oxidation-state table (JSON, empty for none): ");
    let _ = io::stdout().flush();
    let oxidation_file = get_user_input();
    let oxidation_file = oxidation_file.trim();
    let oxidation_file = if oxidation_file.is_empty() {
        None
    } else {
        Some(oxidation_file)
    };
    report_batch(batch_file.trim(), oxidation_file);
}

pub(crate) fn get_user_input() -> String {
    let mut input = String::new();
    if let Err(e) = io::stdin().read_line(&mut input) {
        error!("Failed to read input: {}", e);
    }
    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_run_batch() {
        let mut batch = NamedTempFile::new().unwrap();
        writeln!(
            batch,
            "{}",
            serde_json::json!({
                "precursors": [
                    {"material_string": "Fe(NO3)3·9H2O", "material_formula": "Fe(NO3)3·9H2O",
                     "composition": [
                        {"formula": "Fe(NO3)3", "amount": "1", "elements": {"Fe": "1", "N": "3", "O": "9"}},
                        {"formula": "H2O", "amount": "9", "elements": {"H": "2", "O": "1"}}
                     ]},
                    {"material_string": "N2H4", "material_formula": "N2H4",
                     "composition": [{"formula": "N2H4", "amount": "1", "elements": {"N": "2", "H": "4"}}]}
                ],
                "targets": [
                    {"material_string": "FeO", "material_formula": "FeO",
                     "composition": [{"formula": "FeO", "amount": "1", "elements": {"Fe": "1", "O": "1"}}]}
                ]
            })
        )
        .unwrap();
        let mut table = NamedTempFile::new().unwrap();
        writeln!(
            table,
            r#"{{"Fe(NO3)3": [{{"Fe": 3, "N": 5, "O": -2}}], "FeO": [{{"Fe": 2, "O": -2}}]}}"#
        )
        .unwrap();
        let batch_path = batch.path().to_str().unwrap();

        let plain = run_batch(batch_path, None).unwrap();
        assert_eq!(plain[0].reaction_string, "Fe(NO3)3·9H2O -> FeO");
        let with_states = run_batch(batch_path, Some(table.path().to_str().unwrap())).unwrap();
        assert_eq!(with_states[0].reaction_string, "Fe(NO3)3·9H2O + N2H4 -> FeO");
    }

    #[test]
    fn test_run_batch_missing_file() {
        assert!(run_batch("no_such_batch.json", None).is_err());
    }
}
