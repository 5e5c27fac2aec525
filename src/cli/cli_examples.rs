use super::cli_main::get_user_input;
use crate::Examples::synthesis_examples::synthesis_examples;
use std::io::{self, Write};

pub fn examples_menu() {
    loop {
        println!("\n=== Examples ===");
        println!("1. Magnetite from ferric and ferrous chlorides");
        println!("2. Reduction by hydrazine, with and without oxidation states");
        println!("3. Titanate with a variable element site");
        println!("4. Classification of precursors for one target");
        println!("0. Back to main menu");
        print!("Enter your choice: ");
        let _ = io::stdout().flush();

        let choice = get_user_input();
        match choice.trim() {
            "1" => synthesis_examples(0),
            "2" => synthesis_examples(1),
            "3" => synthesis_examples(2),
            "4" => synthesis_examples(3),
            "0" => break,
            _ => println!("Invalid choice. Please try again."),
        }
    }
}
