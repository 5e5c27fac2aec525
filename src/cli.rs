/// interactive menu and batch runner
pub mod cli_main;
/// menu of worked examples
pub mod cli_examples;
