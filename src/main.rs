use SynthRecipe::cli::cli_main::{report_batch, run_interactive_menu};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

pub fn main() {
    if let Err(e) = TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ) {
        eprintln!("Failed to initialize logger: {}", e);
    }
    let args: Vec<String> = std::env::args().collect();
    match args.len() {
        1 => run_interactive_menu(),
        2 => report_batch(&args[1], None),
        3 => report_batch(&args[1], Some(&args[2])),
        _ => eprintln!("usage: SynthRecipe [batch.json [oxidation_table.json]]"),
    }
}
