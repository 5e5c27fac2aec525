/// loading of recipe batches and oxidation-state tables from JSON files
pub mod load_from_file;
