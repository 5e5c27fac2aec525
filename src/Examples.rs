/// worked examples of reaction reconstruction
pub mod synthesis_examples;
