use crate::Synthesis::amount::AmountError;
use thiserror::Error;

/// Errors of the reaction finder. All of them are recoverable per target:
/// the batch driver logs them and moves on to the next record.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FinderError {
    /// A chemical formula or one of its amounts cannot be parsed, or an element symbol is unknown.
    #[error("formula error: {0}")]
    Formula(String),
    /// The recipe is not meaningful: the target is among its own precursors,
    /// no precursor shares elements with the target, or the precursors
    /// do not provide all of the target's non-water elements.
    #[error("stupid recipe: {0}")]
    StupidRecipe(String),
    /// The precursors were classified but no redox-consistent left side exists.
    #[error("cannot find reaction: {0}")]
    CannotFind(String),
}

impl FinderError {
    /// StupidRecipe is a special case of CannotFind
    pub fn is_cannot_find(&self) -> bool {
        matches!(self, FinderError::StupidRecipe(_) | FinderError::CannotFind(_))
    }
}

impl From<AmountError> for FinderError {
    fn from(err: AmountError) -> Self {
        FinderError::Formula(err.to_string())
    }
}
