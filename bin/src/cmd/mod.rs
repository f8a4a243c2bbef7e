//! CLI subcommand modules.

pub(crate) mod alphas;
pub(crate) mod evaluate;
pub(crate) mod grid;
pub(crate) mod inspect;
