//! Immutable inputs and the resolved render plan.

pub(crate) mod config;
pub(crate) mod media;
pub(crate) mod plan;
pub(crate) mod recipe;
