//! CLI command implementations

pub(crate) mod common;
pub(crate) mod create_changelog;
pub(crate) mod render;
pub(crate) mod status;
pub(crate) mod update;
