// Linkcatalog shared type definitions
// Each submodule defines types used across the engine and its collaborators.

pub mod catalog;
pub mod errors;
pub mod import;
pub mod settings;
