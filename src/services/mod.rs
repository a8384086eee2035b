// Linkcatalog services
// Stateless or file-backed collaborators of the import engine: batch decoding and settings.

pub mod batch_codec;
pub mod settings_engine;
