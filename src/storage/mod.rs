//! Storage module: PlayerPrefs file di disk
//!
//! Codec sendiri hanya bekerja di atas buffer; modul ini adalah
//! collaborator yang membaca dan menulis file `.dat`.

mod prefs_file;

pub use prefs_file::{load, load_with_config, save};
