use std::collections::HashMap;
use std::io;
use std::path::Path;

use log::info;

use super::builder::ModelBuilder;
use super::ngram_model::NGramModel;
use crate::error::{Result, StegoError};
use crate::io::{get_filename, list_files, normalize_folder};

/// A folder of named corpora counted at one order.
///
/// # Responsibilities
/// - Load every `.dat` corpus of a directory (through the builder cache)
/// - Build a model from any selection of the loaded corpora, adding their
///   counts together
#[derive(Debug)]
pub struct CorpusLibrary {
	order: usize,
	builders: HashMap<String, ModelBuilder>,
}

impl CorpusLibrary {
	/// Creates a library by loading all `.dat` corpora from a directory.
	///
	/// # Parameters
	/// - `folder`: Path to a directory containing corpus files.
	///   Both `"folder"` and `"folder/"` are accepted.
	/// - `order`: Order of every model built from the library.
	///
	/// # Errors
	/// - Returns an error if the path does not exist or is not a directory.
	/// - Returns an error if a corpus fails to load.
	///
	/// # Notes
	/// - Only files directly contained in the directory are loaded
	///   (subdirectories are ignored).
	pub fn new<P: AsRef<Path>>(folder: P, order: usize) -> Result<Self> {
		let mut library = Self { order, builders: HashMap::new() };

		let folder = normalize_folder(&folder.as_ref().to_string_lossy());
		if !folder.is_dir() {
			return Err(StegoError::Io(io::Error::new(
				io::ErrorKind::InvalidInput,
				format!("Expected a directory, got: {}", folder.display()),
			)));
		}

		for file in list_files(&folder, "dat")? {
			library.load_corpus(folder.join(&file))?;
		}

		Ok(library)
	}

	/// Returns the names of the loaded corpora, sorted.
	pub fn get_model_names(&self) -> Vec<String> {
		let mut names: Vec<String> = self.builders.keys().cloned().collect();
		names.sort();
		names
	}

	pub fn order(&self) -> usize {
		self.order
	}

	fn load_corpus<P: AsRef<Path>>(&mut self, filepath: P) -> Result<()> {
		let key = get_filename(&filepath)?;
		let builder = ModelBuilder::from_corpus_file(&filepath, self.order)?;
		info!("loaded corpus {key}");
		self.builders.insert(key, builder);
		Ok(())
	}

	/// Builds one model out of the named corpora.
	///
	/// # Errors
	/// Returns [`StegoError::UnknownCorpus`] if a name was not loaded.
	pub fn build<S: AsRef<str>>(&self, names: &[S]) -> Result<NGramModel> {
		let mut combined = ModelBuilder::new(self.order)?;
		for name in names {
			let name = name.as_ref();
			let builder = self
				.builders
				.get(name)
				.ok_or_else(|| StegoError::UnknownCorpus(name.to_owned()))?;
			combined.merge(builder)?;
		}
		Ok(combined.build())
	}

	/// Builds one model out of every loaded corpus.
	pub fn build_all(&self) -> Result<NGramModel> {
		self.build(&self.get_model_names())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::TransitionTable;
	use std::fs;

	fn library() -> (tempfile::TempDir, CorpusLibrary) {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join("sea.dat"), "the sea is grey").unwrap();
		fs::write(dir.path().join("sky.dat"), "the sky is blue").unwrap();
		fs::write(dir.path().join("notes.txt"), "ignored words").unwrap();
		let library = CorpusLibrary::new(dir.path(), 2).unwrap();
		(dir, library)
	}

	#[test]
	fn loads_only_dat_files() {
		let (_dir, library) = library();
		assert_eq!(library.get_model_names(), vec!["sea".to_owned(), "sky".to_owned()]);
	}

	#[test]
	fn builds_selected_corpora() {
		let (_dir, library) = library();
		let sea = library.build(&["sea"]).unwrap();
		assert!(sea.vocabulary().id("sky").is_none());

		let both = library.build_all().unwrap();
		assert_eq!(both.candidates_for(&["the"]).unwrap().len(), 2);
		assert!(both.vocabulary().id("ignored").is_none());
	}

	#[test]
	fn unknown_corpus_is_an_error() {
		let (_dir, library) = library();
		assert!(matches!(library.build(&["moon"]), Err(StegoError::UnknownCorpus(name)) if name == "moon"));
	}

	#[test]
	fn missing_folder_is_an_error() {
		assert!(CorpusLibrary::new("/definitely/not/here", 2).is_err());
	}
}
