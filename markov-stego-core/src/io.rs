use std::path::{Path, PathBuf};
use std::{env, fs, io};

/// Reads a whole corpus file into memory.
///
/// Unlike line-based readers, line breaks are kept: they are whitespace to
/// the tokenizer, so n-grams spanning two lines are still counted.
pub fn read_corpus<P: AsRef<Path>>(filename: P) -> io::Result<String> {
	fs::read_to_string(filename)
}

/// Builds an output path based on an input path and a new extension.
///
/// Example:
/// `data/input.dat` + `"2gram.bin"` → `data/input.2gram.bin`
pub fn build_output_path<P: AsRef<Path>>(
	input_path: P,
	output_extension: &str,
) -> io::Result<PathBuf> {
	let input_path = input_path.as_ref();

	let parent = input_path.parent().unwrap_or_else(|| Path::new("."));
	let file_stem = input_path
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Input path has no filename"))?;

	let mut output = PathBuf::from(parent);
	output.push(file_stem);
	output.set_extension(output_extension);

	Ok(output)
}

/// Extracts the base filename without extension.
///
/// Examples:
/// - `"./data/prince.dat"` → `"prince"`
/// - `"prince.dat"` → `"prince"`
pub fn get_filename<P: AsRef<Path>>(input_path: P) -> io::Result<String> {
	let stem = input_path
		.as_ref()
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Path has no filename"))?;

	Ok(stem.to_string_lossy().to_string())
}

/// Normalize a folder path.
///
/// - `"."` or `"./"` resolves to the current working directory
/// - Other paths are returned as-is (not canonicalized)
pub fn normalize_folder(input: &str) -> PathBuf {
	if input == "." || input == "./" {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		PathBuf::from(input)
	}
}

/// Lists all files with a given extension in a directory.
///
/// Returns file names only (no paths), sorted so callers see a stable order.
pub fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<String>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();

		if path.is_file() && path.extension() == Some(std::ffi::OsStr::new(extension)) {
			if let Some(name) = path.file_name() {
				files.push(name.to_string_lossy().to_string());
			}
		}
	}

	files.sort();
	Ok(files)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn output_path_replaces_extension() {
		let path = build_output_path("data/prince.dat", "2gram.bin").unwrap();
		assert_eq!(path, PathBuf::from("data/prince.2gram.bin"));
	}

	#[test]
	fn filename_drops_folder_and_extension() {
		assert_eq!(get_filename("./data/prince.dat").unwrap(), "prince");
		assert_eq!(get_filename("prince.dat").unwrap(), "prince");
	}

	#[test]
	fn list_files_filters_and_sorts() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join("b.dat"), "b").unwrap();
		fs::write(dir.path().join("a.dat"), "a").unwrap();
		fs::write(dir.path().join("a.2gram.bin"), [0u8]).unwrap();

		let files = list_files(dir.path(), "dat").unwrap();
		assert_eq!(files, vec!["a.dat".to_owned(), "b.dat".to_owned()]);
	}
}
