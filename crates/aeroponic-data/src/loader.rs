//! Finding and deserializing farm data files.
//!
//! Each data file is looked up by base name in a directory and may be
//! written as RON, TOML or JSON. The format is chosen by extension.

use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur while loading farm data.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// A required data file was not found in the given directory.
    #[error("required file '{file}' not found in {dir}")]
    MissingRequired { file: String, dir: PathBuf },

    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    #[error("duplicate name '{name}' in {file}")]
    DuplicateName { file: PathBuf, name: String },

    /// A `[min, max]` pair with `min > max`, or a bound that is not finite.
    #[error("invalid {field} range [{min}, {max}] for '{name}' in {file}")]
    InvalidRange {
        file: PathBuf,
        name: String,
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

impl Format {
    pub const EXTENSIONS: [&'static str; 3] = ["ron", "toml", "json"];
}

pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Look for `{base_name}.ron`, `.toml` or `.json` in `dir`.
///
/// Returns `Ok(None)` when none exists and `ConflictingFormats` when more
/// than one does.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut found: Option<PathBuf> = None;

    for ext in Format::EXTENSIONS {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if !candidate.exists() {
            continue;
        }
        if let Some(existing) = found {
            return Err(DataLoadError::ConflictingFormats {
                a: existing,
                b: candidate,
            });
        }
        found = Some(candidate);
    }

    Ok(found)
}

/// Like [`find_data_file`], but a missing file is an error.
pub fn require_data_file(dir: &Path, base_name: &str) -> Result<PathBuf, DataLoadError> {
    find_data_file(dir, base_name)?.ok_or_else(|| DataLoadError::MissingRequired {
        file: base_name.to_owned(),
        dir: dir.to_path_buf(),
    })
}

// ===========================================================================
// Deserialization
// ===========================================================================

pub(crate) fn parse_error(path: &Path, detail: impl ToString) -> DataLoadError {
    DataLoadError::Parse {
        file: path.to_path_buf(),
        detail: detail.to_string(),
    }
}

/// Read a file and deserialize it in the format its extension names.
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Toml => toml::from_str(&content).map_err(|e| parse_error(path, e)),
    }
}

/// Deserialize a list. TOML has no top-level arrays, so a TOML file holds
/// the list under `toml_key`; RON and JSON files are the list itself.
pub fn deserialize_list<T: DeserializeOwned>(
    path: &Path,
    toml_key: &str,
) -> Result<Vec<T>, DataLoadError> {
    if detect_format(path)? != Format::Toml {
        return deserialize_file(path);
    }

    let content = std::fs::read_to_string(path)?;
    let mut table: toml::Table = toml::from_str(&content).map_err(|e| parse_error(path, e))?;
    let array = table
        .remove(toml_key)
        .ok_or_else(|| parse_error(path, format!("missing key '{toml_key}' in TOML file")))?;
    array
        .try_into()
        .map_err(|e: toml::de::Error| parse_error(path, e))
}

// ===========================================================================
// Validation helpers
// ===========================================================================

/// Record `name` as seen, failing with `DuplicateName` if it already was.
pub fn check_duplicate(
    seen: &mut HashSet<String>,
    name: &str,
    file: &Path,
) -> Result<(), DataLoadError> {
    if seen.insert(name.to_owned()) {
        Ok(())
    } else {
        Err(DataLoadError::DuplicateName {
            file: file.to_path_buf(),
            name: name.to_owned(),
        })
    }
}

/// Fail with `InvalidRange` unless both bounds are finite and `min <= max`.
pub fn check_range(
    (min, max): (f64, f64),
    name: &str,
    field: &'static str,
    file: &Path,
) -> Result<(), DataLoadError> {
    if min.is_finite() && max.is_finite() && min <= max {
        Ok(())
    } else {
        Err(DataLoadError::InvalidRange {
            file: file.to_path_buf(),
            name: name.to_owned(),
            field,
            min,
            max,
        })
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::CropData;
    use crate::test_dir::{cleanup, make_test_dir};
    use std::fs;

    const BASIL_RON: &str = r#"[
        (name: "basil", temperature: (22.0, 35.0), humidity: (50.0, 80.0), sunlight: (6.0, 10.0)),
        (name: "mint", temperature: (18.0, 30.0), humidity: (60.0, 90.0), sunlight: (3.0, 7.0)),
    ]"#;

    const BASIL_JSON: &str = r#"[
        {"name": "basil", "temperature": [22, 35], "humidity": [50, 80], "sunlight": [6, 10]},
        {"name": "mint", "temperature": [18, 30], "humidity": [60, 90], "sunlight": [3, 7]}
    ]"#;

    const BASIL_TOML: &str = r#"
[[crops]]
name = "basil"
temperature = [22.0, 35.0]
humidity = [50.0, 80.0]
sunlight = [6.0, 10.0]

[[crops]]
name = "mint"
temperature = [18.0, 30.0]
humidity = [60.0, 90.0]
sunlight = [3.0, 7.0]
"#;

    // -----------------------------------------------------------------------
    // detect_format
    // -----------------------------------------------------------------------

    #[test]
    fn detect_format_by_extension() {
        assert_eq!(detect_format(Path::new("crops.ron")).unwrap(), Format::Ron);
        assert_eq!(detect_format(Path::new("crops.toml")).unwrap(), Format::Toml);
        assert_eq!(detect_format(Path::new("crops.json")).unwrap(), Format::Json);
    }

    #[test]
    fn detect_format_unsupported() {
        for name in ["crops.yaml", "crops"] {
            assert!(matches!(
                detect_format(Path::new(name)),
                Err(DataLoadError::UnsupportedFormat { .. })
            ));
        }
    }

    // -----------------------------------------------------------------------
    // find_data_file / require_data_file
    // -----------------------------------------------------------------------

    #[test]
    fn find_data_file_each_format() {
        for ext in Format::EXTENSIONS {
            let dir = make_test_dir(&format!("find_{ext}"));
            fs::write(dir.join(format!("crops.{ext}")), "").unwrap();

            let result = find_data_file(&dir, "crops").unwrap();
            assert_eq!(result, Some(dir.join(format!("crops.{ext}"))));

            cleanup(&dir);
        }
    }

    #[test]
    fn find_data_file_missing() {
        let dir = make_test_dir("find_missing");
        assert_eq!(find_data_file(&dir, "crops").unwrap(), None);
        cleanup(&dir);
    }

    #[test]
    fn find_data_file_conflict() {
        let dir = make_test_dir("find_conflict");
        fs::write(dir.join("crops.ron"), "[]").unwrap();
        fs::write(dir.join("crops.json"), "[]").unwrap();

        let result = find_data_file(&dir, "crops");
        assert!(matches!(
            result,
            Err(DataLoadError::ConflictingFormats { .. })
        ));

        cleanup(&dir);
    }

    #[test]
    fn require_data_file_missing() {
        let dir = make_test_dir("require_missing");

        let result = require_data_file(&dir, "crops");
        assert!(matches!(
            result,
            Err(DataLoadError::MissingRequired { ref file, .. }) if file == "crops"
        ));

        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // deserialize_list
    // -----------------------------------------------------------------------

    #[test]
    fn deserialize_list_in_every_format() {
        let dir = make_test_dir("list_formats");
        for (ext, body) in [("ron", BASIL_RON), ("json", BASIL_JSON), ("toml", BASIL_TOML)] {
            let path = dir.join(format!("crops.{ext}"));
            fs::write(&path, body).unwrap();

            let crops: Vec<CropData> = deserialize_list(&path, "crops").unwrap();
            assert_eq!(crops.len(), 2, "{ext}");
            assert_eq!(crops[0].name, "basil");
            assert_eq!(crops[1].sunlight, (3.0, 7.0));
        }
        cleanup(&dir);
    }

    #[test]
    fn deserialize_list_toml_missing_key() {
        let dir = make_test_dir("list_toml_missing");
        let path = dir.join("crops.toml");
        fs::write(&path, r#"foo = "bar""#).unwrap();

        let result: Result<Vec<CropData>, _> = deserialize_list(&path, "crops");
        assert!(matches!(
            result,
            Err(DataLoadError::Parse { ref detail, .. }) if detail.contains("crops")
        ));

        cleanup(&dir);
    }

    #[test]
    fn deserialize_file_parse_error() {
        let dir = make_test_dir("deser_parse_err");
        let path = dir.join("crops.ron");
        fs::write(&path, "this is not valid RON {{{").unwrap();

        let result: Result<Vec<CropData>, _> = deserialize_file(&path);
        assert!(matches!(result, Err(DataLoadError::Parse { .. })));

        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // check_duplicate / check_range
    // -----------------------------------------------------------------------

    #[test]
    fn check_duplicate_tracks_names() {
        let mut seen = HashSet::new();
        let file = Path::new("crops.ron");
        assert!(check_duplicate(&mut seen, "basil", file).is_ok());
        assert!(check_duplicate(&mut seen, "mint", file).is_ok());
        assert!(matches!(
            check_duplicate(&mut seen, "basil", file),
            Err(DataLoadError::DuplicateName { ref name, .. }) if name == "basil"
        ));
    }

    #[test]
    fn check_range_rejects_inverted_and_non_finite() {
        let file = Path::new("crops.ron");
        assert!(check_range((1.0, 1.0), "basil", "temperature", file).is_ok());
        assert!(check_range((5.0, 1.0), "basil", "temperature", file).is_err());
        assert!(check_range((f64::NAN, 1.0), "basil", "temperature", file).is_err());
        assert!(check_range((0.0, f64::INFINITY), "basil", "temperature", file).is_err());
    }

    // -----------------------------------------------------------------------
    // Error display messages
    // -----------------------------------------------------------------------

    #[test]
    fn error_display_messages() {
        let e = DataLoadError::MissingRequired {
            file: "crops".into(),
            dir: PathBuf::from("/data"),
        };
        assert_eq!(e.to_string(), "required file 'crops' not found in /data");

        let e = DataLoadError::InvalidRange {
            file: PathBuf::from("crops.toml"),
            name: "basil".into(),
            field: "humidity",
            min: 80.0,
            max: 50.0,
        };
        assert_eq!(
            e.to_string(),
            "invalid humidity range [80, 50] for 'basil' in crops.toml"
        );

        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let data_err: DataLoadError = io_err.into();
        assert!(matches!(data_err, DataLoadError::Io(_)));
        assert!(data_err.to_string().contains("file not found"));
    }
}
