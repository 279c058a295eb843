use std::path::Path;

/// Result of source validation
#[derive(Debug, Clone, Default)]
pub struct SourceValidation {
    /// Validation errors that prevent reading
    pub errors: Vec<String>,

    /// Warnings that don't prevent reading but indicate potential issues
    pub warnings: Vec<String>,
}

impl SourceValidation {
    /// Check if validation passed (no errors)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Check if there are any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Merge another validation result into this one
    pub fn merge(mut self, other: SourceValidation) -> Self {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self
    }
}

pub struct SourceValidator;

impl SourceValidator {
    /// Validate that a file exists and is readable
    pub fn validate_file_exists(path: &Path) -> SourceValidation {
        let mut validation = SourceValidation::default();

        if !path.exists() {
            validation.errors.push(format!("File not found: {}", path.display()));
            return validation;
        }
        match std::fs::metadata(path) {
            Ok(metadata) if metadata.is_dir() => {
                validation.errors.push(format!("Path is a directory: {}", path.display()));
            }
            Ok(metadata) if metadata.len() == 0 => {
                validation.errors.push(format!("File is empty: {}", path.display()));
            }
            Ok(_) => {}
            Err(e) => {
                validation.errors.push(format!("Cannot access file: {}", e));
            }
        }

        validation
    }

    /// Validate that a file has one of the expected extensions
    pub fn validate_extension(path: &Path, expected: &[&str]) -> SourceValidation {
        let mut validation = SourceValidation::default();

        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if expected.iter().any(|e| ext.eq_ignore_ascii_case(e)) => {}
            Some(ext) => {
                validation.warnings.push(format!(
                    "Unexpected file extension: .{} (expected one of {})",
                    ext,
                    expected.join(", ")
                ));
            }
            None => {
                validation
                    .warnings
                    .push(format!("File has no extension (expected one of {})", expected.join(", ")));
            }
        }

        validation
    }

    /// Names of `required` columns absent from `headers`
    pub fn missing_columns<'a>(headers: &[&str], required: &[&'a str]) -> Vec<&'a str> {
        required.iter().copied().filter(|col| !headers.iter().any(|h| h == col)).collect()
    }
}
