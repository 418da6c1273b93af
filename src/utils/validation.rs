use crate::utils::error::{Result, SpecError};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(SpecError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(SpecError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SpecError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Plain file name (no directories) ending in `.{extension}`.
pub fn validate_file_name(field_name: &str, file_name: &str, extension: &str) -> Result<()> {
    validate_non_empty_string(field_name, file_name)?;

    if file_name.contains('/') || file_name.contains('\\') {
        return Err(SpecError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file_name.to_string(),
            reason: "File name must not contain directory separators".to_string(),
        });
    }

    let matches = std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));

    if !matches {
        return Err(SpecError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file_name.to_string(),
            reason: format!("File name must end with .{}", extension),
        });
    }

    Ok(())
}
