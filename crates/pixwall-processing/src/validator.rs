//! Upload payload validation.

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Empty file")]
    EmptyFile,
}

/// Validates upload payloads against the configured size cap. Filename
/// and extension checks live in the storage naming layer, which runs
/// before any bytes are read.
#[derive(Debug, Clone)]
pub struct UploadValidator {
    max_file_size: usize,
}

impl UploadValidator {
    pub fn new(max_file_size: usize) -> Self {
        Self { max_file_size }
    }

    pub fn validate_size(&self, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }
        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_size_ok() {
        let validator = UploadValidator::new(1024);
        assert!(validator.validate_size(512).is_ok());
        assert!(validator.validate_size(1024).is_ok());
    }

    #[test]
    fn test_validate_size_too_large() {
        let validator = UploadValidator::new(1024);
        assert!(matches!(
            validator.validate_size(1025),
            Err(ValidationError::FileTooLarge { size: 1025, max: 1024 })
        ));
    }

    #[test]
    fn test_validate_size_empty() {
        let validator = UploadValidator::new(1024);
        assert!(matches!(
            validator.validate_size(0),
            Err(ValidationError::EmptyFile)
        ));
    }
}
