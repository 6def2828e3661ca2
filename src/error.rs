use thiserror::Error;

#[derive(Debug, Error)]
pub enum GarbhaError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Unsupported image type: {0} (expected jpg, jpeg or png)")]
    UnsupportedFormat(String),

    #[error("Invalid measurement range: min {min} mm > max {max} mm")]
    InvalidRange { min: f64, max: f64 },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        let err = GarbhaError::UnsupportedFormat("scan.bmp".into());
        assert_eq!(
            err.to_string(),
            "Unsupported image type: scan.bmp (expected jpg, jpeg or png)"
        );

        let err = GarbhaError::InvalidRange { min: 9.0, max: 3.0 };
        assert_eq!(
            err.to_string(),
            "Invalid measurement range: min 9 mm > max 3 mm"
        );
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: GarbhaError = io.into();
        assert!(matches!(err, GarbhaError::Io(_)));
    }
}
