pub type CaptchaResult<T> = Result<T, CaptchaError>;

#[derive(thiserror::Error, Debug)]
pub enum CaptchaError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("infeasible geometry: {0}")]
    GeometryInfeasible(String),

    #[error("codec error: {0}")]
    Codec(#[from] png::EncodingError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CaptchaError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::GeometryInfeasible(msg.into())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(CaptchaError::invalid_input("x")
            .to_string()
            .starts_with("invalid input:"));
        assert!(CaptchaError::geometry("x")
            .to_string()
            .starts_with("infeasible geometry:"));
    }

    #[test]
    fn io_preserves_source() {
        let err = CaptchaError::from(std::io::Error::other("boom"));
        assert!(err.to_string().contains("boom"));
    }
}
