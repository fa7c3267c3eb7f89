use std::str::FromStr;

use crate::error::{CaptchaError, CaptchaResult};

/// One challenge instance: an opaque identifier and the digits the image must show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    id: String,
    digits: Digits,
}

impl Challenge {
    pub fn new(id: impl Into<String>, digits: Digits) -> Self {
        Challenge {
            id: id.into(),
            digits,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn digits(&self) -> &[u8] {
        self.digits.as_slice()
    }
}

/// A non-empty sequence of digit values `0..=9`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digits(Vec<u8>);

impl Digits {
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<Vec<u8>> for Digits {
    type Error = CaptchaError;
    fn try_from(digits: Vec<u8>) -> CaptchaResult<Self> {
        check_digits(&digits)?;
        Ok(Digits(digits))
    }
}

impl TryFrom<&[u8]> for Digits {
    type Error = CaptchaError;
    fn try_from(digits: &[u8]) -> CaptchaResult<Self> {
        Digits::try_from(digits.to_vec())
    }
}

/// Parses a decimal string such as `"381904"`.
impl FromStr for Digits {
    type Err = CaptchaError;
    fn from_str(s: &str) -> CaptchaResult<Self> {
        let digits = s
            .chars()
            .map(|c| {
                c.to_digit(10).map(|d| d as u8).ok_or_else(|| {
                    CaptchaError::invalid_input(format!("{:?} is not a decimal digit", c))
                })
            })
            .collect::<CaptchaResult<Vec<u8>>>()?;
        Digits::try_from(digits)
    }
}

pub(crate) fn check_digits(digits: &[u8]) -> CaptchaResult<()> {
    if digits.is_empty() {
        return Err(CaptchaError::invalid_input("empty digit sequence"));
    }
    if let Some(d) = digits.iter().find(|&&d| d > 9) {
        return Err(CaptchaError::invalid_input(format!(
            "digit out of range: {}",
            d
        )));
    }
    Ok(())
}
