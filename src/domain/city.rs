use unicode_segmentation::UnicodeSegmentation;

const MAX_GRAPHEMES: usize = 256;

/// A city name, trimmed and never blank.
#[derive(Clone, Debug, PartialEq)]
pub struct City(String);

impl City {
    pub const REQUIRED: &'static str = "City is required";
    pub const TOO_LONG: &'static str = "City must not be longer than 256 characters";
    pub const NOT_TEXT: &'static str = "City must be a string";

    pub fn parse(s: String) -> Result<City, String> {
        let trimmed = s.trim();

        match trimmed {
            _ if trimmed.is_empty() => Err(Self::REQUIRED.into()),
            _ if trimmed.graphemes(true).count() > MAX_GRAPHEMES => Err(Self::TOO_LONG.into()),
            _ => Ok(Self(trimmed.to_string())),
        }
    }
}

impl AsRef<str> for City {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for City {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
