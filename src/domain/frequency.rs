use time::Duration;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Frequency {
    Hourly,
    Daily,
}

impl Frequency {
    pub const REQUIRED: &'static str = "Frequency is required";
    pub const INVALID: &'static str = r#"Frequency must be either "hourly" or "daily""#;

    /// Minimal gap between two weather updates.
    pub fn period(&self) -> Duration {
        match self {
            Frequency::Hourly => Duration::hours(1),
            Frequency::Daily => Duration::days(1),
        }
    }
}

impl AsRef<str> for Frequency {
    fn as_ref(&self) -> &'static str {
        match self {
            Frequency::Hourly => "hourly",
            Frequency::Daily => "daily",
        }
    }
}

impl TryFrom<String> for Frequency {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_ref() {
            "hourly" => Ok(Frequency::Hourly),
            "daily" => Ok(Frequency::Daily),
            "" => Err(Self::REQUIRED.into()),
            _ => Err(Self::INVALID.into()),
        }
    }
}
