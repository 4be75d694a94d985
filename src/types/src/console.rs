use std::{convert::Infallible, fmt, str::FromStr};

/// Mode of an ad-hoc snmp console query.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum GetMode {
    Get,
    Walk,
    Other(String),
}

impl GetMode {
    pub fn as_str(&self) -> &str {
        match self {
            GetMode::Get => "get",
            GetMode::Walk => "walk",
            GetMode::Other(mode) => mode,
        }
    }
}

impl fmt::Display for GetMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for GetMode {
    fn from(value: &str) -> Self {
        match value {
            "get" => GetMode::Get,
            "walk" => GetMode::Walk,
            _ => GetMode::Other(value.to_owned()),
        }
    }
}

impl FromStr for GetMode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(GetMode::from(s))
    }
}
