pub enum Environment {
    Development,
    Production,
}

/// Decides the running environment from the `ENV` variable, falling back to
/// the build profile when it is unset.
pub fn which() -> Environment {
    #[cfg(debug_assertions)]
    let default_env = "development";
    #[cfg(not(debug_assertions))]
    let default_env = "production";

    match std::env::var("ENV") {
        Err(_) => default_env.to_string(),
        Ok(v) => v,
    }
    .parse()
    .unwrap_or(Environment::Development)
}

impl std::str::FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Self::Production),
            _ => Ok(Self::Development),
        }
    }
}
