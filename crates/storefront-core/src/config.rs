/// Trait for loading service configuration from environment variables.
///
/// Implementors derive `serde::Deserialize` (field names map to upper-case
/// env var names, so `database_url` reads `DATABASE_URL`) and call
/// `Config::from_env()` once at startup.
pub trait Config: Sized + serde::de::DeserializeOwned {
    /// Load from the process environment, reporting which variable is bad.
    fn try_from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    /// # Panics
    ///
    /// Panics if any required env var is missing or cannot be deserialized.
    fn from_env() -> Self {
        match Self::try_from_env() {
            Ok(config) => config,
            Err(e) => panic!("failed to load config from environment: {e}"),
        }
    }
}
