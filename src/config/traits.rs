use crate::error::KickpadError;
use serde::{Deserialize, Serialize};

/// Trait for configuration sections
pub trait ConfigSection: Serialize + for<'de> Deserialize<'de> + Default + Clone {
    /// Table name in the TOML file and environment-variable prefix segment
    fn section_name() -> &'static str;
    fn validate(&self) -> Result<(), KickpadError>;
}
