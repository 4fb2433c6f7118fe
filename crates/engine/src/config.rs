//! Engine configuration.

use chrono_tz::Tz;

/// Tunables for one engine instance.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Business time zone wizard times are interpreted in.
    pub timezone: Tz,
    /// Cap on the open-incident listing.
    pub open_list_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::Asia::Almaty,
            open_list_limit: 10,
        }
    }
}

impl EngineConfig {
    /// Read configuration from the environment.
    ///
    /// `LOSSDESK_TZ` selects the business time zone; unset or unparseable
    /// values warn and fall back to the default.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(name) = std::env::var("LOSSDESK_TZ") {
            match name.parse::<Tz>() {
                Ok(tz) => config.timezone = tz,
                Err(_) => {
                    tracing::warn!(%name, "unrecognized LOSSDESK_TZ; using {}", config.timezone);
                }
            }
        }
        config
    }
}
