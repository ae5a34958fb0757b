//! Configuration for the civic ledger service

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use shared_types::Address;

/// Environment variable holding the admin address (hex).
pub const ENV_ADMIN_ADDRESS: &str = "CL_ADMIN_ADDRESS";
/// Environment variable holding the live event channel capacity.
pub const ENV_EVENT_CHANNEL_CAPACITY: &str = "CL_EVENT_CHANNEL_CAPACITY";

/// Default number of records buffered per live subscriber.
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 1000;

/// Ledger configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// The Admin identity, fixed for the ledger's lifetime
    pub admin: Address,
    /// Records buffered per live subscriber before it lags
    pub event_channel_capacity: usize,
}

impl LedgerConfig {
    /// Configuration with `admin` and default settings.
    #[must_use]
    pub fn new(admin: Address) -> Self {
        Self {
            admin,
            event_channel_capacity: DEFAULT_EVENT_CHANNEL_CAPACITY,
        }
    }

    #[must_use]
    pub fn builder() -> LedgerConfigBuilder {
        LedgerConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.admin.is_zero() {
            return Err(ConfigError::ZeroAdmin);
        }
        if self.event_channel_capacity == 0 {
            return Err(ConfigError::ZeroChannelCapacity);
        }
        Ok(())
    }

    /// Reads `CL_ADMIN_ADDRESS` and `CL_EVENT_CHANNEL_CAPACITY`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut builder = Self::builder();

        if let Some(raw) = lookup(ENV_ADMIN_ADDRESS) {
            let admin = raw.trim().parse::<Address>().map_err(|e| ConfigError::InvalidEnv {
                var: ENV_ADMIN_ADDRESS,
                reason: e.to_string(),
            })?;
            builder = builder.admin(admin);
        }

        if let Some(raw) = lookup(ENV_EVENT_CHANNEL_CAPACITY) {
            let capacity = raw.trim().parse::<usize>().map_err(|e| ConfigError::InvalidEnv {
                var: ENV_EVENT_CHANNEL_CAPACITY,
                reason: e.to_string(),
            })?;
            builder = builder.event_channel_capacity(capacity);
        }

        builder.build()
    }
}

/// Builder for [`LedgerConfig`].
#[derive(Clone, Debug, Default)]
pub struct LedgerConfigBuilder {
    admin: Option<Address>,
    event_channel_capacity: Option<usize>,
}

impl LedgerConfigBuilder {
    #[must_use]
    pub fn admin(mut self, admin: Address) -> Self {
        self.admin = Some(admin);
        self
    }

    #[must_use]
    pub fn event_channel_capacity(mut self, capacity: usize) -> Self {
        self.event_channel_capacity = Some(capacity);
        self
    }

    /// Builds and validates the configuration.
    pub fn build(self) -> Result<LedgerConfig, ConfigError> {
        let admin = self.admin.ok_or(ConfigError::MissingAdmin)?;
        let config = LedgerConfig {
            admin,
            event_channel_capacity: self
                .event_channel_capacity
                .unwrap_or(DEFAULT_EVENT_CHANNEL_CAPACITY),
        };
        config.validate()?;
        Ok(config)
    }
}
