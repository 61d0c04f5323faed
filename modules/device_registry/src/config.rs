use serde::{Deserialize, Serialize};

use crate::domain::service::ServiceConfig;

/// Configuration for the device_registry module
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceRegistryConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
    #[serde(default = "default_max_name_length")]
    pub max_name_length: usize,
    #[serde(default = "default_max_prefix_length")]
    pub max_prefix_length: usize,
}

impl Default for DeviceRegistryConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            max_name_length: default_max_name_length(),
            max_prefix_length: default_max_prefix_length(),
        }
    }
}

impl From<&DeviceRegistryConfig> for ServiceConfig {
    fn from(cfg: &DeviceRegistryConfig) -> Self {
        Self {
            max_name_length: cfg.max_name_length,
            max_prefix_length: cfg.max_prefix_length,
            default_page_size: cfg.default_page_size,
            max_page_size: cfg.max_page_size,
        }
    }
}

fn default_page_size() -> u64 {
    10
}

fn default_max_page_size() -> u64 {
    100
}

fn default_max_name_length() -> usize {
    100
}

fn default_max_prefix_length() -> usize {
    16
}
