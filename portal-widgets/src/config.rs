//! Runtime configuration: service endpoints and the log filter.

use crate::error::{WidgetError, WidgetResult};
use portal_cube::service::{DEFAULT_CUBE_URL, DEFAULT_DASHBOARD_URL};
use portal_cube::{CubeService, DashboardService, HttpService};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CUBE_URL_ENV: &str = "PORTAL_CUBE_URL";
pub const DASHBOARD_URL_ENV: &str = "PORTAL_DASHBOARD_URL";
pub const LOG_ENV: &str = "PORTAL_LOG";

const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    pub cube_base_url: String,
    pub dashboard_base_url: String,
    /// `tracing_subscriber::EnvFilter` directive
    pub log_filter: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            cube_base_url: DEFAULT_CUBE_URL.to_string(),
            dashboard_base_url: DEFAULT_DASHBOARD_URL.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl PortalConfig {
    pub fn from_file(path: impl AsRef<Path>) -> WidgetResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            WidgetError::Config(format!("failed to read config file '{}': {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> WidgetResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// File settings (or defaults) with environment overrides applied
    pub fn load(path: Option<&Path>) -> WidgetResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Override fields from `lookup(PORTAL_*)`. Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(url) = read(CUBE_URL_ENV) {
            self.cube_base_url = url;
        }
        if let Some(url) = read(DASHBOARD_URL_ENV) {
            self.dashboard_base_url = url;
        }
        if let Some(filter) = read(LOG_ENV) {
            self.log_filter = filter;
        }
    }

    pub fn validate(&self) -> WidgetResult<()> {
        for (field, value) in [
            ("cube_base_url", &self.cube_base_url),
            ("dashboard_base_url", &self.dashboard_base_url),
        ] {
            if value.trim().is_empty() {
                return Err(WidgetError::Config(format!("{} cannot be empty", field)));
            }
            HttpService::new(value).map_err(|e| WidgetError::Config(format!("{}: {}", field, e)))?;
        }
        Ok(())
    }

    /// Client for the cube definitions service at `cube_base_url`
    pub fn cube_service(&self) -> WidgetResult<CubeService> {
        Ok(CubeService::new(&self.cube_base_url)?)
    }

    /// Client for the stored dashboards service at `dashboard_base_url`
    pub fn dashboard_service(&self) -> WidgetResult<DashboardService> {
        Ok(DashboardService::new(&self.dashboard_base_url)?)
    }
}
