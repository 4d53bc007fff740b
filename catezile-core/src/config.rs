//! Site configuration.

use std::path::{Path, PathBuf};

use chrono::Duration;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::countdown::DEFAULT_LIVE_WINDOW_MINUTES;
use crate::error::{CateZileError, CateZileResult};
use crate::ics::ExportOptions;
use crate::source::SourceContext;

static DEFAULT_TIMEZONE: &str = "Europe/Bucharest";
static DEFAULT_LOCALE: &str = "ro";
static DEFAULT_SITE_URL: &str = "https://catezile.ro";

pub const TIMEZONE_ENV: &str = "CATEZILE_TIMEZONE";
pub const LOCALE_ENV: &str = "CATEZILE_LOCALE";

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

fn default_site_url() -> String {
    DEFAULT_SITE_URL.to_string()
}

fn default_product_id() -> String {
    ExportOptions::default().product_id
}

fn default_uid_domain() -> String {
    ExportOptions::default().uid_domain
}

fn default_live_window_minutes() -> i64 {
    DEFAULT_LIVE_WINDOW_MINUTES
}

/// Configuration at ~/.config/catezile/config.toml
///
/// Every key is optional; a missing file means all defaults.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SiteConfig {
    #[serde(default = "default_timezone")]
    pub timezone: String,

    #[serde(default = "default_locale")]
    pub locale: String,

    #[serde(default = "default_site_url")]
    pub site_url: String,

    #[serde(default = "default_product_id")]
    pub product_id: String,

    #[serde(default = "default_uid_domain")]
    pub uid_domain: String,

    #[serde(default = "default_live_window_minutes")]
    pub live_window_minutes: i64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            timezone: default_timezone(),
            locale: default_locale(),
            site_url: default_site_url(),
            product_id: default_product_id(),
            uid_domain: default_uid_domain(),
            live_window_minutes: default_live_window_minutes(),
        }
    }
}

impl SiteConfig {
    pub fn config_path() -> CateZileResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CateZileError::Config("Could not determine config directory".into()))?
            .join("catezile");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default path, then apply environment overrides.
    pub fn load() -> CateZileResult<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_overrides(
            std::env::var(TIMEZONE_ENV).ok(),
            std::env::var(LOCALE_ENV).ok(),
        );
        Ok(config)
    }

    pub fn load_from(path: &Path) -> CateZileResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            CateZileError::Config(format!("Could not parse {}: {}", path.display(), e))
        })
    }

    pub fn apply_overrides(&mut self, timezone: Option<String>, locale: Option<String>) {
        if let Some(tz) = timezone.filter(|s| !s.trim().is_empty()) {
            self.timezone = tz;
        }
        if let Some(locale) = locale.filter(|s| !s.trim().is_empty()) {
            self.locale = locale;
        }
    }

    pub fn save_to(&self, path: &Path) -> CateZileResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| CateZileError::Config(e.to_string()))?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// The configured timezone, validated against the tz database.
    pub fn timezone(&self) -> CateZileResult<Tz> {
        self.timezone
            .parse()
            .map_err(|_| CateZileError::Config(format!("Unknown timezone '{}'", self.timezone)))
    }

    /// Live window for fixtures; negative values count as zero.
    pub fn live_window(&self) -> CateZileResult<Duration> {
        Duration::try_minutes(self.live_window_minutes.max(0)).ok_or_else(|| {
            CateZileError::Config(format!(
                "live_window_minutes = {} is too large",
                self.live_window_minutes
            ))
        })
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            product_id: self.product_id.clone(),
            uid_domain: self.uid_domain.clone(),
        }
    }

    pub fn source_context(&self) -> CateZileResult<SourceContext> {
        Ok(SourceContext {
            timezone: self.timezone()?,
            site_url: self.site_url.clone(),
        })
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CateZileResult<()> {
        let contents = format!(
            "\
# catezile configuration

# Timezone schedules are published in:
# timezone = \"{}\"

# Locale for dates and labels (ro or en):
# locale = \"{}\"

# Base URL used for links derived from feed items:
# site_url = \"{}\"

# Calendar export identity (PRODID and UID suffix):
# product_id = \"{}\"
# uid_domain = \"{}\"

# How long a fixture shows as live after kickoff:
# live_window_minutes = {}
",
            DEFAULT_TIMEZONE,
            DEFAULT_LOCALE,
            DEFAULT_SITE_URL,
            default_product_id(),
            default_uid_domain(),
            DEFAULT_LIVE_WINDOW_MINUTES,
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CateZileError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CateZileError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
