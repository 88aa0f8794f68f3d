//! The regional redirection toggle.
//!
//! Redirection is on unless explicitly disabled. The value normally comes
//! from the `CLOUDVISION_REGIONAL_REDIRECT` environment variable, read once
//! at startup by [`RedirectToggle::from_env`]; the resolver itself only
//! ever sees the parsed value.

use std::ffi::OsStr;
use std::fmt;

/// Environment variable controlling regional redirection.
pub const REDIRECT_ENV: &str = "CLOUDVISION_REGIONAL_REDIRECT";

/// Whether regional redirection should be attempted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RedirectToggle {
    /// Not configured. Redirection is attempted.
    #[default]
    Default,
    Enabled,
    Disabled,
}

impl RedirectToggle {
    /// Parse a toggle value. Only the exact string `"false"` disables
    /// redirection; the empty string means unset, anything else enables it.
    pub fn parse(value: &str) -> Self {
        match value {
            "" => RedirectToggle::Default,
            "false" => RedirectToggle::Disabled,
            _ => RedirectToggle::Enabled,
        }
    }

    /// Parse a raw environment value, `None` meaning unset.
    pub fn from_os(value: Option<&OsStr>) -> Self {
        match value {
            None => RedirectToggle::Default,
            // Non-UTF-8 can never equal "false".
            Some(raw) => raw.to_str().map_or(RedirectToggle::Enabled, Self::parse),
        }
    }

    /// Read [`REDIRECT_ENV`] from the process environment.
    pub fn from_env() -> Self {
        Self::from_os(std::env::var_os(REDIRECT_ENV).as_deref())
    }

    pub fn is_enabled(self) -> bool {
        !matches!(self, RedirectToggle::Disabled)
    }
}

impl fmt::Display for RedirectToggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RedirectToggle::Default => "default",
            RedirectToggle::Enabled => "enabled",
            RedirectToggle::Disabled => "disabled",
        })
    }
}
