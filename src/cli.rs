//! Command-line interface for fancount
//!
//! Defines the clap command tree and the setup-form validation that guards
//! interactive configuration changes. Validation produces a plain list of
//! error messages rather than rendering anything itself.

use clap::{Parser, Subcommand};

use crate::config::Settings;
use crate::interval::parse_interval;

/// Fancount - track and display a social profile's follower count
#[derive(Parser, Debug)]
#[command(name = "fancount")]
#[command(about = "Track a social profile's follower count with caching and fallback")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the current count, refreshing first if one is due
    Show,
    /// Run a refresh cycle now
    Refresh {
        /// Fetch even if the configured interval has not elapsed
        #[arg(long)]
        force: bool,
    },
    /// Configure the tracked profile
    Setup {
        /// Profile identifier of the account to track
        #[arg(long)]
        profile: String,
        /// Minimum time between fetches (e.g. "1 hour", "2 days", "4 weeks")
        #[arg(long, default_value = "3 hours")]
        every: String,
        /// Text shown when no valid count is available; omit to keep the
        /// last known value instead
        #[arg(long, default_value = "")]
        fallback_text: String,
        /// Average the count over this window (e.g. "15 days"); requests a
        /// date-ranged query and averages the returned samples
        #[arg(long)]
        average_window: Option<String>,
    },
    /// Show configuration, last check time and the generated request URL
    Status,
    /// Periodically refresh in the foreground until interrupted
    Watch {
        /// Seconds between due-ness checks
        #[arg(long, default_value_t = 60)]
        poll: u64,
    },
    /// Delete all configuration and cached state
    Reset,
}

/// Pending configuration submitted through `setup`, validated before it is
/// allowed to replace the stored settings.
#[derive(Debug, Clone)]
pub struct SetupForm {
    pub profile: String,
    pub every: String,
    pub fallback_text: String,
    pub average_window: Option<String>,
}

impl SetupForm {
    /// Validates the form, returning the settings to persist or the list of
    /// problems to show the user.
    pub fn validate(&self) -> Result<Settings, Vec<String>> {
        let mut errors = Vec::new();

        if self.profile.is_empty() {
            errors.push("The profile identifier is required".to_string());
        }
        if !parse_interval(&self.every).is_some_and(|secs| secs > 0) {
            errors.push("Revise the checking frequency".to_string());
        }
        if let Some(window) = &self.average_window {
            if !parse_interval(window).is_some_and(|secs| secs > 0) {
                errors.push("Revise the average window setting".to_string());
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Settings {
            profile: self.profile.clone(),
            every: self.every.clone(),
            fallback_text: self.fallback_text.clone(),
            average_window: self.average_window.clone().unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> SetupForm {
        SetupForm {
            profile: "rustlang".to_string(),
            every: "3 hours".to_string(),
            fallback_text: String::new(),
            average_window: None,
        }
    }

    #[test]
    fn test_valid_form_produces_settings() {
        let settings = valid_form().validate().expect("form should validate");
        assert_eq!(settings.profile, "rustlang");
        assert_eq!(settings.every, "3 hours");
        assert!(settings.fallback_text.is_empty());
        assert!(settings.average_window.is_empty());
    }

    #[test]
    fn test_missing_profile_is_rejected() {
        let form = SetupForm {
            profile: String::new(),
            ..valid_form()
        };
        let errors = form.validate().expect_err("should be rejected");
        assert_eq!(errors, vec!["The profile identifier is required"]);
    }

    #[test]
    fn test_unparseable_interval_is_rejected() {
        let form = SetupForm {
            every: "whenever".to_string(),
            ..valid_form()
        };
        let errors = form.validate().expect_err("should be rejected");
        assert_eq!(errors, vec!["Revise the checking frequency"]);
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let form = SetupForm {
            every: "0".to_string(),
            ..valid_form()
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_bad_average_window_is_rejected() {
        let form = SetupForm {
            average_window: Some("a while".to_string()),
            ..valid_form()
        };
        let errors = form.validate().expect_err("should be rejected");
        assert_eq!(errors, vec!["Revise the average window setting"]);
    }

    #[test]
    fn test_multiple_errors_are_collected() {
        let form = SetupForm {
            profile: String::new(),
            every: "nope".to_string(),
            fallback_text: String::new(),
            average_window: Some("also nope".to_string()),
        };
        let errors = form.validate().expect_err("should be rejected");
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_cli_parse_show() {
        let cli = Cli::parse_from(["fancount", "show"]);
        assert!(matches!(cli.command, Command::Show));
    }

    #[test]
    fn test_cli_parse_refresh_force() {
        let cli = Cli::parse_from(["fancount", "refresh", "--force"]);
        assert!(matches!(cli.command, Command::Refresh { force: true }));
    }

    #[test]
    fn test_cli_parse_setup() {
        let cli = Cli::parse_from([
            "fancount",
            "setup",
            "--profile",
            "rustlang",
            "--every",
            "1 hour",
            "--fallback-text",
            "N/A",
        ]);
        match cli.command {
            Command::Setup {
                profile,
                every,
                fallback_text,
                average_window,
            } => {
                assert_eq!(profile, "rustlang");
                assert_eq!(every, "1 hour");
                assert_eq!(fallback_text, "N/A");
                assert!(average_window.is_none());
            }
            other => panic!("expected setup command, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_watch_default_poll() {
        let cli = Cli::parse_from(["fancount", "watch"]);
        assert!(matches!(cli.command, Command::Watch { poll: 60 }));
    }
}
