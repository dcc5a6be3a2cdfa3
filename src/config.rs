//! Configuration and CLI argument handling

use std::time::Duration;
use clap::Parser;

use crate::state::TimerConfiguration;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "wait-a-moment")]
#[command(about = "A countdown timer widget with a shaking bell, served over HTTP")]
#[command(version = "1.0.0")]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Initial countdown minutes
    #[arg(short, long, default_value = "10")]
    pub minutes: u64,

    /// Initial countdown seconds (0-59)
    #[arg(short, long, default_value = "0", value_parser = clap::value_parser!(u64).range(0..60))]
    pub seconds: u64,

    /// Countdown tick interval in milliseconds
    #[arg(long, default_value = "100", value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_ms: u64,

    /// Start in the light theme
    #[arg(long)]
    pub light: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Countdown configuration the widget starts with
    pub fn initial_duration(&self) -> TimerConfiguration {
        TimerConfiguration::from_picker(self.minutes, self.seconds)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["wait-a-moment"]).unwrap();
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert_eq!(config.initial_duration().total_duration_seconds, 600);
        assert_eq!(config.tick_interval(), Duration::from_millis(100));
        assert_eq!(config.log_level(), "info");
        assert!(!config.light);
    }

    #[test]
    fn test_duration_flags() {
        let config = Config::try_parse_from(["wait-a-moment", "-m", "1", "-s", "30", "-v"]).unwrap();
        assert_eq!(config.initial_duration().total_duration_seconds, 90);
        assert_eq!(config.log_level(), "debug");
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        assert!(Config::try_parse_from(["wait-a-moment", "-s", "60"]).is_err());
        assert!(Config::try_parse_from(["wait-a-moment", "--tick-ms", "0"]).is_err());
    }
}
