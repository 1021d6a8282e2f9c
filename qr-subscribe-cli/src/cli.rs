//! Command-line arguments

use std::path::PathBuf;

use clap::{Args, Parser};
use qr_subscribe_app::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "qr-subscribe")]
#[command(about = "Subscribe to a notification topic from a QR code or by name")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub input: InputArgs,

    /// Use this server instead of the default one (manual entry only)
    #[arg(short, long, value_name = "URL", requires = "topic")]
    pub server: Option<String>,

    /// Request instant delivery when the choice is offered
    #[arg(long)]
    pub instant: bool,

    /// Username for topics that require login (prompted when missing)
    #[arg(short, long)]
    pub username: Option<String>,

    /// Password for topics that require login (prompted when missing)
    #[arg(short, long)]
    pub password: Option<String>,

    /// Seconds to wait for a QR code to be found in the image
    #[arg(long, default_value = "5", value_name = "SECS")]
    pub scan_timeout: u64,

    #[command(flatten)]
    pub config: ConfigArgs,
}

/// How the topic reaches the dialog
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct InputArgs {
    /// Topic URL as encoded in a QR code, e.g. https://ntfy.sh/alerts
    pub payload: Option<String>,

    /// Image file containing a QR code
    #[arg(short, long, value_name = "PATH")]
    pub image: Option<PathBuf>,

    /// Topic name typed by hand
    #[arg(short, long)]
    pub topic: Option<String>,
}

/// Overrides for values from the config file
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config file (default: <config dir>/qr-subscribe/config.json)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Subscription store file
    #[arg(long, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Built-in server of the app
    #[arg(long, value_name = "URL")]
    pub app_server: Option<String>,

    /// Default server used instead of the built-in one
    #[arg(long, value_name = "URL")]
    pub default_server: Option<String>,

    /// Treat push delivery as unavailable
    #[arg(long)]
    pub no_push: bool,
}

impl ConfigArgs {
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(AppConfig::default_path)
    }

    /// Flags win over the file.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(store) = &self.store {
            config.store_path = Some(store.clone());
        }
        if let Some(url) = &self.app_server {
            config.app_base_url.clone_from(url);
        }
        if let Some(url) = &self.default_server {
            config.default_base_url = Some(url.clone());
        }
        if self.no_push {
            config.push_available = false;
        }
    }
}
