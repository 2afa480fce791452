//! CLI for storeparams: runs capture passes against a file-backed browser profile.

mod commands;

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use storeparams_core::config::{self, ConfigOverrides};
use storeparams_core::profile::{self, BrowserProfile};
use storeparams_core::StorageKind;

use commands::{run_capture, run_completions, run_dump, run_new_session, run_read};

/// Top-level CLI for storeparams.
#[derive(Debug, Parser)]
#[command(name = "storeparams")]
#[command(about = "Capture UTM and referrer attribution into browser-style storage", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Options shared by commands that touch the profile.
#[derive(Debug, Args)]
pub struct ProfileArgs {
    /// Browser profile JSON (default: ~/.local/share/storeparams/profile.json).
    #[arg(long, value_name = "PATH")]
    pub profile: Option<PathBuf>,
}

/// Options shared by commands that resolve a configuration.
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config file (default: ~/.config/storeparams/config.toml).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Storage backend: cookies, localStorage or sessionStorage. Overrides the config file.
    #[arg(long, value_name = "KIND")]
    pub storage: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Run one capture pass for a page load.
    Capture {
        /// Full URL of the page being loaded, including its query string.
        url: String,

        /// URL of the referring page, if any.
        #[arg(long)]
        referrer: Option<String>,

        #[command(flatten)]
        config: ConfigArgs,

        #[command(flatten)]
        profile: ProfileArgs,
    },

    /// Read a stored value from the configured backend.
    Read {
        /// Storage key (e.g. utm_source, referrer).
        key: String,

        #[command(flatten)]
        config: ConfigArgs,

        #[command(flatten)]
        profile: ProfileArgs,
    },

    /// Show every cookie and storage item in the profile.
    Dump {
        #[command(flatten)]
        profile: ProfileArgs,
    },

    /// End the browser session: drop session storage and session cookies.
    NewSession {
        #[command(flatten)]
        profile: ProfileArgs,
    },

    /// Print shell completions to stdout.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

impl ConfigArgs {
    fn load(&self) -> Result<ConfigOverrides> {
        let mut overrides = match &self.config {
            Some(path) => config::load_from_path(path)?,
            None => config::load_or_default()?,
        };
        if let Some(storage) = &self.storage {
            overrides.storage = Some(StorageKind::from_name(storage));
        }
        tracing::debug!("loaded config overrides: {:?}", overrides);
        Ok(overrides)
    }
}

impl ProfileArgs {
    fn path(&self) -> Result<PathBuf> {
        match &self.profile {
            Some(path) => Ok(path.clone()),
            None => profile::profile_path(),
        }
    }

    fn load(&self) -> Result<(PathBuf, BrowserProfile)> {
        let path = self.path()?;
        let profile = BrowserProfile::load(&path)?;
        Ok((path, profile))
    }
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Capture {
                url,
                referrer,
                config,
                profile,
            } => {
                let overrides = config.load()?;
                let (path, mut browser) = profile.load()?;
                run_capture(&mut browser, overrides, &url, referrer.as_deref())?;
                browser.save(&path)?;
            }
            CliCommand::Read {
                key,
                config,
                profile,
            } => {
                let overrides = config.load()?;
                let (_, mut browser) = profile.load()?;
                run_read(&mut browser, overrides, &key)?;
            }
            CliCommand::Dump { profile } => {
                let (_, browser) = profile.load()?;
                run_dump(&browser);
            }
            CliCommand::NewSession { profile } => {
                let (path, mut browser) = profile.load()?;
                run_new_session(&mut browser);
                browser.save(&path)?;
            }
            CliCommand::Completions { shell } => run_completions(shell, &mut Cli::command()),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
