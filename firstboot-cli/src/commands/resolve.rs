use std::path::PathBuf;

use clap::{Args, ValueEnum};
use firstboot::precedence::FragmentSummary;
use firstboot::{ConfigPipeline, FetchOptions, Platform, ResolutionOutcome};
use firstboot_shared::constants::env;
use serde::Serialize;

use super::base_options;

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Directory holding base.ign and user.ign
    #[arg(long, env = env::SYSTEM_CONFIG_DIR)]
    pub system_dir: Option<PathBuf>,

    /// Provider platform(s), tried in order
    #[arg(long = "platform", env = env::PLATFORM, value_delimiter = ',')]
    pub platforms: Vec<Platform>,

    /// Config file read by the `file` platform
    #[arg(long, env = env::CONFIG_FILE)]
    pub config_file: Option<PathBuf>,

    /// Directory for temporary mount points
    #[arg(long, env = env::MOUNT_BASE)]
    pub mount_base: Option<PathBuf>,

    /// blkid binary
    #[arg(long, env = env::BLKID)]
    pub blkid: Option<PathBuf>,

    /// Mount optical drives even when they report no disc
    #[arg(long)]
    pub no_media_check: bool,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

impl ResolveArgs {
    /// Flags override the options file field by field.
    fn apply(self, mut options: FetchOptions) -> anyhow::Result<FetchOptions> {
        if let Some(dir) = self.system_dir {
            options.system_config_dir = dir;
        }
        if !self.platforms.is_empty() {
            options.platforms = self.platforms;
        }
        if self.config_file.is_some() {
            options.config_file = self.config_file;
        }
        if let Some(base) = self.mount_base {
            options.mount_base = base;
        }
        if let Some(blkid) = self.blkid {
            options.blkid_path = blkid;
        }
        if self.no_media_check {
            options.check_media = false;
        }
        options.validate()?;
        Ok(options)
    }
}

#[derive(Serialize)]
struct Report {
    configured: bool,
    fragments: Vec<FragmentSummary>,
}

pub fn execute(args: ResolveArgs, global: &crate::cli::GlobalFlags) -> anyhow::Result<()> {
    let format = args.format;
    let options = args.apply(base_options(global)?)?;
    tracing::debug!(?options, "Resolving first-boot configuration");

    let outcome = ConfigPipeline::from_options(&options).acquire()?;

    match format {
        OutputFormat::Json => print_json(&outcome)?,
        OutputFormat::Text => print_text(&outcome),
    }
    Ok(())
}

fn print_json(outcome: &ResolutionOutcome) -> anyhow::Result<()> {
    let report = Report {
        configured: outcome.applied().next().is_some(),
        fragments: outcome.summary(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn print_text(outcome: &ResolutionOutcome) {
    if outcome.is_empty() {
        println!("no configuration");
        return;
    }
    println!("{:<10} {:<10} {:>8}  SHA256", "SOURCE", "STATUS", "BYTES");
    for entry in outcome.summary() {
        println!(
            "{:<10} {:<10} {:>8}  {}",
            entry.provenance.as_str(),
            entry.disposition.as_str(),
            entry.bytes,
            entry.sha256
        );
    }
}
