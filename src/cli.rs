use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

/// AWS inventory and bulk-tagging CSV reports.
#[derive(Parser, Debug)]
#[command(name = "awsinv", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a CSV file listing all Dedicated Hosts in the specified account(s).
    Hosts(ReportArgs),
    /// Create a CSV file listing all EBS volumes in the specified account(s).
    Ebs(ReportArgs),
    /// Tag all taggable resources matching the input filters and report the outcome.
    Tag(TagArgs),
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Comma-separated list of profiles (from the credentials file) to be used.
    #[arg(short, long)]
    pub profile: String,

    /// Set a region if not already included in the profile.
    #[arg(short, long)]
    pub region: Option<String>,

    /// Output (CSV) filename.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct TagArgs {
    /// Comma-separated list of key=value pairs for tags to be updated.
    #[arg(short, long, default_value = "")]
    pub tags: String,

    /// Comma-separated list of AWS services for which the tags should be updated.
    #[arg(short, long, default_value = "all")]
    pub services: String,

    /// Only resources whose ARN contains this text are tagged (case sensitive).
    #[arg(short, long, default_value = "")]
    pub filter: String,

    /// Comma-separated list of profiles (from the credentials file) to be used.
    #[arg(short, long, default_value = "")]
    pub profile: String,

    /// Runs in 'what if' mode by default. Set to 'yes' to update the tag values.
    #[arg(short = 'x', long = "execute", default_value = "no")]
    pub execute: String,

    /// Set a region if not already included in the profile.
    #[arg(short, long)]
    pub region: Option<String>,

    /// Output (CSV) filename.
    #[arg(short, long, default_value = "resources.csv")]
    pub output: PathBuf,
}

impl ReportArgs {
    pub fn display_startup(&self, output: &Path) {
        println!("*******************************************");
        println!(
            "  Region:     {}",
            self.region.as_deref().unwrap_or("<profile default>")
        );
        println!("  Profile:    {}", self.profile);
        println!("  Date:       {}", chrono::Local::now().format("%c"));
        println!("  Output:     {}", output.display());
        println!("*******************************************");
    }
}

impl TagArgs {
    pub fn execute(&self) -> bool {
        self.execute == "yes"
    }

    pub fn display_startup(&self) {
        println!("*******************************************");
        println!(
            "  Region:       {}",
            self.region.as_deref().unwrap_or("<profile default>")
        );
        println!("  Profile:      {}", self.profile);
        println!("  AWS Services: {}", self.services);
        println!(
            "  Filter:       {}",
            if self.filter.is_empty() {
                "no filter"
            } else {
                &self.filter
            }
        );
        println!("  Tags:         {}", self.tags);
        println!("  Execute:      {}", self.execute);
        println!("  Date:         {}", chrono::Local::now().format("%c"));
        println!("  Output:       {}", self.output.display());
        println!("*******************************************");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_defaults_to_dry_run() {
        let cli = Cli::parse_from(["awsinv", "tag", "-p", "dev", "-t", "env=dev"]);
        let Command::Tag(args) = cli.command else {
            panic!("expected tag subcommand");
        };
        assert!(!args.execute());
        assert_eq!(args.services, "all");
        assert_eq!(args.output, PathBuf::from("resources.csv"));
    }

    #[test]
    fn execute_yes_enables_mutation() {
        let cli = Cli::parse_from(["awsinv", "tag", "-p", "dev", "-t", "env=dev", "-x", "yes"]);
        let Command::Tag(args) = cli.command else {
            panic!("expected tag subcommand");
        };
        assert!(args.execute());
    }

    #[test]
    fn hosts_requires_profile() {
        assert!(Cli::try_parse_from(["awsinv", "hosts"]).is_err());
    }
}
