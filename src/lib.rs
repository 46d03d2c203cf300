//! awsinv - AWS inventory and bulk-tagging CSV reports.
//!
//! Three subcommands, one pipeline: resolve the account for each profile,
//! enumerate resources through the paginated listing API, flatten each record
//! into fixed-width rows (reconciling tags first, for `tag`), and write the
//! accumulated rows as a CSV report.
//!
//! ```bash
//! # Dedicated Hosts report across two accounts
//! awsinv hosts -p "dev,prod" -o hosts.csv
//!
//! # EBS volume report
//! awsinv ebs -p dev -r us-east-1
//!
//! # Dry-run tag reconciliation, then apply
//! awsinv tag -p dev -t "env=dev,team=infra" -f vol-
//! awsinv tag -p dev -t "env=dev,team=infra" -f vol- -x yes
//! ```

pub mod account;
pub mod arn;
pub mod cli;
pub mod ebs;
pub mod error;
pub mod hosts;
pub mod pagination;
pub mod report;
pub mod tagging;
pub mod tags;

pub use cli::{Cli, Command, ReportArgs, TagArgs};
pub use error::{InventoryError, Result};
