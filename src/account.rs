use aws_config::meta::region::RegionProviderChain;
use aws_config::BehaviorVersion;
use aws_sdk_sts::error::DisplayErrorContext;
use aws_types::region::Region;
use aws_types::SdkConfig;
use tracing::debug;

use crate::error::{InventoryError, Result};

/// An authenticated session for one profile: resolved account id, resolved
/// region, and typed clients for the services the reports need.
pub struct Account {
    pub profile_name: Option<String>,
    pub account_id: String,
    pub region: String,
    config: SdkConfig,
}

impl Account {
    /// Loads credentials for the named profile (or the environment when
    /// `None`), with an optional region override taking precedence over the
    /// profile's own region, then resolves the account id via STS.
    pub async fn resolve(profile: Option<&str>, region: Option<String>) -> Result<Self> {
        let region_provider =
            RegionProviderChain::first_try(region.map(Region::new)).or_default_provider();

        let mut loader =
            aws_config::defaults(BehaviorVersion::v2024_03_28()).region(region_provider);
        if let Some(profile) = profile {
            loader = loader.profile_name(profile);
        }
        let config = loader.load().await;

        let region = config
            .region()
            .map(|r| r.to_string())
            .unwrap_or_default();
        debug!(?profile, %region, "loaded SDK config");

        let sts = aws_sdk_sts::Client::new(&config);
        let identity = sts
            .get_caller_identity()
            .send()
            .await
            .map_err(|e| InventoryError::remote("GetCallerIdentity", DisplayErrorContext(&e)))?;
        let account_id = identity.account().unwrap_or_default().to_string();

        Ok(Self {
            profile_name: profile.map(str::to_string),
            account_id,
            region,
            config,
        })
    }

    pub fn ec2_client(&self) -> aws_sdk_ec2::Client {
        aws_sdk_ec2::Client::new(&self.config)
    }

    pub fn tagging_client(&self) -> aws_sdk_resourcegroupstagging::Client {
        aws_sdk_resourcegroupstagging::Client::new(&self.config)
    }

    pub fn display(&self) {
        println!("Processing...");
        println!("  Account ID: {}", self.account_id);
        println!("  Region:     {}", self.region);
        match &self.profile_name {
            Some(profile) => println!("  Profile:    {}", profile),
            None => println!("  Profile:    Using env configuration"),
        }
    }
}

/// Splits a comma-separated profile list; a blank entry means "use the
/// environment's credentials" rather than a named profile.
pub fn profile_list(spec: &str) -> Vec<Option<String>> {
    spec.split(',')
        .map(str::trim)
        .map(|p| {
            if p.is_empty() {
                None
            } else {
                Some(p.to_string())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::profile_list;

    #[test]
    fn splits_and_trims_profiles() {
        assert_eq!(
            profile_list("dev, prod"),
            vec![Some("dev".to_string()), Some("prod".to_string())]
        );
    }

    #[test]
    fn blank_entry_means_env_credentials() {
        assert_eq!(profile_list(""), vec![None]);
    }
}
