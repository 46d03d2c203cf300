use aws_sdk_resourcegroupstagging::error::DisplayErrorContext;
use aws_sdk_resourcegroupstagging::Client as TaggingClient;
use tracing::{debug, warn};

use crate::account::{self, Account};
use crate::arn::split_arn;
use crate::cli::TagArgs;
use crate::error::{InventoryError, Result};
use crate::pagination;
use crate::report::{self, Row};
use crate::tags::{self, Tag};

pub const FIELD_NAMES: [&str; 10] = [
    "Status Code",
    "Error Code",
    "Error Message",
    "Account ID",
    "Resource ARN",
    "Resource ID",
    "Service",
    "Region",
    "Resource Type",
    "Tags",
];

/// Per-resource result of one reconciliation, as it appears in the report's
/// status columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagOutcome {
    pub status_code: String,
    pub error_code: String,
    pub error_message: String,
}

impl TagOutcome {
    /// Dry-run: the merge was computed but nothing was written.
    pub fn no_op() -> Self {
        Self {
            status_code: "0".to_string(),
            error_code: "No Op".to_string(),
            error_message: String::new(),
        }
    }

    /// The tagging call confirmed the update.
    pub fn ok() -> Self {
        Self {
            status_code: "200".to_string(),
            error_code: "Ok".to_string(),
            error_message: String::new(),
        }
    }

    /// The service reported this ARN as failed; other resources in the batch
    /// are unaffected.
    pub fn failed(status_code: i32, error_code: &str, error_message: &str) -> Self {
        Self {
            status_code: status_code.to_string(),
            error_code: error_code.to_string(),
            error_message: error_message.to_string(),
        }
    }
}

/// Builds one report row from the outcome, the resource's ARN fields, and
/// the merged tag set.
pub fn resource_row(outcome: &TagOutcome, arn: &str, merged: &[Tag]) -> Row {
    let fields = split_arn(arn);
    vec![
        outcome.status_code.clone(),
        outcome.error_code.clone(),
        outcome.error_message.clone(),
        fields.account_id,
        arn.to_string(),
        fields.resource_id,
        fields.service,
        fields.region,
        fields.resource_type,
        tags::render_tags(merged),
    ]
}

/// Case-sensitive substring filter over the resource ARN; an empty filter
/// matches everything.
pub fn arn_matches(arn: &str, filter: &str) -> bool {
    filter.is_empty() || arn.contains(filter)
}

/// Walks every taggable resource matching the service filters, merges the
/// requested tags into each resource's existing set, and (in execute mode)
/// applies the merged set. Returns one report row per matched resource.
pub async fn update_resource_tags(
    client: &TaggingClient,
    requested: &[Tag],
    services: &[String],
    arn_filter: &str,
    execute: bool,
) -> Result<Vec<Row>> {
    let filter_types = services.first().map(String::as_str) != Some("all");
    let mut rows = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let mut request = client.get_resources();
        if filter_types {
            for service in services {
                request = request.resource_type_filters(service);
            }
        }
        if let Some(token) = &cursor {
            request = request.pagination_token(token);
        }
        let response = request
            .send()
            .await
            .map_err(|e| InventoryError::remote("GetResources", DisplayErrorContext(&e)))?;

        for mapping in response.resource_tag_mapping_list() {
            let Some(arn) = mapping.resource_arn() else {
                continue;
            };
            if !arn_matches(arn, arn_filter) {
                continue;
            }

            let existing: Vec<Tag> = mapping
                .tags()
                .iter()
                .map(|t| Tag::new(t.key(), t.value()))
                .collect();
            let merged = tags::merge_tags(&existing, requested);

            let outcome = if execute {
                apply_tags(client, arn, &merged).await?
            } else {
                TagOutcome::no_op()
            };
            rows.push(resource_row(&outcome, arn, &merged));
        }

        cursor = pagination::continuation(response.pagination_token());
        if cursor.is_none() {
            break;
        }
    }

    debug!(count = rows.len(), "resources reconciled");
    Ok(rows)
}

/// Issues the tagging call for one resource. A per-ARN failure reported by
/// the service becomes a failed outcome, not an error, so the rest of the
/// batch still proceeds.
async fn apply_tags(client: &TaggingClient, arn: &str, merged: &[Tag]) -> Result<TagOutcome> {
    let fields = split_arn(arn);
    println!(
        "  Tagging {} {} {}",
        fields.resource_type, fields.resource_id, arn
    );

    let mut request = client.tag_resources().resource_arn_list(arn);
    for tag in merged {
        request = request.tags(&tag.key, &tag.value);
    }
    let response = request
        .send()
        .await
        .map_err(|e| InventoryError::remote("TagResources", DisplayErrorContext(&e)))?;

    let failure = response
        .failed_resources_map()
        .and_then(|failures| failures.get(arn));
    let Some(failure) = failure else {
        return Ok(TagOutcome::ok());
    };

    let error_code = failure
        .error_code()
        .map(|c| c.as_str().to_string())
        .unwrap_or_default();
    let error_message = failure.error_message().unwrap_or_default();
    warn!(%arn, %error_code, "tagging failed");
    println!(
        "  Failed to tag {} {} {}",
        fields.resource_type, fields.resource_id, arn
    );
    println!("     {} - {}\r\n", error_code, error_message);

    Ok(TagOutcome::failed(
        failure.status_code(),
        &error_code,
        error_message,
    ))
}

pub async fn run(args: &TagArgs) -> Result<()> {
    if args.profile.trim().is_empty() {
        return Err(InventoryError::Configuration(
            "no profiles specified".to_string(),
        ));
    }
    if args.tags.trim().is_empty() {
        return Err(InventoryError::Configuration(
            "no tags specified".to_string(),
        ));
    }

    // Malformed specs abort here, before a single API call is made.
    let requested = tags::parse_tag_specs(&args.tags)?;
    let services: Vec<String> = args
        .services
        .split(',')
        .map(|s| s.trim().to_string())
        .collect();

    args.display_startup();

    let mut resource_rows: Vec<Row> = Vec::new();

    for profile in account::profile_list(&args.profile) {
        let account = Account::resolve(profile.as_deref(), args.region.clone()).await?;
        account.display();

        let client = account.tagging_client();
        let rows = update_resource_tags(
            &client,
            &requested,
            &services,
            &args.filter,
            args.execute(),
        )
        .await?;
        println!("{} rows processed.\r\n", rows.len());

        resource_rows.extend(rows);
    }

    report::finish_report(&args.output, &FIELD_NAMES, &resource_rows);
    Ok(())
}
