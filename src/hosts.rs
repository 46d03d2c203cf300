use std::path::PathBuf;

use aws_sdk_ec2::error::DisplayErrorContext;
use aws_sdk_ec2::types::Host;
use aws_sdk_ec2::Client as Ec2Client;
use tracing::debug;

use crate::account::{self, Account};
use crate::arn::ec2_arn;
use crate::cli::ReportArgs;
use crate::error::{InventoryError, Result};
use crate::pagination;
use crate::report::{self, Row};
use crate::tags;

pub const FIELD_NAMES: [&str; 13] = [
    "Account ID",
    "Host ID",
    "Host Name",
    "Host Reservation ID",
    "Availability Zone",
    "Total Instance Capacity",
    "Available Instance Capacity",
    "Instance Type",
    "Available vCPUs",
    "EC2 Instance ID",
    "EC2 ARN",
    "EC2 Name",
    "EC2 Instance Type",
];

/// A Dedicated Host flattened out of the DescribeHosts response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DedicatedHost {
    pub host_id: String,
    pub host_name: String,
    pub reservation_id: String,
    pub availability_zone: String,
    pub total_instance_capacity: i32,
    pub available_instance_capacity: i32,
    pub instance_type: String,
    pub available_vcpus: i32,
    pub instances: Vec<HostInstance>,
}

/// An EC2 instance running on a Dedicated Host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostInstance {
    pub instance_id: String,
    pub instance_type: String,
    pub instance_name: String,
}

/// Retrieves every Dedicated Host in the account, following pagination until
/// the service stops returning a continuation token.
pub async fn list_dedicated_hosts(client: &Ec2Client) -> Result<Vec<DedicatedHost>> {
    let mut hosts = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let mut request = client.describe_hosts();
        if let Some(token) = &cursor {
            request = request.next_token(token);
        }
        let response = request
            .send()
            .await
            .map_err(|e| InventoryError::remote("DescribeHosts", DisplayErrorContext(&e)))?;

        for host in response.hosts() {
            hosts.push(convert_host(client, host).await?);
        }

        cursor = pagination::continuation(response.next_token());
        if cursor.is_none() {
            break;
        }
    }

    debug!(count = hosts.len(), "dedicated hosts enumerated");
    Ok(hosts)
}

async fn convert_host(client: &Ec2Client, host: &Host) -> Result<DedicatedHost> {
    let host_tags = tags::from_ec2_tags(host.tags());

    // Capacity is reported against the first advertised instance type, as
    // Dedicated Hosts with a fixed instance type carry exactly one entry.
    let (total_capacity, available_capacity, instance_type, available_vcpus) =
        match host.available_capacity() {
            Some(capacity) => {
                let first = capacity.available_instance_capacity().first();
                (
                    first.and_then(|c| c.total_capacity()).unwrap_or_default(),
                    first.and_then(|c| c.available_capacity()).unwrap_or_default(),
                    first
                        .and_then(|c| c.instance_type())
                        .unwrap_or_default()
                        .to_string(),
                    capacity.available_v_cpus().unwrap_or_default(),
                )
            }
            None => (0, 0, String::new(), 0),
        };

    let mut instances = Vec::new();
    for instance in host.instances() {
        let instance_id = instance.instance_id().unwrap_or_default().to_string();
        let instance_name = instance_name(client, &instance_id).await?;
        instances.push(HostInstance {
            instance_id,
            instance_type: instance.instance_type().unwrap_or_default().to_string(),
            instance_name,
        });
    }

    Ok(DedicatedHost {
        host_id: host.host_id().unwrap_or_default().to_string(),
        host_name: tags::name_tag(&host_tags),
        reservation_id: host
            .host_reservation_id()
            .unwrap_or("<none>")
            .to_string(),
        availability_zone: host.availability_zone().unwrap_or_default().to_string(),
        total_instance_capacity: total_capacity,
        available_instance_capacity: available_capacity,
        instance_type,
        available_vcpus,
        instances,
    })
}

/// Resolves an instance's Name tag with a dedicated DescribeInstances call;
/// DescribeHosts does not carry instance tags.
async fn instance_name(client: &Ec2Client, instance_id: &str) -> Result<String> {
    let response = client
        .describe_instances()
        .instance_ids(instance_id)
        .send()
        .await
        .map_err(|e| InventoryError::remote("DescribeInstances", DisplayErrorContext(&e)))?;

    let instance_tags = response
        .reservations()
        .first()
        .map(|r| r.instances())
        .unwrap_or_default()
        .first()
        .map(|i| tags::from_ec2_tags(i.tags()))
        .unwrap_or_default();

    Ok(tags::name_tag(&instance_tags))
}

/// One row per instance on the host; a host with no instances still yields a
/// single row with the instance columns empty, so it is never dropped from
/// the report.
pub fn host_rows(host: &DedicatedHost, account_id: &str, region: &str) -> Vec<Row> {
    let parent = |instance: [String; 4]| -> Row {
        let mut row = vec![
            account_id.to_string(),
            host.host_id.clone(),
            host.host_name.clone(),
            host.reservation_id.clone(),
            host.availability_zone.clone(),
            host.total_instance_capacity.to_string(),
            host.available_instance_capacity.to_string(),
            host.instance_type.clone(),
            host.available_vcpus.to_string(),
        ];
        row.extend(instance);
        row
    };

    if host.instances.is_empty() {
        return vec![parent(Default::default())];
    }

    host.instances
        .iter()
        .map(|instance| {
            parent([
                instance.instance_id.clone(),
                ec2_arn(region, account_id, "instance", &instance.instance_id),
                instance.instance_name.clone(),
                instance.instance_type.clone(),
            ])
        })
        .collect()
}

pub async fn run(args: &ReportArgs) -> Result<()> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from("hosts.csv"));
    args.display_startup(&output);

    let mut host_rows_all: Vec<Row> = Vec::new();

    for profile in account::profile_list(&args.profile) {
        let account = Account::resolve(profile.as_deref(), args.region.clone()).await?;
        account.display();

        let client = account.ec2_client();
        let hosts = list_dedicated_hosts(&client).await?;

        let rows: Vec<Row> = hosts
            .iter()
            .flat_map(|h| host_rows(h, &account.account_id, &account.region))
            .collect();
        println!("{} rows processed.\r\n", rows.len());

        host_rows_all.extend(rows);
    }

    report::finish_report(&output, &FIELD_NAMES, &host_rows_all);
    Ok(())
}
