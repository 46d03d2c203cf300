use std::path::PathBuf;

use aws_sdk_ec2::error::DisplayErrorContext;
use aws_sdk_ec2::types::Volume;
use aws_sdk_ec2::Client as Ec2Client;
use tracing::debug;

use crate::account::{self, Account};
use crate::arn::ec2_arn;
use crate::cli::ReportArgs;
use crate::error::{InventoryError, Result};
use crate::pagination;
use crate::report::{self, Row};
use crate::tags::{self, Tag};

pub const FIELD_NAMES: [&str; 13] = [
    "Account ID",
    "EC2 ARN",
    "EC2 Instance ID",
    "Volume ARN",
    "Volume ID",
    "Name",
    "Device",
    "Drive",
    "Type",
    "Size",
    "IOPS",
    "State",
    "Tags",
];

/// An EBS volume flattened out of the DescribeVolumes response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EbsVolume {
    pub volume_id: String,
    pub volume_type: String,
    pub size: i32,
    pub iops: Option<i32>,
    pub tags: Vec<Tag>,
    pub attachments: Vec<VolumeAttachment>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolumeAttachment {
    pub instance_id: String,
    pub device: String,
    pub state: String,
}

/// Retrieves every EBS volume in the account, following pagination until the
/// service stops returning a continuation token.
pub async fn list_ebs_volumes(client: &Ec2Client) -> Result<Vec<EbsVolume>> {
    let mut volumes = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let mut request = client.describe_volumes();
        if let Some(token) = &cursor {
            request = request.next_token(token);
        }
        let response = request
            .send()
            .await
            .map_err(|e| InventoryError::remote("DescribeVolumes", DisplayErrorContext(&e)))?;

        volumes.extend(response.volumes().iter().map(convert_volume));

        cursor = pagination::continuation(response.next_token());
        if cursor.is_none() {
            break;
        }
    }

    debug!(count = volumes.len(), "ebs volumes enumerated");
    Ok(volumes)
}

fn convert_volume(volume: &Volume) -> EbsVolume {
    let attachments = volume
        .attachments()
        .iter()
        .map(|a| VolumeAttachment {
            instance_id: a.instance_id().unwrap_or_default().to_string(),
            device: a.device().unwrap_or_default().to_string(),
            state: a
                .state()
                .map(|s| s.as_str().to_string())
                .unwrap_or_default(),
        })
        .collect();

    EbsVolume {
        volume_id: volume.volume_id().unwrap_or_default().to_string(),
        volume_type: volume
            .volume_type()
            .map(|t| t.as_str().to_string())
            .unwrap_or_default(),
        size: volume.size().unwrap_or_default(),
        iops: volume.iops(),
        tags: tags::from_ec2_tags(volume.tags()),
        attachments,
    }
}

/// One row per attachment; an unattached volume still yields a single row
/// with the attachment columns empty. Magnetic (`standard`) volumes have no
/// provisioned IOPS, so that column stays empty rather than zero.
pub fn volume_rows(volume: &EbsVolume, account_id: &str, region: &str) -> Vec<Row> {
    let iops = if volume.volume_type == "standard" {
        String::new()
    } else {
        volume.iops.map(|i| i.to_string()).unwrap_or_default()
    };
    let name = tags::name_tag(&volume.tags);
    let drive = tags::tag_value(&volume.tags, "drive");
    let volume_arn = ec2_arn(region, account_id, "volume", &volume.volume_id);
    let joined_tags = tags::join_tags(&volume.tags);

    let row = |attachment: &VolumeAttachment, ec2_arn_value: String| -> Row {
        vec![
            account_id.to_string(),
            ec2_arn_value,
            attachment.instance_id.clone(),
            volume_arn.clone(),
            volume.volume_id.clone(),
            name.clone(),
            attachment.device.clone(),
            drive.clone(),
            volume.volume_type.clone(),
            volume.size.to_string(),
            iops.clone(),
            attachment.state.clone(),
            joined_tags.clone(),
        ]
    };

    if volume.attachments.is_empty() {
        return vec![row(&VolumeAttachment::default(), String::new())];
    }

    volume
        .attachments
        .iter()
        .map(|attachment| {
            row(
                attachment,
                ec2_arn(region, account_id, "instance", &attachment.instance_id),
            )
        })
        .collect()
}

pub async fn run(args: &ReportArgs) -> Result<()> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from("volumes.csv"));
    args.display_startup(&output);

    let mut volume_rows_all: Vec<Row> = Vec::new();

    for profile in account::profile_list(&args.profile) {
        let account = Account::resolve(profile.as_deref(), args.region.clone()).await?;
        account.display();

        let client = account.ec2_client();
        let volumes = list_ebs_volumes(&client).await?;

        let rows: Vec<Row> = volumes
            .iter()
            .flat_map(|v| volume_rows(v, &account.account_id, &account.region))
            .collect();
        println!("{} rows processed.\r\n", rows.len());

        volume_rows_all.extend(rows);
    }

    report::finish_report(&output, &FIELD_NAMES, &volume_rows_all);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gp3_volume() -> EbsVolume {
        EbsVolume {
            volume_id: "vol-0abc".to_string(),
            volume_type: "gp3".to_string(),
            size: 100,
            iops: Some(3000),
            tags: vec![
                Tag::new("Name", "data-01"),
                Tag::new("drive", "d"),
                Tag::new("env", "prod"),
            ],
            attachments: vec![],
        }
    }

    #[test]
    fn unattached_volume_yields_one_row_with_empty_attachment_columns() {
        let rows = volume_rows(&gp3_volume(), "123456789012", "us-east-1");

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), FIELD_NAMES.len());
        assert_eq!(rows[0][1], "");
        assert_eq!(rows[0][2], "");
        assert_eq!(rows[0][6], "");
        assert_eq!(rows[0][11], "");
        assert_eq!(
            rows[0][3],
            "arn:aws:ec2:us-east-1:123456789012:volume/vol-0abc"
        );
        assert_eq!(rows[0][5], "data-01");
        assert_eq!(rows[0][7], "d");
        assert_eq!(rows[0][12], "Name:data-01,drive:d,env:prod");
    }

    #[test]
    fn attached_volume_yields_one_row_per_attachment() {
        let mut volume = gp3_volume();
        volume.attachments = vec![
            VolumeAttachment {
                instance_id: "i-aaa".to_string(),
                device: "/dev/sdf".to_string(),
                state: "attached".to_string(),
            },
            VolumeAttachment {
                instance_id: "i-bbb".to_string(),
                device: "/dev/sdg".to_string(),
                state: "attaching".to_string(),
            },
        ];

        let rows = volume_rows(&volume, "123456789012", "us-east-1");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][4], rows[1][4]);
        assert_eq!(
            rows[0][1],
            "arn:aws:ec2:us-east-1:123456789012:instance/i-aaa"
        );
        assert_eq!(rows[1][2], "i-bbb");
        assert_eq!(rows[1][6], "/dev/sdg");
        assert_eq!(rows[1][11], "attaching");
    }

    #[test]
    fn standard_volume_has_empty_iops_column() {
        let volume = EbsVolume {
            volume_id: "vol-0std".to_string(),
            volume_type: "standard".to_string(),
            size: 8,
            iops: Some(120),
            ..Default::default()
        };
        let rows = volume_rows(&volume, "123456789012", "us-east-1");
        assert_eq!(rows[0][10], "");
    }

    #[test]
    fn missing_iops_renders_empty_not_zero() {
        let volume = EbsVolume {
            volume_id: "vol-0gp2".to_string(),
            volume_type: "gp2".to_string(),
            size: 8,
            iops: None,
            ..Default::default()
        };
        let rows = volume_rows(&volume, "123456789012", "us-east-1");
        assert_eq!(rows[0][10], "");
    }
}
