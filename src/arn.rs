/// Builds an EC2 ARN from its parts: `arn:aws:ec2:<region>:<account>:<kind>/<id>`.
pub fn ec2_arn(region: &str, account_id: &str, kind: &str, id: &str) -> String {
    format!("arn:aws:ec2:{}:{}:{}/{}", region, account_id, kind, id)
}

/// Colon-separated fields of an ARN, as the tag report columns want them.
/// `resource_id` is only present for seven-part ARNs; most services pack
/// `type/id` into the sixth field and that field is reported as-is.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ArnFields {
    pub service: String,
    pub region: String,
    pub account_id: String,
    pub resource_type: String,
    pub resource_id: String,
}

pub fn split_arn(arn: &str) -> ArnFields {
    let parts: Vec<&str> = arn.split(':').collect();
    let field = |i: usize| parts.get(i).copied().unwrap_or("").to_string();

    ArnFields {
        service: field(2),
        region: field(3),
        account_id: field(4),
        resource_type: field(5),
        resource_id: field(6),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ec2_arn_uses_fixed_template() {
        assert_eq!(
            ec2_arn("us-east-1", "123456789012", "volume", "vol-0abc"),
            "arn:aws:ec2:us-east-1:123456789012:volume/vol-0abc"
        );
    }

    #[test]
    fn split_seven_part_arn() {
        let fields = split_arn("arn:aws:sns:us-west-2:123456789012:topic:alerts");
        assert_eq!(fields.service, "sns");
        assert_eq!(fields.region, "us-west-2");
        assert_eq!(fields.account_id, "123456789012");
        assert_eq!(fields.resource_type, "topic");
        assert_eq!(fields.resource_id, "alerts");
    }

    #[test]
    fn six_part_arn_has_empty_resource_id() {
        let fields = split_arn("arn:aws:ec2:us-east-1:123456789012:volume/vol-0abc");
        assert_eq!(fields.resource_type, "volume/vol-0abc");
        assert_eq!(fields.resource_id, "");
    }
}
