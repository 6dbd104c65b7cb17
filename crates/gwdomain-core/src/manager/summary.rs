//! Operator summary of resolved domains

use crate::model::DomainRecord;

/// Render the target domain and hosted zone of every resolved record
///
/// Records without `domain_info` are left out; an empty result means there
/// is nothing to report.
pub fn summary_lines(records: &[DomainRecord]) -> Vec<String> {
    let mut lines = Vec::new();
    for record in records {
        if let Some(ref info) = record.domain_info {
            lines.push(format!("Domain Name: {}", record.given_domain_name()));
            lines.push(format!("Target Domain: {}", info.domain_name));
            lines.push(format!("Hosted Zone Id: {}", info.hosted_zone_id));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DomainInfo;

    #[test]
    fn test_summary_skips_unresolved_records() {
        let mut resolved = DomainRecord::new("api.example.com");
        resolved.domain_info = Some(DomainInfo {
            domain_name: "d-abc.execute-api.us-east-1.amazonaws.com".to_string(),
            hosted_zone_id: "Z1UJRXOUMOOFQ8".to_string(),
            security_policy: None,
        });
        let unresolved = DomainRecord::new("old.example.com");

        let lines = summary_lines(&[resolved, unresolved]);
        assert_eq!(
            lines,
            vec![
                "Domain Name: api.example.com",
                "Target Domain: d-abc.execute-api.us-east-1.amazonaws.com",
                "Hosted Zone Id: Z1UJRXOUMOOFQ8",
            ]
        );
    }

    #[test]
    fn test_summary_empty() {
        assert!(summary_lines(&[DomainRecord::new("api.example.com")]).is_empty());
    }
}
