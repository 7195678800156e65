//! 聚合响应：单次请求的本机指标 + 云端清单计数

use crate::identity::HostIdentity;
use crate::inventory::InventoryCounts;
use crate::sampler::UtilizationSample;
use serde::{Deserialize, Serialize};

/// 一次 /api/stats 请求的完整响应。
///
/// 线上字段名沿用旧版看板脚本的约定（ec2Count/s3Count/rdsCount），
/// 内部命名保持厂商无关。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    pub served_by_ip: String,
    pub hostname: String,
    /// 两位小数的字符串，例如 "42.17"
    pub local_cpu: String,
    pub local_ram: String,
    /// 实际查询清单的区域
    pub region: String,
    #[serde(rename = "ec2Count")]
    pub compute_count: usize,
    #[serde(rename = "s3Count")]
    pub storage_count: usize,
    #[serde(rename = "rdsCount")]
    pub database_count: usize,
}

impl StatsReport {
    /// 纯字段拷贝，不做任何换算。
    pub fn assemble(
        identity: HostIdentity,
        sample: UtilizationSample,
        counts: InventoryCounts,
        region: impl Into<String>,
    ) -> Self {
        Self {
            served_by_ip: identity.address,
            hostname: identity.hostname,
            local_cpu: format!("{:.2}", sample.cpu_percent),
            local_ram: format!("{:.2}", sample.ram_percent),
            region: region.into(),
            compute_count: counts.compute,
            storage_count: counts.storage,
            database_count: counts.database,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::ADDR_UNAVAILABLE;

    fn sample() -> UtilizationSample {
        UtilizationSample {
            cpu_percent: 50.0,
            ram_percent: 75.0,
        }
    }

    fn counts() -> InventoryCounts {
        InventoryCounts {
            compute: 3,
            storage: 2,
            database: 1,
        }
    }

    #[test]
    fn wire_field_names_match_dashboard_contract() {
        let identity = HostIdentity {
            address: "10.0.1.5".into(),
            hostname: "web-1".into(),
        };
        let report = StatsReport::assemble(identity, sample(), counts(), "ap-south-1");
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["servedByIp"], "10.0.1.5");
        assert_eq!(value["hostname"], "web-1");
        assert_eq!(value["localCpu"], "50.00");
        assert_eq!(value["localRam"], "75.00");
        assert_eq!(value["region"], "ap-south-1");
        assert_eq!(value["ec2Count"], 3);
        assert_eq!(value["s3Count"], 2);
        assert_eq!(value["rdsCount"], 1);
    }

    #[test]
    fn assemble_accepts_sentinel_address() {
        let identity = HostIdentity {
            address: ADDR_UNAVAILABLE.into(),
            hostname: "web-1".into(),
        };
        let report = StatsReport::assemble(identity, sample(), counts(), "ap-south-1");
        assert_eq!(report.served_by_ip, ADDR_UNAVAILABLE);
    }

    #[test]
    fn percents_are_string_encoded_with_two_decimals() {
        let identity = HostIdentity {
            address: "10.0.1.5".into(),
            hostname: "web-1".into(),
        };
        let odd = UtilizationSample {
            cpu_percent: 7.5,
            ram_percent: 0.0,
        };
        let report = StatsReport::assemble(identity, odd, counts(), "ap-south-1");
        assert_eq!(report.local_cpu, "7.50");
        assert_eq!(report.local_ram, "0.00");
    }
}
