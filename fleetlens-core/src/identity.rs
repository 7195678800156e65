//! 主机身份：标识“这次请求由哪台机器服务”

use if_addrs::{get_if_addrs, IfAddr};
use sysinfo::System;

/// 找不到非回环 IPv4 接口时的占位值（区别于错误）
pub const ADDR_UNAVAILABLE: &str = "N/A";

/// 响应中标识本机的地址与主机名。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostIdentity {
    pub address: String,
    pub hostname: String,
}

impl HostIdentity {
    /// 探测本机身份。两个字段都是尽力而为，失败时退回占位值，从不报错。
    pub fn detect() -> Self {
        Self {
            address: local_address(),
            hostname: local_host_name(),
        }
    }
}

/// 第一个非回环 IPv4 接口地址；没有则返回 [`ADDR_UNAVAILABLE`]。
pub fn local_address() -> String {
    let Ok(interfaces) = get_if_addrs() else {
        return ADDR_UNAVAILABLE.to_string();
    };
    interfaces
        .into_iter()
        .filter(|iface| !iface.is_loopback())
        .find_map(|iface| match iface.addr {
            IfAddr::V4(v4) => Some(v4.ip.to_string()),
            _ => None,
        })
        .unwrap_or_else(|| ADDR_UNAVAILABLE.to_string())
}

pub fn local_host_name() -> String {
    System::host_name().unwrap_or_else(|| "unknown".to_string())
}
