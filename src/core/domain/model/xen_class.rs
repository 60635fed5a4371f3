//! The XenAPI object classes the command set operates on.

use crate::core::domain::error::{ValidationError, XenResult};
use std::fmt;
use std::str::FromStr;

/// A XenAPI object class.
///
/// The wire name ([`XenClass::api_name`]) prefixes every remote method, e.g.
/// `SR.get_by_uuid` or `Async.Cluster.pool_destroy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XenClass {
    Cluster,
    ClusterHost,
    DrTask,
    Host,
    HostCrashdump,
    HostPatch,
    Network,
    NetworkSriov,
    Pbd,
    PifMetrics,
    Pool,
    PvsCacheStorage,
    PvsSite,
    Sr,
    Task,
    Vbd,
    VbdMetrics,
    Vdi,
    Vgpu,
    Vm,
    VmAppliance,
    Vmss,
}

impl XenClass {
    pub const ALL: [XenClass; 22] = [
        XenClass::Cluster,
        XenClass::ClusterHost,
        XenClass::DrTask,
        XenClass::Host,
        XenClass::HostCrashdump,
        XenClass::HostPatch,
        XenClass::Network,
        XenClass::NetworkSriov,
        XenClass::Pbd,
        XenClass::PifMetrics,
        XenClass::Pool,
        XenClass::PvsCacheStorage,
        XenClass::PvsSite,
        XenClass::Sr,
        XenClass::Task,
        XenClass::Vbd,
        XenClass::VbdMetrics,
        XenClass::Vdi,
        XenClass::Vgpu,
        XenClass::Vm,
        XenClass::VmAppliance,
        XenClass::Vmss,
    ];

    /// The class name as it appears in remote method names.
    pub fn api_name(self) -> &'static str {
        match self {
            XenClass::Cluster => "Cluster",
            XenClass::ClusterHost => "Cluster_host",
            XenClass::DrTask => "DR_task",
            XenClass::Host => "host",
            XenClass::HostCrashdump => "host_crashdump",
            XenClass::HostPatch => "host_patch",
            XenClass::Network => "network",
            XenClass::NetworkSriov => "network_sriov",
            XenClass::Pbd => "PBD",
            XenClass::PifMetrics => "PIF_metrics",
            XenClass::Pool => "pool",
            XenClass::PvsCacheStorage => "PVS_cache_storage",
            XenClass::PvsSite => "PVS_site",
            XenClass::Sr => "SR",
            XenClass::Task => "task",
            XenClass::Vbd => "VBD",
            XenClass::VbdMetrics => "VBD_metrics",
            XenClass::Vdi => "VDI",
            XenClass::Vgpu => "VGPU",
            XenClass::Vm => "VM",
            XenClass::VmAppliance => "VM_appliance",
            XenClass::Vmss => "VMSS",
        }
    }

    /// The name a command front end uses for the inline-object parameter.
    pub fn param_name(self) -> &'static str {
        match self {
            XenClass::Cluster => "Cluster",
            XenClass::ClusterHost => "ClusterHost",
            XenClass::DrTask => "DRTask",
            XenClass::Host => "XenHost",
            XenClass::HostCrashdump => "HostCrashdump",
            XenClass::HostPatch => "HostPatch",
            XenClass::Network => "Network",
            XenClass::NetworkSriov => "NetworkSriov",
            XenClass::Pbd => "PBD",
            XenClass::PifMetrics => "PIFMetrics",
            XenClass::Pool => "Pool",
            XenClass::PvsCacheStorage => "PVSCacheStorage",
            XenClass::PvsSite => "PVSSite",
            XenClass::Sr => "SR",
            XenClass::Task => "Task",
            XenClass::Vbd => "VBD",
            XenClass::VbdMetrics => "VBDMetrics",
            XenClass::Vdi => "VDI",
            XenClass::Vgpu => "VGPU",
            XenClass::Vm => "VM",
            XenClass::VmAppliance => "VMAppliance",
            XenClass::Vmss => "VMSS",
        }
    }

    /// Whether the server offers `get_by_name_label` for this class.
    pub fn supports_name_lookup(self) -> bool {
        matches!(
            self,
            XenClass::Host
                | XenClass::HostPatch
                | XenClass::Network
                | XenClass::PvsSite
                | XenClass::Sr
                | XenClass::Task
                | XenClass::Vdi
                | XenClass::Vm
                | XenClass::VmAppliance
                | XenClass::Vmss
        )
    }

    /// The identifier parameters a front end accepts for this class.
    pub fn accepted_parameters(self) -> Vec<String> {
        let mut names = vec![
            self.param_name().to_string(),
            "Ref".to_string(),
            "Uuid".to_string(),
        ];
        if self.supports_name_lookup() {
            names.push("Name".to_string());
        }
        names
    }

    /// Builds the qualified method name, e.g. `SR.add_tags`.
    pub fn method(self, method: &str) -> String {
        format!("{}.{}", self.api_name(), method)
    }
}

impl fmt::Display for XenClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_name())
    }
}

impl FromStr for XenClass {
    type Err = crate::core::domain::error::XenError;

    /// Accepts either the wire name or the front-end name, case-insensitively.
    fn from_str(s: &str) -> XenResult<Self> {
        XenClass::ALL
            .into_iter()
            .find(|c| c.api_name().eq_ignore_ascii_case(s) || c.param_name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                ValidationError::Field {
                    field: "class".to_string(),
                    message: format!("Unknown XenAPI class '{}'", s),
                }
                .into()
            })
    }
}
