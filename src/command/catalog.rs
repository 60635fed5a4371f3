//! Ready-made descriptors for the operations the command set exposes.
//!
//! Anything not listed here can still be built directly with
//! [`ApiAction::new`] or [`ApiAction::property`].

use crate::core::domain::{
    model::{
        api_action::{ApiAction, ReturnShape},
        xen_class::XenClass,
    },
    value_object::OpaqueRef,
};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// `get_uuid`
pub fn uuid() -> ApiAction {
    ApiAction::property("uuid", ReturnShape::Scalar)
}

/// `get_record` of the given class.
pub fn record(class: XenClass) -> ApiAction {
    ApiAction::property("record", ReturnShape::Record(class))
}

/// `get_other_config`
pub fn other_config() -> ApiAction {
    ApiAction::property("other_config", ReturnShape::Map)
}

pub fn destroy() -> ApiAction {
    ApiAction::destroy()
}

pub mod cluster {
    use super::*;

    /// Class-level; run it through `CommandService::invoke_static`.
    pub fn pool_create(
        network: &OpaqueRef,
        cluster_stack: &str,
        token_timeout: f64,
        token_timeout_coefficient: f64,
    ) -> ApiAction {
        ApiAction::new("pool_create", ReturnShape::Ref(XenClass::Cluster))
            .arg(network)
            .arg(cluster_stack)
            .arg(token_timeout)
            .arg(token_timeout_coefficient)
    }

    pub fn pool_destroy() -> ApiAction {
        ApiAction::new("pool_destroy", ReturnShape::Nothing)
    }

    pub fn pool_force_destroy() -> ApiAction {
        ApiAction::new("pool_force_destroy", ReturnShape::Nothing)
    }

    pub fn pool_resync() -> ApiAction {
        ApiAction::new("pool_resync", ReturnShape::TargetRecord)
    }

    pub fn cluster_hosts() -> ApiAction {
        ApiAction::property("cluster_hosts", ReturnShape::RefList(XenClass::ClusterHost))
    }

    pub fn network() -> ApiAction {
        ApiAction::property("network", ReturnShape::Ref(XenClass::Network))
    }

    pub fn cluster_config() -> ApiAction {
        ApiAction::property("cluster_config", ReturnShape::Map)
    }

    pub fn token_timeout() -> ApiAction {
        ApiAction::property("token_timeout", ReturnShape::Scalar)
    }

    pub fn pending_forget() -> ApiAction {
        ApiAction::property("pending_forget", ReturnShape::Scalar)
    }
}

pub mod cluster_host {
    use super::*;

    pub fn enable() -> ApiAction {
        ApiAction::new("enable", ReturnShape::TargetRecord)
    }

    pub fn disable() -> ApiAction {
        ApiAction::new("disable", ReturnShape::TargetRecord)
    }

    pub fn force_destroy() -> ApiAction {
        ApiAction::new("force_destroy", ReturnShape::Nothing)
    }
}

pub mod task {
    use super::*;

    pub fn cancel() -> ApiAction {
        ApiAction::new("cancel", ReturnShape::TargetRecord)
    }
}

pub mod host_crashdump {
    use super::*;

    /// Uploads the crashdump to `url`; `options` are passed through untouched.
    pub fn upload(url: &str, options: BTreeMap<String, String>) -> ApiAction {
        let options: Map<String, Value> = options
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect();
        ApiAction::new("upload", ReturnShape::TargetRecord)
            .arg(url)
            .arg(Value::Object(options))
    }

    pub fn destroy() -> ApiAction {
        ApiAction::destroy()
    }
}

pub mod pvs_site {
    use super::*;

    pub fn forget() -> ApiAction {
        ApiAction::new("forget", ReturnShape::Nothing)
    }

    pub fn set_pvs_uuid(value: &str) -> ApiAction {
        ApiAction::new("set_PVS_uuid", ReturnShape::TargetRecord).arg(value)
    }
}

pub mod network_sriov {
    use super::*;

    pub fn destroy() -> ApiAction {
        ApiAction::destroy()
    }
}

pub mod dr_task {
    use super::*;

    pub fn introduced_srs() -> ApiAction {
        ApiAction::property("introduced_SRs", ReturnShape::RefList(XenClass::Sr))
    }
}

pub mod vbd_metrics {
    use super::*;

    pub fn io_read_kbs() -> ApiAction {
        ApiAction::property("io_read_kbs", ReturnShape::Scalar)
    }

    pub fn io_write_kbs() -> ApiAction {
        ApiAction::property("io_write_kbs", ReturnShape::Scalar)
    }

    pub fn last_updated() -> ApiAction {
        ApiAction::property("last_updated", ReturnShape::Scalar)
    }
}
