use crate::command::application::service::resolve_service::{parse_ref, parse_ref_list};
use crate::core::{
    domain::{
        error::{XenError, XenResult},
        model::{
            api_action::{ApiCall, ReturnShape},
            invocation::{InvocationMode, XenOutput},
            record::XenRecord,
            xen_class::XenClass,
        },
        value_object::OpaqueRef,
    },
    infrastructure::session::Session,
};
use serde_json::Value;
use std::collections::BTreeMap;

/// Converts a raw call result into the shape its operation promises.
///
/// Reference-shaped results are followed with `get_record`, one call per
/// non-null reference. Null references project to nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProjectionService;

impl ProjectionService {
    pub fn new() -> Self {
        Self
    }

    /// Projects the reply to `call`; class, target and error context come from the call.
    pub async fn execute(
        &self,
        session: &Session,
        call: &ApiCall,
        shape: ReturnShape,
        value: Value,
    ) -> XenResult<XenOutput> {
        let class = call.class();
        let target = call.target();
        match shape {
            ReturnShape::Nothing => Ok(XenOutput::None),
            ReturnShape::Scalar => Ok(XenOutput::Value(value)),
            ReturnShape::TargetRecord => match target {
                Some(target) if !target.is_null() => {
                    Ok(XenOutput::Record(self.fetch(session, class, target).await?))
                }
                _ => Ok(XenOutput::None),
            },
            ReturnShape::Map => match value {
                Value::Object(map) => Ok(XenOutput::Map(map.into_iter().collect())),
                Value::Null => Ok(XenOutput::Map(BTreeMap::new())),
                other => Err(XenError::Response(format!(
                    "{} returned {} where a map was expected",
                    call.name(),
                    other
                ))),
            },
            ReturnShape::Record(of) => {
                let record = XenRecord::from_value(of, value)?;
                Ok(XenOutput::Record(match target {
                    Some(target) if of == class => record.with_ref(target.clone()),
                    _ => record,
                }))
            }
            ReturnShape::Ref(of) => {
                let reference = parse_ref(value, &call.name())?;
                if reference.is_null() {
                    return Ok(XenOutput::None);
                }
                Ok(XenOutput::Record(self.fetch(session, of, &reference).await?))
            }
            ReturnShape::RefList(of) => {
                let references = parse_ref_list(value, &call.name())?;
                let mut records = Vec::with_capacity(references.len());
                for reference in references.iter().filter(|r| !r.is_null()) {
                    records.push(self.fetch(session, of, reference).await?);
                }
                Ok(XenOutput::Records(records))
            }
        }
    }

    /// `Class.get_record(reference)`, stamped with the reference.
    pub async fn fetch(
        &self,
        session: &Session,
        class: XenClass,
        reference: &OpaqueRef,
    ) -> XenResult<XenRecord> {
        let call = ApiCall::on(class, "get_record", reference);
        let value = session.call(&call, InvocationMode::Sync).await?;
        Ok(XenRecord::from_value(class, value)?.with_ref(reference.clone()))
    }
}
