use crate::tests::fake_xapi::{FakeXapi, SESSION};
use crate::{
    ApiAction, InvocationMode, MutationSet, ObjectUuid, ReturnShape, ValidationError, XenClass,
    XenClient, XenError, XenOutput, catalog,
};
use serde_json::json;
use std::sync::Arc;

fn client_on(fake: &FakeXapi) -> XenClient {
    XenClient::builder()
        .host("xen.example.com")
        .unwrap()
        .credentials("root", "secret")
        .unwrap()
        .secure(true)
        .transport(Arc::new(fake.clone()))
        .build()
        .unwrap()
}

#[test]
fn test_builder_requires_host_and_credentials() {
    let err = XenClient::builder().credentials("root", "secret").unwrap().build().unwrap_err();
    assert!(matches!(
        err.validation(),
        Some(ValidationError::Field { field, .. }) if field == "host"
    ));

    let err = XenClient::builder().host("xen.example.com").unwrap().build().unwrap_err();
    assert!(matches!(
        err.validation(),
        Some(ValidationError::Field { field, .. }) if field == "username"
    ));
}

#[test]
fn test_builder_rejects_invalid_values() {
    assert!(XenClient::builder().host("bad host!").is_err());
    assert!(XenClient::builder().port(0).is_err());
    assert!(XenClient::builder().credentials("", "secret").is_err());
    assert!(XenClient::builder().url("ftp://xen.example.com").is_err());
}

#[test]
fn test_builder_defaults_port_from_scheme() {
    let fake = FakeXapi::new();
    let client = client_on(&fake);
    assert_eq!(client.connection().port().get(), 443);
    assert_eq!(client.connection().url().as_str(), "https://xen.example.com/");

    let client = XenClient::builder()
        .url("http://10.0.0.5:8080")
        .unwrap()
        .credentials("root", "secret")
        .unwrap()
        .transport(Arc::new(fake))
        .build()
        .unwrap();
    assert_eq!(client.connection().host().as_str(), "10.0.0.5");
    assert_eq!(client.connection().port().get(), 8080);
    assert!(!client.connection().is_secure());
}

#[test]
fn test_zero_rate_limit_is_rejected_when_building_http_transport() {
    let result = XenClient::builder()
        .host("xen.example.com")
        .unwrap()
        .credentials("root", "secret")
        .unwrap()
        .rate_limit(0, 1)
        .build();
    assert!(result.is_err());
}

#[tokio::test]
async fn test_commands_require_login() {
    let fake = FakeXapi::new();
    let client = client_on(&fake);
    let err = client
        .property(XenClass::Sr, crate::OpaqueRef::null(), catalog::uuid())
        .await
        .unwrap_err();
    assert!(matches!(err, XenError::Authentication(_)));
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_login_set_and_logout() {
    let fake = FakeXapi::new();
    fake.insert(
        XenClass::Sr,
        "OpaqueRef:sr-1",
        json!({"uuid": "11111111-1111-1111-1111-111111111111", "other_config": {}}),
    );
    let mut client = client_on(&fake);

    client.login().await.unwrap();
    assert!(client.is_authenticated());
    assert_eq!(client.session().unwrap().session_ref().as_str(), SESSION);

    let login = fake.params_of("session.login_with_password").unwrap();
    assert_eq!(login[0], json!("root"));
    assert_eq!(login[2], json!("1.0"));

    let uuid = ObjectUuid::parse("11111111-1111-1111-1111-111111111111").unwrap();
    let outcome = client
        .set(
            XenClass::Sr,
            uuid,
            MutationSet::new().add_to("other_config", "env", "prod"),
        )
        .await
        .unwrap();
    let record = outcome.into_result().unwrap();
    assert_eq!(
        record.output().and_then(XenOutput::as_record).and_then(|r| r.get("other_config")),
        Some(&json!({"env": "prod"}))
    );
    assert_eq!(
        fake.params_of("SR.get_by_uuid").unwrap()[0],
        json!(SESSION)
    );

    client.logout().await.unwrap();
    assert!(!client.is_authenticated());
    assert_eq!(fake.calls().last().map(String::as_str), Some("session.logout"));
}

#[tokio::test]
async fn test_facade_property_resolve_and_destroy() {
    let fake = FakeXapi::new();
    fake.insert(
        XenClass::DrTask,
        "OpaqueRef:dr",
        json!({"uuid": "dr-1", "introduced_SRs": ["OpaqueRef:sr-9"]}),
    );
    fake.insert(XenClass::Sr, "OpaqueRef:sr-9", json!({"uuid": "sr-9", "name_label": "dr"}));
    let mut client = client_on(&fake);
    client.login().await.unwrap();

    let dr = client
        .resolve(XenClass::DrTask, crate::OpaqueRef::new("OpaqueRef:dr").unwrap())
        .await
        .unwrap();
    let srs = client
        .property(XenClass::DrTask, dr.clone(), catalog::dr_task::introduced_srs())
        .await
        .unwrap();
    assert!(matches!(srs, XenOutput::Records(ref records) if records.len() == 1));

    let uuid = client
        .property(XenClass::DrTask, dr.clone(), catalog::uuid())
        .await
        .unwrap();
    assert_eq!(uuid, XenOutput::Value(json!("dr-1")));

    let custom = ApiAction::property("record", ReturnShape::Record(XenClass::DrTask));
    let record = client.property(XenClass::DrTask, dr.clone(), custom).await.unwrap();
    assert_eq!(record.as_record().unwrap().reference(), dr);

    client
        .destroy(XenClass::DrTask, dr, InvocationMode::Sync)
        .await
        .unwrap();
    assert!(!fake.exists("OpaqueRef:dr"));
}
