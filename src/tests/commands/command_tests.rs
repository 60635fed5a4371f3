use crate::tests::fake_xapi::FakeXapi;
use crate::{
    AutoApprove, CommandRequest, CommandService, DenyAll, InvocationMode, InvocationResult,
    MutationPolicy, MutationSet, NameLabel, ObjectSelector, ObjectUuid, OpaqueRef,
    ObjectIdentifier, ValidationError, XenClass, XenError, XenOutput, XenRecord,
};
use serde_json::{Map, json};
use std::sync::Arc;

const SR_UUID: &str = "11111111-1111-1111-1111-111111111111";

fn pool_with_sr() -> FakeXapi {
    let fake = FakeXapi::new();
    fake.insert(
        XenClass::Sr,
        "OpaqueRef:sr-1",
        json!({"uuid": SR_UUID, "name_label": "local", "other_config": {}, "tags": []}),
    );
    fake
}

fn service() -> CommandService {
    CommandService::new(Arc::new(AutoApprove), MutationPolicy::default())
}

#[tokio::test]
async fn test_uuid_mutation_makes_exactly_three_calls() {
    let fake = pool_with_sr();
    let request = CommandRequest::new(XenClass::Sr, ObjectUuid::parse(SR_UUID).unwrap())
        .mutations(MutationSet::new().add_to("other_config", "env", "prod"))
        .mode(InvocationMode::Sync);

    let outcome = service().run(&fake.session(), request).await.unwrap();

    assert_eq!(
        fake.calls(),
        vec!["SR.get_by_uuid", "SR.add_to_other_config", "SR.get_record"]
    );
    assert_eq!(
        fake.params_of("SR.add_to_other_config").unwrap()[1..],
        [json!("OpaqueRef:sr-1"), json!("env"), json!("prod")]
    );

    let record = outcome.result.output().and_then(XenOutput::as_record).unwrap();
    assert_eq!(record.reference().as_str(), "OpaqueRef:sr-1");
    assert_eq!(record.get("other_config"), Some(&json!({"env": "prod"})));
    assert!(outcome.mutations.is_clean());
}

#[tokio::test]
async fn test_ambiguous_name_makes_no_mutating_calls() {
    let fake = FakeXapi::new();
    fake.insert(XenClass::Sr, "OpaqueRef:a", json!({"uuid": "a", "name_label": "shared-sr"}));
    fake.insert(XenClass::Sr, "OpaqueRef:b", json!({"uuid": "b", "name_label": "shared-sr"}));

    let request = CommandRequest::new(XenClass::Sr, NameLabel::new("shared-sr").unwrap())
        .mutations(MutationSet::new().add("tags", "gold"));
    let err = service().run(&fake.session(), request).await.unwrap_err();

    assert_eq!(
        err.validation(),
        Some(&ValidationError::AmbiguousIdentifier {
            class: "SR".to_string(),
            name: "shared-sr".to_string(),
            count: 2,
        })
    );
    assert!(err.to_string().contains("shared-sr"));
    assert!(fake.mutating_calls().is_empty());
}

#[tokio::test]
async fn test_unknown_name_is_no_object() {
    let fake = pool_with_sr();
    let request = CommandRequest::new(XenClass::Sr, NameLabel::new("missing").unwrap())
        .mutations(MutationSet::new().add("tags", "gold"))
        .action(crate::catalog::destroy());

    let outcome = service().run(&fake.session(), request).await.unwrap();

    assert_eq!(outcome.result, InvocationResult::Completed(XenOutput::None));
    assert_eq!(fake.calls(), vec!["SR.get_by_name_label"]);
}

#[tokio::test]
async fn test_single_name_match_resolves() {
    let fake = pool_with_sr();
    let outcome = service()
        .run(
            &fake.session(),
            CommandRequest::new(XenClass::Sr, NameLabel::new("local").unwrap()),
        )
        .await
        .unwrap();
    let record = outcome.result.output().and_then(XenOutput::as_record).unwrap();
    assert_eq!(record.uuid(), Some(SR_UUID));
}

#[tokio::test]
async fn test_every_identifier_form_resolves_to_the_same_reference() {
    let fake = pool_with_sr();
    let session = fake.session();
    let sr = OpaqueRef::new("OpaqueRef:sr-1").unwrap();

    let identifiers: Vec<ObjectIdentifier> = vec![
        XenRecord::new(XenClass::Sr, Map::new()).with_ref(sr.clone()).into(),
        sr.clone().into(),
        ObjectUuid::parse(SR_UUID).unwrap().into(),
        NameLabel::new("local").unwrap().into(),
    ];

    for identifier in identifiers {
        let resolved = service()
            .resolve(&session, XenClass::Sr, &identifier)
            .await
            .unwrap();
        assert_eq!(resolved, sr, "{:?} resolved elsewhere", identifier);
    }
    assert!(fake.mutating_calls().is_empty());
}

#[test]
fn test_missing_identifier_lists_accepted_parameters() {
    let err = ObjectSelector::new().into_identifier(XenClass::Vgpu).unwrap_err();
    assert_eq!(
        err.validation(),
        Some(&ValidationError::MissingIdentifier {
            accepted: vec!["VGPU".to_string(), "Ref".to_string(), "Uuid".to_string()],
        })
    );

    let err = ObjectSelector::new().into_identifier(XenClass::Sr).unwrap_err();
    assert!(err.to_string().contains("'Name'"));
}

#[tokio::test]
async fn test_inline_record_skips_lookup() {
    let fake = pool_with_sr();
    let record = XenRecord::new(XenClass::Sr, Map::new())
        .with_ref(OpaqueRef::new("OpaqueRef:sr-1").unwrap());

    service()
        .run(
            &fake.session(),
            CommandRequest::new(XenClass::Sr, record)
                .mutations(MutationSet::new().set("name_description", "scratch")),
        )
        .await
        .unwrap();

    assert_eq!(fake.calls(), vec!["SR.set_name_description", "SR.get_record"]);
    assert_eq!(fake.field("OpaqueRef:sr-1", "name_description"), Some(json!("scratch")));
}

#[tokio::test]
async fn test_failed_mutation_does_not_roll_back_earlier_ones() {
    let fake = pool_with_sr();
    fake.fail("SR.add_to_other_config", "PERMISSION_DENIED");

    let request = CommandRequest::new(XenClass::Sr, OpaqueRef::new("OpaqueRef:sr-1").unwrap())
        .mutations(
            MutationSet::new()
                .add("tags", "gold")
                .add_to("other_config", "env", "prod")
                .set("name_description", "after"),
        );
    let outcome = service().run(&fake.session(), request).await.unwrap();

    assert_eq!(fake.field("OpaqueRef:sr-1", "tags"), Some(json!(["gold"])));
    assert_eq!(fake.field("OpaqueRef:sr-1", "name_description"), Some(json!("after")));
    assert_eq!(outcome.mutations.applied.len(), 2);
    assert_eq!(outcome.mutations.failed[0].call, "SR.add_to_other_config");

    let err = outcome.into_result().unwrap_err();
    assert_eq!(err.api_failure().unwrap().code, "PERMISSION_DENIED");
}

#[tokio::test]
async fn test_stop_on_error_leaves_later_mutations_unapplied() {
    let fake = pool_with_sr();
    fake.fail("SR.add_to_other_config", "PERMISSION_DENIED");

    let service = CommandService::new(Arc::new(AutoApprove), MutationPolicy::StopOnError);
    let request = CommandRequest::new(XenClass::Sr, OpaqueRef::new("OpaqueRef:sr-1").unwrap())
        .mutations(
            MutationSet::new()
                .add("tags", "gold")
                .add_to("other_config", "env", "prod")
                .set("name_description", "after"),
        );
    let err = service.run(&fake.session(), request).await.unwrap_err();
    match &err {
        XenError::MutationAborted { applied, .. } => assert_eq!(applied, &vec!["SR.add_tags"]),
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(err.api_failure().unwrap().code, "PERMISSION_DENIED");

    assert_eq!(fake.field("OpaqueRef:sr-1", "tags"), Some(json!(["gold"])));
    assert_eq!(fake.field("OpaqueRef:sr-1", "name_description"), None);
}

#[tokio::test]
async fn test_optional_mutations_only_when_present() {
    let fake = pool_with_sr();
    let description: Option<&str> = None;
    let mutations = MutationSet::new()
        .set_opt("name_description", description)
        .add_opt("tags", Some("silver"));

    service()
        .run(
            &fake.session(),
            CommandRequest::new(XenClass::Sr, OpaqueRef::new("OpaqueRef:sr-1").unwrap())
                .mutations(mutations),
        )
        .await
        .unwrap();

    assert_eq!(fake.mutating_calls(), vec!["SR.add_tags"]);
}

#[tokio::test]
async fn test_deny_all_vetoes_every_state_change() {
    let fake = pool_with_sr();
    let service = CommandService::new(Arc::new(DenyAll), MutationPolicy::default());
    let request = CommandRequest::new(XenClass::Sr, OpaqueRef::new("OpaqueRef:sr-1").unwrap())
        .mutations(MutationSet::new().add("tags", "gold"))
        .action(crate::catalog::destroy());

    let outcome = service.run(&fake.session(), request).await.unwrap();

    assert!(fake.mutating_calls().is_empty());
    assert_eq!(outcome.mutations.vetoed, vec!["SR.add_tags"]);
    assert_eq!(outcome.result, InvocationResult::Completed(XenOutput::None));
    assert!(fake.exists("OpaqueRef:sr-1"));
}

#[tokio::test]
async fn test_gate_sees_reference_and_qualified_method() {
    let fake = pool_with_sr();
    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
    let recorder = Arc::clone(&seen);
    let gate = move |target: &str, action: &str| {
        recorder
            .lock()
            .unwrap()
            .push(format!("{} {}", target, action));
        true
    };

    CommandService::new(Arc::new(gate), MutationPolicy::default())
        .run(
            &fake.session(),
            CommandRequest::new(XenClass::Sr, OpaqueRef::new("OpaqueRef:sr-1").unwrap())
                .mutations(MutationSet::new().remove("tags", "gold")),
        )
        .await
        .unwrap();

    assert_eq!(*seen.lock().unwrap(), vec!["OpaqueRef:sr-1 SR.remove_tags"]);
}
