use crate::tests::fake_xapi::FakeXapi;
use crate::{
    AutoApprove, CommandRequest, CommandService, InvocationMode, InvocationResult,
    MutationPolicy, OpaqueRef, TaskStatus, XenClass, XenOutput, catalog,
};
use serde_json::{Map, json};
use std::sync::{Arc, Mutex};

fn pool_with_cluster() -> FakeXapi {
    let fake = FakeXapi::new();
    fake.insert(
        XenClass::Cluster,
        "OpaqueRef:cluster",
        json!({
            "uuid": "c-1",
            "cluster_hosts": ["OpaqueRef:ch-1", "OpaqueRef:ch-2"],
            "network": "OpaqueRef:NULL",
            "cluster_config": {"token": "20000"},
            "token_timeout": 20.0,
        }),
    );
    fake.insert(XenClass::ClusterHost, "OpaqueRef:ch-1", json!({"uuid": "ch-1", "enabled": false}));
    fake.insert(XenClass::ClusterHost, "OpaqueRef:ch-2", json!({"uuid": "ch-2", "enabled": true}));
    fake
}

fn service() -> CommandService {
    CommandService::new(Arc::new(AutoApprove), MutationPolicy::default())
}

fn reference(value: &str) -> OpaqueRef {
    OpaqueRef::new(value).unwrap()
}

#[tokio::test]
async fn test_async_action_returns_handle_without_waiting() {
    let fake = pool_with_cluster();
    let session = fake.session();
    let request = CommandRequest::new(XenClass::Cluster, reference("OpaqueRef:cluster"))
        .action(catalog::cluster::pool_resync())
        .mode(InvocationMode::Async);

    let outcome = service().run(&session, request).await.unwrap();

    assert_eq!(fake.calls(), vec!["Async.Cluster.pool_resync"]);
    let handle = outcome.result.handle().unwrap();
    assert_eq!(handle.call(), "Async.Cluster.pool_resync");

    let task = handle.record(&session).await.unwrap().unwrap();
    assert_eq!(task.status, TaskStatus::Pending);
    assert!(!task.is_finished());
    assert_eq!(task.opaque_ref.as_ref(), Some(handle.task_ref()));

    handle.cancel(&session).await.unwrap();
    assert_eq!(fake.calls().last().map(String::as_str), Some("task.cancel"));
}

#[tokio::test]
async fn test_void_action_rereads_target() {
    let fake = pool_with_cluster();
    let outcome = service()
        .run(
            &fake.session(),
            CommandRequest::new(XenClass::ClusterHost, reference("OpaqueRef:ch-1"))
                .action(catalog::cluster_host::enable()),
        )
        .await
        .unwrap();

    assert_eq!(fake.calls(), vec!["Cluster_host.enable", "Cluster_host.get_record"]);
    let record = outcome.result.output().and_then(XenOutput::as_record).unwrap();
    assert_eq!(record.reference().as_str(), "OpaqueRef:ch-1");
}

#[tokio::test]
async fn test_ref_list_property_fetches_each_record() {
    let fake = pool_with_cluster();
    let outcome = service()
        .run(
            &fake.session(),
            CommandRequest::new(XenClass::Cluster, reference("OpaqueRef:cluster"))
                .action(catalog::cluster::cluster_hosts()),
        )
        .await
        .unwrap();

    match outcome.result {
        InvocationResult::Completed(XenOutput::Records(records)) => {
            let uuids: Vec<_> = records.iter().filter_map(|r| r.uuid()).collect();
            assert_eq!(uuids, vec!["ch-1", "ch-2"]);
            assert!(records.iter().all(|r| r.class() == XenClass::ClusterHost));
        }
        other => panic!("expected records, got {:?}", other),
    }
}

#[tokio::test]
async fn test_null_ref_property_is_no_object() {
    let fake = pool_with_cluster();
    let outcome = service()
        .run(
            &fake.session(),
            CommandRequest::new(XenClass::Cluster, reference("OpaqueRef:cluster"))
                .action(catalog::cluster::network()),
        )
        .await
        .unwrap();
    assert_eq!(outcome.result, InvocationResult::Completed(XenOutput::None));
    assert_eq!(fake.calls(), vec!["Cluster.get_network"]);
}

#[tokio::test]
async fn test_map_and_scalar_properties() {
    let fake = pool_with_cluster();
    let session = fake.session();

    let config = service()
        .run(
            &session,
            CommandRequest::new(XenClass::Cluster, reference("OpaqueRef:cluster"))
                .action(catalog::cluster::cluster_config()),
        )
        .await
        .unwrap();
    assert_eq!(config.result.output().unwrap().to_json(), json!({"token": "20000"}));

    let timeout = service()
        .run(
            &session,
            CommandRequest::new(XenClass::Cluster, reference("OpaqueRef:cluster"))
                .action(catalog::cluster::token_timeout()),
        )
        .await
        .unwrap();
    assert_eq!(
        timeout.result,
        InvocationResult::Completed(XenOutput::Value(json!(20.0)))
    );
}

#[tokio::test]
async fn test_destroy_returns_nothing() {
    let fake = pool_with_cluster();
    let outcome = service()
        .run(
            &fake.session(),
            CommandRequest::new(XenClass::ClusterHost, reference("OpaqueRef:ch-2"))
                .action(catalog::cluster_host::force_destroy()),
        )
        .await
        .unwrap();

    assert_eq!(outcome.result, InvocationResult::Completed(XenOutput::None));
    assert!(!fake.exists("OpaqueRef:ch-2"));

    service()
        .run(
            &fake.session(),
            CommandRequest::new(XenClass::ClusterHost, reference("OpaqueRef:ch-1"))
                .action(catalog::destroy()),
        )
        .await
        .unwrap();
    assert!(!fake.exists("OpaqueRef:ch-1"));
    assert!(!fake.calls().iter().any(|c| c.ends_with("get_record")));
}

#[tokio::test]
async fn test_sync_pool_destroy_does_not_reread_destroyed_cluster() {
    for action in [
        catalog::cluster::pool_destroy(),
        catalog::cluster::pool_force_destroy(),
    ] {
        let fake = pool_with_cluster();
        fake.fail("Cluster.get_record", "HANDLE_INVALID");
        let method = format!("Cluster.{}", action.method());

        let outcome = service()
            .run(
                &fake.session(),
                CommandRequest::new(XenClass::Cluster, reference("OpaqueRef:cluster"))
                    .action(action)
                    .mode(InvocationMode::Sync),
            )
            .await
            .unwrap();

        assert_eq!(outcome.result, InvocationResult::Completed(XenOutput::None));
        assert_eq!(fake.calls(), vec![method]);
        assert!(!fake.exists("OpaqueRef:cluster"));
    }
}

#[tokio::test]
async fn test_create_fetches_new_record_and_gates_on_endpoint() {
    let fake = FakeXapi::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&seen);
    let gate = move |target: &str, action: &str| {
        recorder.lock().unwrap().push((target.to_string(), action.to_string()));
        true
    };
    let service = CommandService::new(Arc::new(gate), MutationPolicy::default())
        .with_endpoint("https://xen.example.com/");

    let mut fields = Map::new();
    fields.insert("name_label".to_string(), json!("dumps"));
    let outcome = service
        .create(&fake.session(), XenClass::PvsSite, fields, InvocationMode::Sync)
        .await
        .unwrap();

    assert_eq!(fake.calls(), vec!["PVS_site.create", "PVS_site.get_record"]);
    let record = outcome.result.output().and_then(XenOutput::as_record).unwrap();
    assert_eq!(record.name_label(), Some("dumps"));
    assert!(record.reference().as_str().starts_with("OpaqueRef:new-"));
    assert_eq!(
        *seen.lock().unwrap(),
        vec![("https://xen.example.com/".to_string(), "PVS_site.create".to_string())]
    );
}

#[tokio::test]
async fn test_static_pool_create_in_async_mode() {
    let fake = FakeXapi::new();
    let network = reference("OpaqueRef:net");
    let outcome = service()
        .invoke_static(
            &fake.session(),
            XenClass::Cluster,
            &catalog::cluster::pool_create(&network, "corosync", 20.0, 1.0),
            InvocationMode::Async,
        )
        .await
        .unwrap();

    assert!(outcome.result.is_pending());
    let params = fake.params_of("Async.Cluster.pool_create").unwrap();
    assert_eq!(params[1], json!("OpaqueRef:net"));
    assert_eq!(params[2], json!("corosync"));
}

#[tokio::test]
async fn test_lookup_failure_is_tagged_with_call() {
    let fake = pool_with_cluster();
    let uuid = crate::ObjectUuid::parse("99999999-9999-9999-9999-999999999999").unwrap();
    let err = service()
        .run(&fake.session(), CommandRequest::new(XenClass::Cluster, uuid))
        .await
        .unwrap_err();

    assert_eq!(err.api_failure().unwrap().code, "UUID_INVALID");
    assert!(err.to_string().starts_with("Cluster.get_by_uuid on <none> failed"));
}
