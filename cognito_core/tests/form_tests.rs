use cognito_core::properties::{ConnectorProperties, ConnectorRecord, PropertyValue};
use cognito_core::{
    BundleRegistry, ConnectorSettingsForm, FormPhase, MemorySettingsStore, RecordingNotifier,
    RecordingRouter, SchemaRevision, SettingsError, SettingsStore, Toast, CONNECTOR_SERVICE_NAME,
};
use std::sync::Arc;

type TestForm =
    ConnectorSettingsForm<Arc<MemorySettingsStore>, Arc<BundleRegistry>, Arc<RecordingNotifier>>;

struct Harness {
    form: TestForm,
    store: Arc<MemorySettingsStore>,
    notifier: Arc<RecordingNotifier>,
}

fn harness(revision: SchemaRevision, store: MemorySettingsStore) -> Harness {
    let store = Arc::new(store);
    let notifier = Arc::new(RecordingNotifier::new());
    let form = ConnectorSettingsForm::new(
        revision,
        store.clone(),
        Arc::new(BundleRegistry::new()),
        notifier.clone(),
    );
    Harness {
        form,
        store,
        notifier,
    }
}

fn stored(pairs: &[(&str, PropertyValue)]) -> MemorySettingsStore {
    let props: ConnectorProperties = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect();
    MemorySettingsStore::with_connector(CONNECTOR_SERVICE_NAME, props)
}

#[tokio::test]
async fn test_empty_load_is_unconfigured() {
    let mut h = harness(SchemaRevision::CustomLogin, MemorySettingsStore::new());
    h.form.activate().await.unwrap();

    let state = h.form.state();
    assert_eq!(h.form.phase(), FormPhase::Unconfigured);
    assert!(!state.connector_has_settings);
    assert!(!state.enabled);
    assert!(!state.expanded_card);
    assert!(!state.with_custom_login);
    assert!(state.fields_unset());
    assert!(h.notifier.toasts().is_empty());
}

#[tokio::test]
async fn test_load_custom_login_settings() {
    let mut h = harness(
        SchemaRevision::CustomLogin,
        stored(&[
            ("enabled", true.into()),
            ("withCustomLogin", "true".into()),
            ("secretKey", "s".into()),
            ("loginUrl", "u".into()),
            ("endpoint", "https://auth.example.com".into()),
            ("region", "eu-west-1".into()),
        ]),
    );
    h.form.activate().await.unwrap();

    let state = h.form.state();
    assert_eq!(h.form.phase(), FormPhase::Configured);
    assert!(state.connector_has_settings);
    assert!(state.expanded_card);
    assert!(state.enabled);
    assert!(state.with_custom_login);
    assert_eq!(state.secret_key(), Some("s"));
    assert_eq!(state.login_url(), Some("u"));
    assert_eq!(state.endpoint(), Some("https://auth.example.com"));
    assert_eq!(state.region(), Some("eu-west-1"));
}

#[tokio::test]
async fn test_reactivating_against_emptied_store_resets_everything() {
    let mut h = harness(
        SchemaRevision::CustomLogin,
        stored(&[
            ("enabled", true.into()),
            ("withCustomLogin", "true".into()),
            ("apiKey", "k".into()),
            ("region", "r".into()),
        ]),
    );
    h.form.activate().await.unwrap();
    assert_eq!(h.form.phase(), FormPhase::Configured);
    assert_eq!(h.form.state().api_key(), Some("k"));

    h.store
        .write(&ConnectorRecord::new(
            CONNECTOR_SERVICE_NAME,
            ConnectorProperties::new(),
        ))
        .await
        .unwrap();
    h.form.activate().await.unwrap();

    let state = h.form.state();
    assert_eq!(h.form.phase(), FormPhase::Unconfigured);
    assert!(!state.connector_has_settings);
    assert!(!state.enabled);
    assert!(!state.expanded_card);
    assert!(!state.with_custom_login);
    assert!(state.fields_unset());
}

#[tokio::test]
async fn test_reload_drops_fields_no_longer_stored() {
    let mut h = harness(
        SchemaRevision::Region,
        stored(&[("apiKey", "k".into()), ("endpoint", "e".into())]),
    );
    h.form.activate().await.unwrap();

    let mut props = ConnectorProperties::new();
    props.insert("apiKey", "k2");
    h.store
        .write(&ConnectorRecord::new(CONNECTOR_SERVICE_NAME, props))
        .await
        .unwrap();
    h.form.activate().await.unwrap();

    assert_eq!(h.form.state().api_key(), Some("k2"));
    assert_eq!(h.form.state().endpoint(), None);
}

#[tokio::test]
async fn test_custom_login_flag_is_exact_string_match() {
    for (raw, expected) in [("true", true), ("false", false), ("yes", false), ("True", false)] {
        let mut h = harness(
            SchemaRevision::CustomLogin,
            stored(&[("withCustomLogin", raw.into())]),
        );
        h.form.activate().await.unwrap();
        assert_eq!(h.form.state().with_custom_login, expected, "raw value {raw:?}");
    }
}

#[tokio::test]
async fn test_load_failure_leaves_state_untouched() {
    let h_store = MemorySettingsStore::new();
    h_store.fail_reads_with("backend down");
    let mut h = harness(SchemaRevision::CustomLogin, h_store);
    h.form.state_mut().set_field("apiKey", "typed");
    let before = h.form.state().clone();

    let err = h.form.activate().await.unwrap_err();
    assert_eq!(err.code_str(), "persistence_error");
    assert_eq!(h.form.state(), &before);
    assert_eq!(h.form.phase(), FormPhase::Uninitialized);
    assert_eq!(
        h.notifier.toasts(),
        vec![Toast::Error("AWS Cognito OAuth: backend down".to_string())]
    );
}

#[tokio::test]
async fn test_missing_api_key_rejects_save() {
    let mut h = harness(SchemaRevision::CustomLogin, MemorySettingsStore::new());
    h.form.activate().await.unwrap();
    {
        let state = h.form.state_mut();
        state.with_custom_login = false;
        state.set_field("apiKey", "");
        state.set_field("apiSecret", "k");
        state.set_field("endpoint", "e");
        state.set_field("region", "r");
    }
    let before = h.form.state().clone();

    let err = h.form.save().await.unwrap_err();
    match err {
        SettingsError::MissingMandatoryProperties(missing) => assert_eq!(missing, vec!["apiKey"]),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(h.store.write_count(), 0);
    assert_eq!(h.form.state(), &before);
    assert_eq!(
        h.notifier.last(),
        Some(Toast::Error(
            "Please fill in all mandatory properties".to_string()
        ))
    );
}

#[tokio::test]
async fn test_no_revision_writes_with_a_missing_mandatory_field() {
    for revision in SchemaRevision::ALL {
        for custom_login in [false, true] {
            let mandatory = revision.mandatory(custom_login);
            for skipped in mandatory {
                let mut h = harness(revision, MemorySettingsStore::new());
                {
                    let state = h.form.state_mut();
                    state.with_custom_login = custom_login;
                    for name in mandatory {
                        if name != skipped {
                            state.set_field(name, "value");
                        }
                    }
                }
                assert!(h.form.save().await.is_err());
                assert_eq!(
                    h.store.write_count(),
                    0,
                    "{revision} wrote without {skipped}"
                );
            }
        }
    }
}

#[tokio::test]
async fn test_custom_login_save_uses_sentinels() {
    let mut h = harness(SchemaRevision::CustomLogin, MemorySettingsStore::new());
    h.form.activate().await.unwrap();
    {
        let state = h.form.state_mut();
        state.enabled = true;
        state.with_custom_login = true;
        state.set_field("secretKey", "s");
        state.set_field("loginUrl", "u");
    }

    h.form.save().await.unwrap();

    assert_eq!(h.store.write_count(), 1);
    assert_eq!(h.form.phase(), FormPhase::Configured);
    assert!(h.form.state().connector_has_settings);
    assert_eq!(
        h.notifier.last(),
        Some(Toast::Success("Settings saved".to_string()))
    );

    let saved = h.store.stored(CONNECTOR_SERVICE_NAME).unwrap();
    let keys: Vec<_> = saved.keys().collect();
    let mut expected = SchemaRevision::CustomLogin.properties().to_vec();
    expected.sort_unstable();
    assert_eq!(keys, expected);
    assert_eq!(saved.get_str("apiKey"), Some("AWS_COGNITO_API_KEY"));
    assert_eq!(saved.get_str("apiSecret"), Some("AWS_COGNITO_API_SECRET"));
    assert_eq!(saved.get_str("withCustomLogin"), Some("true"));
    assert_eq!(saved.get("enabled"), Some(&PropertyValue::Bool(true)));
    assert_eq!(saved.get_str("endpoint"), Some(""));
}

#[tokio::test]
async fn test_failed_save_keeps_state_and_can_retry() {
    let mut h = harness(
        SchemaRevision::Region,
        stored(&[
            ("enabled", true.into()),
            ("apiKey", "k".into()),
            ("apiSecret", "s".into()),
            ("endpoint", "e".into()),
            ("region", "r".into()),
        ]),
    );
    h.form.activate().await.unwrap();
    h.form.state_mut().set_field("region", "us-east-1");
    let before = h.form.state().clone();

    h.store.fail_writes_with("site is locked");
    let err = h.form.save().await.unwrap_err();
    assert!(matches!(err, SettingsError::Persistence(ref f) if f.error == "site is locked"));
    assert_eq!(h.form.phase(), FormPhase::SaveError);
    assert_eq!(h.form.state(), &before);
    assert_eq!(
        h.notifier.last(),
        Some(Toast::Error("AWS Cognito OAuth: site is locked".to_string()))
    );

    h.store.clear_failures();
    h.form.save().await.unwrap();
    assert_eq!(h.form.phase(), FormPhase::Configured);
    let saved = h.store.stored(CONNECTOR_SERVICE_NAME).unwrap();
    assert_eq!(saved.get_str("region"), Some("us-east-1"));
    assert!(!saved.contains_key("withCustomLogin"));
}

#[tokio::test]
async fn test_toggle_twice_is_identity_without_io() {
    let mut h = harness(SchemaRevision::CustomLogin, MemorySettingsStore::new());
    let original = h.form.state().expanded_card;
    h.form.toggle_card();
    assert_ne!(h.form.state().expanded_card, original);
    h.form.toggle_card();
    assert_eq!(h.form.state().expanded_card, original);
    assert_eq!(h.store.read_count(), 0);
    assert_eq!(h.store.write_count(), 0);
}

#[tokio::test]
async fn test_scope_callback_round_trip() {
    let mut h = harness(SchemaRevision::ScopeCallback, MemorySettingsStore::new());
    h.form.activate().await.unwrap();
    {
        let state = h.form.state_mut();
        state.set_field("apiKey", "client");
        state.set_field("apiSecret", "secret");
        state.set_field("endpoint", "https://auth.example.com");
        state.set_field("scope", "openid email");
        state.set_field("callbackUrl", "https://site.example.com/cb");
    }
    h.form.save().await.unwrap();

    let mut form = ConnectorSettingsForm::new(
        SchemaRevision::ScopeCallback,
        h.store.clone(),
        Arc::new(BundleRegistry::new()),
        Arc::new(RecordingNotifier::new()),
    );
    form.activate().await.unwrap();
    assert_eq!(form.state().scope(), Some("openid email"));
    assert_eq!(form.state().logout_endpoint(), Some(""));
    assert!(!form.state().enabled);
}

#[tokio::test]
async fn test_go_to_mappers() {
    let router = Arc::new(RecordingRouter::new());
    let h = harness(SchemaRevision::CustomLogin, MemorySettingsStore::new());
    let form = h.form.with_router(router.clone());
    assert_eq!(form.go_to_mappers().unwrap(), "/mappers/AwsCognitoApi20");
    assert_eq!(router.paths(), vec!["/mappers/AwsCognitoApi20"]);

    let h = harness(SchemaRevision::ScopeCallback, MemorySettingsStore::new());
    let form = h.form.with_router(router.clone());
    assert!(matches!(
        form.go_to_mappers(),
        Err(SettingsError::Unsupported(_))
    ));

    let h = harness(SchemaRevision::Region, MemorySettingsStore::new());
    assert!(h.form.go_to_mappers().is_err());
    assert_eq!(router.paths().len(), 1);
}
