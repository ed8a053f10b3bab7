//! Failover integration tests for the caching access point.
//!
//! These tests drive a [`CachingAccessPoint`] against a scriptable fake
//! control-plane client: the fake can be taken offline mid-test, mutated
//! behind the access point's back and interrogated for how many upstream
//! calls it actually received.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use palisade_cache::{AccessError, AccessPoint, AccessResult, CachingAccessPoint};
use palisade_core::{
    CommandLabel, EntityKind, ExternalIdentity, Namespace, RawRecord, Server, User,
};
use palisade_db_memory::create_snapshot_store;
use serde_json::json;

/// Scriptable stand-in for the authoritative control-plane client.
///
/// While `available` is false every fetch fails with an upstream error.
/// `calls` counts fetch attempts across all methods, failed ones included,
/// so tests can observe how often the breaker lets traffic through.
struct FakeUpstream {
    available: AtomicBool,
    calls: AtomicUsize,
    namespaces: Mutex<Vec<Namespace>>,
    nodes: Mutex<HashMap<String, Vec<Server>>>,
    proxies: Vec<Server>,
    users: Mutex<Vec<User>>,
    cert_authorities: Vec<RawRecord>,
    connectors: Vec<RawRecord>,
    sessions: Vec<RawRecord>,
    tokens: Vec<RawRecord>,
}

impl FakeUpstream {
    fn new() -> Arc<Self> {
        let mut uptime = CommandLabel::new(Duration::from_secs(1), vec!["uptime".to_string()]);
        uptime.result = "up 3 days".to_string();

        let mut nodes = HashMap::new();
        nodes.insert(
            "default".to_string(),
            vec![
                Server::new("1", "10.50.0.1", "one"),
                Server::new("2", "10.50.0.2", "two"),
            ],
        );

        let proxies = vec![
            Server::new("3", "10.50.0.3", "three")
                .with_label("os", "linux")
                .with_label("role", "proxy")
                .with_cmd_label("uptime", uptime),
        ];

        let elliot = User::builder("elliot")
            .allowed_login("elliot")
            .allowed_login("root")
            .build()
            .expect("valid user");
        let bob = User::builder("bob")
            .allowed_login("bob")
            .identity(ExternalIdentity::new("example.com", "bob@example.com"))
            .identity(ExternalIdentity::new("example.net", "bob@example.net"))
            .build()
            .expect("valid user");

        Arc::new(Self {
            available: AtomicBool::new(true),
            calls: AtomicUsize::new(0),
            namespaces: Mutex::new(vec![Namespace::default()]),
            nodes: Mutex::new(nodes),
            proxies,
            users: Mutex::new(vec![elliot, bob]),
            cert_authorities: vec![RawRecord::new(
                "host-ca",
                json!({"type": "host", "cluster": "palisade.example.com"}),
            )],
            connectors: vec![RawRecord::new(
                "github",
                json!({"client_id": "abc123", "redirect_url": "https://palisade.example.com/callback"}),
            )],
            sessions: Vec::new(),
            tokens: vec![RawRecord::new(
                "node-join",
                json!({"roles": ["node"], "expires": "2027-01-01T00:00:00Z"}),
            )],
        })
    }

    fn go_offline(&self) {
        self.available.store(false, Ordering::SeqCst);
    }

    fn go_online(&self) {
        self.available.store(true, Ordering::SeqCst);
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Registers a namespace and its node population after the fact.
    fn add_namespace(&self, name: &str, nodes: Vec<Server>) {
        self.namespaces.lock().unwrap().push(Namespace::new(name));
        self.nodes.lock().unwrap().insert(name.to_string(), nodes);
    }

    fn add_user(&self, user: User) {
        self.users.lock().unwrap().push(user);
    }

    fn check(&self) -> AccessResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(AccessError::upstream("control plane is down"))
        }
    }
}

#[async_trait]
impl AccessPoint for FakeUpstream {
    async fn get_namespaces(&self) -> AccessResult<Vec<Namespace>> {
        self.check()?;
        Ok(self.namespaces.lock().unwrap().clone())
    }

    async fn get_nodes(&self, namespace: &str) -> AccessResult<Vec<Server>> {
        self.check()?;
        Ok(self
            .nodes
            .lock()
            .unwrap()
            .get(namespace)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_proxies(&self) -> AccessResult<Vec<Server>> {
        self.check()?;
        Ok(self.proxies.clone())
    }

    async fn get_users(&self) -> AccessResult<Vec<User>> {
        self.check()?;
        Ok(self.users.lock().unwrap().clone())
    }

    async fn get_cert_authorities(&self) -> AccessResult<Vec<RawRecord>> {
        self.check()?;
        Ok(self.cert_authorities.clone())
    }

    async fn get_connectors(&self) -> AccessResult<Vec<RawRecord>> {
        self.check()?;
        Ok(self.connectors.clone())
    }

    async fn get_sessions(&self) -> AccessResult<Vec<RawRecord>> {
        self.check()?;
        Ok(self.sessions.clone())
    }

    async fn get_tokens(&self) -> AccessResult<Vec<RawRecord>> {
        self.check()?;
        Ok(self.tokens.clone())
    }
}

/// Routes access-point logs to the test output when RUST_LOG is set.
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

async fn build_access_point(upstream: &Arc<FakeUpstream>) -> CachingAccessPoint {
    init_logging();
    CachingAccessPoint::new(upstream.clone(), create_snapshot_store())
        .await
        .expect("initial synchronization succeeds")
}

#[tokio::test]
async fn initial_sync_mirrors_upstream_data() {
    let upstream = FakeUpstream::new();
    let access_point = build_access_point(&upstream).await;

    let namespaces = access_point.get_namespaces().await.unwrap();
    assert_eq!(namespaces.len(), 1);
    assert_eq!(namespaces[0].name, "default");

    let nodes = access_point.get_nodes("default").await.unwrap();
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0].hostname, "one");
    assert_eq!(nodes[1].hostname, "two");

    let proxies = access_point.get_proxies().await.unwrap();
    assert_eq!(proxies.len(), 1);
    assert_eq!(
        proxies[0].labels_string(),
        "os=linux,role=proxy,uptime=up 3 days"
    );

    let users = access_point.get_users().await.unwrap();
    assert_eq!(users.len(), 2);
    assert!(users[0].allowed_logins.contains(&"root".to_string()));

    assert_eq!(access_point.get_cert_authorities().await.unwrap().len(), 1);
    assert_eq!(access_point.get_connectors().await.unwrap()[0].id, "github");
    assert!(access_point.get_sessions().await.unwrap().is_empty());
    assert_eq!(access_point.get_tokens().await.unwrap()[0].id, "node-join");
}

#[tokio::test]
async fn mirrored_reads_survive_upstream_death() {
    let upstream = FakeUpstream::new();
    let access_point = build_access_point(&upstream).await;

    let fresh_nodes = access_point.get_nodes("default").await.unwrap();
    let fresh_proxies = access_point.get_proxies().await.unwrap();
    let fresh_users = access_point.get_users().await.unwrap();
    assert_eq!(
        (fresh_nodes.len(), fresh_proxies.len(), fresh_users.len()),
        (2, 1, 2)
    );

    upstream.go_offline();

    let nodes = access_point.get_nodes("default").await.unwrap();
    let proxies = access_point.get_proxies().await.unwrap();
    let users = access_point.get_users().await.unwrap();

    assert_eq!(nodes, fresh_nodes);
    assert_eq!(proxies, fresh_proxies);
    assert_eq!(proxies[0].cmd_labels["uptime"].result, "up 3 days");

    let names: Vec<&str> = users.iter().map(|user| user.name.as_str()).collect();
    assert_eq!(names, ["elliot", "bob"]);
    assert_eq!(users[1].identities.len(), 2);
}

#[tokio::test]
async fn outage_reads_hit_upstream_once_per_window() {
    let upstream = FakeUpstream::new();
    let access_point = build_access_point(&upstream).await;

    upstream.go_offline();
    let before = upstream.call_count();

    for _ in 0..5 {
        let users = access_point.get_users().await.unwrap();
        assert_eq!(users.len(), 2);
    }

    // The breaker is shared across kinds, so these short-circuit too.
    access_point.get_nodes("default").await.unwrap();
    access_point.get_proxies().await.unwrap();

    assert_eq!(upstream.call_count() - before, 1);
}

#[tokio::test(start_paused = true)]
async fn recovers_and_resynchronizes_after_backoff() {
    let upstream = FakeUpstream::new();
    let access_point = build_access_point(&upstream).await;

    upstream.go_offline();
    let stale = access_point.get_users().await.unwrap();
    assert_eq!(stale.len(), 2);

    let carol = User::builder("carol")
        .allowed_login("carol")
        .build()
        .expect("valid user");
    upstream.add_user(carol);
    upstream.go_online();

    // Still inside the backoff window, so the mirror answers and carol
    // is not visible yet.
    let suppressed = access_point.get_users().await.unwrap();
    assert_eq!(suppressed.len(), 2);

    tokio::time::advance(Duration::from_millis(10_000)).await;

    let fresh = access_point.get_users().await.unwrap();
    assert_eq!(fresh.len(), 3);

    // The recovered fetch refreshed the mirror as well.
    upstream.go_offline();
    let mirrored = access_point.get_users().await.unwrap();
    assert_eq!(mirrored.len(), 3);
}

#[tokio::test]
async fn unmirrored_namespace_surfaces_upstream_error() {
    let upstream = FakeUpstream::new();
    let access_point = build_access_point(&upstream).await;

    upstream.add_namespace(
        "staging",
        vec![Server::new("9", "10.60.0.9", "nine").in_namespace("staging")],
    );
    upstream.go_offline();

    // Never mirrored, so the upstream failure reaches the caller.
    let error = access_point.get_nodes("staging").await.unwrap_err();
    assert!(error.is_upstream());

    // Warm namespaces keep answering from the mirror.
    let nodes = access_point.get_nodes("default").await.unwrap();
    assert_eq!(nodes.len(), 2);
}

#[tokio::test]
async fn late_namespace_becomes_warm_after_first_read() {
    let upstream = FakeUpstream::new();
    let access_point = build_access_point(&upstream).await;

    upstream.add_namespace(
        "staging",
        vec![Server::new("9", "10.60.0.9", "nine").in_namespace("staging")],
    );
    let fresh = access_point.get_nodes("staging").await.unwrap();
    assert_eq!(fresh.len(), 1);

    upstream.go_offline();
    let mirrored = access_point.get_nodes("staging").await.unwrap();
    assert_eq!(mirrored, fresh);
}

#[tokio::test]
async fn construction_fails_without_reachable_upstream() {
    init_logging();
    let upstream = FakeUpstream::new();
    upstream.go_offline();

    let result = CachingAccessPoint::new(upstream.clone(), create_snapshot_store()).await;
    let error = result.err().expect("construction must fail");
    assert!(error.is_initial_sync());
    assert!(matches!(
        error,
        AccessError::InitialSync {
            kind: EntityKind::Namespace,
            ..
        }
    ));
}

#[tokio::test]
async fn synced_empty_kind_serves_empty_not_error() {
    let upstream = FakeUpstream::new();
    let access_point = build_access_point(&upstream).await;

    upstream.go_offline();

    // Sessions were synchronized as empty, which is a valid snapshot.
    let sessions = access_point.get_sessions().await.unwrap();
    assert!(sessions.is_empty());
}
