//! Integration tests for the contributor pipeline against a mocked GitHub API

use std::sync::Arc;

use chrono::Utc;
use roster::cache::{CacheEntry, CacheStore, FileStore, KvStore, MemoryStore};
use roster::contributors::{Aggregator, ContributorRecord, EnrichmentStatus, Origin, Role, Roster};
use roster::github::GitHubClient;
use roster::{RepoSpec, RosterConfig, RosterError};
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CONTRIBUTORS_PATH: &str = "/repos/acme/widgets/contributors";

fn repo() -> RepoSpec {
    RepoSpec::new("acme", "widgets")
}

/// `count` contributors with descending contribution counts, starting at id `first_id`.
fn contributors(first_id: u64, count: u64) -> Value {
    let entries: Vec<Value> = (first_id..first_id + count)
        .map(|id| {
            json!({
                "login": format!("user{}", id),
                "id": id,
                "avatar_url": format!("https://avatars.githubusercontent.com/u/{}", id),
                "html_url": format!("https://github.com/user{}", id),
                "type": "User",
                "contributions": 1000 - id,
            })
        })
        .collect();
    Value::Array(entries)
}

async fn mount_page(server: &MockServer, page: u32, body: Value) {
    Mock::given(method("GET"))
        .and(path(CONTRIBUTORS_PATH))
        .and(query_param("page", page.to_string()))
        .and(query_param("per_page", "100"))
        .and(query_param("anon", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_profiles(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path_regex(r"^/users/[^/]+$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Some Name",
            "bio": "Writes code",
            "company": "Acme",
            "location": "Lisbon",
            "followers": 30,
            "public_repos": 12,
        })))
        .mount(server)
        .await;
}

fn config(server: &MockServer) -> RosterConfig {
    RosterConfig::new(repo()).with_api_base(server.uri())
}

fn roster(
    server: &MockServer,
    store: Arc<MemoryStore>,
) -> Roster<GitHubClient, Arc<MemoryStore>> {
    let config = config(server);
    let client = GitHubClient::new(None, &config.api_base).expect("Failed to build client");
    Roster::new(Aggregator::new(client, store, &config))
}

async fn contributor_requests(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == CONTRIBUTORS_PATH)
        .count()
}

#[tokio::test]
async fn test_two_pages_for_150_contributors() {
    let server = MockServer::start().await;
    mount_page(&server, 1, contributors(1, 100)).await;
    mount_page(&server, 2, contributors(101, 50)).await;
    mount_profiles(&server).await;

    let roster = roster(&server, Arc::new(MemoryStore::new()));
    let snapshot = roster.get().await.expect("aggregation should succeed");

    assert_eq!(snapshot.origin, Origin::Fresh);
    assert_eq!(snapshot.len(), 150);
    assert_eq!(contributor_requests(&server).await, 2);

    for pair in snapshot.records.windows(2) {
        assert!(pair[0].contributions >= pair[1].contributions);
    }
    // 30 followers, so >50 contributions with >20 followers
    assert!(snapshot.records.iter().all(|r| r.role == Role::SeniorDev));
    assert!(
        snapshot
            .records
            .iter()
            .all(|r| r.enrichment == EnrichmentStatus::Enriched)
    );
}

#[tokio::test]
async fn test_profile_failure_degrades_one_contributor() {
    let server = MockServer::start().await;
    let body = json!([
        {"login": "x", "id": 1, "type": "User", "contributions": 25},
        {"login": "y", "id": 2, "type": "User", "contributions": 15},
        {"login": "z", "id": 3, "type": "User", "contributions": 5},
    ]);
    mount_page(&server, 1, body).await;
    Mock::given(method("GET"))
        .and(path("/users/x"))
        .respond_with(ResponseTemplate::new(500))
        .with_priority(1)
        .mount(&server)
        .await;
    mount_profiles(&server).await;

    let roster = roster(&server, Arc::new(MemoryStore::new()));
    let snapshot = roster.get().await.expect("profile failures must not fail the run");

    let logins: Vec<&str> = snapshot.records.iter().map(|r| r.login.as_str()).collect();
    assert_eq!(logins, vec!["x", "y", "z"]);

    let x = &snapshot.records[0];
    assert_eq!(x.enrichment, EnrichmentStatus::Defaulted);
    assert_eq!(x.display_name, "x");
    assert_eq!(x.bio, "Open source contributor");
    assert_eq!((x.followers, x.public_repos), (0, 0));
    assert!(x.company.is_none() && x.location.is_none());
    assert_eq!(x.role, Role::ActiveContributor);

    for record in &snapshot.records[1..] {
        assert_eq!(record.enrichment, EnrichmentStatus::Enriched);
        assert_eq!(record.display_name, "Some Name");
        assert_eq!(record.company.as_deref(), Some("Acme"));
    }
}

#[tokio::test]
async fn test_anonymous_contributors_are_kept() {
    let server = MockServer::start().await;
    let body = json!([
        {"login": "acme", "id": 9, "type": "User", "contributions": 3},
        {"name": "Jane Doe", "email": "jane@example.com", "type": "Anonymous", "contributions": 7},
    ]);
    mount_page(&server, 1, body).await;
    mount_profiles(&server).await;

    let roster = roster(&server, Arc::new(MemoryStore::new()));
    let snapshot = roster.get().await.unwrap();

    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot.records[0].login, "Jane Doe");
    assert_eq!(snapshot.records[0].enrichment, EnrichmentStatus::Anonymous);
    // Repository owner defaults to project lead
    assert_eq!(snapshot.records[1].role, Role::ProjectLead);

    let profile_requests = server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path().starts_with("/users/"))
        .count();
    assert_eq!(profile_requests, 1);
}

#[tokio::test]
async fn test_bearer_token_is_attached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CONTRIBUTORS_PATH))
        .and(header("authorization", "Bearer s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(contributors(1, 1)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/user1"))
        .and(header("authorization", "Bearer s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"followers": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let config = config(&server).with_token(Some("s3cret".to_string()));
    let client = GitHubClient::new(config.token.as_deref(), &config.api_base).unwrap();
    let roster = Roster::new(Aggregator::new(client, MemoryStore::new(), &config));

    let snapshot = roster.get().await.unwrap();
    assert_eq!(snapshot.records[0].enrichment, EnrichmentStatus::Enriched);
}

#[tokio::test]
async fn test_malformed_page_fails_and_keeps_cache() {
    let server = MockServer::start().await;
    mount_page(&server, 1, contributors(1, 100)).await;
    Mock::given(method("GET"))
        .and(path(CONTRIBUTORS_PATH))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"message\": \"oops\"}"))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let key = repo().cache_key();
    let stale = CacheEntry::with_timestamp(
        Vec::<ContributorRecord>::new(),
        Utc::now() - chrono::Duration::hours(3),
    );
    store
        .set(&key, &serde_json::to_string(&stale).unwrap())
        .unwrap();
    let before = store.get(&key).unwrap();

    let roster = roster(&server, store.clone());
    let err = roster.get().await.unwrap_err();

    assert!(matches!(err, RosterError::PageFetch { page: 2, .. }));
    assert_eq!(store.get(&key).unwrap(), before);
    assert!(!roster.is_loading());
}

#[tokio::test]
async fn test_rate_limited_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CONTRIBUTORS_PATH))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("x-ratelimit-limit", "60")
                .insert_header("x-ratelimit-remaining", "0")
                .insert_header("x-ratelimit-reset", "1700000000"),
        )
        .mount(&server)
        .await;

    let roster = roster(&server, Arc::new(MemoryStore::new()));
    let err = roster.get().await.unwrap_err();

    assert!(err.is_rate_limited(), "unexpected error: {err}");
}

#[tokio::test]
async fn test_empty_repository() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CONTRIBUTORS_PATH))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let roster = roster(&server, Arc::new(MemoryStore::new()));
    let snapshot = roster.get().await.unwrap();
    assert!(snapshot.is_empty());
}

#[tokio::test]
async fn test_disk_cache_within_ttl_makes_no_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = config(&server).with_cache_dir(Some(temp_dir.path().to_path_buf()));

    // Seed the cache with a snapshot written 30 minutes ago
    let seed_server = MockServer::start().await;
    mount_page(&seed_server, 1, contributors(1, 3)).await;
    mount_profiles(&seed_server).await;
    let seeded = roster(&seed_server, Arc::new(MemoryStore::new()))
        .get()
        .await
        .unwrap();
    let cache = CacheStore::new(FileStore::new(temp_dir.path()), config.ttl);
    let written_at = Utc::now() - chrono::Duration::minutes(30);
    cache
        .write(
            &repo().cache_key(),
            &CacheEntry::with_timestamp(seeded.records.clone(), written_at),
        )
        .unwrap();

    let roster = Roster::from_config(&config).unwrap();
    let snapshot = roster.get().await.unwrap();

    assert_eq!(snapshot.origin, Origin::Cached);
    assert_eq!(snapshot.records, seeded.records);
    assert_eq!(snapshot.timestamp, written_at);
}

#[tokio::test]
async fn test_disk_cache_past_ttl_is_refetched() {
    let server = MockServer::start().await;
    mount_page(&server, 1, contributors(1, 2)).await;
    mount_profiles(&server).await;

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = config(&server).with_cache_dir(Some(temp_dir.path().to_path_buf()));
    let cache = CacheStore::new(FileStore::new(temp_dir.path()), config.ttl);
    cache
        .write(
            &repo().cache_key(),
            &CacheEntry::with_timestamp(
                Vec::<ContributorRecord>::new(),
                Utc::now() - chrono::Duration::minutes(90),
            ),
        )
        .unwrap();

    let roster = Roster::from_config(&config).unwrap();
    let snapshot = roster.get().await.unwrap();

    assert_eq!(snapshot.origin, Origin::Fresh);
    assert_eq!(snapshot.len(), 2);

    let stored = cache
        .read_if_valid::<Vec<ContributorRecord>>(&repo().cache_key())
        .expect("fresh snapshot should be written through");
    assert_eq!(stored.data, snapshot.records);
}
