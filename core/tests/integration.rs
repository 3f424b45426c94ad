//! End-to-end run against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises every service
//! operation over real HTTP through the default `ureq` transport. Validates
//! that request building, option encoding and response classification agree
//! with an actual server.

use igdb_core::{ApiError, ClientConfig, IgdbClient, Operator, Order, QueryOption};

fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

#[test]
fn service_lifecycle() {
    let root = start_server();
    let client = IgdbClient::new(ClientConfig::new("integration-key").with_root_url(&root));

    // Step 1: get a single platform with field selection.
    let ps2 = client
        .platforms()
        .get(8, &[QueryOption::fields(["name", "slug"])])
        .unwrap();
    assert_eq!(ps2.id, 8);
    assert_eq!(ps2.name, "PlayStation 2");
    assert_eq!(ps2.slug, "ps2");
    assert!(ps2.summary.is_empty(), "unselected field should default");

    // Step 2: get with every field.
    let ps2 = client.platforms().get(8, &[]).unwrap();
    assert_eq!(ps2.generation, 6);
    assert_eq!(ps2.websites, vec![19, 20]);

    // Step 3: list by ids; unknown ids are skipped.
    let platforms = client.platforms().list(&[19, 96, 424242], &[]).unwrap();
    let ids: Vec<i64> = platforms.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![96, 19]);

    // Step 4: list where nothing matches.
    let err = client.platforms().list(&[0, 9999999], &[]).unwrap_err();
    assert_eq!(err.root_cause(), &ApiError::NoResults);

    // Step 5: index with pagination.
    let page = client
        .platforms()
        .index(&[QueryOption::limit(2), QueryOption::offset(2)])
        .unwrap();
    let ids: Vec<i64> = page.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![74, 133]);

    // Step 6: search pulse groups by name.
    let groups = client
        .pulse_groups()
        .search("zelda", &[QueryOption::order("created_at", Order::Descending, None)])
        .unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].id, 7360);
    assert_eq!(groups[0].pulses, vec![260419, 260420, 260436]);

    // Step 7: count, filtered and unfiltered.
    assert_eq!(client.test_dummies().count(&[]).unwrap(), 2);
    let filtered = client
        .platforms()
        .count(&[QueryOption::filter("id", Operator::ContainsAtLeast, [8, 44])])
        .unwrap();
    assert_eq!(filtered, 2);

    // Step 8: fields of a resource.
    let fields = client.test_dummies().fields().unwrap();
    assert!(fields.iter().any(|f| f == "integer_array"));
    assert!(fields.iter().any(|f| f == "enum_test"));

    // Step 9: an invalid option never reaches the server.
    let err = client
        .test_dummies()
        .index(&[QueryOption::offset(99999)])
        .unwrap_err();
    assert_eq!(err, ApiError::OutOfRange);
}

#[test]
fn missing_api_key_is_rejected_by_server() {
    let root = start_server();
    let client = IgdbClient::new(ClientConfig::new("").with_root_url(&root));

    let err = client.platforms().index(&[]).unwrap_err();
    match err.root_cause() {
        ApiError::Http { status, message } => {
            assert_eq!(*status, 401);
            assert_eq!(message, "Authentication failed: Missing user-key");
        }
        other => panic!("expected HTTP 401, got {other:?}"),
    }
}

#[test]
fn unreachable_server_is_a_transport_error() {
    // Bind then drop so the port is very likely closed.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let client = IgdbClient::new(ClientConfig::new("key").with_root_url(&format!("http://{addr}")));

    let err = client.platforms().get(8, &[]).unwrap_err();
    assert!(matches!(err.root_cause(), ApiError::Transport(_)), "got {err:?}");
}
