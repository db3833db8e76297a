//! Subscriber lifecycle test against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives the client over
//! real HTTP through the default authenticated ureq transport. Validates
//! path resolution, auth, body encoding and status classification end to end.

use std::net::SocketAddr;

use chrono::NaiveDate;
use createsend_core::{
    ApiClient, ApiError, ClientConfig, ListCreateOptions, ListSubscribersOptions, NewSubscriber,
    OrderDirection, PageOptions, SubscriberGroup, UnsubscribeSetting,
};

fn start_server() -> SocketAddr {
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
    });

    addr
}

fn client_for(addr: SocketAddr, api_key: &str) -> ApiClient {
    // No trailing slash: the client must add it so `v3.1` is kept.
    let config = ClientConfig::new(api_key).with_base_url(format!("http://{addr}/api/v3.1"));
    ApiClient::new(config).unwrap()
}

#[test]
fn subscriber_lifecycle() {
    let addr = start_server();
    let client = client_for(addr, mock_server::API_KEY);

    // Step 1: the account's clients and their lists.
    let clients = client.list_clients().unwrap();
    assert_eq!(clients.len(), 1);
    assert_eq!(clients[0].client_id, "12ab");
    assert_eq!(clients[0].name, "Alice");

    let lists = client.list_lists("12ab").unwrap();
    assert_eq!(lists.len(), 1);
    assert_eq!(lists[0].list_id, "12CD");

    // Step 2: one page of active subscribers with a parsed date.
    let page = client
        .list_subscribers("12CD", SubscriberGroup::Active, None)
        .unwrap();
    assert_eq!(page.total_number_of_records, 1);
    assert!(!page.has_next_page());
    let alice = &page.results[0];
    assert_eq!(alice.email_address, "alice@example.com");
    assert_eq!(
        alice.date,
        Some(
            NaiveDate::from_ymd_opt(2010, 10, 25)
                .unwrap()
                .and_hms_opt(10, 28, 0)
                .unwrap()
        )
    );

    // Step 3: add and fetch a subscriber.
    let mut carol = NewSubscriber::new("carol@example.com");
    carol.name = "Carol".to_string();
    client.add_subscriber("12CD", &carol).unwrap();

    let fetched = client.get_subscriber("12CD", "carol@example.com").unwrap();
    assert_eq!(fetched.name, "Carol");
    assert_eq!(fetched.state, "Active");
    assert!(fetched.date.is_some());

    let memberships = client.lists_for_email("12ab", "carol@example.com").unwrap();
    assert_eq!(memberships.len(), 1);
    assert_eq!(memberships[0].list_name, "Newsletter");
    assert_eq!(memberships[0].subscriber_state, "Active");

    // Step 4: update changes the address.
    let mut renamed = NewSubscriber::new("caroline@example.com");
    renamed.name = "Caroline".to_string();
    client
        .update_subscriber("12CD", "carol@example.com", &renamed)
        .unwrap();
    let fetched = client.get_subscriber("12CD", "caroline@example.com").unwrap();
    assert_eq!(fetched.name, "Caroline");

    // Step 5: unsubscribe moves her to the unsubscribed group.
    client.unsubscribe("12CD", "caroline@example.com").unwrap();
    let page = client
        .list_subscribers("12CD", SubscriberGroup::Unsubscribed, None)
        .unwrap();
    let emails: Vec<&str> = page.results.iter().map(|s| s.email_address.as_str()).collect();
    assert_eq!(emails, ["bob@example.com", "caroline@example.com"]);

    // Step 6: delete, then the active group no longer has her.
    client.delete_subscriber("12CD", "caroline@example.com").unwrap();
    let fetched = client.get_subscriber("12CD", "caroline@example.com").unwrap();
    assert_eq!(fetched.state, "Deleted");

    // Step 7: an unknown subscriber is a structured API error.
    let err = client.get_subscriber("12CD", "nobody@example.com").unwrap_err();
    assert_eq!(err.api_code(), Some(203));
    match err {
        ApiError::Api(e) => assert_eq!(e.message, "Subscriber not in list"),
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[test]
fn paging_walks_one_record_at_a_time() {
    let addr = start_server();
    let client = client_for(addr, mock_server::API_KEY);
    client
        .add_subscriber("12CD", &NewSubscriber::new("dave@example.com"))
        .unwrap();

    let mut options = ListSubscribersOptions {
        date: None,
        page: PageOptions {
            page: Some(1),
            page_size: Some(1),
            order_field: Some("email".to_string()),
            order_direction: Some(OrderDirection::Desc),
        },
    };
    let first = client
        .list_subscribers("12CD", SubscriberGroup::Active, Some(&options))
        .unwrap();
    assert_eq!(first.number_of_pages, 2);
    assert_eq!(first.order_direction, "desc");
    assert_eq!(first.results[0].email_address, "dave@example.com");
    assert!(first.has_next_page());

    options.page.page = Some(2);
    let second = client
        .list_subscribers("12CD", SubscriberGroup::Active, Some(&options))
        .unwrap();
    assert_eq!(second.results[0].email_address, "alice@example.com");
    assert!(!second.has_next_page());

    // A date filter after every join date leaves nothing.
    options.date = NaiveDate::from_ymd_opt(2999, 1, 1);
    options.page.page = None;
    let empty = client
        .list_subscribers("12CD", SubscriberGroup::Active, Some(&options))
        .unwrap();
    assert!(empty.results.is_empty());
}

#[test]
fn create_and_delete_list() {
    let addr = start_server();
    let client = client_for(addr, mock_server::API_KEY);

    let options = ListCreateOptions {
        title: "Launch".to_string(),
        unsubscribe_setting: Some(UnsubscribeSetting::OnlyThisList),
        ..Default::default()
    };
    let list_id = client.create_list("12ab", &options).unwrap();
    assert_eq!(list_id.len(), 32);
    assert!(client
        .list_lists("12ab")
        .unwrap()
        .iter()
        .any(|l| l.list_id == list_id && l.name == "Launch"));

    client.delete_list(&list_id).unwrap();
    assert!(client
        .list_lists("12ab")
        .unwrap()
        .iter()
        .all(|l| l.list_id != list_id));

    // Deleting again: the list is gone.
    let err = client.delete_list(&list_id).unwrap_err();
    assert_eq!(err.api_code(), Some(101));
}

#[test]
fn wrong_api_key_is_http_401() {
    let addr = start_server();
    let client = client_for(addr, "not-the-key");

    let err = client.list_clients().unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 401 }), "got {err:?}");
    assert_eq!(err.api_code(), None);
}

#[test]
fn server_error_body_is_not_decoded() {
    let addr = start_server();
    let client = client_for(addr, mock_server::API_KEY);

    let req = client
        .request(createsend_core::HttpMethod::Get, "error.json")
        .unwrap();
    let err = client.execute::<serde_json::Value>(req).unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.api_code(), None);
}

#[test]
fn unreachable_server_is_transport_error() {
    // Bind then drop to get a port nothing listens on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let client = client_for(addr, mock_server::API_KEY);

    let err = client.list_clients().unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)), "got {err:?}");
}
