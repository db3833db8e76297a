//! In-memory stand-in for the createsend v3.1 API.
//!
//! Serves a small slice of the real API (clients, lists, subscribers) under
//! `/api/v3.1`, checks the Basic credential on every request and answers
//! rejected requests the way the real service does: HTTP 400 with a
//! `{"Code", "Message"}` body. `/api/v3.1/error.json` always fails with 500.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const API_KEY: &str = "mock-api-key";
pub const API_PREFIX: &str = "/api/v3.1";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Client {
    #[serde(rename = "ClientID")]
    pub client_id: String,
    #[serde(rename = "Name")]
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct List {
    #[serde(rename = "ListID")]
    pub list_id: String,
    #[serde(rename = "Name")]
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Subscriber {
    pub email_address: String,
    pub name: String,
    pub date: String,
    pub state: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SubscriberBody {
    email_address: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    resubscribe: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct EmailBody {
    email_address: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListBody {
    #[serde(default)]
    title: String,
}

#[derive(Deserialize)]
struct EmailQuery {
    email: Option<String>,
}

#[derive(Deserialize, Default)]
struct PageQuery {
    date: Option<String>,
    page: Option<u32>,
    pagesize: Option<u32>,
    orderfield: Option<String>,
    orderdirection: Option<String>,
}

/// Server state: the accepted API key plus clients, their lists and each
/// list's subscribers.
#[derive(Debug, Clone, Default)]
pub struct Store {
    pub api_key: String,
    pub clients: Vec<Client>,
    pub lists: HashMap<String, Vec<List>>,
    pub subscribers: HashMap<String, Vec<Subscriber>>,
}

impl Store {
    /// One client (`12ab`, "Alice") owning list `12CD` with an active and an
    /// unsubscribed member.
    pub fn seeded() -> Self {
        let mut store = Store {
            api_key: API_KEY.to_string(),
            clients: vec![Client {
                client_id: "12ab".to_string(),
                name: "Alice".to_string(),
            }],
            ..Default::default()
        };
        store.lists.insert(
            "12ab".to_string(),
            vec![List {
                list_id: "12CD".to_string(),
                name: "Newsletter".to_string(),
            }],
        );
        store.subscribers.insert(
            "12CD".to_string(),
            vec![
                Subscriber {
                    email_address: "alice@example.com".to_string(),
                    name: "alice".to_string(),
                    date: "2010-10-25 10:28:00".to_string(),
                    state: "Active".to_string(),
                },
                Subscriber {
                    email_address: "bob@example.com".to_string(),
                    name: "bob".to_string(),
                    date: "2011-02-03 08:00:00".to_string(),
                    state: "Unsubscribed".to_string(),
                },
            ],
        );
        store
    }

    fn subscriber_mut(&mut self, list_id: &str, email: &str) -> Result<&mut Subscriber, MockError> {
        self.subscribers
            .get_mut(list_id)
            .ok_or(MockError::INVALID_LIST)?
            .iter_mut()
            .find(|s| s.email_address.eq_ignore_ascii_case(email))
            .ok_or(MockError::NOT_IN_LIST)
    }
}

pub type Db = Arc<RwLock<Store>>;

/// Failure answered by a handler.
#[derive(Debug)]
pub enum MockError {
    Api { code: i64, message: &'static str },
    Status(StatusCode),
}

impl MockError {
    const INVALID_EMAIL: MockError = MockError::Api {
        code: 1,
        message: "Invalid Email Address",
    };
    const INVALID_LIST: MockError = MockError::Api {
        code: 101,
        message: "Invalid ListID",
    };
    const INVALID_CLIENT: MockError = MockError::Api {
        code: 102,
        message: "Invalid ClientID",
    };
    const NOT_IN_LIST: MockError = MockError::Api {
        code: 203,
        message: "Subscriber not in list",
    };
}

impl IntoResponse for MockError {
    fn into_response(self) -> Response {
        match self {
            MockError::Api { code, message } => (
                StatusCode::BAD_REQUEST,
                Json(json!({"Code": code, "Message": message})),
            )
                .into_response(),
            MockError::Status(status) => status.into_response(),
        }
    }
}

type MockResult<T> = Result<T, MockError>;

pub fn app() -> Router {
    app_with_store(Store::seeded())
}

pub fn app_with_store(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    let api = Router::new()
        .route("/clients.json", get(list_clients))
        .route("/clients/{id}/lists.json", get(list_lists))
        .route("/clients/{id}/listsforemail.json", get(lists_for_email))
        .route("/lists/{id}", post(create_list).delete(delete_list))
        .route("/lists/{id}/{group}", get(list_subscribers))
        .route(
            "/subscribers/{id}",
            get(get_subscriber)
                .post(add_subscriber)
                .put(update_subscriber)
                .delete(delete_subscriber),
        )
        .route("/subscribers/{id}/unsubscribe.json", post(unsubscribe))
        .route("/error.json", get(internal_error))
        .route_layer(middleware::from_fn_with_state(db.clone(), require_api_key))
        .with_state(db);
    Router::new().nest(API_PREFIX, api)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn require_api_key(State(db): State<Db>, request: Request, next: Next) -> Response {
    let expected = basic_authorization(&db.read().await.api_key);
    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    if presented != Some(expected.as_str()) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"Code": 50, "Message": "Must supply a valid HTTP Basic Authorization header"})),
        )
            .into_response();
    }
    next.run(request).await
}

pub fn basic_authorization(api_key: &str) -> String {
    format!("Basic {}", general_purpose::STANDARD.encode(format!("{api_key}:x")))
}

/// Path segments such as `12CD.json` carry the ID with a `.json` suffix.
fn strip_json(segment: &str) -> MockResult<&str> {
    segment
        .strip_suffix(".json")
        .ok_or(MockError::Status(StatusCode::NOT_FOUND))
}

fn now() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

async fn list_clients(State(db): State<Db>) -> Json<Vec<Client>> {
    Json(db.read().await.clients.clone())
}

async fn list_lists(State(db): State<Db>, Path(client_id): Path<String>) -> MockResult<Json<Vec<List>>> {
    let store = db.read().await;
    store
        .lists
        .get(&client_id)
        .cloned()
        .map(Json)
        .ok_or(MockError::INVALID_CLIENT)
}

async fn lists_for_email(
    State(db): State<Db>,
    Path(client_id): Path<String>,
    Query(query): Query<EmailQuery>,
) -> MockResult<Json<Vec<Value>>> {
    let email = query.email.ok_or(MockError::INVALID_EMAIL)?;
    let store = db.read().await;
    let lists = store.lists.get(&client_id).ok_or(MockError::INVALID_CLIENT)?;
    let found = lists
        .iter()
        .filter_map(|list| {
            let subs = store.subscribers.get(&list.list_id)?;
            let sub = subs.iter().find(|s| s.email_address.eq_ignore_ascii_case(&email))?;
            Some(json!({
                "ListID": list.list_id,
                "ListName": list.name,
                "SubscriberState": sub.state,
                "DateSubscriberAdded": sub.date,
            }))
        })
        .collect();
    Ok(Json(found))
}

async fn list_subscribers(
    State(db): State<Db>,
    Path((list_id, group_file)): Path<(String, String)>,
    Query(query): Query<PageQuery>,
) -> MockResult<Json<Value>> {
    let group = strip_json(&group_file)?;
    let state = match group {
        "active" => "Active",
        "unconfirmed" => "Unconfirmed",
        "unsubscribed" => "Unsubscribed",
        "bounced" => "Bounced",
        "deleted" => "Deleted",
        _ => return Err(MockError::Status(StatusCode::NOT_FOUND)),
    };

    let store = db.read().await;
    let subs = store.subscribers.get(&list_id).ok_or(MockError::INVALID_LIST)?;
    let mut matching: Vec<&Subscriber> = subs
        .iter()
        .filter(|s| s.state == state)
        .filter(|s| query.date.as_deref().map_or(true, |d| s.date.as_str() >= d))
        .collect();

    let order_field = query.orderfield.unwrap_or_else(|| "email".to_string());
    let direction = query.orderdirection.unwrap_or_else(|| "asc".to_string());
    match order_field.as_str() {
        "name" => matching.sort_by(|a, b| a.name.cmp(&b.name)),
        "date" => matching.sort_by(|a, b| a.date.cmp(&b.date)),
        _ => matching.sort_by(|a, b| a.email_address.cmp(&b.email_address)),
    }
    if direction == "desc" {
        matching.reverse();
    }

    let page_size = query.pagesize.unwrap_or(1000).max(1);
    let page = query.page.unwrap_or(1).max(1);
    let total = matching.len() as u32;
    let results: Vec<&Subscriber> = matching
        .into_iter()
        .skip((page as usize - 1).saturating_mul(page_size as usize))
        .take(page_size as usize)
        .collect();

    Ok(Json(json!({
        "Results": results,
        "ResultsOrderedBy": order_field,
        "OrderDirection": direction,
        "PageNumber": page,
        "PageSize": page_size,
        "RecordsOnThisPage": results.len(),
        "TotalNumberOfRecords": total,
        "NumberOfPages": total.div_ceil(page_size),
    })))
}

async fn create_list(
    State(db): State<Db>,
    Path(client_file): Path<String>,
    Json(body): Json<ListBody>,
) -> MockResult<(StatusCode, Json<String>)> {
    let client_id = strip_json(&client_file)?;
    if body.title.trim().is_empty() {
        return Err(MockError::Api {
            code: 250,
            message: "List title must be unique and not empty",
        });
    }
    let mut store = db.write().await;
    let list_id = Uuid::new_v4().simple().to_string();
    store
        .lists
        .get_mut(client_id)
        .ok_or(MockError::INVALID_CLIENT)?
        .push(List {
            list_id: list_id.clone(),
            name: body.title,
        });
    store.subscribers.insert(list_id.clone(), Vec::new());
    Ok((StatusCode::CREATED, Json(list_id)))
}

async fn delete_list(State(db): State<Db>, Path(list_file): Path<String>) -> MockResult<StatusCode> {
    let list_id = strip_json(&list_file)?;
    let mut store = db.write().await;
    store.subscribers.remove(list_id).ok_or(MockError::INVALID_LIST)?;
    for lists in store.lists.values_mut() {
        lists.retain(|l| l.list_id != list_id);
    }
    Ok(StatusCode::OK)
}

async fn get_subscriber(
    State(db): State<Db>,
    Path(list_file): Path<String>,
    Query(query): Query<EmailQuery>,
) -> MockResult<Json<Subscriber>> {
    let list_id = strip_json(&list_file)?;
    let email = query.email.ok_or(MockError::INVALID_EMAIL)?;
    let mut store = db.write().await;
    store.subscriber_mut(list_id, &email).map(|s| Json(s.clone()))
}

async fn add_subscriber(
    State(db): State<Db>,
    Path(list_file): Path<String>,
    Json(body): Json<SubscriberBody>,
) -> MockResult<(StatusCode, Json<String>)> {
    let list_id = strip_json(&list_file)?;
    if !body.email_address.contains('@') {
        return Err(MockError::INVALID_EMAIL);
    }
    let mut store = db.write().await;
    let subs = store.subscribers.get_mut(list_id).ok_or(MockError::INVALID_LIST)?;
    match subs
        .iter_mut()
        .find(|s| s.email_address.eq_ignore_ascii_case(&body.email_address))
    {
        Some(existing) => {
            if !body.name.is_empty() {
                existing.name = body.name;
            }
            if body.resubscribe {
                existing.state = "Active".to_string();
            }
        }
        None => subs.push(Subscriber {
            email_address: body.email_address.clone(),
            name: body.name,
            date: now(),
            state: "Active".to_string(),
        }),
    }
    Ok((StatusCode::CREATED, Json(body.email_address)))
}

async fn update_subscriber(
    State(db): State<Db>,
    Path(list_file): Path<String>,
    Query(query): Query<EmailQuery>,
    Json(body): Json<SubscriberBody>,
) -> MockResult<StatusCode> {
    let list_id = strip_json(&list_file)?;
    let email = query.email.ok_or(MockError::INVALID_EMAIL)?;
    if !body.email_address.contains('@') {
        return Err(MockError::INVALID_EMAIL);
    }
    let mut store = db.write().await;
    let sub = store.subscriber_mut(list_id, &email)?;
    sub.email_address = body.email_address;
    if !body.name.is_empty() {
        sub.name = body.name;
    }
    if body.resubscribe {
        sub.state = "Active".to_string();
    }
    Ok(StatusCode::OK)
}

async fn delete_subscriber(
    State(db): State<Db>,
    Path(list_file): Path<String>,
    Query(query): Query<EmailQuery>,
) -> MockResult<StatusCode> {
    let list_id = strip_json(&list_file)?;
    let email = query.email.ok_or(MockError::INVALID_EMAIL)?;
    let mut store = db.write().await;
    store.subscriber_mut(list_id, &email)?.state = "Deleted".to_string();
    Ok(StatusCode::OK)
}

async fn unsubscribe(
    State(db): State<Db>,
    Path(list_id): Path<String>,
    Json(body): Json<EmailBody>,
) -> MockResult<StatusCode> {
    let mut store = db.write().await;
    store.subscriber_mut(&list_id, &body.email_address)?.state = "Unsubscribed".to_string();
    Ok(StatusCode::OK)
}

/// Answers with an API-shaped body on a status clients must not treat as a
/// structured error.
async fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"Code": 1, "Message": "Internal server error"})),
    )
        .into_response()
}
