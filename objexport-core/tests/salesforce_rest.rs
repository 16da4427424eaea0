//! REST tests for the Salesforce adapter against a loopback HTTP stub.
//!
//! The stub answers one request per connection (`Connection: close`) from a
//! fixed route table and records the request line and `Authorization`
//! header of every request it sees.

#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use objexport_core::{
    AccessToken, ConnectionConfig, ExportConfig, Messages, ObjExportError, OrgAuth,
    SalesforceAdapter, SchemaSource, run,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use url::Url;

const TOKEN: &str = "00D000000000001!AQ0AQHstubtoken";

#[derive(Debug, Clone)]
struct Recorded {
    path: String,
    authorization: Option<String>,
}

struct Stub {
    base: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
    task: tokio::task::JoinHandle<()>,
}

impl Stub {
    async fn start(routes: Vec<(&'static str, u16, String)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);

        let task = tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let mut raw = Vec::new();
                let mut buf = [0_u8; 1024];
                while !raw.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => raw.extend_from_slice(&buf[..n]),
                    }
                }
                let request = String::from_utf8_lossy(&raw).into_owned();
                let path = request
                    .lines()
                    .next()
                    .and_then(|line| line.split_whitespace().nth(1))
                    .unwrap_or("")
                    .to_string();
                let authorization = request
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("authorization")
                            .then(|| value.trim().to_string())
                    });
                recorded.lock().unwrap().push(Recorded {
                    path: path.clone(),
                    authorization,
                });

                let (status, body) = routes
                    .iter()
                    .find(|(route, _, _)| *route == path)
                    .map_or_else(
                        || {
                            (
                                404,
                                r#"[{"errorCode":"NOT_FOUND","message":"The requested resource does not exist"}]"#
                                    .to_string(),
                            )
                        },
                        |(_, status, body)| (*status, body.clone()),
                    );
                let response = format!(
                    "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        Self {
            base,
            requests,
            task,
        }
    }

    fn adapter(&self) -> SalesforceAdapter {
        let auth = OrgAuth {
            username: Some("stub@acme.org".to_string()),
            instance_url: Url::parse(&self.base).unwrap(),
            access_token: AccessToken::new(TOKEN),
            api_version: None,
        };
        let config = ConnectionConfig::new(Url::parse(&self.base).unwrap());
        SalesforceAdapter::new(&auth, config).unwrap()
    }

    fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for Stub {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn global_body() -> String {
    serde_json::json!({
        "encoding": "UTF-8",
        "maxBatchSize": 200,
        "sobjects": [
            { "name": "Contact", "label": "Contact", "queryable": true },
            { "name": "Account", "label": "Account", "queryable": true }
        ]
    })
    .to_string()
}

fn describe_body(name: &str) -> String {
    serde_json::json!({
        "name": name,
        "label": name,
        "fields": [{ "name": "Id", "type": "id" }]
    })
    .to_string()
}

#[tokio::test]
async fn test_rest_global_describe_preserves_order_and_sends_token() {
    let stub = Stub::start(vec![("/services/data/v60.0/sobjects", 200, global_body())]).await;

    let summaries = stub.adapter().describe_global().await.unwrap();

    let names: Vec<_> = summaries.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Contact", "Account"]);

    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/services/data/v60.0/sobjects");
    assert_eq!(
        requests[0].authorization.as_deref(),
        Some(format!("Bearer {TOKEN}").as_str())
    );
}

#[tokio::test]
async fn test_rest_describe_object_returns_document() {
    let stub = Stub::start(vec![(
        "/services/data/v60.0/sobjects/Account/describe",
        200,
        describe_body("Account"),
    )])
    .await;

    let description = stub.adapter().describe_object("Account").await.unwrap();

    assert_eq!(description.as_value()["name"], "Account");
    assert_eq!(description.as_value()["fields"][0]["type"], "id");
}

#[tokio::test]
async fn test_rest_invalid_session_is_authentication_error() {
    let stub = Stub::start(vec![(
        "/services/data/v60.0/sobjects",
        401,
        r#"[{"message":"Session expired or invalid","errorCode":"INVALID_SESSION_ID"}]"#
            .to_string(),
    )])
    .await;

    let result = stub.adapter().describe_global().await;

    match result {
        Err(ObjExportError::Authentication { message }) => {
            assert!(message.contains("INVALID_SESSION_ID"));
            assert!(!message.contains("stubtoken"));
        }
        other => panic!("expected authentication error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_rest_unknown_object_is_describe_error() {
    let stub = Stub::start(Vec::new()).await;

    let result = stub.adapter().describe_object("Nope__c").await;

    assert!(matches!(
        result,
        Err(ObjExportError::Describe { ref target, status: 404, .. }) if target == "Nope__c"
    ));
}

#[tokio::test]
async fn test_rest_malformed_body_is_serialization_error() {
    let stub = Stub::start(vec![(
        "/services/data/v60.0/sobjects",
        200,
        "not json".to_string(),
    )])
    .await;

    let result = stub.adapter().describe_global().await;

    assert!(matches!(result, Err(ObjExportError::Serialization { .. })));
}

#[tokio::test]
async fn test_rest_connection_refused_is_connection_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let auth = OrgAuth {
        username: None,
        instance_url: Url::parse(&base).unwrap(),
        access_token: AccessToken::new(TOKEN),
        api_version: None,
    };
    let adapter =
        SalesforceAdapter::new(&auth, ConnectionConfig::new(Url::parse(&base).unwrap())).unwrap();

    let result = adapter.describe_global().await;

    match result {
        Err(error @ ObjExportError::Connection { .. }) => {
            assert!(!format!("{error:?}").contains("stubtoken"));
        }
        other => panic!("expected connection error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_rest_end_to_end_split_export() {
    let stub = Stub::start(vec![
        ("/services/data/v60.0/sobjects", 200, global_body()),
        (
            "/services/data/v60.0/sobjects/Contact/describe",
            200,
            describe_body("Contact"),
        ),
        (
            "/services/data/v60.0/sobjects/Account/describe",
            200,
            describe_body("Account"),
        ),
    ])
    .await;
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("object-schema");
    let mut progress = Vec::new();

    let collection = run(
        &ExportConfig::new().with_output(&output).with_split(true),
        &stub.adapter(),
        &Messages::new(),
        &mut progress,
    )
    .await
    .unwrap();

    assert_eq!(collection.names().collect::<Vec<_>>(), ["Contact", "Account"]);
    assert_eq!(
        String::from_utf8(progress).unwrap(),
        "Contact - Contact\nAccount - Account\n"
    );
    assert!(output.join("Contact.yaml").is_file());
    assert!(output.join("Account.yaml").is_file());

    let paths: Vec<_> = stub.requests().into_iter().map(|r| r.path).collect();
    assert_eq!(
        paths,
        [
            "/services/data/v60.0/sobjects",
            "/services/data/v60.0/sobjects/Contact/describe",
            "/services/data/v60.0/sobjects/Account/describe",
        ]
    );
}
