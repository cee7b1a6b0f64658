use portal_cube::{CubeDescriptor, CubeService, Dashboard, DashboardService, ServiceError};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A request as seen by the stub server.
struct Captured {
    method: String,
    path: String,
    body: String,
}

/// Serve exactly one HTTP request with a canned status and body.
async fn serve_once(status: &'static str, response_body: &'static str) -> (String, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}/api/cube/", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];

        let header_end = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before headers");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let content_length = head
            .lines()
            .find_map(|l| {
                let (name, value) = l.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        while buf.len() < header_end + content_length {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }

        let mut request_line = head.lines().next().unwrap_or("").split_whitespace();
        let method = request_line.next().unwrap_or("").to_string();
        let path = request_line.next().unwrap_or("").to_string();
        let body = String::from_utf8_lossy(&buf[header_end..]).to_string();

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            response_body.len(),
            response_body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();

        Captured { method, path, body }
    });

    (base, handle)
}

#[tokio::test]
async fn test_list_cubes_issues_get() {
    let (base, server) = serve_once(
        "200 OK",
        r#"[{"name":"orders","table":"public.orders","measures":[{"name":"count","type":"count"}]}]"#,
    )
    .await;

    let service = CubeService::new(&base).unwrap();
    let cubes = service.list_cubes().await.unwrap();
    let request = server.await.unwrap();

    assert_eq!(request.method, "GET");
    assert_eq!(request.path, "/api/cube/list");
    assert_eq!(cubes.len(), 1);
    assert_eq!(cubes[0].measures().len(), 1);
}

#[tokio::test]
async fn test_create_cube_posts_json_body() {
    let (base, server) = serve_once("200 OK", r#"{"name":"orders","table":"public.orders"}"#).await;

    let service = CubeService::new(&base).unwrap();
    let created = service
        .create_cube(&CubeDescriptor::new("orders", "public.orders"))
        .await
        .unwrap();
    let request = server.await.unwrap();

    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/api/cube/create");
    let sent: Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(sent, json!({ "name": "orders", "table": "public.orders" }));
    assert_eq!(created.name, "orders");
}

#[tokio::test]
async fn test_non_success_status_is_an_error() {
    let (base, server) = serve_once("500 Internal Server Error", r#"{"detail":"boom"}"#).await;

    let service = CubeService::new(&base).unwrap();
    let err = service
        .deploy_cube(&CubeDescriptor::new("orders", "public.orders"))
        .await
        .unwrap_err();
    server.await.unwrap();

    match err {
        ServiceError::Status { endpoint, status, .. } => {
            assert_eq!(endpoint, "deploy");
            assert_eq!(status, 500);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_deploy_ignores_response_body() {
    let (base, server) = serve_once("200 OK", "").await;

    let service = CubeService::new(&base).unwrap();
    service
        .deploy_cube(&CubeDescriptor::new("orders", "public.orders"))
        .await
        .unwrap();
    assert_eq!(server.await.unwrap().path, "/api/cube/deploy");
}

#[tokio::test]
async fn test_dashboard_find_by_id() {
    let (base, server) = serve_once(
        "200 OK",
        r#"{"id":"d-1","version_id":3,"name":"Sales","configuration":"{\"type\":\"list\"}"}"#,
    )
    .await;

    let service = DashboardService::new(&base).unwrap();
    let dashboard = service.find_by_id("d-1").await.unwrap();
    let request = server.await.unwrap();

    assert_eq!(request.path, "/api/cube/find/d-1");
    assert_eq!(
        dashboard,
        Dashboard {
            id: Some("d-1".to_string()),
            version_id: Some(3),
            name: Some("Sales".to_string()),
            configuration: Some(r#"{"type":"list"}"#.to_string()),
        }
    );
}

#[tokio::test]
async fn test_dashboard_id_stays_one_segment() {
    let (base, server) = serve_once("200 OK", r#"{"id":"../list?x=1"}"#).await;

    let service = DashboardService::new(&base).unwrap();
    service.find_by_id("../list?x=1").await.unwrap();
    let request = server.await.unwrap();

    assert_eq!(request.method, "GET");
    assert_eq!(request.path, "/api/cube/find/..%2Flist%3Fx=1");
}
