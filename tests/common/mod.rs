#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use catalog_probe::SuiteConfig;
use serde_json::{Value, json};

pub const JSON_UTF8: &str = "application/json; charset=utf-8";

#[derive(Debug, Clone)]
pub struct StubRequest {
    pub method: String,
    pub path: String,
    pub body: String,
    /// `http://127.0.0.1:<port>` of the stub itself.
    pub origin: String,
}

#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    pub content_type: String,
    pub body: Vec<u8>,
}

impl StubResponse {
    pub fn json(status: u16, value: &Value) -> Self {
        Self {
            status,
            content_type: JSON_UTF8.to_string(),
            body: value.to_string().into_bytes(),
        }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "text/html; charset=utf-8".to_string(),
            body: body.as_bytes().to_vec(),
        }
    }

    pub fn empty(status: u16) -> Self {
        Self::text(status, "")
    }
}

type Handler = dyn Fn(&StubRequest) -> StubResponse + Send + Sync;

/// In-process HTTP server answering every connection with `handler`.
pub struct StubServer {
    pub origin: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    pub fn spawn(handler: impl Fn(&StubRequest) -> StubResponse + Send + Sync + 'static) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let origin = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let handler: Arc<Handler> = Arc::new(handler);

        let log = Arc::clone(&requests);
        let server_origin = origin.clone();
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                serve(stream, &server_origin, handler.as_ref(), &log);
            }
        });

        Self { origin, requests }
    }

    /// Collection endpoint on this stub.
    pub fn base_url(&self) -> String {
        format!("{}/products", self.origin)
    }

    /// `"METHOD /path"` for every request served so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn config(&self, seed: u64) -> SuiteConfig {
        SuiteConfig {
            base_url: self.base_url(),
            seed: Some(seed),
            ..Default::default()
        }
    }
}

fn serve(mut stream: TcpStream, origin: &str, handler: &Handler, log: &Mutex<Vec<String>>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let Some(request) = read_request(&mut stream, origin) else {
        return;
    };
    log.lock()
        .unwrap()
        .push(format!("{} {}", request.method, request.path));

    let response = handler(&request);
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        response.status,
        reason(response.status),
        response.content_type,
        response.body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&response.body);
    let _ = stream.flush();
}

fn read_request(stream: &mut TcpStream, origin: &str) -> Option<StubRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let header_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        let read = stream.read(&mut chunk).ok()?;
        if read == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..read]);
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.lines();
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();

    let content_length = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let read = stream.read(&mut chunk).ok()?;
        if read == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..read]);
    }
    let body_end = buf.len().min(header_end + content_length);
    let body = String::from_utf8_lossy(&buf[header_end..body_end]).into_owned();

    Some(StubRequest {
        method,
        path,
        body,
        origin: origin.to_string(),
    })
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        _ => "Status",
    }
}

pub fn product(id: i64, origin: &str) -> Value {
    json!({
        "id": id,
        "title": format!("Product {id}"),
        "price": 10.5 + id as f64,
        "description": format!("Description of product {id}"),
        "category": "electronics",
        "image": format!("{origin}/img/{id}.jpg"),
        "rating": { "rate": 4.2, "count": 100 + id }
    })
}

/// Answers like a conforming catalog with items `1..=count`.
pub fn conforming_catalog(count: i64) -> impl Fn(&StubRequest) -> StubResponse + Send + Sync {
    move |req| catalog_response(req, count)
}

pub fn catalog_response(req: &StubRequest, count: i64) -> StubResponse {
    let segments: Vec<&str> = req.path.trim_matches('/').split('/').collect();
    match (req.method.as_str(), segments.as_slice()) {
        ("GET", ["products"]) => {
            let items: Vec<Value> = (1..=count).map(|id| product(id, &req.origin)).collect();
            StubResponse::json(200, &Value::Array(items))
        }
        ("GET", ["products", raw]) => match raw.parse::<i64>() {
            Ok(id) if (1..=count).contains(&id) => StubResponse::json(200, &product(id, &req.origin)),
            Ok(_) => StubResponse::empty(404),
            Err(_) => StubResponse::empty(400),
        },
        ("POST", ["products", raw]) => {
            StubResponse::text(405, &format!("<pre>Cannot POST /products/{raw}</pre>\n"))
        }
        ("GET", ["img", _]) => StubResponse {
            status: 200,
            content_type: "image/jpeg".to_string(),
            body: vec![0xFF, 0xD8, 0xFF, 0xE0],
        },
        _ => StubResponse::empty(404),
    }
}
