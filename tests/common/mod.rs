//! In-process stand-in for the notice board backend.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use noticeboard::{NoticeClient, Settings};

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: String,
}

impl Recorded {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }
}

pub type Reply = (u16, String);

pub struct StubBackend {
    pub url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl StubBackend {
    pub async fn start<F>(handler: F) -> StubBackend
    where
        F: Fn(&Recorded) -> Reply + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let handler = Arc::new(handler);
        let log = requests.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let handler = handler.clone();
                let log = log.clone();
                tokio::spawn(async move {
                    let _ = serve(stream, handler, log).await;
                });
            }
        });
        StubBackend {
            url: format!("http://{}", addr),
            requests,
        }
    }

    /// A backend that keeps notices in memory and behaves like the real one.
    pub async fn board(seed: Vec<Value>) -> StubBackend {
        let state = Mutex::new(Board {
            next_id: seed.len() as i64 + 1,
            notices: seed,
        });
        StubBackend::start(move |req| state.lock().unwrap().handle(req)).await
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, method: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method)
            .count()
    }

    pub fn client(&self) -> NoticeClient {
        client_for(&self.url)
    }
}

pub fn client_for(url: &str) -> NoticeClient {
    client_with_timeout(url, 5)
}

pub fn client_with_timeout(url: &str, secs: u64) -> NoticeClient {
    let mut cfg = Settings::from_toml("").unwrap();
    cfg.backend_url = url.to_owned();
    cfg.request_timeout_secs = secs;
    NoticeClient::new(&cfg).unwrap()
}

/// Accepts connections and never answers.
pub async fn silent_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });
    format!("http://{}", addr)
}

/// Address nothing listens on.
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub fn notice(id: i64, title: &str, content: &str, category: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "content": content,
        "category": category,
        "date": format!("2024-03-{:02}", id),
    })
}

pub fn sample() -> Vec<Value> {
    vec![
        notice(3, "Exam timetable", "Finals begin on the 12th", "Exams"),
        notice(2, "Sports day", "Meet at the main field", "Events"),
        notice(1, "Library hours", "Open until 9pm", "General"),
    ]
}

struct Board {
    notices: Vec<Value>,
    next_id: i64,
}

impl Board {
    fn handle(&mut self, req: &Recorded) -> Reply {
        match (req.method.as_str(), req.path.as_str()) {
            ("GET", "/get_notices") => {
                let category = req
                    .query
                    .iter()
                    .find(|(k, _)| k == "category")
                    .map(|(_, v)| v.clone());
                let listed: Vec<&Value> = self
                    .notices
                    .iter()
                    .filter(|n| category.as_deref().map_or(true, |c| n["category"] == c))
                    .collect();
                (200, json!(listed).to_string())
            }
            ("POST", "/add_notice") => {
                let body = req.json();
                let title = body["title"].as_str().unwrap_or_default();
                let content = body["content"].as_str().unwrap_or_default();
                if title.is_empty() || content.is_empty() {
                    return (400, json!({"error": "Title and content required"}).to_string());
                }
                let category = body["category"].as_str().unwrap_or("General");
                let id = self.next_id;
                self.next_id += 1;
                self.notices.insert(0, notice(id, title, content, category));
                (201, json!({"message": "Notice added"}).to_string())
            }
            ("DELETE", path) if path.starts_with("/delete_notice/") => {
                let id = &path["/delete_notice/".len()..];
                let before = self.notices.len();
                self.notices.retain(|n| n["id"].to_string() != id);
                if self.notices.len() == before {
                    (404, json!({"error": "Notice not found"}).to_string())
                } else {
                    (200, json!({"message": "Notice deleted"}).to_string())
                }
            }
            _ => (404, json!({"error": "Not found"}).to_string()),
        }
    }
}

fn header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n").map(|p| p + 4)
}

async fn serve<F>(
    mut stream: TcpStream,
    handler: Arc<F>,
    log: Arc<Mutex<Vec<Recorded>>>,
) -> std::io::Result<()>
where
    F: Fn(&Recorded) -> Reply,
{
    let mut buf = Vec::new();
    let mut chunk = [0u8; 2048];
    let head_len = loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(end) = header_end(&buf) {
            break end;
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_len]).into_owned();
    let mut lines = head.lines();
    let mut request_line = lines.next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_owned();
    let target = request_line.next().unwrap_or_default().to_owned();
    let content_length = lines
        .filter_map(|l| l.split_once(':'))
        .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < head_len + content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body_end = buf.len().min(head_len + content_length);
    let body = String::from_utf8_lossy(&buf[head_len..body_end]).into_owned();

    let (path, raw_query) = match target.split_once('?') {
        Some((p, q)) => (p.to_owned(), q.to_owned()),
        None => (target.clone(), String::new()),
    };
    let recorded = Recorded {
        method,
        path,
        query: url::form_urlencoded::parse(raw_query.as_bytes())
            .into_owned()
            .collect(),
        body,
    };
    log.lock().unwrap().push(recorded.clone());

    let (status, payload) = (*handler)(&recorded);
    let response = format!(
        "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        payload.len(),
        payload
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}
