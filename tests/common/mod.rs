#![allow(dead_code)]

use std::{
    io::Read as _,
    sync::{Arc, Mutex},
    thread,
};

/// A canned response for one method and path. If `query` is set, the
/// request's query string must contain it.
pub struct Route {
    pub method: &'static str,
    pub path: &'static str,
    pub query: Option<&'static str>,
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl Route {
    pub fn json(method: &'static str, path: &'static str, body: serde_json::Value) -> Self {
        Self {
            method,
            path,
            query: None,
            status: 200,
            content_type: "application/json",
            body: body.to_string(),
        }
    }

    pub fn empty(method: &'static str, path: &'static str) -> Self {
        Self {
            method,
            path,
            query: None,
            status: 200,
            content_type: "application/json",
            body: String::new(),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn with_query(mut self, query: &'static str) -> Self {
        self.query = Some(query);
        self
    }

    fn matches(&self, req: &Recorded) -> bool {
        self.method == req.method
            && self.path == req.path()
            && self.query.is_none_or(|q| req.query().contains(q))
    }
}

/// A request the server received.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Recorded {
    pub fn path(&self) -> &str {
        self.url.split('?').next().unwrap_or_default()
    }

    pub fn query(&self) -> &str {
        self.url.split_once('?').map(|(_, q)| q).unwrap_or_default()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A local HTTP server answering with canned responses. Unknown routes get a
/// Spring-style 404 body.
pub struct MockServer {
    pub url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
    server: Arc<tiny_http::Server>,
    handle: Option<thread::JoinHandle<()>>,
}

impl MockServer {
    pub fn start(routes: Vec<Route>) -> Self {
        let server = Arc::new(tiny_http::Server::http("127.0.0.1:0").expect("bind mock server"));
        let port = server
            .server_addr()
            .to_ip()
            .map(|a| a.port())
            .expect("mock server port");

        let requests: Arc<Mutex<Vec<Recorded>>> = Arc::default();

        let handle = thread::spawn({
            let server = server.clone();
            let requests = requests.clone();
            move || {
                for mut req in server.incoming_requests() {
                    let mut body = String::new();
                    let _ = req.as_reader().read_to_string(&mut body);

                    let recorded = Recorded {
                        method: req.method().to_string(),
                        url: req.url().to_owned(),
                        headers: req
                            .headers()
                            .iter()
                            .map(|h| (h.field.to_string(), h.value.to_string()))
                            .collect(),
                        body,
                    };

                    let route = routes.iter().find(|r| r.matches(&recorded));

                    let resp = match route {
                        Some(r) => tiny_http::Response::from_string(r.body.clone())
                            .with_status_code(r.status)
                            .with_header(content_type(r.content_type)),
                        None => {
                            let body = serde_json::json!({
                                "status": 404,
                                "error": "Not Found",
                                "message": format!("No route for {}", recorded.path()),
                                "path": recorded.path(),
                            });

                            tiny_http::Response::from_string(body.to_string())
                                .with_status_code(404)
                                .with_header(content_type("application/json"))
                        }
                    };

                    requests.lock().unwrap().push(recorded);
                    let _ = req.respond(resp);
                }
            }
        });

        Self {
            url: format!("http://127.0.0.1:{port}"),
            requests,
            server,
            handle: Some(handle),
        }
    }

    /// All requests received so far, in order.
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn content_type(value: &str) -> tiny_http::Header {
    tiny_http::Header::from_bytes(&b"Content-Type"[..], value.as_bytes()).unwrap()
}
