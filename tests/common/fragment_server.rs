//! Minimal HTTP/1.1 server for integration tests: serves a fixed route table
//! of HTML fragments, counts hits per path, and can delay a response to hold
//! a request in flight.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Route {
    pub status: u32,
    /// Response bodies by hit index; the last one repeats. Multiple entries
    /// let a test observe content changing between fetches.
    pub bodies: Vec<String>,
    pub delay: Option<Duration>,
}

impl Route {
    pub fn html(body: &str) -> Self {
        Self {
            status: 200,
            bodies: vec![body.to_string()],
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

pub struct FragmentServer {
    /// e.g. "http://127.0.0.1:12345/"
    pub base_url: String,
    hits: Arc<Mutex<HashMap<String, usize>>>,
}

impl FragmentServer {
    pub fn hits(&self, path: &str) -> usize {
        *self.hits.lock().unwrap().get(path).unwrap_or(&0)
    }
}

/// Starts a server in a background thread. Runs until the process exits.
pub fn start(routes: HashMap<String, Route>) -> FragmentServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes = Arc::new(routes);
    let hits: Arc<Mutex<HashMap<String, usize>>> = Arc::new(Mutex::new(HashMap::new()));
    let server_hits = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let hits = Arc::clone(&server_hits);
            thread::spawn(move || handle(stream, &routes, &hits));
        }
    });
    FragmentServer {
        base_url: format!("http://127.0.0.1:{}/", port),
        hits,
    }
}

fn handle(
    mut stream: std::net::TcpStream,
    routes: &HashMap<String, Route>,
    hits: &Mutex<HashMap<String, usize>>,
) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let Some(path) = parse_request_path(request) else {
        return;
    };

    let hit_index = {
        let mut hits = hits.lock().unwrap();
        let count = hits.entry(path.clone()).or_insert(0);
        let index = *count;
        *count += 1;
        index
    };

    match routes.get(&path) {
        Some(route) => {
            if let Some(delay) = route.delay {
                thread::sleep(delay);
            }
            let body = route
                .bodies
                .get(hit_index)
                .or_else(|| route.bodies.last())
                .cloned()
                .unwrap_or_default();
            let status_line = match route.status {
                200 => "200 OK",
                404 => "404 Not Found",
                500 => "500 Internal Server Error",
                503 => "503 Service Unavailable",
                _ => "200 OK",
            };
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
        }
        None => {
            let body = "not found";
            let response = format!(
                "HTTP/1.1 404 Not Found\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
        }
    }
}

fn parse_request_path(request: &str) -> Option<String> {
    let line = request.lines().next()?;
    let mut parts = line.split_whitespace();
    let method = parts.next()?;
    if !method.eq_ignore_ascii_case("GET") {
        return None;
    }
    Some(parts.next()?.to_string())
}
