//! Loopback HTTP fixture for acquisition tests.
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread;

/// One canned response, matched on the exact request path.
pub(crate) struct Route {
    pub(crate) path: String,
    pub(crate) status: u16,
    pub(crate) body: Vec<u8>,
}

impl Route {
    pub(crate) fn new(path: &str, status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.to_string(),
            status,
            body: body.into(),
        }
    }
}

/// Listener bound before routes are known, so bodies can embed the base URL.
pub(crate) struct TestServer {
    listener: TcpListener,
    base: String,
}

impl TestServer {
    pub(crate) fn bind() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback listener");
        let base = format!("http://{}", listener.local_addr().expect("local addr"));
        Self { listener, base }
    }

    pub(crate) fn base(&self) -> &str {
        &self.base
    }

    /// Answer requests on a background thread for the rest of the test process.
    /// Unknown paths get a 404.
    pub(crate) fn serve(self, routes: Vec<Route>) -> String {
        let TestServer { listener, base } = self;
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                let Ok(read_half) = stream.try_clone() else { continue };
                let mut reader = BufReader::new(read_half);
                let mut request_line = String::new();
                if reader.read_line(&mut request_line).is_err() {
                    continue;
                }
                loop {
                    let mut header = String::new();
                    match reader.read_line(&mut header) {
                        Ok(0) | Err(_) => break,
                        Ok(_) if header == "\r\n" || header == "\n" => break,
                        Ok(_) => {}
                    }
                }
                let path = request_line.split_whitespace().nth(1).unwrap_or("/");
                let (status, body) = routes
                    .iter()
                    .find(|route| route.path == path)
                    .map(|route| (route.status, route.body.as_slice()))
                    .unwrap_or((404, b"not found".as_slice()));
                let head = format!(
                    "HTTP/1.1 {status} Test\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                let _ = stream.write_all(head.as_bytes());
                let _ = stream.write_all(body);
                let _ = stream.flush();
            }
        });
        base
    }
}

/// Agent that ignores proxy settings from the environment.
pub(crate) fn local_agent() -> ureq::Agent {
    ureq::Agent::config_builder().proxy(None).build().into()
}
