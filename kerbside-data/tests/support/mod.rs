//! Test support for the data adapters: a one-shot HTTP server standing in
//! for the route safety prediction service.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Serves a single canned response and records the request body it received.
#[derive(Debug)]
pub struct PredictionServer {
    url: String,
    request: Arc<Mutex<Option<String>>>,
    handle: Option<JoinHandle<()>>,
}

impl PredictionServer {
    /// Answer the next request with `status` (e.g. `"200 OK"`) and a JSON body.
    pub fn respond_once(status: &str, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server");
        let url = format!("http://{}", listener.local_addr().expect("local address"));
        let request = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&request);
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\
             Connection: close\r\n\r\n{body}",
            body.len()
        );
        let handle = thread::spawn(move || {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            stream
                .set_read_timeout(Some(Duration::from_secs(5)))
                .expect("set read timeout");
            let received = read_request_body(&mut stream);
            *sink.lock().expect("request lock") = Some(received);
            stream
                .write_all(response.as_bytes())
                .expect("write response");
        });
        Self {
            url,
            request,
            handle: Some(handle),
        }
    }

    /// Base URL of the server.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Wait for the exchange to finish and return the received body.
    pub fn received_body(&mut self) -> Option<String> {
        if let Some(handle) = self.handle.take() {
            handle.join().expect("server thread");
        }
        self.request.lock().expect("request lock").take()
    }
}

/// A base URL on which nothing is listening.
pub fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind probe");
    let address = listener.local_addr().expect("local address");
    drop(listener);
    format!("http://{address}")
}

fn read_request_body(stream: &mut TcpStream) -> String {
    let mut buffer = Vec::new();
    let mut chunk = [0_u8; 1024];
    loop {
        let read = stream.read(&mut chunk).expect("read request");
        if read == 0 {
            break;
        }
        buffer.extend_from_slice(chunk.get(..read).expect("chunk bounds"));
        if let Some(body) = complete_body(&buffer) {
            return body;
        }
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

fn complete_body(buffer: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(buffer);
    let (head, body) = text.split_once("\r\n\r\n")?;
    let expected = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    (body.len() >= expected).then(|| body.to_owned())
}
