//! Minimal HTTP/1.1 server that answers each request with the next scripted reply.
//!
//! Every connection gets `Connection: close`, so each client attempt is one
//! connection and one request. Once the script is exhausted the last reply
//! repeats. Request arrival times are recorded for retry-timing assertions.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub enum Reply {
    /// Respond with a status line and body.
    Status { code: u16, body: Vec<u8> },
    /// 302 to the given path on the same server.
    Redirect(String),
    /// Read the request, then close the socket without answering.
    Hangup,
}

impl Reply {
    pub fn ok(body: &[u8]) -> Self {
        Reply::Status {
            code: 200,
            body: body.to_vec(),
        }
    }

    pub fn status(code: u16) -> Self {
        Reply::Status {
            code,
            body: format!("status {}", code).into_bytes(),
        }
    }
}

/// Shared record of what the server saw.
#[derive(Debug, Default)]
pub struct RequestLog {
    arrivals: Mutex<Vec<(Instant, String)>>,
}

impl RequestLog {
    pub fn count(&self) -> usize {
        self.arrivals.lock().unwrap().len()
    }

    pub fn paths(&self) -> Vec<String> {
        self.arrivals.lock().unwrap().iter().map(|(_, p)| p.clone()).collect()
    }

    /// Time between consecutive request arrivals.
    pub fn gaps(&self) -> Vec<Duration> {
        let arrivals = self.arrivals.lock().unwrap();
        arrivals.windows(2).map(|w| w[1].0 - w[0].0).collect()
    }
}

/// Starts the server in a background thread. Returns the URL of `/code.deb`
/// and the request log. The server runs until the process exits.
pub fn start(script: Vec<Reply>) -> (String, Arc<RequestLog>) {
    assert!(!script.is_empty(), "script needs at least one reply");
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let log = Arc::new(RequestLog::default());
    let server_log = Arc::clone(&log);
    thread::spawn(move || {
        let mut next = 0usize;
        for stream in listener.incoming().flatten() {
            let reply = script[next.min(script.len() - 1)].clone();
            next += 1;
            handle(stream, &reply, &server_log);
        }
    });
    (format!("http://127.0.0.1:{}/code.deb", port), log)
}

fn handle(mut stream: TcpStream, reply: &Reply, log: &RequestLog) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = String::from_utf8_lossy(&buf[..n]);
    let path = request
        .lines()
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .unwrap_or("")
        .to_string();
    log.arrivals.lock().unwrap().push((Instant::now(), path));

    match reply {
        Reply::Hangup => {}
        Reply::Redirect(location) => {
            let response = format!(
                "HTTP/1.1 302 Found\r\nLocation: {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                location
            );
            let _ = stream.write_all(response.as_bytes());
        }
        Reply::Status { code, body } => {
            let response = format!(
                "HTTP/1.1 {} {}\r\nContent-Type: application/octet-stream\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                code,
                reason(*code),
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.write_all(body);
        }
    }
    let _ = stream.flush();
}

fn reason(code: u16) -> &'static str {
    match code {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Status",
    }
}
