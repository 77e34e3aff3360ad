//! Integration tests for the HTTP chat endpoint against a local server.

use chatshelf::client::{AskRequest, ChatEndpoint, HttpEndpoint};
use chatshelf::Error;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Serve one request with `status` and `body`, returning the request body.
fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/api/chat/ask/", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream);

        let mut content_length = 0;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            if line == "\r\n" || line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap();
                }
            }
        }

        let mut request_body = vec![0; content_length];
        reader.read_exact(&mut request_body).unwrap();

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        reader.get_mut().write_all(response.as_bytes()).unwrap();
        String::from_utf8(request_body).unwrap()
    });

    (url, handle)
}

fn request(message: &str) -> AskRequest {
    AskRequest {
        message: message.to_string(),
        conversation_id: "chat_1_abc".to_string(),
    }
}

#[test]
fn posts_message_and_reads_answer() {
    let (url, server) = serve_once(
        "200 OK",
        r#"{"id": 3, "user_message": "Hello", "ai_response": "Hi!", "created_at": "2026-01-01T00:00:00Z"}"#,
    );
    let endpoint = HttpEndpoint::new(url, Duration::from_secs(5)).unwrap();

    let reply = endpoint.ask(&request("Hello")).unwrap();
    assert_eq!(reply.usable_answer(), Some("Hi!"));

    let sent: serde_json::Value = serde_json::from_str(&server.join().unwrap()).unwrap();
    assert_eq!(sent, serde_json::json!({ "message": "Hello" }));
}

#[test]
fn success_without_answer_is_not_an_error() {
    let (url, server) = serve_once("200 OK", "{}");
    let endpoint = HttpEndpoint::new(url, Duration::from_secs(5)).unwrap();

    let reply = endpoint.ask(&request("Hello")).unwrap();
    assert!(reply.usable_answer().is_none());
    server.join().unwrap();
}

#[test]
fn error_status_is_http_error() {
    let (url, server) = serve_once("400 Bad Request", r#"{"error": "Message is required"}"#);
    let endpoint = HttpEndpoint::new(url, Duration::from_secs(5)).unwrap();

    let result = endpoint.ask(&request(""));
    assert!(matches!(result, Err(Error::Http(_))));
    server.join().unwrap();
}

#[test]
fn unreachable_server_is_http_error() {
    // Bind then drop to get a port with nothing listening
    let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
    let endpoint = HttpEndpoint::new(format!("http://{addr}/"), Duration::from_secs(2)).unwrap();

    assert!(matches!(endpoint.ask(&request("Hello")), Err(Error::Http(_))));
}
