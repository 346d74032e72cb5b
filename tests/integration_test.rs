//! Tests de integración para el servidor de archivos estáticos
//! tests/integration_test.rs
//!
//! Cada test levanta su propio servidor en `127.0.0.1:0` sobre directorios
//! temporales y habla con él por TCP.

use flate2::read::GzDecoder;
use static_server::config::ServerConfig;
use static_server::server::Server;
use std::fs;
use std::io::{Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

const INDEX: &str = "<html><body><h1>index</h1></body></html>";
const CSS: &str = "body { margin: 0; padding: 0; color: #333; }";

/// Servidor corriendo en un thread de fondo
struct TestServer {
    dir: TempDir,
    addr: SocketAddr,
}

impl TestServer {
    fn start() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let web = dir.path().join("web");
        let server = dir.path().join("server");

        fs::create_dir_all(web.join("css")).unwrap();
        fs::create_dir_all(web.join("docs")).unwrap();
        fs::create_dir_all(&server).unwrap();
        fs::write(web.join("index.html"), INDEX).unwrap();
        fs::write(web.join("css/main.css"), CSS).unwrap();
        fs::write(web.join("docs/index.html"), "<h1>docs</h1>").unwrap();
        fs::write(server.join("400.html"), "<h1>400 Bad Request</h1>").unwrap();
        fs::write(server.join("404.html"), "<h1>404 Not Found</h1>").unwrap();
        fs::write(server.join("501.html"), "<h1>501 Not Implemented</h1>").unwrap();

        let config = ServerConfig {
            document_root: web,
            error_root: server,
            bind_port: 0,
            server_identity: "integration/1.0".to_string(),
            read_timeout: Some(Duration::from_secs(5)),
            access_log: Some(dir.path().join("access.log")),
            ..ServerConfig::default()
        };

        let server = Server::bind(config).expect("bind");
        let addr = server.local_addr().unwrap();
        thread::spawn(move || server.run());

        TestServer { dir, addr }
    }

    /// Envía el request crudo y devuelve la respuesta completa
    fn send(&self, raw: &[u8]) -> Vec<u8> {
        let mut stream = TcpStream::connect(self.addr).unwrap();
        stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
        stream.write_all(raw).unwrap();
        stream.shutdown(Shutdown::Write).unwrap();

        let mut response = Vec::new();
        stream.read_to_end(&mut response).unwrap();
        response
    }

    fn get(&self, path: &str, extra_headers: &str) -> Reply {
        let raw = format!("GET {} HTTP/1.1\r\nHost: localhost\r\n{}\r\n", path, extra_headers);
        Reply::split(self.send(raw.as_bytes()))
    }

    fn access_log_path(&self) -> PathBuf {
        self.dir.path().join("access.log")
    }

    fn access_log(&self) -> String {
        fs::read_to_string(self.access_log_path()).unwrap_or_default()
    }

    /// La línea se escribe después de enviar la respuesta
    fn wait_for_log_lines(&self, count: usize) -> String {
        for _ in 0..100 {
            let log = self.access_log();
            if log.lines().count() >= count {
                return log;
            }
            thread::sleep(Duration::from_millis(20));
        }
        self.access_log()
    }
}

/// Respuesta separada en head y body
struct Reply {
    head: String,
    body: Vec<u8>,
}

impl Reply {
    fn split(raw: Vec<u8>) -> Self {
        let pos = raw
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .expect("no blank line in response");
        Reply {
            head: String::from_utf8(raw[..pos].to_vec()).unwrap(),
            body: raw[pos + 4..].to_vec(),
        }
    }

    fn status_line(&self) -> &str {
        self.head.lines().next().unwrap_or_default()
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(": ")?;
            (key == name).then_some(value)
        })
    }

    fn header_names(&self) -> Vec<&str> {
        self.head
            .lines()
            .skip(1)
            .filter_map(|line| line.split_once(": ").map(|(key, _)| key))
            .collect()
    }

    fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[test]
fn test_root_serves_index() {
    let server = TestServer::start();
    let reply = server.get("/", "User-Agent: curl/7.61.1\r\nAccept: */*\r\n");

    assert_eq!(reply.status_line(), "HTTP/1.1 200 OK");
    assert_eq!(
        reply.header_names(),
        vec!["Server", "Date", "Content-Type", "Content-Length", "Connection"]
    );
    assert_eq!(reply.header("Server"), Some("integration/1.0"));
    assert!(reply.header("Date").unwrap().ends_with(" GMT"));
    assert_eq!(reply.header("Content-Type"), Some("text/html;charset=\"utf-8\""));
    assert_eq!(reply.header("Content-Length"), Some(INDEX.len().to_string().as_str()));
    assert_eq!(reply.header("Connection"), Some("close"));
    assert_eq!(reply.body_text(), INDEX);
}

#[test]
fn test_stylesheet_with_gzip() {
    let server = TestServer::start();
    let reply = server.get("/css/main.css", "Accept-Encoding: gzip, deflate, br\r\n");

    assert_eq!(reply.status_line(), "HTTP/1.1 200 OK");
    assert_eq!(
        reply.header_names(),
        vec!["Server", "Date", "Content-Encoding", "Content-Type", "Content-Length", "Connection"]
    );
    assert_eq!(reply.header("Content-Encoding"), Some("gzip"));
    assert_eq!(reply.header("Content-Type"), Some("text/css;charset=\"utf-8\""));
    assert_eq!(reply.header("Content-Length"), Some(reply.body.len().to_string().as_str()));

    let mut decoded = String::new();
    GzDecoder::new(reply.body.as_slice())
        .read_to_string(&mut decoded)
        .unwrap();
    assert_eq!(decoded, CSS);
}

#[test]
fn test_uppercase_path_is_lowercased() {
    let server = TestServer::start();
    let reply = server.get("/CSS/Main.CSS", "");

    assert_eq!(reply.status_line(), "HTTP/1.1 200 OK");
    assert_eq!(reply.body_text(), CSS);
}

#[test]
fn test_directory_with_index() {
    let server = TestServer::start();
    let reply = server.get("/docs", "");

    assert_eq!(reply.status_line(), "HTTP/1.1 200 OK");
    assert_eq!(reply.body_text(), "<h1>docs</h1>");
}

#[test]
fn test_missing_resource_is_not_found() {
    let server = TestServer::start();
    let reply = server.get("/missing.html", "");

    assert_eq!(reply.status_line(), "HTTP/1.1 404 Not Found");
    assert_eq!(reply.header("Content-Type"), Some("text/html;charset=\"utf-8\""));
    assert_eq!(reply.body_text(), "<h1>404 Not Found</h1>");
}

#[test]
fn test_directory_without_index_is_not_found() {
    let server = TestServer::start();
    let reply = server.get("/css", "");

    assert_eq!(reply.status_line(), "HTTP/1.1 404 Not Found");
}

#[test]
fn test_traversal_is_bad_request() {
    let server = TestServer::start();

    for path in ["../css/main.css", "/../../etc/passwd", "/./index.html", "/css/../index.html"] {
        let reply = server.get(path, "");
        assert_eq!(reply.status_line(), "HTTP/1.1 400 Bad Request", "{path}");
        assert_eq!(reply.body_text(), "<h1>400 Bad Request</h1>");
    }
}

#[test]
fn test_traversal_wins_over_method() {
    let server = TestServer::start();
    let reply = Reply::split(server.send(b"DELETE ../index.html HTTP/1.1\r\n\r\n"));

    assert_eq!(reply.status_line(), "HTTP/1.1 400 Bad Request");
}

#[test]
fn test_other_methods_are_not_implemented() {
    let server = TestServer::start();

    for method in ["POST", "HEAD", "PUT", "DELETE", "OPTIONS", "BREW"] {
        let raw = format!("{} / HTTP/1.1\r\n\r\n", method);
        let reply = Reply::split(server.send(raw.as_bytes()));
        assert_eq!(reply.status_line(), "HTTP/1.1 501 Not Implemented", "{method}");
        assert_eq!(reply.body_text(), "<h1>501 Not Implemented</h1>");
    }
}

#[test]
fn test_lowercase_get_is_accepted() {
    let server = TestServer::start();
    let reply = Reply::split(server.send(b"get / HTTP/1.0\r\n\r\n"));

    assert_eq!(reply.status_line(), "HTTP/1.0 200 OK");
}

#[test]
fn test_bare_newlines_are_accepted() {
    let server = TestServer::start();
    let reply = Reply::split(server.send(b"GET /css/main.css HTTP/1.1\nHost: localhost\n\n"));

    assert_eq!(reply.status_line(), "HTTP/1.1 200 OK");
    assert_eq!(reply.body_text(), CSS);
}

#[test]
fn test_unparsable_request_gets_bad_request() {
    let server = TestServer::start();
    let reply = Reply::split(server.send(b"HELLO\r\n\r\n"));

    assert_eq!(reply.status_line(), "HTTP/1.1 400 Bad Request");
}

#[test]
fn test_empty_connection_gets_nothing() {
    let server = TestServer::start();
    let response = server.send(b"");

    assert!(response.is_empty());
}

#[test]
fn test_same_request_is_idempotent() {
    let server = TestServer::start();

    let first = server.get("/css/main.css", "Accept-Encoding: gzip\r\n");
    let second = server.get("/css/main.css", "Accept-Encoding: gzip\r\n");

    assert_eq!(first.status_line(), second.status_line());
    assert_eq!(first.header_names(), second.header_names());
    assert_eq!(first.body, second.body);
}

#[test]
fn test_access_log_lines() {
    let server = TestServer::start();

    server.get("/", "User-Agent: curl/7.61.1\r\n");
    server.get("/nope", "User-Agent: curl/7.61.1\r\n");

    let log = server.wait_for_log_lines(2);
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 2);

    for line in &lines {
        assert!(line.starts_with("127.0.0.1 ["), "{line}");
    }
    assert!(log.contains("GMT] \"GET\" 200 OK curl/7.61.1 /\n"));
    assert!(log.contains("GMT] \"GET\" 404 Not Found curl/7.61.1 /nope\n"));
}

#[test]
fn test_concurrent_clients() {
    let server = TestServer::start();
    let addr = server.addr;

    let handles: Vec<_> = (0..16)
        .map(|_| {
            thread::spawn(move || {
                let mut stream = TcpStream::connect(addr).unwrap();
                stream.write_all(b"GET /css/main.css HTTP/1.1\r\n\r\n").unwrap();
                let mut response = Vec::new();
                stream.read_to_end(&mut response).unwrap();
                Reply::split(response)
            })
        })
        .collect();

    for handle in handles {
        let reply = handle.join().unwrap();
        assert_eq!(reply.status_line(), "HTTP/1.1 200 OK");
        assert_eq!(reply.body_text(), CSS);
    }

    let log = server.wait_for_log_lines(16);
    assert_eq!(log.lines().count(), 16);
}

#[test]
fn test_favicon_is_not_found() {
    let server = TestServer::start();
    let reply = server.get("/favicon.ico", "");

    assert_eq!(reply.status_line(), "HTTP/1.1 404 Not Found");
}

#[test]
fn test_index_with_browser_accept_encoding() {
    let server = TestServer::start();
    let reply = server.get("/", "Accept-Encoding: gzip,deflate,br\r\n");

    assert_eq!(reply.status_line(), "HTTP/1.1 200 OK");
    assert_eq!(reply.header("Content-Encoding"), Some("gzip"));

    let mut decoded = String::new();
    GzDecoder::new(reply.body.as_slice())
        .read_to_string(&mut decoded)
        .unwrap();
    assert_eq!(decoded, INDEX);
}
