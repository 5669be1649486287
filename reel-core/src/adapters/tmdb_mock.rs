//! Mock TMDB API server for testing
//!
//! Serves the subset of the TMDB v3 API the client uses:
//! - GET /movie/{popular,top_rated,now_playing,upcoming}?page=N
//! - GET /search/movie?query=Q&page=N
//! - GET /movie/{id}
//!
//! Every request must carry `api_key=test_key`.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use serde_json::json;
use url::Url;

const VALID_KEY: &str = "test_key";
const PAGE_SIZE: u32 = 20;
const TOTAL_PAGES: u32 = 3;

/// Mock TMDB server for testing
pub struct MockTmdbServer {
    port: u16,
    running: Arc<AtomicBool>,
    requests: Arc<Mutex<Vec<String>>>,
    thread_handle: Option<thread::JoinHandle<()>>,
}

/// Behavior switches for the mock
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Respond 500 to every request
    pub fail_server: bool,
    /// Respond 429 to every request
    pub rate_limit: bool,
    /// Delay in milliseconds before responding
    pub delay_ms: u64,
}

impl MockTmdbServer {
    /// Start a new mock server on a random available port
    pub fn start(config: MockConfig) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();
        let running = Arc::new(AtomicBool::new(true));
        let requests = Arc::new(Mutex::new(Vec::new()));

        listener.set_nonblocking(true)?;

        let running_clone = running.clone();
        let requests_clone = requests.clone();
        let thread_handle = thread::spawn(move || {
            while running_clone.load(Ordering::SeqCst) {
                match listener.accept() {
                    Ok((stream, _)) => {
                        let cfg = config.clone();
                        let log = requests_clone.clone();
                        thread::spawn(move || handle_connection(stream, &cfg, &log));
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(std::time::Duration::from_millis(10));
                    }
                    Err(_) => break,
                }
            }
        });

        Ok(Self {
            port,
            running,
            requests,
            thread_handle: Some(thread_handle),
        })
    }

    /// Base URL to hand to the client
    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Request targets (path + query) received so far
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for MockTmdbServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn handle_connection(mut stream: TcpStream, config: &MockConfig, log: &Mutex<Vec<String>>) {
    let _ = stream.set_nonblocking(false);
    let mut buffer = [0; 4096];
    let n = match stream.read(&mut buffer) {
        Ok(n) => n,
        Err(_) => return,
    };
    let request = String::from_utf8_lossy(&buffer[..n]);

    if config.delay_ms > 0 {
        thread::sleep(std::time::Duration::from_millis(config.delay_ms));
    }

    let first_line = request.lines().next().unwrap_or("");
    let parts: Vec<&str> = first_line.split_whitespace().collect();
    if parts.len() < 2 || parts[0] != "GET" {
        send_response(&mut stream, 405, "Method Not Allowed", r#"{"status_code": 405}"#);
        return;
    }

    let target = parts[1];
    if let Ok(mut entries) = log.lock() {
        entries.push(target.to_string());
    }

    let url = match Url::parse(&format!("http://mock{}", target)) {
        Ok(url) => url,
        Err(_) => {
            send_response(&mut stream, 400, "Bad Request", r#"{"status_code": 400}"#);
            return;
        }
    };
    let param = |name: &str| {
        url.query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    };

    if config.fail_server {
        send_response(&mut stream, 500, "Internal Server Error", r#"{"status_code": 500}"#);
        return;
    }
    if config.rate_limit {
        send_response(&mut stream, 429, "Too Many Requests", r#"{"status_code": 25}"#);
        return;
    }
    if param("api_key").as_deref() != Some(VALID_KEY) {
        send_response(
            &mut stream,
            401,
            "Unauthorized",
            r#"{"status_code": 7, "status_message": "Invalid API key"}"#,
        );
        return;
    }

    let page: u32 = param("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let path = url.path();

    let body = match path {
        "/movie/popular" | "/movie/top_rated" | "/movie/now_playing" | "/movie/upcoming" => {
            listing_page(&path["/movie/".len()..], page)
        }
        "/search/movie" => {
            let query = param("query").unwrap_or_default();
            json!({
                "page": page,
                "results": [movie_json(9000, &format!("Result for {}", query))],
                "total_pages": 1,
                "total_results": 1,
            })
        }
        _ => match path.strip_prefix("/movie/").and_then(|id| id.parse::<i64>().ok()) {
            Some(id) if id < 1_000_000 => details_json(id),
            _ => {
                send_response(
                    &mut stream,
                    404,
                    "Not Found",
                    r#"{"status_code": 34, "status_message": "The resource you requested could not be found."}"#,
                );
                return;
            }
        },
    };

    send_response(&mut stream, 200, "OK", &body.to_string());
}

fn listing_page(category: &str, page: u32) -> serde_json::Value {
    let results: Vec<serde_json::Value> = if page <= TOTAL_PAGES {
        (0..PAGE_SIZE)
            .map(|i| {
                let id = (page * 100 + i) as i64;
                movie_json(id, &format!("{} movie {}", category, id))
            })
            .collect()
    } else {
        Vec::new()
    };
    json!({
        "page": page,
        "results": results,
        "total_pages": TOTAL_PAGES,
        "total_results": TOTAL_PAGES * PAGE_SIZE,
    })
}

fn movie_json(id: i64, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "original_title": title,
        "overview": "A mock movie.",
        "poster_path": format!("/poster{}.jpg", id),
        "backdrop_path": null,
        "release_date": "2020-01-01",
        "vote_average": 7.25,
        "vote_count": 100,
        "popularity": 12.5,
        "genre_ids": [18],
        "adult": false,
        "original_language": "en",
        "video": false,
    })
}

fn details_json(id: i64) -> serde_json::Value {
    let mut body = movie_json(id, &format!("Movie {}", id));
    if let Some(map) = body.as_object_mut() {
        map.remove("genre_ids");
        map.insert("genres".into(), json!([{"id": 18, "name": "Drama"}]));
        map.insert("runtime".into(), json!(125));
        map.insert("budget".into(), json!(1_000_000));
        map.insert("revenue".into(), json!(5_000_000));
        map.insert("status".into(), json!("Released"));
        map.insert("tagline".into(), json!("Mocked to perfection."));
        map.insert(
            "production_companies".into(),
            json!([{"id": 1, "name": "Mock Pictures", "logo_path": null, "origin_country": "US"}]),
        );
        map.insert(
            "production_countries".into(),
            json!([{"iso_3166_1": "US", "name": "United States of America"}]),
        );
        map.insert(
            "spoken_languages".into(),
            json!([{"iso_639_1": "en", "name": "English", "english_name": "English"}]),
        );
    }
    body
}

fn send_response(stream: &mut TcpStream, status: u16, status_text: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        status_text,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::tmdb::TmdbClient;
    use crate::domain::result::Error;
    use crate::ports::CatalogProvider;

    fn client(server: &MockTmdbServer) -> TmdbClient {
        TmdbClient::new_with_base_url(VALID_KEY, &server.base_url()).unwrap()
    }

    #[test]
    fn test_mock_server_popular() {
        let server = MockTmdbServer::start(MockConfig::default()).unwrap();
        let page = client(&server).popular(2).unwrap();

        assert_eq!(page.page, 2);
        assert_eq!(page.results.len(), PAGE_SIZE as usize);
        assert_eq!(page.results[0].id, 200);
        assert_eq!(page.results[0].poster_path.as_deref(), Some("/poster200.jpg"));
        assert!(page.has_next_page());
    }

    #[test]
    fn test_each_listing_hits_its_endpoint() {
        let server = MockTmdbServer::start(MockConfig::default()).unwrap();
        let client = client(&server);

        client.top_rated(1).unwrap();
        client.now_playing(1).unwrap();
        client.upcoming(3).unwrap();

        let requests = server.requests();
        assert_eq!(requests.len(), 3);
        assert!(requests[0].starts_with("/movie/top_rated?page=1"));
        assert!(requests[1].starts_with("/movie/now_playing?page=1"));
        assert!(requests[2].starts_with("/movie/upcoming?page=3"));
        assert!(requests.iter().all(|r| r.contains("api_key=test_key")));
    }

    #[test]
    fn test_mock_server_search_encodes_query() {
        let server = MockTmdbServer::start(MockConfig::default()).unwrap();
        let page = client(&server).search("Amélie & friends", 1).unwrap();

        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].title, "Result for Amélie & friends");
    }

    #[test]
    fn test_mock_server_details() {
        let server = MockTmdbServer::start(MockConfig::default()).unwrap();
        let details = client(&server).details(550).unwrap();

        assert_eq!(details.movie.id, 550);
        assert_eq!(details.runtime, Some(125));
        assert_eq!(details.genre_names(), "Drama");
        assert_eq!(details.production_companies[0].name, "Mock Pictures");
        assert_eq!(details.to_movie().genre_ids, vec![18]);
    }

    #[test]
    fn test_mock_server_not_found() {
        let server = MockTmdbServer::start(MockConfig::default()).unwrap();
        let err = client(&server).details(5_000_000).unwrap_err();

        assert!(matches!(err, Error::Catalog(_)));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_mock_server_auth_failure() {
        let server = MockTmdbServer::start(MockConfig::default()).unwrap();
        let client = TmdbClient::new_with_base_url("wrong_key", &server.base_url()).unwrap();
        let err = client.popular(1).unwrap_err();

        assert!(matches!(err, Error::Catalog(_)));
        assert!(err.to_string().contains("authentication"));
    }

    #[test]
    fn test_mock_server_rate_limit() {
        let server = MockTmdbServer::start(MockConfig {
            rate_limit: true,
            ..Default::default()
        })
        .unwrap();
        let err = client(&server).popular(1).unwrap_err();
        assert!(err.to_string().to_lowercase().contains("rate limit"));
    }

    #[test]
    fn test_single_attempt_on_server_error() {
        let server = MockTmdbServer::start(MockConfig {
            fail_server: true,
            ..Default::default()
        })
        .unwrap();
        let err = client(&server).popular(1).unwrap_err();

        assert!(err.to_string().contains("HTTP 500"));
        assert_eq!(server.requests().len(), 1);
    }
}
