//! Shared fixtures for the integration tests: a one-shot HTTP stub and
//! helpers for building PNG files.

#![allow(dead_code)]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{Ipv4Addr, TcpListener};
use std::path::Path;
use std::thread::{self, JoinHandle};

use image::{Rgba, RgbaImage};

/// A request captured by [`StubServer`].
#[derive(Debug)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Contents of the multipart field `name`, if present.
    pub fn form_field(&self, name: &str) -> Option<Vec<u8>> {
        let content_type = self.header("content-type")?;
        let boundary = content_type.split("boundary=").nth(1)?.trim_matches('"');
        let delimiter = format!("--{boundary}");
        let marker = format!("name=\"{name}\"");

        let body = &self.body;
        let mut start = 0;
        while let Some(offset) = find(&body[start..], delimiter.as_bytes()) {
            let part_start = start + offset + delimiter.len();
            let part_end = find(&body[part_start..], delimiter.as_bytes())
                .map(|end| part_start + end)
                .unwrap_or(body.len());
            let part = &body[part_start..part_end];

            if let Some(header_end) = find(part, b"\r\n\r\n") {
                let headers = String::from_utf8_lossy(&part[..header_end]);
                if headers.contains(&marker) {
                    let mut content = &part[header_end + 4..];
                    if content.ends_with(b"\r\n") {
                        content = &content[..content.len() - 2];
                    }
                    return Some(content.to_vec());
                }
            }
            start = part_end;
            if part_end == body.len() {
                break;
            }
        }
        None
    }

    /// Raw part headers of the multipart field `name`.
    pub fn form_field_headers(&self, name: &str) -> Option<String> {
        let text = self.body_text();
        let marker = format!("name=\"{name}\"");
        let start = text.find(&marker)?;
        let line_start = text[..start].rfind("\r\n").map(|i| i + 2).unwrap_or(0);
        let end = text[start..].find("\r\n\r\n")? + start;
        Some(text[line_start..end].to_string())
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Serves exactly one HTTP request with a canned response, then stops.
pub struct StubServer {
    pub base_url: String,
    handle: JoinHandle<RecordedRequest>,
}

impl StubServer {
    pub fn start(status: u16, body: &str) -> Self {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).expect("bind stub server");
        let port = listener.local_addr().unwrap().port();
        let body = body.to_string();

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().expect("accept upload");
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let request = read_request(&mut reader);

            let response = format!(
                "HTTP/1.1 {} {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                reason(status),
                body.len(),
                body
            );
            let mut stream = stream;
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
            request
        });

        Self {
            base_url: format!("http://127.0.0.1:{port}"),
            handle,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Wait for the single request to arrive and return it.
    pub fn request(self) -> RecordedRequest {
        self.handle.join().expect("stub server thread panicked")
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        403 => "Forbidden",
        500 => "Internal Server Error",
        _ => "Status",
    }
}

fn read_request(reader: &mut impl BufRead) -> RecordedRequest {
    let mut request_line = String::new();
    reader.read_line(&mut request_line).unwrap();
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((key, value)) = line.split_once(':') {
            headers.push((key.trim().to_string(), value.trim().to_string()));
        }
    }

    let header = |name: &str| {
        headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.clone())
    };

    let body = if let Some(length) = header("content-length") {
        let mut body = vec![0; length.parse().unwrap()];
        reader.read_exact(&mut body).unwrap();
        body
    } else if header("transfer-encoding").is_some_and(|v| v.eq_ignore_ascii_case("chunked")) {
        read_chunked(reader)
    } else {
        Vec::new()
    };

    RecordedRequest {
        method,
        path,
        headers,
        body,
    }
}

fn read_chunked(reader: &mut impl BufRead) -> Vec<u8> {
    let mut body = Vec::new();
    loop {
        let mut size_line = String::new();
        reader.read_line(&mut size_line).unwrap();
        let size = usize::from_str_radix(size_line.trim().split(';').next().unwrap(), 16).unwrap();
        let mut chunk = vec![0; size + 2];
        reader.read_exact(&mut chunk).unwrap();
        if size == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..size]);
    }
    body
}

/// A small, deterministic RGBA test image.
pub fn sample_image() -> RgbaImage {
    RgbaImage::from_fn(12, 8, |x, y| {
        Rgba([(x * 20) as u8, (y * 30) as u8, ((x * y) % 255) as u8, 255])
    })
}

/// Write [`sample_image`] as a PNG file at `path`.
pub fn write_sample_png(path: &Path) {
    sample_image().save(path).unwrap();
}
