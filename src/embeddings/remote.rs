// remote.rs — OpenAI-compatible embeddings endpoint client.
//
// POST {base_url}/embeddings with {"model": ..., "input": ...}, take data[0].embedding.
// Works against Ollama's /v1 compatibility layer and any OpenAI-style server.
// Every failure (timeout, refused connection, HTTP status, bad JSON) is logged
// and reported as an empty vector.

use std::time::Duration;

use anyhow::{bail, Context};
use serde::Deserialize;

use crate::embeddings::Embedder;

pub struct RemoteEmbedder {
    endpoint: String,
    model: String,
    api_key: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    #[serde(default)]
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

impl RemoteEmbedder {
    pub fn new(base_url: &str, model: &str, api_key: &str, timeout: Duration) -> Self {
        Self {
            endpoint: format!("{}/embeddings", base_url.trim_end_matches('/')),
            model: model.to_string(),
            api_key: api_key.to_string(),
            timeout,
        }
    }

    pub fn try_embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        let body = serde_json::json!({ "model": self.model, "input": text });

        let resp = ureq::post(&self.endpoint)
            .timeout(self.timeout)
            .set("Content-Type", "application/json")
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .send_string(&body.to_string());

        let resp = match resp {
            Ok(r) => r,
            Err(ureq::Error::Status(code, r)) => {
                let detail = r.into_string().unwrap_or_default();
                bail!("HTTP {code} from {}: {}", self.endpoint, detail.trim());
            }
            Err(e) => return Err(e).with_context(|| format!("request to {} failed", self.endpoint)),
        };

        let text = resp
            .into_string()
            .with_context(|| format!("failed to read response body from {}", self.endpoint))?;
        parse_embeddings_response(&text)
    }
}

impl Embedder for RemoteEmbedder {
    fn embed(&self, text: &str) -> Vec<f32> {
        match self.try_embed(text) {
            Ok(v) => v,
            Err(e) => {
                log::warn!("Remote embedding failed: {:?}", e);
                Vec::new()
            }
        }
    }

    fn describe(&self) -> String {
        format!("remote:{} ({})", self.model, self.endpoint)
    }

    fn dims(&self) -> Option<usize> {
        None
    }
}

fn parse_embeddings_response(body: &str) -> anyhow::Result<Vec<f32>> {
    let parsed: EmbeddingsResponse =
        serde_json::from_str(body).context("malformed embeddings response")?;
    let Some(first) = parsed.data.into_iter().next() else {
        bail!("embeddings response contained no data");
    };
    if first.embedding.is_empty() {
        bail!("embeddings response contained an empty vector");
    }
    Ok(first.embedding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;

    /// Serve exactly one HTTP request with a canned JSON body, returning the request text.
    fn serve_once(status: &str, body: &'static str) -> (String, std::thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let status = status.to_string();
        let handle = std::thread::spawn(move || {
            let (mut sock, _) = listener.accept().unwrap();
            let mut req = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = sock.read(&mut buf).unwrap();
                req.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&req).to_string();
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let content_len = text[..header_end]
                        .lines()
                        .find_map(|l| {
                            let lower = l.to_ascii_lowercase();
                            lower.strip_prefix("content-length:").map(|v| v.trim().parse::<usize>().unwrap())
                        })
                        .unwrap_or(0);
                    if req.len() >= header_end + 4 + content_len {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }
            let resp = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            sock.write_all(resp.as_bytes()).unwrap();
            String::from_utf8_lossy(&req).to_string()
        });
        (format!("http://{addr}/v1"), handle)
    }

    #[test]
    fn test_parse_embeddings_response() {
        let v = parse_embeddings_response(r#"{"object":"list","data":[{"embedding":[0.5,-0.25,1e-3],"index":0}]}"#).unwrap();
        assert_eq!(v, vec![0.5, -0.25, 0.001]);
    }

    #[test]
    fn test_parse_embeddings_response_rejects_bad_shapes() {
        assert!(parse_embeddings_response("not json").is_err());
        assert!(parse_embeddings_response(r#"{"data":[]}"#).is_err());
        assert!(parse_embeddings_response(r#"{"data":[{"embedding":[]}]}"#).is_err());
        assert!(parse_embeddings_response(r#"{"error":"model not found"}"#).is_err());
    }

    #[test]
    fn test_embed_sends_model_and_input() {
        let (base, handle) = serve_once("200 OK", r#"{"data":[{"embedding":[1.0,2.0,3.0]}]}"#);
        let remote = RemoteEmbedder::new(&base, "nomic-embed-text", "ollama", Duration::from_secs(5));
        let v = remote.embed("charging cable");
        assert_eq!(v, vec![1.0, 2.0, 3.0]);

        let req = handle.join().unwrap();
        assert!(req.starts_with("POST /v1/embeddings"));
        assert!(req.contains("Bearer ollama"));
        assert!(req.contains(r#""model":"nomic-embed-text""#));
        assert!(req.contains(r#""input":"charging cable""#));
    }

    #[test]
    fn test_embed_http_error_yields_empty_vector() {
        let (base, handle) = serve_once("500 Internal Server Error", r#"{"error":"boom"}"#);
        let remote = RemoteEmbedder::new(&base, "m", "k", Duration::from_secs(5));
        assert!(remote.embed("anything").is_empty());
        handle.join().unwrap();
    }

    #[test]
    fn test_embed_unreachable_yields_empty_vector() {
        // Bind then drop to get a port nobody listens on.
        let port = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
        let remote = RemoteEmbedder::new(&format!("http://127.0.0.1:{port}/v1/"), "m", "k", Duration::from_secs(2));
        assert!(remote.embed("anything").is_empty());
    }

    #[test]
    fn test_endpoint_trailing_slash_normalised() {
        let remote = RemoteEmbedder::new("http://localhost:11434/v1/", "m", "k", Duration::from_secs(1));
        assert!(remote.describe().contains("http://localhost:11434/v1/embeddings"));
    }
}
