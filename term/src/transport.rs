//! Executes core `HttpRequest`s with ureq.

use std::time::Duration;

use score_lookup_core::{HttpMethod, HttpRequest, HttpResponse, TransportFailure};
use tracing::debug;

#[derive(Clone)]
pub struct Transport {
    agent: ureq::Agent,
}

impl Transport {
    /// `timeout` bounds the whole round-trip on the socket side; the
    /// controller enforces the same bound on its own clock.
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }

    /// Status codes are returned as data; only failures to get any
    /// response at all become `TransportFailure::Network`.
    pub fn execute(&self, req: &HttpRequest) -> Result<HttpResponse, TransportFailure> {
        debug!(method = req.method.as_str(), url = %req.url, "executing request");
        let mut response = match req.method {
            HttpMethod::Get => self.agent.get(&req.url).call(),
        }
        .map_err(|e| TransportFailure::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| TransportFailure::Network(e.to_string()))?;
        debug!(status, bytes = body.len(), "response received");
        Ok(HttpResponse::new(status, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mock_server::Directory;
    use score_lookup_core::{LookupConfig, LookupController};
    use std::net::SocketAddr;
    use std::time::Instant;

    fn serve(directory: Directory) -> SocketAddr {
        let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = std_listener.local_addr().unwrap();
        std_listener.set_nonblocking(true).unwrap();

        std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async {
                let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
                mock_server::run_with(listener, directory).await
            })
            .unwrap();
        });
        addr
    }

    fn transport() -> Transport {
        Transport::new(Duration::from_secs(5))
    }

    #[test]
    fn executes_lookup_request() {
        let addr = serve(Directory::sample());
        let mut controller = LookupController::new(LookupConfig::with_endpoint(&format!("http://{addr}/exec")));
        let pending = controller.submit("Tanaka", Instant::now()).unwrap();

        let response = transport().execute(&pending.request).unwrap();
        assert_eq!(response.status, 200);
        assert!(response.body.contains("Tanaka"));
    }

    #[test]
    fn error_status_is_data() {
        let addr = serve(Directory {
            outage: Some(503),
            ..Directory::sample()
        });
        let req = HttpRequest {
            method: HttpMethod::Get,
            url: format!("http://{addr}/exec?name=Tanaka"),
            headers: Vec::new(),
            body: None,
        };

        let response = transport().execute(&req).unwrap();
        assert_eq!(response.status, 503);
    }

    #[test]
    fn refused_connection_is_network_failure() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let req = HttpRequest {
            method: HttpMethod::Get,
            url: format!("http://{addr}/exec?name=Tanaka"),
            headers: Vec::new(),
            body: None,
        };

        let err = transport().execute(&req).unwrap_err();
        assert!(matches!(err, TransportFailure::Network(_)));
    }

    #[test]
    fn slow_server_hits_socket_timeout() {
        let addr = serve(Directory {
            latency: Duration::from_secs(2),
            ..Directory::sample()
        });
        let req = HttpRequest {
            method: HttpMethod::Get,
            url: format!("http://{addr}/exec?name=Tanaka"),
            headers: Vec::new(),
            body: None,
        };

        let err = Transport::new(Duration::from_millis(200)).execute(&req).unwrap_err();
        assert!(matches!(err, TransportFailure::Network(_)));
    }
}
