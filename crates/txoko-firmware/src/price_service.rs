//! HTTPS price lookup for the price screen.

use std::time::Duration;

use embedded_svc::http::client::Client as HttpClient;
use embedded_svc::http::Headers;
use esp_idf_svc::http::client::{Configuration as HttpConfiguration, EspHttpConnection};
use txoko_ui::{parse_price, PriceError, PriceSource};

/// Maximum size for a price response body (16 KB)
const MAX_BODY_BYTES: usize = 16 * 1024;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Owns the HTTP client; the connection is opened on first use and rebuilt
/// after a transport failure.
pub struct PriceService {
    client: Option<HttpClient<EspHttpConnection>>,
    url: String,
    pointer: String,
}

impl PriceService {
    pub fn new(url: impl Into<String>, pointer: impl Into<String>) -> Self {
        Self {
            client: None,
            url: url.into(),
            pointer: pointer.into(),
        }
    }

    fn ensure_client(&mut self) -> Result<&mut HttpClient<EspHttpConnection>, PriceError> {
        if self.client.is_none() {
            let config = HttpConfiguration {
                timeout: Some(REQUEST_TIMEOUT),
                use_global_ca_store: true,
                crt_bundle_attach: Some(esp_idf_svc::sys::esp_crt_bundle_attach),
                ..Default::default()
            };
            let conn = EspHttpConnection::new(&config)
                .map_err(|e| PriceError::Transport(format!("{:?}", e)))?;
            self.client = Some(HttpClient::wrap(conn));
        }
        self.client
            .as_mut()
            .ok_or_else(|| PriceError::Transport(String::from("http client unavailable")))
    }

    fn http_get(&mut self) -> Result<Vec<u8>, PriceError> {
        let url = self.url.clone();
        let client = self.ensure_client()?;
        let request = client
            .get(&url)
            .map_err(|e| PriceError::Transport(format!("{:?}", e)))?;

        let mut response = request
            .submit()
            .map_err(|e| PriceError::Transport(format!("{:?}", e)))?;

        let status = response.status();
        if status != 200 {
            return Err(PriceError::Http(status));
        }

        let content_length = response.content_len().unwrap_or(0) as usize;
        if content_length > MAX_BODY_BYTES {
            return Err(PriceError::ResponseTooLarge(content_length));
        }

        let mut body = Vec::with_capacity(content_length.max(512));
        let mut buf = [0u8; 1024];
        loop {
            let read = response
                .read(&mut buf)
                .map_err(|e| PriceError::Transport(format!("{:?}", e)))?;
            if read == 0 {
                break;
            }
            if body.len() + read > MAX_BODY_BYTES {
                return Err(PriceError::ResponseTooLarge(body.len() + read));
            }
            body.extend_from_slice(&buf[..read]);
        }

        Ok(body)
    }
}

impl PriceSource for PriceService {
    fn fetch_price(&mut self) -> Result<f64, PriceError> {
        let body = match self.http_get() {
            Ok(body) => body,
            Err(err) => {
                if matches!(err, PriceError::Transport(_)) {
                    self.client = None;
                }
                return Err(err);
            }
        };
        log::debug!("Price: {} byte response from {}", body.len(), self.url);
        parse_price(&body, &self.pointer)
    }
}
