use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use once_cell::sync::{Lazy, OnceCell};
use reqwest::{header, Client, Method, Response, StatusCode};

use crate::{error::ExchangeRateError, logging::Logger};

pub mod element;
pub mod user_agent;

/// A singleton instance of the reqwest client.
static CLIENT: OnceCell<Client> = OnceCell::new();

static LOGGER: Lazy<Logger> = Lazy::new(|| Logger::new("http"));

/// Returns the reqwest client singleton instance or creates one if it doesn't exist.
fn get_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        // reqwest 使用 rustls-no-provider，需先指定 ring 作為加密實作；已安裝時忽略錯誤
        let _ = rustls::crypto::ring::default_provider().install_default();

        Client::builder()
            // ===== 壓縮 =====
            .brotli(true)
            .gzip(true)
            .zstd(true)
            // ===== 超時設置 =====
            .connect_timeout(Duration::from_secs(8))
            .timeout(Duration::from_secs(15))
            // ===== Cookie 和重定向 =====
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::limited(5))
            // ===== Headers =====
            .referer(true)
            .user_agent(user_agent::gen_random_ua())
            .build()
            .map_err(|e| anyhow!("Failed to create reqwest client: {:?}", e))
    })
}

/// Waits for the `http` log file to catch up; see [`Logger::flush`].
pub fn flush_log(timeout: Duration) -> bool {
    // 沒送過請求就不必建立 http 日誌
    Lazy::get(&LOGGER).map_or(true, |logger| logger.flush(timeout))
}

/// Performs a single HTTP GET request and returns the raw response,
/// whatever its status code.
pub async fn get_response(url: &str, headers: Option<header::HeaderMap>) -> Result<Response> {
    send(Method::GET, url, headers).await
}

/// Performs an HTTP GET request and returns the response body as text.
///
/// # Errors
///
/// Any status other than `200 OK` is reported as
/// [`ExchangeRateError::HttpStatus`] without reading the body.
pub async fn get(url: &str, headers: Option<header::HeaderMap>) -> Result<String> {
    let response = get_response(url, headers).await?;
    let status = response.status();

    if status != StatusCode::OK {
        LOGGER.warn(format!("GET:{} answered {}", url, status));
        return Err(ExchangeRateError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        }
        .into());
    }

    let text = response
        .text()
        .await
        .map_err(|e| anyhow!("Error parsing response text: {:?}", e))?;
    LOGGER.debug(format!("GET:{} read {} bytes", url, text.len()));

    Ok(text)
}

/// Sends one request. Failures are logged and returned; nothing is retried.
async fn send(method: Method, url: &str, headers: Option<header::HeaderMap>) -> Result<Response> {
    let visit_log = format!("{method}:{url}");
    let client = get_client()?;
    let mut rb = client.request(method, url);

    if let Some(h) = headers {
        rb = rb.headers(h);
    }

    let start = Instant::now();
    let res = rb.send().await;
    let elapsed = start.elapsed().as_millis();

    match res {
        Ok(response) => {
            LOGGER.info(format!(
                "{} {} {} ms",
                visit_log,
                response.status(),
                elapsed
            ));
            Ok(response)
        }
        Err(why) => {
            LOGGER.error(format!("{} failed because {:?}. {} ms", visit_log, why, elapsed));
            Err(anyhow!("Failed to send request to {} because {:?}", url, why))
        }
    }
}
