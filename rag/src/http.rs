use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::from_str;

use crate::error::{Error, Result};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

fn client(timeout: Option<Duration>) -> Result<Client> {
    Ok(Client::builder()
        .timeout(timeout.unwrap_or(DEFAULT_TIMEOUT))
        .build()?)
}

fn finish<T: DeserializeOwned>(
    method: &'static str,
    url: &str,
    resp: reqwest::blocking::Response,
) -> Result<T> {
    let status = resp.status();
    let text = resp.text().unwrap_or_default();
    if !status.is_success() {
        return Err(Error::Status {
            method,
            url: url.to_string(),
            status: status.as_u16(),
            body: text,
        });
    }
    from_str::<T>(&text).map_err(|e| Error::Decode {
        method,
        url: url.to_string(),
        detail: e.to_string(),
        body: text,
    })
}

fn map_send_error(err: reqwest::Error, timeout: Option<Duration>) -> Error {
    if err.is_timeout() {
        Error::Timeout(timeout.unwrap_or(DEFAULT_TIMEOUT))
    } else {
        Error::Http(err)
    }
}

pub fn get_json<T: DeserializeOwned>(url: &str) -> Result<T> {
    let resp = client(None)?
        .get(url)
        .send()
        .map_err(|e| map_send_error(e, None))?;
    finish("GET", url, resp)
}

pub fn post_json<T: DeserializeOwned, B: Serialize>(
    url: &str,
    body: &B,
    timeout: Option<Duration>,
) -> Result<T> {
    let resp = client(timeout)?
        .post(url)
        .header(CONTENT_TYPE, "application/json")
        .json(body)
        .send()
        .map_err(|e| map_send_error(e, timeout))?;
    finish("POST", url, resp)
}

pub fn put_json<T: DeserializeOwned, B: Serialize>(url: &str, body: &B) -> Result<T> {
    let resp = client(None)?
        .put(url)
        .header(CONTENT_TYPE, "application/json")
        .json(body)
        .send()
        .map_err(|e| map_send_error(e, None))?;
    finish("PUT", url, resp)
}
