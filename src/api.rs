//! HTTP client for the pokedex backend

use std::sync::OnceLock;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::state::Pokemon;

/// Page fetch error: transport failures and non-2xx statuses, no retries.
#[derive(Debug)]
pub enum FetchError {
    /// Transport failure or an unreadable response body.
    Network(reqwest::Error),
    /// Non-2xx response; the body is ignored.
    Http(StatusCode),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Network(e) => write!(f, "Page request failed: {}", e),
            FetchError::Http(status) => write!(f, "Page request failed with status {}", status),
        }
    }
}

impl std::error::Error for FetchError {}

/// Login/registration error
#[derive(Debug)]
pub enum AuthError {
    Network(reqwest::Error),
    /// Server rejected the request; carries the server-supplied message.
    Rejected(String),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::Network(e) => write!(f, "Request failed: {}", e),
            AuthError::Rejected(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for AuthError {}

#[derive(Serialize)]
struct CredentialBody<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Fetch one page of the collection: `GET {base}/pokemon?offset=..&limit=..`.
/// Pure request/response, no state, no retries.
pub async fn fetch_page(base_url: &str, offset: u32, limit: u32) -> Result<Vec<Pokemon>, FetchError> {
    let url = format!("{base_url}/pokemon?offset={offset}&limit={limit}");
    let response = http_client()
        .get(&url)
        .send()
        .await
        .map_err(FetchError::Network)?;
    if !response.status().is_success() {
        return Err(FetchError::Http(response.status()));
    }
    response
        .json::<Vec<Pokemon>>()
        .await
        .map_err(FetchError::Network)
}

/// Exchange credentials for a session token: `POST {base}/login`.
pub async fn login(base_url: &str, username: &str, password: &str) -> Result<String, AuthError> {
    let url = format!("{base_url}/login");
    let response = http_client()
        .post(&url)
        .json(&CredentialBody { username, password })
        .send()
        .await
        .map_err(AuthError::Network)?;
    if !response.status().is_success() {
        return Err(AuthError::Rejected(
            error_message(response, "Login failed").await,
        ));
    }
    let body: TokenResponse = response.json().await.map_err(AuthError::Network)?;
    Ok(body.token)
}

/// Create an account: `POST {base}/register`.
pub async fn register(base_url: &str, username: &str, password: &str) -> Result<(), AuthError> {
    let url = format!("{base_url}/register");
    let response = http_client()
        .post(&url)
        .json(&CredentialBody { username, password })
        .send()
        .await
        .map_err(AuthError::Network)?;
    if !response.status().is_success() {
        return Err(AuthError::Rejected(
            error_message(response, "Registration failed").await,
        ));
    }
    Ok(())
}

/// Pull `{message}` out of a JSON error body, with a fallback when the body
/// is missing or malformed.
async fn error_message(response: reqwest::Response, fallback: &str) -> String {
    match response.json::<ErrorBody>().await {
        Ok(ErrorBody {
            message: Some(message),
        }) => message,
        _ => fallback.to_string(),
    }
}

fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(reqwest::Client::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pokemon_wire_shape() {
        let body = r#"[{
            "id": 7,
            "pokedex_number": 25,
            "name": "pikachu",
            "hp": 35,
            "attack": 55,
            "defense": 40,
            "sp_attack": 50,
            "sp_defense": 50,
            "speed": 90
        }]"#;
        let page: Vec<Pokemon> = serde_json::from_str(body).unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].pokedex_number, 25);
        assert_eq!(page[0].speed, 90);
    }

    #[test]
    fn test_http_error_carries_status() {
        let err = FetchError::Http(StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("500"));
    }
}
