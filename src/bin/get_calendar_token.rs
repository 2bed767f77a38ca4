use chrono::Utc;
use serde_json::{json, Value};
use url::Url;
use worklogger::components::google_calendar::token::GOOGLE_TOKEN_URL;
use worklogger::components::token_store;
use worklogger::config::Config;
use worklogger::error::{auth_error, other_error, AppResult};
use worklogger::startup;

const REDIRECT_URI: &str = "http://localhost:8080";
const SCOPE: &str = "https://www.googleapis.com/auth/calendar.readonly";

#[tokio::main]
async fn main() -> miette::Result<()> {
    startup::init_logging()?;

    // Load configuration, Jira settings are not needed here
    let path = Config::resolve_path(None);
    let config = Config::load_unvalidated(&path)?;
    config.validate_oauth_client()?;
    let store = token_store::from_config(&config.calendar)?;

    let client_id = config.calendar.client_id.clone();
    let client_secret = config.calendar.client_secret.clone();

    // Generate random state for security
    let state = uuid::Uuid::new_v4().to_string();

    let auth_url = Url::parse_with_params(
        "https://accounts.google.com/o/oauth2/v2/auth",
        &[
            ("client_id", client_id.as_str()),
            ("redirect_uri", REDIRECT_URI),
            ("response_type", "code"),
            ("access_type", "offline"),
            ("prompt", "consent"),
            ("scope", SCOPE),
            ("state", state.as_str()),
        ],
    )
    .map_err(|e| other_error(&format!("Failed to build authorization URL: {}", e)))?;

    // Open browser for authorization
    println!("Opening browser for Google Calendar authorization...");
    if webbrowser::open(auth_url.as_str()).is_err() {
        println!("Could not open a browser, visit this URL instead:\n{}", auth_url);
    }

    // Start local server to receive the callback
    let server = tiny_http::Server::http("127.0.0.1:8080")
        .map_err(|e| other_error(&format!("Failed to start callback server: {}", e)))?;
    println!("Waiting for authorization callback...");

    let request = server
        .recv()
        .map_err(|e| other_error(&format!("Failed to receive callback: {}", e)))?;

    let code = authorization_code(request.url(), &state)?;

    let mut token_data = exchange_code(&client_id, &client_secret, &code).await?;

    // Add expiry timestamp
    let expires_in = token_data
        .get("expires_in")
        .and_then(|v| v.as_i64())
        .unwrap_or(3600);
    let expires_at = Utc::now().timestamp() + expires_in;

    match token_data.as_object_mut() {
        Some(obj) => {
            obj.insert("expires_at".to_string(), json!(expires_at));
        }
        None => return Err(other_error("Token data is not an object").into()),
    }

    store.save(&token_data).await?;

    // Send success response to browser
    let response =
        tiny_http::Response::from_string("Authorization successful! You can close this window.");
    request
        .respond(response)
        .map_err(|e| other_error(&format!("Failed to answer the browser: {}", e)))?;

    println!("Token successfully saved!");

    Ok(())
}

/// Pull the authorization code out of the callback path, checking the state
fn authorization_code(callback_path: &str, expected_state: &str) -> AppResult<String> {
    let url = Url::parse(REDIRECT_URI)
        .and_then(|base| base.join(callback_path))
        .map_err(|e| other_error(&format!("Invalid callback URL: {}", e)))?;

    let mut code = None;
    let mut state = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => return Err(auth_error(&format!("Authorization denied: {}", value))),
            _ => {}
        }
    }

    if state.as_deref() != Some(expected_state) {
        return Err(auth_error("State mismatch in authorization callback"));
    }

    code.ok_or_else(|| auth_error("No authorization code found in callback"))
}

/// Exchange the authorization code for access and refresh tokens
async fn exchange_code(client_id: &str, client_secret: &str, code: &str) -> AppResult<Value> {
    let client = reqwest::Client::new();

    let response = client
        .post(GOOGLE_TOKEN_URL)
        .form(&[
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("code", code),
            ("redirect_uri", REDIRECT_URI),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await?;

    if !response.status().is_success() {
        let error_text = response.text().await?;
        return Err(auth_error(&format!("Failed to get token: {}", error_text)));
    }

    Ok(response.json().await?)
}
