//! Console session acquisition
//!
//! A [`Session`] is obtained once per run and reused for every console call.
//! [`PasswordSessionProvider`] logs in with email and password, or uses a
//! pre-issued access token when one is configured. Whatever part of the
//! credentials is missing is asked for on the terminal, the password without
//! echo.

use super::models::{LoginRequest, LoginResponse};
use crate::adapters::http::{build_client, check_response, join_url};
use crate::config::{secret_string, SecretString};
use crate::domain::{ExporterError, Result, TransportError};
use async_trait::async_trait;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use reqwest::header::{HeaderMap, SET_COOKIE};
use secrecy::ExposeSecret;
use std::io::{self, BufRead, IsTerminal, Write};

const LOGIN_PATH: &str = "/console/api/login";
const LOGIN_LANGUAGE: &str = "en-US";

/// Console login credentials
///
/// The password may be left out; it is then asked for at login time.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: Option<SecretString>,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: SecretString) -> Self {
        Self {
            email: email.into(),
            password: Some(password),
        }
    }
}

/// Authenticated console session
#[derive(Debug, Clone)]
pub struct Session {
    access_token: SecretString,
    csrf_token: Option<SecretString>,
    cookie: Option<SecretString>,
}

impl Session {
    /// Session carried by a bearer token alone
    pub fn from_token(access_token: SecretString) -> Self {
        Self {
            access_token,
            csrf_token: None,
            cookie: None,
        }
    }

    /// Session established through login cookies
    ///
    /// `cookie` is replayed verbatim in the `Cookie` header.
    pub fn with_cookies(mut self, csrf_token: Option<SecretString>, cookie: SecretString) -> Self {
        self.csrf_token = csrf_token;
        self.cookie = Some(cookie);
        self
    }

    pub fn access_token(&self) -> &SecretString {
        &self.access_token
    }

    pub fn csrf_token(&self) -> Option<&SecretString> {
        self.csrf_token.as_ref()
    }

    /// Headers that authenticate a console request
    ///
    /// Cookie-based consoles check the CSRF header against the cookie, so
    /// both are sent whenever the login set cookies.
    pub fn auth_headers(&self) -> Vec<(&'static str, String)> {
        let token = self.access_token.expose_secret().as_str();
        let mut headers = vec![("Authorization", format!("Bearer {token}"))];
        if let Some(ref csrf) = self.csrf_token {
            headers.push(("X-CSRF-Token", csrf.expose_secret().as_str().to_string()));
        }
        if let Some(ref cookie) = self.cookie {
            headers.push(("Cookie", cookie.expose_secret().as_str().to_string()));
        }
        headers
    }
}

/// Source of authenticated console sessions
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Acquire a session for the console at `base_url`
    ///
    /// When `credentials` is `None`, or carries no password, the provider may
    /// ask for the missing part on the terminal unless `headless` is set.
    ///
    /// # Errors
    ///
    /// Returns [`ExporterError::Authentication`] if no session can be obtained
    async fn acquire(
        &self,
        base_url: &str,
        credentials: Option<&Credentials>,
        headless: bool,
    ) -> Result<Session>;
}

/// Session provider backed by the console's password login endpoint
pub struct PasswordSessionProvider {
    timeout_seconds: u64,
    tls_verify: bool,
    access_token: Option<SecretString>,
}

impl PasswordSessionProvider {
    pub fn new(timeout_seconds: u64, tls_verify: bool) -> Self {
        Self {
            timeout_seconds,
            tls_verify,
            access_token: None,
        }
    }

    /// Use a pre-issued console token instead of logging in
    pub fn with_access_token(mut self, access_token: Option<SecretString>) -> Self {
        self.access_token = access_token;
        self
    }

    async fn login(&self, base_url: &str, email: &str, password: &SecretString) -> Result<Session> {
        let client = build_client(self.timeout_seconds, self.tls_verify)?;
        let url = join_url(base_url, LOGIN_PATH);

        tracing::info!(email = %email, "Logging in to console");

        let body = LoginRequest {
            email,
            password: password.expose_secret().as_str(),
            language: LOGIN_LANGUAGE,
            remember_me: true,
        };

        let resp = client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(TransportError::from)?;

        let resp = check_response(resp, "Console login").await.map_err(|e| match e {
            ExporterError::Transport(TransportError::ClientError { message, .. }) => {
                ExporterError::Authentication(message)
            }
            other => other,
        })?;

        let cookies = session_cookies(resp.headers());
        let cookies_set = !cookies.pairs.is_empty();
        let payload: LoginResponse = resp.json().await.map_err(TransportError::from)?;

        if payload.is_failure() {
            return Err(ExporterError::Authentication(format!(
                "Console rejected login for {email}"
            )));
        }

        let access_token = payload.access_token().or(cookies.access_token).ok_or_else(|| {
            ExporterError::Authentication(
                "Login succeeded but no access token was returned".to_string(),
            )
        })?;

        let mut session = Session::from_token(secret_string(access_token));
        if !cookies.pairs.is_empty() {
            session = session.with_cookies(
                cookies.csrf_token.map(secret_string),
                secret_string(cookies.pairs.join("; ")),
            );
        }

        tracing::debug!(
            cookie_session = cookies_set,
            "Console session established"
        );

        Ok(session)
    }
}

#[async_trait]
impl SessionProvider for PasswordSessionProvider {
    async fn acquire(
        &self,
        base_url: &str,
        credentials: Option<&Credentials>,
        headless: bool,
    ) -> Result<Session> {
        if let Some(ref token) = self.access_token {
            tracing::info!("Using pre-issued console access token");
            return Ok(Session::from_token(token.clone()));
        }

        match credentials {
            Some(Credentials {
                email,
                password: Some(password),
            }) => self.login(base_url, email, password).await,
            Some(Credentials { email, .. }) if headless => {
                Err(ExporterError::Authentication(format!(
                    "No console password configured for {email} and headless mode forbids prompting"
                )))
            }
            None if headless => Err(ExporterError::Authentication(
                "No console credentials configured and headless mode forbids prompting"
                    .to_string(),
            )),
            Some(Credentials { email, .. }) => {
                let entered = prompt_credentials(Some(email.clone())).await?;
                self.login(base_url, &entered.email, &entered.password).await
            }
            None => {
                let entered = prompt_credentials(None).await?;
                self.login(base_url, &entered.email, &entered.password).await
            }
        }
    }
}

#[derive(Debug, Default)]
struct SessionCookies {
    access_token: Option<String>,
    csrf_token: Option<String>,
    pairs: Vec<String>,
}

/// Pick the session cookies out of `Set-Cookie` headers
///
/// Matches on the name suffix so prefixed names such as
/// `__Host-access_token` are recognised too.
fn session_cookies(headers: &HeaderMap) -> SessionCookies {
    let mut cookies = SessionCookies::default();
    for value in headers.get_all(SET_COOKIE) {
        let Ok(value) = value.to_str() else {
            continue;
        };
        let pair = value.split(';').next().unwrap_or_default();
        let Some((name, val)) = pair.split_once('=') else {
            continue;
        };
        let name = name.trim();
        let val = val.trim().to_string();
        if val.is_empty() {
            continue;
        }
        cookies.pairs.push(format!("{name}={val}"));
        if name.ends_with("access_token") {
            cookies.access_token = Some(val);
        } else if name.ends_with("csrf_token") {
            cookies.csrf_token = Some(val);
        }
    }
    cookies
}

/// Credentials completed on the terminal
struct EnteredCredentials {
    email: String,
    password: SecretString,
}

/// Ask on the terminal for the parts of the credentials that are missing
///
/// A known email is reused as is; the password is always read without echo.
async fn prompt_credentials(email: Option<String>) -> Result<EnteredCredentials> {
    tokio::task::spawn_blocking(move || -> Result<EnteredCredentials> {
        let mut stderr = io::stderr();

        let email = match email {
            Some(email) => email,
            None => {
                write!(stderr, "Console email: ")?;
                stderr.flush()?;
                let mut line = String::new();
                io::stdin().lock().read_line(&mut line)?;
                line.trim().to_string()
            }
        };
        if email.is_empty() {
            return Err(ExporterError::Authentication("Email is required".to_string()));
        }

        write!(stderr, "Console password for {email}: ")?;
        stderr.flush()?;
        let password = read_hidden_line()?;
        writeln!(stderr)?;

        if password.is_empty() {
            return Err(ExporterError::Authentication("Password is required".to_string()));
        }

        Ok(EnteredCredentials {
            email,
            password: secret_string(password),
        })
    })
    .await
    .map_err(|e| ExporterError::Other(format!("Credential prompt failed: {e}")))?
}

/// Read one line from stdin without echoing it
///
/// Piped input is read as a plain line since there is nothing to hide it from.
fn read_hidden_line() -> Result<String> {
    if !io::stdin().is_terminal() {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        return Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string());
    }

    terminal::enable_raw_mode()?;
    let _raw_mode = RawModeGuard;

    let mut buffer = String::new();
    loop {
        if let Event::Key(key) = event::read()? {
            match apply_key(&mut buffer, key) {
                KeyOutcome::Continue => {}
                KeyOutcome::Submit => return Ok(buffer),
                KeyOutcome::Cancel => {
                    return Err(ExporterError::Authentication(
                        "Password prompt cancelled".to_string(),
                    ))
                }
            }
        }
    }
}

/// Leaves raw mode when the prompt returns, on every path
struct RawModeGuard;

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

#[derive(Debug, PartialEq, Eq)]
enum KeyOutcome {
    Continue,
    Submit,
    Cancel,
}

/// Apply one key press to the hidden input buffer
fn apply_key(buffer: &mut String, key: KeyEvent) -> KeyOutcome {
    if key.kind != KeyEventKind::Press {
        return KeyOutcome::Continue;
    }
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => KeyOutcome::Cancel,
        (_, KeyCode::Enter) => KeyOutcome::Submit,
        (_, KeyCode::Backspace) => {
            buffer.pop();
            KeyOutcome::Continue
        }
        (_, KeyCode::Char(c)) => {
            buffer.push(c);
            KeyOutcome::Continue
        }
        _ => KeyOutcome::Continue,
    }
}
