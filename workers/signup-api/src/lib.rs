//! ==============================================================================
//! lib.rs - signup api cloudflare worker
//! ==============================================================================
//!
//! purpose:
//!     answers the signup request the dashboard fires on mount.
//!     validates the payload, rejects duplicates, and stores the user
//!     in workers kv so the request/response cycle runs end to end.
//!
//! relationships:
//!     - uses: shared (SignupRequest, ErrorCode, ErrorResponse)
//!     - uses: workers kv namespace "USERS" for user records and indexes
//!     - called by: dashboard (RequestView)
//!
//! cloudflare features demonstrated:
//!     - workers kv (user records + uniqueness index keys)
//!     - environment variables (ALLOWED_ORIGIN)
//!     - credentialed cors (origin reflection instead of "*")
//!
//! api:
//!     POST /api/v1/user/any/signup
//!         body: {"id": "...", "pw": "...", "email": "...", "nickname": "...", "phone": "..."}
//!         response: "SUCCESS"
//!         errors: 400 INVALID_PARAMETER, 409 DUPLICATE_ID / DUPLICATE_EMAIL / DUPLICATE_NICKNAME
//!
//!     GET /health
//!         response: ok
//!
//!     OPTIONS *
//!         cors preflight, reflecting the requested method
//!
//! ==============================================================================

use bcrypt::{hash, BcryptError, DEFAULT_COST};
use serde::{Deserialize, Serialize};
use shared::{ErrorCode, ErrorResponse, SignupRequest};
use thiserror::Error;
use validator::{Validate, ValidationErrors};
use worker::kv::KvError;
use worker::*;

const SIGNUP_PATH: &str = "/api/v1/user/any/signup";
const USERS_BINDING: &str = "USERS";

// ==============================================================================
// types
// ==============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum Role {
    User,
}

/// user record as stored in kv under `user:<id>`
#[derive(Debug, Serialize, Deserialize)]
struct StoredUser {
    username: String,
    pw_hash: String,
    email: String,
    nickname: String,
    role: Role,
    phone: String,
    created_at: u64,
}

impl StoredUser {
    fn from_request(req: &SignupRequest, cost: u32, created_at: u64) -> std::result::Result<Self, BcryptError> {
        Ok(Self {
            username: req.id.clone(),
            pw_hash: hash(&req.password, cost)?,
            email: req.email.clone(),
            nickname: req.nickname.clone(),
            role: Role::User,
            phone: req.phone.clone(),
            created_at,
        })
    }
}

#[derive(Debug, Error)]
enum SignupError {
    #[error("invalid json body: {0}")]
    Malformed(String),
    #[error("validation failed: {0}")]
    Invalid(#[from] ValidationErrors),
    #[error("{}", .0.message())]
    Duplicate(ErrorCode),
    #[error("kv error: {0}")]
    Kv(#[from] KvError),
    #[error("worker error: {0}")]
    Worker(#[from] worker::Error),
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("password hash error: {0}")]
    Hash(#[from] BcryptError),
}

impl SignupError {
    fn response_body(&self) -> ErrorResponse {
        match self {
            SignupError::Malformed(_) => ErrorResponse::from(ErrorCode::InvalidParameter),
            SignupError::Invalid(errors) => ErrorResponse::invalid(errors),
            SignupError::Duplicate(code) => ErrorResponse::from(*code),
            SignupError::Kv(_)
            | SignupError::Worker(_)
            | SignupError::Encode(_)
            | SignupError::Hash(_) => {
                ErrorResponse::from(ErrorCode::InternalError)
            }
        }
    }
}

// ==============================================================================
// worker entry point
// ==============================================================================

#[event(fetch)]
async fn fetch(req: Request, env: Env, _ctx: Context) -> Result<Response> {
    let router = Router::new();

    router
        // register a user
        .post_async(SIGNUP_PATH, handle_signup)
        // health check
        .get("/health", handle_health)
        // cors preflight, any path
        .options("/*path", handle_cors)
        .run(req, env)
        .await
}

// ==============================================================================
// request handlers
// ==============================================================================

/// register a user, answering "SUCCESS" or an ErrorResponse
async fn handle_signup(mut req: Request, ctx: RouteContext<()>) -> Result<Response> {
    let origin = request_origin(&req, &ctx);

    match register(&mut req, &ctx).await {
        Ok(id) => {
            console_log!("signup completed for {}", id);
            json_response(&"SUCCESS", 200, &origin)
        }
        Err(e) => {
            let body = e.response_body();
            if body.status >= 500 {
                console_error!("signup failed: {}", e);
            } else {
                console_log!("signup rejected: {}", e);
            }
            json_response(&body, body.status, &origin)
        }
    }
}

fn handle_health(req: Request, ctx: RouteContext<()>) -> Result<Response> {
    let origin = request_origin(&req, &ctx);
    Ok(Response::ok("ok")?.with_headers(cors_headers(&origin)?))
}

/// handle cors preflight
fn handle_cors(req: Request, ctx: RouteContext<()>) -> Result<Response> {
    let origin = request_origin(&req, &ctx);
    let requested_method = req.headers().get("Access-Control-Request-Method").ok().flatten();
    let requested_headers = req.headers().get("Access-Control-Request-Headers").ok().flatten();

    let headers = cors_headers(&origin)?;
    headers.set("Access-Control-Allow-Methods", &allowed_methods(requested_method))?;
    headers.set(
        "Access-Control-Allow-Headers",
        requested_headers.as_deref().unwrap_or("Content-Type"),
    )?;
    headers.set("Access-Control-Max-Age", "3600")?;

    Ok(Response::empty()?.with_headers(headers))
}

// ==============================================================================
// signup logic
// ==============================================================================

async fn register(req: &mut Request, ctx: &RouteContext<()>) -> std::result::Result<String, SignupError> {
    let body: SignupRequest = req
        .json()
        .await
        .map_err(|e| SignupError::Malformed(e.to_string()))?;
    body.validate()?;

    let kv = ctx.env.kv(USERS_BINDING)?;

    // id, then email, then nickname
    for (code, key) in uniqueness_keys(&body) {
        if kv.get(&key).text().await?.is_some() {
            return Err(SignupError::Duplicate(code));
        }
    }

    let user = StoredUser::from_request(&body, DEFAULT_COST, js_sys::Date::now() as u64)?;

    for (key, value) in write_order(&body, serde_json::to_string(&user)?) {
        kv.put(&key, value)?.execute().await?;
    }

    Ok(body.id)
}

/// index keys go in before the user record, so a failed put can leave
/// an orphan reservation but never a user whose email or nickname is free
fn write_order(req: &SignupRequest, user_json: String) -> [(String, String); 3] {
    [
        (email_key(&req.email), req.id.clone()),
        (nickname_key(&req.nickname), req.id.clone()),
        (user_key(&req.id), user_json),
    ]
}

/// kv keys that must be free, in the order they are checked
fn uniqueness_keys(req: &SignupRequest) -> [(ErrorCode, String); 3] {
    [
        (ErrorCode::DuplicateId, user_key(&req.id)),
        (ErrorCode::DuplicateEmail, email_key(&req.email)),
        (ErrorCode::DuplicateNickname, nickname_key(&req.nickname)),
    ]
}

fn user_key(id: &str) -> String {
    format!("user:{}", id)
}

fn email_key(email: &str) -> String {
    format!("email:{}", email)
}

fn nickname_key(nickname: &str) -> String {
    format!("nickname:{}", nickname)
}

// ==============================================================================
// helpers
// ==============================================================================

fn request_origin(req: &Request, ctx: &RouteContext<()>) -> String {
    let configured = ctx.env.var("ALLOWED_ORIGIN").ok().map(|v| v.to_string());
    let origin = req.headers().get("Origin").ok().flatten();
    resolve_origin(configured, origin)
}

/// credentialed requests cannot use "*", so reflect the caller's origin
/// unless one is pinned in config
fn resolve_origin(configured: Option<String>, request_origin: Option<String>) -> String {
    configured
        .filter(|o| !o.trim().is_empty())
        .or(request_origin)
        .unwrap_or_else(|| "*".to_string())
}

/// every method is allowed; echo what the browser asks for
fn allowed_methods(requested: Option<String>) -> String {
    requested
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| "GET, POST, OPTIONS".to_string())
}

fn cors_headers(origin: &str) -> Result<Headers> {
    let headers = Headers::new();
    headers.set("Access-Control-Allow-Origin", origin)?;
    headers.set("Vary", "Origin")?;
    if origin != "*" {
        headers.set("Access-Control-Allow-Credentials", "true")?;
    }
    Ok(headers)
}

fn json_response<T: Serialize>(body: &T, status: u16, origin: &str) -> Result<Response> {
    let json = serde_json::to_string(body)?;
    let headers = cors_headers(origin)?;
    headers.set("Content-Type", "application/json")?;

    Ok(Response::ok(json)?.with_status(status).with_headers(headers))
}

// ==============================================================================
// tests
// ==============================================================================
