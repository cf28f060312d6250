/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use notevault_api::{app::{build_router, AppState}, config::Config};
/// use notevault_shared::store::memory::MemoryStore;
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = AppState::new(Arc::new(MemoryStore::new()), config);
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:4000").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use notevault_shared::{
    auth::{
        credentials::CredentialVerifier,
        jwt::{StaticSecret, TokenService},
        middleware::authenticate,
    },
    notes::NoteRepository,
    quota::QuotaEnforcer,
    store::NoteStore,
    tenancy::TenantResolver,
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Everything inside is behind an `Arc`, so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Persistence backend
    pub store: Arc<dyn NoteStore>,

    /// Session token issuer/validator
    pub tokens: Arc<TokenService>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    ///
    /// The token service signs with `config.jwt.secret`.
    pub fn new(store: Arc<dyn NoteStore>, config: Config) -> Self {
        let tokens = TokenService::new(Arc::new(StaticSecret::new(config.jwt.secret.clone())));

        Self {
            store,
            tokens: Arc::new(tokens),
            config: Arc::new(config),
        }
    }

    pub fn credentials(&self) -> CredentialVerifier {
        CredentialVerifier::new(self.store.clone())
    }

    pub fn tenants(&self) -> TenantResolver {
        TenantResolver::new(self.store.clone())
    }

    pub fn quota(&self) -> QuotaEnforcer {
        QuotaEnforcer::new(self.store.clone())
    }

    pub fn notes(&self) -> NoteRepository {
        NoteRepository::new(self.store.clone())
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /api
/// ├── GET  /health                    # Health check (public)
/// ├── POST /auth/login                # Login (public)
/// ├── /notes                          # Note CRUD (authenticated)
/// │   ├── GET    /
/// │   ├── POST   /
/// │   ├── GET    /:id
/// │   ├── PUT    /:id
/// │   └── DELETE /:id
/// └── /tenants/:slug                  # Tenant administration (authenticated, admin)
///     ├── POST /upgrade
///     └── POST /invite
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Authentication (protected routes only)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/auth/login", post(routes::auth::login));

    let note_routes = Router::new()
        .route(
            "/",
            get(routes::notes::list_notes).post(routes::notes::create_note),
        )
        .route(
            "/:id",
            get(routes::notes::get_note)
                .put(routes::notes::update_note)
                .delete(routes::notes::delete_note),
        );

    let tenant_routes = Router::new()
        .route("/:slug/upgrade", post(routes::tenants::upgrade_tenant))
        .route("/:slug/invite", post(routes::tenants::invite_user));

    let protected_routes = Router::new()
        .nest("/notes", note_routes)
        .nest("/tenants", tenant_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_layer,
        ));

    let api_routes = Router::new().merge(public_routes).merge(protected_routes);

    Router::new()
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config.api.cors_origins))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        // Development mode: permissive CORS
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}

/// Session authentication layer
///
/// Validates the `Authorization` header and injects the resulting
/// `IdentityContext` into request extensions.
async fn auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .map(|v| v.to_str().unwrap_or_default());

    let identity = authenticate(header, &state.tokens)?;

    tracing::debug!(user_id = %identity.user_id, tenant = %identity.tenant_slug, "Authenticated request");
    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}
