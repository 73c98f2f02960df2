mod context;
mod cookies;
mod errors;
mod middleware;
mod orchestrator;

pub use context::SsoContext;
pub use cookies::RequestCookies;
pub use errors::AuthError;
pub use middleware::{sso_middleware, SsoPlugin};
pub use orchestrator::{
    classify_token, AuthOrchestrator, AuthOutcome, AuthState, AuthenticatedSession,
    OrchestratorConfig, RequestCycle,
};
