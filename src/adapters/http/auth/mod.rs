//! HTTP adapter for auth endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    AuthCallbackRequest, AuthResponse, AuthUrlQuery, AuthUrlResponse, ChangePortalRequest,
    ChangePortalResponse, ErrorResponse, HandoffRequest, HandoffResponse, LogoutRequest,
    PortalListResponse, PortalResponse, RefreshTokensRequest, SessionResponse, TokensResponse,
};
pub use handlers::{handle_auth_error, AuthHandlers};
pub use routes::auth_routes;
