//! Authentication module: token issuance, bearer verification, refresh cookie

pub mod claims;
pub mod cookie;
pub mod middleware;
pub mod token;
pub mod verify;

pub use claims::{AuthContext, Claims, RefreshClaims, TokenPair, UserIdentity};
pub use cookie::{issue_refresh_cookie, revoke_refresh_cookie};
pub use middleware::jwt_auth_middleware;
pub use token::generate_token_pair;
pub use verify::{verify_access_token, verify_request, vary_on_authorization};
