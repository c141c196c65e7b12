pub mod error;
pub mod gate;
pub mod throttle;
pub mod verify;

pub use error::AuthError;
pub use gate::{GateError, RequestGate};
pub use throttle::RequestThrottle;
pub use verify::{AuthClaims, IdentityClient, TokenVerifier};
