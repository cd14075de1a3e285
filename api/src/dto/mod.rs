//! Request and response bodies

pub mod tokens;

pub use tokens::{
    BlacklistTokenRequest, IssueTokenRequest, RotateTokenRequest, TokenContextResponse,
    TokenResponse, VerifyTokenRequest,
};
