pub mod api_error;
pub mod claims;
pub mod decode;
pub mod extract;
pub mod factory;
pub mod request;
pub mod rules;
pub mod validator;

pub use api_error::{ApiError, FailureReason, IdGenerator, Location, SequentialIds, Source, UuidIds};
pub use claims::Claims;
pub use decode::{DecodeError, JwtDecoder, TokenDecoder};
pub use extract::Scheme;
pub use factory::build_validator;
pub use request::{HeaderSource, validate_authorization_header};
pub use rules::ValidationConfig;
pub use validator::{ValidationResult, Validator};
