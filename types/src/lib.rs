pub mod message;
pub mod identity;
pub mod synthesis;
pub mod error;

pub use message::{Context, Entity, Input, Intent, MessageRequest, MessageResponse, Output};
pub use identity::{ApiKeyGrant, IamToken};
pub use synthesis::{SynthesizeRequest, Voice};
pub use error::ServiceError;
