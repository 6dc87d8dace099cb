mod context;
mod request;
mod response;

pub use context::Context;
pub use request::{Input, MessageRequest, MessageRequestBuilder};
pub use response::{Entity, Intent, MessageResponse, Output};
