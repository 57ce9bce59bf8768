//! These models represent the objects passed between the session, the agent,
//! and the completion provider.
//!
//! The provider's wire format (OpenAI-style message and tool objects) is
//! never used internally. Responses are converted into these structs at the
//! provider boundary, and converted back when a request is built, so the rest
//! of the crate only ever sees one shape.
pub mod message;
pub mod role;
pub mod tool;
