//! Voice platform wire envelope.
//!
//! Only the fields the skill reads are modelled; everything else in the
//! platform's request JSON is ignored by serde. The response side is built
//! through [`ResponseBuilder`] so handlers never touch the wire layout.

pub mod request;
pub mod response;

pub use request::{
    Intent, Request, RequestEnvelope, RequestKind, Resolution, Resolutions, ResolutionValue,
    Slot, StatusCode,
};
pub use response::{OutputSpeech, Response, ResponseBuilder, ResponseEnvelope};
