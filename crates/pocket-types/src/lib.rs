//! Typed command model shared by the pocket relay.
//!
//! Every message exchanged with the instrument peer is a JSON object carrying
//! a common envelope (`id`, `t`, `cmd`) plus variant-specific fields. The
//! `cmd` tag selects the variant. This crate owns:
//!
//! - the [`Command`] sum type over every supported variant,
//! - the canonical wire encoding ([`Command::encode`]),
//! - the [`registry`] mapping tags to variant decoders, and
//! - the envelope sniff used as the first phase of decoding
//!   ([`sniff_tag`]).
//!
//! ## Wire format
//!
//! ```json
//! {"id":"","t":0,"cmd":"rr","range":{"Start":100000,"End":4000000}}
//! ```
//!
//! Field order and presence are part of the wire contract: the envelope
//! always comes first and zero-valued fields are always emitted.

mod command;
mod envelope;
mod errors;
mod measurement;
mod nullable;
pub mod registry;

pub use command::{Command, FrequencyRangeQuery, SingleQuery};
pub use envelope::{Envelope, sniff_tag};
pub use errors::{DecodeError, EncodeError};
pub use measurement::{Complex, Range, SParam, SParamSelect};
pub use registry::{CommandEntry, resolve};
