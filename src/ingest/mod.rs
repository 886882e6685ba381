//! Request ingestion
//!
//! Validates the request shape and turns it into raw document bytes:
//!
//! - `request`: wire body and the `DocumentInput` tagged union
//! - `payload`: inline data-URI decoding
//! - `object`: stored object fetch with retry
//! - `resolver`: picks the right path for a request

mod object;
mod payload;
mod request;
mod resolver;

pub use object::{ObjectResolver, RetryPolicy};
pub use payload::PayloadDecoder;
pub use request::{DocumentInput, ExtractOptions, ExtractRequest, InlinePayload, StoredReference};
pub use resolver::InputResolver;

#[cfg(test)]
pub(crate) use object::tests::CountingStore;
