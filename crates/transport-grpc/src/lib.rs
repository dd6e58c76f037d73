//! # Transport gRPC
//!
//! Remote-object transport for the DME record client, speaking the `dme.v1` protocol over
//! `tonic` channels.
//!
//! Handles:
//! - Opening a session against the naming service at `host:port`
//! - Name resolution and the `is_a` capability check
//! - The record service stub and mapping of gRPC statuses to transport errors
//!
//! Uses `api-shared` for the wire types and implements the traits of `dme-core`.

#![warn(rust_2018_idioms)]

pub mod convert;
pub mod transport;

pub use transport::GrpcTransport;
