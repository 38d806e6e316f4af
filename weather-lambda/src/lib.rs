//! AWS Lambda integration for the weather lookup adapter.
//!
//! This crate owns the runtime-facing pieces: decoding the API Gateway proxy
//! event and shaping the adapter result into the proxy response. The
//! `weather-function` binary wires it into `lambda_runtime`.

pub mod handler;
