//! API layer - gRPC and HTTP entry points.

pub mod grpc;
pub mod http;
