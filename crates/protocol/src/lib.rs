//! Geovision Protocol - the gRPC contract.
//!
//! Six services, one per resource group: `EventService`, `PersonService`,
//! `OrganizationService`, `SourceService`, `WebsiteService` and
//! `RelationshipService`. Generated by `tonic-build` from
//! `proto/geovision.proto`.

// Generated protobuf / tonic code (compiled by build.rs)
#[allow(clippy::all)]
pub mod proto {
    pub mod geovision {
        tonic::include_proto!("geovision");
    }
}

pub use proto::geovision as pb;

/// Encoded file descriptor set, served by gRPC reflection.
pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("geovision_descriptor");
