//! cv-redirector: regional redirection for CloudVision clients.
//!
//! A client that wants to talk to CloudVision first asks the endpoint it
//! was given which regional cluster serves it, then connects there.
//!
//! # Architecture
//!
//! ```text
//! dial_with_auth(endpoint, auth)
//!   ├── RedirectToggle::from_env()      CLOUDVISION_REGIONAL_REDIRECT
//!   └── connect()
//!       ├── RedirectionResolver::resolve()
//!       │   └── AssignmentQuery          lookup-only connection
//!       │       └── AssignmentService.GetOne(key = unset)
//!       └── DialOptions::dial(resolved)  connection for real traffic
//!
//! StaticAssignmentService              server side, fixed ClusterSet
//! ```

pub mod cluster;
pub mod connect;
pub mod error;
pub mod query;
pub mod resolver;
pub mod server;
pub mod table;
pub mod toggle;

/// Generated protobuf types and gRPC service stubs.
pub mod proto {
    pub mod fmp {
        tonic::include_proto!("fmp");
    }

    pub mod arista {
        pub mod redirector {
            pub mod v1 {
                tonic::include_proto!("arista.redirector.v1");
            }
        }
    }

    pub use arista::redirector::v1::*;
}

pub use cluster::{Cluster, ClusterSet};
pub use connect::{ConnectError, Connection, connect, dial_with_auth};
pub use error::{QueryError, RedirectError, RedirectResult};
pub use query::{AssignmentQuery, GrpcAssignmentQuery};
pub use resolver::{Reason, RedirectionResolver, Resolution};
pub use server::StaticAssignmentService;
pub use table::AssignmentTable;
pub use toggle::{REDIRECT_ENV, RedirectToggle};
