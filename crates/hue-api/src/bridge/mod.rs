// Bridge API client modules
//
// One client type for both the cloud proxy and the local bridge; the
// connection mode only changes the path prefix and the header set.

pub mod client;
pub mod lights;
pub mod resources;

pub use client::BridgeClient;
pub use resources::Resource;
