mod de;
mod error;
mod full_node;
mod http_client;
mod mock_client;
mod models;
mod rpc_client;
mod ser;
mod types;
mod wallet;

pub use de::*;
pub use error::*;
pub use full_node::*;
pub use http_client::*;
pub use mock_client::*;
pub use models::*;
pub use rpc_client::*;
pub use types::*;
pub use wallet::*;
