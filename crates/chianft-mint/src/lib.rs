mod builder;
mod bundle;
mod error;
mod fee;
mod metadata;
mod offers;
mod persist;
mod resume;
mod submit;
mod wallet_ids;

pub use builder::*;
pub use bundle::*;
pub use error::*;
pub use fee::*;
pub use metadata::*;
pub use offers::*;
pub use persist::*;
pub use resume::*;
pub use submit::*;
pub use wallet_ids::*;
