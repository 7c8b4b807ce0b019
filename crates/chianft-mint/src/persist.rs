use std::fs;
use std::path::Path;

use chia_protocol::SpendBundle;
use chia_traits::Streamable;

use crate::MintError;

/// Writes a bundle sequence as the streamable encoding of the list, so the
/// file round-trips losslessly to the bundle names used during submission.
pub fn write_spend_bundles(path: impl AsRef<Path>, bundles: &[SpendBundle]) -> Result<(), MintError> {
    let bytes = bundles.to_vec().to_bytes()?;
    fs::write(path, bytes)?;
    Ok(())
}

/// Reads back a bundle sequence written by [`write_spend_bundles`].
pub fn read_spend_bundles(path: impl AsRef<Path>) -> Result<Vec<SpendBundle>, MintError> {
    let bytes = fs::read(path)?;
    Ok(Vec::<SpendBundle>::from_bytes(&bytes)?)
}
