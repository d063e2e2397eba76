use serde::{de::DeserializeOwned, Serialize};

use crate::error::Result;

/// Encode derived records into CBOR bytes
///
/// Record order is fixed by the producers, so identical input gives
/// identical bytes.
pub fn to_snapshot<T>(value: &T) -> Result<Vec<u8>>
where
    T: Serialize,
{
    Ok(serde_cbor::to_vec(value)?)
}

pub fn from_snapshot<T>(bytes: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    Ok(serde_cbor::from_slice(bytes)?)
}
