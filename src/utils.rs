//! Id minting helpers

use bech32::Bech32m;
use uuid7::uuid7;

/// Prefix for identity ids, e.g. `emp_1...`
pub const IDENTITY_HRP: &str = "emp_";
/// Prefix for payment request ids, e.g. `req_1...`
pub const REQUEST_HRP: &str = "req_";

// mint a unique uuid7 then encode using bech32 with a human readable prefix
pub fn mint_id(hrp: &str) -> anyhow::Result<String> {
    let hrp = bech32::Hrp::parse(hrp)?;
    let encode = bech32::encode::<Bech32m>(hrp, uuid7().as_bytes())?;
    Ok(encode)
}
