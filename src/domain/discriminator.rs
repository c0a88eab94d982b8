//! Anchor-style discriminators: first 8 bytes of `sha256("<namespace>:<name>")`.

use solana_sdk::hash::hashv;

pub const DISCRIMINATOR_LEN: usize = 8;

/// Instruction discriminator (`global:<name>`)
pub fn instruction_discriminator(name: &str) -> [u8; DISCRIMINATOR_LEN] {
    discriminator("global", name)
}

/// Account discriminator (`account:<TypeName>`)
pub fn account_discriminator(name: &str) -> [u8; DISCRIMINATOR_LEN] {
    discriminator("account", name)
}

fn discriminator(namespace: &str, name: &str) -> [u8; DISCRIMINATOR_LEN] {
    let preimage = format!("{}:{}", namespace, name);
    let hash = hashv(&[preimage.as_bytes()]);
    let mut out = [0u8; DISCRIMINATOR_LEN];
    out.copy_from_slice(&hash.to_bytes()[..DISCRIMINATOR_LEN]);
    out
}
