//! Domain Layer - Pure values for driving the escrow program
//!
//! No RPC access happens here; everything is derivable offline:
//! - `cluster`: cluster monikers, RPC endpoints and explorer links
//! - `pda`: escrow PDA and vault derivation
//! - `amount`: exact UI amount <-> base unit scaling
//! - `discriminator`: Anchor-style instruction/account discriminators
//! - `escrow_state`: escrow account decoding

pub mod cluster;
pub mod pda;
pub mod amount;
pub mod discriminator;
pub mod escrow_state;

pub use cluster::{Cluster, ClusterError};
pub use pda::{escrow_address, vault_address, associated_token_address, EscrowAddresses, ESCROW_SEED};
pub use amount::{to_base_units, to_ui_amount, AmountError};
pub use escrow_state::{EscrowState, EscrowStateError};
