pub mod rpc;
pub mod wallet;
pub mod transaction;

pub use rpc::SolanaClient;
pub use wallet::{Wallet, WalletError};
pub use transaction::{build_signed, signature_of};
