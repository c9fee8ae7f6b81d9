// Client module
pub mod horizon;
pub mod mirror;

pub use horizon::{HorizonClient, LedgerGateway};
pub use mirror::{HttpMirrorStore, MirrorStore};
