//! Core data model for orchestrator session selection: addresses, prices,
//! session handles, performance scores and typed errors.

pub mod error;
pub mod session;
pub mod types;

pub use error::{OselError, SelectError};
pub use session::{
    BroadcastSession, OrchestratorInfo, PerfScore, SessionHandle, StreamParameters, TicketParams,
};
pub use types::{ADDRESS_LENGTH, EthAddress, PriceInfo, PriceRat};
