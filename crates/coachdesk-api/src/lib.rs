// coachdesk-api: Async HAL client for the customer and training collections

pub mod client;
pub mod error;
pub mod hal;
pub mod transport;

pub use client::HalClient;
pub use error::Error;
pub use hal::{Link, Links};
pub use transport::{TlsMode, TransportConfig};
