pub mod envelope;
pub mod error;
pub mod transport;
pub mod util;
