//! Synchronous serial framing: opens the device at 115200 baud with RTS
//! and DTR asserted, and exposes the byte-level primitives (and the
//! `Flush`/`Poll` waits built on them) the protocol engine's connect
//! sequence and opcode writes rely on.

mod errors;
mod fake;
mod port;
pub mod timing;
mod transport;

pub use errors::{Error, Result};
pub use fake::FakeSerialPort;
pub use port::SerialFraming;
pub use transport::SerialTransport;
