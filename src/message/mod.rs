//! Bodies of the handshake messages this crate writes and reads itself.

mod change_cipher_spec;
mod finished;
mod random;

pub use change_cipher_spec::ChangeCipherSpec;
pub use finished::Finished;
pub use random::Random;
