//! Key wrapping: the block driver, the wrap codec and the envelope it is
//! stored in.

pub mod codec;
pub mod driver;
pub mod envelope;

pub use codec::{KeyWrapCodec, WRAP_COUNT};
pub use driver::BlockCipherDriver;
pub use envelope::WrappedKeyEnvelope;
