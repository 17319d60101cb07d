pub(crate) mod echo;
mod ip_version;
mod sequence_number;
pub(crate) mod socket;
mod timestamp;
mod ttl;

pub(crate) use echo::EchoCodec;
pub use ip_version::IpVersion;
pub use sequence_number::SequenceNumber;
pub(crate) use socket::raw_socket::RawSocketDialer;
pub(crate) use socket::{Dial, TSocket};
pub use ttl::Ttl;
