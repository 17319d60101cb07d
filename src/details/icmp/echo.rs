use super::timestamp::{SendTimestamp, TIMESTAMP_LEN};
use super::{IpVersion, SequenceNumber, Ttl};
use crate::details::{PingError, PingResult};
use crate::MAX_DATA_SIZE;
use pnet_packet::icmp::{self, IcmpCode, IcmpPacket, IcmpTypes, MutableIcmpPacket};
use pnet_packet::icmpv6::{Icmpv6Code, Icmpv6Packet, Icmpv6Types, MutableIcmpv6Packet};
use pnet_packet::ipv4::Ipv4Packet;
use pnet_packet::ipv6::Ipv6Packet;
use pnet_packet::Packet;
use rand::Rng;

// type, code, checksum
const ICMP_HEADER_LEN: usize = 4;
// identifier, sequence number
const ECHO_HEADER_LEN: usize = 4;
const IPV4_MIN_HEADER_LEN: usize = 20;

/// A decoded Echo Reply.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct EchoReply {
    pub ttl: Ttl,
    pub identifier: u16,
    pub sequence_number: SequenceNumber,
    pub send_timestamp: SendTimestamp,
}

/// Builds Echo Requests and picks apart Echo Replies for one session.
///
/// The echo data is the 8 byte little-endian send timestamp followed by random padding which is
/// chosen once per session.
pub(crate) struct EchoCodec {
    ip_version: IpVersion,
    identifier: u16,
    padding: Vec<u8>,
}

impl EchoCodec {
    pub(crate) fn new(ip_version: IpVersion, identifier: u16, data_size: usize) -> PingResult<EchoCodec> {
        if data_size < TIMESTAMP_LEN {
            return Err(PingError::Encode(format!(
                "data size {data_size} is smaller than the {TIMESTAMP_LEN} byte timestamp"
            )));
        }
        if data_size > MAX_DATA_SIZE {
            return Err(PingError::Encode(format!("data size {data_size} does not fit one datagram")));
        }
        let mut padding = vec![0u8; data_size - TIMESTAMP_LEN];
        rand::thread_rng().fill(&mut padding[..]);
        Ok(EchoCodec { ip_version, identifier, padding })
    }

    pub(crate) fn ip_version(&self) -> IpVersion {
        self.ip_version
    }

    pub(crate) fn identifier(&self) -> u16 {
        self.identifier
    }

    pub(crate) fn request_len(&self) -> usize {
        ICMP_HEADER_LEN + ECHO_HEADER_LEN + TIMESTAMP_LEN + self.padding.len()
    }

    /// Encodes an Echo Request stamped with the current time.
    pub(crate) fn encode(&self, sequence_number: SequenceNumber) -> PingResult<Vec<u8>> {
        self.encode_at(sequence_number, SendTimestamp::now())
    }

    pub(crate) fn encode_at(
        &self,
        sequence_number: SequenceNumber,
        send_timestamp: SendTimestamp,
    ) -> PingResult<Vec<u8>> {
        let mut body = Vec::with_capacity(ECHO_HEADER_LEN + TIMESTAMP_LEN + self.padding.len());
        body.extend_from_slice(&self.identifier.to_be_bytes());
        body.extend_from_slice(&u16::from(sequence_number).to_be_bytes());
        body.extend_from_slice(&send_timestamp.to_le_bytes());
        body.extend_from_slice(&self.padding);

        let buf = vec![0u8; ICMP_HEADER_LEN + body.len()];
        match self.ip_version {
            IpVersion::V4 => {
                let mut package = MutableIcmpPacket::owned(buf)
                    .ok_or_else(|| PingError::Encode("could not create ICMP package".to_owned()))?;
                package.set_icmp_type(IcmpTypes::EchoRequest);
                package.set_icmp_code(IcmpCode::new(0));
                package.set_payload(&body);
                package.set_checksum(0_u16);
                let checksum = icmp::checksum(
                    &IcmpPacket::new(package.packet())
                        .ok_or_else(|| PingError::Encode("could not checksum ICMP package".to_owned()))?,
                );
                package.set_checksum(checksum);
                Ok(package.packet().to_vec())
            }
            IpVersion::V6 => {
                // The kernel fills in the ICMPv6 checksum on raw sockets.
                let mut package = MutableIcmpv6Packet::owned(buf)
                    .ok_or_else(|| PingError::Encode("could not create ICMPv6 package".to_owned()))?;
                package.set_icmpv6_type(Icmpv6Types::EchoRequest);
                package.set_icmpv6_code(Icmpv6Code::new(0));
                package.set_payload(&body);
                Ok(package.packet().to_vec())
            }
        }
    }

    /// Decodes a datagram read from the raw socket.
    ///
    /// Returns `Ok(None)` for well-formed ICMP messages which are not Echo Replies.
    pub(crate) fn decode(&self, buf: &[u8]) -> PingResult<Option<EchoReply>> {
        let (ttl, echo_body) = match self.ip_version {
            IpVersion::V4 => {
                let ip_package =
                    Ipv4Packet::new(buf).ok_or_else(|| PingError::Parse("truncated IPv4 header".to_owned()))?;
                let header_len = usize::from(ip_package.get_header_length()) * 4;
                if header_len < IPV4_MIN_HEADER_LEN || header_len > buf.len() {
                    return Err(PingError::Parse(format!("invalid IPv4 header length {header_len}")));
                }
                let icmp_package = IcmpPacket::new(&buf[header_len..])
                    .ok_or_else(|| PingError::Parse("truncated ICMP message".to_owned()))?;
                if icmp_package.get_icmp_type() != IcmpTypes::EchoReply {
                    tracing::trace!("skipping ICMP message of type {:?}", icmp_package.get_icmp_type());
                    return Ok(None);
                }
                (Ttl(ip_package.get_ttl()), icmp_package.payload().to_vec())
            }
            IpVersion::V6 => {
                // The IPv6 raw socket delivers the ICMPv6 message without the IP header, so the
                // message is parsed from the start of the buffer.
                let ip_package =
                    Ipv6Packet::new(buf).ok_or_else(|| PingError::Parse("truncated IPv6 header".to_owned()))?;
                let icmp_package =
                    Icmpv6Packet::new(buf).ok_or_else(|| PingError::Parse("truncated ICMPv6 message".to_owned()))?;
                if icmp_package.get_icmpv6_type() != Icmpv6Types::EchoReply {
                    tracing::trace!("skipping ICMPv6 message of type {:?}", icmp_package.get_icmpv6_type());
                    return Ok(None);
                }
                (Ttl(ip_package.get_hop_limit()), icmp_package.payload().to_vec())
            }
        };

        if echo_body.len() < ECHO_HEADER_LEN + TIMESTAMP_LEN {
            return Err(PingError::Parse(format!("echo body of {} bytes is too short", echo_body.len())));
        }
        let identifier = u16::from_be_bytes([echo_body[0], echo_body[1]]);
        let sequence_number = SequenceNumber::from(u16::from_be_bytes([echo_body[2], echo_body[3]]));
        let mut timestamp = [0u8; TIMESTAMP_LEN];
        timestamp.copy_from_slice(&echo_body[ECHO_HEADER_LEN..ECHO_HEADER_LEN + TIMESTAMP_LEN]);

        Ok(Some(EchoReply {
            ttl,
            identifier,
            sequence_number,
            send_timestamp: SendTimestamp::from_le_bytes(timestamp),
        }))
    }
}
