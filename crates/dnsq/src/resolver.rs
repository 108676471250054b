use std::net::{Ipv4Addr, SocketAddrV4, UdpSocket};

use anyhow::{bail, Context};
use log::debug;
use stubdns::{
    domain::DomainName,
    message::{Message, ResponseCode},
    MAX_MESSAGE_BYTES,
};

const DNS_PORT: u16 = 53;

/// One-shot resolution of the A record for `domain` against `server`:
/// send a single query datagram, block for a single reply on an
/// ephemeral local port, decode it. There is no retry and no timeout; a
/// reply that never arrives leaves this call blocked.
pub fn resolve(domain: &str, server: Ipv4Addr) -> anyhow::Result<Ipv4Addr> {
    let name = DomainName::try_from(domain)?;
    let query = Message::new_query(name);
    let payload = query.to_bytes()?;

    let socket =
        UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).context("error in binding local socket")?;
    let upstream = SocketAddrV4::new(server, DNS_PORT);
    socket
        .send_to(&payload, upstream)
        .with_context(|| format!("error in sending query to {upstream}"))?;
    debug!(
        "sent {} byte query (id {:#06x}) to {}",
        payload.len(),
        query.header().id(),
        upstream
    );

    // A UDP DNS message fits in 512 bytes; anything larger arrives with
    // TC set and is rejected by the decoder
    let mut buf = [0u8; MAX_MESSAGE_BYTES];
    let (received, from) = socket
        .recv_from(&mut buf)
        .context("error in receiving response")?;
    debug!("received {received} bytes from {from}");

    let response = Message::parse(&buf[..received])?;
    if response.header().id() != query.header().id() {
        bail!(
            "response id {:#06x} does not match query id {:#06x}",
            response.header().id(),
            query.header().id()
        );
    }
    match response.header().response_code() {
        ResponseCode::NoError => {}
        rcode => bail!("server answered '{domain}' with {rcode:?}"),
    }

    response
        .answer_address()
        .with_context(|| format!("response for '{domain}' carries no A record answer"))
}
