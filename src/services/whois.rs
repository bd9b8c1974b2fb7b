// WHOIS Client - Transport
// Copyright (C) 2025 Akaere Networks
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::io;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpSocket, TcpStream};

use crate::config::MAX_RESPONSE_BYTES;
use crate::core::LookupError;
use crate::services::servers::WhoisServer;
use crate::{log_debug, log_warn};

/// One whois exchange: connect, send `query` terminated by CRLF, read to EOF.
/// The whole exchange shares a single `timeout`.
pub async fn query_whois(
    query: &str,
    server: &WhoisServer,
    source: Option<IpAddr>,
    timeout: Duration,
) -> Result<String, LookupError> {
    let address = server.display_name();
    log_debug!("Querying WHOIS server {} with {:?}", address, query);

    match tokio::time::timeout(timeout, exchange(query, server, source)).await {
        Ok(result) => result,
        Err(_) => Err(LookupError::Timeout { server: address }),
    }
}

async fn exchange(
    query: &str,
    server: &WhoisServer,
    source: Option<IpAddr>,
) -> Result<String, LookupError> {
    let address = server.display_name();
    let mut stream = connect(server, source).await?;

    if let Err(e) = stream.set_nodelay(true) {
        log_warn!("Failed to set TCP_NODELAY: {}", e);
    }

    let io_error = |source: io::Error| LookupError::Io {
        server: address.clone(),
        source,
    };

    // WHOIS protocol expects a CRLF-terminated query
    let query_line = format!("{}\r\n", query);
    stream.write_all(query_line.as_bytes()).await.map_err(io_error)?;
    stream.flush().await.map_err(io_error)?;

    let mut response = Vec::new();
    let mut buffer = [0u8; 8192];
    loop {
        let n = stream.read(&mut buffer).await.map_err(io_error)?;
        if n == 0 {
            break;
        }
        response.extend_from_slice(&buffer[..n]);
        if response.len() > MAX_RESPONSE_BYTES {
            log_debug!("Response from {} exceeded size limit, truncating", address);
            response.truncate(MAX_RESPONSE_BYTES);
            break;
        }
    }

    log_debug!("Received {} bytes from {}", response.len(), address);

    if response.is_empty() {
        return Err(LookupError::EmptyResponse(address));
    }

    Ok(String::from_utf8_lossy(&response).into_owned())
}

/// Try every resolved address of the server, bound to `source` when given
async fn connect(server: &WhoisServer, source: Option<IpAddr>) -> Result<TcpStream, LookupError> {
    let address = server.display_name();
    let connect_error = |source: io::Error| LookupError::Connect {
        server: address.clone(),
        source,
    };

    let targets = tokio::net::lookup_host((server.host.as_str(), server.port))
        .await
        .map_err(connect_error)?;

    let mut last_error = None;
    for target in targets {
        if source.is_some_and(|source| source.is_ipv4() != target.is_ipv4()) {
            continue;
        }

        let socket = match target {
            SocketAddr::V4(_) => TcpSocket::new_v4(),
            SocketAddr::V6(_) => TcpSocket::new_v6(),
        }
        .map_err(connect_error)?;

        if let Some(source) = source {
            socket
                .bind(SocketAddr::new(source, 0))
                .map_err(|e| LookupError::SourceAddress(format!("{}: {}", source, e)))?;
        }

        match socket.connect(target).await {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                log_debug!("Connecting to {} ({}) failed: {}", address, target, e);
                last_error = Some(e);
            }
        }
    }

    Err(connect_error(last_error.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::AddrNotAvailable, "no usable address")
    })))
}
