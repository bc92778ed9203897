use axum::{body::Body, http::Uri, response::Response};
use colored::Colorize;
use local_ip_address::local_ip;
use std::{
    net::{IpAddr, SocketAddr},
    time::Duration,
};
use tokio::net::TcpSocket;
use tower_http::trace::OnResponse;
use tracing::{debug, info, Span};

use crate::logging::{format_elapsed_time, FormatElapsedTimeOptions};

pub fn log_server_start(
    start_time: std::time::Instant,
    site_name: &str,
    host: bool,
    addr: SocketAddr,
) {
    info!(name: "SKIP_FORMAT", "");
    let elapsed_time = format_elapsed_time(
        start_time.elapsed(),
        &FormatElapsedTimeOptions::default_dev(),
    );
    info!(name: "SKIP_FORMAT", "{} {}", site_name.bold().bright_red(), format!("server started in {}", elapsed_time));
    info!(name: "SKIP_FORMAT", "");

    let port = addr.port();
    let url = format!("\x1b]8;;http://localhost:{port}\x1b\\http://localhost:{port}\x1b]8;;\x1b\\")
        .bold()
        .underline()
        .bright_blue();
    let network_url = if host {
        match local_ip() {
            Ok(local_ip) => format!(
                "\x1b]8;;http://{local_ip}:{port}\x1b\\http://{local_ip}:{port}\x1b]8;;\x1b\\"
            )
            .bold()
            .underline()
            .bright_magenta(),
            Err(_) => "Could not determine the local network address".dimmed(),
        }
    } else {
        "Use --host to expose the server to your network".dimmed()
    };
    info!(name: "SKIP_FORMAT", "🮔  {}    {}", "Local".bold(), url);
    info!(name: "SKIP_FORMAT", "🮔  {}  {}", "Network".bold(), network_url);
    info!(name: "SKIP_FORMAT", "");

    info!(name: "server", "{}", "waiting for requests...".dimmed());
}

#[derive(Clone, Debug)]
pub struct CustomOnResponse;

impl OnResponse<Body> for CustomOnResponse {
    fn on_response(self, response: &Response<Body>, latency: Duration, _span: &Span) {
        let status = response.status();

        // Skip informational responses
        if status.is_informational() {
            return;
        }

        let status = if status.is_server_error() {
            status.to_string().red()
        } else if status.is_client_error() {
            status.to_string().yellow()
        } else {
            status.to_string().green()
        };

        // The request URI is stashed in the response extensions by a middleware,
        // since it is not recoverable from the response itself.
        let uri = response
            .extensions()
            .get::<Uri>()
            .cloned()
            .unwrap_or_default()
            .to_string()
            .bold();

        let latency = format_elapsed_time(latency, &FormatElapsedTimeOptions::default());

        info!(name: "", "{} {} {}", status, uri, latency);
    }
}

/// Bind-probe ports starting at `starting_port` until a free one is found.
pub async fn find_open_port(address: &IpAddr, starting_port: u16) -> std::io::Result<u16> {
    let mut port = starting_port;

    loop {
        let socket = new_socket(address)?;
        let socket_addr = SocketAddr::new(*address, port);
        match socket.bind(socket_addr) {
            Ok(_) => {
                debug!("Found open port: {}", port);
                return Ok(port);
            }
            Err(err) => {
                debug!(
                    "Port {} is already in use or failed to bind, trying next one",
                    port
                );
                port = match port.checked_add(1) {
                    Some(next) => next,
                    None => return Err(err),
                };
            }
        }
    }
}

pub fn new_socket(address: &IpAddr) -> std::io::Result<TcpSocket> {
    match address {
        IpAddr::V4(_) => TcpSocket::new_v4(),
        IpAddr::V6(_) => TcpSocket::new_v6(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_find_open_port_skips_taken_ports() {
        let addr = IpAddr::from([127, 0, 0, 1]);

        // Occupy a port, then ask for it.
        let listener = tokio::net::TcpListener::bind((addr, 0)).await.unwrap();
        let taken = listener.local_addr().unwrap().port();

        let port = find_open_port(&addr, taken).await.unwrap();
        assert_ne!(port, taken);
        assert!(port > taken);
    }
}
