//! Open a WebSocket handshake against a running server and report the outcome.
//!
//! Run with: `cargo run --example connect -- <host> <port> [path]`

use ws_handshake::{connect, HandshakeConfig, SystemCrypto};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init()
        .ok();

    let mut args = std::env::args().skip(1);
    let host = args.next().unwrap_or_else(|| "127.0.0.1".to_string());
    let port: u16 = args.next().map(|p| p.parse()).transpose()?.unwrap_or(9001);
    let path = args.next().unwrap_or_default();

    let config = HandshakeConfig::new(host.clone(), port)
        .with_path(path)
        .with_header("Origin", format!("http://{}", host));

    println!("Connecting to {}:{}...", host, port);
    let stream = tokio::net::TcpStream::connect((host.as_str(), port)).await?;
    let conn = connect(stream, &config, &SystemCrypto).await?;

    println!(
        "Handshake accepted (accept = {}, {} byte(s) of frame data already received).",
        conn.key.expected_accept(),
        conn.leftover.len()
    );
    Ok(())
}
