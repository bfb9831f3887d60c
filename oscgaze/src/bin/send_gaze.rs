//! Gaze Sender Utility
//!
//! Transmits the three gaze channel messages to a running tracker, once or
//! on a repeating interval. Useful for exercising a live listener without
//! tracker hardware on the network.
//!
//! **Usage:**
//! ```bash
//! send-gaze --target 127.0.0.1:9000 --y 0.2 --left-x -0.1 --right-x -0.1 --repeat-ms 50
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::UdpSocket;
use tokio::time::{sleep, Duration};
use tracing::info;

use oscgaze::channel::{EYES_Y_ADDRESS, LEFT_EYE_X_ADDRESS, RIGHT_EYE_X_ADDRESS};
use oscgaze::osc::encode_float_message;

/// Gaze channel sender
#[derive(Parser, Debug)]
#[command(name = "send-gaze")]
#[command(about = "Send gaze channel messages to an OSC gaze tracker")]
struct Args {
    /// Tracker address to send to
    #[arg(short, long, default_value = "127.0.0.1:9000")]
    target: String,

    /// Vertical component, normalized [-1, 1]
    #[arg(long, default_value = "0.0")]
    y: f32,

    /// Left-eye horizontal component, normalized [-1, 1]
    #[arg(long, default_value = "0.0")]
    left_x: f32,

    /// Right-eye horizontal component, normalized [-1, 1]
    #[arg(long, default_value = "0.0")]
    right_x: f32,

    /// Repeat interval in milliseconds; send once when omitted
    #[arg(long)]
    repeat_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let socket = UdpSocket::bind("0.0.0.0:0")
        .await
        .context("Failed to bind sender socket")?;
    socket
        .connect(&args.target)
        .await
        .with_context(|| format!("Failed to resolve target {}", args.target))?;

    info!(
        "Sending y={} left_x={} right_x={} to {}",
        args.y, args.left_x, args.right_x, args.target
    );

    loop {
        send_channels(&socket, args.y, args.left_x, args.right_x).await?;
        match args.repeat_ms {
            Some(ms) => sleep(Duration::from_millis(ms.max(1))).await,
            None => break,
        }
    }

    Ok(())
}

/// Send one reading per channel, as three separate datagrams
async fn send_channels(socket: &UdpSocket, y: f32, left_x: f32, right_x: f32) -> Result<()> {
    for (address, value) in [
        (EYES_Y_ADDRESS, y),
        (LEFT_EYE_X_ADDRESS, left_x),
        (RIGHT_EYE_X_ADDRESS, right_x),
    ] {
        socket
            .send(&encode_float_message(address, value))
            .await
            .context("Failed to send datagram")?;
    }
    Ok(())
}
