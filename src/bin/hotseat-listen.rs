//! Hotseat Listen - command-line hub client
//!
//! Connects to a running server and prints every message it receives.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use serde_json::Value;

use hotseat::broadcast::BROADCAST_MESSAGE;
use hotseat::client::{
    render_payload, ClientConfig, Notifier, ReconnectPolicy, Session, SessionState,
};
use hotseat::types::{HotseatResult, StoredRecord};
use hotseat::utils::{format_timestamp, init_logging, DEFAULT_LOG_FILTER};

/// Print live board updates
#[derive(Debug, Parser)]
#[command(name = "hotseat-listen", version, about)]
struct Args {
    /// Negotiate endpoint of the server
    #[arg(
        long,
        env = "HOTSEAT_NEGOTIATE_URL",
        default_value = "http://127.0.0.1:7071/api/negotiate"
    )]
    negotiate: String,

    /// Broadcast this message to every session once connected
    #[arg(long)]
    say: Option<String>,

    /// Reconnect attempts after the connection drops
    #[arg(long, default_value_t = 0)]
    retries: u32,

    /// Connect timeout in seconds
    #[arg(long, default_value_t = 10)]
    timeout: u64,
}

/// Prints diagnostics to stdout
struct StdoutNotifier;

impl Notifier for StdoutNotifier {
    fn notify(&self, message: &str) {
        println!("{}", message);
    }
}

fn print_post(payload: Value) {
    match serde_json::from_value::<StoredRecord>(payload.clone()) {
        Ok(record) => {
            let when = format_timestamp(record.ts).unwrap_or_else(|| record.ts.to_string());
            println!(
                "[{}] {}: {}",
                when,
                record.kind.as_deref().unwrap_or("-"),
                render_payload(&record.data)
            );
        }
        Err(_) => println!("{}", render_payload(&payload)),
    }
}

#[tokio::main]
async fn main() -> HotseatResult<()> {
    init_logging(DEFAULT_LOG_FILTER);
    let args = Args::parse();

    let config = ClientConfig::negotiate(args.negotiate)
        .with_connect_timeout(Duration::from_secs(args.timeout))
        .with_reconnect(ReconnectPolicy::exponential(args.retries));

    let session = Session::with_default_handlers(config, Arc::new(StdoutNotifier));
    session.post_callback().bind(print_post);

    let mut task = session.start();
    tokio::select! {
        _ = session.wait_for_state(SessionState::Connected) => {}
        // Gave up without ever connecting; the failure is already logged
        _ = &mut task => return Ok(()),
    }

    if let Some(message) = args.say {
        session.invoke(BROADCAST_MESSAGE, Value::String(message))?;
    }

    tokio::select! {
        _ = task => {}
        _ = tokio::signal::ctrl_c() => {}
    }
    Ok(())
}
