//! Example: stream a reply to stdout, cancel with Ctrl-C.
//!
//! Reads `PARLEY_ENDPOINT`, `PARLEY_API_KEY` and `PARLEY_MODEL`.
//!
//! Run with: `cargo run --example stream -p parley-openai -- "Why is the sky blue?"`

use std::io::Write;

use parley_core::{CancellationToken, ChatBackend, Finish, Message};
use parley_openai::OpenAiCompatible;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let prompt = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Say hello in three languages.".to_string());

    let client = OpenAiCompatible::from_env();
    let cancel = CancellationToken::new();

    let canceller = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            canceller.cancel();
        }
    });

    let messages = vec![
        Message::system("You are a concise assistant."),
        Message::user(prompt),
    ];

    let mut stdout = std::io::stdout();
    let mut sink = |delta: &str| {
        let _ = stdout.write_all(delta.as_bytes());
        let _ = stdout.flush();
    };

    let outcome = client.stream_chat(messages, &mut sink, &cancel).await?;
    println!();
    if outcome.finish == Finish::Cancelled {
        eprintln!("(cancelled after {} deltas)", outcome.delivered);
    }
    Ok(())
}
