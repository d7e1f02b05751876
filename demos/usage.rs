//! See `source` for an example of [`Client::usage`]: fetching account usage
//! figures.

// Note: This example uses blocking calls for simplicity such as `print` and
// `stdin().lock()`. In a real application, these should usually be replaced
// with async alternatives.

use clap::Parser;
use safecomms::Client;
use std::io::{stdin, BufRead};

/// Print account usage figures.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "log")]
    env_logger::init();

    let _args = Args::parse();

    // Get API key from stdin.
    println!("Enter your API key:");
    let key = stdin().lock().lines().next().unwrap()?;

    // Create a client. `key` will be consumed and zeroized.
    let client = Client::new(key)?;

    let usage = client.usage().await?;

    println!("{}", usage);

    Ok(())
}
