//! See `source` for an example of [`Client::moderate_text`]. For image
//! moderation, see the `upload` example.

// Note: This example uses blocking calls for simplicity such as `print` and
// `stdin().lock()`. In a real application, these should usually be replaced
// with async alternatives.

use clap::Parser;
use safecomms::{moderation, Client};
use std::io::{stdin, BufRead};

/// Moderate a snippet of text and print the service's verdict.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Text to moderate.
    #[arg(short, long, default_value = "you are a silly goose")]
    content: String,

    /// Language of the content. The service assumes "en" when unset.
    #[arg(short, long)]
    language: Option<String>,

    /// Replace flagged spans in the returned content.
    #[arg(short, long)]
    replace: bool,

    /// Detect personally identifiable information.
    #[arg(short, long)]
    pii: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "log")]
    env_logger::init();

    // Read the command line arguments.
    let args = Args::parse();

    // Get API key from stdin.
    println!("Enter your API key:");
    let key = stdin().lock().lines().next().unwrap()?;

    // Create a client. `key` will be consumed and zeroized.
    let client = Client::new(key)?;

    let mut request = moderation::Text::new(args.content);
    if let Some(language) = args.language {
        request = request.language(language);
    }
    if args.replace {
        request = request.replace(true);
    }
    if args.pii {
        request = request.pii(true);
    }

    let verdict = client.moderate_text(request).await?;

    println!("{}", verdict);

    Ok(())
}
