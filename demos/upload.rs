//! See `source` for an example of [`Client::moderate_image_file`]: moderating
//! an image uploaded straight from disk. For text, see the `moderate`
//! example.

// Note: This example uses blocking calls for simplicity such as `print` and
// `stdin().lock()`. In a real application, these should usually be replaced
// with async alternatives.

use clap::Parser;
use safecomms::{moderation, Client};
use std::io::{stdin, BufRead};
use std::path::PathBuf;

/// Upload an image file and print the service's verdict.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path of the image file to upload.
    image: PathBuf,

    /// Language for any text in the image. The service assumes "en" when
    /// unset.
    #[arg(short, long)]
    language: Option<String>,

    /// Server-side moderation profile to apply.
    #[arg(short, long)]
    moderation_profile_id: Option<String>,
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

    let mut request = moderation::File::new(args.image);
    if let Some(language) = args.language {
        request = request.language(language);
    }
    if let Some(id) = args.moderation_profile_id {
        request = request.moderation_profile_id(id);
    }

    let verdict = client.moderate_image_file(request).await?;

    println!("{}", verdict);

    Ok(())
}
