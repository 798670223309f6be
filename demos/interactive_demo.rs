//! Interactive demo of the transcript filler filter.
//!
//! Type transcripts and see how they would be handled in different agent
//! states (speaking/listening).
//!
//! Commands:
//!     speak     - Set agent state to "speaking"
//!     listen    - Set agent state to "listening"
//!     words     - Show current ignored words
//!     set X,Y   - Set ignored words (comma-separated)
//!     quit      - Exit the demo
//!
//! Any other input is treated as a transcript to filter.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use fillergate::{AgentActivity, FillerInterceptor, LocalActivity, TranscriptHandler};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize logging
    env_logger::init();

    println!("Transcript Filler Filter Demo");
    println!("=============================");
    println!("Commands: speak | listen | words | set <csv> | quit");
    println!("Anything else is dispatched as a transcript.\n");

    let (activity, mut events) = LocalActivity::new("demo-activity");

    // Original handler: print forwarded transcripts.
    activity.set_transcript_handler(Some(TranscriptHandler::Blocking(Arc::new(
        |transcript: &str| {
            println!("  forwarded: {}", transcript);
            Ok(())
        },
    ))));

    // Loads FILLERGATE_IGNORED_WORDS or the built-in defaults.
    let interceptor = FillerInterceptor::from_env();
    interceptor.attach_to_activity(activity.as_ref())?;

    let stdin = io::stdin();
    loop {
        let state = if activity.is_speaking() {
            "speaking"
        } else {
            "listening"
        };
        print!("[agent {}] > ", state);
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let text = line.trim();

        match text {
            "" => continue,
            "quit" => break,
            "speak" => activity.set_speaking(true),
            "listen" => activity.set_speaking(false),
            "words" => {
                println!("  currently ignored words/sounds:");
                for word in interceptor.filter().ignored_words() {
                    println!("    - {}", word);
                }
            }
            _ if text.starts_with("set ") => {
                interceptor.set_ignored_words(text[4..].split(','));
                println!(
                    "  updated ignored words to: {:?}",
                    interceptor.filter().ignored_words()
                );
            }
            transcript => {
                activity.dispatch_transcript(transcript).await?;
                while let Ok(event) = events.try_recv() {
                    println!("  event: {}", serde_json::to_string(&event)?);
                }
            }
        }
    }

    interceptor.detach_from_activity(activity.as_ref());
    println!("\nDemo finished.");

    Ok(())
}
