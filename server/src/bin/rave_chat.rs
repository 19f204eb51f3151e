//! Terminal chat client
//!
//! Lines are sent as messages. `/attach <path>` stages an image or audio
//! file for the next send, `/clear` drops it, `/quit` exits.

use rave_core::{ClientConfig, Composer, SendOutcome};
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    rave_core::init_logging();

    let config = ClientConfig::from_env()?;
    let composer = Composer::from_config(&config)?;

    let mut shown = 0;
    print_new(&composer, &mut shown);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();

        if input == "/quit" {
            break;
        }
        if input == "/clear" {
            composer.clear_attachment();
            println!("(attachment cleared)");
            continue;
        }
        if let Some(path) = input.strip_prefix("/attach ") {
            match composer.attach_file(path.trim()) {
                Ok(()) => println!("(attached: {})", path.trim()),
                Err(e) => println!("(could not attach: {e})"),
            }
            continue;
        }

        composer.update_draft(line);
        match composer.send().await? {
            SendOutcome::Rejected(reason) => tracing::debug!(?reason, "Send rejected"),
            SendOutcome::Replied(_) | SendOutcome::Failed(_) => print_new(&composer, &mut shown),
        }
    }

    tracing::info!(session_id = %composer.session_id()?, "Chat client exiting");
    Ok(())
}

fn print_new(composer: &Composer, shown: &mut usize) {
    let view = composer.view();
    for entry in view.entries.iter().skip(*shown) {
        println!("{}: {}", entry.label, entry.content);
    }
    *shown = view.entries.len();
}
