//! `chatshelf ask` command implementation.

use crate::client::HttpEndpoint;
use crate::config::Config;
use crate::core::{ExchangeController, ExchangeOutcome};
use crate::error::{Error, Result};
use crate::render::TerminalView;
use tracing::debug;

/// Run the ask command.
///
/// Sends one message, either in a new conversation or appended to `chat`.
///
/// # Errors
///
/// Returns an error if `chat` is not a saved conversation, the HTTP client
/// cannot be built, or the endpoint replies without an answer.
pub fn run(config: &Config, message: &str, chat: Option<&str>) -> Result<()> {
    let mut store = super::open_store(config);
    if let Some(id) = chat {
        store.switch_to(id)?;
    }

    let endpoint = HttpEndpoint::new(&config.endpoint.url, config.endpoint.timeout())?;
    let mut view = TerminalView::stdio();
    let mut controller = ExchangeController::new();

    match controller.run(&mut store, &mut view, &endpoint, message)? {
        None => eprintln!("Nothing to send."),
        Some(ExchangeOutcome::Answered) => {
            eprintln!("Saved to {}", store.current_id());
        }
        Some(ExchangeOutcome::MissingAnswer) => return Err(Error::MissingAnswer),
        Some(outcome) => debug!(?outcome, "exchange did not produce an answer"),
    }
    Ok(())
}
