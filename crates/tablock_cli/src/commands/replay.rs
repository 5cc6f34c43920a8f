//! Replay recorded events and requests against a simulated browser.
//!
//! Each line of the input is an [`Envelope`]. Tabs are known to the
//! simulated browser from the first line that mentions them. Tab creations
//! the coordinator requests complete immediately, so recordings only need
//! the user's own actions.

use anyhow::{Context, Result};
use console::style;
use std::fs;
use std::path::Path;
use tablock_core::{
    settle, BrowserEvent, Config, Envelope, Inbound, LockCoordinator, LockError, MemoryStore,
    Profile, Request, SimulatedHost,
};
use tracing::debug;

pub fn run(file: &Path) -> Result<()> {
    let content =
        fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;

    let config = match Profile::open(".") {
        Ok(profile) => profile.config().clone(),
        Err(LockError::NotAProfile(_)) => Config::default(),
        Err(e) => return Err(e.into()),
    };
    let mut coordinator = LockCoordinator::start(MemoryStore::new(), SimulatedHost::new(), config)?;

    let mut replayed = 0;
    for (number, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let envelope =
            Envelope::parse(line).with_context(|| format!("Line {} is not a message", number + 1))?;

        adopt_tabs(coordinator.host_mut(), &envelope);
        println!("{} {}", style(format!("{:>4}", number + 1)).dim(), line);

        match envelope.into_inbound() {
            Inbound::Request {
                request, sender, ..
            } => {
                let response = coordinator.handle_request(request, &sender);
                println!("     {} {}", style("=>").green(), serde_json::to_string(&response)?);
            }
            Inbound::Event(event) => coordinator.handle_event(event),
        }
        let delivered = settle(&mut coordinator);
        debug!(line = number + 1, delivered, "Replayed message");

        for effect in coordinator.host_mut().take_effects() {
            println!("     {} {}", style("->").cyan(), serde_json::to_string(&effect)?);
        }
        replayed += 1;
    }

    println!();
    println!(
        "Replayed {} messages, {} locked tabs at end, {} pending reopens",
        replayed,
        coordinator.table().len(),
        coordinator.reopen_buffer().len()
    );
    Ok(())
}

/// Keeps the simulated browser's tab list in step with a recorded message.
fn adopt_tabs(host: &mut SimulatedHost, envelope: &Envelope) {
    match envelope {
        Envelope::Event { event } => match event {
            BrowserEvent::BeforeNavigate { tab_id, url, .. }
            | BrowserEvent::ContextMenuClicked { tab_id, url, .. } => host.adopt(*tab_id, url),
            BrowserEvent::TabUpdated { tab_id, url, .. } => {
                host.adopt(*tab_id, url.as_deref().unwrap_or_default())
            }
            BrowserEvent::TabActivated { tab_id } => host.adopt(*tab_id, ""),
            BrowserEvent::TabRemoved { tab_id, .. } => {
                host.forget(*tab_id);
            }
            BrowserEvent::Installed | BrowserEvent::TabCreated { .. } => {}
        },
        Envelope::Request { request, sender } => {
            match request {
                Request::LockBoth { tab_id, url } | Request::ToggleLock { tab_id, url, .. } => {
                    host.adopt(*tab_id, url)
                }
                Request::UpdateSettings {
                    tab_id: Some(tab_id),
                    url,
                    ..
                } => host.adopt(*tab_id, url.as_deref().unwrap_or_default()),
                Request::GetLockStatus { tab_id } | Request::UnlockAll { tab_id } => {
                    host.adopt(*tab_id, "")
                }
                _ => {}
            }
            if let Some(tab_id) = sender.tab_id {
                host.adopt(tab_id, "");
            }
        }
    }
}
