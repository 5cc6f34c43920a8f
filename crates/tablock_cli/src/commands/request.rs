//! Send a single protocol request.

use super::OfflineCoordinator;
use anyhow::{Context, Result};
use tablock_core::{MessageSender, Request, TabId};

pub fn run(json: &str, sender_tab: Option<u32>) -> Result<()> {
    let request: Request = serde_json::from_str(json).context("Invalid request JSON")?;
    let sender = match sender_tab {
        Some(tab) => MessageSender::page(TabId(tab)),
        None => MessageSender::popup(),
    };

    let mut offline = OfflineCoordinator::open()?;
    let response = offline.coordinator.handle_request(request, &sender);

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
