//! Show persisted lock state.

use super::{yes_no, OfflineCoordinator};
use anyhow::Result;
use console::style;
use tablock_core::{LockRecord, TabId};

pub fn run(tab: Option<u32>) -> Result<()> {
    let offline = OfflineCoordinator::open()?;
    let coordinator = &offline.coordinator;
    let global = coordinator.settings().open_links_in_new_tab;

    if let Some(tab) = tab {
        let tab_id = TabId(tab);
        match coordinator.table().get(tab_id) {
            Some(record) => print_record(tab_id, record, global),
            None => println!("Tab {} is not locked", tab_id),
        }
        return Ok(());
    }

    println!("{}", style("Global settings:").bold());
    println!("  Open links in new tab: {}", yes_no(global));
    println!();

    let mut records: Vec<_> = coordinator.table().iter().collect();
    if records.is_empty() {
        println!("No locked tabs");
        return Ok(());
    }
    records.sort_by_key(|(tab_id, _)| *tab_id);

    println!("{} ({})", style("Locked tabs:").bold(), records.len());
    for (tab_id, record) in records {
        print_record(tab_id, record, global);
    }
    Ok(())
}

fn print_record(tab_id: TabId, record: &LockRecord, global: bool) {
    println!("  Tab {}  {}", style(tab_id).cyan(), record.url);
    println!("    Page lock: {}", yes_no(record.page_lock));
    println!("    Tab lock:  {}", yes_no(record.tab_lock));
    let policy = record.open_links_in_new_tab.resolve(global);
    if record.open_links_in_new_tab.is_inherit() {
        println!("    Open links in new tab: {} (global)", yes_no(policy));
    } else {
        println!("    Open links in new tab: {} (override)", yes_no(policy));
    }
}
