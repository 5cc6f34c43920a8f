use crate::harness::{Assertion, Scenario};
use tablock_core::BrowserHost;

const MAIL: &str = "https://mail.example.com/inbox";
const NEWS: &str = "https://news.example.com/";

/// Asserts the tab at `index` in the strip is tab-locked.
fn locked_at(index: usize) -> Assertion {
    Assertion::Custom(Box::new(move |c| {
        let tabs = c.host().open_tabs();
        let tab = *tabs
            .get(index)
            .ok_or_else(|| anyhow::anyhow!("no tab at index {}", index))?;
        anyhow::ensure!(
            c.table().get(tab).is_some_and(|r| r.tab_lock),
            "tab at index {} is not tab-locked",
            index
        );
        Ok(())
    }))
}

#[test]
fn test_tab_locked_tab_comes_back() {
    Scenario::new("tab_locked_tab_comes_back")
        .open_tab("mail", MAIL)
        .open_tab("news", NEWS)
        .popup_toggles_tab_lock("mail")
        .close_tab("mail")
        .assert(Assertion::OpenTabCount(2))
        .assert_tab_url("mail", MAIL)
        .assert_locks("mail", false, true)
        .assert_anchor("mail", MAIL)
        .assert_badge("mail", true)
        .assert(Assertion::ReopenPending(0))
        .assert_record_count(1)
        .assert(locked_at(0))
        .run()
        .unwrap();
}

#[test]
fn test_reopen_when_update_arrives_first() {
    Scenario::new("reopen_when_update_arrives_first")
        .update_before_callback()
        .open_tab("news", NEWS)
        .open_tab("mail", MAIL)
        .popup_toggles_tab_lock("mail")
        .close_tab("mail")
        .assert_locks("mail", false, true)
        .assert(Assertion::ReopenPending(0))
        .assert_record_count(1)
        .assert(locked_at(1))
        .run()
        .unwrap();
}

#[test]
fn test_closing_window_reopens_at_end() {
    Scenario::new("closing_window_reopens_at_end")
        .open_tab("mail", MAIL)
        .open_tab("news", NEWS)
        .popup_toggles_tab_lock("mail")
        .close_window_of("mail")
        .assert_locks("mail", false, true)
        .assert(locked_at(1))
        .run()
        .unwrap();
}

#[test]
fn test_position_restore_can_be_disabled() {
    Scenario::new("position_restore_can_be_disabled")
        .with_config("[reopen]\nttl_secs = 60\nrestore_position = false\n")
        .open_tab("mail", MAIL)
        .open_tab("news", NEWS)
        .popup_toggles_tab_lock("mail")
        .close_tab("mail")
        .assert(locked_at(1))
        .run()
        .unwrap();
}

#[test]
fn test_reopen_follows_tab_lock_anchor() {
    Scenario::new("reopen_follows_tab_lock_anchor")
        .open_tab("mail", MAIL)
        .popup_toggles_tab_lock("mail")
        .navigate("mail", "https://mail.example.com/drafts")
        .assert_anchor("mail", "https://mail.example.com/drafts")
        .close_tab("mail")
        .assert_tab_url("mail", "https://mail.example.com/drafts")
        .assert_locks("mail", false, true)
        .run()
        .unwrap();
}

#[test]
fn test_reopen_keeps_page_lock() {
    Scenario::new("reopen_keeps_page_lock")
        .open_tab("mail", MAIL)
        .popup_locks_both("mail")
        .close_tab("mail")
        .assert_locks("mail", true, true)
        .assert_agent_locked("mail", true)
        .assert_overlay("mail", true)
        .navigate("mail", NEWS)
        .assert_tab_url("mail", MAIL)
        .run()
        .unwrap();
}

#[test]
fn test_reopen_keeps_link_override() {
    Scenario::new("reopen_keeps_link_override")
        .open_tab("mail", MAIL)
        .popup_toggles_tab_lock("mail")
        .popup_sets_override("mail", Some(false))
        .close_tab("mail")
        .assert_policy("mail", false)
        .run()
        .unwrap();
}

#[test]
fn test_page_locked_only_tab_stays_closed() {
    Scenario::new("page_locked_only_tab_stays_closed")
        .open_tab("mail", MAIL)
        .open_tab("news", NEWS)
        .popup_toggles_page_lock("mail")
        .close_tab("mail")
        .assert(Assertion::OpenTabCount(1))
        .assert_record_count(0)
        .assert(Assertion::ReopenPending(0))
        .run()
        .unwrap();
}

#[test]
fn test_failed_reopen_drops_locks() {
    Scenario::new("failed_reopen_drops_locks")
        .open_tab("mail", MAIL)
        .open_tab("news", NEWS)
        .popup_toggles_tab_lock("mail")
        .fail_creates()
        .close_tab("mail")
        .assert(Assertion::OpenTabCount(1))
        .assert_record_count(0)
        .assert(Assertion::ReopenPending(0))
        .run()
        .unwrap();
}

#[test]
fn test_reopened_tab_can_be_unlocked_and_closed() {
    Scenario::new("reopened_tab_can_be_unlocked_and_closed")
        .open_tab("mail", MAIL)
        .open_tab("news", NEWS)
        .popup_toggles_tab_lock("mail")
        .close_tab("mail")
        .popup_toggles_tab_lock("mail")
        .assert_unlocked("mail")
        .close_tab("mail")
        .assert(Assertion::OpenTabCount(1))
        .run()
        .unwrap();
}
