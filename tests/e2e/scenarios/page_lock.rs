use crate::harness::{Assertion, Scenario};
use tablock_core::{BrowserHost, BOTH_LOCKED_LABEL, LOCK_BOTH_LABEL};

const GUIDE: &str = "https://docs.example.com/guide";

#[test]
fn test_page_lock_sends_tab_back() {
    Scenario::new("page_lock_sends_tab_back")
        .open_tab("docs", GUIDE)
        .popup_toggles_page_lock("docs")
        .assert_locks("docs", true, false)
        .assert_anchor("docs", GUIDE)
        .assert_badge("docs", true)
        .navigate("docs", "https://news.example.com/")
        .assert(Assertion::ForcedBack {
            alias: "docs".into(),
            url: GUIDE.into(),
        })
        .assert_tab_url("docs", GUIDE)
        .run()
        .unwrap();
}

#[test]
fn test_page_lock_allows_fragment_changes() {
    Scenario::new("page_lock_allows_fragment_changes")
        .open_tab("docs", GUIDE)
        .popup_toggles_page_lock("docs")
        .navigate("docs", "https://docs.example.com/guide#install")
        .assert_tab_url("docs", "https://docs.example.com/guide#install")
        .assert_anchor("docs", GUIDE)
        .assert_agent_locked("docs", true)
        .assert(Assertion::Custom(Box::new(|c| {
            anyhow::ensure!(c.host().navigations().is_empty(), "tab was forced back");
            Ok(())
        })))
        .run()
        .unwrap();
}

#[test]
fn test_page_lock_blocks_query_changes() {
    Scenario::new("page_lock_blocks_query_changes")
        .open_tab("docs", GUIDE)
        .popup_toggles_page_lock("docs")
        .navigate("docs", "https://docs.example.com/guide?page=2")
        .assert_tab_url("docs", GUIDE)
        .run()
        .unwrap();
}

#[test]
fn test_page_lock_ignores_sub_frames() {
    Scenario::new("page_lock_ignores_sub_frames")
        .open_tab("docs", GUIDE)
        .popup_toggles_page_lock("docs")
        .frame_navigate("docs", "https://ads.example.net/frame", 4)
        .assert_tab_url("docs", GUIDE)
        .assert(Assertion::Custom(Box::new(|c| {
            anyhow::ensure!(c.host().navigations().is_empty(), "sub-frame was blocked");
            Ok(())
        })))
        .run()
        .unwrap();
}

#[test]
fn test_toggle_twice_leaves_no_record() {
    Scenario::new("toggle_twice_leaves_no_record")
        .open_tab("docs", GUIDE)
        .popup_toggles_page_lock("docs")
        .popup_toggles_page_lock("docs")
        .assert_unlocked("docs")
        .assert_badge("docs", false)
        .assert_agent_locked("docs", false)
        .assert_overlay("docs", false)
        .navigate("docs", "https://news.example.com/")
        .assert_tab_url("docs", "https://news.example.com/")
        .run()
        .unwrap();
}

#[test]
fn test_locks_are_per_tab() {
    Scenario::new("locks_are_per_tab")
        .open_tab("docs", GUIDE)
        .open_tab("news", "https://news.example.com/")
        .popup_toggles_page_lock("docs")
        .assert_locks("docs", true, false)
        .assert_unlocked("news")
        .assert_agent_locked("news", false)
        .navigate("news", "https://news.example.com/world")
        .assert_tab_url("news", "https://news.example.com/world")
        .assert_record_count(1)
        .run()
        .unwrap();
}

#[test]
fn test_context_menu_drives_locks() {
    Scenario::new("context_menu_drives_locks")
        .install()
        .assert(Assertion::MenuInstalled)
        .open_tab("docs", GUIDE)
        .menu_click("docs", "togglePageLock")
        .menu_click("docs", "toggleTabLock")
        .assert_locks("docs", true, true)
        .assert_agent_locked("docs", true)
        .menu_click("docs", "separator")
        .assert_locks("docs", true, true)
        .menu_click("docs", "unlockAll")
        .assert_unlocked("docs")
        .assert_agent_locked("docs", false)
        .run()
        .unwrap();
}

#[test]
fn test_lock_both_toggles_as_a_pair() {
    Scenario::new("lock_both_toggles_as_a_pair")
        .open_tab("docs", GUIDE)
        .assert(Assertion::PopupLabel {
            alias: "docs".into(),
            label: LOCK_BOTH_LABEL.into(),
        })
        .popup_locks_both("docs")
        .assert_locks("docs", true, true)
        .assert(Assertion::PopupLabel {
            alias: "docs".into(),
            label: BOTH_LOCKED_LABEL.into(),
        })
        .popup_locks_both("docs")
        .assert_unlocked("docs")
        .assert_badge("docs", false)
        .run()
        .unwrap();
}

#[test]
fn test_lock_both_reanchors_tab_lock() {
    Scenario::new("lock_both_reanchors_tab_lock")
        .open_tab("docs", GUIDE)
        .popup_toggles_tab_lock("docs")
        .navigate("docs", "https://docs.example.com/api")
        .assert_anchor("docs", "https://docs.example.com/api")
        .popup_locks_both("docs")
        .assert_anchor("docs", "https://docs.example.com/api")
        .navigate("docs", GUIDE)
        .assert_tab_url("docs", "https://docs.example.com/api")
        .run()
        .unwrap();
}

#[test]
fn test_unlock_all_clears_override() {
    Scenario::new("unlock_all_clears_override")
        .open_tab("docs", GUIDE)
        .popup_toggles_page_lock("docs")
        .popup_sets_override("docs", Some(false))
        .assert_policy("docs", false)
        .popup_unlocks_all("docs")
        .assert_unlocked("docs")
        .assert_policy("docs", true)
        .run()
        .unwrap();
}
