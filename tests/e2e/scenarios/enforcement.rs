use crate::harness::{ClickMatch, Scenario};

const WIKI: &str = "https://wiki.example.com/Rust";

#[test]
fn test_unlocked_page_leaves_clicks_alone() {
    Scenario::new("unlocked_page_leaves_clicks_alone")
        .open_tab("wiki", WIKI)
        .assert_agent_locked("wiki", false)
        .assert_overlay("wiki", false)
        .click_link("wiki", "https://elsewhere.example.org/")
        .assert_last_click(ClickMatch::Ignored)
        .run()
        .unwrap();
}

#[test]
fn test_locked_page_keeps_in_page_links() {
    Scenario::new("locked_page_keeps_in_page_links")
        .open_tab("wiki", WIKI)
        .popup_toggles_page_lock("wiki")
        .click_link("wiki", "#History")
        .assert_last_click(ClickMatch::AllowedInPage)
        .click_link("wiki", "javascript:void(0)")
        .assert_last_click(ClickMatch::AllowedInPage)
        .run()
        .unwrap();
}

#[test]
fn test_locked_page_opens_links_in_new_tab() {
    Scenario::new("locked_page_opens_links_in_new_tab")
        .open_tab("wiki", WIKI)
        .popup_toggles_page_lock("wiki")
        .click_link("wiki", "Cargo")
        .assert_last_click(ClickMatch::OpenedInNewTab(
            "https://wiki.example.com/Cargo".into(),
        ))
        .run()
        .unwrap();
}

#[test]
fn test_locked_page_absorbs_links_when_policy_off() {
    Scenario::new("locked_page_absorbs_links_when_policy_off")
        .open_tab("wiki", WIKI)
        .popup_toggles_page_lock("wiki")
        .popup_sets_override("wiki", Some(false))
        .click_link("wiki", "https://elsewhere.example.org/")
        .assert_last_click(ClickMatch::Absorbed)
        .click_link("wiki", "#Syntax")
        .assert_last_click(ClickMatch::AllowedInPage)
        .run()
        .unwrap();
}

#[test]
fn test_overlay_click_unlocks_everything() {
    Scenario::new("overlay_click_unlocks_everything")
        .open_tab("wiki", WIKI)
        .popup_locks_both("wiki")
        .assert_overlay("wiki", true)
        .click_overlay("wiki")
        .assert_unlocked("wiki")
        .assert_agent_locked("wiki", false)
        .assert_overlay("wiki", false)
        .assert_badge("wiki", false)
        .navigate("wiki", "https://elsewhere.example.org/")
        .assert_tab_url("wiki", "https://elsewhere.example.org/")
        .run()
        .unwrap();
}

#[test]
fn test_dismissed_overlay_keeps_lock() {
    Scenario::new("dismissed_overlay_keeps_lock")
        .open_tab("wiki", WIKI)
        .popup_toggles_page_lock("wiki")
        .dismiss_overlay("wiki")
        .assert_overlay("wiki", false)
        .assert_agent_locked("wiki", true)
        .assert_locks("wiki", true, false)
        .click_link("wiki", "Cargo")
        .assert_last_click(ClickMatch::OpenedInNewTab(
            "https://wiki.example.com/Cargo".into(),
        ))
        .run()
        .unwrap();
}

#[test]
fn test_overlay_click_needs_an_overlay() {
    let result = Scenario::new("overlay_click_needs_an_overlay")
        .open_tab("wiki", WIKI)
        .click_overlay("wiki")
        .run();
    assert!(!result.success);
    assert_eq!(result.failure_step, Some(1));
}
