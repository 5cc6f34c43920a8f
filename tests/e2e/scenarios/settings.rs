use crate::harness::{Assertion, ClickMatch, Scenario};

const BLOG: &str = "https://blog.example.com/posts/1";

#[test]
fn test_new_tabs_inherit_global_policy() {
    Scenario::new("new_tabs_inherit_global_policy")
        .open_tab("blog", BLOG)
        .assert(Assertion::GlobalPolicy(true))
        .assert_policy("blog", true)
        .popup_sets_global(false)
        .assert(Assertion::GlobalPolicy(false))
        .assert_policy("blog", false)
        .run()
        .unwrap();
}

#[test]
fn test_config_sets_initial_global_policy() {
    Scenario::new("config_sets_initial_global_policy")
        .with_config("[defaults]\nopen_links_in_new_tab = false\n")
        .open_tab("blog", BLOG)
        .assert(Assertion::GlobalPolicy(false))
        .assert_policy("blog", false)
        .run()
        .unwrap();
}

#[test]
fn test_tab_override_beats_global() {
    Scenario::new("tab_override_beats_global")
        .open_tab("blog", BLOG)
        .open_tab("shop", "https://shop.example.com/")
        .popup_sets_override("blog", Some(false))
        .assert_policy("blog", false)
        .assert_policy("shop", true)
        .popup_sets_global(false)
        .popup_sets_override("shop", Some(true))
        .assert_policy("blog", false)
        .assert_policy("shop", true)
        .popup_sets_override("shop", None)
        .assert_policy("shop", false)
        .run()
        .unwrap();
}

#[test]
fn test_global_change_reaches_open_pages() {
    Scenario::new("global_change_reaches_open_pages")
        .open_tab("blog", BLOG)
        .popup_toggles_page_lock("blog")
        .popup_sets_global(false)
        .click_link("blog", "https://elsewhere.example.org/")
        .assert_last_click(ClickMatch::Absorbed)
        .popup_sets_global(true)
        .click_link("blog", "https://elsewhere.example.org/")
        .assert_last_click(ClickMatch::OpenedInNewTab(
            "https://elsewhere.example.org/".into(),
        ))
        .run()
        .unwrap();
}

#[test]
fn test_override_change_reaches_its_page() {
    Scenario::new("override_change_reaches_its_page")
        .open_tab("blog", BLOG)
        .popup_toggles_page_lock("blog")
        .popup_sets_override("blog", Some(false))
        .click_link("blog", "/posts/2")
        .assert_last_click(ClickMatch::Absorbed)
        .popup_sets_override("blog", None)
        .click_link("blog", "/posts/2")
        .assert_last_click(ClickMatch::OpenedInNewTab(
            "https://blog.example.com/posts/2".into(),
        ))
        .run()
        .unwrap();
}
