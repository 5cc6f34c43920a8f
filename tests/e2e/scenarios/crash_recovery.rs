use crate::harness::{Assertion, Scenario};

const MAIL: &str = "https://mail.example.com/inbox";
const DOCS: &str = "https://docs.example.com/guide";

#[test]
fn test_locks_survive_restart() {
    Scenario::new("locks_survive_restart")
        .open_tab("mail", MAIL)
        .open_tab("docs", DOCS)
        .popup_locks_both("mail")
        .popup_toggles_page_lock("docs")
        .popup_sets_override("docs", Some(false))
        .crash()
        .restart()
        .assert_locks("mail", true, true)
        .assert_locks("docs", true, false)
        .assert_anchor("docs", DOCS)
        .assert_policy("docs", false)
        .assert_record_count(2)
        .run()
        .unwrap();
}

#[test]
fn test_global_policy_survives_restart() {
    Scenario::new("global_policy_survives_restart")
        .open_tab("mail", MAIL)
        .popup_sets_global(false)
        .crash()
        .restart()
        .assert(Assertion::GlobalPolicy(false))
        .assert_policy("mail", false)
        .run()
        .unwrap();
}

#[test]
fn test_enforcement_resumes_after_restart() {
    Scenario::new("enforcement_resumes_after_restart")
        .open_tab("docs", DOCS)
        .popup_toggles_page_lock("docs")
        .crash()
        .restart()
        .navigate("docs", "https://news.example.com/")
        .assert_tab_url("docs", DOCS)
        .assert_agent_locked("docs", true)
        .run()
        .unwrap();
}

#[test]
fn test_reopened_identity_survives_restart() {
    Scenario::new("reopened_identity_survives_restart")
        .open_tab("mail", MAIL)
        .open_tab("docs", DOCS)
        .popup_toggles_tab_lock("mail")
        .close_tab("mail")
        .crash()
        .restart()
        .assert_locks("mail", false, true)
        .close_tab("mail")
        .assert_tab_url("mail", MAIL)
        .assert_locks("mail", false, true)
        .assert(Assertion::OpenTabCount(2))
        .run()
        .unwrap();
}

#[test]
fn test_unlock_survives_restart() {
    Scenario::new("unlock_survives_restart")
        .open_tab("mail", MAIL)
        .popup_locks_both("mail")
        .popup_unlocks_all("mail")
        .crash()
        .restart()
        .assert_unlocked("mail")
        .assert_record_count(0)
        .run()
        .unwrap();
}

#[test]
fn test_restart_requires_crash() {
    let result = Scenario::new("restart_requires_crash")
        .open_tab("mail", MAIL)
        .restart()
        .run();
    assert!(!result.success);
    assert_eq!(result.failure_step, Some(1));
}
