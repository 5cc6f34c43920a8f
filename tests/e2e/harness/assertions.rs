use anyhow::Result;
use tablock_core::{LockCoordinator, RedbStore, SimulatedHost};

/// The coordinator under test.
pub type Coordinator = LockCoordinator<RedbStore, SimulatedHost>;

/// Declarative assertions on coordinator, browser and page state
pub enum Assertion {
    // Lock table
    PageLocked { alias: String, locked: bool },
    TabLocked { alias: String, locked: bool },
    NoRecord { alias: String },
    RecordCount(usize),
    AnchorUrl { alias: String, url: String },

    // Settings
    EffectivePolicy { alias: String, open_links_in_new_tab: bool },
    GlobalPolicy(bool),

    // Browser
    TabUrl { alias: String, url: String },
    OpenTabCount(usize),
    BadgeShown { alias: String, shown: bool },
    ForcedBack { alias: String, url: String },
    ReopenPending(usize),
    MenuInstalled,

    // Page agent
    AgentLocked { alias: String, locked: bool },
    OverlayShown { alias: String, shown: bool },
    LastClick(ClickMatch),

    // Popup
    PopupLabel { alias: String, label: String },

    // Custom
    Custom(Box<dyn Fn(&Coordinator) -> Result<()> + Send + Sync>),
}

impl std::fmt::Debug for Assertion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PageLocked { alias, locked } => {
                write!(f, "PageLocked {{ alias: {:?}, locked: {} }}", alias, locked)
            }
            Self::TabLocked { alias, locked } => {
                write!(f, "TabLocked {{ alias: {:?}, locked: {} }}", alias, locked)
            }
            Self::NoRecord { alias } => write!(f, "NoRecord {{ alias: {:?} }}", alias),
            Self::RecordCount(n) => write!(f, "RecordCount({})", n),
            Self::AnchorUrl { alias, url } => {
                write!(f, "AnchorUrl {{ alias: {:?}, url: {:?} }}", alias, url)
            }
            Self::EffectivePolicy {
                alias,
                open_links_in_new_tab,
            } => write!(
                f,
                "EffectivePolicy {{ alias: {:?}, open_links_in_new_tab: {} }}",
                alias, open_links_in_new_tab
            ),
            Self::GlobalPolicy(v) => write!(f, "GlobalPolicy({})", v),
            Self::TabUrl { alias, url } => {
                write!(f, "TabUrl {{ alias: {:?}, url: {:?} }}", alias, url)
            }
            Self::OpenTabCount(n) => write!(f, "OpenTabCount({})", n),
            Self::BadgeShown { alias, shown } => {
                write!(f, "BadgeShown {{ alias: {:?}, shown: {} }}", alias, shown)
            }
            Self::ForcedBack { alias, url } => {
                write!(f, "ForcedBack {{ alias: {:?}, url: {:?} }}", alias, url)
            }
            Self::ReopenPending(n) => write!(f, "ReopenPending({})", n),
            Self::MenuInstalled => write!(f, "MenuInstalled"),
            Self::AgentLocked { alias, locked } => {
                write!(f, "AgentLocked {{ alias: {:?}, locked: {} }}", alias, locked)
            }
            Self::OverlayShown { alias, shown } => {
                write!(f, "OverlayShown {{ alias: {:?}, shown: {} }}", alias, shown)
            }
            Self::LastClick(m) => write!(f, "LastClick({:?})", m),
            Self::PopupLabel { alias, label } => {
                write!(f, "PopupLabel {{ alias: {:?}, label: {:?} }}", alias, label)
            }
            Self::Custom(_) => write!(f, "Custom(<fn>)"),
        }
    }
}

/// Match against the decision for the last link click
#[derive(Clone, Debug)]
pub enum ClickMatch {
    Ignored,
    AllowedInPage,
    Absorbed,
    OpenedInNewTab(String),
}
