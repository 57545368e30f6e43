/// Toolbar badge for a tab: article count, clean checkmark, or error marker
use crate::error::{HostError, LookupError};
use crate::host::Host;
use crate::tab_data::LookupResult;

const ALERT_COLOR: &str = "#ff0000";
const CLEAN_COLOR: &str = "#008000";
const NEUTRAL_COLOR: &str = "#808080";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeOutcome {
    Findings(usize),
    Clean,
    Error,
}

impl BadgeOutcome {
    pub fn from_lookup(lookup: &Result<LookupResult, LookupError>) -> Self {
        match lookup {
            Ok(result) if result.is_clean() => BadgeOutcome::Clean,
            Ok(result) => BadgeOutcome::Findings(result.entries.len()),
            Err(_) => BadgeOutcome::Error,
        }
    }

    pub fn badge(self) -> Badge {
        match self {
            BadgeOutcome::Findings(0) | BadgeOutcome::Clean => Badge::new("✓", CLEAN_COLOR),
            BadgeOutcome::Findings(count) => Badge::new(&count.to_string(), ALERT_COLOR),
            BadgeOutcome::Error => Badge::new("?", NEUTRAL_COLOR),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub text: String,
    pub color: String,
}

impl Badge {
    pub fn new(text: &str, color: &str) -> Badge {
        Badge {
            text: text.to_string(),
            color: color.to_string(),
        }
    }
}

/// Replace whatever badge the tab shows with the one for `outcome`
pub async fn present<H: Host + ?Sized>(
    host: &H,
    tab_id: i32,
    outcome: BadgeOutcome,
) -> Result<(), HostError> {
    host.set_badge(tab_id, &outcome.badge()).await
}
