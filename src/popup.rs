/// Popup flow: find the active tab's result (or fetch it) and describe what to show
use crate::domain::extract_company_name;
use crate::host::Host;
use crate::lookup::{LookupClient, SearchTransport};
use crate::storage::TabResultStore;
use crate::tab_data::{Finding, LookupResult};

#[derive(Debug, Clone, PartialEq)]
pub enum PopupState {
    Idle,
    Loading,
    Results(LookupResult),
    /// The fallback lookup failed; nothing is known about the company
    LookupFailed,
    Error(PopupError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupError {
    NoUrl,
    LoadFailed,
}

impl PopupError {
    pub fn message(self) -> &'static str {
        match self {
            PopupError::NoUrl => "No URL available",
            PopupError::LoadFailed => "Error while loading data",
        }
    }
}

/// What the popup ends up showing for the active tab
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub company_name: Option<String>,
    pub state: PopupState,
}

impl Resolved {
    fn error(company_name: Option<String>, error: PopupError) -> Self {
        Resolved {
            company_name,
            state: PopupState::Error(error),
        }
    }
}

/// Resolve the active tab into a terminal popup state.
///
/// A stored result for the tab wins; otherwise the lookup runs once here.
pub async fn resolve<H, T>(host: &H, client: &LookupClient<T>) -> Resolved
where
    H: Host + ?Sized,
    T: SearchTransport,
{
    let tab = match host.active_tab().await {
        Ok(Some(tab)) => tab,
        Ok(None) => return Resolved::error(None, PopupError::NoUrl),
        Err(e) => {
            log::error!("Popup error: {}", e);
            return Resolved::error(None, PopupError::LoadFailed);
        }
    };

    let Some(url) = tab.url.as_deref().filter(|url| !url.is_empty()) else {
        return Resolved::error(None, PopupError::NoUrl);
    };

    let Some(company_name) = extract_company_name(url) else {
        return Resolved::error(None, PopupError::LoadFailed);
    };

    match TabResultStore::new(host).get(tab.id).await {
        Ok(Some(result)) => {
            return Resolved {
                company_name: Some(company_name),
                state: PopupState::Results(result),
            };
        }
        Ok(None) => log::debug!("No stored result for tab {}, querying directly", tab.id),
        Err(e) => log::warn!("Could not read stored result for tab {}: {}", tab.id, e),
    }

    let state = match client.lookup(&company_name).await {
        Ok(result) => PopupState::Results(result),
        Err(e) => {
            log::error!("API error: {}", e);
            PopupState::LookupFailed
        }
    };

    Resolved {
        company_name: Some(company_name),
        state,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Loading,
    Warning,
    /// The wiki could not be reached
    Offline,
    Clean,
}

impl Tone {
    pub fn class(self) -> &'static str {
        match self {
            Tone::Loading => "status loading",
            Tone::Warning => "status violations",
            Tone::Offline => "status loading",
            Tone::Clean => "status clean",
        }
    }
}

/// Plain-text description of the popup. All strings are rendered as text,
/// never as markup.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupView {
    pub subtitle: String,
    pub tone: Tone,
    pub message: String,
    pub findings: Vec<Finding>,
    pub show_list: bool,
}

impl PopupView {
    pub fn new(company_name: Option<&str>, state: &PopupState) -> PopupView {
        let subtitle = company_name.unwrap_or("Unknown company").to_string();

        let (tone, message, findings) = match state {
            PopupState::Idle | PopupState::Loading => (Tone::Loading, "Checking...".to_string(), Vec::new()),
            PopupState::Results(result) if result.is_clean() => (
                Tone::Clean,
                format!("✅ No articles about \"{}\" found", result.company_name),
                Vec::new(),
            ),
            PopupState::Results(result) => {
                let count = result.entries.len();
                let plural = if count > 1 { "s" } else { "" };
                (
                    Tone::Warning,
                    format!("⚠️ {} article{} about \"{}\" found", count, plural, result.company_name),
                    result.entries.clone(),
                )
            }
            PopupState::LookupFailed => (Tone::Offline, "⚠️ No connection to API".to_string(), Vec::new()),
            PopupState::Error(error) => (Tone::Warning, format!("❌ {}", error.message()), Vec::new()),
        };

        PopupView {
            subtitle,
            tone,
            message,
            show_list: !findings.is_empty(),
            findings,
        }
    }
}
