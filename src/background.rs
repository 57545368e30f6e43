/// Background task: check each page the user lands on and badge the tab
use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;

use crate::badge::{self, BadgeOutcome};
use crate::config::Config;
use crate::domain::extract_company_name;
use crate::host::{Host, TabChange, TabEvents};
use crate::lookup::{LookupClient, SearchTransport};
use crate::storage::TabResultStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// No company could be derived from the URL; nothing was touched
    Skipped,
    Checked(BadgeOutcome),
}

/// Look up the company behind `url` and record the outcome for the tab.
///
/// Badge and storage are updated independently from the same lookup
/// value; a failure of one is logged and does not stop the other. A failed
/// lookup leaves any previously stored result in place.
pub async fn check_tab<H, T>(host: &H, client: &LookupClient<T>, tab_id: i32, url: &str) -> CheckOutcome
where
    H: Host + ?Sized,
    T: SearchTransport,
{
    let Some(company_name) = extract_company_name(url) else {
        log::debug!("No company name in {}, skipping tab {}", url, tab_id);
        return CheckOutcome::Skipped;
    };

    let lookup = client.lookup(&company_name).await;
    match &lookup {
        Ok(result) => log::info!(
            "Tab {}: {} article(s) about {}",
            tab_id,
            result.entries.len(),
            company_name
        ),
        Err(e) => log::error!("Error checking Consumer Rights for {}: {}", company_name, e),
    }

    let outcome = BadgeOutcome::from_lookup(&lookup);
    if let Err(e) = badge::present(host, tab_id, outcome).await {
        log::warn!("Could not set badge on tab {}: {}", tab_id, e);
    }

    if let Ok(result) = &lookup {
        if let Err(e) = TabResultStore::new(host).put(tab_id, result).await {
            log::warn!("Could not store result for tab {}: {}", tab_id, e);
        }
    }

    CheckOutcome::Checked(outcome)
}

/// `tabs.onUpdated`: only fully loaded pages with a URL are checked
pub async fn on_tab_updated<H, T>(
    host: &H,
    client: &LookupClient<T>,
    tab_id: i32,
    change: &TabChange,
) -> CheckOutcome
where
    H: Host + ?Sized,
    T: SearchTransport,
{
    match change.completed_url() {
        Some(url) => check_tab(host, client, tab_id, url).await,
        None => CheckOutcome::Skipped,
    }
}

/// `tabs.onActivated`: resolve the tab's URL, then check it
pub async fn on_tab_activated<H, T>(host: &H, client: &LookupClient<T>, tab_id: i32) -> CheckOutcome
where
    H: Host + ?Sized,
    T: SearchTransport,
{
    match host.tab_url(tab_id).await {
        Ok(Some(url)) => check_tab(host, client, tab_id, &url).await,
        Ok(None) => CheckOutcome::Skipped,
        Err(e) => {
            log::warn!("Could not resolve tab {}: {}", tab_id, e);
            CheckOutcome::Skipped
        }
    }
}

/// Register the tab listeners. Must run synchronously at startup so the
/// browser can wake the background context for queued events.
pub fn install<H: Host + TabEvents + 'static>(host: Rc<H>) {
    let updated_host = Rc::clone(&host);
    host.on_tab_updated(Box::new(move |tab_id, change| {
        if change.completed_url().is_none() {
            return;
        }
        let host = Rc::clone(&updated_host);
        spawn_local(async move {
            let client = LookupClient::with_fetch(Config::load(&*host).await);
            on_tab_updated(&*host, &client, tab_id, &change).await;
        });
    }));

    let activated_host = Rc::clone(&host);
    host.on_tab_activated(Box::new(move |tab_id| {
        let host = Rc::clone(&activated_host);
        spawn_local(async move {
            let client = LookupClient::with_fetch(Config::load(&*host).await);
            on_tab_activated(&*host, &client, tab_id).await;
        });
    }));

    log::info!("Consumer Rights Check background listeners installed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::badge::Badge;
    use crate::error::LookupError;
    use crate::host::memory::MemoryHost;
    use crate::lookup::tests::{ScriptedTransport, hits_body};
    use crate::storage::storage_key;
    use futures::executor::block_on;

    fn client(transport: ScriptedTransport) -> LookupClient<ScriptedTransport> {
        LookupClient::new(Config::default(), transport)
    }

    fn complete(url: &str) -> TabChange {
        TabChange {
            status: Some("complete".to_string()),
            url: Some(url.to_string()),
        }
    }

    #[test]
    fn test_check_tab_with_findings() {
        let host = MemoryHost::new();
        let client = client(ScriptedTransport::body(&hits_body(&["Acme Anvils", "Acme Rockets", "Acme Cloud"])));

        let outcome = block_on(check_tab(&host, &client, 1, "https://www.acme.com"));

        assert_eq!(outcome, CheckOutcome::Checked(BadgeOutcome::Findings(3)));
        assert_eq!(host.badge(1), Some(Badge::new("3", "#ff0000")));
        let stored = block_on(TabResultStore::new(&host).get(1)).unwrap().unwrap();
        assert_eq!(stored.company_name, "acme");
        let titles: Vec<&str> = stored.entries.iter().map(|f| f.title.as_str()).collect();
        assert_eq!(titles, vec!["Acme Anvils", "Acme Rockets", "Acme Cloud"]);
    }

    #[test]
    fn test_check_tab_clean() {
        let host = MemoryHost::new();
        let client = client(ScriptedTransport::body(r#"{"batchcomplete":"","query":{"search":[]}}"#));

        let outcome = block_on(check_tab(&host, &client, 2, "https://globex.example"));

        assert_eq!(outcome, CheckOutcome::Checked(BadgeOutcome::Clean));
        assert_eq!(host.badge(2), Some(Badge::new("✓", "#008000")));
        let stored = block_on(TabResultStore::new(&host).get(2)).unwrap().unwrap();
        assert!(stored.entries.is_empty());
    }

    #[test]
    fn test_check_tab_network_failure_keeps_previous_result() {
        let host = MemoryHost::new();
        let ok = client(ScriptedTransport::body(&hits_body(&["Acme"])));
        block_on(check_tab(&host, &ok, 3, "https://acme.com"));

        let failing = client(ScriptedTransport::failing(LookupError::Network("Failed to fetch".to_string())));
        let outcome = block_on(check_tab(&host, &failing, 3, "https://acme.com"));

        assert_eq!(outcome, CheckOutcome::Checked(BadgeOutcome::Error));
        assert_eq!(host.badge(3), Some(Badge::new("?", "#808080")));
        assert_eq!(host.puts(), 1);
        let stored = block_on(TabResultStore::new(&host).get(3)).unwrap().unwrap();
        assert_eq!(stored.entries.len(), 1);
    }

    #[test]
    fn test_check_tab_invalid_json_is_error_not_clean() {
        let host = MemoryHost::new();
        let client = client(ScriptedTransport::body("<!DOCTYPE html><html></html>"));

        let outcome = block_on(check_tab(&host, &client, 4, "https://acme.com"));

        assert_eq!(outcome, CheckOutcome::Checked(BadgeOutcome::Error));
        assert_eq!(host.raw(&storage_key(4)), None);
    }

    #[test]
    fn test_check_tab_unparsable_url_is_skipped() {
        let host = MemoryHost::new();
        let client = client(ScriptedTransport::body(&hits_body(&["Acme"])));

        let outcome = block_on(check_tab(&host, &client, 5, "not a url"));

        assert_eq!(outcome, CheckOutcome::Skipped);
        assert_eq!(host.badge(5), None);
        assert_eq!(host.puts(), 0);
        assert!(client_requests(&client).is_empty());
    }

    #[test]
    fn test_badge_failure_still_stores() {
        let host = MemoryHost::new();
        host.fail_badge(true);
        let client = client(ScriptedTransport::body(&hits_body(&["Acme"])));

        block_on(check_tab(&host, &client, 6, "https://acme.com"));

        assert_eq!(host.puts(), 1);
    }

    #[test]
    fn test_storage_failure_still_badges() {
        let host = MemoryHost::new();
        host.fail_storage(true);
        let client = client(ScriptedTransport::body(&hits_body(&["Acme", "Acme 2"])));

        let outcome = block_on(check_tab(&host, &client, 7, "https://acme.com"));

        assert_eq!(outcome, CheckOutcome::Checked(BadgeOutcome::Findings(2)));
        assert_eq!(host.badge(7), Some(Badge::new("2", "#ff0000")));
    }

    #[test]
    fn test_on_tab_updated_waits_for_complete() {
        let host = MemoryHost::new();
        let client = client(ScriptedTransport::body(&hits_body(&["Acme"])));
        let loading = TabChange {
            status: Some("loading".to_string()),
            url: Some("https://acme.com".to_string()),
        };

        assert_eq!(block_on(on_tab_updated(&host, &client, 8, &loading)), CheckOutcome::Skipped);
        assert_eq!(
            block_on(on_tab_updated(&host, &client, 8, &complete("https://acme.com"))),
            CheckOutcome::Checked(BadgeOutcome::Findings(1))
        );
        assert_eq!(client_requests(&client).len(), 1);
    }

    #[test]
    fn test_on_tab_activated_resolves_url() {
        let host = MemoryHost::new();
        host.open_tab(9, Some("https://www.acme.com/shop"));
        host.open_tab(10, None);
        let client = client(ScriptedTransport::body(&hits_body(&["Acme"])));

        assert_eq!(
            block_on(on_tab_activated(&host, &client, 9)),
            CheckOutcome::Checked(BadgeOutcome::Findings(1))
        );
        assert_eq!(block_on(on_tab_activated(&host, &client, 10)), CheckOutcome::Skipped);
        assert_eq!(block_on(on_tab_activated(&host, &client, 11)), CheckOutcome::Skipped);
        assert!(client_requests(&client)[0].contains("srsearch=acme&"));
    }

    fn client_requests(client: &LookupClient<ScriptedTransport>) -> Vec<String> {
        client.transport().requests.borrow().clone()
    }
}
