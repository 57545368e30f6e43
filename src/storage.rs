/// Per-tab lookup results in extension storage (`storage.local`)
use crate::error::HostError;
use crate::host::Host;
use crate::tab_data::LookupResult;

pub fn storage_key(tab_id: i32) -> String {
    format!("violations_{}", tab_id)
}

/// Latest `LookupResult` per tab.
///
/// Entries are overwritten on each lookup and never removed when a tab
/// closes.
pub struct TabResultStore<'h, H: ?Sized> {
    host: &'h H,
}

impl<'h, H: Host + ?Sized> TabResultStore<'h, H> {
    pub fn new(host: &'h H) -> Self {
        TabResultStore { host }
    }

    pub async fn put(&self, tab_id: i32, result: &LookupResult) -> Result<(), HostError> {
        let value = serde_json::to_value(result)?;
        self.host.store_put(&storage_key(tab_id), value).await
    }

    /// Stored result for the tab; unreadable entries count as absent
    pub async fn get(&self, tab_id: i32) -> Result<Option<LookupResult>, HostError> {
        let Some(value) = self.host.store_get(&storage_key(tab_id)).await? else {
            return Ok(None);
        };

        match serde_json::from_value(value) {
            Ok(result) => Ok(Some(result)),
            Err(e) => {
                log::warn!("Discarding unreadable result for tab {}: {}", tab_id, e);
                Ok(None)
            }
        }
    }
}
