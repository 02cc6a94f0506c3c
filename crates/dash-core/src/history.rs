//! Paginated listening history.
use crate::constants::HISTORY_FIRST_PAGE;
use crate::error::FetchError;
use crate::status::Track;
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub track_guid: String,
    pub entry_id: String,
    pub detected_at: String,
    #[serde(default)]
    pub started_at: Option<String>,
    pub track: Track,
    pub saved_temp_buffer: bool,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct HistoryPage {
    pub data: Vec<HistoryEntry>,
    #[serde(default)]
    pub total_count: Option<u64>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub next_page: Option<u32>,
}

impl HistoryPage {
    pub fn from_json(text: &str) -> Result<HistoryPage, FetchError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Accumulates pages in order and tracks which one to ask for next.
#[derive(Clone, Debug)]
pub struct HistoryPager {
    entries: Vec<HistoryEntry>,
    next_page: Option<u32>,
    total_count: Option<u64>,
    pages_loaded: u32,
}

impl Default for HistoryPager {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryPager {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_page: Some(HISTORY_FIRST_PAGE),
            total_count: None,
            pages_loaded: 0,
        }
    }

    #[inline]
    pub fn has_next_page(&self) -> bool {
        self.next_page.is_some()
    }

    pub fn next_page(&self) -> Option<u32> {
        self.next_page
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn total_count(&self) -> Option<u64> {
        self.total_count
    }

    pub fn pages_loaded(&self) -> u32 {
        self.pages_loaded
    }

    /// `"{base}?page=N"` for the next page, if any remain.
    pub fn next_request_path(&self, base: &str) -> Option<String> {
        self.next_page.map(|p| format!("{}?page={}", base, p))
    }

    /// Append a fetched page. A page other than the one requested (a late
    /// duplicate) is dropped. Returns the number of entries appended.
    pub fn apply_page(&mut self, page: HistoryPage) -> Result<usize, FetchError> {
        let Some(expected) = self.next_page else {
            return Err(FetchError::Exhausted);
        };
        if let Some(got) = page.page {
            if got != expected {
                log::warn!("[scroll] dropping history page {} (expected {})", got, expected);
                return Ok(0);
            }
        }
        let added = page.data.len();
        self.entries.extend(page.data);
        self.next_page = page.next_page;
        if page.total_count.is_some() {
            self.total_count = page.total_count;
        }
        self.pages_loaded += 1;
        Ok(added)
    }
}
