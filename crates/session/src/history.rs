/// Browser history as seen by a comparison page.
pub trait History {
    /// Replaces the current entry's URL without navigating or reloading.
    fn replace_url(&mut self, url: &str);
}

/// Records every replaced URL. Used off-browser and in tests.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemoryHistory {
    entries: Vec<String>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

impl History for MemoryHistory {
    fn replace_url(&mut self, url: &str) {
        self.entries.push(url.to_string());
    }
}
