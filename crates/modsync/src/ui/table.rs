use modsync_sync::{FailedMod, FailedRemoval};
use tabled::settings::{Panel, Style};
use tabled::{Table, Tabled};

#[derive(Debug, Clone, Default)]
pub struct Formatter {
    pub header: Option<String>,
}

impl Formatter {
    pub fn build<T: Tabled, I: IntoIterator<Item = T>>(self, data: I) -> Table {
        let mut table = Table::new(data);
        if let Some(header) = self.header {
            table.with(Panel::header(header));
        }

        table.with(Style::blank());
        table
    }
}

#[derive(Debug, Clone, Tabled)]
pub struct FailedRow {
    #[tabled(rename = "Mod")]
    pub name:   String,
    #[tabled(rename = "URL")]
    pub url:    String,
    #[tabled(rename = "Reason")]
    pub reason: String,
}

impl From<&FailedMod> for FailedRow {
    fn from(failed: &FailedMod) -> Self {
        Self {
            name:   failed.catalog_mod.to_string(),
            url:    failed.url.clone(),
            reason: failed.reason.clone(),
        }
    }
}

#[derive(Debug, Clone, Tabled)]
pub struct RemovalRow {
    #[tabled(rename = "Path")]
    pub path:   String,
    #[tabled(rename = "Reason")]
    pub reason: String,
}

impl From<&FailedRemoval> for RemovalRow {
    fn from(failed: &FailedRemoval) -> Self {
        Self {
            path:   failed.path.display().to_string(),
            reason: failed.reason.clone(),
        }
    }
}
