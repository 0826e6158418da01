use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Every trusted download URL lives under this origin.
pub const TRUSTED_ORIGIN: &str = "https://gamebanana.com/";

/// Download URLs carry the numeric file id right after this prefix.
pub const DOWNLOAD_PREFIX: &str = "https://gamebanana.com/dl/";

/// Stable identifier of a downloadable file, parsed from its URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(pub i64);

impl FileId {
    /// Sentinel for URLs outside the trusted download prefix.
    pub const UNTRUSTED: FileId = FileId(-1);

    pub fn is_trusted(self) -> bool { self != Self::UNTRUSTED }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

/// Catalog APIs send `null` for absent strings and arrays.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One downloadable payload of a mod.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ModFile {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,

    #[serde(rename = "URL", default, deserialize_with = "nullable")]
    pub url: String,

    /// Declared size in bytes.
    #[serde(default)]
    pub size: Option<u64>,

    /// Unix timestamp (seconds).
    #[serde(default)]
    pub created_date: Option<i64>,

    /// Whether the archive ships the loader manifest.
    #[serde(default)]
    pub has_everest_yaml: Option<bool>,

    #[serde(default)]
    pub downloads: Option<i64>,

    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
}

impl ModFile {
    pub fn file_id(&self) -> FileId {
        self.url
            .strip_prefix(DOWNLOAD_PREFIX)
            .and_then(|rest| rest.parse::<i64>().ok())
            .map_or(FileId::UNTRUSTED, FileId)
    }

    pub fn is_url_trusted(&self) -> bool { self.url.starts_with(TRUSTED_ORIGIN) }

    pub fn has_manifest(&self) -> bool { self.has_everest_yaml.unwrap_or(false) }

    pub fn created_at(&self) -> i64 { self.created_date.unwrap_or(0) }

    /// URL of the plain-text listing of the entries inside this archive.
    pub fn listing_url(&self) -> Option<String> {
        let id = self.file_id();
        id.is_trusted()
            .then(|| format!("https://gamebanana.com/apiv11/File/{id}/RawFileList"))
    }
}

/// A catalog entry with its candidate files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Mod {
    #[serde(rename = "GameBananaId", default)]
    pub id: Option<i64>,

    #[serde(default, deserialize_with = "nullable")]
    pub name: String,

    #[serde(default)]
    pub category_id: Option<i64>,

    #[serde(default, deserialize_with = "nullable")]
    pub category_name: String,

    #[serde(rename = "GameBananaType", default, deserialize_with = "nullable")]
    pub item_type: String,

    #[serde(default, deserialize_with = "nullable")]
    pub author: String,

    #[serde(default, deserialize_with = "nullable")]
    pub description: String,

    #[serde(default, deserialize_with = "nullable")]
    pub text: String,

    #[serde(rename = "PageURL", default, deserialize_with = "nullable")]
    pub page_url: String,

    #[serde(default, deserialize_with = "nullable")]
    pub tokenized_name: Vec<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub screenshots: Vec<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub mirrored_screenshots: Vec<String>,

    #[serde(default)]
    pub views: Option<i64>,

    #[serde(default)]
    pub likes: Option<i64>,

    #[serde(default)]
    pub downloads: Option<i64>,

    #[serde(default)]
    pub created_date: Option<i64>,

    #[serde(default)]
    pub updated_date: Option<i64>,

    #[serde(default)]
    pub modified_date: Option<i64>,

    #[serde(default, deserialize_with = "nullable")]
    pub files: Vec<ModFile>,
}

impl Mod {
    /// Catalog id, with -1 standing in for a missing one.
    pub fn id_or_sentinel(&self) -> i64 { self.id.unwrap_or(-1) }
}

impl fmt::Display for Mod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "{} [{}]", self.name, id),
            None => write!(f, "{} [?]", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(url: &str) -> ModFile {
        ModFile {
            url: url.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn file_id_parses_download_prefix() {
        assert_eq!(file("https://gamebanana.com/dl/484937").file_id(), FileId(484937));
    }

    #[test]
    fn file_id_is_untrusted_for_foreign_or_malformed_urls() {
        assert_eq!(file("https://example.com/dl/1").file_id(), FileId::UNTRUSTED);
        assert_eq!(file("https://gamebanana.com/mods/1").file_id(), FileId::UNTRUSTED);
        assert_eq!(file("https://gamebanana.com/dl/12abc").file_id(), FileId::UNTRUSTED);
        assert_eq!(file("http://gamebanana.com/dl/1").file_id(), FileId::UNTRUSTED);
    }

    #[test]
    fn listing_url_only_for_trusted_ids() {
        assert_eq!(
            file("https://gamebanana.com/dl/7").listing_url().as_deref(),
            Some("https://gamebanana.com/apiv11/File/7/RawFileList")
        );
        assert_eq!(file("https://example.com/x.zip").listing_url(), None);
    }

    #[test]
    fn deserializes_catalog_record_with_nulls() {
        let json = r#"{
            "GameBananaId": 150813,
            "Name": "Helper",
            "CategoryId": 5081,
            "Author": null,
            "PageURL": "https://gamebanana.com/mods/150813",
            "Screenshots": null,
            "Files": [{
                "Name": "helper.zip",
                "URL": "https://gamebanana.com/dl/484937",
                "Size": 1024,
                "CreatedDate": 1700000000,
                "HasEverestYaml": true,
                "Description": null
            }]
        }"#;
        let m: Mod = serde_json::from_str(json).unwrap();
        assert_eq!(m.id, Some(150813));
        assert_eq!(m.author, "");
        assert!(m.screenshots.is_empty());
        assert_eq!(m.files[0].size, Some(1024));
        assert!(m.files[0].has_manifest());
        assert_eq!(m.to_string(), "Helper [150813]");
    }

    #[test]
    fn serializes_with_catalog_field_names() {
        let m = Mod {
            id: Some(1),
            page_url: "p".to_string(),
            files: vec![file("https://gamebanana.com/dl/2")],
            ..Default::default()
        };
        let value = serde_json::to_value(&m).unwrap();
        assert_eq!(value["GameBananaId"], 1);
        assert_eq!(value["PageURL"], "p");
        assert_eq!(value["Files"][0]["URL"], "https://gamebanana.com/dl/2");
    }
}
