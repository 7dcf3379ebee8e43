//! Open data catalogue types.
//!
//! The catalogue describes each dataset as a package holding a list of
//! downloadable resources. Resources are addressed by alias; the alias field
//! on the wire is a single `", "`-separated string treated here as a set.

use serde::{Deserialize, Serialize};

/// A package as returned by the catalogue's `package_show` endpoint.
///
/// Decoding never inspects `success`: a well-formed but unsuccessful reply
/// decodes cleanly and the caller decides what to do with it.
#[derive(Debug, Clone, Deserialize)]
pub struct Package {
    #[serde(default)]
    pub success: bool,
    pub result: PackageResult,
}

/// The payload of a package reply.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageResult {
    pub resources: Resources,
}

/// The downloadable resources of a package.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Resources(pub Vec<Resource>);

impl Resources {
    /// Look a resource up by alias.
    ///
    /// Each resource's alias set is matched exactly; the first resource whose
    /// set contains `alias` wins. `None` means no resource carries the alias,
    /// which callers must handle explicitly.
    pub fn get_by_alias(&self, alias: &str) -> Option<&Resource> {
        self.0
            .iter()
            .find(|resource| resource.aliases().any(|a| a == alias))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Resource> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Resources {
    type Item = &'a Resource;
    type IntoIter = std::slice::Iter<'a, Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// One downloadable artifact within a package.
///
/// Wire fields may be absent or null depending on the dataset; everything but
/// the download URL defaults to empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Resource {
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub package_id: String,
    #[serde(default)]
    pub last_modified: Option<String>,
    #[serde(default)]
    pub alias: String,
}

impl Resource {
    /// Whether the download URL denotes a CSV artifact.
    pub fn is_csv(&self) -> bool {
        self.url.ends_with(".csv")
    }

    /// The alias set of this resource.
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.alias.split(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(alias: &str) -> Resource {
        Resource {
            alias: alias.to_string(),
            url: "https://dati.unibo.it/dataset/corsi.csv".to_string(),
            ..Resource::default()
        }
    }

    #[test]
    fn alias_lookup_matches_any_member_of_the_set() {
        let resources = Resources(vec![resource("corsi-2023, corsi2023")]);

        assert!(resources.get_by_alias("corsi2023").is_some());
        assert!(resources.get_by_alias("corsi-2023").is_some());
        assert!(resources.get_by_alias("corsi2024").is_none());
    }

    #[test]
    fn alias_lookup_requires_exact_match() {
        let resources = Resources(vec![resource("corsi-2023, corsi2023")]);

        // Substrings and supersets of an alias are not matches.
        assert!(resources.get_by_alias("corsi").is_none());
        assert!(resources.get_by_alias("corsi-2023, corsi2023").is_none());
    }

    #[test]
    fn alias_lookup_returns_first_match() {
        let mut first = resource("corsi2023");
        first.id = "first".to_string();
        let mut second = resource("corsi2023");
        second.id = "second".to_string();

        let resources = Resources(vec![first, second]);
        assert_eq!(resources.get_by_alias("corsi2023").unwrap().id, "first");
    }

    #[test]
    fn unsuccessful_package_still_decodes() {
        let body = r#"{
            "success": false,
            "result": {
                "resources": [
                    {"url": "https://dati.unibo.it/x.csv", "alias": "corsi2023"}
                ]
            }
        }"#;

        let package: Package = serde_json::from_str(body).unwrap();
        assert!(!package.success);
        assert_eq!(package.result.resources.len(), 1);
    }

    #[test]
    fn csv_detection_goes_by_url_suffix() {
        assert!(resource("a").is_csv());

        let mut json = resource("a");
        json.url = "https://dati.unibo.it/dataset/corsi.json".to_string();
        assert!(!json.is_csv());
    }
}
