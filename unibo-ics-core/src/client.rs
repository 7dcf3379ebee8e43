//! HTTP client for the open data portal and the course subsites.
//!
//! The client is constructed explicitly and passed to callers; there is no
//! process-wide shared transport. Every outbound request carries the fixed
//! user-agent. Each pipeline operation performs a single fetch and waits for
//! the full response; failures surface immediately, with no retry.

use std::time::Duration;

use reqwest::{Client, ClientBuilder};

use crate::{
    Error, Result,
    courses::{Course, decode_courses},
    opendata::{Package, Resource},
    timetable::{Timetable, timetable_url},
    website::{AnchorLocator, CourseWebsiteId, WebsiteLocator},
};

/// User-agent sent with every outbound request.
pub const USER_AGENT: &str = "unibo-ics/0.1.0";

const DEFAULT_OPENDATA_BASE: &str = "https://dati.unibo.it";
const DEFAULT_COURSES_BASE: &str = "https://corsi.unibo.it";

/// Builder for [`UniboClient`].
pub struct UniboClientBuilder {
    pub client_builder: ClientBuilder,
    opendata_base: String,
    courses_base: String,
    locator: Box<dyn WebsiteLocator>,
}

impl UniboClientBuilder {
    pub fn new() -> Self {
        let client_builder = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT);

        Self {
            client_builder,
            opendata_base: DEFAULT_OPENDATA_BASE.to_string(),
            courses_base: DEFAULT_COURSES_BASE.to_string(),
            locator: Box::new(AnchorLocator::new()),
        }
    }

    /// Override the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.client_builder = self.client_builder.timeout(timeout);
        self
    }

    /// Override the open data portal base URL.
    pub fn opendata_base(mut self, base: impl Into<String>) -> Self {
        self.opendata_base = base.into();
        self
    }

    /// Override the course subsite base URL.
    pub fn courses_base(mut self, base: impl Into<String>) -> Self {
        self.courses_base = base.into();
        self
    }

    /// Substitute the website identifier extraction strategy.
    pub fn locator(mut self, locator: Box<dyn WebsiteLocator>) -> Self {
        self.locator = locator;
        self
    }

    pub fn build(self) -> UniboClient {
        let client = self
            .client_builder
            .build()
            .expect("Failed to create HTTP client");

        UniboClient {
            client,
            opendata_base: self.opendata_base,
            courses_base: self.courses_base,
            locator: self.locator,
        }
    }
}

impl Default for UniboClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Client resolving the catalogue, course pages and timetable feeds.
pub struct UniboClient {
    client: Client,
    opendata_base: String,
    courses_base: String,
    locator: Box<dyn WebsiteLocator>,
}

impl UniboClient {
    /// Client with the production base URLs and default settings.
    pub fn new() -> Self {
        UniboClientBuilder::new().build()
    }

    /// Fetch a catalogue package and decode its resource list.
    ///
    /// The package's `success` flag is decoded, not checked; callers decide
    /// how to treat an unsuccessful reply.
    pub async fn package(&self, id: &str) -> Result<Package> {
        let url = format!("{}/api/3/action/package_show?id={}", self.opendata_base, id);
        tracing::debug!("fetching package {id}");

        let body = self.get_bytes(&url).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Download and decode a resource's course table.
    ///
    /// Only CSV resources are supported; anything else is an
    /// [`Error::UnsupportedResource`].
    pub async fn courses(&self, resource: &Resource) -> Result<Vec<Course>> {
        if !resource.is_csv() {
            return Err(Error::UnsupportedResource {
                url: resource.url.clone(),
            });
        }

        tracing::debug!("downloading course table from {}", resource.url);
        let body = self.get_bytes(&resource.url).await?;
        let courses = decode_courses(body.as_slice())?;
        tracing::info!("decoded {} courses", courses.len());
        Ok(courses)
    }

    /// Scrape a course's webpage for its website identifier.
    pub async fn website_id(&self, course: &Course) -> Result<CourseWebsiteId> {
        tracing::debug!("locating website for course {}", course.codice);

        let response = self.client.get(&course.url).send().await?.error_for_status()?;
        let html = response.text().await?;
        self.locator.locate(&html)
    }

    /// Fetch a course's timetable feed for a year of study.
    pub async fn timetable(&self, course: &CourseWebsiteId, anno: u32) -> Result<Timetable> {
        let url = timetable_url(&self.courses_base, course, anno);
        tracing::debug!("fetching timetable from {url}");

        let body = self.get_bytes(&url).await?;
        let timetable: Timetable = serde_json::from_slice(&body)?;
        tracing::info!("fetched {} timetable events", timetable.len());
        Ok(timetable)
    }

    /// Resolve a course's website identifier, then fetch its timetable.
    pub async fn course_timetable(&self, course: &Course, anno: u32) -> Result<Timetable> {
        let id = self.website_id(course).await?;
        self.timetable(&id, anno).await
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}

impl Default for UniboClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_csv_resource_is_rejected_before_any_fetch() {
        let client = UniboClient::new();
        let resource = Resource {
            url: "https://dati.unibo.it/dataset/corsi.json".to_string(),
            ..Resource::default()
        };

        let err = tokio_test::block_on(client.courses(&resource)).unwrap_err();
        assert!(matches!(err, Error::UnsupportedResource { .. }));
    }
}
