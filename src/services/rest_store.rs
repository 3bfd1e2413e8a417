use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use crate::models::{ArtistCandidate, CandidateFilter, ClientPreferences};
use crate::services::profile_store::{LookupError, ProfileStore};

/// Table names in the hosted database
#[derive(Debug, Clone)]
pub struct StoreTables {
    pub client_preferences: String,
    pub artist_candidates: String,
}

/// Client for the hosted database's REST interface
///
/// Speaks the PostgREST query dialect (`column=eq.value`,
/// `column=gte.value`) and authenticates with the service API key.
pub struct RestProfileStore {
    base_url: String,
    api_key: String,
    client: Client,
    tables: StoreTables,
}

impl RestProfileStore {
    /// Create a new store client
    pub fn new(
        base_url: String,
        api_key: String,
        tables: StoreTables,
        request_timeout: Duration,
    ) -> Result<Self, LookupError> {
        let client = Client::builder().timeout(request_timeout).build()?;

        Ok(Self {
            base_url,
            api_key,
            client,
            tables,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), table)
    }

    async fn fetch_rows(&self, url: &str, what: &str) -> Result<Vec<Value>, LookupError> {
        let response = self
            .client
            .get(url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Failed to fetch {}: {} - {}", what, status, body);
            return Err(LookupError::Failed(format!("Failed to fetch {}: {}", what, status)));
        }

        let json: Value = response.json().await?;

        match json {
            Value::Array(rows) => Ok(rows),
            _ => Err(LookupError::Failed(format!("Invalid response for {}: expected a row array", what))),
        }
    }
}

/// Build the PostgREST filter list for a candidate query
pub(crate) fn rate_filter_params(filter: &CandidateFilter) -> Vec<String> {
    let mut params = Vec::new();
    if let Some(min) = filter.min_rate {
        params.push(format!("hourly_rate=gte.{}", min));
    }
    if let Some(max) = filter.max_rate {
        params.push(format!("hourly_rate=lte.{}", max));
    }
    params
}

#[async_trait]
impl ProfileStore for RestProfileStore {
    async fn get_client_preferences(&self, client_id: &str) -> Result<ClientPreferences, LookupError> {
        let url = format!(
            "{}?select=*&client_id=eq.{}",
            self.table_url(&self.tables.client_preferences),
            urlencoding::encode(client_id)
        );

        tracing::debug!("Fetching preferences for client: {}", client_id);

        let rows = self.fetch_rows(&url, "client preferences").await?;

        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| LookupError::NotFound(client_id.to_string()))?;

        serde_json::from_value(row)
            .map_err(|e| LookupError::Failed(format!("Failed to parse preferences: {}", e)))
    }

    async fn list_artist_candidates(
        &self,
        filter: Option<CandidateFilter>,
    ) -> Result<Vec<ArtistCandidate>, LookupError> {
        let mut url = format!("{}?select=*", self.table_url(&self.tables.artist_candidates));
        if let Some(filter) = filter {
            for param in rate_filter_params(&filter) {
                url.push('&');
                url.push_str(&param);
            }
        }

        let rows = self.fetch_rows(&url, "artist candidates").await?;
        let total = rows.len();

        // A malformed row fails the whole lookup: ranking a partial pool is not allowed
        let candidates = rows
            .into_iter()
            .map(serde_json::from_value::<ArtistCandidate>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| LookupError::Failed(format!("Failed to parse artist candidate: {}", e)))?;

        tracing::debug!("Queried {} candidates (rows: {})", candidates.len(), total);

        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn create_store(base_url: String) -> RestProfileStore {
        RestProfileStore::new(
            base_url,
            "service_key".to_string(),
            StoreTables {
                client_preferences: "client_preferences".to_string(),
                artist_candidates: "artist_candidates".to_string(),
            },
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_rate_filter_params() {
        let filter = CandidateFilter { min_rate: Some(50.0), max_rate: Some(150.5) };
        assert_eq!(
            rate_filter_params(&filter),
            vec!["hourly_rate=gte.50", "hourly_rate=lte.150.5"]
        );
        assert!(rate_filter_params(&CandidateFilter::default()).is_empty());
    }

    #[tokio::test]
    async fn test_get_client_preferences() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/v1/client_preferences")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("client_id".into(), "eq.client_1".into()),
                Matcher::UrlEncoded("select".into(), "*".into()),
            ]))
            .match_header("apikey", "service_key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"client_id":"client_1","preferred_styles":["Realism"],"budget_max":200}]"#)
            .create_async()
            .await;

        let store = create_store(server.url());
        let prefs = store.get_client_preferences("client_1").await.unwrap();

        mock.assert_async().await;
        assert_eq!(prefs.client_id, "client_1");
        assert_eq!(prefs.preferred_styles, vec!["Realism"]);
        assert_eq!(prefs.budget_max, Some(200.0));
    }

    #[tokio::test]
    async fn test_missing_preferences_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/v1/client_preferences")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let store = create_store(server.url());
        let err = store.get_client_preferences("ghost").await.unwrap_err();

        assert_eq!(err, LookupError::NotFound("ghost".to_string()));
    }

    #[tokio::test]
    async fn test_list_candidates_with_filter() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/v1/artist_candidates")
            .match_query(Matcher::Regex(
                r"select=\*&hourly_rate=gte\.80&hourly_rate=lte\.200$".to_string(),
            ))
            .with_status(200)
            .with_body(
                r#"[
                    {"id":"a1","display_name":"Ada","hourly_rate":120,"style_tags":["Realism"]},
                    {"id":"a2","display_name":"Bo","hourly_rate":90,"style_tags":[],"portfolio_images":["p/1.jpg"]}
                ]"#,
            )
            .create_async()
            .await;

        let store = create_store(server.url());
        let filter = CandidateFilter { min_rate: Some(80.0), max_rate: Some(200.0) };
        let candidates = store.list_artist_candidates(Some(filter)).await.unwrap();

        mock.assert_async().await;
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].display_name, "Ada");
        assert_eq!(candidates[1].portfolio_images, vec!["p/1.jpg"]);
    }

    #[tokio::test]
    async fn test_null_columns_do_not_fail_lookup() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/v1/client_preferences")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"[{"client_id":"c1","preferred_styles":null,"location":null,"budget_min":null,"budget_max":null}]"#)
            .create_async()
            .await;
        server
            .mock("GET", "/rest/v1/artist_candidates")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"[{"id":"a1","display_name":null,"hourly_rate":null,"style_tags":null,"portfolio_images":null}]"#,
            )
            .create_async()
            .await;

        let store = create_store(server.url());

        let prefs = store.get_client_preferences("c1").await.unwrap();
        assert!(prefs.preferred_styles.is_empty());
        assert!(prefs.location.is_empty());

        let candidates = store.list_artist_candidates(None).await.unwrap();
        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].style_tags.is_empty());
        assert!(candidates[0].display_name.is_empty());
    }

    #[tokio::test]
    async fn test_server_error_is_lookup_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/v1/artist_candidates")
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body("unavailable")
            .create_async()
            .await;

        let store = create_store(server.url());
        let err = store.list_artist_candidates(None).await.unwrap_err();

        assert!(matches!(err, LookupError::Failed(msg) if msg.contains("503")));
    }
}
