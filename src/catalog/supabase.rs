/// Supabase (PostgREST) table store implementation.
use super::supabase_types::PostgrestError;
use super::{CatalogError, TableQuery, TableStore};
use serde::de::DeserializeOwned;
use std::future::Future;

/// Table store backed by the PostgREST API of a Supabase project.
///
/// Records are read from `{base_url}/rest/v1/{table}` with the project's
/// public (anon) key. Only `GET` requests are ever issued.
pub struct SupabaseStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SupabaseStore {
    /// Creates a new store for the project at `base_url`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Project URL such as `https://xyz.supabase.co`
    /// * `api_key` - The anon key sent as `apikey` and bearer token
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Builds the PostgREST query string for a table query.
    fn query_params(query: &TableQuery) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), "*".to_string())];

        if let Some(field) = &query.order_by {
            params.push(("order".to_string(), format!("{}.asc", field)));
        }

        if let Some((field, value)) = &query.filter {
            params.push((field.clone(), format!("eq.{}", value)));
        }

        params
    }

    /// Maps a non-success response body to a CatalogError.
    fn convert_error(status: u16, table: &str, body: &str) -> CatalogError {
        match serde_json::from_str::<PostgrestError>(body) {
            Ok(error) if error.code.as_deref() == Some(PostgrestError::UNDEFINED_TABLE) => {
                CatalogError::TableNotFound(table.to_string())
            }
            Ok(error) => CatalogError::Http {
                status,
                message: error.describe(),
            },
            Err(_) => CatalogError::Http {
                status,
                message: body.trim().to_string(),
            },
        }
    }
}

impl TableStore for SupabaseStore {
    fn select<T>(
        &self,
        query: &TableQuery,
    ) -> impl Future<Output = Result<Vec<T>, CatalogError>> + Send
    where
        T: DeserializeOwned + Send + 'static,
    {
        // Build the request up front so the future owns everything it needs
        let url = format!("{}/rest/v1/{}", self.base_url, query.table);
        let table = query.table.clone();
        let request = self
            .client
            .get(&url)
            .query(&Self::query_params(query))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key);

        async move {
            tracing::debug!(%url, "querying table store");

            let response = request
                .send()
                .await
                .map_err(|e| CatalogError::RequestError(e.to_string()))?;

            let status = response.status();
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(CatalogError::TableNotFound(table));
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(Self::convert_error(status.as_u16(), &table, &body));
            }

            response
                .json::<Vec<T>>()
                .await
                .map_err(|e| CatalogError::ParseError(e.to_string()))
        }
    }
}
