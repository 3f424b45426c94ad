//! Per-resource operations, written once for every resource type.

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;

use crate::client::IgdbClient;
use crate::error::ApiError;
use crate::options::{Operator, QueryOption};
use crate::transport::Transport;
use crate::types::{Platform, PulseGroup, TestDummy};

/// A record type served by its own IGDB endpoint.
pub trait Resource: DeserializeOwned {
    /// Endpoint path relative to the root URL, with trailing slash.
    const ENDPOINT: &'static str;
    /// Singular, human-readable name used in error context.
    const NAME: &'static str;
}

impl Resource for Platform {
    const ENDPOINT: &'static str = "platforms/";
    const NAME: &'static str = "platform";
}

impl Resource for PulseGroup {
    const ENDPOINT: &'static str = "pulse_groups/";
    const NAME: &'static str = "pulse group";
}

impl Resource for TestDummy {
    const ENDPOINT: &'static str = "test_dummies/";
    const NAME: &'static str = "test dummy";
}

/// Operations on one resource endpoint.
///
/// Obtained from [`IgdbClient::platforms`] and friends. Input validation and
/// option errors come back bare; failures after the request is sent are
/// annotated with the operation that failed.
pub struct Service<'c, R, T> {
    client: &'c IgdbClient<T>,
    _resource: PhantomData<fn() -> R>,
}

impl<'c, R: Resource, T: Transport> Service<'c, R, T> {
    pub(crate) fn new(client: &'c IgdbClient<T>) -> Self {
        Self {
            client,
            _resource: PhantomData,
        }
    }

    /// Fetch the record with the given id.
    pub fn get(&self, id: i64, options: &[QueryOption]) -> Result<R, ApiError> {
        if id < 0 {
            return Err(ApiError::NegativeId);
        }

        let options = with_defaults(
            options,
            [QueryOption::filter("id", Operator::Equals, [id])],
        );
        let request = self.client.build_request(R::ENDPOINT, &options)?;

        self.client
            .fetch_records::<R>(&request)
            .and_then(|records| records.into_iter().next().ok_or(ApiError::NoResults))
            .map_err(|e| e.context(format!("cannot get {} with ID {id}", R::NAME)))
    }

    /// Fetch the records matching any of `ids`. Ids with no record are
    /// skipped; if none match the result is `NoResults`.
    pub fn list(&self, ids: &[i64], options: &[QueryOption]) -> Result<Vec<R>, ApiError> {
        if ids.is_empty() {
            return Err(ApiError::EmptyIds);
        }
        if ids.iter().any(|id| *id < 0) {
            return Err(ApiError::NegativeId);
        }

        let options = with_defaults(
            options,
            [QueryOption::filter("id", Operator::ContainsAtLeast, ids)],
        );
        let request = self.client.build_request(R::ENDPOINT, &options)?;

        self.client
            .fetch_records(&request)
            .map_err(|e| e.context(format!("cannot get {}s with IDs {ids:?}", R::NAME)))
    }

    /// Fetch records selected purely by `options`.
    pub fn index(&self, options: &[QueryOption]) -> Result<Vec<R>, ApiError> {
        let options = with_defaults(options, []);
        let request = self.client.build_request(R::ENDPOINT, &options)?;

        self.client
            .fetch_records(&request)
            .map_err(|e| e.context(format!("cannot get index of {}s", R::NAME)))
    }

    /// Free-text search over the endpoint.
    pub fn search(&self, query: &str, options: &[QueryOption]) -> Result<Vec<R>, ApiError> {
        let options = with_defaults(options, [QueryOption::search(query)]);
        let request = self.client.build_request(R::ENDPOINT, &options)?;

        self.client
            .fetch_records(&request)
            .map_err(|e| e.context(format!("cannot search {}s for {query:?}", R::NAME)))
    }

    /// Number of records, optionally narrowed by filter options.
    pub fn count(&self, options: &[QueryOption]) -> Result<u64, ApiError> {
        let request = self
            .client
            .build_request(&format!("{}count", R::ENDPOINT), options)?;

        self.client
            .fetch_count(&request)
            .map_err(|e| e.context(format!("cannot count {}s", R::NAME)))
    }

    /// Current field names of the resource.
    pub fn fields(&self) -> Result<Vec<String>, ApiError> {
        let request = self
            .client
            .build_request(&format!("{}meta", R::ENDPOINT), &[])?;

        self.client
            .fetch_fields(&request)
            .map_err(|e| e.context(format!("cannot get {} fields", R::NAME)))
    }
}

impl<R: Resource, T> fmt::Debug for Service<'_, R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Service")
            .field("endpoint", &R::ENDPOINT)
            .finish()
    }
}

/// Caller options plus the service's own, with `fields=*` in front unless the
/// caller chose fields. Service options go last so they win on key clashes.
fn with_defaults<const N: usize>(
    options: &[QueryOption],
    extra: [QueryOption; N],
) -> Vec<QueryOption> {
    let mut all = Vec::with_capacity(options.len() + N + 1);
    if !options.iter().any(|o| matches!(o, QueryOption::Fields(_))) {
        all.push(QueryOption::fields(["*"]));
    }
    all.extend_from_slice(options);
    all.extend(extra);
    all
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_add_wildcard_fields_first() {
        let all = with_defaults(&[QueryOption::limit(5)], []);
        assert_eq!(all, vec![QueryOption::fields(["*"]), QueryOption::limit(5)]);
    }

    #[test]
    fn defaults_keep_caller_fields() {
        let all = with_defaults(
            &[QueryOption::fields(["name"])],
            [QueryOption::search("zelda")],
        );
        assert_eq!(
            all,
            vec![QueryOption::fields(["name"]), QueryOption::search("zelda")]
        );
    }

    #[test]
    fn endpoints_end_with_slash() {
        assert_eq!(Platform::ENDPOINT, "platforms/");
        assert_eq!(PulseGroup::ENDPOINT, "pulse_groups/");
        assert_eq!(TestDummy::ENDPOINT, "test_dummies/");
    }
}
