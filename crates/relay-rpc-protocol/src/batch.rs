//! Ordered request batches and response correlation.

use crate::request::Request;
use crate::response::Response;

/// An ordered collection of requests sent as one wire transaction.
///
/// An empty batch is a valid value (see [`Batch::empty`]); callers are expected
/// to check [`Batch::is_empty`] before dispatch since many servers reject `[]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    requests: Vec<Request>,
}

impl Batch {
    /// The empty-batch sentinel
    pub fn empty() -> Self {
        Self::default()
    }

    /// Package requests preserving their order
    pub fn combine(requests: impl IntoIterator<Item = Request>) -> Self {
        Self {
            requests: requests.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn requests(&self) -> &[Request] {
        &self.requests
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Request> {
        self.requests.iter()
    }

    /// Requests that expect a response
    pub fn calls(&self) -> impl Iterator<Item = &Request> {
        self.requests.iter().filter(|r| !r.is_notification())
    }

    pub fn has_calls(&self) -> bool {
        self.calls().next().is_some()
    }
}

impl FromIterator<Request> for Batch {
    fn from_iter<I: IntoIterator<Item = Request>>(iter: I) -> Self {
        Self::combine(iter)
    }
}

impl IntoIterator for Batch {
    type Item = Request;
    type IntoIter = std::vec::IntoIter<Request>;

    fn into_iter(self) -> Self::IntoIter {
        self.requests.into_iter()
    }
}

impl<'a> IntoIterator for &'a Batch {
    type Item = &'a Request;
    type IntoIter = std::slice::Iter<'a, Request>;

    fn into_iter(self) -> Self::IntoIter {
        self.requests.iter()
    }
}

/// Pair every call of `batch` with its response.
///
/// Matching is by id. When no response carries the call's id, the response at
/// the call's position is used if its id is null (servers answer with a null id
/// when they could not read the request id). Notifications are skipped.
pub fn correlate<'a, T>(
    batch: &'a Batch,
    responses: &'a [Response<T>],
) -> Vec<(&'a Request, Option<&'a Response<T>>)> {
    batch
        .iter()
        .enumerate()
        .filter(|(_, request)| !request.is_notification())
        .map(|(index, request)| {
            let by_id = responses
                .iter()
                .find(|response| response.id.is_some() && response.id.as_ref() == request.id());
            let matched = by_id.or_else(|| {
                responses
                    .get(index)
                    .filter(|response| response.id.is_none())
            });
            (request, matched)
        })
        .collect()
}
