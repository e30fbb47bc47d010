// Copyright 2026 Dmitry Tantsur <dtantsur@protonmail.com>
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Marker-based pagination over resource lists.

use std::future::Future;

use crate::Result;

/// A resource that can serve as a pagination marker.
pub(crate) trait ResourceId {
    /// Unique ID of the resource.
    fn resource_id(&self) -> &str;
}

/// Append the pagination marker, if any, to a query.
pub(crate) fn with_marker(
    mut query: Vec<(&'static str, String)>,
    marker: Option<String>,
) -> Vec<(&'static str, String)> {
    if let Some(marker) = marker {
        query.push(("marker", marker));
    }
    query
}

/// Fetch every page of a resource list.
///
/// `fetch_page` receives the marker (the ID of the last item seen so far) and
/// returns the next page. Iteration stops on an empty page or when the server
/// ignores the marker and returns the same last item again, in which case the
/// repeated page is discarded.
pub(crate) async fn fetch_all<T, F, Fut>(mut fetch_page: F) -> Result<Vec<T>>
where
    T: ResourceId,
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let mut result = Vec::new();
    let mut marker: Option<String> = None;
    loop {
        let page = fetch_page(marker.clone()).await?;
        let next = match page.last() {
            Some(item) => item.resource_id().to_string(),
            None => break,
        };
        if marker.as_deref() == Some(next.as_str()) {
            warn!("Pagination marker {} did not advance, stopping", next);
            break;
        }
        result.extend(page);
        trace!("Fetched {} items so far, next marker is {}", result.len(), next);
        marker = Some(next);
    }
    Ok(result)
}
