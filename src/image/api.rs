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

//! Foundation bits exposing the Image API.

use osauth::services::IMAGE;
use osauth::Session;

use super::protocol::*;
use crate::common::{fetch_all, with_marker};
use crate::Result;

/// List images visible to the current project.
pub async fn list_images(session: &Session) -> Result<Vec<Image>> {
    trace!("Listing images");
    let images = fetch_all(|marker| async move {
        let query = with_marker(Vec::new(), marker);
        let root: ImagesRoot = session
            .get(IMAGE, &["images"])
            .query(&query)
            .fetch()
            .await?;
        Ok::<_, crate::Error>(root.images)
    })
    .await?;
    debug!("Received {} images", images.len());
    Ok(images)
}
