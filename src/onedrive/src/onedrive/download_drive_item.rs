// Copyright 2026 The onedrive-rs Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::client::{ClientInner, drive_prefix, enc, map_send_error, to_http_error};
use crate::Result;
use crate::error::Error;
use crate::model::DriveItem;
use std::sync::Arc;

/// A request builder for [OneDrive::download_drive_item][crate::client::OneDrive::download_drive_item].
///
/// # Example
/// ```
/// # use onedrive::client::OneDrive;
/// # async fn sample(client: &OneDrive) -> anyhow::Result<()> {
/// let item = client.get_drive_item("item-id").send().await?;
/// let contents = client.download_drive_item(&item).send().await?.all_bytes().await?;
/// println!("read {} bytes", contents.len());
/// # Ok(()) }
/// ```
pub struct DownloadDriveItem {
    inner: Arc<ClientInner>,
    item_id: String,
    download_url: Option<String>,
    drive_id: Option<String>,
}

impl DownloadDriveItem {
    pub(crate) fn new(inner: Arc<ClientInner>, item: &DriveItem) -> Self {
        Self {
            inner,
            item_id: item.id.clone(),
            download_url: item.download_url.clone(),
            drive_id: None,
        }
    }

    /// Targets a drive other than the signed-in user's default drive.
    ///
    /// Only used when the item must be re-fetched to obtain a fresh download
    /// URL; the URL itself already identifies the drive.
    pub fn with_drive_id<V: Into<String>>(mut self, v: V) -> Self {
        self.drive_id = Some(v.into());
        self
    }

    /// Sends the request.
    pub async fn send(self) -> Result<DownloadItemResponse> {
        let url = match &self.download_url {
            Some(url) => url.clone(),
            None => self.fetch_download_url().await?,
        };
        // The download URL is pre-authenticated, the bearer token must not
        // be sent to it.
        let response = self
            .inner
            .client
            .request(reqwest::Method::GET, url)
            .send()
            .await
            .map_err(map_send_error)?;
        if !response.status().is_success() {
            return to_http_error(response).await;
        }
        Ok(DownloadItemResponse { inner: response })
    }

    async fn fetch_download_url(&self) -> Result<String> {
        if self.item_id.is_empty() {
            return Err(Error::validation("the item id must not be empty"));
        }
        let path = format!(
            "{}/items/{}",
            drive_prefix(self.drive_id.as_ref()),
            enc(&self.item_id)
        );
        let item: DriveItem = self
            .inner
            .execute(self.inner.builder(reqwest::Method::GET, &path))
            .await?;
        item.download_url
            .ok_or_else(|| Error::deser("the item has no download URL"))
    }
}

/// The response to a download request.
///
/// The contents are streamed, not buffered. Use
/// [all_bytes()][DownloadItemResponse::all_bytes] to collect the whole body,
/// or [next()][DownloadItemResponse::next] to consume it chunk by chunk.
#[derive(Debug)]
pub struct DownloadItemResponse {
    inner: reqwest::Response,
}

impl DownloadItemResponse {
    /// Collects the full contents of the item.
    pub async fn all_bytes(mut self) -> Result<bytes::Bytes> {
        let mut contents = Vec::with_capacity(self.inner.content_length().unwrap_or(0) as usize);
        while let Some(b) = self.next().await.transpose()? {
            contents.extend_from_slice(&b);
        }
        Ok(bytes::Bytes::from_owner(contents))
    }

    /// Streams the next bytes of the contents.
    ///
    /// Returns `None` once the response is exhausted.
    pub async fn next(&mut self) -> Option<Result<bytes::Bytes>> {
        self.inner.chunk().await.map_err(Error::io).transpose()
    }
}
