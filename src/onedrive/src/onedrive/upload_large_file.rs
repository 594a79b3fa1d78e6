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

use super::client::ClientInner;
use super::perform_upload::PerformUpload;
use super::upload_source::{LargeFile, ReadAt};
use crate::Result;
use crate::model::{ConflictBehavior, DriveItem};
use std::sync::Arc;

/// The default chunk size for large file uploads.
pub(crate) const DEFAULT_CHUNK_SIZE: u64 = 4 * 1024 * 1024;

/// A request builder for large file uploads.
///
/// The file is uploaded through an upload session, split into chunks that are
/// sent sequentially. The upload is driven by [send()][UploadLargeFile::send],
/// which returns the [DriveItem] describing the uploaded file.
///
/// # Example
/// ```
/// # use onedrive::client::OneDrive;
/// # async fn sample(client: &OneDrive) -> anyhow::Result<()> {
/// use onedrive::upload_source::LargeFile;
/// let file = LargeFile::from_path("archive/backup.tar.gz").await?;
/// let item = client
///     .upload_large_file("destination-folder-id", file)
///     .send()
///     .await?;
/// println!("uploaded as {}", item.id);
/// # Ok(()) }
/// ```
pub struct UploadLargeFile<D> {
    inner: Arc<ClientInner>,
    parent_id: String,
    file: LargeFile<D>,
    drive_id: Option<String>,
    conflict_behavior: Option<ConflictBehavior>,
    chunk_size: u64,
}

impl<D> UploadLargeFile<D> {
    pub(crate) fn new<P, T>(inner: Arc<ClientInner>, parent_id: P, file: T) -> Self
    where
        P: Into<String>,
        T: Into<LargeFile<D>>,
    {
        Self {
            inner,
            parent_id: parent_id.into(),
            file: file.into(),
            drive_id: None,
            conflict_behavior: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Targets a drive other than the signed-in user's default drive.
    ///
    /// # Example
    /// ```
    /// # use onedrive::client::OneDrive;
    /// # async fn sample(client: &OneDrive) -> anyhow::Result<()> {
    /// use onedrive::upload_source::LargeFile;
    /// let file = LargeFile::from_bytes("notes.txt", "rough draft");
    /// let item = client
    ///     .upload_large_file("destination-folder-id", file)
    ///     .with_drive_id("b!CbLka_given_drive_id")
    ///     .send()
    ///     .await?;
    /// # Ok(()) }
    /// ```
    pub fn with_drive_id<V: Into<String>>(mut self, v: V) -> Self {
        self.drive_id = Some(v.into());
        self
    }

    /// Sets the behavior when the destination folder already contains a file
    /// with the same name.
    ///
    /// When unset, the choice is left to the service.
    ///
    /// # Example
    /// ```
    /// # use onedrive::client::OneDrive;
    /// # async fn sample(client: &OneDrive) -> anyhow::Result<()> {
    /// use onedrive::model::ConflictBehavior;
    /// use onedrive::upload_source::LargeFile;
    /// let file = LargeFile::from_bytes("notes.txt", "rough draft");
    /// let item = client
    ///     .upload_large_file("destination-folder-id", file)
    ///     .with_conflict_behavior(ConflictBehavior::Fail)
    ///     .send()
    ///     .await?;
    /// # Ok(()) }
    /// ```
    pub fn with_conflict_behavior(mut self, v: ConflictBehavior) -> Self {
        self.conflict_behavior = Some(v);
        self
    }

    /// Sets the chunk size for the upload, 4 MiB unless set.
    ///
    /// The service requires chunk sizes to be a multiple of 320 KiB, except
    /// for the final chunk of a file.
    ///
    /// # Example
    /// ```
    /// # use onedrive::client::OneDrive;
    /// # async fn sample(client: &OneDrive) -> anyhow::Result<()> {
    /// use onedrive::upload_source::LargeFile;
    /// let file = LargeFile::from_path("archive/backup.tar.gz").await?;
    /// let item = client
    ///     .upload_large_file("destination-folder-id", file)
    ///     .with_chunk_size(8 * 1024 * 1024)
    ///     .send()
    ///     .await?;
    /// # Ok(()) }
    /// ```
    pub fn with_chunk_size(mut self, v: u64) -> Self {
        self.chunk_size = v;
        self
    }
}

impl<D> UploadLargeFile<D>
where
    D: ReadAt + Send,
{
    /// Uploads the file.
    pub async fn send(self) -> Result<DriveItem> {
        self.build().send().await
    }

    pub(crate) fn build(self) -> PerformUpload<D> {
        PerformUpload::new(
            self.file,
            self.inner,
            self.parent_id,
            self.drive_id,
            self.conflict_behavior,
            self.chunk_size,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::onedrive::client::tests::{test_builder, test_inner_client};

    #[test]
    fn builder_defaults() {
        let inner = test_inner_client(test_builder());
        let b = UploadLargeFile::new(inner, "parent-id", LargeFile::from_bytes("f.bin", "abc"));
        assert_eq!(b.parent_id, "parent-id");
        assert_eq!(b.chunk_size, DEFAULT_CHUNK_SIZE);
        assert!(b.drive_id.is_none());
        assert!(b.conflict_behavior.is_none());
    }

    #[test]
    fn builder_options() {
        let inner = test_inner_client(test_builder());
        let b = UploadLargeFile::new(inner, "parent-id", LargeFile::from_bytes("f.bin", "abc"))
            .with_drive_id("drive-2")
            .with_conflict_behavior(ConflictBehavior::Fail)
            .with_chunk_size(320 * 1024);
        assert_eq!(b.drive_id.as_deref(), Some("drive-2"));
        assert_eq!(b.conflict_behavior, Some(ConflictBehavior::Fail));
        assert_eq!(b.chunk_size, 320 * 1024);
    }
}
