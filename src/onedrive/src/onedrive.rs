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

pub(crate) mod client;
pub(crate) mod download_drive_item;
pub(crate) mod drive_items;
pub(crate) mod perform_upload;
pub(crate) mod upload_large_file;
pub mod upload_source;

/// An unrecoverable problem in the upload session protocol.
///
/// # Example
/// ```
/// # use onedrive::client::OneDrive;
/// # use onedrive::UploadError;
/// # async fn sample(client: &OneDrive) -> anyhow::Result<()> {
/// use onedrive::upload_source::LargeFile;
/// use std::error::Error as _;
/// let file = LargeFile::from_bytes("report.pdf", "hello world");
/// match client.upload_large_file("folder-id", file).send().await {
///     Ok(item) => println!("uploaded as {:?}", item.id),
///     Err(error) if error.is_protocol() => {
///         println!("the upload session went off the rails: {error}");
///         if let Some(m) = error.source().and_then(|e| e.downcast_ref::<UploadError>()) {
///             println!("{m}");
///         }
///     }
///     Err(e) => return Err(e.into()), // not handled in this example
/// }
/// # Ok(()) }
/// ```
///
/// # Troubleshooting
///
/// These errors indicate a bug in the upload session protocol, either in the
/// service or the client library. Neither are expected to be common, but
/// neither are impossible. The interrupted session is cancelled before the
/// error is returned, so no stray session is left behind on the drive.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum UploadError {
    #[error("the service accepted a chunk without naming the next expected range")]
    MissingNextRange,

    #[error("the next expected range {range:?} is malformed")]
    MalformedRange { range: String },

    #[error(
        "the upload already advanced to offset {sent}, but the service requested the next chunk at offset {offset}"
    )]
    UnexpectedRewind { offset: u64, sent: u64 },

    #[error(
        "the service requested the next chunk at offset {offset}, beyond the total upload size of {size} bytes"
    )]
    OffsetBeyondSize { offset: u64, size: u64 },
}
