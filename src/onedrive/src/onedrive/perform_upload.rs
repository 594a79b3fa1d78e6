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

use super::UploadError;
use super::client::{ClientInner, drive_prefix, enc, map_send_error, to_http_error};
use super::upload_source::{LargeFile, ReadAt};
use crate::Result;
use crate::error::Error;
use crate::model::{ConflictBehavior, DriveItem, UploadSession};
use std::sync::Arc;

/// Drives a large file upload through an upload session.
///
/// The service issues a session URL, then the file is sent as a sequence of
/// `PUT` requests against that URL. After each chunk the service either
/// returns the finished [DriveItem], or names the next byte range it expects.
pub(crate) struct PerformUpload<D> {
    file: LargeFile<D>,
    inner: Arc<ClientInner>,
    parent_id: String,
    drive_id: Option<String>,
    conflict_behavior: Option<ConflictBehavior>,
    chunk_size: u64,
}

impl<D> PerformUpload<D>
where
    D: ReadAt + Send,
{
    pub(crate) fn new(
        file: LargeFile<D>,
        inner: Arc<ClientInner>,
        parent_id: String,
        drive_id: Option<String>,
        conflict_behavior: Option<ConflictBehavior>,
        chunk_size: u64,
    ) -> Self {
        Self {
            file,
            inner,
            parent_id,
            drive_id,
            conflict_behavior,
            chunk_size,
        }
    }

    pub(crate) async fn send(mut self) -> Result<DriveItem> {
        self.validate()?;
        let session = self.create_upload_session().await?;
        tracing::debug!(
            size = self.file.size,
            chunk_size = self.chunk_size,
            "created upload session"
        );
        let result = self.upload_chunks(&session.upload_url).await;
        // The session is closed whether the upload succeeded or not.
        self::cancel_upload_session(&self.inner.client, &session.upload_url).await;
        result
    }

    fn validate(&self) -> Result<()> {
        if self.parent_id.is_empty() {
            return Err(Error::validation(
                "the destination folder id must not be empty",
            ));
        }
        if self.file.name.is_empty() {
            return Err(Error::validation("the file name must not be empty"));
        }
        if self.file.size == 0 {
            return Err(Error::validation("the file size must not be zero"));
        }
        if self.chunk_size == 0 {
            return Err(Error::validation("the chunk size must not be zero"));
        }
        Ok(())
    }

    async fn create_upload_session(&self) -> Result<UploadSession> {
        let response = self
            .session_builder()
            .send()
            .await
            .map_err(map_send_error)?;
        self::handle_session_response(response).await
    }

    fn session_builder(&self) -> reqwest::RequestBuilder {
        let mut path = format!(
            "{}/items/{}:/{}:/createUploadSession",
            drive_prefix(self.drive_id.as_ref()),
            enc(&self.parent_id),
            enc(&self.file.name)
        );
        if let Some(behavior) = &self.conflict_behavior {
            // The `@` prefix must reach the service verbatim, the query
            // builder would percent encode it.
            path.push_str(&format!(
                "?@microsoft.graph.conflictBehavior={}",
                behavior.as_str()
            ));
        }
        self.inner
            .builder(reqwest::Method::POST, &path)
            .header("content-type", "application/json")
    }

    async fn upload_chunks(&mut self, upload_url: &str) -> Result<DriveItem> {
        let size = self.file.size;
        let mut offset = 0_u64;
        let mut length = self.chunk_size;
        let mut buffer = Vec::new();
        loop {
            let want = std::cmp::min(length, size - offset) as usize;
            buffer.resize(want, 0_u8);
            let read = self::fill_chunk(&mut self.file.data, offset, &mut buffer).await?;
            if read == 0 {
                return Err(Error::truncated(format!(
                    "the upload data ended at offset {offset}, expected {size} total bytes"
                )));
            }
            let last = offset + read as u64 - 1;
            tracing::debug!(offset, last, size, "uploading chunk");
            let response = self
                .inner
                .client
                .request(reqwest::Method::PUT, upload_url)
                .header("content-length", read)
                .header("Content-Range", format!("bytes {offset}-{last}/{size}"))
                .body(buffer[..read].to_vec())
                .send()
                .await
                .map_err(map_send_error)?;
            let status = response.status();
            if status == reqwest::StatusCode::OK || status == reqwest::StatusCode::CREATED {
                return response.json::<DriveItem>().await.map_err(Error::deser);
            }
            if status != reqwest::StatusCode::ACCEPTED {
                return to_http_error(response).await;
            }
            let session = response
                .json::<UploadSession>()
                .await
                .map_err(Error::deser)?;
            let (next_offset, next_length) = self::next_chunk(&session, offset, length, size)?;
            offset = next_offset;
            length = next_length;
        }
    }
}

async fn handle_session_response(response: reqwest::Response) -> Result<UploadSession> {
    if !response.status().is_success() {
        return to_http_error(response).await;
    }
    let session = response
        .json::<UploadSession>()
        .await
        .map_err(Error::deser)?;
    if session.upload_url.is_empty() {
        return Err(Error::deser("the upload session response has no uploadUrl"));
    }
    Ok(session)
}

/// Fills `buf` from `source`, re-issuing reads after short ones.
///
/// Returns the number of bytes read. This is less than the buffer size only
/// when the data ends before `offset + buf.len()`.
async fn fill_chunk<D>(source: &mut D, offset: u64, buf: &mut [u8]) -> Result<usize>
where
    D: ReadAt + Send,
{
    let mut filled = 0;
    while filled < buf.len() {
        let n = source
            .read_at(offset + filled as u64, &mut buf[filled..])
            .await
            .map_err(Error::ser)?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

/// Computes the next `(offset, length)` from the service's acknowledgement.
///
/// The service names the ranges it has not received yet. Chunks are sent
/// sequentially, so only the first entry matters. The next offset must
/// advance past the start of the chunk just sent, and must fall short of the
/// total size, anything else leaves the upload unable to make progress.
fn next_chunk(session: &UploadSession, offset: u64, length: u64, size: u64) -> Result<(u64, u64)> {
    let range = session
        .next_expected_ranges
        .as_deref()
        .unwrap_or_default()
        .first()
        .ok_or_else(|| Error::protocol(UploadError::MissingNextRange))?;
    let (next_offset, next_length) = self::parse_next_range(range, length)?;
    if next_offset <= offset {
        return Err(Error::protocol(UploadError::UnexpectedRewind {
            offset: next_offset,
            sent: offset,
        }));
    }
    if next_offset >= size {
        return Err(Error::protocol(UploadError::OffsetBeyondSize {
            offset: next_offset,
            size,
        }));
    }
    Ok((next_offset, next_length))
}

/// Parses one entry of `nextExpectedRanges`, e.g. `"26214400-"` or
/// `"26214400-33554431"`.
///
/// The start of the range is the next offset. A bounded range sets the next
/// chunk length to the span of the range, the end position is inclusive. An
/// open or bare entry keeps the previous chunk length.
fn parse_next_range(range: &str, length: u64) -> Result<(u64, u64)> {
    let malformed = || {
        Error::protocol(UploadError::MalformedRange {
            range: range.to_string(),
        })
    };
    let (start, end) = match range.split_once('-') {
        None => (range, ""),
        Some(parts) => parts,
    };
    let start = start.parse::<u64>().map_err(|_| malformed())?;
    if end.is_empty() {
        return Ok((start, length));
    }
    let end = end.parse::<u64>().map_err(|_| malformed())?;
    if end < start {
        return Err(malformed());
    }
    Ok((start, end - start + 1))
}

/// Closes an upload session. Failures are logged and otherwise ignored.
async fn cancel_upload_session(client: &reqwest::Client, upload_url: &str) {
    let result = client
        .request(reqwest::Method::DELETE, upload_url)
        .send()
        .await;
    match result {
        Ok(r) if r.status().is_success() => {}
        Ok(r) => tracing::warn!(status = %r.status(), "cannot close the upload session"),
        Err(e) => tracing::warn!("cannot close the upload session: {e:?}"),
    }
}
