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

//! Defines upload data sources.

/// The file for large uploads via the [OneDrive][crate::client::OneDrive]
/// client.
///
/// Bundles the destination file name, the total size in bytes, and the data
/// source the upload engine reads chunks from. The size is a promise: the
/// upload fails with a truncation error if the source runs out of data before
/// `size` bytes were produced.
///
/// # Example
/// ```
/// # tokio_test::block_on(async {
/// use onedrive::upload_source::LargeFile;
/// let file = LargeFile::from_bytes("hello.txt", "hello world");
/// assert_eq!(file.name(), "hello.txt");
/// assert_eq!(file.size(), 11);
/// # });
/// ```
#[derive(Debug)]
pub struct LargeFile<D> {
    pub(crate) name: String,
    pub(crate) size: u64,
    pub(crate) data: D,
}

impl<D> LargeFile<D> {
    /// Creates a handle from a name, a total size, and a data source.
    ///
    /// Use this constructor for custom [ReadAt] implementations, or when the
    /// upload name differs from the local file name.
    pub fn new<N: Into<String>>(name: N, size: u64, data: D) -> Self {
        Self {
            name: name.into(),
            size,
            data,
        }
    }

    /// The name the file is uploaded under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The total size of the upload, in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }
}

impl LargeFile<tokio::fs::File> {
    /// Opens the file at `path` for uploading.
    ///
    /// The upload name is the file name component of `path` and the size is
    /// taken from the file metadata.
    ///
    /// # Example
    /// ```
    /// # use onedrive::upload_source::LargeFile;
    /// # async fn sample() -> anyhow::Result<()> {
    /// let file = LargeFile::from_path("archive/backup.tar.gz").await?;
    /// # Ok(()) }
    /// ```
    pub async fn from_path(path: impl AsRef<std::path::Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("path {path:?} has no file name"),
                )
            })?;
        let data = tokio::fs::File::open(path).await?;
        let size = data.metadata().await?.len();
        Ok(Self { name, size, data })
    }
}

impl LargeFile<BytesSource> {
    /// Creates a handle over an in-memory buffer.
    pub fn from_bytes<N, B>(name: N, contents: B) -> Self
    where
        N: Into<String>,
        B: Into<bytes::Bytes>,
    {
        let contents = contents.into();
        Self {
            name: name.into(),
            size: contents.len() as u64,
            data: BytesSource::new(contents),
        }
    }
}

/// Provides bytes for an upload from sources that support random access.
///
/// The upload engine asks for one chunk at a time, re-issuing the read until
/// the chunk is full or the source reports end of data. Reads within a single
/// upload are strictly serialized.
pub trait ReadAt {
    /// The error type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Reads bytes starting at `offset` into `buf`, returning how many bytes
    /// were read.
    ///
    /// `Ok(0)` with a non-empty `buf` means the source has no data at or
    /// after `offset`. Implementations may return fewer bytes than
    /// `buf.len()` for any other reason; the caller re-issues the read for
    /// the remainder.
    fn read_at(
        &mut self,
        offset: u64,
        buf: &mut [u8],
    ) -> impl Future<Output = std::result::Result<usize, Self::Error>> + Send;
}

impl ReadAt for tokio::fs::File {
    type Error = std::io::Error;

    async fn read_at(
        &mut self,
        offset: u64,
        buf: &mut [u8],
    ) -> std::result::Result<usize, Self::Error> {
        use tokio::io::{AsyncReadExt, AsyncSeekExt};
        let _ = self.seek(std::io::SeekFrom::Start(offset)).await?;
        self.read(buf).await
    }
}

/// Wrap a `bytes::Bytes` to support `ReadAt`.
pub struct BytesSource {
    contents: bytes::Bytes,
}

impl BytesSource {
    pub(crate) fn new(contents: bytes::Bytes) -> Self {
        Self { contents }
    }
}

impl ReadAt for BytesSource {
    type Error = crate::Error;

    async fn read_at(
        &mut self,
        offset: u64,
        buf: &mut [u8],
    ) -> std::result::Result<usize, Self::Error> {
        let pos = std::cmp::min(offset as usize, self.contents.len());
        let n = std::cmp::min(buf.len(), self.contents.len() - pos);
        buf[..n].copy_from_slice(&self.contents[pos..pos + n]);
        Ok(n)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    type Result = anyhow::Result<()>;

    const CONTENTS: &[u8] = b"how vexingly quick daft zebras jump";

    /// A helper function to simplify the tests.
    ///
    /// Reads through a small buffer so every source needs several calls.
    async fn collect<D>(source: &mut D, mut offset: u64) -> anyhow::Result<Vec<u8>>
    where
        D: ReadAt,
    {
        let mut vec = Vec::new();
        let mut buf = [0_u8; 8];
        loop {
            let n = source.read_at(offset, &mut buf).await?;
            if n == 0 {
                break;
            }
            vec.extend_from_slice(&buf[..n]);
            offset += n as u64;
        }
        Ok(vec)
    }

    #[tokio::test]
    async fn empty_bytes() -> Result {
        let mut source = BytesSource::new(bytes::Bytes::default());
        let got = collect(&mut source, 0).await?;
        assert!(got.is_empty(), "{got:?}");
        Ok(())
    }

    #[tokio::test]
    async fn simple_bytes() -> Result {
        let mut source = BytesSource::new(bytes::Bytes::from_static(CONTENTS));
        let got = collect(&mut source, 0).await?;
        assert_eq!(got[..], CONTENTS[..], "{got:?}");
        Ok(())
    }

    #[tokio::test]
    async fn bytes_at_offset() -> Result {
        let mut source = BytesSource::new(bytes::Bytes::from_static(CONTENTS));
        let got = collect(&mut source, 8).await?;
        assert_eq!(got[..], CONTENTS[8..], "{got:?}");
        Ok(())
    }

    #[tokio::test]
    async fn bytes_past_the_end() -> Result {
        let mut source = BytesSource::new(bytes::Bytes::from_static(CONTENTS));
        let mut buf = [0_u8; 8];
        let n = source.read_at(1_000, &mut buf).await?;
        assert_eq!(n, 0);
        Ok(())
    }

    #[tokio::test]
    async fn rewind_bytes() -> Result {
        // The same source must serve the same data for repeated offsets.
        let mut source = BytesSource::new(bytes::Bytes::from_static(CONTENTS));
        for offset in [0_u64, 16, 0, 8] {
            let got = collect(&mut source, offset).await?;
            assert_eq!(got[..], CONTENTS[offset as usize..], "{got:?}");
        }
        Ok(())
    }

    #[tokio::test]
    async fn from_bytes_sets_name_and_size() -> Result {
        let file = LargeFile::from_bytes("zebras.txt", CONTENTS);
        assert_eq!(file.name(), "zebras.txt");
        assert_eq!(file.size(), CONTENTS.len() as u64);
        Ok(())
    }

    #[tokio::test]
    async fn small_file() -> Result {
        let mut file = NamedTempFile::new()?;
        assert_eq!(file.write(CONTENTS)?, CONTENTS.len());
        file.flush()?;
        let mut read = tokio::fs::File::from(file.reopen()?);
        let got = collect(&mut read, 0).await?;
        assert_eq!(got[..], CONTENTS[..], "{got:?}");
        Ok(())
    }

    #[tokio::test]
    async fn small_file_at_offset() -> Result {
        let mut file = NamedTempFile::new()?;
        assert_eq!(file.write(CONTENTS)?, CONTENTS.len());
        file.flush()?;
        let mut read = tokio::fs::File::from(file.reopen()?);
        let got = collect(&mut read, 8).await?;
        assert_eq!(got[..], CONTENTS[8..], "{got:?}");
        Ok(())
    }

    #[tokio::test]
    async fn from_path_reads_metadata() -> Result {
        let mut file = NamedTempFile::new()?;
        assert_eq!(file.write(CONTENTS)?, CONTENTS.len());
        file.flush()?;
        let mut large = LargeFile::from_path(file.path()).await?;
        assert_eq!(large.size(), CONTENTS.len() as u64);
        assert!(!large.name().is_empty());
        let got = collect(&mut large.data, 0).await?;
        assert_eq!(got[..], CONTENTS[..], "{got:?}");
        Ok(())
    }

    #[tokio::test]
    async fn from_path_missing_file() {
        let err = LargeFile::from_path("/very/unlikely/to/exist/zebras.txt")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound, "{err:?}");
    }
}
