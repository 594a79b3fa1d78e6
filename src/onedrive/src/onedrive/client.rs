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

use crate::Result;
use crate::builder::onedrive::{
    CopyDriveItem, CreateFolder, DeleteDriveItem, DownloadDriveItem, GetDefaultDrive,
    GetDriveItem, GetDriveItemByPath, GetSpecialFolder, ListDriveItems, ListSpecialFolder,
    MoveDriveItem, RenameDriveItem, UploadLargeFile,
};
use crate::error::{Error, ErrorResponse};
use crate::model::{DriveItem, SpecialFolder};
use crate::upload_source::LargeFile;
use std::sync::Arc;

/// Implements a client for the OneDrive API.
///
/// # Example
/// ```
/// # tokio_test::block_on(async {
/// # use onedrive::client::OneDrive;
/// let client = OneDrive::builder()
///     .with_access_token("an-access-token")
///     .build()
///     .await?;
/// // use `client` to make requests to OneDrive.
/// # onedrive::Result::<()>::Ok(()) });
/// ```
///
/// # Configuration
///
/// To configure `OneDrive` use the `with_*` methods in the type returned by
/// [builder()][OneDrive::builder]. The client requires an access token
/// obtained through any OAuth2 flow; acquiring and refreshing tokens is out of
/// scope for this library, the token is used as-is in the `Authorization`
/// header. By default the client targets the global endpoint
/// (`https://graph.microsoft.com/v1.0`); applications using sovereign clouds
/// can override this with [with_endpoint()][ClientBuilder::with_endpoint].
///
/// # Pooling and Cloning
///
/// `OneDrive` holds a connection pool internally, it is advised to create one
/// and then reuse it. You do not need to wrap `OneDrive` in an
/// [Rc](std::rc::Rc) or [Arc] to reuse it, because it already uses an `Arc`
/// internally.
#[derive(Clone, Debug)]
pub struct OneDrive {
    inner: std::sync::Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub client: reqwest::Client,
    pub endpoint: String,
    pub token: String,
}

impl std::fmt::Debug for ClientInner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientInner")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl OneDrive {
    /// Returns a builder for [OneDrive].
    ///
    /// # Example
    /// ```
    /// # use onedrive::client::OneDrive;
    /// # async fn sample() -> anyhow::Result<()> {
    /// let client = OneDrive::builder()
    ///     .with_access_token("an-access-token")
    ///     .build()
    ///     .await?;
    /// # Ok(()) }
    /// ```
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Lists the items in a drive folder.
    ///
    /// Targets the root folder of the default drive, unless a folder is
    /// selected with `with_folder_id()`.
    ///
    /// # Example
    /// ```
    /// # use onedrive::client::OneDrive;
    /// # async fn sample(client: &OneDrive) -> anyhow::Result<()> {
    /// let list = client.list_drive_items().send().await?;
    /// for item in list.value {
    ///     println!("{} ({} bytes)", item.name, item.size);
    /// }
    /// # Ok(()) }
    /// ```
    pub fn list_drive_items(&self) -> ListDriveItems {
        ListDriveItems::new(self.inner.clone())
    }

    /// Lists the items in one of the well-known special folders.
    ///
    /// # Parameters
    /// * `folder` - the special folder to list.
    pub fn list_special_folder(&self, folder: SpecialFolder) -> ListSpecialFolder {
        ListSpecialFolder::new(self.inner.clone(), folder)
    }

    /// Retrieves a drive item by its identifier.
    ///
    /// # Example
    /// ```
    /// # use onedrive::client::OneDrive;
    /// # async fn sample(client: &OneDrive) -> anyhow::Result<()> {
    /// let item = client.get_drive_item("01BYE5RZ6QN3ZWBTUFOFD3GSPGOHDJD36K").send().await?;
    /// println!("item details={item:?}");
    /// # Ok(()) }
    /// ```
    pub fn get_drive_item<I: Into<String>>(&self, item_id: I) -> GetDriveItem {
        GetDriveItem::new(self.inner.clone(), item_id)
    }

    /// Retrieves a drive item by its path relative to the drive root.
    ///
    /// # Parameters
    /// * `path` - the item path, e.g. `Documents/report.pdf`.
    pub fn get_drive_item_by_path<P: Into<String>>(&self, path: P) -> GetDriveItemByPath {
        GetDriveItemByPath::new(self.inner.clone(), path)
    }

    /// Retrieves one of the well-known special folders.
    pub fn get_special_folder(&self, folder: SpecialFolder) -> GetSpecialFolder {
        GetSpecialFolder::new(self.inner.clone(), folder)
    }

    /// Retrieves the signed-in user's default drive, including its quota.
    pub fn get_default_drive(&self) -> GetDefaultDrive {
        GetDefaultDrive::new(self.inner.clone())
    }

    /// Creates a new folder.
    ///
    /// The folder is created under the drive root unless a parent is selected
    /// with `with_parent_folder_id()`. Name conflicts are resolved by renaming
    /// the new folder, unless overridden with `with_conflict_behavior()`.
    ///
    /// # Example
    /// ```
    /// # use onedrive::client::OneDrive;
    /// # async fn sample(client: &OneDrive) -> anyhow::Result<()> {
    /// use onedrive::model::ConflictBehavior;
    /// let folder = client
    ///     .create_folder("Invoices")
    ///     .with_conflict_behavior(ConflictBehavior::Fail)
    ///     .send()
    ///     .await?;
    /// println!("created folder id={}", folder.id);
    /// # Ok(()) }
    /// ```
    pub fn create_folder<N: Into<String>>(&self, name: N) -> CreateFolder {
        CreateFolder::new(self.inner.clone(), name)
    }

    /// Deletes a drive item.
    ///
    /// The item is moved to the recycle bin, not permanently destroyed.
    pub fn delete_drive_item<I: Into<String>>(&self, item_id: I) -> DeleteDriveItem {
        DeleteDriveItem::new(self.inner.clone(), item_id)
    }

    /// Moves a drive item to another folder.
    ///
    /// # Parameters
    /// * `item_id` - the item to move.
    /// * `destination_folder_id` - the identifier of the new parent folder.
    pub fn move_drive_item<I, P>(&self, item_id: I, destination_folder_id: P) -> MoveDriveItem
    where
        I: Into<String>,
        P: Into<String>,
    {
        MoveDriveItem::new(self.inner.clone(), item_id, destination_folder_id)
    }

    /// Renames a drive item.
    pub fn rename_drive_item<I, N>(&self, item_id: I, new_name: N) -> RenameDriveItem
    where
        I: Into<String>,
        N: Into<String>,
    {
        RenameDriveItem::new(self.inner.clone(), item_id, new_name)
    }

    /// Copies a drive item into another folder, under a new name.
    ///
    /// Copying is asynchronous on the service side. The returned value carries
    /// the monitor URL the service provides to poll for completion.
    ///
    /// # Example
    /// ```
    /// # use onedrive::client::OneDrive;
    /// # async fn sample(client: &OneDrive) -> anyhow::Result<()> {
    /// let copy = client
    ///     .copy_drive_item("item-id", "destination-folder-id", "copy-of-report.pdf")
    ///     .send()
    ///     .await?;
    /// println!("monitor URL={:?}", copy.location);
    /// # Ok(()) }
    /// ```
    pub fn copy_drive_item<I, P, N>(
        &self,
        item_id: I,
        destination_folder_id: P,
        new_name: N,
    ) -> CopyDriveItem
    where
        I: Into<String>,
        P: Into<String>,
        N: Into<String>,
    {
        CopyDriveItem::new(self.inner.clone(), item_id, destination_folder_id, new_name)
    }

    /// Downloads the contents of a drive item.
    ///
    /// Items returned by the service usually carry a short-lived,
    /// pre-authenticated download URL. When the given item lacks one, the
    /// client first re-fetches the item by id to obtain it.
    ///
    /// # Example
    /// ```
    /// # use onedrive::client::OneDrive;
    /// # async fn sample(client: &OneDrive) -> anyhow::Result<()> {
    /// let item = client.get_drive_item("item-id").send().await?;
    /// let contents = client
    ///     .download_drive_item(&item)
    ///     .send()
    ///     .await?
    ///     .all_bytes()
    ///     .await?;
    /// println!("read {} bytes", contents.len());
    /// # Ok(()) }
    /// ```
    pub fn download_drive_item(&self, item: &DriveItem) -> DownloadDriveItem {
        DownloadDriveItem::new(self.inner.clone(), item)
    }

    /// Uploads a large file through a resumable upload session.
    ///
    /// The file is split into chunks (4 MiB by default, see
    /// `with_chunk_size()`) and sent sequentially; the service acknowledges
    /// each chunk and names the next range it expects. On success the terminal
    /// [DriveItem][crate::model::DriveItem] describing the uploaded file is
    /// returned, and the session is closed.
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
    ///
    /// # Parameters
    /// * `parent_id` - the identifier of the destination folder.
    /// * `file` - the file name, size, and data source.
    pub fn upload_large_file<P, T, D>(&self, parent_id: P, file: T) -> UploadLargeFile<D>
    where
        P: Into<String>,
        T: Into<LargeFile<D>>,
    {
        UploadLargeFile::new(self.inner.clone(), parent_id, file)
    }

    pub(crate) fn new(mut builder: ClientBuilder) -> Result<Self> {
        if builder.token.is_none() {
            return Err(Error::validation(
                "an access token is required, use with_access_token()",
            ));
        }
        builder.endpoint = builder
            .endpoint
            .or_else(|| Some(self::DEFAULT_HOST.to_string()));
        let client = reqwest::Client::builder()
            // Disable all automatic decompression. These could be enabled by
            // users by enabling the corresponding feature flags, but we will
            // not be able to tell whether this has happened.
            .no_brotli()
            .no_deflate()
            .no_gzip()
            .no_zstd()
            .build()
            .map_err(Error::io)?;
        let inner = Arc::new(ClientInner::new(client, builder));
        Ok(Self { inner })
    }
}

impl ClientInner {
    /// Builds a client assuming `builder.token` and `builder.endpoint` are initialized, panics otherwise.
    pub(self) fn new(client: reqwest::Client, builder: ClientBuilder) -> Self {
        Self {
            client,
            endpoint: builder
                .endpoint
                .expect("ClientInner assumes the endpoint is initialized"),
            token: builder
                .token
                .expect("ClientInner assumes the access token is initialized"),
        }
    }

    /// Starts a request for a path relative to the endpoint, with bearer auth.
    pub(crate) fn builder(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}/{}", self.endpoint, path))
            .bearer_auth(&self.token)
    }

    /// Sends a request and decodes the JSON response.
    pub(crate) async fn execute<O>(&self, builder: reqwest::RequestBuilder) -> Result<O>
    where
        O: serde::de::DeserializeOwned + Default,
    {
        let response = builder.send().await.map_err(self::map_send_error)?;
        if !response.status().is_success() {
            return self::to_http_error(response).await;
        }
        // 204 No Content has no body and fails JSON decoding.
        if response.status() == reqwest::StatusCode::NO_CONTENT {
            return Ok(O::default());
        }
        let body = response.bytes().await.map_err(Error::io)?;
        serde_json::from_slice::<O>(&body).map_err(Error::deser)
    }
}

pub(crate) fn map_send_error(err: reqwest::Error) -> Error {
    match err {
        e if e.is_timeout() => Error::timeout(e),
        e => Error::io(e),
    }
}

/// Maps a non-success response to the error the service described.
///
/// The service reports errors as a JSON envelope with a structured payload.
/// Responses that do not carry the envelope (HTML gateway pages, empty
/// bodies) keep their raw status and body instead.
pub(crate) async fn to_http_error<O>(response: reqwest::Response) -> Result<O> {
    let status_code = response.status().as_u16();
    let headers = response.headers().clone();
    let body = response.bytes().await.map_err(Error::io)?;
    let error = match serde_json::from_slice::<ErrorResponse>(&body) {
        Ok(ErrorResponse { error: Some(e) }) => {
            Error::service_with_http_metadata(e, Some(status_code), Some(headers))
        }
        _ => Error::http(status_code, headers, body),
    };
    Err(error)
}

/// A builder for [OneDrive].
///
/// ```
/// # use onedrive::client::OneDrive;
/// # async fn sample() -> anyhow::Result<()> {
/// let builder = OneDrive::builder();
/// let client = builder
///     .with_endpoint("https://graph.microsoft.com/v1.0")
///     .with_access_token("an-access-token")
///     .build()
///     .await?;
/// # Ok(()) }
/// ```
pub struct ClientBuilder {
    pub(crate) endpoint: Option<String>,
    pub(crate) token: Option<String>,
}

impl ClientBuilder {
    pub(crate) fn new() -> Self {
        Self {
            endpoint: None,
            token: None,
        }
    }

    /// Creates a new client.
    ///
    /// # Example
    /// ```
    /// # use onedrive::client::OneDrive;
    /// # async fn sample() -> anyhow::Result<()> {
    /// let client = OneDrive::builder()
    ///     .with_access_token("an-access-token")
    ///     .build()
    ///     .await?;
    /// # Ok(()) }
    /// ```
    pub async fn build(self) -> Result<OneDrive> {
        OneDrive::new(self)
    }

    /// Sets the endpoint.
    ///
    /// # Example
    /// ```
    /// # use onedrive::client::OneDrive;
    /// # async fn sample() -> anyhow::Result<()> {
    /// let client = OneDrive::builder()
    ///     .with_endpoint("https://microsoftgraph.chinacloudapi.cn/v1.0")
    ///     .with_access_token("an-access-token")
    ///     .build()
    ///     .await?;
    /// # Ok(()) }
    /// ```
    pub fn with_endpoint<V: Into<String>>(mut self, v: V) -> Self {
        self.endpoint = Some(v.into());
        self
    }

    /// Sets the access token used to authorize requests.
    ///
    /// The token is sent as-is in a `Bearer` authorization header. The client
    /// does not acquire or refresh tokens; when the token expires, requests
    /// fail with an authentication error from the service and the application
    /// must build a new client with a fresh token.
    pub fn with_access_token<V: Into<String>>(mut self, v: V) -> Self {
        self.token = Some(v.into());
        self
    }
}

/// The default host used by the service.
const DEFAULT_HOST: &str = "https://graph.microsoft.com/v1.0";

/// The set of characters that are percent encoded.
///
/// Item identifiers, names, and paths are placed in the path of a request
/// URL, so everything outside the unreserved set is encoded, including `/`
/// and the `:` delimiter around path-addressed segments.
const ENCODED_CHARS: percent_encoding::AsciiSet = percent_encoding::CONTROLS
    .add(b'!')
    .add(b'#')
    .add(b'$')
    .add(b'%')
    .add(b'&')
    .add(b'\'')
    .add(b'(')
    .add(b')')
    .add(b'*')
    .add(b'+')
    .add(b',')
    .add(b'/')
    .add(b':')
    .add(b';')
    .add(b'=')
    .add(b'?')
    .add(b'@')
    .add(b'[')
    .add(b']')
    .add(b' ');

/// Percent encode a string.
///
/// To ensure compatibility certain characters need to be encoded when they
/// appear in the path of a request URL.
pub(crate) fn enc(value: &str) -> String {
    percent_encoding::utf8_percent_encode(value, &ENCODED_CHARS).to_string()
}

/// Percent encode an item path, preserving the `/` between segments.
pub(crate) fn enc_path(value: &str) -> String {
    value.split('/').map(enc).collect::<Vec<_>>().join("/")
}

/// The path prefix selecting a drive: the default drive, or one by id.
pub(crate) fn drive_prefix(drive_id: Option<&String>) -> String {
    match drive_id {
        Some(id) => format!("me/drives/{}", enc(id)),
        None => "me/drive".to_string(),
    }
}
