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

//! Request builders for the drive item operations.
//!
//! These are plain request/response calls. Each builder collects the
//! parameters, validates them in `send()`, and hands the request to
//! [ClientInner::execute].

use super::client::{ClientInner, drive_prefix, enc, enc_path, map_send_error, to_http_error};
use crate::Result;
use crate::error::Error;
use crate::model::{
    ConflictBehavior, CopyItemRequest, CopyItemResponse, CreateFolderRequest, Drive, DriveItem,
    DriveItemList, FolderFacet, ItemReference, MoveItemRequest, RenameItemRequest, SpecialFolder,
};
use std::sync::Arc;

/// A request builder for [OneDrive::list_drive_items][crate::client::OneDrive::list_drive_items].
pub struct ListDriveItems {
    inner: Arc<ClientInner>,
    folder_id: Option<String>,
    drive_id: Option<String>,
}

impl ListDriveItems {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self {
            inner,
            folder_id: None,
            drive_id: None,
        }
    }

    /// Lists the children of this folder instead of the drive root.
    ///
    /// # Example
    /// ```
    /// # use onedrive::client::OneDrive;
    /// # async fn sample(client: &OneDrive) -> anyhow::Result<()> {
    /// let list = client
    ///     .list_drive_items()
    ///     .with_folder_id("01BYE5RZ6QN3ZWBTUFOFD3GSPGOHDJD36K")
    ///     .send()
    ///     .await?;
    /// # Ok(()) }
    /// ```
    pub fn with_folder_id<V: Into<String>>(mut self, v: V) -> Self {
        self.folder_id = Some(v.into());
        self
    }

    /// Targets a drive other than the signed-in user's default drive.
    pub fn with_drive_id<V: Into<String>>(mut self, v: V) -> Self {
        self.drive_id = Some(v.into());
        self
    }

    /// Sends the request.
    pub async fn send(self) -> Result<DriveItemList> {
        let prefix = drive_prefix(self.drive_id.as_ref());
        let path = match &self.folder_id {
            Some(id) => format!("{prefix}/items/{}/children", enc(id)),
            None => format!("{prefix}/root/children"),
        };
        self.inner
            .execute(self.inner.builder(reqwest::Method::GET, &path))
            .await
    }
}

/// A request builder for [OneDrive::list_special_folder][crate::client::OneDrive::list_special_folder].
pub struct ListSpecialFolder {
    inner: Arc<ClientInner>,
    folder: SpecialFolder,
}

impl ListSpecialFolder {
    pub(crate) fn new(inner: Arc<ClientInner>, folder: SpecialFolder) -> Self {
        Self { inner, folder }
    }

    /// Sends the request.
    pub async fn send(self) -> Result<DriveItemList> {
        let path = format!("me/drive/special/{}/children", self.folder.as_str());
        self.inner
            .execute(self.inner.builder(reqwest::Method::GET, &path))
            .await
    }
}

/// A request builder for [OneDrive::get_drive_item][crate::client::OneDrive::get_drive_item].
pub struct GetDriveItem {
    inner: Arc<ClientInner>,
    item_id: String,
    drive_id: Option<String>,
}

impl GetDriveItem {
    pub(crate) fn new<I: Into<String>>(inner: Arc<ClientInner>, item_id: I) -> Self {
        Self {
            inner,
            item_id: item_id.into(),
            drive_id: None,
        }
    }

    /// Targets a drive other than the signed-in user's default drive.
    pub fn with_drive_id<V: Into<String>>(mut self, v: V) -> Self {
        self.drive_id = Some(v.into());
        self
    }

    /// Sends the request.
    pub async fn send(self) -> Result<DriveItem> {
        if self.item_id.is_empty() {
            return Err(Error::validation("the item id must not be empty"));
        }
        let path = format!(
            "{}/items/{}",
            drive_prefix(self.drive_id.as_ref()),
            enc(&self.item_id)
        );
        self.inner
            .execute(self.inner.builder(reqwest::Method::GET, &path))
            .await
    }
}

/// A request builder for [OneDrive::get_drive_item_by_path][crate::client::OneDrive::get_drive_item_by_path].
pub struct GetDriveItemByPath {
    inner: Arc<ClientInner>,
    path: String,
    drive_id: Option<String>,
}

impl GetDriveItemByPath {
    pub(crate) fn new<P: Into<String>>(inner: Arc<ClientInner>, path: P) -> Self {
        Self {
            inner,
            path: path.into(),
            drive_id: None,
        }
    }

    /// Targets a drive other than the signed-in user's default drive.
    pub fn with_drive_id<V: Into<String>>(mut self, v: V) -> Self {
        self.drive_id = Some(v.into());
        self
    }

    /// Sends the request.
    pub async fn send(self) -> Result<DriveItem> {
        // A leading slash is accepted and ignored, the path is always
        // resolved against the drive root.
        let item_path = self.path.trim_start_matches('/');
        if item_path.is_empty() {
            return Err(Error::validation("the item path must not be empty"));
        }
        let path = format!(
            "{}/root:/{}",
            drive_prefix(self.drive_id.as_ref()),
            enc_path(item_path)
        );
        self.inner
            .execute(self.inner.builder(reqwest::Method::GET, &path))
            .await
    }
}

/// A request builder for [OneDrive::get_special_folder][crate::client::OneDrive::get_special_folder].
pub struct GetSpecialFolder {
    inner: Arc<ClientInner>,
    folder: SpecialFolder,
}

impl GetSpecialFolder {
    pub(crate) fn new(inner: Arc<ClientInner>, folder: SpecialFolder) -> Self {
        Self { inner, folder }
    }

    /// Sends the request.
    pub async fn send(self) -> Result<DriveItem> {
        let path = format!("me/drive/special/{}", self.folder.as_str());
        self.inner
            .execute(self.inner.builder(reqwest::Method::GET, &path))
            .await
    }
}

/// A request builder for [OneDrive::get_default_drive][crate::client::OneDrive::get_default_drive].
pub struct GetDefaultDrive {
    inner: Arc<ClientInner>,
}

impl GetDefaultDrive {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Sends the request.
    pub async fn send(self) -> Result<Drive> {
        self.inner
            .execute(self.inner.builder(reqwest::Method::GET, "me/drive"))
            .await
    }
}

/// A request builder for [OneDrive::create_folder][crate::client::OneDrive::create_folder].
pub struct CreateFolder {
    inner: Arc<ClientInner>,
    name: String,
    parent_folder_id: Option<String>,
    drive_id: Option<String>,
    conflict_behavior: ConflictBehavior,
}

impl CreateFolder {
    pub(crate) fn new<N: Into<String>>(inner: Arc<ClientInner>, name: N) -> Self {
        Self {
            inner,
            name: name.into(),
            parent_folder_id: None,
            drive_id: None,
            conflict_behavior: ConflictBehavior::Rename,
        }
    }

    /// Creates the folder under this folder instead of the drive root.
    pub fn with_parent_folder_id<V: Into<String>>(mut self, v: V) -> Self {
        self.parent_folder_id = Some(v.into());
        self
    }

    /// Targets a drive other than the signed-in user's default drive.
    pub fn with_drive_id<V: Into<String>>(mut self, v: V) -> Self {
        self.drive_id = Some(v.into());
        self
    }

    /// Sets the behavior when the destination already contains an item with
    /// this name. The default is [ConflictBehavior::Rename].
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
    /// # Ok(()) }
    /// ```
    pub fn with_conflict_behavior(mut self, v: ConflictBehavior) -> Self {
        self.conflict_behavior = v;
        self
    }

    /// Sends the request.
    pub async fn send(self) -> Result<DriveItem> {
        if self.name.is_empty() {
            return Err(Error::validation("the folder name must not be empty"));
        }
        let prefix = drive_prefix(self.drive_id.as_ref());
        let path = match &self.parent_folder_id {
            Some(id) => format!("{prefix}/items/{}/children", enc(id)),
            None => format!("{prefix}/root/children"),
        };
        let body = CreateFolderRequest {
            name: self.name.clone(),
            folder: FolderFacet::default(),
            conflict_behavior: self.conflict_behavior,
        };
        self.inner
            .execute(self.inner.builder(reqwest::Method::POST, &path).json(&body))
            .await
    }
}

/// A request builder for [OneDrive::delete_drive_item][crate::client::OneDrive::delete_drive_item].
pub struct DeleteDriveItem {
    inner: Arc<ClientInner>,
    item_id: String,
    drive_id: Option<String>,
}

impl DeleteDriveItem {
    pub(crate) fn new<I: Into<String>>(inner: Arc<ClientInner>, item_id: I) -> Self {
        Self {
            inner,
            item_id: item_id.into(),
            drive_id: None,
        }
    }

    /// Targets a drive other than the signed-in user's default drive.
    pub fn with_drive_id<V: Into<String>>(mut self, v: V) -> Self {
        self.drive_id = Some(v.into());
        self
    }

    /// Sends the request.
    pub async fn send(self) -> Result<()> {
        if self.item_id.is_empty() {
            return Err(Error::validation("the item id must not be empty"));
        }
        let path = format!(
            "{}/items/{}",
            drive_prefix(self.drive_id.as_ref()),
            enc(&self.item_id)
        );
        self.inner
            .execute(self.inner.builder(reqwest::Method::DELETE, &path))
            .await
    }
}

/// A request builder for [OneDrive::move_drive_item][crate::client::OneDrive::move_drive_item].
pub struct MoveDriveItem {
    inner: Arc<ClientInner>,
    item_id: String,
    destination_folder_id: String,
    drive_id: Option<String>,
}

impl MoveDriveItem {
    pub(crate) fn new<I, P>(inner: Arc<ClientInner>, item_id: I, destination_folder_id: P) -> Self
    where
        I: Into<String>,
        P: Into<String>,
    {
        Self {
            inner,
            item_id: item_id.into(),
            destination_folder_id: destination_folder_id.into(),
            drive_id: None,
        }
    }

    /// Targets a drive other than the signed-in user's default drive.
    pub fn with_drive_id<V: Into<String>>(mut self, v: V) -> Self {
        self.drive_id = Some(v.into());
        self
    }

    /// Sends the request.
    pub async fn send(self) -> Result<DriveItem> {
        if self.item_id.is_empty() {
            return Err(Error::validation("the item id must not be empty"));
        }
        if self.destination_folder_id.is_empty() {
            return Err(Error::validation(
                "the destination folder id must not be empty",
            ));
        }
        let path = format!(
            "{}/items/{}",
            drive_prefix(self.drive_id.as_ref()),
            enc(&self.item_id)
        );
        let body = MoveItemRequest {
            parent_reference: ItemReference {
                id: Some(self.destination_folder_id.clone()),
                ..ItemReference::default()
            },
        };
        self.inner
            .execute(self.inner.builder(reqwest::Method::PATCH, &path).json(&body))
            .await
    }
}

/// A request builder for [OneDrive::rename_drive_item][crate::client::OneDrive::rename_drive_item].
pub struct RenameDriveItem {
    inner: Arc<ClientInner>,
    item_id: String,
    new_name: String,
    drive_id: Option<String>,
}

impl RenameDriveItem {
    pub(crate) fn new<I, N>(inner: Arc<ClientInner>, item_id: I, new_name: N) -> Self
    where
        I: Into<String>,
        N: Into<String>,
    {
        Self {
            inner,
            item_id: item_id.into(),
            new_name: new_name.into(),
            drive_id: None,
        }
    }

    /// Targets a drive other than the signed-in user's default drive.
    pub fn with_drive_id<V: Into<String>>(mut self, v: V) -> Self {
        self.drive_id = Some(v.into());
        self
    }

    /// Sends the request.
    pub async fn send(self) -> Result<DriveItem> {
        if self.item_id.is_empty() {
            return Err(Error::validation("the item id must not be empty"));
        }
        if self.new_name.is_empty() {
            return Err(Error::validation("the new name must not be empty"));
        }
        let path = format!(
            "{}/items/{}",
            drive_prefix(self.drive_id.as_ref()),
            enc(&self.item_id)
        );
        let body = RenameItemRequest {
            name: self.new_name.clone(),
        };
        self.inner
            .execute(self.inner.builder(reqwest::Method::PATCH, &path).json(&body))
            .await
    }
}

/// A request builder for [OneDrive::copy_drive_item][crate::client::OneDrive::copy_drive_item].
pub struct CopyDriveItem {
    inner: Arc<ClientInner>,
    item_id: String,
    destination_folder_id: String,
    new_name: String,
    drive_id: Option<String>,
    destination_drive_id: Option<String>,
}

impl CopyDriveItem {
    pub(crate) fn new<I, P, N>(
        inner: Arc<ClientInner>,
        item_id: I,
        destination_folder_id: P,
        new_name: N,
    ) -> Self
    where
        I: Into<String>,
        P: Into<String>,
        N: Into<String>,
    {
        Self {
            inner,
            item_id: item_id.into(),
            destination_folder_id: destination_folder_id.into(),
            new_name: new_name.into(),
            drive_id: None,
            destination_drive_id: None,
        }
    }

    /// Copies from a drive other than the signed-in user's default drive.
    pub fn with_source_drive_id<V: Into<String>>(mut self, v: V) -> Self {
        self.drive_id = Some(v.into());
        self
    }

    /// Places the copy in this drive.
    ///
    /// The copy request names the destination drive explicitly. When unset,
    /// the client looks up the default drive's identifier first.
    pub fn with_destination_drive_id<V: Into<String>>(mut self, v: V) -> Self {
        self.destination_drive_id = Some(v.into());
        self
    }

    /// Sends the request.
    pub async fn send(self) -> Result<CopyItemResponse> {
        if self.item_id.is_empty() {
            return Err(Error::validation("the item id must not be empty"));
        }
        if self.destination_folder_id.is_empty() {
            return Err(Error::validation(
                "the destination folder id must not be empty",
            ));
        }
        if self.new_name.is_empty() {
            return Err(Error::validation("the new name must not be empty"));
        }
        let destination_drive_id = match &self.destination_drive_id {
            Some(id) => id.clone(),
            None => {
                let drive: Drive = self
                    .inner
                    .execute(self.inner.builder(reqwest::Method::GET, "me/drive"))
                    .await?;
                drive.id
            }
        };
        let path = format!(
            "{}/items/{}/copy",
            drive_prefix(self.drive_id.as_ref()),
            enc(&self.item_id)
        );
        let body = CopyItemRequest {
            name: self.new_name.clone(),
            parent_reference: ItemReference {
                id: Some(self.destination_folder_id.clone()),
                drive_id: Some(destination_drive_id),
                ..ItemReference::default()
            },
        };
        let builder = self.inner.builder(reqwest::Method::POST, &path).json(&body);
        let response = builder.send().await.map_err(map_send_error)?;
        if !response.status().is_success() {
            return to_http_error(response).await;
        }
        // The copy runs asynchronously; the acknowledgement has no body,
        // only a monitor URL in the `Location` header.
        let location = response
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        Ok(CopyItemResponse { location })
    }
}
