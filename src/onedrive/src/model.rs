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

//! The JSON shapes exchanged with the OneDrive API.
//!
//! These mirror the [driveItem] family of resources. Deserialization uses
//! `#[serde(default)]` throughout: the service omits fields liberally, and an
//! absent field never fails a decode.
//!
//! [driveItem]: https://learn.microsoft.com/en-us/graph/api/resources/driveitem

use chrono::{DateTime, Utc};

/// A file, folder, or other item stored in a drive.
#[derive(Debug, Default, PartialEq, Clone, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DriveItem {
    pub id: String,
    pub name: String,
    pub description: String,
    pub web_url: String,
    /// Size of the item in bytes.
    pub size: u64,
    /// Short-lived URL that downloads the item's content without further
    /// authentication. The service omits it in some listings; fetch the item
    /// by id to obtain a fresh one.
    #[serde(rename = "@microsoft.graph.downloadUrl")]
    pub download_url: Option<String>,
    pub parent_reference: Option<ItemReference>,
    pub file: Option<FileFacet>,
    pub folder: Option<FolderFacet>,
    pub audio: Option<AudioFacet>,
    pub image: Option<ImageFacet>,
    pub photo: Option<PhotoFacet>,
    pub video: Option<VideoFacet>,
}

impl DriveItem {
    /// Returns true if the item is a folder.
    pub fn is_folder(&self) -> bool {
        self.folder.is_some()
    }

    /// Returns true if the item is a file.
    pub fn is_file(&self) -> bool {
        self.file.is_some()
    }
}

/// One page of drive items, as returned by the children listings.
#[derive(Debug, Default, PartialEq, Clone, serde::Deserialize)]
#[serde(default)]
pub struct DriveItemList {
    #[serde(rename = "@odata.context")]
    pub odata_context: String,
    #[serde(rename = "@odata.count")]
    pub count: i64,
    pub value: Vec<DriveItem>,
}

/// File metadata for items that are files.
#[derive(Debug, Default, PartialEq, Clone, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FileFacet {
    pub mime_type: String,
}

/// Folder metadata for items that are folders.
///
/// Also serves as the (empty) folder marker in folder-creation requests, so
/// serialization skips absent fields.
#[derive(Debug, Default, PartialEq, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FolderFacet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_count: Option<i64>,
}

/// Audio metadata for items that are audio files.
#[derive(Debug, Default, PartialEq, Clone, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AudioFacet {
    pub title: String,
    pub album: String,
    pub album_artist: String,
    pub duration: i64,
}

/// Image metadata for items that are images.
#[derive(Debug, Default, PartialEq, Clone, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageFacet {
    pub width: f64,
    pub height: f64,
}

/// Photo metadata for items with EXIF data.
#[derive(Debug, Default, PartialEq, Clone, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PhotoFacet {
    pub camera_make: String,
    pub camera_model: String,
}

/// Video metadata for items that are videos.
#[derive(Debug, Default, PartialEq, Clone, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VideoFacet {
    pub width: f64,
    pub height: f64,
    pub duration: i64,
}

/// A reference to an item's location within a drive.
#[derive(Debug, Default, PartialEq, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ItemReference {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drive_id: Option<String>,
}

/// A drive owned by a user or group.
#[derive(Debug, Default, PartialEq, Clone, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Drive {
    pub id: String,
    pub name: String,
    pub drive_type: String,
    pub quota: Option<DriveQuota>,
}

/// Storage quota of a drive.
#[derive(Debug, Default, PartialEq, Clone, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DriveQuota {
    pub total: u64,
    pub used: u64,
    pub remaining: u64,
    pub deleted: u64,
    pub state: String,
}

/// A resumable upload session issued by the service.
///
/// The session URL accepts ranged PUT requests until the upload completes or
/// the session expires. After each accepted chunk the service replaces this
/// value with an updated one carrying the next expected ranges.
#[derive(Debug, Default, PartialEq, Clone, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UploadSession {
    pub upload_url: String,
    pub expiration_date_time: Option<DateTime<Utc>>,
    /// Byte ranges the service still expects, as `start[-end]` strings.
    pub next_expected_ranges: Option<Vec<String>>,
}

/// Conflict resolution when the destination name is already taken.
#[derive(Debug, Default, PartialEq, Clone, Copy, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ConflictBehavior {
    /// Reject the operation.
    Fail,
    /// Replace the existing item.
    #[default]
    Replace,
    /// Keep both; the service picks a new name.
    Rename,
}

impl ConflictBehavior {
    /// The value used on the wire, in query parameters and request bodies.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictBehavior::Fail => "fail",
            ConflictBehavior::Replace => "replace",
            ConflictBehavior::Rename => "rename",
        }
    }
}

/// The well-known special folders of a drive.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum SpecialFolder {
    Documents,
    Photos,
    CameraRoll,
    AppRoot,
    Music,
}

impl SpecialFolder {
    /// The folder name used in request paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            SpecialFolder::Documents => "documents",
            SpecialFolder::Photos => "photos",
            SpecialFolder::CameraRoll => "cameraroll",
            SpecialFolder::AppRoot => "approot",
            SpecialFolder::Music => "music",
        }
    }
}

/// Body of a folder-creation request.
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderRequest {
    pub name: String,
    pub folder: FolderFacet,
    #[serde(rename = "@microsoft.graph.conflictBehavior")]
    pub conflict_behavior: ConflictBehavior,
}

/// Body of a move request.
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveItemRequest {
    pub parent_reference: ItemReference,
}

/// Body of a rename request.
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameItemRequest {
    pub name: String,
}

/// Body of a copy request.
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyItemRequest {
    pub name: String,
    pub parent_reference: ItemReference,
}

/// Outcome of a copy request.
///
/// Copies run asynchronously server-side; the service acknowledges them with
/// `202 Accepted` and a `Location` header pointing at a monitor URL.
#[derive(Debug, Default, PartialEq, Clone)]
pub struct CopyItemResponse {
    /// URL to poll for the progress of the copy, when the service provided
    /// one.
    pub location: Option<String>,
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    type Result = anyhow::Result<()>;

    #[test]
    fn drive_item_full() -> Result {
        let json = json!({
            "id": "01ABC",
            "name": "report.pdf",
            "webUrl": "https://contoso-my.sharepoint.com/personal/x/report.pdf",
            "size": 12345,
            "@microsoft.graph.downloadUrl": "https://public.dn.files.example/dl/abc",
            "parentReference": {"id": "01ROOT", "driveId": "b!drive", "path": "/drive/root:"},
            "file": {"mimeType": "application/pdf"}
        });
        let item = serde_json::from_value::<DriveItem>(json)?;
        assert_eq!(item.id, "01ABC");
        assert_eq!(item.name, "report.pdf");
        assert_eq!(item.size, 12345);
        assert_eq!(
            item.download_url.as_deref(),
            Some("https://public.dn.files.example/dl/abc")
        );
        assert_eq!(
            item.parent_reference.as_ref().and_then(|p| p.id.as_deref()),
            Some("01ROOT")
        );
        assert_eq!(item.file.as_ref().map(|f| f.mime_type.as_str()), Some("application/pdf"));
        assert!(item.is_file());
        assert!(!item.is_folder());
        Ok(())
    }

    #[test]
    fn drive_item_sparse() -> Result {
        let item = serde_json::from_value::<DriveItem>(json!({"id": "01ABC"}))?;
        assert_eq!(item.id, "01ABC");
        assert_eq!(item.name, "");
        assert_eq!(item.size, 0);
        assert!(item.download_url.is_none());
        assert!(item.parent_reference.is_none());
        Ok(())
    }

    #[test]
    fn drive_item_folder_facets() -> Result {
        let json = json!({
            "id": "01DIR",
            "name": "Attachments",
            "folder": {"childCount": 7}
        });
        let item = serde_json::from_value::<DriveItem>(json)?;
        assert!(item.is_folder());
        assert_eq!(item.folder.as_ref().and_then(|f| f.child_count), Some(7));
        Ok(())
    }

    #[test]
    fn drive_item_list() -> Result {
        let json = json!({
            "@odata.context": "https://graph.microsoft.com/v1.0/$metadata#children",
            "@odata.count": 2,
            "value": [
                {"id": "01A", "name": "a.txt"},
                {"id": "01B", "name": "b", "folder": {}}
            ]
        });
        let list = serde_json::from_value::<DriveItemList>(json)?;
        assert_eq!(list.count, 2);
        assert_eq!(list.value.len(), 2);
        assert_eq!(list.value[0].name, "a.txt");
        assert!(list.value[1].is_folder());
        assert_eq!(list.value[1].folder.as_ref().and_then(|f| f.child_count), None);
        Ok(())
    }

    #[test]
    fn drive_with_quota() -> Result {
        let json = json!({
            "id": "b!drive",
            "name": "OneDrive",
            "driveType": "personal",
            "quota": {"total": 1000, "used": 250, "remaining": 750, "state": "normal"}
        });
        let drive = serde_json::from_value::<Drive>(json)?;
        assert_eq!(drive.id, "b!drive");
        assert_eq!(drive.drive_type, "personal");
        let quota = drive.quota.expect("quota");
        assert_eq!(quota.total, 1000);
        assert_eq!(quota.remaining, 750);
        assert_eq!(quota.deleted, 0);
        Ok(())
    }

    #[test]
    fn upload_session() -> Result {
        let json = json!({
            "uploadUrl": "https://upload.example/session/123",
            "expirationDateTime": "2026-08-22T09:21:55.523Z",
            "nextExpectedRanges": ["12345-55232", "77829-99375"]
        });
        let session = serde_json::from_value::<UploadSession>(json)?;
        assert_eq!(session.upload_url, "https://upload.example/session/123");
        assert!(session.expiration_date_time.is_some());
        assert_eq!(
            session.next_expected_ranges,
            Some(vec!["12345-55232".to_string(), "77829-99375".to_string()])
        );
        Ok(())
    }

    #[test]
    fn upload_session_without_ranges() -> Result {
        let session = serde_json::from_value::<UploadSession>(
            json!({"uploadUrl": "https://upload.example/session/123"}),
        )?;
        assert!(session.next_expected_ranges.is_none());
        assert!(session.expiration_date_time.is_none());
        Ok(())
    }

    #[test]
    fn create_folder_request() -> Result {
        let body = CreateFolderRequest {
            name: "New Folder".to_string(),
            folder: FolderFacet::default(),
            conflict_behavior: ConflictBehavior::Rename,
        };
        let got = serde_json::to_value(&body)?;
        let want = json!({
            "name": "New Folder",
            "folder": {},
            "@microsoft.graph.conflictBehavior": "rename"
        });
        assert_eq!(got, want);
        Ok(())
    }

    #[test]
    fn move_request_only_includes_id() -> Result {
        let body = MoveItemRequest {
            parent_reference: ItemReference {
                id: Some("01DEST".to_string()),
                ..Default::default()
            },
        };
        let got = serde_json::to_value(&body)?;
        assert_eq!(got, json!({"parentReference": {"id": "01DEST"}}));
        Ok(())
    }

    #[test]
    fn copy_request() -> Result {
        let body = CopyItemRequest {
            name: "copy.txt".to_string(),
            parent_reference: ItemReference {
                id: Some("01DEST".to_string()),
                drive_id: Some("b!drive".to_string()),
                ..Default::default()
            },
        };
        let got = serde_json::to_value(&body)?;
        let want = json!({
            "name": "copy.txt",
            "parentReference": {"id": "01DEST", "driveId": "b!drive"}
        });
        assert_eq!(got, want);
        Ok(())
    }

    #[test]
    fn conflict_behavior_wire_names() {
        assert_eq!(ConflictBehavior::Fail.as_str(), "fail");
        assert_eq!(ConflictBehavior::Replace.as_str(), "replace");
        assert_eq!(ConflictBehavior::Rename.as_str(), "rename");
        assert_eq!(ConflictBehavior::default(), ConflictBehavior::Replace);
    }

    #[test]
    fn conflict_behavior_serializes_camel_case() -> Result {
        assert_eq!(serde_json::to_value(ConflictBehavior::Rename)?, json!("rename"));
        Ok(())
    }

    #[test]
    fn special_folder_wire_names() {
        assert_eq!(SpecialFolder::Documents.as_str(), "documents");
        assert_eq!(SpecialFolder::Photos.as_str(), "photos");
        assert_eq!(SpecialFolder::CameraRoll.as_str(), "cameraroll");
        assert_eq!(SpecialFolder::AppRoot.as_str(), "approot");
        assert_eq!(SpecialFolder::Music.as_str(), "music");
    }
}
