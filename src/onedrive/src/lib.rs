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

//! Microsoft OneDrive client library for Rust
//!
//! This crate contains types and functions to interact with [Microsoft
//! OneDrive] through the [Microsoft Graph] REST API. Most applications will
//! use the structs defined in the [client] module. More specifically:
//!
//! * [OneDrive][client::OneDrive]
//!
//! The client covers the drive item operations (list, get, create folder,
//! move, rename, copy, delete, download) and resumable, chunked uploads for
//! large files.
//!
//! **WARNING:** this crate is under active development. We expect multiple
//! breaking changes in the upcoming releases. We welcome feedback about the
//! APIs, documentation, missing features, bugs, etc.
//!
//! [Microsoft OneDrive]: https://onedrive.live.com
//! [Microsoft Graph]: https://learn.microsoft.com/en-us/graph/onedrive-concept-overview

pub use crate::error::{Error, Result};

pub use crate::onedrive::UploadError;
pub use crate::onedrive::upload_source;

pub mod error;
pub mod model;

mod onedrive;

/// Clients to interact with Microsoft OneDrive.
pub mod client {
    pub use crate::onedrive::client::OneDrive;
}

/// Request builders.
pub mod builder {
    pub mod onedrive {
        pub use crate::onedrive::client::ClientBuilder;
        pub use crate::onedrive::download_drive_item::{DownloadDriveItem, DownloadItemResponse};
        pub use crate::onedrive::drive_items::{
            CopyDriveItem, CreateFolder, DeleteDriveItem, GetDefaultDrive, GetDriveItem,
            GetDriveItemByPath, GetSpecialFolder, ListDriveItems, ListSpecialFolder, MoveDriveItem,
            RenameDriveItem,
        };
        pub use crate::onedrive::upload_large_file::UploadLargeFile;
    }
}
