use anyhow::Context;
use async_trait::async_trait;
use aws_config::{defaults, BehaviorVersion};
use aws_credential_types::Credentials;
use aws_sdk_s3::{
    config::{Builder as S3ConfigBuilder, Region},
    Client,
};
use aws_smithy_types::byte_stream::ByteStream;
use bytes::Bytes;
use uuid::Uuid;

use crate::config::StorageConfig;
use crate::error::ApiError;
use crate::state::AppState;

#[async_trait]
pub trait StorageClient: Send + Sync {
    async fn put_object(&self, key: &str, body: Bytes, content_type: &str) -> anyhow::Result<()>;
    async fn delete_object(&self, key: &str) -> anyhow::Result<()>;
}

#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
}

impl S3Storage {
    pub async fn new(cfg: &StorageConfig) -> anyhow::Result<Self> {
        let shared = defaults(BehaviorVersion::latest())
            .region(Region::new(cfg.region.clone()))
            .credentials_provider(Credentials::new(
                cfg.access_key.clone(),
                cfg.secret_key.clone(),
                None,
                None,
                "static",
            ))
            .endpoint_url(&cfg.endpoint)
            .load()
            .await;

        let conf = S3ConfigBuilder::from(&shared)
            .endpoint_url(&cfg.endpoint)
            .force_path_style(true)
            .build();

        Ok(Self {
            client: Client::from_conf(conf),
            bucket: cfg.bucket.clone(),
        })
    }
}

#[async_trait]
impl StorageClient for S3Storage {
    async fn put_object(&self, key: &str, body: Bytes, content_type: &str) -> anyhow::Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .context("s3 put_object")?;
        Ok(())
    }

    async fn delete_object(&self, key: &str) -> anyhow::Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .context("s3 delete_object")?;
        Ok(())
    }
}

/// One uploaded multipart file, already buffered.
#[derive(Debug)]
pub struct UploadedFile {
    pub bytes: Bytes,
    pub content_type: String,
}

/// The four upload slots the platform accepts. Each carries its own MIME
/// whitelist; a resume is the only slot that takes a PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    ProfilePicture,
    Resume,
    ProjectThumbnail,
    SkillIcon,
}

impl AssetKind {
    pub fn key_prefix(self) -> &'static str {
        match self {
            AssetKind::ProfilePicture => "avatars",
            AssetKind::Resume => "resumes",
            AssetKind::ProjectThumbnail => "thumbnails",
            AssetKind::SkillIcon => "icons",
        }
    }

    /// File extension for an accepted content type, `None` when the type
    /// is not allowed for this slot.
    pub fn ext_for(self, content_type: &str) -> Option<&'static str> {
        match (self, content_type) {
            (AssetKind::Resume, "application/pdf") => Some("pdf"),
            (AssetKind::Resume, _) => None,
            (_, "image/jpeg" | "image/jpg") => Some("jpg"),
            (_, "image/png") => Some("png"),
            _ => None,
        }
    }
}

/// Upload Gateway entry point: validates the content type, stores the bytes
/// under a fresh key and returns the public URL to persist.
pub async fn store_asset(
    st: &AppState,
    kind: AssetKind,
    owner: Uuid,
    file: UploadedFile,
) -> Result<String, ApiError> {
    let ext = kind.ext_for(&file.content_type).ok_or_else(|| {
        ApiError::Validation(format!(
            "Unsupported file type '{}' for this field.",
            file.content_type
        ))
    })?;
    let key = format!("{}/{}/{}.{}", kind.key_prefix(), owner, Uuid::new_v4(), ext);
    st.storage
        .put_object(&key, file.bytes, &file.content_type)
        .await
        .map_err(|e| ApiError::Upstream(format!("Failed to store uploaded file: {e:#}")))?;
    Ok(public_url(&st.config.storage.public_base_url, &key))
}

pub fn public_url(base: &str, key: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), key)
}

/// Inverse of [`public_url`]: recovers the object key from a stored URL.
/// Returns `None` for URLs that do not live under our public base (e.g.
/// assets imported from elsewhere), which callers treat as "nothing to delete".
pub fn key_from_url(base: &str, url: &str) -> Option<String> {
    let base = base.trim_end_matches('/');
    url.strip_prefix(base)
        .and_then(|rest| rest.strip_prefix('/'))
        .filter(|k| !k.is_empty())
        .map(str::to_string)
}

/// Best-effort removal of a replaced asset. Failure is logged, never surfaced.
pub async fn delete_replaced(st: &AppState, old_url: &str) {
    let Some(key) = key_from_url(&st.config.storage.public_base_url, old_url) else {
        return;
    };
    if let Err(e) = st.storage.delete_object(&key).await {
        tracing::warn!(%key, error = %e, "failed to delete replaced asset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;

    #[test]
    fn resume_accepts_only_pdf() {
        assert_eq!(AssetKind::Resume.ext_for("application/pdf"), Some("pdf"));
        assert_eq!(AssetKind::Resume.ext_for("image/png"), None);
        assert_eq!(AssetKind::Resume.ext_for("image/jpeg"), None);
    }

    #[test]
    fn image_slots_accept_jpeg_and_png_only() {
        for kind in [
            AssetKind::ProfilePicture,
            AssetKind::ProjectThumbnail,
            AssetKind::SkillIcon,
        ] {
            assert_eq!(kind.ext_for("image/jpeg"), Some("jpg"));
            assert_eq!(kind.ext_for("image/jpg"), Some("jpg"));
            assert_eq!(kind.ext_for("image/png"), Some("png"));
            assert_eq!(kind.ext_for("application/pdf"), None);
            assert_eq!(kind.ext_for("image/svg+xml"), None);
            assert_eq!(kind.ext_for("application/octet-stream"), None);
        }
    }

    #[test]
    fn key_from_url_roundtrip() {
        let base = "https://cdn.example.com/portfolio-assets";
        let key = "avatars/ab/cd.jpg";
        let url = public_url(base, key);
        assert_eq!(key_from_url(base, &url).as_deref(), Some(key));

        // trailing slash on the configured base is tolerated
        let url2 = public_url("https://cdn.example.com/portfolio-assets/", key);
        assert_eq!(key_from_url(base, &url2).as_deref(), Some(key));

        // foreign URLs are not ours to delete
        assert_eq!(key_from_url(base, "https://elsewhere.net/x.png"), None);
        assert_eq!(key_from_url(base, base), None);
    }

    #[tokio::test]
    async fn store_asset_rejects_disallowed_type() {
        let st = AppState::fake();
        let err = store_asset(
            &st,
            AssetKind::SkillIcon,
            Uuid::new_v4(),
            UploadedFile {
                bytes: Bytes::from_static(b"%PDF-"),
                content_type: "application/pdf".into(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn store_asset_returns_public_url() {
        let st = AppState::fake();
        let owner = Uuid::new_v4();
        let url = store_asset(
            &st,
            AssetKind::ProfilePicture,
            owner,
            UploadedFile {
                bytes: Bytes::from_static(&[0xFF, 0xD8]),
                content_type: "image/jpeg".into(),
            },
        )
        .await
        .unwrap();
        assert!(url.starts_with(&st.config.storage.public_base_url));
        assert!(url.contains(&format!("avatars/{owner}/")));
        assert!(url.ends_with(".jpg"));
    }
}
