use super::auth::{person_urn, LinkedInAuth};
use super::types::*;
use crate::config::LinkedInConfig;
use anyhow::{Context, Result};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

const RESTLI_HEADER: &str = "X-Restli-Protocol-Version";
const RESTLI_VERSION: &str = "2.0.0";

pub struct LinkedInRest {
    client: Client,
    auth: Arc<LinkedInAuth>,
    base_url: String,
    media_title: String,
}

impl LinkedInRest {
    pub fn new(auth: Arc<LinkedInAuth>, config: &LinkedInConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .context("failed to build LinkedIn HTTP client")?;
        Ok(Self {
            client,
            auth,
            base_url: config.api_base.trim_end_matches('/').to_string(),
            media_title: config.media_title.clone(),
        })
    }

    /// Authenticated GET returning JSON.
    async fn get_authed<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.auth.apply(self.client.get(&url))
            .send()
            .await
            .with_context(|| format!("GET {} failed", path))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("GET {} failed ({}): {}", path, status, body);
        }
        resp.json().await
            .with_context(|| format!("failed to parse {} response", path))
    }

    /// The member URN behind the token: OpenID `userinfo` first, then the
    /// legacy profile endpoint.
    pub async fn member_urn(&self) -> Result<String> {
        match self.get_authed::<UserInfo>("/userinfo").await {
            Ok(info) => return Ok(person_urn(&info.sub)),
            Err(e) => tracing::debug!(error = %e, "userinfo lookup failed, trying /me"),
        }
        let me: MeResponse = self.get_authed("/me").await
            .context("LinkedIn auth failed: could not resolve member id")?;
        Ok(person_urn(&me.id))
    }

    /// Register an image upload. Returns (upload_url, asset_urn).
    pub async fn register_upload(&self, owner: &str) -> Result<(String, String)> {
        let url = format!("{}/assets?action=registerUpload", self.base_url);
        let resp = self.auth.apply(self.client.post(&url))
            .header(RESTLI_HEADER, RESTLI_VERSION)
            .json(&RegisterUploadRequest::feed_image(owner))
            .send()
            .await
            .context("register upload request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("register upload failed ({}): {}", status, body);
        }

        let parsed: RegisterUploadResponse = resp.json().await
            .context("failed to parse register upload response")?;
        Ok((
            parsed.value.upload_mechanism.http_request.upload_url,
            parsed.value.asset,
        ))
    }

    /// PUT the raw image bytes to the upload URL LinkedIn handed out.
    pub async fn upload_image(&self, upload_url: &str, png: Vec<u8>) -> Result<()> {
        let resp = self.auth.apply(self.client.put(upload_url))
            .header(reqwest::header::CONTENT_TYPE, "image/png")
            .body(png)
            .send()
            .await
            .context("image upload request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("image upload failed ({}): {}", status, body);
        }
        Ok(())
    }

    /// Publish the share. Returns the post id when LinkedIn reports one.
    pub async fn create_post(&self, author: &str, text: &str, asset: &str) -> Result<Option<String>> {
        let url = format!("{}/ugcPosts", self.base_url);
        let resp = self.auth.apply(self.client.post(&url))
            .header(RESTLI_HEADER, RESTLI_VERSION)
            .json(&UgcPost::image_share(author, text, asset, &self.media_title))
            .send()
            .await
            .context("create post request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("create post failed ({}): {}", status, body);
        }

        let header_id = resp
            .headers()
            .get("x-restli-id")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        if header_id.is_some() {
            return Ok(header_id);
        }

        let body = resp.text().await.unwrap_or_default();
        Ok(serde_json::from_str::<UgcPostResponse>(&body)
            .ok()
            .and_then(|r| r.id))
    }

    /// Full flow: resolve author, register, upload, post.
    pub async fn publish(&self, author: Option<&str>, text: &str, png: Vec<u8>) -> Result<PublishedPost> {
        let author = match author {
            Some(id) => person_urn(id),
            None => self.member_urn().await?,
        };
        tracing::debug!(author = %author, "publishing as");

        let (upload_url, asset) = self.register_upload(&author).await?;
        self.upload_image(&upload_url, png).await?;
        let post_id = self.create_post(&author, text, &asset).await?;

        Ok(PublishedPost {
            author,
            asset,
            post_id,
        })
    }
}
