//! Thin wrapper around `reqwest::Client` for the application's photo API.
//! All requests carry the admin auth cookie.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::multipart;

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    cookie: String,
}

impl ApiClient {
    pub fn new(base_url: &str, cookie: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            cookie: cookie.to_string(),
        })
    }

    fn cookie_header(&self) -> String {
        format!("JWT-Auth={}", self.cookie)
    }

    /// Download the photo bytes from their public URL.
    pub async fn download_photo(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to download photo from {url}"))?;

        let status = response.status();
        if !status.is_success() {
            bail!("photo download from {url} returned HTTP {status}");
        }

        Ok(response
            .bytes()
            .await
            .with_context(|| format!("Failed to read photo bytes from {url}"))?
            .to_vec())
    }

    /// POST the photo as multipart form data on behalf of `uploader_id`.
    pub async fn upload_photo(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        uploader_id: i64,
    ) -> Result<()> {
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("image/jpeg")
            .context("Failed to build photo part")?;

        let form = multipart::Form::new()
            .part("file", part)
            .text("caption", "")
            .text("userUploadId", uploader_id.to_string())
            .text("tags", "[]");

        let url = format!("{}/api/photo", self.base_url);
        let response = self
            .http
            .post(&url)
            .header("cookie", self.cookie_header())
            .multipart(form)
            .send()
            .await
            .with_context(|| format!("Failed to POST photo to {url}"))?;

        let status = response.status();
        if status != reqwest::StatusCode::CREATED {
            bail!("photo upload returned HTTP {status}");
        }

        Ok(())
    }

    /// PUT the uploaded photo as the user's profile picture.
    pub async fn set_profile_photo(&self, photo_id: i64, user_id: i64) -> Result<()> {
        let url = format!("{}/api/photo/{photo_id}/profile", self.base_url);
        let response = self
            .http
            .put(&url)
            .header("cookie", self.cookie_header())
            .json(&user_id)
            .send()
            .await
            .with_context(|| format!("Failed to PUT profile photo to {url}"))?;

        let status = response.status();
        if !status.is_success() {
            bail!("profile photo assignment returned HTTP {status}");
        }

        Ok(())
    }
}

/// Last path segment of the photo URL, used as the uploaded file name.
pub fn file_name_from_url(url: &str) -> &str {
    url.rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or("photo.jpg")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_from_url() {
        assert_eq!(
            file_name_from_url("https://example.com/portraits/women/7.jpg"),
            "7.jpg"
        );
        assert_eq!(file_name_from_url("https://example.com/"), "photo.jpg");
        assert_eq!(file_name_from_url("plain.jpg"), "plain.jpg");
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:9000/", "token").unwrap();
        assert_eq!(client.base_url, "http://localhost:9000");
    }

    #[test]
    fn test_cookie_header_format() {
        let client = ApiClient::new("http://localhost:9000", "abc.def.ghi").unwrap();
        assert_eq!(client.cookie_header(), "JWT-Auth=abc.def.ghi");
    }
}
