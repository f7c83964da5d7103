//! Post form bodies and the `/media/` file service.
//!
//! The post form is sent as `multipart/form-data` so it can carry an image;
//! a plain urlencoded body is accepted too and simply has no image.

use std::path::PathBuf;

use actix_files::Files;
use actix_web::HttpRequest;
use actix_web::http::header;
use actix_web::web::Bytes;

use crate::domain::{Error, FieldErrors, ImageUpload, MAX_IMAGE_BYTES, PostDraft};
use crate::inbound::http::forms::PostForm;

/// URL prefix uploaded images are served under.
pub const MEDIA_URL: &str = "/media";

/// Largest post form body: one image plus the text fields.
pub const POST_BODY_LIMIT: usize = MAX_IMAGE_BYTES + 64 * 1024;

/// Serve files below `dir` at [`MEDIA_URL`]. Directory listings stay off.
pub fn media_files(dir: impl Into<PathBuf>) -> Files {
    Files::new(MEDIA_URL, dir.into())
}

fn malformed(err: multer::Error) -> Error {
    Error::invalid_request(format!("malformed multipart body: {err}"))
}

/// A submitted post form: the text fields plus an optional file part.
#[derive(Debug, Default)]
pub struct PostSubmission {
    pub form: PostForm,
    pub image: Option<ImageUpload>,
}

impl PostSubmission {
    /// Decode `body` according to the request's content type.
    ///
    /// # Errors
    /// `InvalidRequest` when a multipart body is malformed.
    pub async fn read(req: &HttpRequest, body: Bytes) -> Result<Self, Error> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        if content_type.starts_with("multipart/form-data") {
            Self::from_multipart(content_type, body).await
        } else {
            Ok(Self::from_urlencoded(&body))
        }
    }

    /// Validate into a draft, keeping the text fields for a re-render.
    pub fn into_draft(self) -> (PostForm, Result<PostDraft, FieldErrors>) {
        let draft = PostDraft::from_submission(&self.form.text, &self.form.group, self.image);
        (self.form, draft)
    }

    fn from_urlencoded(body: &[u8]) -> Self {
        let mut form = PostForm::default();
        for (name, value) in url::form_urlencoded::parse(body) {
            match name.as_ref() {
                "text" => form.text = value.into_owned(),
                "group" => form.group = value.into_owned(),
                _ => {}
            }
        }
        Self { form, image: None }
    }

    async fn from_multipart(content_type: &str, body: Bytes) -> Result<Self, Error> {
        let boundary = multer::parse_boundary(content_type).map_err(malformed)?;
        let stream = futures_util::stream::once(async move { Ok::<_, std::io::Error>(body) });
        let mut multipart = multer::Multipart::new(stream, boundary);

        let mut submission = Self::default();
        while let Some(field) = multipart.next_field().await.map_err(malformed)? {
            let name = field.name().unwrap_or_default().to_owned();
            match name.as_str() {
                "text" => submission.form.text = field.text().await.map_err(malformed)?,
                "group" => submission.form.group = field.text().await.map_err(malformed)?,
                "image" => {
                    let file_name = field.file_name().unwrap_or_default().to_owned();
                    let bytes = field.bytes().await.map_err(malformed)?;
                    submission.image = Some(ImageUpload {
                        file_name,
                        bytes: bytes.to_vec(),
                    });
                }
                _ => {}
            }
        }
        Ok(submission)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{content_type, multipart_body};
    use super::*;
    use crate::domain::image::fixtures::TINY_GIF;
    use actix_web::test::TestRequest;

    async fn read(content_type: &str, body: Vec<u8>) -> Result<PostSubmission, Error> {
        let req = TestRequest::post()
            .insert_header((header::CONTENT_TYPE, content_type))
            .to_http_request();
        PostSubmission::read(&req, Bytes::from(body)).await
    }

    #[actix_web::test]
    async fn urlencoded_body_has_no_image() {
        let submission = read(
            "application/x-www-form-urlencoded",
            b"text=hello+world&group=3&extra=x".to_vec(),
        )
        .await
        .expect("urlencoded body");
        assert_eq!(submission.form.text, "hello world");
        assert_eq!(submission.form.group, "3");
        assert!(submission.image.is_none());
    }

    #[actix_web::test]
    async fn missing_fields_default_to_empty() {
        let submission = read("application/x-www-form-urlencoded", b"text=hi".to_vec())
            .await
            .expect("urlencoded body");
        assert!(submission.form.group.is_empty());
    }

    #[actix_web::test]
    async fn multipart_body_carries_fields_and_image() {
        let body = multipart_body(
            &[("text", "Привет"), ("group", "")],
            Some(("cat.gif", TINY_GIF)),
        );
        let submission = read(&content_type(), body).await.expect("multipart body");
        assert_eq!(submission.form.text, "Привет");
        let image = submission.image.as_ref().expect("image part");
        assert_eq!(image.file_name, "cat.gif");
        assert_eq!(image.bytes, TINY_GIF);

        let (form, draft) = submission.into_draft();
        assert_eq!(form.text, "Привет");
        assert!(draft.expect("valid draft").upload().is_some());
    }

    #[actix_web::test]
    async fn unchosen_file_input_yields_no_upload() {
        let body = multipart_body(&[("text", "hello")], Some(("", &b""[..])));
        let submission = read(&content_type(), body).await.expect("multipart body");
        let (_, draft) = submission.into_draft();
        assert!(draft.expect("valid draft").upload().is_none());
    }

    #[actix_web::test]
    async fn multipart_without_boundary_is_invalid_request() {
        let body = multipart_body(&[("text", "hello")], None);
        let err = read("multipart/form-data", body)
            .await
            .expect_err("boundary is required");
        assert_eq!(err.code(), crate::domain::ErrorCode::InvalidRequest);
    }
}
