//! Publication API client methods

use super::{ApiClient, ClientError};
use crate::types::{MessageResponse, NewPublication, PublicationPage};
use reqwest::Method;
use reqwest::multipart::{Form, Part};

impl ApiClient {
    /// Fetch one page of the publication feed (pages start at 1)
    pub async fn list_publications(
        &self,
        page: u32,
        limit: u32,
    ) -> Result<PublicationPage, ClientError> {
        let req = self
            .request(Method::GET, "/api/publications")
            .query(&[("page", page), ("limit", limit)]);
        self.execute(req).await
    }

    /// Create a publication as multipart form data
    pub async fn create_publication(
        &self,
        publication: NewPublication,
    ) -> Result<MessageResponse, ClientError> {
        let mut form = Form::new()
            .text("type", publication.kind)
            .text("title", publication.title)
            .text("description", publication.description)
            .text("location", publication.location)
            .text("date", publication.date);

        if let Some(image) = publication.image {
            let part = Part::bytes(image.bytes)
                .file_name(image.file_name)
                .mime_str(&image.mime_type)?;
            form = form.part("image", part);
        }

        let req = self
            .request(Method::POST, "/api/publications/create")
            .multipart(form);
        self.execute_ack(req).await
    }
}
