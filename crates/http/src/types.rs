//! Wire types exchanged with the backend API

use serde::{Deserialize, Serialize};
use url::Url;

const GOOGLE_MAPS_PREFIX: &str = "https://www.google.com/maps";

/// Username/password pair sent to login and register
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Successful login response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Access token
    pub token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

/// Generic acknowledgement carrying an optional human-readable message
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenResponse {
    pub access_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushTokenRequest {
    pub push_token: String,
}

/// Author summary embedded in a publication
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicationAuthor {
    pub username: String,
}

/// A publication as listed in the feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub location: String,
    /// Server-relative path of the attached image
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub user: Option<PublicationAuthor>,
}

impl Publication {
    /// Link that opens the publication's location in Google Maps
    pub fn maps_url(&self) -> String {
        if self.location.starts_with(GOOGLE_MAPS_PREFIX) {
            return self.location.clone();
        }
        let query = urlencoding::encode(&self.location);
        format!("{GOOGLE_MAPS_PREFIX}/search/?api=1&query={query}")
    }

    /// Absolute URL of the attached image, resolved against the API base
    pub fn image_url(&self, base: &Url) -> Option<Url> {
        self.image.as_deref().and_then(|path| base.join(path).ok())
    }

    pub fn author(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.username.as_str())
    }
}

/// One page of the publication feed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationPage {
    pub publications: Vec<Publication>,
    pub total_pages: u32,
    pub current_page: u32,
}

/// Image attached to a new publication
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Fields of a publication being created
#[derive(Debug, Clone)]
pub struct NewPublication {
    /// Publication category, sent as the `type` form field
    pub kind: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: String,
    pub image: Option<ImageUpload>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn publication(location: &str, image: Option<&str>) -> Publication {
        Publication {
            id: "p1".into(),
            title: "Feria".into(),
            description: "Feria de libros".into(),
            location: location.into(),
            image: image.map(String::from),
            user: None,
        }
    }

    #[test]
    fn test_publication_page_wire_format() {
        let page: PublicationPage = serde_json::from_value(json!({
            "publications": [{
                "_id": "65f0",
                "title": "Concierto",
                "description": "En el parque",
                "location": "Quito",
                "image": "/uploads/a.jpg",
                "user": { "username": "ana" }
            }],
            "totalPages": 3,
            "currentPage": 1
        }))
        .unwrap();

        assert_eq!(page.total_pages, 3);
        assert_eq!(page.current_page, 1);
        assert_eq!(page.publications[0].id, "65f0");
        assert_eq!(page.publications[0].author(), Some("ana"));
    }

    #[test]
    fn test_login_response_optional_fields() {
        let resp: LoginResponse = serde_json::from_value(json!({ "token": "t" })).unwrap();
        assert_eq!(resp.token, "t");
        assert!(resp.refresh_token.is_none());

        let resp: LoginResponse =
            serde_json::from_value(json!({ "token": "t", "refreshToken": "r", "username": "ana" }))
                .unwrap();
        assert_eq!(resp.refresh_token.as_deref(), Some("r"));
        assert_eq!(resp.username.as_deref(), Some("ana"));
    }

    #[test]
    fn test_refresh_request_is_camel_case() {
        let body = serde_json::to_value(RefreshTokenRequest {
            refresh_token: "r".into(),
        })
        .unwrap();
        assert_eq!(body, json!({ "refreshToken": "r" }));
    }

    #[test]
    fn test_maps_url_passes_through_maps_links() {
        let link = "https://www.google.com/maps/place/Quito";
        assert_eq!(publication(link, None).maps_url(), link);
    }

    #[test]
    fn test_maps_url_encodes_free_text() {
        assert_eq!(
            publication("Quito, Ecuador", None).maps_url(),
            "https://www.google.com/maps/search/?api=1&query=Quito%2C%20Ecuador"
        );
    }

    #[test]
    fn test_image_url_resolves_against_base() {
        let base = Url::parse("http://192.168.1.10:5000").unwrap();
        let url = publication("x", Some("/uploads/a.jpg")).image_url(&base).unwrap();
        assert_eq!(url.as_str(), "http://192.168.1.10:5000/uploads/a.jpg");

        assert!(publication("x", None).image_url(&base).is_none());
    }
}
