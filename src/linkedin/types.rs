use serde::{Deserialize, Serialize};

pub const IMAGE_RECIPE: &str = "urn:li:digitalmediaRecipe:feedshare-image";
pub const UGC_RELATIONSHIP: &str = "urn:li:userGeneratedContent";

#[derive(Debug, Deserialize)]
pub struct UserInfo {
    pub sub: String,
}

#[derive(Debug, Deserialize)]
pub struct MeResponse {
    pub id: String,
}

// --- Asset upload registration ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUploadRequest {
    pub register_upload_request: RegisterUploadBody,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUploadBody {
    pub recipes: Vec<String>,
    pub owner: String,
    pub service_relationships: Vec<ServiceRelationship>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRelationship {
    pub relationship_type: String,
    pub identifier: String,
}

impl RegisterUploadRequest {
    pub fn feed_image(owner: &str) -> Self {
        Self {
            register_upload_request: RegisterUploadBody {
                recipes: vec![IMAGE_RECIPE.to_string()],
                owner: owner.to_string(),
                service_relationships: vec![ServiceRelationship {
                    relationship_type: "OWNER".to_string(),
                    identifier: UGC_RELATIONSHIP.to_string(),
                }],
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterUploadResponse {
    pub value: RegisterUploadValue,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUploadValue {
    pub upload_mechanism: UploadMechanism,
    pub asset: String,
}

#[derive(Debug, Deserialize)]
pub struct UploadMechanism {
    #[serde(rename = "com.linkedin.digitalmedia.uploading.MediaUploadHttpRequest")]
    pub http_request: UploadHttpRequest,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadHttpRequest {
    pub upload_url: String,
}

// --- UGC post ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UgcPost {
    pub author: String,
    pub lifecycle_state: String,
    pub specific_content: SpecificContent,
    pub visibility: Visibility,
}

#[derive(Debug, Serialize)]
pub struct SpecificContent {
    #[serde(rename = "com.linkedin.ugc.ShareContent")]
    pub share_content: ShareContent,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareContent {
    pub share_commentary: Text,
    pub share_media_category: String,
    pub media: Vec<ShareMedia>,
}

#[derive(Debug, Serialize)]
pub struct ShareMedia {
    pub status: String,
    pub media: String,
    pub title: Text,
}

#[derive(Debug, Serialize)]
pub struct Text {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct Visibility {
    #[serde(rename = "com.linkedin.ugc.MemberNetworkVisibility")]
    pub member_network_visibility: String,
}

impl UgcPost {
    /// Public, published post with a single image.
    pub fn image_share(author: &str, text: &str, asset: &str, media_title: &str) -> Self {
        Self {
            author: author.to_string(),
            lifecycle_state: "PUBLISHED".to_string(),
            specific_content: SpecificContent {
                share_content: ShareContent {
                    share_commentary: Text { text: text.to_string() },
                    share_media_category: "IMAGE".to_string(),
                    media: vec![ShareMedia {
                        status: "READY".to_string(),
                        media: asset.to_string(),
                        title: Text { text: media_title.to_string() },
                    }],
                },
            },
            visibility: Visibility {
                member_network_visibility: "PUBLIC".to_string(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UgcPostResponse {
    #[serde(default)]
    pub id: Option<String>,
}

/// What a successful publish produced.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedPost {
    pub author: String,
    pub asset: String,
    pub post_id: Option<String>,
}
