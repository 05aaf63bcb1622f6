use serde::{Deserialize, Serialize};

/// Launcher metadata returned by the remote API.
///
/// Fetched as one document per session and never patched in place; a hot
/// reload swaps in a freshly fetched value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(rename = "blogPosts", default)]
    pub blogposts: Vec<Blogpost>,

    #[serde(default)]
    pub alert: Option<Alert>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blogpost {
    pub title: String,

    #[serde(default)]
    pub excerpt: String,

    /// Missing for posts that only the official launcher can render
    #[serde(default)]
    pub image: Option<String>,

    #[serde(default)]
    pub link: Option<String>,

    #[serde(default)]
    pub author: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub name: String,
    pub text: String,

    #[serde(default)]
    pub color: Option<String>,

    #[serde(default)]
    pub dismissable: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_api_metadata() {
        let json = r#"{
            "blogPosts": [
                {"title": "Patch notes", "excerpt": "New maps", "image": "https://cdn/img.png"},
                {"title": "Store sale"}
            ],
            "alert": {"name": "Maintenance", "text": "Servers restart at 03:00"},
            "launcherVersion": "3.2.1"
        }"#;

        let metadata: Metadata = serde_json::from_str(json).unwrap();

        assert_eq!(metadata.blogposts.len(), 2);
        assert_eq!(metadata.blogposts[1].image, None);
        assert_eq!(metadata.alert.unwrap().name, "Maintenance");
    }

    #[test]
    fn test_parse_empty_metadata() {
        let metadata: Metadata = serde_json::from_str("{}").unwrap();
        assert!(metadata.blogposts.is_empty());
        assert!(metadata.alert.is_none());
    }
}
