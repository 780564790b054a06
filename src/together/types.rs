use serde::{Deserialize, Serialize};

/// One fundraising campaign as returned by the listing endpoint. The
/// listing payload carries many more fields; we only keep what the
/// participation flow needs.
#[derive(Debug, Clone, Deserialize)]
pub struct Fundraising {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: FundraisingStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum FundraisingStatus {
    #[serde(rename = "STATUS_FUNDING")]
    Funding,
    /// Closed, scheduled, or anything the platform adds later.
    #[default]
    #[serde(other)]
    Other,
}

/// One page of the paginated `now` listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundraisingPage {
    #[serde(default)]
    pub content: Vec<Fundraising>,
    pub last: bool,
    pub total_pages: u32,
}

impl FundraisingPage {
    /// Whether another page follows `page` (1-based).
    pub fn has_more(&self, page: u32) -> bool {
        !self.last && page < self.total_pages
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    pub content_id: u64,
    pub content_type: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_has_more() {
        let page = FundraisingPage {
            content: vec![],
            last: false,
            total_pages: 3,
        };
        assert!(page.has_more(1));
        assert!(page.has_more(2));
        assert!(!page.has_more(3));

        let last = FundraisingPage {
            content: vec![],
            last: true,
            total_pages: 3,
        };
        assert!(!last.has_more(1));
    }

    #[test]
    fn test_unknown_status_maps_to_other() {
        let item: Fundraising =
            serde_json::from_str(r#"{"id":7,"title":"x","status":"STATUS_CLOSED"}"#).unwrap();
        assert_eq!(item.status, FundraisingStatus::Other);

        let funding: Fundraising =
            serde_json::from_str(r#"{"id":8,"status":"STATUS_FUNDING"}"#).unwrap();
        assert_eq!(funding.status, FundraisingStatus::Funding);
        assert!(funding.title.is_empty());
    }
}
