use crate::config::PacingConfig;
use crate::engine::pacing;
use crate::engine::participation::ParticipationSet;
use crate::together::{ContentSource, Fundraising};
use anyhow::{bail, Result};
use rand::seq::SliceRandom;

#[derive(Debug, Default, PartialEq)]
pub struct ActionSummary {
    /// Campaigns that got both the like and the comment.
    pub processed: usize,
    pub errors: Vec<String>,
}

/// Like and comment each campaign in order, pausing between actions.
///
/// A failed like skips the comment for that campaign; a failure of either
/// kind is recorded and followed by the back-off pause, and the campaign
/// stays unmarked so the next run retries it. Only a campaign that got
/// both actions is added to `seen`.
pub async fn participate(
    source: &dyn ContentSource,
    items: &[Fundraising],
    comments: &[String],
    pacing_cfg: &PacingConfig,
    seen: &mut ParticipationSet,
) -> Result<ActionSummary> {
    if comments.is_empty() {
        bail!("comment pool is empty, nothing to post");
    }

    let mut summary = ActionSummary::default();
    for item in items {
        pacing::action_pause(pacing_cfg).await;
        if let Err(e) = source.like(item.id).await {
            tracing::warn!(content_id = item.id, error = %e, "like failed");
            summary
                .errors
                .push(format!("{}: like failed: {}", item_label(item), e));
            pacing::failure_pause(pacing_cfg).await;
            continue;
        }

        pacing::action_pause(pacing_cfg).await;
        let message = pick_comment(comments);
        if let Err(e) = source.comment(item.id, &message).await {
            tracing::warn!(content_id = item.id, error = %e, "comment failed");
            summary
                .errors
                .push(format!("{}: comment failed: {}", item_label(item), e));
            pacing::failure_pause(pacing_cfg).await;
            continue;
        }

        seen.insert(item.id);
        summary.processed += 1;
        tracing::info!(content_id = item.id, title = %item.title, "participated");
    }

    Ok(summary)
}

fn pick_comment(comments: &[String]) -> String {
    comments
        .choose(&mut rand::thread_rng())
        .cloned()
        .unwrap_or_default()
}

// The listing sometimes omits titles; fall back to the id so the error
// still names the campaign.
fn item_label(item: &Fundraising) -> String {
    if item.title.is_empty() {
        item.id.to_string()
    } else {
        item.title.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::together::{ApiError, FundraisingPage, FundraisingStatus};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct ScriptedSource {
        fail_like: Vec<u64>,
        fail_comment: Vec<u64>,
        likes: Mutex<Vec<u64>>,
        comments_posted: Mutex<Vec<(u64, String)>>,
    }

    impl ScriptedSource {
        fn new() -> Self {
            Self {
                fail_like: vec![],
                fail_comment: vec![],
                likes: Mutex::new(Vec::new()),
                comments_posted: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ContentSource for ScriptedSource {
        async fn fundraising_page(
            &self,
            _page: u32,
            _size: u32,
        ) -> Result<FundraisingPage, ApiError> {
            unreachable!("participation never pages the listing")
        }

        async fn like(&self, content_id: u64) -> Result<(), ApiError> {
            self.likes.lock().unwrap().push(content_id);
            if self.fail_like.contains(&content_id) {
                return Err(ApiError::Status {
                    endpoint: "like",
                    status: 403,
                    body: "rejected".to_string(),
                });
            }
            Ok(())
        }

        async fn comment(&self, content_id: u64, message: &str) -> Result<(), ApiError> {
            if self.fail_comment.contains(&content_id) {
                return Err(ApiError::Status {
                    endpoint: "comment",
                    status: 500,
                    body: "rejected".to_string(),
                });
            }
            self.comments_posted
                .lock()
                .unwrap()
                .push((content_id, message.to_string()));
            Ok(())
        }
    }

    fn items(ids: &[u64]) -> Vec<Fundraising> {
        ids.iter()
            .map(|&id| Fundraising {
                id,
                title: format!("campaign {id}"),
                status: FundraisingStatus::Funding,
            })
            .collect()
    }

    fn pool() -> Vec<String> {
        vec!["응원합니다!".to_string()]
    }

    #[tokio::test]
    async fn test_every_item_gets_like_then_comment() {
        let source = ScriptedSource::new();
        let mut seen = ParticipationSet::new();
        let summary = participate(
            &source,
            &items(&[1, 2, 3]),
            &pool(),
            &PacingConfig::none(),
            &mut seen,
        )
        .await
        .unwrap();

        assert_eq!(summary.processed, 3);
        assert!(summary.errors.is_empty());
        assert_eq!(*source.likes.lock().unwrap(), vec![1, 2, 3]);
        assert_eq!(source.comments_posted.lock().unwrap().len(), 3);
        assert_eq!(seen.to_sorted_vec(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_failed_like_skips_comment_and_moves_on() {
        let mut source = ScriptedSource::new();
        source.fail_like = vec![2];
        let mut seen = ParticipationSet::new();
        let summary = participate(
            &source,
            &items(&[1, 2, 3]),
            &pool(),
            &PacingConfig::none(),
            &mut seen,
        )
        .await
        .unwrap();

        assert_eq!(summary.processed, 2);
        assert_eq!(summary.errors.len(), 1);
        assert!(summary.errors[0].contains("campaign 2"));
        assert!(summary.errors[0].contains("like failed"));
        let commented: Vec<u64> = source
            .comments_posted
            .lock()
            .unwrap()
            .iter()
            .map(|(id, _)| *id)
            .collect();
        assert_eq!(commented, vec![1, 3]);
        assert_eq!(seen.to_sorted_vec(), vec![1, 3]);
    }

    #[tokio::test]
    async fn test_failed_comment_leaves_campaign_unmarked() {
        let mut source = ScriptedSource::new();
        source.fail_comment = vec![2];
        let mut seen = ParticipationSet::new();
        let summary = participate(
            &source,
            &items(&[1, 2, 3]),
            &pool(),
            &PacingConfig::none(),
            &mut seen,
        )
        .await
        .unwrap();

        assert_eq!(summary.processed, 2);
        assert_eq!(summary.errors.len(), 1);
        assert!(summary.errors[0].contains("comment failed"));
        // 2 was liked but never marked; the next run picks it up again.
        assert!(source.likes.lock().unwrap().contains(&2));
        assert_eq!(seen.to_sorted_vec(), vec![1, 3]);
    }

    #[tokio::test]
    async fn test_untitled_campaign_errors_fall_back_to_the_id() {
        let mut source = ScriptedSource::new();
        source.fail_like = vec![42];
        let mut seen = ParticipationSet::new();
        let untitled = vec![Fundraising {
            id: 42,
            title: String::new(),
            status: FundraisingStatus::Funding,
        }];
        let summary = participate(
            &source,
            &untitled,
            &pool(),
            &PacingConfig::none(),
            &mut seen,
        )
        .await
        .unwrap();

        assert_eq!(summary.errors.len(), 1);
        assert!(summary.errors[0].starts_with("42: like failed"));
    }

    #[tokio::test]
    async fn test_empty_pool_aborts_before_any_request() {
        let source = ScriptedSource::new();
        let mut seen = ParticipationSet::new();
        let err = participate(
            &source,
            &items(&[1, 2]),
            &[],
            &PacingConfig::none(),
            &mut seen,
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("comment pool is empty"));
        assert!(source.likes.lock().unwrap().is_empty());
        assert!(seen.is_empty());
    }

    #[tokio::test]
    async fn test_processed_and_errors_cover_every_item() {
        let mut source = ScriptedSource::new();
        source.fail_like = vec![2];
        source.fail_comment = vec![4];
        let mut seen = ParticipationSet::new();
        let summary = participate(
            &source,
            &items(&[1, 2, 3, 4, 5]),
            &pool(),
            &PacingConfig::none(),
            &mut seen,
        )
        .await
        .unwrap();

        assert_eq!(summary.processed, 3);
        assert_eq!(summary.errors.len(), 2);
        assert_eq!(summary.processed + summary.errors.len(), 5);
        assert_eq!(seen.to_sorted_vec(), vec![1, 3, 5]);
    }
}
