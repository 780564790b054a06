use crate::config::{DiscoveryConfig, PacingConfig};
use crate::engine::pacing;
use crate::engine::participation::ParticipationSet;
use crate::together::{ApiError, ContentSource, Fundraising};

/// Walk the listing newest-first and return every campaign ahead of the
/// first already-seen one.
///
/// The listing is sorted by start date, so the first seen id marks the
/// point where the previous run left off; anything after it on that page
/// or on later pages was covered before and is dropped unexamined. Any
/// API error aborts the walk and discards pages collected so far.
pub async fn collect_new(
    source: &dyn ContentSource,
    seen: &ParticipationSet,
    discovery: &DiscoveryConfig,
    pacing_cfg: &PacingConfig,
) -> Result<Vec<Fundraising>, ApiError> {
    let mut found = Vec::new();
    let mut page = 1u32;

    loop {
        let listing = source.fundraising_page(page, discovery.page_size).await?;
        if listing.content.is_empty() {
            tracing::debug!(page, "empty listing page, stopping discovery");
            break;
        }
        let more = listing.has_more(page);

        let mut hit_boundary = false;
        for item in listing.content {
            if seen.contains(item.id) {
                tracing::debug!(page, content_id = item.id, "reached seen campaign");
                hit_boundary = true;
                break;
            }
            found.push(item);
        }
        if hit_boundary || !more {
            break;
        }
        page += 1;
        if page > discovery.max_pages {
            tracing::debug!(max_pages = discovery.max_pages, "page ceiling reached");
            break;
        }
        pacing::page_pause(pacing_cfg).await;
    }

    Ok(found)
}
