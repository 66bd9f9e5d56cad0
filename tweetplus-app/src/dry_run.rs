use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tweetplus_social::{Media, PostedStatus, SocialError, StatusPoster};

/// Logs what would be posted and reports success.
#[derive(Debug, Default)]
pub struct DryRunPoster {
    posted: AtomicUsize,
}

impl DryRunPoster {
    fn accept(&self, status: &str) -> PostedStatus {
        let n = self.posted.fetch_add(1, Ordering::Relaxed) + 1;
        PostedStatus {
            id: format!("dry-run-{n}"),
            text: status.to_string(),
        }
    }
}

#[async_trait]
impl StatusPoster for DryRunPoster {
    async fn post_update(&self, status: &str) -> Result<PostedStatus, SocialError> {
        tracing::info!(%status, "dry_run.post_update");
        Ok(self.accept(status))
    }

    async fn post_media(&self, status: &str, media: &mut Media) -> Result<PostedStatus, SocialError> {
        tracing::info!(%status, media = %media.describe(), "dry_run.post_media");
        Ok(self.accept(status))
    }
}
