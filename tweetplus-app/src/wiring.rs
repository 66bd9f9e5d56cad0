use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tweetplus_admin::{MediaResolver, TextField, TweetAdmin, TweetDispatcher};
use tweetplus_config::TweetplusConfig;
use tweetplus_social::StatusPoster;
use tweetplus_social::twitter::TwitterApi;

use crate::dry_run::DryRunPoster;
use crate::items::JsonItem;

/// Which item fields feed the tweet text and image.
#[derive(Debug, Clone, Default)]
pub struct FieldSelection {
    pub text: Option<String>,
    pub image: Option<String>,
}

fn make_poster(cfg: &TweetplusConfig, dry_run: bool) -> Result<Option<Arc<dyn StatusPoster>>> {
    if dry_run {
        return Ok(Some(Arc::new(DryRunPoster::default())));
    }
    let Some(twitter) = cfg.twitter_credentials() else {
        tracing::warn!("twitter credentials missing, tweeting disabled");
        return Ok(None);
    };
    let api = TwitterApi::with_base(twitter.access_token.clone(), &twitter.api_base)?
        .with_timeout(Duration::from_secs(twitter.timeout_secs));
    tracing::info!(api_base = %twitter.api_base, "twitter client ready");
    Ok(Some(Arc::new(api)))
}

pub fn build_admin(
    cfg: &TweetplusConfig,
    fields: FieldSelection,
    dry_run: bool,
) -> Result<TweetAdmin<JsonItem>> {
    let dispatcher = make_poster(cfg, dry_run)?.map(|poster| {
        let mut dispatcher = TweetDispatcher::new(poster)
            .with_settings(cfg.dispatch)
            .with_media(MediaResolver::from_settings(&cfg.media));
        if let Some(name) = fields.text {
            dispatcher = dispatcher
                .with_text_field(TextField::accessor(move |item: &JsonItem| item.field_text(&name)));
        }
        if let Some(name) = fields.image {
            dispatcher = dispatcher.with_image_field(move |item: &JsonItem| item.field_image(&name));
        }
        dispatcher
    });
    Ok(TweetAdmin::new(dispatcher).with_text_or_image(cfg.admin.text_or_image))
}
