mod common;

use std::sync::Arc;

use common::{Article, ScriptedPoster, init_test_tracing};
use tweetplus_admin::admin::{ACTION_NAME, TWEET_SENT};
use tweetplus_admin::{
    CollectingNotifier, ImageRef, MediaResolver, Notification, TweetAdmin, TweetDispatcher,
    TweetFlags,
};
use tweetplus_common::NoticeLevel;
use tweetplus_social::poster::ApiErrorDetail;
use tweetplus_social::{SocialError, StatusPoster};

fn admin(poster: &Arc<ScriptedPoster>) -> TweetAdmin<Article> {
    init_test_tracing();
    let poster: Arc<dyn StatusPoster> = poster.clone();
    let dispatcher = TweetDispatcher::new(poster)
        .with_media(MediaResolver::default())
        .with_image_field(|a: &Article| ImageRef::parse(&a.image));
    TweetAdmin::new(Some(dispatcher))
}

const SEND: TweetFlags = TweetFlags {
    send_tweet: true,
    tweet_image: false,
};

#[test]
fn status_field_gains_both_checkboxes() {
    let poster = Arc::new(ScriptedPoster::new());
    let html = admin(&poster).formfield_for_dbfield("status", "<select></select>".into());

    assert!(html.starts_with("<select></select>"));
    assert!(html.contains("<div class='send_tweet_container'>"));
    assert!(html.contains("name='send_tweet' type='checkbox'"));
    assert!(html.contains("for='id_send_tweet'>Send Tweet</label>"));
    assert!(html.contains("name='tweet_image' type='checkbox'"));
    assert!(html.contains(">Tweet with Image</label>"));
    assert!(html.find("send_tweet'").unwrap() < html.find("tweet_image'").unwrap());
}

#[test]
fn image_only_mode_renders_single_checkbox() {
    let poster = Arc::new(ScriptedPoster::new());
    let html = admin(&poster)
        .with_text_or_image(false)
        .formfield_for_dbfield("status", String::new());

    assert!(!html.contains("Send Tweet"));
    assert!(html.contains("Tweet with Image"));
}

#[test]
fn other_fields_and_disabled_admin_are_untouched() {
    let poster = Arc::new(ScriptedPoster::new());
    assert_eq!(
        admin(&poster).formfield_for_dbfield("title", "<input>".into()),
        "<input>"
    );
    assert_eq!(
        TweetAdmin::<Article>::disabled().formfield_for_dbfield("status", "<select>".into()),
        "<select>"
    );
}

#[test]
fn flags_follow_checkbox_semantics() {
    let flags = TweetFlags::from_form([("send_tweet", "on"), ("tweet_image", "")]);
    assert_eq!(flags, SEND);
    assert_eq!(TweetFlags::from_form(Vec::<(&str, &str)>::new()), TweetFlags::default());
}

#[test]
fn action_is_offered_only_with_credentials() {
    let poster = Arc::new(ScriptedPoster::new());
    let base = vec!["delete_selected".to_string()];

    assert_eq!(
        admin(&poster).actions(base.clone()),
        vec![ACTION_NAME.to_string(), "delete_selected".to_string()]
    );
    assert_eq!(TweetAdmin::<Article>::disabled().actions(base.clone()), base);
}

#[tokio::test]
async fn save_with_send_tweet_posts_and_notifies() {
    let poster = Arc::new(ScriptedPoster::new());
    let notifier = CollectingNotifier::new();
    let mut item = Article::published("Saved").with_image("https://cdn.example.com/i.png");

    let outcome = admin(&poster)
        .save_model(&mut item, SEND, &notifier)
        .await
        .expect("tweet attempted");

    assert!(outcome.succeeded());
    let calls = poster.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].media, None, "image only with tweet_image");
    assert_eq!(
        notifier.notifications(),
        vec![Notification {
            level: NoticeLevel::Success,
            message: TWEET_SENT.to_string()
        }]
    );
}

#[tokio::test]
async fn save_with_image_attaches_it() {
    let poster = Arc::new(ScriptedPoster::new());
    let notifier = CollectingNotifier::new();
    let mut item = Article::published("Saved").with_image("https://cdn.example.com/i.png");
    let flags = TweetFlags {
        send_tweet: true,
        tweet_image: true,
    };

    admin(&poster).save_model(&mut item, flags, &notifier).await;
    assert_eq!(
        poster.calls()[0].media.as_deref(),
        Some("https://cdn.example.com/i.png")
    );
}

#[tokio::test]
async fn image_only_mode_tweets_on_image_flag() {
    let poster = Arc::new(ScriptedPoster::new());
    let notifier = CollectingNotifier::new();
    let admin = admin(&poster).with_text_or_image(false);
    let mut item = Article::published("Picture post");

    assert!(admin.save_model(&mut item, SEND, &notifier).await.is_none());
    assert!(poster.calls().is_empty());

    let flags = TweetFlags {
        send_tweet: false,
        tweet_image: true,
    };
    assert!(admin.save_model(&mut item, flags, &notifier).await.is_some());
    assert_eq!(poster.calls().len(), 1);
}

#[tokio::test]
async fn save_skips_drafts_and_disabled_admin() {
    let poster = Arc::new(ScriptedPoster::new());
    let notifier = CollectingNotifier::new();

    let mut draft = Article::draft("Draft");
    assert!(admin(&poster).save_model(&mut draft, SEND, &notifier).await.is_none());

    let mut published = Article::published("Published");
    let disabled = TweetAdmin::<Article>::disabled();
    assert!(disabled.save_model(&mut published, SEND, &notifier).await.is_none());

    assert!(poster.calls().is_empty());
    assert!(notifier.notifications().is_empty());
}

#[tokio::test]
async fn save_failure_is_reported_as_error() {
    let poster = Arc::new(ScriptedPoster::new().then_fail(SocialError::Api {
        status: 403,
        errors: vec![ApiErrorDetail::from_message("Status is a duplicate.")],
    }));
    let notifier = CollectingNotifier::new();
    let mut item = Article::published("Again");

    let outcome = admin(&poster).save_model(&mut item, SEND, &notifier).await.unwrap();
    assert!(!outcome.succeeded());
    let notes = notifier.notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, NoticeLevel::Error);
    assert_eq!(notes[0].message, "There was an error: Status is a duplicate.");
}

#[tokio::test]
async fn bulk_action_dispatches_and_reports() {
    let poster = Arc::new(ScriptedPoster::new());
    let notifier = CollectingNotifier::new();
    let mut items = vec![Article::published("A"), Article::draft("B")];

    let report = admin(&poster)
        .tweet_item(&mut items, &notifier)
        .await
        .unwrap();
    assert_eq!(report.sent_count(), 1);
    assert_eq!(notifier.count(NoticeLevel::Warning), 1);

    let disabled = TweetAdmin::<Article>::disabled();
    assert!(disabled.tweet_item(&mut items, &notifier).await.is_none());
}
