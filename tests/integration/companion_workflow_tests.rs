/*!
 * End-to-end tests for the companion-table strategy
 */

use crate::common::{post_def, posts_repository, seed_post};

use lingostore::database::models::EntityDraft;
use lingostore::database::coordinator::WriteCoordinator;

#[test]
fn test_translateAndRead_acrossLocales_shouldReturnEachLocalesValues() {
    let repo = posts_repository().unwrap();
    let post = post_def();
    seed_post(&repo, 1).unwrap();

    repo.translate(&post, 1, &[("title", "Post Title"), ("content", "Post content")], Some("en"))
        .unwrap();
    repo.translate(
        &post,
        1,
        &[("title", "عنوان المنشور"), ("content", "محتوى المنشور")],
        Some("ar"),
    )
    .unwrap();

    let row = repo.use_locale(&post, "en").find(&post, 1).unwrap().unwrap();
    assert_eq!(row.get_str("title"), Some("Post Title"));
    assert_eq!(row.get_str("content"), Some("Post content"));

    // The join is evaluated at query time: switching the locale takes
    // effect on the next query, not on rows already fetched.
    let row = repo.use_locale(&post, "ar").find(&post, 1).unwrap().unwrap();
    assert_eq!(row.get_str("title"), Some("عنوان المنشور"));
    assert_eq!(row.get_str("content"), Some("محتوى المنشور"));
}

#[test]
fn test_translate_existingLocale_shouldUpdateInPlace() {
    let repo = posts_repository().unwrap();
    let post = post_def();
    seed_post(&repo, 1).unwrap();

    repo.translate(&post, 1, &[("title", "Post Title"), ("content", "Post content")], Some("en"))
        .unwrap();
    repo.translate(&post, 1, &[("title", "Post Title Updated"), ("content", "Post content")], Some("en"))
        .unwrap();

    let row = repo.use_locale(&post, "en").find(&post, 1).unwrap().unwrap();
    assert_eq!(row.get_str("title"), Some("Post Title Updated"));
    assert_eq!(repo.translations_count(&post, 1).unwrap(), 1);
}

#[test]
fn test_deleteTranslation_perLocale_shouldShrinkRelation() {
    let repo = posts_repository().unwrap();
    let post = post_def();
    seed_post(&repo, 1).unwrap();

    repo.translate(&post, 1, &[("title", "Post Title")], Some("en")).unwrap();
    repo.translate(&post, 1, &[("title", "عنوان المنشور")], Some("ar")).unwrap();
    assert_eq!(repo.translations_count(&post, 1).unwrap(), 2);

    repo.delete_translation(&post, 1, &["en"]).unwrap();
    assert_eq!(repo.translations_count(&post, 1).unwrap(), 1);

    repo.delete_translation(&post, 1, &["ar"]).unwrap();
    assert_eq!(repo.translations_count(&post, 1).unwrap(), 0);
}

#[test]
fn test_createWithTranslations_shouldFlushStagedLocalesAfterInsert() {
    let repo = posts_repository().unwrap();
    let post = post_def();
    let coord = WriteCoordinator::new(repo);

    let mut draft = EntityDraft::new()
        .set("id", 1)
        .with_translations("en", &[("title", "Post Title"), ("content", "Post content")])
        .with_translations("ar", &[("title", "عنوان المنشور"), ("content", "محتوى المنشور")]);

    coord.create(&post, &mut draft).unwrap();

    // Exactly two companion rows keyed by the new id, buffer consumed.
    assert_eq!(coord.repository().translations_count(&post, 1).unwrap(), 2);
    assert!(draft.pending().is_empty());

    let repo = coord.repository();
    let row = repo.use_locale(&post, "en").find(&post, 1).unwrap().unwrap();
    assert_eq!(row.get_str("title"), Some("Post Title"));
    let row = repo.use_locale(&post, "ar").find(&post, 1).unwrap().unwrap();
    assert_eq!(row.get_str("title"), Some("عنوان المنشور"));
}

#[test]
fn test_deleteParent_shouldLeaveNoOrphanedTranslations() {
    let repo = posts_repository().unwrap();
    let post = post_def();
    let coord = WriteCoordinator::new(repo);

    let mut draft = EntityDraft::new()
        .set("id", 1)
        .with_translations("en", &[("title", "Post Title")])
        .with_translations("fr", &[("title", "Titre")]);
    coord.create(&post, &mut draft).unwrap();

    coord.delete(&post, 1).unwrap();

    assert_eq!(coord.repository().translations_count(&post, 1).unwrap(), 0);
    assert!(coord
        .repository()
        .find_without_translations(&post, 1)
        .unwrap()
        .is_none());
}

#[test]
fn test_find_withUntranslatedLocale_shouldKeepParentRowWithNulls() {
    let repo = posts_repository().unwrap();
    let post = post_def();
    seed_post(&repo, 1).unwrap();

    repo.translate(&post, 1, &[("title", "Post Title")], Some("en")).unwrap();

    let row = repo.use_locale(&post, "nl").find(&post, 1).unwrap().unwrap();
    assert_eq!(row.get_i64("id"), Some(1));
    assert!(row.is_null("title"));
    assert!(row.is_null("content"));
}

#[test]
fn test_activeLocale_shouldScopeQueriesWithoutExplicitArgument() {
    let repo = posts_repository().unwrap();
    let post = post_def();
    seed_post(&repo, 1).unwrap();

    // Writes through the active locale rather than an explicit argument.
    repo.context().set_active("posts", "ar");
    repo.translate(&post, 1, &[("title", "عنوان المنشور")], None).unwrap();

    let row = repo.find(&post, 1).unwrap().unwrap();
    assert_eq!(row.get_str("title"), Some("عنوان المنشور"));

    // The default locale applies to types that were never set.
    assert_eq!(repo.context().active("products"), "en");
}
