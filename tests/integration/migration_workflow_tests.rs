/*!
 * End-to-end tests for migration generation
 *
 * The generated migration must line up with the naming rules the
 * repository queries with, so the round trip here is: generate the SQL
 * file, apply it to a fresh database, then read and write translations
 * through the repository against the migrated schema.
 */

use crate::common::post_def;

use lingostore::app_config::Config;
use lingostore::database::connection::DatabaseConnection;
use lingostore::database::repository::CompanionRepository;
use lingostore::database::schema::table_exists;
use lingostore::errors::MigrationError;
use lingostore::locale::LocaleContext;
use lingostore::migration::generate_l10n_migration;

#[test]
fn test_generatedMigration_applied_shouldSupportRepositoryOperations() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::default();
    let post = post_def();

    let path = generate_l10n_migration(dir.path(), &post, &config, "INTEGER").unwrap();
    let ddl = std::fs::read_to_string(path).unwrap();

    let db = DatabaseConnection::new_in_memory().unwrap();
    db.execute(|conn| {
        conn.execute_batch("CREATE TABLE posts (id INTEGER PRIMARY KEY)")?;
        conn.execute_batch(&ddl)?;
        conn.execute("INSERT INTO posts (id) VALUES (1)", [])?;
        Ok(())
    })
    .unwrap();

    db.execute(|conn| {
        assert!(table_exists(conn, "posts_l10n")?);
        Ok(())
    })
    .unwrap();

    let ctx = LocaleContext::new(config.default_locale.clone());
    let repo = CompanionRepository::new(db, config, ctx);

    repo.translate(&post, 1, &[("title", "Post Title")], Some("en")).unwrap();
    let row = repo.use_locale(&post, "en").find(&post, 1).unwrap().unwrap();
    assert_eq!(row.get_str("title"), Some("Post Title"));
}

#[test]
fn test_generate_twiceForSameTable_shouldFailSecondTime() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::default();
    let post = post_def();

    generate_l10n_migration(dir.path(), &post, &config, "INTEGER").unwrap();
    let result = generate_l10n_migration(dir.path(), &post, &config, "INTEGER");

    assert!(matches!(result, Err(MigrationError::AlreadyExists(_))));

    // Exactly one migration file remains.
    let count = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "sql"))
        .count();
    assert_eq!(count, 1);
}

#[test]
fn test_generatedMigration_cascade_shouldDeleteTranslationsWithParent() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::default();
    let post = post_def();

    let path = generate_l10n_migration(dir.path(), &post, &config, "INTEGER").unwrap();
    let ddl = std::fs::read_to_string(path).unwrap();

    let db = DatabaseConnection::new_in_memory().unwrap();
    db.execute(|conn| {
        conn.execute_batch("CREATE TABLE posts (id INTEGER PRIMARY KEY)")?;
        conn.execute_batch(&ddl)?;
        conn.execute("INSERT INTO posts (id) VALUES (1)", [])?;
        Ok(())
    })
    .unwrap();

    let ctx = LocaleContext::new(config.default_locale.clone());
    let repo = CompanionRepository::new(db.clone(), config, ctx);
    repo.translate(&post, 1, &[("title", "Post Title")], Some("en")).unwrap();

    // The schema-level cascade also protects callers that bypass the
    // coordinator and delete the parent row directly.
    db.execute(|conn| {
        conn.execute("DELETE FROM posts WHERE id = 1", [])?;
        Ok(())
    })
    .unwrap();

    assert_eq!(repo.translations_count(&post, 1).unwrap(), 0);
}
