/*!
 * End-to-end tests for the embedded strategy
 *
 * The embedded strategy stores every locale's value inside the parent row
 * itself, so these tests drive an EmbeddedRecord against a plain parent
 * table: stage writes through the codec, persist the staged columns with
 * ordinary SQL, reload and read per locale.
 */

use std::collections::HashMap;

use lingostore::database::connection::DatabaseConnection;
use lingostore::embedded::EmbeddedRecord;
use lingostore::errors::CodecError;
use lingostore::locale::LocaleContext;

fn posts_db() -> DatabaseConnection {
    let db = DatabaseConnection::new_in_memory().unwrap();
    db.execute(|conn| {
        conn.execute_batch(
            "CREATE TABLE posts (id INTEGER PRIMARY KEY, title TEXT, content TEXT)",
        )?;
        conn.execute("INSERT INTO posts (id) VALUES (1)", [])?;
        Ok(())
    })
    .unwrap();
    db
}

fn translatable() -> Vec<String> {
    vec!["title".to_string(), "content".to_string()]
}

/// Persist a record's staged columns into the posts row
fn persist(db: &DatabaseConnection, record: &mut EmbeddedRecord, id: i64) {
    let staged = record.flush_dirty();
    db.execute(|conn| {
        for (column, value) in &staged {
            let sql = format!("UPDATE posts SET {} = ?1 WHERE id = ?2", column);
            conn.execute(&sql, rusqlite::params![value, id])?;
        }
        Ok(())
    })
    .unwrap();
}

/// Load the posts row back into a record
fn reload(db: &DatabaseConnection, id: i64) -> EmbeddedRecord {
    let stored: HashMap<String, Option<String>> = db
        .execute(|conn| {
            Ok(conn.query_row(
                "SELECT title, content FROM posts WHERE id = ?1",
                [id],
                |row| {
                    Ok(HashMap::from([
                        ("title".to_string(), row.get(0)?),
                        ("content".to_string(), row.get(1)?),
                    ]))
                },
            )?)
        })
        .unwrap();

    EmbeddedRecord::from_stored("posts", translatable(), stored)
}

#[test]
fn test_writeReadPersistReload_acrossLocales_shouldKeepEveryLocale() {
    let db = posts_db();
    let ctx = LocaleContext::new("en");
    let mut record = reload(&db, 1);

    record.set("title", Some("Post Title"), &ctx).unwrap();
    record.set("content", Some("Post content"), &ctx).unwrap();
    ctx.set_active("posts", "ar");
    record.set("title", Some("عنوان المنشور"), &ctx).unwrap();
    record.set("content", Some("محتوى المنشور"), &ctx).unwrap();

    persist(&db, &mut record, 1);

    // A fresh load sees both locales in the same stored cell.
    let reloaded = reload(&db, 1);
    ctx.set_active("posts", "en");
    assert_eq!(reloaded.get("title", &ctx).unwrap().as_deref(), Some("Post Title"));

    // Switching the active locale needs no new query for this strategy.
    ctx.set_active("posts", "ar");
    assert_eq!(
        reloaded.get("title", &ctx).unwrap().as_deref(),
        Some("عنوان المنشور")
    );
    assert_eq!(
        reloaded.get("content", &ctx).unwrap().as_deref(),
        Some("محتوى المنشور")
    );
}

#[test]
fn test_updateOneLocale_afterPersist_shouldNotEraseOthers() {
    let db = posts_db();
    let ctx = LocaleContext::new("en");

    let mut record = reload(&db, 1);
    record.set("title", Some("Post Title"), &ctx).unwrap();
    ctx.set_active("posts", "ar");
    record.set("title", Some("عنوان المنشور"), &ctx).unwrap();
    persist(&db, &mut record, 1);

    // Second save cycle touches only the English value.
    let mut record = reload(&db, 1);
    ctx.set_active("posts", "en");
    record.set("title", Some("Updated Post Title"), &ctx).unwrap();
    persist(&db, &mut record, 1);

    let reloaded = reload(&db, 1);
    assert_eq!(
        reloaded.get("title", &ctx).unwrap().as_deref(),
        Some("Updated Post Title")
    );
    ctx.set_active("posts", "ar");
    assert_eq!(
        reloaded.get("title", &ctx).unwrap().as_deref(),
        Some("عنوان المنشور")
    );
}

#[test]
fn test_unwrittenLocale_shouldReadAsNone() {
    let db = posts_db();
    let ctx = LocaleContext::new("en");

    let mut record = reload(&db, 1);
    record.set("title", Some("Post Title"), &ctx).unwrap();
    persist(&db, &mut record, 1);

    let reloaded = reload(&db, 1);
    ctx.set_active("posts", "fr");
    assert_eq!(reloaded.get("title", &ctx).unwrap(), None);
}

#[test]
fn test_corruptedStoredValue_shouldSurfaceMalformedData() {
    let db = posts_db();
    let ctx = LocaleContext::new("en");

    db.execute(|conn| {
        conn.execute("UPDATE posts SET title = 'not json' WHERE id = 1", [])?;
        Ok(())
    })
    .unwrap();

    let record = reload(&db, 1);
    let err = record.get("title", &ctx).unwrap_err();
    assert!(matches!(err, CodecError::MalformedData { .. }));
}
