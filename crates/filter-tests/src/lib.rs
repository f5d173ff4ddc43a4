#![allow(dead_code)]

use filter::RelationRegistry;
use rusqlite::Connection;

pub mod relations;
pub mod utils;

/// Schema of the blog fixture.
///
/// `comments.post_id` is nullable on purpose: an orphaned comment must not
/// turn a `NOT IN` membership test into an empty result.
pub const SCHEMA_DDL: &str = r#"
    CREATE TABLE posts (
        id INTEGER PRIMARY KEY,
        title TEXT NOT NULL,
        featured INTEGER NOT NULL DEFAULT 0,
        image TEXT,
        status TEXT NOT NULL DEFAULT 'published',
        author_id INTEGER
    );
    CREATE TABLE tags (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        slug TEXT NOT NULL,
        visibility TEXT NOT NULL DEFAULT 'public'
    );
    CREATE TABLE posts_tags (
        id INTEGER PRIMARY KEY,
        post_id INTEGER NOT NULL REFERENCES posts (id),
        tag_id INTEGER NOT NULL REFERENCES tags (id),
        sort_order INTEGER NOT NULL DEFAULT 0
    );
    CREATE TABLE comments (
        id INTEGER PRIMARY KEY,
        post_id INTEGER REFERENCES posts (id),
        status TEXT NOT NULL
    );
"#;

/// Eight posts. Post 6 has no image, post 5 is the only draft, post 7 only
/// carries the internal tag and post 8 has no tags at all. `sort_order = 0`
/// marks the primary tag of a post.
///
/// | post | featured | tags (by sort order)      | comments         |
/// |------|----------|---------------------------|------------------|
/// | 1    | yes      | classic, animal, cgi      | approved, spam   |
/// | 2    | yes      | classic, animal           | approved         |
/// | 3    | no       | cgi, classic              |                  |
/// | 4    | yes      | classic                   |                  |
/// | 5    | no       | animal                    | pending          |
/// | 6    | yes      | photo                     |                  |
/// | 7    | yes      | hash-internal             |                  |
/// | 8    | yes      |                           |                  |
pub const FIXTURE_DML: &str = r#"
    INSERT INTO posts (id, title, featured, image, status, author_id) VALUES
        (1, 'First post', 1, 'first.png', 'published', 1),
        (2, 'Second post', 1, 'second.png', 'published', 1),
        (3, 'Third post', 0, 'third.png', 'published', 2),
        (4, 'Fourth post', 1, 'fourth.png', 'published', 2),
        (5, 'Fifth post', 0, 'fifth.png', 'draft', 3),
        (6, 'Sixth post', 1, NULL, 'published', 3),
        (7, 'Seventh post', 1, 'seventh.png', 'published', 1),
        (8, 'Eighth post', 1, 'eighth.png', 'published', 2);

    INSERT INTO tags (id, name, slug, visibility) VALUES
        (1, 'Animal', 'animal', 'public'),
        (2, 'CGI', 'cgi', 'public'),
        (3, 'Classic', 'classic', 'public'),
        (4, '#internal', 'hash-internal', 'internal'),
        (5, 'Photo', 'photo', 'public');

    INSERT INTO posts_tags (id, post_id, tag_id, sort_order) VALUES
        (1, 1, 3, 0),
        (2, 1, 1, 1),
        (3, 1, 2, 2),
        (4, 2, 3, 0),
        (5, 2, 1, 1),
        (6, 3, 2, 0),
        (7, 3, 3, 1),
        (8, 4, 3, 0),
        (9, 5, 1, 0),
        (10, 6, 5, 0),
        (11, 7, 4, 0);

    INSERT INTO comments (id, post_id, status) VALUES
        (1, 1, 'approved'),
        (2, 1, 'spam'),
        (3, 2, 'approved'),
        (4, 5, 'pending'),
        (5, NULL, 'spam');
"#;

/// Relations of the blog fixture, in snake_case config form.
pub const RELATIONS_JSON: &str = r#"{
    "tags": {
        "tableName": "tags",
        "type": "manyToMany",
        "join_table": "posts_tags",
        "join_from": "post_id",
        "join_to": "tag_id"
    },
    "comments": {
        "tableName": "comments",
        "type": "oneToMany",
        "foreignKey": "post_id"
    }
}"#;

/// In-memory database loaded with the blog fixture.
pub fn fixture() -> Connection {
    let conn = Connection::open_in_memory().expect("open in-memory sqlite");
    conn.execute_batch(SCHEMA_DDL).expect("create fixture schema");
    conn.execute_batch(FIXTURE_DML).expect("load fixture rows");
    conn
}

pub fn registry() -> RelationRegistry {
    RelationRegistry::from_json(RELATIONS_JSON).expect("parse fixture relations")
}
