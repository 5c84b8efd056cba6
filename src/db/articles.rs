use anyhow::{Context, Result};
use rusqlite::{params, Connection, Row};

use crate::models::{Article, NewArticle};

/// Escape character used in `LIKE` patterns so user input is always matched
/// literally.
const LIKE_ESCAPE: char = '\\';

/// Append a new article. Values are written exactly as given; empty strings are
/// not rejected here. The returned struct carries the id SQLite assigned.
pub fn insert_article(conn: &Connection, article: &NewArticle) -> Result<Article> {
    conn.execute(
        "INSERT INTO articles (title, content, category, tags, image_path)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            article.title,
            article.content,
            article.category,
            article.tags.as_deref(),
            article.image_path.as_deref(),
        ],
    )
    .context("failed to insert article")?;

    let id = conn.last_insert_rowid();
    Ok(article.clone().into_article(id))
}

/// Find every article whose title or content contains `query`. Matching
/// follows SQLite `LIKE`, so ASCII letters compare case-insensitively. An empty
/// query returns the whole table. Results come back in insertion order.
pub fn search_articles(conn: &Connection, query: &str) -> Result<Vec<Article>> {
    let mut stmt = conn
        .prepare(
            r"SELECT id, title, content, category, tags, image_path
              FROM articles
              WHERE title LIKE ?1 ESCAPE '\' OR content LIKE ?1 ESCAPE '\'
              ORDER BY id",
        )
        .context("failed to prepare article search")?;

    let articles = stmt
        .query_map([like_pattern(query)], article_from_row)
        .context("failed to run article search")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect articles")?;

    Ok(articles)
}

/// Total number of stored articles.
pub fn count_articles(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM articles", [], |row| row.get(0))
        .context("failed to count articles")
}

fn article_from_row(row: &Row<'_>) -> rusqlite::Result<Article> {
    Ok(Article {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        category: row.get(3)?,
        tags: row.get(4)?,
        image_path: row.get(5)?,
    })
}

/// Wrap `query` in `%` wildcards after escaping any `LIKE` metacharacters it
/// contains.
fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for ch in query.chars() {
        if matches!(ch, '%' | '_') || ch == LIKE_ESCAPE {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
