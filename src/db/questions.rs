//! Read access to the question corpus.

use rusqlite::{params, Connection, OptionalExtension, Result};
use std::collections::{BTreeSet, HashMap, HashSet};

use crate::domain::{parse_tags, Question};

/// Insert a corpus row. Only used when building a corpus file.
pub fn insert_question(conn: &Connection, question: &Question) -> Result<()> {
  conn.execute(
    r#"
    INSERT INTO questions (question_id, question_text, pack, version_added, tags)
    VALUES (?1, ?2, ?3, ?4, ?5)
    "#,
    params![
      question.id,
      question.text,
      question.pack,
      question.version_added,
      question.tags_column(),
    ],
  )?;
  Ok(())
}

pub fn get_question_by_id(conn: &Connection, id: i64) -> Result<Option<Question>> {
  conn
    .query_row(
      r#"
      SELECT question_id, question_text, pack, version_added, tags
      FROM questions WHERE question_id = ?1
      "#,
      params![id],
      row_to_question,
    )
    .optional()
}

pub fn get_corpus_size(conn: &Connection) -> Result<i64> {
  conn.query_row("SELECT COUNT(*) FROM questions", [], |row| row.get(0))
}

/// Every corpus id. Ids start at 1 but are not assumed contiguous.
pub fn get_all_question_ids(conn: &Connection) -> Result<HashSet<i64>> {
  let mut stmt = conn.prepare("SELECT question_id FROM questions WHERE question_id > 0")?;
  let ids = stmt
    .query_map([], |row| row.get(0))?
    .collect::<Result<HashSet<i64>>>()?;
  Ok(ids)
}

/// Map of tag label → ids carrying it
pub fn get_tag_index(conn: &Connection) -> Result<HashMap<String, HashSet<i64>>> {
  let mut stmt = conn.prepare("SELECT question_id, tags FROM questions WHERE tags != ''")?;
  let rows = stmt
    .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?
    .collect::<Result<Vec<_>>>()?;

  let mut index: HashMap<String, HashSet<i64>> = HashMap::new();
  for (id, raw) in rows {
    for tag in parse_tags(&raw) {
      index.entry(tag).or_default().insert(id);
    }
  }
  Ok(index)
}

/// Every distinct tag label in the corpus
pub fn get_tag_universe(conn: &Connection) -> Result<BTreeSet<String>> {
  Ok(get_tag_index(conn)?.into_keys().collect())
}

fn row_to_question(row: &rusqlite::Row) -> Result<Question> {
  let tags: String = row.get(4)?;
  Ok(Question {
    id: row.get(0)?,
    text: row.get(1)?,
    pack: row.get(2)?,
    version_added: row.get(3)?,
    tags: parse_tags(&tags),
  })
}
