// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Comment persistence functions.

use rusqlite::{Connection, OptionalExtension, params};
use time::OffsetDateTime;
use tracing::{debug, info};

use helpdesk_domain::{Comment, Role};

use crate::error::PersistenceError;
use crate::timestamps;

/// Raw row shape for a comment before domain conversion.
type CommentRow = (i64, i64, i64, String, String, String);

fn row_to_comment(row: CommentRow) -> Result<Comment, PersistenceError> {
    let (comment_id, ticket_id, author_id, author_role_str, text, created_str) = row;
    let author_role: Role = author_role_str
        .parse()
        .map_err(|e| PersistenceError::CorruptRecord(format!("comment {comment_id}: {e}")))?;
    let created_at: OffsetDateTime = timestamps::from_storage(&created_str)?;
    Ok(Comment {
        comment_id: Some(comment_id),
        ticket_id,
        author_id,
        author_role,
        text,
        created_at,
    })
}

/// Persists a new comment with the author's role snapshot.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_comment(conn: &Connection, comment: &Comment) -> Result<Comment, PersistenceError> {
    let created_at_str: String = timestamps::to_storage(comment.created_at)?;

    conn.execute(
        "INSERT INTO comments (ticket_id, author_id, author_role, text, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            comment.ticket_id,
            comment.author_id,
            comment.author_role.as_str(),
            comment.text,
            created_at_str
        ],
    )?;

    let comment_id: i64 = conn.last_insert_rowid();
    info!(
        "Created comment {} on ticket {} by user {}",
        comment_id, comment.ticket_id, comment.author_id
    );

    let mut persisted: Comment = comment.clone();
    persisted.comment_id = Some(comment_id);
    Ok(persisted)
}

/// Retrieves a comment by id.
///
/// # Errors
///
/// Returns an error if the query fails. Returns `Ok(None)` if no
/// comment exists with that id.
pub fn get_comment(
    conn: &Connection,
    comment_id: i64,
) -> Result<Option<Comment>, PersistenceError> {
    debug!("Looking up comment: {}", comment_id);

    let row: Option<CommentRow> = conn
        .query_row(
            "SELECT comment_id, ticket_id, author_id, author_role, text, created_at
             FROM comments
             WHERE comment_id = ?1",
            params![comment_id],
            |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                ))
            },
        )
        .optional()?;

    row.map(row_to_comment).transpose()
}

/// Replaces a comment's text in place.
///
/// Edits do not version history and do not touch the role snapshot or
/// the creation timestamp.
///
/// # Errors
///
/// Returns `NotFound` if the comment does not exist, or an error if the
/// update fails.
pub fn update_comment_text(
    conn: &Connection,
    comment_id: i64,
    text: &str,
) -> Result<(), PersistenceError> {
    let rows: usize = conn.execute(
        "UPDATE comments SET text = ?1 WHERE comment_id = ?2",
        params![text, comment_id],
    )?;

    if rows == 0 {
        return Err(PersistenceError::NotFound(format!("comment {comment_id}")));
    }

    info!("Updated text of comment {}", comment_id);
    Ok(())
}

/// Checks whether any comment on a ticket carries the agent role
/// snapshot.
///
/// Drives the customer comment ordering rule; the snapshot is
/// authoritative even if the author's role has since changed.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn has_agent_comment(conn: &Connection, ticket_id: i64) -> Result<bool, PersistenceError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM comments WHERE ticket_id = ?1 AND author_role = 'agent'",
        params![ticket_id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}
