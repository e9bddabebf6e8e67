//! Batched INSERT of fabricated posts.

use crate::error::PostLoadError;
use crate::fabricate::Post;
use mysql_async::{prelude::*, Conn, Params, Value};

/// Rows per full INSERT statement.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Columns of the Posts insert, in statement order.
const POST_COLUMNS: [&str; 18] = [
    "Id",
    "CreateAt",
    "UpdateAt",
    "EditAt",
    "DeleteAt",
    "IsPinned",
    "UserId",
    "ChannelId",
    "RootId",
    "ParentId",
    "OriginalId",
    "Message",
    "Type",
    "Props",
    "Hashtags",
    "Filenames",
    "FileIds",
    "HasReactions",
];

/// Build the multi-row INSERT statement for `rows` posts.
///
/// The statement text for the full batch size is built once per run and
/// shared by every worker; per-connection statement caching in the driver
/// makes it a prepared statement on first use.
pub fn build_insert_sql(rows: usize) -> String {
    let placeholders: Vec<&str> = POST_COLUMNS.iter().map(|_| "?").collect();
    let row_template = format!("({})", placeholders.join(", "));
    let rows_template: Vec<&str> = (0..rows).map(|_| row_template.as_str()).collect();

    format!(
        "INSERT INTO Posts ({}) VALUES {}",
        POST_COLUMNS.join(", "),
        rows_template.join(", ")
    )
}

/// Bind one post's column values in statement order.
fn push_post_params(params: &mut Vec<Value>, post: &Post) {
    params.push(Value::from(post.id.as_str()));
    params.push(Value::from(post.create_at)); // CreateAt
    params.push(Value::from(post.create_at)); // UpdateAt
    params.push(Value::from(0i64)); // EditAt
    params.push(Value::from(0i64)); // DeleteAt
    params.push(Value::from(0i32)); // IsPinned
    params.push(Value::from(post.user_id.as_str()));
    params.push(Value::from(post.channel_id.as_str()));
    params.push(Value::from(post.root_id.as_str())); // RootId
    params.push(Value::from(post.root_id.as_str())); // ParentId
    params.push(Value::from("")); // OriginalId
    params.push(Value::from(post.message.as_str()));
    params.push(Value::from("")); // Type
    params.push(Value::from("{}")); // Props
    params.push(Value::from("")); // Hashtags
    params.push(Value::from("[]")); // Filenames
    params.push(Value::from("[]")); // FileIds
    params.push(Value::from(0i32)); // HasReactions
}

/// Insert one batch of posts. `sql` must carry exactly `posts.len()`
/// row templates.
pub async fn insert_posts(
    conn: &mut Conn,
    sql: &str,
    posts: &[Post],
) -> Result<u64, PostLoadError> {
    if posts.is_empty() {
        return Ok(0);
    }

    let mut params: Vec<Value> = Vec::with_capacity(posts.len() * POST_COLUMNS.len());
    for post in posts {
        push_post_params(&mut params, post);
    }

    conn.exec_drop(sql, Params::Positional(params)).await?;
    Ok(posts.len() as u64)
}
