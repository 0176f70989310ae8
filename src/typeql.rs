//! TypeQL query text used by the sample.
//!
//! Queries are built by substituting values into single-quoted string
//! literals. Substituted values are escaped so they cannot end the literal.

/// Count all users. The seeded dataset has exactly [`EXPECTED_USER_COUNT`].
pub const COUNT_USERS: &str = "match $u isa user; get $u; count;";

/// Number of users in the seeded dataset.
pub const EXPECTED_USER_COUNT: i64 = 3;

/// Fetch every user's full name and email as JSON.
pub const FETCH_USERS: &str = "match $u isa user; fetch $u: full-name, email;";

/// Escape a value for use inside a single-quoted TypeQL string literal.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            c => out.push(c),
        }
    }
    out
}

/// Insert a person with a full name and email. Binds `$fn` and `$e`.
pub fn insert_user(full_name: &str, email: &str) -> String {
    format!(
        "insert $p isa person, has full-name $fn, has email $e; $fn == '{}'; $e == '{}';",
        escape(full_name),
        escape(email)
    )
}

/// Match users by full name.
pub fn find_user(full_name: &str) -> String {
    format!("match $u isa user, has full-name '{}'; get;", escape(full_name))
}

/// Paths of every object the named user may view, sorted. Binds `$fp`.
pub fn files_viewable_by(full_name: &str) -> String {
    format!(
        r#"
match
$fn == '{}';
$u isa user, has full-name $fn;
$p($u, $pa) isa permission;
$o isa object, has path $fp;
$pa($o, $va) isa access;
$va isa action, has name 'view_file';
get $fp; sort $fp asc;
"#,
        escape(full_name)
    )
}

/// Replace a file's path attribute.
pub fn update_file_path(old_path: &str, new_path: &str) -> String {
    format!(
        r#"
match
$f isa file, has path $old_path;
$old_path = '{}';
delete
$f has $old_path;
insert
$f has path $new_path;
$new_path = '{}';
"#,
        escape(old_path),
        escape(new_path)
    )
}

/// Match files by path.
pub fn find_file(path: &str) -> String {
    format!("match $f isa file, has path '{}'; get;", escape(path))
}

/// Delete files by path.
pub fn delete_file(path: &str) -> String {
    format!(
        "match $f isa file, has path '{}'; delete $f isa file;",
        escape(path)
    )
}
