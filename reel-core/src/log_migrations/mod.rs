//! Event log schema, embedded at compile time
//!
//! Each entry is `(file name, sql)`. Entries are applied in order and
//! recorded in `sys_migrations`, so a new migration must be appended with
//! the next number.

pub const LOG_MIGRATIONS: &[(&str, &str)] = &[
    ("000_migrations.sql", include_str!("000_migrations.sql")),
    (
        "001_initial_schema.sql",
        include_str!("001_initial_schema.sql"),
    ),
];
