//! Schema steps for the portfolio database.
//!
//! Step 1 creates `slots` for the local backend, step 2 creates `documents`
//! for the shared document service. Each step owns exactly one table.
//!
//! # Invariants
//! - Step versions are strictly increasing and mirrored to `PRAGMA user_version`.
//! - Pending steps run in one transaction.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::{Connection, OptionalExtension};

#[derive(Debug, Clone, Copy)]
struct SchemaStep {
    version: u32,
    table: &'static str,
    sql: &'static str,
}

const STEPS: &[SchemaStep] = &[
    SchemaStep {
        version: 1,
        table: "slots",
        sql: include_str!("0001_slots.sql"),
    },
    SchemaStep {
        version: 2,
        table: "documents",
        sql: include_str!("0002_documents.sql"),
    },
];

/// Schema version written by this build.
pub fn latest_version() -> u32 {
    STEPS.last().map_or(0, |step| step.version)
}

/// Runs the pending schema steps, then checks every backend table is present.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let found = schema_version(conn)?;
    let supported = latest_version();
    if found > supported {
        return Err(DbError::SchemaTooNew { found, supported });
    }

    if found < supported {
        let tx = conn.transaction()?;
        for step in STEPS.iter().filter(|step| step.version > found) {
            tx.execute_batch(step.sql)?;
            tx.execute_batch(&format!("PRAGMA user_version = {};", step.version))?;
        }
        tx.commit()?;
        info!("event=db_migrate module=db status=ok from_version={found} to_version={supported}");
    }

    for step in STEPS {
        if !table_exists(conn, step.table)? {
            return Err(DbError::MissingTable(step.table));
        }
    }
    Ok(())
}

fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?)
}

fn table_exists(conn: &Connection, table: &str) -> DbResult<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1;",
            [table],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}
