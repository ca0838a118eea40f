//! Build a few statements, print them, and run them when `DATABASE_URL` is set.
//!
//! Run with: `cargo run --example basic -p pgstmt`

use pgstmt::{ConnectConfig, ExecConfig, Outcome, Record, Statement, StmtResult, connect};
use serde_json::json;
use std::time::Duration;

#[tokio::main]
async fn main() -> StmtResult<()> {
    let mut create = Statement::new();
    create.custom("CREATE TABLE IF NOT EXISTS notes (id INT PRIMARY KEY, body TEXT, tags JSONB)");

    let mut insert = Statement::new();
    insert.insert().table("notes").params(json!([
        {"id": 1, "body": "first", "tags": ["a"]},
        {"id": 2, "body": "second <draft>", "tags": []}
    ]));

    let mut update = Statement::new();
    update
        .update()
        .table("notes")
        .params(Record::new().with("body", "edited"))
        .where_clause(json!({"id": 1}));

    let mut select = Statement::new();
    select
        .select()
        .params(["id", "body"])
        .table("notes")
        .order("id")
        .limit(10);

    for stmt in [&create, &insert, &update, &select] {
        println!("{}", stmt.compile()?);
    }

    let Ok(config) = ConnectConfig::from_env() else {
        println!("DATABASE_URL not set; skipping execution");
        return Ok(());
    };

    let mut client = connect(&config).await?;
    let exec = ExecConfig::new().with_query_timeout(Duration::from_secs(5));

    for stmt in [&create, &insert, &update] {
        stmt.run_with(&mut client, &exec).await?;
    }

    if let Outcome::Selected(rows) = select.run_with(&mut client, &exec).await? {
        for row in rows {
            let id: i32 = row.get("id");
            let body: &str = row.get("body");
            println!("{id}: {body}");
        }
    }

    Ok(())
}
