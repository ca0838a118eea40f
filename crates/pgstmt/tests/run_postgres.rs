//! Round trips against a live database. Skipped unless `DATABASE_URL` is set.

use pgstmt::{ConnectConfig, Record, Statement, StmtError, connect};
use serde_json::json;

async fn try_connect() -> Option<tokio_postgres::Client> {
    let config = ConnectConfig::from_env().ok()?;
    Some(
        connect(&config)
            .await
            .expect("Failed to connect to DATABASE_URL with NoTls"),
    )
}

#[tokio::test]
async fn insert_select_update_delete() -> Result<(), StmtError> {
    let Some(mut client) = try_connect().await else {
        return Ok(());
    };

    let table = format!("pgstmt_it_{}", std::process::id());

    let mut drop = Statement::new();
    drop.custom(format!("DROP TABLE IF EXISTS {table}"));
    drop.run(&mut client).await?;

    let mut create = Statement::new();
    create.custom(format!(
        "CREATE TABLE {table} (id INT PRIMARY KEY, name TEXT, active BOOLEAN, meta JSONB)"
    ));
    create.run(&mut client).await?;

    let mut insert = Statement::new();
    insert.insert().table(&table).params(json!([
        {"id": 1, "name": "ann", "active": true, "meta": {"a": 1}},
        {"id": 2, "name": "bob", "active": false, "meta": null}
    ]));
    let inserted = insert.run(&mut client).await?;
    assert_eq!(inserted.affected(), Some(2));

    let mut select = Statement::new();
    select
        .select()
        .params(["id", "name"])
        .table(&table)
        .order("id")
        .limit(10);
    let selection = select.run(&mut client).await?.into_selection().unwrap();
    assert_eq!(selection.len(), 2);
    let first: &str = selection.first().unwrap().get("name");
    assert_eq!(first, "ann");

    let mut update = Statement::new();
    update
        .update()
        .table(&table)
        .params(Record::new().with("name", "cy"))
        .where_clause(json!({"id": 2}));
    assert_eq!(update.run(&mut client).await?.affected(), Some(1));

    let mut delete = Statement::new();
    delete.delete().table(&table).where_clause("active = false");
    assert_eq!(delete.run(&mut client).await?.affected(), Some(1));

    drop.run(&mut client).await?;
    Ok(())
}

#[tokio::test]
async fn execution_errors_are_not_compile_errors() {
    let Some(mut client) = try_connect().await else {
        return;
    };

    let mut stmt = Statement::new();
    stmt.select().params("*").table("pgstmt_missing_table_xyz");
    let err = stmt.run(&mut client).await.unwrap_err();
    assert!(matches!(err, StmtError::Execution(_)));
    assert!(err.is_execution_error());
}
