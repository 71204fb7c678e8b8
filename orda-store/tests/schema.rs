use orda_store::schema::{
    MIGRATION_STATEMENTS_SQL, NEWS_ISSUES_TABLE, PIPELINE_LOGS_TABLE, RELATED_INDUSTRIES_TABLE,
    RELATED_PAST_ISSUES_TABLE, SIMULATION_RESULTS_TABLE,
};

#[test]
fn parent_table_is_created_before_children() {
    assert!(MIGRATION_STATEMENTS_SQL[0].contains(NEWS_ISSUES_TABLE));
    for child in [RELATED_INDUSTRIES_TABLE, RELATED_PAST_ISSUES_TABLE] {
        let position = MIGRATION_STATEMENTS_SQL
            .iter()
            .position(|sql| sql.contains(&format!("EXISTS {child}")))
            .expect("child table present");
        assert!(position > 0);
        assert!(MIGRATION_STATEMENTS_SQL[position].contains("ON DELETE CASCADE"));
    }
}

#[test]
fn every_table_is_migrated_idempotently() {
    for table in [
        NEWS_ISSUES_TABLE,
        RELATED_INDUSTRIES_TABLE,
        RELATED_PAST_ISSUES_TABLE,
        PIPELINE_LOGS_TABLE,
        SIMULATION_RESULTS_TABLE,
    ] {
        assert!(MIGRATION_STATEMENTS_SQL
            .iter()
            .any(|sql| sql.starts_with(&format!("CREATE TABLE IF NOT EXISTS {table} ("))));
    }
}
