pub mod contributions_db_operations;
